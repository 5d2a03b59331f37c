use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::domain::FieldName;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ErrorCode {
    NotFound,
    Validation,
    Upstream,
}

/// A single field that failed validation, with the message shown next to it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Error)]
#[error("{field}: {message}")]
pub struct ValidationError {
    pub field: FieldName,
    pub message: String,
}

impl ValidationError {
    pub fn new(field: FieldName, message: impl Into<String>) -> Self {
        Self {
            field,
            message: message.into(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiError {
    pub code: ErrorCode,
    pub message: String,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub fields: Vec<ValidationError>,
}

impl ApiError {
    pub fn new(code: ErrorCode, message: impl Into<String>) -> Self {
        Self {
            code,
            message: message.into(),
            fields: Vec::new(),
        }
    }

    pub fn validation(fields: Vec<ValidationError>) -> Self {
        Self {
            code: ErrorCode::Validation,
            message: "report has invalid fields".to_string(),
            fields,
        }
    }
}
