use serde::{Deserialize, Serialize};

use crate::domain::FieldName;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AppendStatus {
    Success,
    Error,
}

/// Result of one append call as reported by the spreadsheet service.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AppendOutcome {
    pub status: AppendStatus,
    pub message: String,
    pub status_code: u16,
    pub data: serde_json::Value,
}

impl AppendOutcome {
    pub fn success(status_code: u16, data: serde_json::Value) -> Self {
        Self {
            status: AppendStatus::Success,
            message: "Successfully updated sheet".to_string(),
            status_code,
            data,
        }
    }

    pub fn error(status_code: u16, data: serde_json::Value) -> Self {
        Self {
            status: AppendStatus::Error,
            message: "Error updating sheet".to_string(),
            status_code,
            data,
        }
    }

    pub fn is_success(&self) -> bool {
        self.status == AppendStatus::Success
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FieldValidationRequest {
    #[serde(default)]
    pub value: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FieldValidationResponse {
    pub field: FieldName,
    pub valid: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}
