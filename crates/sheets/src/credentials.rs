use std::fmt;

use crate::{
    config::{SheetsConfig, DEFAULT_UNIVERSE_DOMAIN},
    error::GatewayError,
};

/// Service account identity built from `SheetsConfig` for a single call.
#[derive(Clone)]
pub struct ServiceAccountCredentials {
    pub account_type: Option<String>,
    pub project_id: Option<String>,
    pub private_key_id: Option<String>,
    pub private_key: String,
    pub client_email: String,
    pub client_id: Option<String>,
    pub universe_domain: String,
}

impl ServiceAccountCredentials {
    pub fn from_config(config: &SheetsConfig) -> Result<Self, GatewayError> {
        let private_key = required(&config.private_key, "PRIVATE_KEY")?;
        let client_email = required(&config.client_email, "CLIENT_EMAIL")?;

        Ok(Self {
            account_type: config.account_type.clone(),
            project_id: config.project_id.clone(),
            private_key_id: config.private_key_id.clone(),
            private_key: normalize_private_key(&private_key),
            client_email,
            client_id: config.client_id.clone(),
            universe_domain: config
                .universe_domain
                .clone()
                .filter(|domain| !domain.trim().is_empty())
                .unwrap_or_else(|| DEFAULT_UNIVERSE_DOMAIN.to_string()),
        })
    }
}

impl fmt::Debug for ServiceAccountCredentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ServiceAccountCredentials")
            .field("account_type", &self.account_type)
            .field("project_id", &self.project_id)
            .field("private_key_id", &self.private_key_id)
            .field("private_key", &"<redacted>")
            .field("client_email", &self.client_email)
            .field("client_id", &self.client_id)
            .field("universe_domain", &self.universe_domain)
            .finish()
    }
}

/// Keys pasted into environment variables usually carry literal `\n`
/// sequences instead of line breaks.
pub fn normalize_private_key(raw: &str) -> String {
    raw.replace("\\n", "\n")
}

pub(crate) fn required(value: &Option<String>, name: &'static str) -> Result<String, GatewayError> {
    value
        .as_deref()
        .filter(|v| !v.trim().is_empty())
        .map(str::to_string)
        .ok_or(GatewayError::MissingCredential(name))
}
