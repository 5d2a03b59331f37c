use std::fmt;

pub const DEFAULT_TOKEN_URI: &str = "https://oauth2.googleapis.com/token";
pub const DEFAULT_UNIVERSE_DOMAIN: &str = "googleapis.com";
pub const DEFAULT_SHEET_NAME: &str = "Sheet1";
pub const DEFAULT_RANGE: &str = "A2:E2";

/// Everything the gateway needs to reach the sheet. Credential values stay
/// optional here and are only checked when a row is appended.
#[derive(Clone)]
pub struct SheetsConfig {
    pub account_type: Option<String>,
    pub project_id: Option<String>,
    pub private_key_id: Option<String>,
    pub private_key: Option<String>,
    pub client_email: Option<String>,
    pub client_id: Option<String>,
    pub universe_domain: Option<String>,
    pub spreadsheet_id: Option<String>,
    pub token_uri: String,
    /// Overrides `https://sheets.{universe_domain}`.
    pub api_base_url: Option<String>,
    pub sheet_name: String,
    pub range: String,
}

impl SheetsConfig {
    /// `Sheet1!A2:E2`
    pub fn target_range(&self) -> String {
        format!("{}!{}", self.sheet_name, self.range)
    }
}

impl Default for SheetsConfig {
    fn default() -> Self {
        Self {
            account_type: None,
            project_id: None,
            private_key_id: None,
            private_key: None,
            client_email: None,
            client_id: None,
            universe_domain: None,
            spreadsheet_id: None,
            token_uri: DEFAULT_TOKEN_URI.into(),
            api_base_url: None,
            sheet_name: DEFAULT_SHEET_NAME.into(),
            range: DEFAULT_RANGE.into(),
        }
    }
}

impl fmt::Debug for SheetsConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SheetsConfig")
            .field("account_type", &self.account_type)
            .field("project_id", &self.project_id)
            .field("private_key_id", &self.private_key_id)
            .field(
                "private_key",
                &self.private_key.as_ref().map(|_| "<redacted>"),
            )
            .field("client_email", &self.client_email)
            .field("client_id", &self.client_id)
            .field("universe_domain", &self.universe_domain)
            .field("spreadsheet_id", &self.spreadsheet_id)
            .field("token_uri", &self.token_uri)
            .field("api_base_url", &self.api_base_url)
            .field("sheet_name", &self.sheet_name)
            .field("range", &self.range)
            .finish()
    }
}
