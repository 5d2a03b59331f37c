use async_trait::async_trait;
use reqwest::Client;
use serde::Serialize;
use shared::{domain::ReportSubmission, protocol::AppendOutcome};
use tracing::{debug, info, warn};
use url::Url;

use crate::{
    config::SheetsConfig,
    credentials::{required, ServiceAccountCredentials},
    error::GatewayError,
    token::{fetch_access_token, mint_assertion},
    SubmissionGateway,
};

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct AppendRequest {
    major_dimension: &'static str,
    values: Vec<Vec<String>>,
}

/// `spreadsheets.values.append` over HTTPS. Credentials and the access token
/// are rebuilt on every call.
pub struct GoogleSheetsGateway {
    http: Client,
    config: SheetsConfig,
}

impl GoogleSheetsGateway {
    pub fn new(config: SheetsConfig) -> Self {
        Self::with_client(Client::new(), config)
    }

    pub fn with_client(http: Client, config: SheetsConfig) -> Self {
        Self { http, config }
    }

    fn append_url(
        &self,
        credentials: &ServiceAccountCredentials,
        spreadsheet_id: &str,
    ) -> Result<Url, GatewayError> {
        let base = self
            .config
            .api_base_url
            .clone()
            .unwrap_or_else(|| format!("https://sheets.{}", credentials.universe_domain));
        let mut url = Url::parse(&base).map_err(|e| GatewayError::InvalidEndpoint {
            url: base.clone(),
            reason: e.to_string(),
        })?;
        let range_segment = format!("{}:append", self.config.target_range());

        url.path_segments_mut()
            .map_err(|_| GatewayError::InvalidEndpoint {
                url: base.clone(),
                reason: "url cannot be a base".to_string(),
            })?
            .pop_if_empty()
            .extend([
                "v4",
                "spreadsheets",
                spreadsheet_id,
                "values",
                range_segment.as_str(),
            ]);
        url.query_pairs_mut()
            .append_pair("valueInputOption", "USER_ENTERED")
            .append_pair("includeValuesInResponse", "true");
        Ok(url)
    }
}

#[async_trait]
impl SubmissionGateway for GoogleSheetsGateway {
    async fn append_row(&self, report: &ReportSubmission) -> Result<AppendOutcome, GatewayError> {
        let credentials = ServiceAccountCredentials::from_config(&self.config)?;
        let spreadsheet_id = required(&self.config.spreadsheet_id, "SPREADSHEET_ID")?;
        debug!(
            account_type = ?credentials.account_type,
            project_id = ?credentials.project_id,
            client_id = ?credentials.client_id,
            "built service account credentials"
        );

        let assertion = mint_assertion(&credentials, &self.config.token_uri)?;
        let token = fetch_access_token(&self.http, &self.config.token_uri, &assertion).await?;

        let url = self.append_url(&credentials, &spreadsheet_id)?;
        let values = report.row_values();
        info!(
            %spreadsheet_id,
            range = %self.config.target_range(),
            columns = values.len(),
            "appending report row"
        );

        let response = self
            .http
            .post(url)
            .bearer_auth(&token.access_token)
            .json(&AppendRequest {
                major_dimension: "ROWS",
                values: vec![values],
            })
            .send()
            .await
            .map_err(GatewayError::Transport)?;

        let status = response.status().as_u16();
        let body = response.text().await.map_err(GatewayError::Transport)?;
        let data = serde_json::from_str(&body).unwrap_or(serde_json::Value::String(body));

        if status != 200 {
            warn!(status, %spreadsheet_id, "sheet append returned non-success status");
            return Ok(AppendOutcome::error(status, data));
        }

        info!(status, %spreadsheet_id, "sheet append succeeded");
        Ok(AppendOutcome::success(status, data))
    }
}

#[cfg(test)]
#[path = "tests/client_tests.rs"]
mod tests;
