//! Appends daily reports to a Google Sheets spreadsheet with a service
//! account.

use async_trait::async_trait;
use shared::{domain::ReportSubmission, protocol::AppendOutcome};

mod client;
pub mod config;
pub mod credentials;
pub mod error;
pub mod token;

pub use client::GoogleSheetsGateway;
pub use config::SheetsConfig;
pub use credentials::ServiceAccountCredentials;
pub use error::GatewayError;

/// Destination for validated reports. One call appends one row; callers must
/// not retry on their own since the sheet does not deduplicate.
#[async_trait]
pub trait SubmissionGateway: Send + Sync {
    async fn append_row(&self, report: &ReportSubmission) -> Result<AppendOutcome, GatewayError>;
}
