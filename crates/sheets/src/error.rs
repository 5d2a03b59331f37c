use thiserror::Error;

/// Failures raised before the spreadsheet service could answer the append
/// call. A non-200 answer is not an error here; it comes back as an
/// `AppendOutcome` with an error status.
#[derive(Debug, Error)]
pub enum GatewayError {
    #[error("missing service account setting {0}")]
    MissingCredential(&'static str),
    #[error("service account private key is not a valid RSA PEM")]
    InvalidPrivateKey(#[source] jsonwebtoken::errors::Error),
    #[error("failed to sign token assertion")]
    Signing(#[source] jsonwebtoken::errors::Error),
    #[error("invalid endpoint url '{url}': {reason}")]
    InvalidEndpoint { url: String, reason: String },
    #[error("token request failed")]
    TokenRequest(#[source] reqwest::Error),
    #[error("token endpoint rejected credentials with status {status}: {body}")]
    TokenRejected { status: u16, body: String },
    #[error("append request failed")]
    Transport(#[source] reqwest::Error),
}

impl GatewayError {
    /// Stable name for log fields.
    pub fn kind(&self) -> &'static str {
        match self {
            GatewayError::MissingCredential(_) => "missing_credential",
            GatewayError::InvalidPrivateKey(_) => "invalid_private_key",
            GatewayError::Signing(_) => "signing",
            GatewayError::InvalidEndpoint { .. } => "invalid_endpoint",
            GatewayError::TokenRequest(_) => "token_request",
            GatewayError::TokenRejected { .. } => "token_rejected",
            GatewayError::Transport(_) => "transport",
        }
    }
}
