use chrono::{Duration, Utc};
use jsonwebtoken::{encode, Algorithm, EncodingKey, Header};
use reqwest::Client;
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::{credentials::ServiceAccountCredentials, error::GatewayError};

pub const SPREADSHEETS_SCOPE: &str = "https://www.googleapis.com/auth/spreadsheets";
pub const JWT_BEARER_GRANT: &str = "urn:ietf:params:oauth:grant-type:jwt-bearer";
const ASSERTION_TTL_SECONDS: i64 = 3600;

#[derive(Debug, Serialize)]
struct Claims {
    iss: String,
    scope: String,
    aud: String,
    iat: i64,
    exp: i64,
}

#[derive(Debug, Clone, Deserialize)]
pub struct AccessToken {
    pub access_token: String,
    #[serde(default)]
    pub expires_in: Option<i64>,
    #[serde(default)]
    pub token_type: Option<String>,
}

/// Signs the self-issued JWT exchanged for an access token.
pub fn mint_assertion(
    credentials: &ServiceAccountCredentials,
    token_uri: &str,
) -> Result<String, GatewayError> {
    let now = Utc::now();
    let exp = now + Duration::seconds(ASSERTION_TTL_SECONDS);
    let claims = Claims {
        iss: credentials.client_email.clone(),
        scope: SPREADSHEETS_SCOPE.to_string(),
        aud: token_uri.to_string(),
        iat: now.timestamp(),
        exp: exp.timestamp(),
    };

    let mut header = Header::new(Algorithm::RS256);
    header.kid = credentials.private_key_id.clone();

    let key = EncodingKey::from_rsa_pem(credentials.private_key.as_bytes())
        .map_err(GatewayError::InvalidPrivateKey)?;
    encode(&header, &claims, &key).map_err(GatewayError::Signing)
}

pub async fn fetch_access_token(
    http: &Client,
    token_uri: &str,
    assertion: &str,
) -> Result<AccessToken, GatewayError> {
    let response = http
        .post(token_uri)
        .form(&[("grant_type", JWT_BEARER_GRANT), ("assertion", assertion)])
        .send()
        .await
        .map_err(GatewayError::TokenRequest)?;

    let status = response.status();
    if !status.is_success() {
        let body = response.text().await.unwrap_or_default();
        warn!(status = status.as_u16(), %token_uri, "token endpoint rejected assertion");
        return Err(GatewayError::TokenRejected {
            status: status.as_u16(),
            body,
        });
    }

    let token: AccessToken = response.json().await.map_err(GatewayError::TokenRequest)?;
    debug!(expires_in = ?token.expires_in, "access token issued");
    Ok(token)
}

#[cfg(test)]
#[path = "tests/token_tests.rs"]
mod tests;
