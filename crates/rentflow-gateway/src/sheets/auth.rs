//! Google service account authentication
//!
//! Exchanges a signed RS256 assertion for an OAuth access token (JWT bearer
//! grant) and caches the token until shortly before it expires.

use chrono::{DateTime, Duration, Utc};
use jsonwebtoken::{encode, Algorithm, EncodingKey, Header};
use reqwest::Client;
use serde::{Deserialize, Serialize};
use tokio::sync::Mutex;
use tracing::{debug, error};

use crate::error::GatewayError;

/// OAuth scope for reading and writing spreadsheets
pub const SPREADSHEETS_SCOPE: &str = "https://www.googleapis.com/auth/spreadsheets";

const JWT_BEARER_GRANT: &str = "urn:ietf:params:oauth:grant-type:jwt-bearer";
const ASSERTION_LIFETIME_SECS: i64 = 3600;
const REFRESH_MARGIN_SECS: i64 = 60;

/// Claims of the service account assertion
#[derive(Debug, Serialize, Deserialize, PartialEq, Eq)]
pub struct AssertionClaims {
    pub iss: String,
    pub scope: String,
    pub aud: String,
    pub iat: i64,
    pub exp: i64,
}

impl AssertionClaims {
    pub fn new(client_email: &str, token_uri: &str, now: DateTime<Utc>) -> Self {
        let iat = now.timestamp();
        Self {
            iss: client_email.to_string(),
            scope: SPREADSHEETS_SCOPE.to_string(),
            aud: token_uri.to_string(),
            iat,
            exp: iat + ASSERTION_LIFETIME_SECS,
        }
    }
}

#[derive(Debug, Deserialize)]
struct TokenResponse {
    access_token: String,
    #[serde(default = "default_expires_in")]
    expires_in: i64,
}

fn default_expires_in() -> i64 {
    ASSERTION_LIFETIME_SECS
}

#[derive(Debug, Clone)]
struct CachedToken {
    value: String,
    expires_at: DateTime<Utc>,
}

impl CachedToken {
    fn is_fresh(&self, now: DateTime<Utc>) -> bool {
        self.expires_at - Duration::seconds(REFRESH_MARGIN_SECS) > now
    }
}

/// Service account token source
pub struct ServiceAccountAuth {
    http_client: Client,
    client_email: String,
    token_uri: String,
    key: EncodingKey,
    timeout_ms: u64,
    cached: Mutex<Option<CachedToken>>,
}

impl ServiceAccountAuth {
    pub fn new(
        http_client: Client,
        client_email: &str,
        private_key_pem: &str,
        token_uri: &str,
        timeout_ms: u64,
    ) -> Result<Self, GatewayError> {
        let key = EncodingKey::from_rsa_pem(private_key_pem.as_bytes())
            .map_err(|e| GatewayError::Config(format!("invalid service account key: {}", e)))?;

        Ok(Self {
            http_client,
            client_email: client_email.to_string(),
            token_uri: token_uri.to_string(),
            key,
            timeout_ms,
            cached: Mutex::new(None),
        })
    }

    /// A valid access token, refreshed when close to expiry
    pub async fn access_token(&self) -> Result<String, GatewayError> {
        let mut cached = self.cached.lock().await;
        let now = Utc::now();

        if let Some(token) = cached.as_ref().filter(|t| t.is_fresh(now)) {
            return Ok(token.value.clone());
        }

        let token = self.fetch_token(now).await?;
        let value = token.value.clone();
        *cached = Some(token);
        Ok(value)
    }

    async fn fetch_token(&self, now: DateTime<Utc>) -> Result<CachedToken, GatewayError> {
        let claims = AssertionClaims::new(&self.client_email, &self.token_uri, now);
        let assertion = encode(&Header::new(Algorithm::RS256), &claims, &self.key)
            .map_err(|e| GatewayError::Auth(format!("failed to sign assertion: {}", e)))?;

        debug!("Requesting Google access token for {}", self.client_email);

        let response = self
            .http_client
            .post(&self.token_uri)
            .form(&[("grant_type", JWT_BEARER_GRANT), ("assertion", assertion.as_str())])
            .send()
            .await
            .map_err(|e| GatewayError::from_reqwest(e, self.timeout_ms))?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            error!("Google token exchange failed: status={}", status);
            return Err(GatewayError::Auth(format!(
                "token endpoint returned {}: {}",
                status, body
            )));
        }

        let token: TokenResponse = response
            .json()
            .await
            .map_err(|e| GatewayError::Parse(format!("invalid token response: {}", e)))?;

        Ok(CachedToken {
            value: token.access_token,
            expires_at: now + Duration::seconds(token.expires_in),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn test_assertion_claims() {
        let now = Utc.with_ymd_and_hms(2026, 1, 1, 0, 0, 0).unwrap();
        let claims = AssertionClaims::new(
            "ledger@project.iam.gserviceaccount.com",
            "https://oauth2.googleapis.com/token",
            now,
        );
        assert_eq!(claims.scope, SPREADSHEETS_SCOPE);
        assert_eq!(claims.aud, "https://oauth2.googleapis.com/token");
        assert_eq!(claims.exp - claims.iat, 3600);
    }

    #[test]
    fn test_cached_token_freshness() {
        let now = Utc.with_ymd_and_hms(2026, 1, 1, 0, 0, 0).unwrap();
        let token = CachedToken {
            value: "ya29".to_string(),
            expires_at: now + Duration::seconds(120),
        };
        assert!(token.is_fresh(now));
        assert!(!token.is_fresh(now + Duration::seconds(61)));
    }

    #[test]
    fn test_rejects_invalid_key() {
        let result = ServiceAccountAuth::new(
            Client::new(),
            "ledger@project.iam.gserviceaccount.com",
            "not a pem",
            "https://oauth2.googleapis.com/token",
            1000,
        );
        assert!(matches!(result, Err(GatewayError::Config(_))));
    }
}
