//! Access tokens for service accounts.
//!
//! A [`TokenSource`] signs a JWT assertion with the service-account key and
//! exchanges it at the token endpoint (RFC 7523 bearer grant). The resulting
//! access token is cached until shortly before it expires.

use std::time::Duration;

use chrono::{DateTime, Utc};
use jsonwebtoken::{Algorithm, EncodingKey, Header};
use serde::{Deserialize, Serialize};
use tokio::sync::RwLock;
use tracing::{debug, info};

use crate::credentials::ServiceAccountKey;
use crate::error::{RemoteError, RemoteResult};

/// Grant type for the JWT bearer exchange.
const JWT_BEARER_GRANT: &str = "urn:ietf:params:oauth:grant-type:jwt-bearer";

/// Lifetime requested for each assertion.
const ASSERTION_LIFETIME_SECS: i64 = 3600;

/// Tokens are refreshed this long before they expire.
const EXPIRY_BUFFER_SECS: i64 = 60;

/// A cached access token.
#[derive(Debug, Clone)]
pub struct AccessToken {
    /// The bearer token.
    pub token: String,
    /// When the token should be treated as expired.
    pub expires_at: Option<DateTime<Utc>>,
}

impl AccessToken {
    /// Creates a token from a token endpoint response.
    pub fn new(token: impl Into<String>, expires_in_secs: Option<i64>) -> Self {
        let expires_at = expires_in_secs.map(|secs| {
            Utc::now() + chrono::Duration::seconds(secs) - chrono::Duration::seconds(EXPIRY_BUFFER_SECS)
        });
        Self {
            token: token.into(),
            expires_at,
        }
    }

    /// Returns true if the token is expired or about to expire.
    pub fn is_expired(&self) -> bool {
        match self.expires_at {
            Some(expires_at) => Utc::now() >= expires_at,
            None => false,
        }
    }
}

/// Claims of the signed assertion.
#[derive(Debug, Serialize)]
struct AssertionClaims<'a> {
    iss: &'a str,
    scope: String,
    aud: &'a str,
    iat: i64,
    exp: i64,
    #[serde(skip_serializing_if = "Option::is_none")]
    sub: Option<&'a str>,
}

/// Response from the token endpoint.
#[derive(Debug, Deserialize)]
struct TokenResponse {
    access_token: String,
    expires_in: Option<i64>,
}

/// Mints and caches access tokens for one service account.
pub struct TokenSource {
    http_client: reqwest::Client,
    key: ServiceAccountKey,
    encoding_key: EncodingKey,
    subject: Option<String>,
    cached: RwLock<Option<AccessToken>>,
}

impl TokenSource {
    /// Creates a token source.
    ///
    /// `subject` is the user to impersonate through domain-wide delegation;
    /// `None` acts as the service account itself.
    pub fn new(
        key: ServiceAccountKey,
        subject: Option<String>,
        timeout: Duration,
    ) -> RemoteResult<Self> {
        key.validate()?;
        let encoding_key = key.encoding_key()?;
        let http_client = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| {
                RemoteError::internal(format!("failed to create HTTP client: {}", e)).with_source(e)
            })?;

        Ok(Self {
            http_client,
            key,
            encoding_key,
            subject: subject.filter(|s| !s.is_empty()),
            cached: RwLock::new(None),
        })
    }

    /// Returns a valid access token, exchanging a fresh assertion if needed.
    pub async fn access_token(&self) -> RemoteResult<String> {
        {
            let cached = self.cached.read().await;
            if let Some(token) = cached.as_ref().filter(|t| !t.is_expired()) {
                return Ok(token.token.clone());
            }
        }

        let mut cached = self.cached.write().await;
        // Another task may have refreshed while we waited for the lock.
        if let Some(token) = cached.as_ref().filter(|t| !t.is_expired()) {
            return Ok(token.token.clone());
        }

        let token = self.exchange().await?;
        let value = token.token.clone();
        *cached = Some(token);
        Ok(value)
    }

    /// Signs the JWT assertion for the current instant.
    pub fn assertion(&self) -> RemoteResult<String> {
        let iat = Utc::now().timestamp();
        let claims = AssertionClaims {
            iss: &self.key.client_email,
            scope: self.key.scopes.join(" "),
            aud: self.key.token_endpoint(),
            iat,
            exp: iat + ASSERTION_LIFETIME_SECS,
            sub: self.subject.as_deref(),
        };

        let mut header = Header::new(Algorithm::RS256);
        if !self.key.private_key_id.is_empty() {
            header.kid = Some(self.key.private_key_id.clone());
        }

        jsonwebtoken::encode(&header, &claims, &self.encoding_key).map_err(|e| {
            RemoteError::internal(format!("failed to sign assertion: {}", e)).with_source(e)
        })
    }

    async fn exchange(&self) -> RemoteResult<AccessToken> {
        let assertion = self.assertion()?;
        let params = [
            ("grant_type", JWT_BEARER_GRANT),
            ("assertion", assertion.as_str()),
        ];

        debug!(
            "exchanging assertion for {} at {}",
            self.key.client_email,
            self.key.token_endpoint()
        );

        let response = self
            .http_client
            .post(self.key.token_endpoint())
            .form(&params)
            .send()
            .await
            .map_err(|e| {
                RemoteError::network(format!("token request failed: {}", e)).with_source(e)
            })?;

        let status = response.status();
        let body = response.text().await.map_err(|e| {
            RemoteError::network(format!("failed to read response: {}", e)).with_source(e)
        })?;

        if !status.is_success() {
            return Err(RemoteError::authentication(format!(
                "token exchange failed ({}): {}",
                status, body
            ))
            .with_status(status.as_u16()));
        }

        let token_response: TokenResponse = serde_json::from_str(&body).map_err(|e| {
            RemoteError::invalid_response(format!("invalid token response: {}", e)).with_source(e)
        })?;

        info!("obtained access token for {}", self.key.client_email);
        Ok(AccessToken::new(
            token_response.access_token,
            token_response.expires_in,
        ))
    }
}

impl std::fmt::Debug for TokenSource {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TokenSource")
            .field("key", &self.key)
            .field("subject", &self.subject)
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn access_token_expiry() {
        let token = AccessToken::new("abc", Some(3600));
        assert!(!token.is_expired());

        // Expires within the refresh buffer.
        let token = AccessToken::new("abc", Some(30));
        assert!(token.is_expired());

        let token = AccessToken::new("abc", None);
        assert!(!token.is_expired());
    }
}
