//! Service-account key bundles.

use std::fmt;

use jsonwebtoken::EncodingKey;
use serde::Deserialize;

use crate::error::{RemoteError, RemoteResult};

/// Token endpoint used when a key bundle leaves `token_uri` empty.
pub const GOOGLE_TOKEN_URL: &str = "https://oauth2.googleapis.com/token";

/// The only key type accepted.
const SERVICE_ACCOUNT_TYPE: &str = "service_account";

/// A Google service-account key bundle plus the scopes to request.
///
/// Field names follow the JSON key file Google hands out.
#[derive(Clone, Default, Deserialize)]
#[serde(default)]
pub struct ServiceAccountKey {
    #[serde(rename = "type")]
    pub key_type: String,
    pub project_id: String,
    pub private_key_id: String,
    pub private_key: String,
    pub client_email: String,
    pub client_id: String,
    pub auth_uri: String,
    pub token_uri: String,
    pub auth_provider_x509_cert_url: String,
    pub client_x509_cert_url: String,
    /// OAuth scopes requested when exchanging the assertion.
    pub scopes: Vec<String>,
}

impl ServiceAccountKey {
    /// Parses a single key bundle.
    pub fn from_json(json: &str) -> RemoteResult<Self> {
        let key: Self = serde_json::from_str(json).map_err(|e| {
            RemoteError::configuration(format!("failed to parse service account key: {}", e))
                .with_source(e)
        })?;
        key.validate()?;
        Ok(key)
    }

    /// Checks the bundle can be used to sign assertions.
    pub fn validate(&self) -> RemoteResult<()> {
        if self.key_type != SERVICE_ACCOUNT_TYPE {
            return Err(RemoteError::configuration(format!(
                "'type' field is \"{}\" (expected \"{}\")",
                self.key_type, SERVICE_ACCOUNT_TYPE
            )));
        }
        if self.client_email.trim().is_empty() {
            return Err(RemoteError::configuration("client_email is required"));
        }
        if self.private_key.trim().is_empty() {
            return Err(RemoteError::configuration("private_key is required"));
        }
        self.encoding_key().map(|_| ())
    }

    /// Decodes the PEM private key into an RS256 signing key.
    pub fn encoding_key(&self) -> RemoteResult<EncodingKey> {
        EncodingKey::from_rsa_pem(self.private_key.as_bytes()).map_err(|e| {
            RemoteError::configuration(format!("invalid private key: {}", e)).with_source(e)
        })
    }

    /// Returns the token endpoint, falling back to Google's.
    pub fn token_endpoint(&self) -> &str {
        if self.token_uri.is_empty() {
            GOOGLE_TOKEN_URL
        } else {
            &self.token_uri
        }
    }
}

// The private key must never reach the logs.
impl fmt::Debug for ServiceAccountKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ServiceAccountKey")
            .field("project_id", &self.project_id)
            .field("private_key_id", &self.private_key_id)
            .field("client_email", &self.client_email)
            .field("token_uri", &self.token_uri)
            .field("scopes", &self.scopes)
            .finish_non_exhaustive()
    }
}
