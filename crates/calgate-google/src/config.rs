//! Google Calendar client configuration.

use std::time::Duration;

use url::Url;

use crate::error::{RemoteError, RemoteResult};

/// Base URL for Google Calendar API v3.
pub const DEFAULT_API_BASE_URL: &str = "https://www.googleapis.com/calendar/v3";

/// Default timeout for calendar API requests.
pub const DEFAULT_REQUEST_TIMEOUT: Duration = Duration::from_secs(30);

/// Default timeout for token endpoint requests.
pub const DEFAULT_TOKEN_TIMEOUT: Duration = Duration::from_secs(15);

/// Settings shared by every client built from a credential file.
#[derive(Debug, Clone)]
pub struct ClientConfig {
    /// Calendar API root, without a trailing slash.
    pub api_base_url: String,
    /// Timeout for calendar API requests.
    pub request_timeout: Duration,
    /// Timeout for token endpoint requests.
    pub token_timeout: Duration,
    /// User impersonated through domain-wide delegation, if any.
    pub subject: Option<String>,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            api_base_url: DEFAULT_API_BASE_URL.to_string(),
            request_timeout: DEFAULT_REQUEST_TIMEOUT,
            token_timeout: DEFAULT_TOKEN_TIMEOUT,
            subject: None,
        }
    }
}

impl ClientConfig {
    /// Creates a config with default settings.
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the API base URL. A trailing slash is dropped.
    pub fn with_api_base_url(mut self, url: impl Into<String>) -> Self {
        self.api_base_url = url.into().trim_end_matches('/').to_string();
        self
    }

    /// Sets the request timeout.
    pub fn with_request_timeout(mut self, timeout: Duration) -> Self {
        self.request_timeout = timeout;
        self
    }

    /// Sets the token endpoint timeout.
    pub fn with_token_timeout(mut self, timeout: Duration) -> Self {
        self.token_timeout = timeout;
        self
    }

    /// Sets the impersonated subject. Empty means none.
    pub fn with_subject(mut self, subject: Option<String>) -> Self {
        self.subject = subject.filter(|s| !s.is_empty());
        self
    }

    /// Validates the configuration.
    pub fn validate(&self) -> RemoteResult<()> {
        let url = Url::parse(&self.api_base_url).map_err(|e| {
            RemoteError::configuration(format!(
                "invalid API base URL '{}': {}",
                self.api_base_url, e
            ))
            .with_source(e)
        })?;
        if !matches!(url.scheme(), "http" | "https") {
            return Err(RemoteError::configuration(format!(
                "API base URL must be http or https, got '{}'",
                url.scheme()
            )));
        }
        if self.request_timeout.is_zero() {
            return Err(RemoteError::configuration("request timeout must be non-zero"));
        }
        if self.token_timeout.is_zero() {
            return Err(RemoteError::configuration("token timeout must be non-zero"));
        }
        Ok(())
    }
}
