//! Server configuration.
//!
//! Settings come from an optional TOML file and are then overridden by
//! command-line flags and environment variables (see [`crate::cli`]).

use std::net::SocketAddr;
use std::path::{Path, PathBuf};
use std::time::Duration;

use calgate_core::TracingOutputFormat;
use calgate_google::{ClientConfig, DEFAULT_API_BASE_URL};
use serde::{Deserialize, Serialize};

use crate::error::{ServerError, ServerResult};
use crate::registry::{DEFAULT_CALENDAR_ID, DEFAULT_TIME_ZONE, RegistrySettings};

/// Default listen address.
pub const DEFAULT_BIND: &str = "0.0.0.0:5555";

/// Server configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    /// Address the HTTP listener binds to.
    pub bind: String,

    /// Path to the credential descriptor.
    pub credentials: Option<PathBuf>,

    /// User impersonated by every service account. Unset means none.
    pub impersonation_subject: Option<String>,

    /// Calendar used when a descriptor entry names none.
    pub calendar_id: String,

    /// Time zone attached to event times when a descriptor entry names none.
    pub time_zone: String,

    /// Calendar API root.
    pub api_base_url: String,

    /// Timeout for calendar API requests, in seconds.
    pub request_timeout_secs: u64,

    /// Timeout for token endpoint requests, in seconds.
    pub token_timeout_secs: u64,

    /// Log output format.
    pub log_format: TracingOutputFormat,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            bind: DEFAULT_BIND.to_string(),
            credentials: None,
            impersonation_subject: None,
            calendar_id: DEFAULT_CALENDAR_ID.to_string(),
            time_zone: DEFAULT_TIME_ZONE.to_string(),
            api_base_url: DEFAULT_API_BASE_URL.to_string(),
            request_timeout_secs: 30,
            token_timeout_secs: 15,
            log_format: TracingOutputFormat::default(),
        }
    }
}

impl ServerConfig {
    /// Loads configuration from a TOML file.
    pub fn load_from(path: impl AsRef<Path>) -> ServerResult<Self> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path).map_err(|e| {
            ServerError::config(format!("failed to read {}: {}", path.display(), e))
        })?;
        Self::from_toml(&content)
    }

    /// Parses configuration from TOML text.
    pub fn from_toml(content: &str) -> ServerResult<Self> {
        toml::from_str(content)
            .map_err(|e| ServerError::config(format!("failed to parse config: {}", e)))
    }

    /// Builder: set the credentials path.
    pub fn with_credentials(mut self, path: impl Into<PathBuf>) -> Self {
        self.credentials = Some(path.into());
        self
    }

    /// Builder: set the bind address.
    pub fn with_bind(mut self, bind: impl Into<String>) -> Self {
        self.bind = bind.into();
        self
    }

    /// Checks the configuration is usable.
    pub fn validate(&self) -> ServerResult<()> {
        self.socket_addr()?;
        match &self.credentials {
            Some(path) if !path.as_os_str().is_empty() => {}
            _ => {
                return Err(ServerError::config(
                    "no credentials file configured (set CREDENTIALS or --credentials)",
                ));
            }
        }
        if self.request_timeout_secs == 0 || self.token_timeout_secs == 0 {
            return Err(ServerError::config("timeouts must be non-zero"));
        }
        self.client_config()
            .validate()
            .map_err(|e| ServerError::config(e.message().to_string()))
    }

    /// Parses the bind address.
    pub fn socket_addr(&self) -> ServerResult<SocketAddr> {
        self.bind
            .parse()
            .map_err(|e| ServerError::config(format!("invalid bind address '{}': {}", self.bind, e)))
    }

    /// Remote client settings derived from this configuration.
    pub fn client_config(&self) -> ClientConfig {
        ClientConfig::new()
            .with_api_base_url(self.api_base_url.clone())
            .with_request_timeout(Duration::from_secs(self.request_timeout_secs))
            .with_token_timeout(Duration::from_secs(self.token_timeout_secs))
            .with_subject(self.impersonation_subject.clone())
    }

    /// Settings used to load the credential registry.
    pub fn registry_settings(&self) -> RegistrySettings {
        RegistrySettings {
            client: self.client_config(),
            calendar_id: self.calendar_id.clone(),
            time_zone: self.time_zone.clone(),
        }
    }
}
