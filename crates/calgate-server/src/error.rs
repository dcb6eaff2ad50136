//! Server error types.

use std::io;

use calgate_google::RemoteError;
use thiserror::Error;

/// Result type for server operations.
pub type ServerResult<T> = Result<T, ServerError>;

/// Errors that can occur while starting or running the server.
#[derive(Debug, Error)]
pub enum ServerError {
    /// IO error (listener, file, etc.).
    #[error("IO error: {0}")]
    Io(#[from] io::Error),

    /// The credential descriptor could not be read.
    #[error("failed to read credentials file {path}: {source}")]
    CredentialsRead {
        path: String,
        #[source]
        source: io::Error,
    },

    /// The credential descriptor is not valid JSON of the expected shape.
    #[error("failed to parse credentials: {0}")]
    CredentialsParse(#[from] serde_json::Error),

    /// One descriptor entry could not be turned into a client.
    #[error("invalid credential for domain '{domain}': {source}")]
    Credential {
        domain: String,
        #[source]
        source: RemoteError,
    },

    /// Configuration error.
    #[error("Configuration error: {message}")]
    Config { message: String },

    /// Failed to bind the listener.
    #[error("failed to bind {address}: {source}")]
    Bind {
        address: String,
        #[source]
        source: io::Error,
    },
}

impl ServerError {
    /// Creates a configuration error.
    pub fn config(message: impl Into<String>) -> Self {
        Self::Config {
            message: message.into(),
        }
    }

    /// Creates a bind error.
    pub fn bind(address: impl Into<String>, source: io::Error) -> Self {
        Self::Bind {
            address: address.into(),
            source,
        }
    }
}
