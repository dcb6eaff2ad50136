//! HTTP facade over Google Calendar, scoped by tenant domain.
//!
//! This crate provides the calgate service:
//! - [`CredentialRegistry`] mapping each domain to its calendar service
//! - [`EventConnector`] performing one calendar operation per request
//! - An axum request adapter exposing the connector over REST
//! - Configuration, CLI and signal handling for the `calgate` binary
//!
//! # Example
//!
//! ```rust,no_run
//! use calgate_server::{AppState, CredentialRegistry, RegistrySettings, Shutdown};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let registry = CredentialRegistry::load("credentials.json", &RegistrySettings::default())?;
//!     let listener = tokio::net::TcpListener::bind("127.0.0.1:5555").await?;
//!     calgate_server::http::serve(listener, AppState::new(registry), Shutdown::new()).await?;
//!     Ok(())
//! }
//! ```

pub mod cli;
mod config;
mod connector;
mod error;
pub mod http;
mod merge;
mod registry;
mod signals;

pub use config::{DEFAULT_BIND, ServerConfig};
pub use connector::EventConnector;
pub use error::{ServerError, ServerResult};
pub use http::{AppState, router};
pub use merge::merge_into;
pub use registry::{
    CredentialRegistry, DEFAULT_CALENDAR_ID, DEFAULT_TIME_ZONE, DomainCredential,
    RegistrySettings,
};
pub use signals::Shutdown;
