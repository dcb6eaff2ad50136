//! Google Calendar access for calgate.
//!
//! This crate is the remote side of the event connector:
//!
//! - [`CalendarService`] - The seam the connector calls through
//! - [`GoogleCalendarClient`] - REST v3 implementation of the seam
//! - [`RemoteEvent`] - Wire representation of a calendar event
//! - [`ServiceAccountKey`] / [`TokenSource`] - Service-account authentication
//! - [`RemoteError`] - Error types for remote operations
//!
//! # Architecture
//!
//! ```text
//! ┌─────────────────┐
//! │ EventConnector  │
//! └────────┬────────┘
//!          │ CalendarService
//!          ▼
//! ┌──────────────────────┐     ┌───────────────┐
//! │ GoogleCalendarClient │────▶│  TokenSource  │──▶ token_uri (JWT bearer)
//! └────────┬─────────────┘     └───────────────┘
//!          │
//!          ▼
//!   Google Calendar API v3
//! ```
//!
//! # Example
//!
//! ```ignore
//! use calgate_google::{ClientConfig, GoogleCalendarClient, ListQuery, ServiceAccountKey};
//!
//! let key = ServiceAccountKey::from_json(&std::fs::read_to_string("key.json")?)?;
//! let client = GoogleCalendarClient::new(key, &ClientConfig::new())?;
//! let events = client.list("primary", &ListQuery::new()).await?;
//! ```

pub mod client;
pub mod config;
pub mod credentials;
pub mod error;
pub mod service;
pub mod token;
pub mod types;

// Re-export main types at crate root
pub use client::GoogleCalendarClient;
pub use config::{
    ClientConfig, DEFAULT_API_BASE_URL, DEFAULT_REQUEST_TIMEOUT, DEFAULT_TOKEN_TIMEOUT,
};
pub use credentials::{GOOGLE_TOKEN_URL, ServiceAccountKey};
pub use error::{RemoteError, RemoteErrorCode, RemoteResult};
pub use service::{BoxFuture, CalendarService};
pub use token::{AccessToken, TokenSource};
pub use types::{
    EventAttendee, EventDateTime, EventList, EventPerson, ListQuery, RemoteEvent, ResponseStatus,
    SendUpdates, Visibility,
};
