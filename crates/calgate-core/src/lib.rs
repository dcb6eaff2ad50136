//! Core types: inbound events, connector options, validation, error kinds

pub mod domain;
pub mod error;
pub mod event;
pub mod options;
pub mod tracing;

pub use domain::Domain;
pub use error::{ConnectorError, ConnectorResult, ErrorClass, ErrorKind};
pub use event::{EVENT_ID_MAX_LEN, EVENT_ID_MIN_LEN, Event, Organizer, is_valid_event_id};
pub use options::{ConnectorOptions, parse_flag};
pub use tracing::{TracingConfig, TracingError, TracingOutputFormat, init_tracing};
