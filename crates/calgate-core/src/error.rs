//! Error types for connector operations.
//!
//! Every failure a connector can report carries an [`ErrorKind`]. The kind
//! decides the [`ErrorClass`], and the class alone decides how a caller
//! should surface the failure (client error vs. server error).

use std::fmt;
use thiserror::Error;

/// Broad classification of a connector failure.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorClass {
    /// Malformed or missing caller input. No remote call was made.
    User,
    /// The remote calendar service or the transport failed.
    Infrastructure,
}

impl ErrorClass {
    /// Returns a machine-readable name for this class.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::User => "user",
            Self::Infrastructure => "infrastructure",
        }
    }
}

impl fmt::Display for ErrorClass {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// The specific kind of a connector failure.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    /// The domain has no registered credential.
    DomainUnknown,
    /// The operation needs an event id and none was given.
    MissingEventId,
    /// Start or end is absent or empty.
    MissingDates,
    /// Title is absent or empty.
    MissingTitle,
    /// A caller-chosen event id does not satisfy the id rules.
    InvalidId,
    /// The remote calendar service call failed.
    Remote,
}

impl ErrorKind {
    /// Returns the class of this kind.
    pub fn class(&self) -> ErrorClass {
        match self {
            Self::Remote => ErrorClass::Infrastructure,
            Self::DomainUnknown
            | Self::MissingEventId
            | Self::MissingDates
            | Self::MissingTitle
            | Self::InvalidId => ErrorClass::User,
        }
    }

    /// Returns a machine-readable name for this kind.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::DomainUnknown => "domain_unknown",
            Self::MissingEventId => "missing_event_id",
            Self::MissingDates => "missing_dates",
            Self::MissingTitle => "missing_title",
            Self::InvalidId => "invalid_id",
            Self::Remote => "remote",
        }
    }
}

impl fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// An error returned by a connector operation.
#[derive(Debug, Error)]
pub struct ConnectorError {
    kind: ErrorKind,
    message: String,
    #[source]
    source: Option<Box<dyn std::error::Error + Send + Sync>>,
}

impl ConnectorError {
    /// Creates a new error with the given kind and message.
    pub fn new(kind: ErrorKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
            source: None,
        }
    }

    /// The domain is not known to the credential registry.
    pub fn domain_unknown() -> Self {
        Self::new(ErrorKind::DomainUnknown, "provided domain name unknown")
    }

    /// The operation requires an event id.
    pub fn missing_event_id() -> Self {
        Self::new(ErrorKind::MissingEventId, "missing event ID")
    }

    /// Start or end is missing.
    pub fn missing_dates() -> Self {
        Self::new(ErrorKind::MissingDates, "missing start or end date")
    }

    /// Title is missing.
    pub fn missing_title() -> Self {
        Self::new(ErrorKind::MissingTitle, "event has no title")
    }

    /// A caller-supplied id is malformed.
    pub fn invalid_id() -> Self {
        Self::new(
            ErrorKind::InvalidId,
            "provided ID invalid, must be length 5 to 1024, and contain only lowercase letters and numbers 0-9",
        )
    }

    /// The remote service call failed.
    pub fn remote<E>(source: E) -> Self
    where
        E: std::error::Error + Send + Sync + 'static,
    {
        Self {
            kind: ErrorKind::Remote,
            message: source.to_string(),
            source: Some(Box::new(source)),
        }
    }

    /// Returns the error kind.
    pub fn kind(&self) -> ErrorKind {
        self.kind
    }

    /// Returns the error class.
    pub fn class(&self) -> ErrorClass {
        self.kind.class()
    }

    /// Returns the error message.
    pub fn message(&self) -> &str {
        &self.message
    }
}

impl fmt::Display for ConnectorError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.message)
    }
}

/// A specialized Result type for connector operations.
pub type ConnectorResult<T> = Result<T, ConnectorError>;
