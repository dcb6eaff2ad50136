//! Inbound event representation.
//!
//! This module provides the caller-facing event types:
//! - [`Event`]: a partial calendar event where every field is optional
//! - [`Organizer`]: the organizer block, passed through to the remote event as-is
//!
//! An absent field means "not specified" and is never written to the remote
//! event. A present but empty string is a real value (for location and
//! description it clears the remote field).

use std::sync::LazyLock;

use regex::Regex;
use serde::{Deserialize, Serialize};

use crate::error::{ConnectorError, ConnectorResult};

/// Minimum length of a caller-supplied event id.
pub const EVENT_ID_MIN_LEN: usize = 5;

/// Maximum length of a caller-supplied event id.
pub const EVENT_ID_MAX_LEN: usize = 1024;

static EVENT_ID_PATTERN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[a-z0-9]+$").expect("event id pattern is valid"));

/// A partial calendar event as received from a caller.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Event {
    /// Event identifier. Optional on create, required for update and patch.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    /// Event title (maps to the remote summary).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    /// Free-form location.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub location: Option<String>,
    /// Free-form description.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    /// Start date-time, RFC 3339 without or with offset.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub start: Option<String>,
    /// End date-time, RFC 3339 without or with offset.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub end: Option<String>,
    /// Participant email addresses, in order.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub participants: Option<Vec<String>>,
    /// Organizer block.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub organizer: Option<Organizer>,
}

/// The organizer of an event.
///
/// No validation is performed on this value.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Organizer {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub display_name: Option<String>,
    #[serde(rename = "self", default, skip_serializing_if = "Option::is_none")]
    pub is_self: Option<bool>,
}

impl Event {
    /// Creates an empty event.
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder method to set the id.
    pub fn with_id(mut self, id: impl Into<String>) -> Self {
        self.id = Some(id.into());
        self
    }

    /// Builder method to set the title.
    pub fn with_title(mut self, title: impl Into<String>) -> Self {
        self.title = Some(title.into());
        self
    }

    /// Builder method to set the location.
    pub fn with_location(mut self, location: impl Into<String>) -> Self {
        self.location = Some(location.into());
        self
    }

    /// Builder method to set the description.
    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    /// Builder method to set start and end.
    pub fn with_times(mut self, start: impl Into<String>, end: impl Into<String>) -> Self {
        self.start = Some(start.into());
        self.end = Some(end.into());
        self
    }

    /// Builder method to set the participant list.
    pub fn with_participants<I, S>(mut self, participants: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.participants = Some(participants.into_iter().map(Into::into).collect());
        self
    }

    /// Builder method to set the organizer.
    pub fn with_organizer(mut self, organizer: Organizer) -> Self {
        self.organizer = Some(organizer);
        self
    }

    /// Returns the id if it is present and non-empty.
    pub fn target_id(&self) -> Option<&str> {
        self.id.as_deref().filter(|id| !id.is_empty())
    }

    /// Checks the fields a complete event must carry.
    ///
    /// Start and end are checked before the title, so an event missing both
    /// reports [`ErrorKind::MissingDates`](crate::ErrorKind::MissingDates).
    pub fn validate_complete(&self) -> ConnectorResult<()> {
        if is_blank(&self.start) || is_blank(&self.end) {
            return Err(ConnectorError::missing_dates());
        }
        if is_blank(&self.title) {
            return Err(ConnectorError::missing_title());
        }
        Ok(())
    }
}

fn is_blank(value: &Option<String>) -> bool {
    value.as_deref().is_none_or(str::is_empty)
}

/// Returns true if `id` can be used as a caller-chosen remote event id.
///
/// Ids must be 5 to 1024 characters of lowercase ASCII letters and digits.
pub fn is_valid_event_id(id: &str) -> bool {
    (EVENT_ID_MIN_LEN..=EVENT_ID_MAX_LEN).contains(&id.len()) && EVENT_ID_PATTERN.is_match(id)
}
