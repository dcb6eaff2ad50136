//! Wire types for the Google Calendar v3 events resource.
//!
//! Every field is optional and skipped when absent, so a sparse
//! [`RemoteEvent`] doubles as a patch body. Fields the types do not model
//! are kept in a flattened map and written back unchanged.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// An attendee's response to an invitation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum ResponseStatus {
    /// The attendee has not responded.
    NeedsAction,
    /// The attendee declined.
    Declined,
    /// The attendee tentatively accepted.
    Tentative,
    /// The attendee accepted.
    Accepted,
}

/// Event visibility.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Visibility {
    /// Use the calendar's default visibility.
    Default,
    /// Visible to everyone who can see the calendar.
    Public,
    /// Only attendees see the details.
    Private,
    /// Same as private, kept for compatibility.
    Confidential,
}

/// A start or end instant of an event.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EventDateTime {
    /// RFC 3339 timestamp for timed events.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub date_time: Option<String>,
    /// `yyyy-mm-dd` for all-day events.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub date: Option<String>,
    /// IANA time zone name.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub time_zone: Option<String>,
}

impl EventDateTime {
    /// A timed instant in the given zone.
    pub fn timed(date_time: impl Into<String>, time_zone: impl Into<String>) -> Self {
        Self {
            date_time: Some(date_time.into()),
            date: None,
            time_zone: Some(time_zone.into()),
        }
    }
}

/// The organizer or creator of an event.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EventPerson {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub display_name: Option<String>,
    #[serde(default, rename = "self", skip_serializing_if = "Option::is_none")]
    pub is_self: Option<bool>,
}

/// An invited participant.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EventAttendee {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub display_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub response_status: Option<ResponseStatus>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub organizer: Option<bool>,
    #[serde(default, rename = "self", skip_serializing_if = "Option::is_none")]
    pub is_self: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub optional: Option<bool>,
    /// Attendee fields not modelled above.
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl EventAttendee {
    /// An attendee identified only by email.
    pub fn new(email: impl Into<String>) -> Self {
        Self {
            email: Some(email.into()),
            ..Self::default()
        }
    }

    /// Builder: response status.
    pub fn with_response_status(mut self, status: ResponseStatus) -> Self {
        self.response_status = Some(status);
        self
    }

    /// Returns the attendee email or an empty string.
    pub fn email(&self) -> &str {
        self.email.as_deref().unwrap_or_default()
    }
}

/// A calendar event as the remote service sees it.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RemoteEvent {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub status: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub html_link: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub summary: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub location: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub start: Option<EventDateTime>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub end: Option<EventDateTime>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub attendees: Option<Vec<EventAttendee>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub organizer: Option<EventPerson>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub creator: Option<EventPerson>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub visibility: Option<Visibility>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub guests_can_modify: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub guests_can_invite_others: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub guests_can_see_other_guests: Option<bool>,
    /// Event fields not modelled above.
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl RemoteEvent {
    /// Returns the event id or an empty string.
    pub fn id(&self) -> &str {
        self.id.as_deref().unwrap_or_default()
    }

    /// Returns the attendee list, empty when absent.
    pub fn attendees(&self) -> &[EventAttendee] {
        self.attendees.as_deref().unwrap_or_default()
    }
}

/// One page, or an aggregate of pages, from the events list endpoint.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EventList {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub kind: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub etag: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub summary: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub time_zone: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub updated: Option<String>,
    #[serde(default)]
    pub items: Vec<RemoteEvent>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub next_page_token: Option<String>,
}

/// Who should be notified about a change.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SendUpdates {
    /// Notify every guest.
    All,
    /// Notify nobody.
    None,
}

impl SendUpdates {
    /// Maps a tri-state notify flag. Unset leaves the remote default.
    pub fn from_flag(flag: Option<bool>) -> Option<Self> {
        flag.map(|notify| if notify { Self::All } else { Self::None })
    }

    /// The query-string value.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::All => "all",
            Self::None => "none",
        }
    }
}

/// Filters for listing events.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ListQuery {
    /// Lower bound (RFC 3339) on event end time.
    pub time_min: Option<String>,
    /// Upper bound (RFC 3339) on event start time.
    pub time_max: Option<String>,
    /// Include cancelled events.
    pub show_deleted: bool,
}

impl ListQuery {
    /// Creates an unbounded query that hides cancelled events.
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the lower time bound.
    pub fn with_time_min(mut self, time_min: impl Into<String>) -> Self {
        self.time_min = Some(time_min.into());
        self
    }

    /// Sets the upper time bound.
    pub fn with_time_max(mut self, time_max: impl Into<String>) -> Self {
        self.time_max = Some(time_max.into());
        self
    }

    /// Sets whether cancelled events are included.
    pub fn with_show_deleted(mut self, show_deleted: bool) -> Self {
        self.show_deleted = show_deleted;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_event_keeps_unknown_fields() {
        let json = r#"{
            "kind": "calendar#event",
            "id": "abc12345",
            "status": "confirmed",
            "summary": "Standup",
            "start": {"dateTime": "2024-01-15T10:00:00+01:00", "timeZone": "Europe/Oslo"},
            "end": {"dateTime": "2024-01-15T10:30:00+01:00"},
            "attendees": [
                {"email": "a@example.com", "responseStatus": "accepted", "comment": "see you"}
            ],
            "reminders": {"useDefault": true},
            "visibility": "private"
        }"#;

        let event: RemoteEvent = serde_json::from_str(json).unwrap();
        assert_eq!(event.id(), "abc12345");
        assert_eq!(event.summary.as_deref(), Some("Standup"));
        assert_eq!(event.visibility, Some(Visibility::Private));
        assert_eq!(
            event.start.as_ref().and_then(|s| s.time_zone.as_deref()),
            Some("Europe/Oslo")
        );
        assert_eq!(event.attendees().len(), 1);
        assert_eq!(
            event.attendees()[0].response_status,
            Some(ResponseStatus::Accepted)
        );
        assert_eq!(event.attendees()[0].extra["comment"], "see you");
        assert_eq!(event.extra["kind"], "calendar#event");
        assert_eq!(event.extra["reminders"]["useDefault"], true);

        let back = serde_json::to_value(&event).unwrap();
        assert_eq!(back["reminders"]["useDefault"], true);
        assert_eq!(back["attendees"][0]["comment"], "see you");
    }

    #[test]
    fn sparse_event_serializes_only_set_fields() {
        let patch = RemoteEvent {
            attendees: Some(vec![EventAttendee::new("b@example.com")]),
            ..RemoteEvent::default()
        };

        let value = serde_json::to_value(&patch).unwrap();
        assert_eq!(
            value,
            serde_json::json!({"attendees": [{"email": "b@example.com"}]})
        );
    }

    #[test]
    fn empty_attendee_list_is_serialized() {
        let event = RemoteEvent {
            attendees: Some(Vec::new()),
            ..RemoteEvent::default()
        };
        let value = serde_json::to_value(&event).unwrap();
        assert_eq!(value, serde_json::json!({"attendees": []}));
    }

    #[test]
    fn response_status_names() {
        assert_eq!(
            serde_json::to_string(&ResponseStatus::NeedsAction).unwrap(),
            r#""needsAction""#
        );
        assert_eq!(
            serde_json::to_string(&Visibility::Default).unwrap(),
            r#""default""#
        );
    }

    #[test]
    fn send_updates_from_flag() {
        assert_eq!(SendUpdates::from_flag(Some(true)), Some(SendUpdates::All));
        assert_eq!(SendUpdates::from_flag(Some(false)), Some(SendUpdates::None));
        assert_eq!(SendUpdates::from_flag(None), None);
        assert_eq!(SendUpdates::All.as_str(), "all");
    }

    #[test]
    fn event_list_defaults_items() {
        let list: EventList = serde_json::from_str(r#"{"kind": "calendar#events"}"#).unwrap();
        assert!(list.items.is_empty());
        assert!(list.next_page_token.is_none());
    }
}
