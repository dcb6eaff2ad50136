//! Per-request connector behavior.

use std::fmt;

use serde::de::{self, Deserializer, Visitor};
use serde::{Deserialize, Serialize};

/// Parses a boolean flag value.
///
/// Accepts `1`, `t`, `T`, `TRUE`, `true`, `True` and their false
/// counterparts `0`, `f`, `F`, `FALSE`, `false`, `False`. An empty value is
/// false. Anything else is `None`.
pub fn parse_flag(value: &str) -> Option<bool> {
    match value {
        "1" | "t" | "T" | "TRUE" | "true" | "True" => Some(true),
        "" | "0" | "f" | "F" | "FALSE" | "false" | "False" => Some(false),
        _ => None,
    }
}

/// Behavioral flags applied to a single connector operation.
///
/// Each flag is tri-state: `None` leaves the remote default alone,
/// `Some(value)` applies `value`. The serde names match the query-string
/// parameters accepted by the HTTP facade.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ConnectorOptions {
    /// Send update notifications to guests.
    #[serde(default, deserialize_with = "deserialize_flag", rename = "broadcastChanges")]
    pub notify_guests: Option<bool>,
    /// Guests may modify the event.
    #[serde(default, deserialize_with = "deserialize_flag")]
    pub guests_can_modify: Option<bool>,
    /// Guests may invite other guests.
    #[serde(default, deserialize_with = "deserialize_flag", rename = "guestsMayInvite")]
    pub guests_can_invite_others: Option<bool>,
    /// Guests may see the guest list.
    #[serde(default, deserialize_with = "deserialize_flag", rename = "guestsVisible")]
    pub guests_can_see_other_guests: Option<bool>,
    /// Participants added through the event body start out as accepted.
    #[serde(default, deserialize_with = "deserialize_flag", rename = "guestsAutoAccept")]
    pub auto_accept: Option<bool>,
    /// The event is private.
    #[serde(default, deserialize_with = "deserialize_flag", rename = "privateEvent")]
    pub private_event: Option<bool>,
}

impl ConnectorOptions {
    /// Creates options with every flag unset.
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder: guest notification.
    #[must_use]
    pub fn with_notify_guests(mut self, value: bool) -> Self {
        self.notify_guests = Some(value);
        self
    }

    /// Builder: guests may modify.
    #[must_use]
    pub fn with_guests_can_modify(mut self, value: bool) -> Self {
        self.guests_can_modify = Some(value);
        self
    }

    /// Builder: guests may invite others.
    #[must_use]
    pub fn with_guests_can_invite_others(mut self, value: bool) -> Self {
        self.guests_can_invite_others = Some(value);
        self
    }

    /// Builder: guests may see other guests.
    #[must_use]
    pub fn with_guests_can_see_other_guests(mut self, value: bool) -> Self {
        self.guests_can_see_other_guests = Some(value);
        self
    }

    /// Builder: auto-accept on invite.
    #[must_use]
    pub fn with_auto_accept(mut self, value: bool) -> Self {
        self.auto_accept = Some(value);
        self
    }

    /// Builder: private event.
    #[must_use]
    pub fn with_private_event(mut self, value: bool) -> Self {
        self.private_event = Some(value);
        self
    }

    /// Returns true if new participants should be marked as accepted.
    pub fn auto_accepts(&self) -> bool {
        self.auto_accept == Some(true)
    }
}

fn deserialize_flag<'de, D>(deserializer: D) -> Result<Option<bool>, D::Error>
where
    D: Deserializer<'de>,
{
    deserializer.deserialize_option(FlagVisitor)
}

/// Accepts native booleans and the textual spellings of [`parse_flag`].
struct FlagVisitor;

impl<'de> Visitor<'de> for FlagVisitor {
    type Value = Option<bool>;

    fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("a boolean flag such as true, false, 1, 0, t or f")
    }

    fn visit_none<E: de::Error>(self) -> Result<Self::Value, E> {
        Ok(None)
    }

    fn visit_unit<E: de::Error>(self) -> Result<Self::Value, E> {
        Ok(None)
    }

    fn visit_some<D>(self, deserializer: D) -> Result<Self::Value, D::Error>
    where
        D: Deserializer<'de>,
    {
        deserializer.deserialize_any(self)
    }

    fn visit_bool<E: de::Error>(self, value: bool) -> Result<Self::Value, E> {
        Ok(Some(value))
    }

    fn visit_str<E: de::Error>(self, value: &str) -> Result<Self::Value, E> {
        parse_flag(value)
            .map(Some)
            .ok_or_else(|| E::invalid_value(de::Unexpected::Str(value), &self))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_is_all_unset() {
        let options = ConnectorOptions::new();
        assert!(options.notify_guests.is_none());
        assert!(options.guests_can_modify.is_none());
        assert!(options.guests_can_invite_others.is_none());
        assert!(options.guests_can_see_other_guests.is_none());
        assert!(options.auto_accept.is_none());
        assert!(options.private_event.is_none());
        assert!(!options.auto_accepts());
    }

    #[test]
    fn builder_methods() {
        let options = ConnectorOptions::new()
            .with_notify_guests(true)
            .with_guests_can_modify(false)
            .with_auto_accept(true)
            .with_private_event(false);

        assert_eq!(options.notify_guests, Some(true));
        assert_eq!(options.guests_can_modify, Some(false));
        assert_eq!(options.private_event, Some(false));
        assert!(options.auto_accepts());
    }

    #[test]
    fn deserialize_query_names() {
        let json = r#"{
            "broadcastChanges": true,
            "guestsCanModify": false,
            "guestsMayInvite": true,
            "guestsVisible": false,
            "guestsAutoAccept": true,
            "privateEvent": true
        }"#;

        let options: ConnectorOptions = serde_json::from_str(json).unwrap();
        assert_eq!(
            options,
            ConnectorOptions::new()
                .with_notify_guests(true)
                .with_guests_can_modify(false)
                .with_guests_can_invite_others(true)
                .with_guests_can_see_other_guests(false)
                .with_auto_accept(true)
                .with_private_event(true)
        );
    }

    #[test]
    fn deserialize_missing_flags_as_unset() {
        let options: ConnectorOptions = serde_json::from_str(r#"{"privateEvent": false}"#).unwrap();
        assert_eq!(options.private_event, Some(false));
        assert!(options.notify_guests.is_none());
    }

    #[test]
    fn parse_flag_spellings() {
        for value in ["1", "t", "T", "TRUE", "true", "True"] {
            assert_eq!(parse_flag(value), Some(true), "{value:?}");
        }
        for value in ["", "0", "f", "F", "FALSE", "false", "False"] {
            assert_eq!(parse_flag(value), Some(false), "{value:?}");
        }
        for value in ["maybe", "yes", "tRUE", "2"] {
            assert_eq!(parse_flag(value), None, "{value:?}");
        }
    }

    #[test]
    fn deserialize_textual_flags() {
        let json = r#"{"broadcastChanges": "1", "privateEvent": "t", "guestsVisible": "FALSE"}"#;
        let options: ConnectorOptions = serde_json::from_str(json).unwrap();
        assert_eq!(options.notify_guests, Some(true));
        assert_eq!(options.private_event, Some(true));
        assert_eq!(options.guests_can_see_other_guests, Some(false));
        assert!(options.auto_accept.is_none());
    }

    #[test]
    fn deserialize_rejects_unknown_spelling() {
        let result = serde_json::from_str::<ConnectorOptions>(r#"{"privateEvent": "maybe"}"#);
        assert!(result.is_err());
    }
}
