//! Projection of an inbound [`Event`] onto a [`RemoteEvent`].
//!
//! [`merge_into`] only writes the fields that are present in the inbound
//! event or set in the options. Everything else on the target is left as it
//! was, which is what lets a blank target serve as a patch body.

use calgate_core::{ConnectorOptions, Event, Organizer};
use calgate_google::{
    EventAttendee, EventDateTime, EventPerson, RemoteEvent, ResponseStatus, Visibility,
};

/// Merges `event` and `options` into `target`.
pub fn merge_into(
    event: &Event,
    options: &ConnectorOptions,
    time_zone: &str,
    target: &mut RemoteEvent,
) {
    if let Some(value) = options.guests_can_modify {
        target.guests_can_modify = Some(value);
    }

    if let Some(private) = options.private_event {
        target.visibility = Some(if private {
            Visibility::Private
        } else {
            Visibility::Default
        });
    }

    if let Some(value) = options.guests_can_invite_others {
        target.guests_can_invite_others = Some(value);
    }

    if let Some(value) = options.guests_can_see_other_guests {
        target.guests_can_see_other_guests = Some(value);
    }

    // An empty title is ignored; location and description may be cleared.
    if let Some(title) = event.title.as_deref().filter(|t| !t.is_empty()) {
        target.summary = Some(title.to_string());
    }

    if let Some(location) = &event.location {
        target.location = Some(location.clone());
    }

    if let Some(description) = &event.description {
        target.description = Some(description.clone());
    }

    if let Some(start) = &event.start {
        target.start = Some(EventDateTime::timed(start, time_zone));
    }

    if let Some(end) = &event.end {
        target.end = Some(EventDateTime::timed(end, time_zone));
    }

    if let Some(participants) = &event.participants {
        let status = if options.auto_accepts() {
            ResponseStatus::Accepted
        } else {
            ResponseStatus::NeedsAction
        };
        target.attendees = Some(
            participants
                .iter()
                .map(|email| EventAttendee::new(email.as_str()).with_response_status(status))
                .collect(),
        );
    }

    if let Some(organizer) = &event.organizer {
        target.organizer = Some(to_person(organizer));
    }
}

fn to_person(organizer: &Organizer) -> EventPerson {
    EventPerson {
        id: organizer.id.clone(),
        email: organizer.email.clone(),
        display_name: organizer.display_name.clone(),
        is_self: organizer.is_self,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const TZ: &str = "Europe/Oslo";

    fn populated_target() -> RemoteEvent {
        RemoteEvent {
            summary: Some("Board meeting".into()),
            description: Some("Quarterly numbers".into()),
            location: Some("Room 4".into()),
            start: Some(EventDateTime::timed("2024-05-02T09:00:00", TZ)),
            end: Some(EventDateTime::timed("2024-05-02T10:00:00", TZ)),
            visibility: Some(Visibility::Public),
            ..RemoteEvent::default()
        }
    }

    #[test]
    fn empty_description_clears_only_description() {
        let mut target = populated_target();
        let event = Event::new().with_description("");

        merge_into(&event, &ConnectorOptions::new(), TZ, &mut target);

        assert_eq!(target.description.as_deref(), Some(""));
        assert_eq!(target.summary.as_deref(), Some("Board meeting"));
        assert_eq!(target.location.as_deref(), Some("Room 4"));
        assert_eq!(
            target.start,
            Some(EventDateTime::timed("2024-05-02T09:00:00", TZ))
        );
        assert_eq!(
            target.end,
            Some(EventDateTime::timed("2024-05-02T10:00:00", TZ))
        );
    }

    #[test]
    fn empty_title_is_ignored() {
        let mut target = populated_target();
        merge_into(
            &Event::new().with_title(""),
            &ConnectorOptions::new(),
            TZ,
            &mut target,
        );
        assert_eq!(target.summary.as_deref(), Some("Board meeting"));
    }

    #[test]
    fn empty_location_clears_location() {
        let mut target = populated_target();
        merge_into(
            &Event::new().with_location(""),
            &ConnectorOptions::new(),
            TZ,
            &mut target,
        );
        assert_eq!(target.location.as_deref(), Some(""));
    }

    #[test]
    fn visibility_mapping() {
        let mut target = populated_target();
        merge_into(
            &Event::new(),
            &ConnectorOptions::new().with_private_event(true),
            TZ,
            &mut target,
        );
        assert_eq!(target.visibility, Some(Visibility::Private));

        merge_into(
            &Event::new(),
            &ConnectorOptions::new().with_private_event(false),
            TZ,
            &mut target,
        );
        assert_eq!(target.visibility, Some(Visibility::Default));

        let mut target = populated_target();
        merge_into(&Event::new(), &ConnectorOptions::new(), TZ, &mut target);
        assert_eq!(target.visibility, Some(Visibility::Public));
    }

    #[test]
    fn guest_flags_copied_when_set() {
        let mut target = RemoteEvent::default();
        let options = ConnectorOptions::new()
            .with_guests_can_modify(true)
            .with_guests_can_invite_others(false)
            .with_guests_can_see_other_guests(true);

        merge_into(&Event::new(), &options, TZ, &mut target);

        assert_eq!(target.guests_can_modify, Some(true));
        assert_eq!(target.guests_can_invite_others, Some(false));
        assert_eq!(target.guests_can_see_other_guests, Some(true));
    }

    #[test]
    fn unset_flags_leave_target_alone() {
        let mut target = RemoteEvent {
            guests_can_modify: Some(true),
            ..RemoteEvent::default()
        };
        merge_into(&Event::new(), &ConnectorOptions::new(), TZ, &mut target);
        assert_eq!(target.guests_can_modify, Some(true));
        assert!(target.guests_can_invite_others.is_none());
        assert!(target.attendees.is_none());
    }

    #[test]
    fn times_carry_time_zone() {
        let mut target = RemoteEvent::default();
        let event = Event::new().with_times("2024-06-01T12:00:00", "2024-06-01T13:00:00");

        merge_into(&event, &ConnectorOptions::new(), "UTC", &mut target);

        let start = target.start.unwrap();
        assert_eq!(start.date_time.as_deref(), Some("2024-06-01T12:00:00"));
        assert_eq!(start.time_zone.as_deref(), Some("UTC"));
        assert!(start.date.is_none());
        assert_eq!(
            target.end.unwrap().date_time.as_deref(),
            Some("2024-06-01T13:00:00")
        );
    }

    #[test]
    fn participants_replace_attendees() {
        let mut target = RemoteEvent {
            attendees: Some(vec![EventAttendee::new("old@example.com")]),
            ..RemoteEvent::default()
        };
        let event = Event::new().with_participants(["a@example.com", "b@example.com"]);

        merge_into(&event, &ConnectorOptions::new(), TZ, &mut target);

        let attendees = target.attendees.unwrap();
        assert_eq!(attendees.len(), 2);
        assert_eq!(attendees[0].email(), "a@example.com");
        assert_eq!(attendees[1].email(), "b@example.com");
        assert!(
            attendees
                .iter()
                .all(|a| a.response_status == Some(ResponseStatus::NeedsAction))
        );
    }

    #[test]
    fn auto_accept_marks_participants_accepted() {
        let mut target = RemoteEvent::default();
        let event = Event::new().with_participants(["a@example.com"]);

        merge_into(
            &event,
            &ConnectorOptions::new().with_auto_accept(true),
            TZ,
            &mut target,
        );

        assert_eq!(
            target.attendees.unwrap()[0].response_status,
            Some(ResponseStatus::Accepted)
        );
    }

    #[test]
    fn organizer_copied_verbatim() {
        let mut target = RemoteEvent::default();
        let organizer = Organizer {
            email: Some("boss@example.com".into()),
            display_name: Some("Boss".into()),
            ..Organizer::default()
        };

        merge_into(
            &Event::new().with_organizer(organizer),
            &ConnectorOptions::new(),
            TZ,
            &mut target,
        );

        let person = target.organizer.unwrap();
        assert_eq!(person.email.as_deref(), Some("boss@example.com"));
        assert_eq!(person.display_name.as_deref(), Some("Boss"));
        assert!(person.id.is_none());
    }
}
