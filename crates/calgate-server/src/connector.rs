//! The event connector.
//!
//! An [`EventConnector`] is bound to one domain and one set of
//! [`ConnectorOptions`] and performs a single calendar operation on behalf of
//! a request. Input is validated before the registry is consulted, and the
//! registry is consulted before any remote call, so user errors never reach
//! the remote service.

use std::collections::HashSet;
use std::future::Future;

use calgate_core::{
    ConnectorError, ConnectorOptions, ConnectorResult, Domain, ErrorClass, Event,
    is_valid_event_id,
};
use calgate_google::{EventAttendee, EventList, ListQuery, RemoteEvent, SendUpdates};
use tracing::{debug, error, warn};

use crate::merge::merge_into;
use crate::registry::{CredentialRegistry, DomainCredential};

/// Performs calendar operations for one domain.
#[derive(Debug)]
pub struct EventConnector<'r> {
    registry: &'r CredentialRegistry,
    domain: Domain,
    options: ConnectorOptions,
}

impl<'r> EventConnector<'r> {
    /// Creates a connector bound to `domain`.
    ///
    /// The domain is resolved lazily; an unknown domain surfaces as
    /// [`ErrorKind::DomainUnknown`](calgate_core::ErrorKind::DomainUnknown)
    /// from whichever operation is invoked.
    pub fn new(
        registry: &'r CredentialRegistry,
        domain: impl Into<Domain>,
        options: ConnectorOptions,
    ) -> Self {
        Self {
            registry,
            domain: domain.into(),
            options,
        }
    }

    /// Creates an event and returns its remote id.
    ///
    /// Title, start and end are required. A caller-supplied id must be 5 to
    /// 1024 characters of lowercase letters and digits.
    pub async fn create_event(&self, event: &Event) -> ConnectorResult<String> {
        self.observe("create_event", async {
            event.validate_complete()?;
            if event.id.as_deref().is_some_and(|id| !is_valid_event_id(id)) {
                return Err(ConnectorError::invalid_id());
            }

            let credential = self.credential()?;
            let mut remote = RemoteEvent {
                id: event.id.clone(),
                ..RemoteEvent::default()
            };
            merge_into(event, &self.options, credential.time_zone(), &mut remote);

            let created = credential
                .service()
                .insert_event(credential.calendar_id(), &remote, self.send_updates())
                .await
                .map_err(ConnectorError::remote)?;
            debug!(event_id = created.id(), "event created");
            Ok(created.id().to_string())
        })
        .await
    }

    /// Deletes the event with `event_id`.
    pub async fn delete_event(&self, event_id: &str) -> ConnectorResult<()> {
        self.observe("delete_event", async {
            let event_id = require_id(event_id)?;
            let credential = self.credential()?;
            credential
                .service()
                .delete_event(credential.calendar_id(), event_id, self.send_updates())
                .await
                .map_err(ConnectorError::remote)
        })
        .await
    }

    /// Replaces the event named by `event.id`.
    ///
    /// The remote event is rebuilt from `event` alone, so title, start and
    /// end are required just as for creation.
    pub async fn update_event(&self, event: &Event) -> ConnectorResult<()> {
        self.observe("update_event", async {
            let event_id = event.target_id().ok_or_else(ConnectorError::missing_event_id)?;
            event.validate_complete()?;

            let credential = self.credential()?;
            let mut remote = RemoteEvent::default();
            merge_into(event, &self.options, credential.time_zone(), &mut remote);

            credential
                .service()
                .update_event(
                    credential.calendar_id(),
                    event_id,
                    &remote,
                    self.send_updates(),
                )
                .await
                .map_err(ConnectorError::remote)?;
            Ok(())
        })
        .await
    }

    /// Changes only the fields present in `event` on the event named by
    /// `event.id`.
    pub async fn patch_event(&self, event: &Event) -> ConnectorResult<()> {
        self.observe("patch_event", async {
            let event_id = event.target_id().ok_or_else(ConnectorError::missing_event_id)?;

            let credential = self.credential()?;
            let mut patch = RemoteEvent::default();
            merge_into(event, &self.options, credential.time_zone(), &mut patch);

            credential
                .service()
                .patch_event(
                    credential.calendar_id(),
                    event_id,
                    &patch,
                    self.send_updates(),
                )
                .await
                .map_err(ConnectorError::remote)?;
            Ok(())
        })
        .await
    }

    /// Removes every attendee whose email is in `emails`.
    ///
    /// A non-empty remainder is written with a patch carrying only the
    /// attendee list. An empty remainder needs a full update of the fetched
    /// event, because a patch with an empty list leaves attendees unchanged.
    pub async fn remove_participants(
        &self,
        event_id: &str,
        emails: &[String],
    ) -> ConnectorResult<()> {
        self.observe("remove_participants", async {
            let event_id = require_id(event_id)?;
            let credential = self.credential()?;
            let service = credential.service();
            let calendar_id = credential.calendar_id();

            let to_remove: HashSet<&str> = emails
                .iter()
                .map(String::as_str)
                .filter(|email| !email.is_empty())
                .collect();

            let mut existing = service
                .get_event(calendar_id, event_id)
                .await
                .map_err(ConnectorError::remote)?;

            let remaining: Vec<EventAttendee> = existing
                .attendees()
                .iter()
                .filter(|attendee| !to_remove.contains(attendee.email()))
                .cloned()
                .collect();

            if remaining.is_empty() {
                debug!("attendee list empty, replacing event");
                existing.attendees = Some(Vec::new());
                service
                    .update_event(calendar_id, event_id, &existing, self.send_updates())
                    .await
                    .map_err(ConnectorError::remote)?;
            } else {
                let patch = RemoteEvent {
                    attendees: Some(remaining),
                    ..RemoteEvent::default()
                };
                service
                    .patch_event(calendar_id, event_id, &patch, self.send_updates())
                    .await
                    .map_err(ConnectorError::remote)?;
            }
            Ok(())
        })
        .await
    }

    /// Appends every email in `emails` that is not already an attendee.
    ///
    /// Existing attendees keep their order and response state. New attendees
    /// are added without a response status.
    pub async fn add_participants(&self, event_id: &str, emails: &[String]) -> ConnectorResult<()> {
        self.observe("add_participants", async {
            let event_id = require_id(event_id)?;
            let credential = self.credential()?;
            let service = credential.service();
            let calendar_id = credential.calendar_id();

            let existing = service
                .get_event(calendar_id, event_id)
                .await
                .map_err(ConnectorError::remote)?;

            let mut attendees = existing.attendees().to_vec();
            let mut seen: HashSet<String> =
                attendees.iter().map(|a| a.email().to_string()).collect();
            for email in emails.iter().filter(|email| !email.is_empty()) {
                if seen.insert(email.clone()) {
                    attendees.push(EventAttendee::new(email.as_str()));
                }
            }

            let patch = RemoteEvent {
                attendees: Some(attendees),
                ..RemoteEvent::default()
            };
            service
                .patch_event(calendar_id, event_id, &patch, self.send_updates())
                .await
                .map_err(ConnectorError::remote)?;
            Ok(())
        })
        .await
    }

    /// Fetches one event from the remote calendar.
    pub async fn get_calendar_event(&self, event_id: &str) -> ConnectorResult<RemoteEvent> {
        self.observe("get_calendar_event", async {
            let event_id = require_id(event_id)?;
            let credential = self.credential()?;
            credential
                .service()
                .get_event(credential.calendar_id(), event_id)
                .await
                .map_err(ConnectorError::remote)
        })
        .await
    }

    /// Lists events between `time_min` and `time_max`.
    ///
    /// An empty bound is unbounded on that side. Recurring events are always
    /// expanded into single instances.
    pub async fn get_events(
        &self,
        time_min: &str,
        time_max: &str,
        show_deleted: bool,
    ) -> ConnectorResult<EventList> {
        self.observe("get_events", async {
            let credential = self.credential()?;

            let mut query = ListQuery::new().with_show_deleted(show_deleted);
            if !time_min.is_empty() {
                query = query.with_time_min(time_min);
            }
            if !time_max.is_empty() {
                query = query.with_time_max(time_max);
            }

            credential
                .service()
                .list_events(credential.calendar_id(), &query)
                .await
                .map_err(ConnectorError::remote)
        })
        .await
    }

    fn credential(&self) -> ConnectorResult<&'r DomainCredential> {
        self.registry
            .lookup(&self.domain)
            .ok_or_else(ConnectorError::domain_unknown)
    }

    fn send_updates(&self) -> Option<SendUpdates> {
        SendUpdates::from_flag(self.options.notify_guests)
    }

    /// Runs one operation and logs its outcome by error class.
    async fn observe<T, F>(&self, operation: &'static str, work: F) -> ConnectorResult<T>
    where
        F: Future<Output = ConnectorResult<T>>,
    {
        let result = work.await;
        match &result {
            Ok(_) => debug!(domain = %self.domain, operation, "operation succeeded"),
            Err(err) if err.class() == ErrorClass::User => warn!(
                domain = %self.domain,
                operation,
                kind = %err.kind(),
                "rejected: {}",
                err
            ),
            Err(err) => error!(
                domain = %self.domain,
                operation,
                "remote call failed: {}",
                err
            ),
        }
        result
    }
}

fn require_id(event_id: &str) -> ConnectorResult<&str> {
    if event_id.is_empty() {
        Err(ConnectorError::missing_event_id())
    } else {
        Ok(event_id)
    }
}
