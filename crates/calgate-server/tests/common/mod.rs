//! Shared test helpers: a recording in-memory calendar service.

#![allow(dead_code)]

use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use calgate_core::Domain;
use calgate_google::{
    BoxFuture, CalendarService, EventAttendee, EventList, ListQuery, RemoteError, RemoteErrorCode,
    RemoteEvent, RemoteResult, SendUpdates,
};
use calgate_server::{CredentialRegistry, DomainCredential};

pub const DOMAIN: &str = "example.com";
pub const CALENDAR: &str = "primary";
pub const TIME_ZONE: &str = "Europe/Oslo";

/// One call received by [`FakeCalendar`].
#[derive(Debug, Clone, PartialEq)]
pub enum Call {
    Insert {
        calendar_id: String,
        event: RemoteEvent,
        send_updates: Option<SendUpdates>,
    },
    Get {
        calendar_id: String,
        event_id: String,
    },
    Patch {
        calendar_id: String,
        event_id: String,
        patch: RemoteEvent,
        send_updates: Option<SendUpdates>,
    },
    Update {
        calendar_id: String,
        event_id: String,
        event: RemoteEvent,
        send_updates: Option<SendUpdates>,
    },
    Delete {
        calendar_id: String,
        event_id: String,
        send_updates: Option<SendUpdates>,
    },
    List {
        calendar_id: String,
        query: ListQuery,
    },
}

/// In-memory [`CalendarService`] that records every call.
#[derive(Debug, Default)]
pub struct FakeCalendar {
    calls: Mutex<Vec<Call>>,
    events: Mutex<HashMap<String, RemoteEvent>>,
    listing: Mutex<EventList>,
    failure: Mutex<Option<(u16, String)>>,
}

impl FakeCalendar {
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    /// Stores an event so `get_event` can return it.
    pub fn with_event(self: Arc<Self>, event: RemoteEvent) -> Arc<Self> {
        self.events
            .lock()
            .unwrap()
            .insert(event.id().to_string(), event);
        self
    }

    /// Sets the result of `list_events`.
    pub fn with_listing(self: Arc<Self>, listing: EventList) -> Arc<Self> {
        *self.listing.lock().unwrap() = listing;
        self
    }

    /// Makes every call fail with the given HTTP status.
    pub fn failing(self: Arc<Self>, status: u16, body: &str) -> Arc<Self> {
        *self.failure.lock().unwrap() = Some((status, body.to_string()));
        self
    }

    pub fn calls(&self) -> Vec<Call> {
        self.calls.lock().unwrap().clone()
    }

    fn record(&self, call: Call) -> RemoteResult<()> {
        self.calls.lock().unwrap().push(call);
        match &*self.failure.lock().unwrap() {
            Some((status, body)) => Err(RemoteError::from_response(*status, body)),
            None => Ok(()),
        }
    }

    fn stored(&self, event_id: &str) -> RemoteResult<RemoteEvent> {
        self.events
            .lock()
            .unwrap()
            .get(event_id)
            .cloned()
            .ok_or_else(|| {
                RemoteError::new(RemoteErrorCode::NotFound, "API error (404): Not Found")
                    .with_status(404)
            })
    }
}

impl CalendarService for FakeCalendar {
    fn insert_event<'a>(
        &'a self,
        calendar_id: &'a str,
        event: &'a RemoteEvent,
        send_updates: Option<SendUpdates>,
    ) -> BoxFuture<'a, RemoteResult<RemoteEvent>> {
        Box::pin(async move {
            self.record(Call::Insert {
                calendar_id: calendar_id.to_string(),
                event: event.clone(),
                send_updates,
            })?;
            let mut created = event.clone();
            if created.id.is_none() {
                created.id = Some("generated0001".to_string());
            }
            Ok(created)
        })
    }

    fn get_event<'a>(
        &'a self,
        calendar_id: &'a str,
        event_id: &'a str,
    ) -> BoxFuture<'a, RemoteResult<RemoteEvent>> {
        Box::pin(async move {
            self.record(Call::Get {
                calendar_id: calendar_id.to_string(),
                event_id: event_id.to_string(),
            })?;
            self.stored(event_id)
        })
    }

    fn patch_event<'a>(
        &'a self,
        calendar_id: &'a str,
        event_id: &'a str,
        patch: &'a RemoteEvent,
        send_updates: Option<SendUpdates>,
    ) -> BoxFuture<'a, RemoteResult<RemoteEvent>> {
        Box::pin(async move {
            self.record(Call::Patch {
                calendar_id: calendar_id.to_string(),
                event_id: event_id.to_string(),
                patch: patch.clone(),
                send_updates,
            })?;
            Ok(patch.clone())
        })
    }

    fn update_event<'a>(
        &'a self,
        calendar_id: &'a str,
        event_id: &'a str,
        event: &'a RemoteEvent,
        send_updates: Option<SendUpdates>,
    ) -> BoxFuture<'a, RemoteResult<RemoteEvent>> {
        Box::pin(async move {
            self.record(Call::Update {
                calendar_id: calendar_id.to_string(),
                event_id: event_id.to_string(),
                event: event.clone(),
                send_updates,
            })?;
            Ok(event.clone())
        })
    }

    fn delete_event<'a>(
        &'a self,
        calendar_id: &'a str,
        event_id: &'a str,
        send_updates: Option<SendUpdates>,
    ) -> BoxFuture<'a, RemoteResult<()>> {
        Box::pin(async move {
            self.record(Call::Delete {
                calendar_id: calendar_id.to_string(),
                event_id: event_id.to_string(),
                send_updates,
            })
        })
    }

    fn list_events<'a>(
        &'a self,
        calendar_id: &'a str,
        query: &'a ListQuery,
    ) -> BoxFuture<'a, RemoteResult<EventList>> {
        Box::pin(async move {
            self.record(Call::List {
                calendar_id: calendar_id.to_string(),
                query: query.clone(),
            })?;
            Ok(self.listing.lock().unwrap().clone())
        })
    }
}

/// A registry with [`DOMAIN`] served by `fake`.
pub fn registry_with(fake: &Arc<FakeCalendar>) -> CredentialRegistry {
    let service: Arc<dyn CalendarService> = fake.clone();
    CredentialRegistry::from_entries([(
        Domain::new(DOMAIN),
        DomainCredential::new(service, CALENDAR, TIME_ZONE),
    )])
}

/// A stored event with the given attendees.
pub fn event_with_attendees(id: &str, attendees: Vec<EventAttendee>) -> RemoteEvent {
    RemoteEvent {
        id: Some(id.to_string()),
        summary: Some("Sprint review".to_string()),
        attendees: Some(attendees),
        ..RemoteEvent::default()
    }
}
