//! The calendar service seam.
//!
//! [`CalendarService`] is the narrow interface the event connector talks to.
//! [`GoogleCalendarClient`](crate::GoogleCalendarClient) implements it over
//! HTTP; tests substitute recording fakes.

use std::future::Future;
use std::pin::Pin;

use crate::error::RemoteResult;
use crate::types::{EventList, ListQuery, RemoteEvent, SendUpdates};

/// A boxed future for async trait methods.
///
/// Boxing keeps the trait object-safe so the registry can hold
/// `Arc<dyn CalendarService>`.
pub type BoxFuture<'a, T> = Pin<Box<dyn Future<Output = T> + Send + 'a>>;

/// Event operations against one remote calendar account.
///
/// Every method names the target calendar explicitly. Mutating methods take
/// an optional [`SendUpdates`]; `None` leaves the remote default in place.
pub trait CalendarService: Send + Sync {
    /// Creates an event and returns the stored copy.
    fn insert_event<'a>(
        &'a self,
        calendar_id: &'a str,
        event: &'a RemoteEvent,
        send_updates: Option<SendUpdates>,
    ) -> BoxFuture<'a, RemoteResult<RemoteEvent>>;

    /// Fetches a single event.
    fn get_event<'a>(
        &'a self,
        calendar_id: &'a str,
        event_id: &'a str,
    ) -> BoxFuture<'a, RemoteResult<RemoteEvent>>;

    /// Applies a partial update. Only the fields present in `patch` change.
    fn patch_event<'a>(
        &'a self,
        calendar_id: &'a str,
        event_id: &'a str,
        patch: &'a RemoteEvent,
        send_updates: Option<SendUpdates>,
    ) -> BoxFuture<'a, RemoteResult<RemoteEvent>>;

    /// Replaces the event with `event`.
    fn update_event<'a>(
        &'a self,
        calendar_id: &'a str,
        event_id: &'a str,
        event: &'a RemoteEvent,
        send_updates: Option<SendUpdates>,
    ) -> BoxFuture<'a, RemoteResult<RemoteEvent>>;

    /// Deletes an event.
    fn delete_event<'a>(
        &'a self,
        calendar_id: &'a str,
        event_id: &'a str,
        send_updates: Option<SendUpdates>,
    ) -> BoxFuture<'a, RemoteResult<()>>;

    /// Lists events, following pagination until every page is fetched.
    fn list_events<'a>(
        &'a self,
        calendar_id: &'a str,
        query: &'a ListQuery,
    ) -> BoxFuture<'a, RemoteResult<EventList>>;
}
