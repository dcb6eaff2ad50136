//! Google Calendar API client.
//!
//! A thin REST v3 client for the events resource. Authentication comes from
//! a service-account [`TokenSource`] or, for emulators and tests, a fixed
//! bearer token.

use std::sync::Arc;

use reqwest::{RequestBuilder, StatusCode};
use serde::de::DeserializeOwned;
use tracing::{debug, warn};

use crate::config::ClientConfig;
use crate::credentials::ServiceAccountKey;
use crate::error::{RemoteError, RemoteErrorCode, RemoteResult};
use crate::service::{BoxFuture, CalendarService};
use crate::token::TokenSource;
use crate::types::{EventList, ListQuery, RemoteEvent, SendUpdates};

/// Where bearer tokens come from.
#[derive(Debug)]
enum Authorization {
    ServiceAccount(Arc<TokenSource>),
    Static(String),
}

/// Google Calendar API client.
#[derive(Debug)]
pub struct GoogleCalendarClient {
    http_client: reqwest::Client,
    base_url: String,
    authorization: Authorization,
}

impl GoogleCalendarClient {
    /// Creates a client that authenticates as the given service account.
    pub fn new(key: ServiceAccountKey, config: &ClientConfig) -> RemoteResult<Self> {
        config.validate()?;
        let tokens = TokenSource::new(key, config.subject.clone(), config.token_timeout)?;
        Self::build(config, Authorization::ServiceAccount(Arc::new(tokens)))
    }

    /// Creates a client that sends a fixed bearer token.
    pub fn with_static_token(
        token: impl Into<String>,
        config: &ClientConfig,
    ) -> RemoteResult<Self> {
        config.validate()?;
        Self::build(config, Authorization::Static(token.into()))
    }

    fn build(config: &ClientConfig, authorization: Authorization) -> RemoteResult<Self> {
        let http_client = reqwest::Client::builder()
            .timeout(config.request_timeout)
            .build()
            .map_err(|e| {
                RemoteError::internal(format!("failed to create HTTP client: {}", e)).with_source(e)
            })?;

        Ok(Self {
            http_client,
            base_url: config.api_base_url.trim_end_matches('/').to_string(),
            authorization,
        })
    }

    /// Returns the API base URL.
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn events_url(&self, calendar_id: &str) -> String {
        format!(
            "{}/calendars/{}/events",
            self.base_url,
            urlencoding::encode(calendar_id)
        )
    }

    fn event_url(&self, calendar_id: &str, event_id: &str) -> String {
        format!(
            "{}/{}",
            self.events_url(calendar_id),
            urlencoding::encode(event_id)
        )
    }

    async fn bearer_token(&self) -> RemoteResult<String> {
        match &self.authorization {
            Authorization::ServiceAccount(tokens) => tokens.access_token().await,
            Authorization::Static(token) => Ok(token.clone()),
        }
    }

    /// Sends the request and returns the raw response body on success.
    async fn send(&self, request: RequestBuilder) -> RemoteResult<String> {
        let token = self.bearer_token().await?;
        let response = request.bearer_auth(token).send().await?;
        let status = response.status();

        if status == StatusCode::TOO_MANY_REQUESTS {
            let retry_after = response
                .headers()
                .get("Retry-After")
                .and_then(|v| v.to_str().ok())
                .and_then(|s| s.parse::<u64>().ok());
            let body = response.text().await.unwrap_or_default();
            warn!("calendar API rate limit hit");
            return Err(RemoteError::new(
                RemoteErrorCode::RateLimited,
                format!(
                    "rate limit exceeded{}: {}",
                    retry_after
                        .map(|s| format!(", retry after {} seconds", s))
                        .unwrap_or_default(),
                    body.trim()
                ),
            )
            .with_status(status.as_u16()));
        }

        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(RemoteError::from_response(status.as_u16(), body));
        }

        Ok(response.text().await?)
    }

    /// Sends the request and decodes a JSON response.
    async fn send_json<T: DeserializeOwned>(&self, request: RequestBuilder) -> RemoteResult<T> {
        let body = self.send(request).await?;
        serde_json::from_str(&body).map_err(|e| {
            RemoteError::invalid_response(format!("failed to parse response: {}", e))
                .with_source(e)
        })
    }

    /// Creates an event.
    pub async fn insert(
        &self,
        calendar_id: &str,
        event: &RemoteEvent,
        send_updates: Option<SendUpdates>,
    ) -> RemoteResult<RemoteEvent> {
        let request = with_send_updates(
            self.http_client.post(self.events_url(calendar_id)).json(event),
            send_updates,
        );
        let created: RemoteEvent = self.send_json(request).await?;
        debug!("inserted event {} in calendar {}", created.id(), calendar_id);
        Ok(created)
    }

    /// Fetches one event.
    pub async fn get(&self, calendar_id: &str, event_id: &str) -> RemoteResult<RemoteEvent> {
        let request = self.http_client.get(self.event_url(calendar_id, event_id));
        self.send_json(request).await
    }

    /// Applies a partial update.
    pub async fn patch(
        &self,
        calendar_id: &str,
        event_id: &str,
        patch: &RemoteEvent,
        send_updates: Option<SendUpdates>,
    ) -> RemoteResult<RemoteEvent> {
        let request = with_send_updates(
            self.http_client
                .patch(self.event_url(calendar_id, event_id))
                .json(patch),
            send_updates,
        );
        self.send_json(request).await
    }

    /// Replaces an event.
    pub async fn update(
        &self,
        calendar_id: &str,
        event_id: &str,
        event: &RemoteEvent,
        send_updates: Option<SendUpdates>,
    ) -> RemoteResult<RemoteEvent> {
        let request = with_send_updates(
            self.http_client
                .put(self.event_url(calendar_id, event_id))
                .json(event),
            send_updates,
        );
        self.send_json(request).await
    }

    /// Deletes an event.
    pub async fn delete(
        &self,
        calendar_id: &str,
        event_id: &str,
        send_updates: Option<SendUpdates>,
    ) -> RemoteResult<()> {
        let request = with_send_updates(
            self.http_client.delete(self.event_url(calendar_id, event_id)),
            send_updates,
        );
        self.send(request).await?;
        debug!("deleted event {} from calendar {}", event_id, calendar_id);
        Ok(())
    }

    /// Lists events across every page.
    ///
    /// The returned list carries the metadata of the first page and the
    /// items of all pages; `next_page_token` is always `None`.
    pub async fn list(&self, calendar_id: &str, query: &ListQuery) -> RemoteResult<EventList> {
        let mut aggregate: Option<EventList> = None;
        let mut page_token: Option<String> = None;

        loop {
            let page = self
                .list_page(calendar_id, query, page_token.as_deref())
                .await?;
            let next = page.next_page_token.clone();

            match aggregate.as_mut() {
                Some(all) => all.items.extend(page.items),
                None => aggregate = Some(page),
            }

            match next {
                Some(token) if !token.is_empty() => page_token = Some(token),
                _ => break,
            }
        }

        let mut list = aggregate.unwrap_or_default();
        list.next_page_token = None;
        debug!(
            "fetched {} events from calendar {}",
            list.items.len(),
            calendar_id
        );
        Ok(list)
    }

    async fn list_page(
        &self,
        calendar_id: &str,
        query: &ListQuery,
        page_token: Option<&str>,
    ) -> RemoteResult<EventList> {
        let mut request = self.http_client.get(self.events_url(calendar_id)).query(&[
            ("singleEvents", "true"),
            ("showDeleted", if query.show_deleted { "true" } else { "false" }),
        ]);

        if let Some(time_min) = &query.time_min {
            request = request.query(&[("timeMin", time_min)]);
        }
        if let Some(time_max) = &query.time_max {
            request = request.query(&[("timeMax", time_max)]);
        }
        if let Some(token) = page_token {
            request = request.query(&[("pageToken", token)]);
        }

        self.send_json(request).await
    }
}

fn with_send_updates(request: RequestBuilder, send_updates: Option<SendUpdates>) -> RequestBuilder {
    match send_updates {
        Some(value) => request.query(&[("sendUpdates", value.as_str())]),
        None => request,
    }
}

impl CalendarService for GoogleCalendarClient {
    fn insert_event<'a>(
        &'a self,
        calendar_id: &'a str,
        event: &'a RemoteEvent,
        send_updates: Option<SendUpdates>,
    ) -> BoxFuture<'a, RemoteResult<RemoteEvent>> {
        Box::pin(self.insert(calendar_id, event, send_updates))
    }

    fn get_event<'a>(
        &'a self,
        calendar_id: &'a str,
        event_id: &'a str,
    ) -> BoxFuture<'a, RemoteResult<RemoteEvent>> {
        Box::pin(self.get(calendar_id, event_id))
    }

    fn patch_event<'a>(
        &'a self,
        calendar_id: &'a str,
        event_id: &'a str,
        patch: &'a RemoteEvent,
        send_updates: Option<SendUpdates>,
    ) -> BoxFuture<'a, RemoteResult<RemoteEvent>> {
        Box::pin(self.patch(calendar_id, event_id, patch, send_updates))
    }

    fn update_event<'a>(
        &'a self,
        calendar_id: &'a str,
        event_id: &'a str,
        event: &'a RemoteEvent,
        send_updates: Option<SendUpdates>,
    ) -> BoxFuture<'a, RemoteResult<RemoteEvent>> {
        Box::pin(self.update(calendar_id, event_id, event, send_updates))
    }

    fn delete_event<'a>(
        &'a self,
        calendar_id: &'a str,
        event_id: &'a str,
        send_updates: Option<SendUpdates>,
    ) -> BoxFuture<'a, RemoteResult<()>> {
        Box::pin(self.delete(calendar_id, event_id, send_updates))
    }

    fn list_events<'a>(
        &'a self,
        calendar_id: &'a str,
        query: &'a ListQuery,
    ) -> BoxFuture<'a, RemoteResult<EventList>> {
        Box::pin(self.list(calendar_id, query))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn client() -> GoogleCalendarClient {
        let config = ClientConfig::new().with_api_base_url("http://localhost:1/calendar/v3/");
        GoogleCalendarClient::with_static_token("token", &config).unwrap()
    }

    #[test]
    fn urls_are_percent_encoded() {
        let client = client();
        assert_eq!(client.base_url(), "http://localhost:1/calendar/v3");
        assert_eq!(
            client.events_url("team@group.calendar.google.com"),
            "http://localhost:1/calendar/v3/calendars/team%40group.calendar.google.com/events"
        );
        assert_eq!(
            client.event_url("primary", "abc 123"),
            "http://localhost:1/calendar/v3/calendars/primary/events/abc%20123"
        );
    }

    #[test]
    fn rejects_invalid_config() {
        let config = ClientConfig::new().with_api_base_url("::");
        assert!(GoogleCalendarClient::with_static_token("t", &config).is_err());
    }
}
