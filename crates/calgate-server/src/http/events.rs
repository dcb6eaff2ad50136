//! Event endpoints.

use axum::{
    Json, Router,
    extract::{
        Path, Query, State,
        rejection::{JsonRejection, QueryRejection},
    },
    routing::{delete, get, patch, post, put},
};
use calgate_core::{ConnectorOptions, Event, parse_flag};
use serde::Deserialize;

use crate::connector::EventConnector;
use crate::http::AppState;
use crate::http::response::{
    ApiError, ApiResult, CreatedBody, DeletedBody, EventBody, EventsBody, Outcome, SuccessBody,
};

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/{domain}/event/create", post(create_event))
        .route("/{domain}/event/delete/{id}", delete(delete_event))
        .route("/{domain}/event/update", put(update_event))
        .route("/{domain}/event/patch", patch(patch_event))
        .route(
            "/{domain}/event/participants/{event_id}/{participants}",
            post(add_participants).delete(remove_participants),
        )
        .route("/{domain}/event/get/{id}", get(get_event))
        .route("/{domain}/event/list", get(list_events))
        .route(
            "/{domain}/event/list/{start_time_min}/{end_time_max}",
            get(list_events_in_window),
        )
}

/// Query parameters of the list endpoints.
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
struct ListParams {
    start_time_min: Option<String>,
    end_time_max: Option<String>,
    show_deleted: Option<String>,
}

fn options(
    query: Result<Query<ConnectorOptions>, QueryRejection>,
    outcome: Outcome,
) -> ApiResult<ConnectorOptions> {
    query
        .map(|Query(options)| options)
        .map_err(|rejection| ApiError::bad_query(outcome, rejection.body_text()))
}

fn body(payload: Result<Json<Event>, JsonRejection>, outcome: Outcome) -> ApiResult<Event> {
    payload
        .map(|Json(event)| event)
        .map_err(|rejection| ApiError::unprocessable(outcome, rejection.body_text()))
}

/// Splits a comma-separated participant list, dropping blanks.
pub fn split_participants(raw: &str) -> Vec<String> {
    raw.split(',')
        .map(str::trim)
        .filter(|email| !email.is_empty())
        .map(String::from)
        .collect()
}

/// Reads the `showDeleted` flag. Absent or unparsable values are false.
pub fn parse_bool_lenient(value: Option<&str>) -> bool {
    value.and_then(parse_flag).unwrap_or(false)
}

/// POST /{domain}/event/create
async fn create_event(
    State(state): State<AppState>,
    Path(domain): Path<String>,
    query: Result<Query<ConnectorOptions>, QueryRejection>,
    payload: Result<Json<Event>, JsonRejection>,
) -> ApiResult<Json<CreatedBody>> {
    let event = body(payload, Outcome::Id)?;
    let options = options(query, Outcome::Id)?;

    let id = EventConnector::new(&state.registry, domain, options)
        .create_event(&event)
        .await
        .map_err(|err| ApiError::from_connector(Outcome::Id, err))?;
    Ok(CreatedBody::ok(id))
}

/// DELETE /{domain}/event/delete/{id}
async fn delete_event(
    State(state): State<AppState>,
    Path((domain, id)): Path<(String, String)>,
    query: Result<Query<ConnectorOptions>, QueryRejection>,
) -> ApiResult<Json<DeletedBody>> {
    let options = options(query, Outcome::Deleted)?;

    EventConnector::new(&state.registry, domain, options)
        .delete_event(&id)
        .await
        .map_err(|err| ApiError::from_connector(Outcome::Deleted, err))?;
    Ok(DeletedBody::ok())
}

/// PUT /{domain}/event/update
async fn update_event(
    State(state): State<AppState>,
    Path(domain): Path<String>,
    query: Result<Query<ConnectorOptions>, QueryRejection>,
    payload: Result<Json<Event>, JsonRejection>,
) -> ApiResult<Json<SuccessBody>> {
    let event = body(payload, Outcome::Success)?;
    let options = options(query, Outcome::Success)?;

    EventConnector::new(&state.registry, domain, options)
        .update_event(&event)
        .await
        .map_err(|err| ApiError::from_connector(Outcome::Success, err))?;
    Ok(SuccessBody::ok())
}

/// PATCH /{domain}/event/patch
async fn patch_event(
    State(state): State<AppState>,
    Path(domain): Path<String>,
    query: Result<Query<ConnectorOptions>, QueryRejection>,
    payload: Result<Json<Event>, JsonRejection>,
) -> ApiResult<Json<SuccessBody>> {
    let event = body(payload, Outcome::Success)?;
    let options = options(query, Outcome::Success)?;

    EventConnector::new(&state.registry, domain, options)
        .patch_event(&event)
        .await
        .map_err(|err| ApiError::from_connector(Outcome::Success, err))?;
    Ok(SuccessBody::ok())
}

/// POST /{domain}/event/participants/{event_id}/{participants}
async fn add_participants(
    State(state): State<AppState>,
    Path((domain, event_id, participants)): Path<(String, String, String)>,
    query: Result<Query<ConnectorOptions>, QueryRejection>,
) -> ApiResult<Json<SuccessBody>> {
    let options = options(query, Outcome::Success)?;

    EventConnector::new(&state.registry, domain, options)
        .add_participants(&event_id, &split_participants(&participants))
        .await
        .map_err(|err| ApiError::from_connector(Outcome::Success, err))?;
    Ok(SuccessBody::ok())
}

/// DELETE /{domain}/event/participants/{event_id}/{participants}
async fn remove_participants(
    State(state): State<AppState>,
    Path((domain, event_id, participants)): Path<(String, String, String)>,
    query: Result<Query<ConnectorOptions>, QueryRejection>,
) -> ApiResult<Json<SuccessBody>> {
    let options = options(query, Outcome::Success)?;

    EventConnector::new(&state.registry, domain, options)
        .remove_participants(&event_id, &split_participants(&participants))
        .await
        .map_err(|err| ApiError::from_connector(Outcome::Success, err))?;
    Ok(SuccessBody::ok())
}

/// GET /{domain}/event/get/{id}
async fn get_event(
    State(state): State<AppState>,
    Path((domain, id)): Path<(String, String)>,
) -> ApiResult<Json<EventBody>> {
    let event = EventConnector::new(&state.registry, domain, ConnectorOptions::new())
        .get_calendar_event(&id)
        .await
        .map_err(|err| ApiError::from_connector(Outcome::Event, err))?;
    Ok(EventBody::ok(event))
}

/// GET /{domain}/event/list?startTimeMin=&endTimeMax=&showDeleted=
async fn list_events(
    State(state): State<AppState>,
    Path(domain): Path<String>,
    query: Result<Query<ListParams>, QueryRejection>,
) -> ApiResult<Json<EventsBody>> {
    let Query(params) =
        query.map_err(|rejection| ApiError::bad_query(Outcome::Events, rejection.body_text()))?;
    list(
        &state,
        domain,
        params.start_time_min.as_deref().unwrap_or_default(),
        params.end_time_max.as_deref().unwrap_or_default(),
        parse_bool_lenient(params.show_deleted.as_deref()),
    )
    .await
}

/// GET /{domain}/event/list/{start_time_min}/{end_time_max}
async fn list_events_in_window(
    State(state): State<AppState>,
    Path((domain, time_min, time_max)): Path<(String, String, String)>,
    query: Result<Query<ListParams>, QueryRejection>,
) -> ApiResult<Json<EventsBody>> {
    let show_deleted = query
        .ok()
        .and_then(|Query(params)| params.show_deleted)
        .is_some_and(|value| parse_bool_lenient(Some(&value)));
    list(&state, domain, &time_min, &time_max, show_deleted).await
}

async fn list(
    state: &AppState,
    domain: String,
    time_min: &str,
    time_max: &str,
    show_deleted: bool,
) -> ApiResult<Json<EventsBody>> {
    let events = EventConnector::new(&state.registry, domain, ConnectorOptions::new())
        .get_events(time_min, time_max, show_deleted)
        .await
        .map_err(|err| ApiError::from_connector(Outcome::Events, err))?;
    Ok(EventsBody::ok(events))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn split_participants_trims_and_skips_blanks() {
        assert_eq!(
            split_participants("a@example.com, b@example.com,,"),
            vec!["a@example.com", "b@example.com"]
        );
        assert!(split_participants("").is_empty());
    }

    #[test]
    fn lenient_bool() {
        assert!(parse_bool_lenient(Some("true")));
        assert!(parse_bool_lenient(Some("1")));
        assert!(parse_bool_lenient(Some("T")));
        assert!(!parse_bool_lenient(Some("false")));
        assert!(!parse_bool_lenient(Some("yes")));
        assert!(!parse_bool_lenient(None));
    }
}
