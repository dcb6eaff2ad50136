//! Response envelopes and error mapping.
//!
//! Every endpoint answers with a two-field JSON object: the payload under an
//! endpoint-specific key and an `error` string that is `null` on success. A
//! failure keeps the payload key but fills it with the empty value.

use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use calgate_core::{ConnectorError, ErrorClass};
use calgate_google::{EventList, RemoteEvent};
use serde::{Deserialize, Serialize};
use tracing::{error, warn};

/// Body of `POST /{domain}/event/create`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CreatedBody {
    pub id: String,
    pub error: Option<String>,
}

/// Body of `DELETE /{domain}/event/delete/{id}`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DeletedBody {
    pub deleted: bool,
    pub error: Option<String>,
}

/// Body of the update, patch and participant endpoints.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SuccessBody {
    pub success: bool,
    pub error: Option<String>,
}

/// Body of `GET /{domain}/event/get/{id}`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EventBody {
    pub event: Option<RemoteEvent>,
    pub error: Option<String>,
}

/// Body of the list endpoints.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EventsBody {
    pub events: Option<EventList>,
    pub error: Option<String>,
}

impl CreatedBody {
    pub fn ok(id: impl Into<String>) -> Json<Self> {
        Json(Self {
            id: id.into(),
            error: None,
        })
    }
}

impl DeletedBody {
    pub fn ok() -> Json<Self> {
        Json(Self {
            deleted: true,
            error: None,
        })
    }
}

impl SuccessBody {
    pub fn ok() -> Json<Self> {
        Json(Self {
            success: true,
            error: None,
        })
    }
}

impl EventBody {
    pub fn ok(event: RemoteEvent) -> Json<Self> {
        Json(Self {
            event: Some(event),
            error: None,
        })
    }
}

impl EventsBody {
    pub fn ok(events: EventList) -> Json<Self> {
        Json(Self {
            events: Some(events),
            error: None,
        })
    }
}

/// Which envelope a failed request answers with.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Outcome {
    Id,
    Deleted,
    Success,
    Event,
    Events,
}

/// A failed request, rendered as the endpoint's envelope.
#[derive(Debug)]
pub struct ApiError {
    outcome: Outcome,
    status: StatusCode,
    message: String,
}

impl ApiError {
    /// Creates an error with an explicit status.
    pub fn new(outcome: Outcome, status: StatusCode, message: impl Into<String>) -> Self {
        Self {
            outcome,
            status,
            message: message.into(),
        }
    }

    /// Maps a connector failure: user errors are 400, everything else 500.
    pub fn from_connector(outcome: Outcome, err: ConnectorError) -> Self {
        let status = match err.class() {
            ErrorClass::User => StatusCode::BAD_REQUEST,
            ErrorClass::Infrastructure => StatusCode::INTERNAL_SERVER_ERROR,
        };
        Self::new(outcome, status, err.to_string())
    }

    /// The request body could not be decoded.
    pub fn unprocessable(outcome: Outcome, message: impl Into<String>) -> Self {
        Self::new(outcome, StatusCode::UNPROCESSABLE_ENTITY, message)
    }

    /// The query string could not be decoded.
    pub fn bad_query(outcome: Outcome, message: impl Into<String>) -> Self {
        Self::new(outcome, StatusCode::BAD_REQUEST, message)
    }

    pub fn status(&self) -> StatusCode {
        self.status
    }

    pub fn message(&self) -> &str {
        &self.message
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        if self.status.is_server_error() {
            error!(status = %self.status, "request failed: {}", self.message);
        } else {
            warn!(status = %self.status, "request rejected: {}", self.message);
        }

        let error = Some(self.message);
        match self.outcome {
            Outcome::Id => (
                self.status,
                Json(CreatedBody {
                    id: String::new(),
                    error,
                }),
            )
                .into_response(),
            Outcome::Deleted => (
                self.status,
                Json(DeletedBody {
                    deleted: false,
                    error,
                }),
            )
                .into_response(),
            Outcome::Success => (
                self.status,
                Json(SuccessBody {
                    success: false,
                    error,
                }),
            )
                .into_response(),
            Outcome::Event => (self.status, Json(EventBody { event: None, error })).into_response(),
            Outcome::Events => {
                (self.status, Json(EventsBody { events: None, error })).into_response()
            }
        }
    }
}

/// Result type for handlers.
pub type ApiResult<T> = Result<T, ApiError>;
