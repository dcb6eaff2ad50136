//! HTTP request adapter.
//!
//! Maps REST routes onto [`EventConnector`](crate::connector::EventConnector)
//! operations. Each request builds its own connector from the path domain and
//! the query-string flags; the only shared state is the read-only registry.

pub mod events;
pub mod response;

use std::sync::Arc;

use axum::{Router, http::StatusCode, routing::get};
use tokio::net::TcpListener;
use tower_http::trace::TraceLayer;
use tracing::info;

use crate::error::ServerResult;
use crate::registry::CredentialRegistry;
use crate::signals::Shutdown;

/// State shared by every handler.
#[derive(Debug, Clone)]
pub struct AppState {
    pub registry: Arc<CredentialRegistry>,
}

impl AppState {
    pub fn new(registry: CredentialRegistry) -> Self {
        Self {
            registry: Arc::new(registry),
        }
    }
}

/// Builds the application router.
pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health))
        .merge(events::router())
        .with_state(state)
        .layer(TraceLayer::new_for_http())
}

async fn health() -> StatusCode {
    StatusCode::OK
}

/// Serves the router on `listener` until `shutdown` triggers.
pub async fn serve(listener: TcpListener, state: AppState, shutdown: Shutdown) -> ServerResult<()> {
    if let Ok(addr) = listener.local_addr() {
        info!("listening on http://{}", addr);
    }
    axum::serve(listener, router(state))
        .with_graceful_shutdown(shutdown.wait())
        .await?;
    info!("server stopped");
    Ok(())
}
