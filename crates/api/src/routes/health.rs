use axum::extract::State;
use axum::routing::get;
use axum::{Json, Router};
use serde::Serialize;

use crate::state::AppState;

#[derive(Debug, Serialize)]
pub struct HealthResponse {
    /// `ok`, or `degraded` when the note store does not answer.
    pub status: &'static str,
    pub version: &'static str,
    pub store_healthy: bool,
    /// Open WebSocket connections, joined or not.
    pub connections: usize,
    /// Members of the shared channel.
    pub members: usize,
}

/// GET /health
async fn health(State(state): State<AppState>) -> Json<HealthResponse> {
    let store_healthy = match state.store.health_check().await {
        Ok(()) => true,
        Err(e) => {
            tracing::warn!(error = %e, "Note store health check failed");
            false
        }
    };

    Json(HealthResponse {
        status: if store_healthy { "ok" } else { "degraded" },
        version: env!("CARGO_PKG_VERSION"),
        store_healthy,
        connections: state.ws_manager.connection_count().await,
        members: state
            .ws_manager
            .member_count(state.broadcaster.channel())
            .await,
    })
}

/// Mounted at the root, outside `/api/v1`.
pub fn router() -> Router<AppState> {
    Router::new().route("/health", get(health))
}
