pub mod health;
pub mod notes;

use axum::routing::get;
use axum::Router;

use crate::state::AppState;
use crate::ws;

/// Build the `/api/v1` route tree.
///
/// ```text
/// /ws                 WebSocket (shared room)
/// /notes              canonical view (GET)
/// /filters            filtered query (POST)
/// /catalog            authors, priorities, sort modes (GET)
/// ```
pub fn api_routes() -> Router<AppState> {
    Router::new()
        .route("/ws", get(ws::ws_handler))
        .merge(notes::router())
}
