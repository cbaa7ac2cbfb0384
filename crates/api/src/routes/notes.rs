//! Route definitions for note queries.

use axum::routing::{get, post};
use axum::Router;

use crate::handlers::notes;
use crate::state::AppState;

/// Note query routes.
///
/// ```text
/// GET    /notes              -> list_notes
/// POST   /filters            -> filter_notes
/// GET    /catalog            -> get_catalog
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/notes", get(notes::list_notes))
        .route("/filters", post(notes::filter_notes))
        .route("/catalog", get(notes::get_catalog))
}
