//! Handlers for the note query endpoints.
//!
//! Queries are answered to the requester only; nothing here mutates the
//! collection or touches the shared channel.

use axum::extract::rejection::JsonRejection;
use axum::extract::State;
use axum::response::IntoResponse;
use axum::Json;
use noteroom_core::catalog::{priority_labels, Author, AUTHORS};
use noteroom_core::filter::{sort_labels, FilterRequest, NoteFilter};
use serde::Serialize;

use crate::error::AppResult;
use crate::response::{DataResponse, NotesData};
use crate::state::AppState;

/// Static catalogs exposed to clients.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CatalogData {
    pub users: &'static [Author],
    pub priorities: Vec<&'static str>,
    pub sort_modes: Vec<&'static str>,
}

/// GET /notes
///
/// The canonical view (most recently updated first) plus catalogs.
pub async fn list_notes(State(state): State<AppState>) -> AppResult<impl IntoResponse> {
    let snapshot = state.broadcaster.snapshot().await?;
    Ok(Json(DataResponse {
        data: NotesData::new(snapshot.notes, snapshot.count),
    }))
}

/// POST /filters
///
/// Filter by author names and priority labels, sort, and optionally limit.
pub async fn filter_notes(
    State(state): State<AppState>,
    body: Result<Json<FilterRequest>, JsonRejection>,
) -> AppResult<impl IntoResponse> {
    let Json(request) = body?;
    let filter = NoteFilter::resolve(&request)?;
    let notes = state.store.query_ordered(&filter).await?;
    let count = state.store.count().await?;

    tracing::debug!(
        authors = filter.author_ids.len(),
        priorities = filter.priorities.len(),
        sort = ?filter.sort,
        returned = notes.len(),
        "Filter query answered"
    );

    Ok(Json(DataResponse {
        data: NotesData::new(notes, count),
    }))
}

/// GET /catalog
pub async fn get_catalog() -> impl IntoResponse {
    Json(DataResponse {
        data: CatalogData {
            users: AUTHORS,
            priorities: priority_labels(),
            sort_modes: sort_labels(),
        },
    })
}
