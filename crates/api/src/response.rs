//! Shared response envelope types for API handlers.
//!
//! All API responses use a `{ "data": ... }` envelope.

use noteroom_core::catalog::{priority_labels, Author, AUTHORS};
use noteroom_core::note::Note;
use serde::Serialize;

/// Standard `{ "data": T }` response envelope.
#[derive(Debug, Serialize)]
pub struct DataResponse<T: Serialize> {
    pub data: T,
}

/// Notes together with the static catalogs a client needs to render
/// filter controls.
#[derive(Debug, Serialize)]
pub struct NotesData {
    pub notes: Vec<Note>,
    pub users: &'static [Author],
    /// Total number of notes in the store, not just the ones returned.
    pub count: i64,
    pub priorities: Vec<&'static str>,
}

impl NotesData {
    pub fn new(notes: Vec<Note>, count: i64) -> Self {
        Self {
            notes,
            users: AUTHORS,
            count,
            priorities: priority_labels(),
        }
    }
}
