//! The note entity, the inbound mutation payload, and payload validation.

use serde::{Deserialize, Serialize};

use crate::catalog::{is_known_author_id, Priority};
use crate::error::CoreError;
use crate::types::{DbId, Timestamp};

/// Maximum length of a note body in characters.
pub const MAX_NOTE_LENGTH: usize = 10_000;

/// A stored note, as returned by the store and sent to clients.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Note {
    pub id: DbId,
    pub room: String,
    pub note: String,
    pub created_by: String,
    pub contributed_by: Vec<String>,
    /// Opaque prior states. Stored and returned as-is.
    pub history: Vec<serde_json::Value>,
    pub priority: Priority,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

/// The mutable fields of a note, validated and ready for the store.
///
/// Used for both inserts and full replaces; the store owns `id` and both
/// timestamps.
#[derive(Debug, Clone, PartialEq)]
pub struct NewNote {
    pub room: String,
    pub note: String,
    pub created_by: String,
    pub contributed_by: Vec<String>,
    pub history: Vec<serde_json::Value>,
    pub priority: Priority,
}

/// A note as sent by a client in `add_note` / `edit_note`.
///
/// Clients echo back whole notes, so `createdAt`/`updatedAt` may be present;
/// they are ignored because the store assigns timestamps.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NotePayload {
    #[serde(default)]
    pub id: Option<DbId>,
    #[serde(default)]
    pub room: Option<String>,
    pub note: String,
    pub created_by: String,
    #[serde(default)]
    pub contributed_by: Vec<String>,
    #[serde(default)]
    pub history: Vec<serde_json::Value>,
    pub priority: Priority,
}

impl NotePayload {
    /// Validate the payload and convert it into store input.
    ///
    /// A missing or empty `room` falls back to `default_room`.
    pub fn into_new_note(self, default_room: &str) -> Result<NewNote, CoreError> {
        validate_note_body(&self.note)?;
        validate_author_refs(&self.created_by, &self.contributed_by)?;

        let room = match self.room {
            Some(r) if !r.trim().is_empty() => r,
            _ => default_room.to_string(),
        };

        Ok(NewNote {
            room,
            note: self.note,
            created_by: self.created_by,
            contributed_by: self.contributed_by,
            history: self.history,
            priority: self.priority,
        })
    }

    /// The target id of an `edit_note`; absent ids are a validation error.
    pub fn require_id(&self) -> Result<DbId, CoreError> {
        self.id
            .ok_or_else(|| CoreError::Validation("Note id is required for edit".to_string()))
    }
}

/// Note body must be non-empty and within the length limit.
pub fn validate_note_body(body: &str) -> Result<(), CoreError> {
    if body.trim().is_empty() {
        return Err(CoreError::Validation("Note cannot be empty".to_string()));
    }
    if body.chars().count() > MAX_NOTE_LENGTH {
        return Err(CoreError::Validation(format!(
            "Note exceeds maximum length of {MAX_NOTE_LENGTH} characters"
        )));
    }
    Ok(())
}

/// `createdBy` and every `contributedBy` entry must be known author ids.
pub fn validate_author_refs(created_by: &str, contributed_by: &[String]) -> Result<(), CoreError> {
    if !is_known_author_id(created_by) {
        return Err(CoreError::Validation(format!(
            "createdBy '{created_by}' is not a known author id"
        )));
    }
    if let Some(unknown) = contributed_by.iter().find(|id| !is_known_author_id(id)) {
        return Err(CoreError::Validation(format!(
            "contributedBy entry '{unknown}' is not a known author id"
        )));
    }
    Ok(())
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
