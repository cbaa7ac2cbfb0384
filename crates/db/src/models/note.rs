//! Note row model.

use noteroom_core::catalog::Priority;
use noteroom_core::note::Note;
use noteroom_core::types::{DbId, Timestamp};
use sqlx::types::Json;
use sqlx::FromRow;

/// A row from the `notes` table.
///
/// `priority` is stored as its label and parsed on the way out.
#[derive(Debug, Clone, FromRow)]
pub struct NoteRow {
    pub id: DbId,
    pub room: String,
    pub note: String,
    pub created_by: String,
    pub contributed_by: Vec<String>,
    pub history: Json<Vec<serde_json::Value>>,
    pub priority: String,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

impl TryFrom<NoteRow> for Note {
    type Error = noteroom_core::error::CoreError;

    fn try_from(row: NoteRow) -> Result<Self, Self::Error> {
        Ok(Note {
            id: row.id,
            room: row.room,
            note: row.note,
            created_by: row.created_by,
            contributed_by: row.contributed_by,
            history: row.history.0,
            priority: Priority::from_label(&row.priority)?,
            created_at: row.created_at,
            updated_at: row.updated_at,
        })
    }
}
