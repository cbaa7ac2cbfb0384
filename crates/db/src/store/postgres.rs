use async_trait::async_trait;
use noteroom_core::filter::NoteFilter;
use noteroom_core::note::{NewNote, Note};
use noteroom_core::types::DbId;

use crate::models::note::NoteRow;
use crate::repositories::NoteRepo;
use crate::store::{NoteStore, StoreError};
use crate::DbPool;

/// [`NoteStore`] backed by the `notes` table.
#[derive(Clone)]
pub struct PgNoteStore {
    pool: DbPool,
}

impl PgNoteStore {
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

fn to_note(row: NoteRow) -> Result<Note, StoreError> {
    let id = row.id;
    Note::try_from(row).map_err(|e| {
        tracing::error!(note_id = id, error = %e, "Stored note failed to decode");
        StoreError::Corrupt {
            id,
            reason: e.to_string(),
        }
    })
}

#[async_trait]
impl NoteStore for PgNoteStore {
    async fn insert(&self, note: NewNote) -> Result<Note, StoreError> {
        let row = NoteRepo::create(&self.pool, &note).await?;
        to_note(row)
    }

    async fn replace(&self, id: DbId, note: NewNote) -> Result<Note, StoreError> {
        let row = NoteRepo::replace(&self.pool, id, &note)
            .await?
            .ok_or(StoreError::NotFound { id })?;
        to_note(row)
    }

    async fn remove(&self, id: DbId) -> Result<(), StoreError> {
        if NoteRepo::delete(&self.pool, id).await? {
            Ok(())
        } else {
            Err(StoreError::NotFound { id })
        }
    }

    async fn query_ordered(&self, filter: &NoteFilter) -> Result<Vec<Note>, StoreError> {
        NoteRepo::list_filtered(&self.pool, filter)
            .await?
            .into_iter()
            .map(to_note)
            .collect()
    }

    async fn count(&self) -> Result<i64, StoreError> {
        Ok(NoteRepo::count(&self.pool).await?)
    }

    async fn health_check(&self) -> Result<(), StoreError> {
        Ok(crate::health_check(&self.pool).await?)
    }
}

#[cfg(test)]
mod tests {
    use assert_matches::assert_matches;
    use chrono::Utc;
    use sqlx::types::Json;

    use super::*;

    fn row(priority: &str) -> NoteRow {
        let now = Utc::now();
        NoteRow {
            id: 9,
            room: "app".into(),
            note: "body".into(),
            created_by: "user01".into(),
            contributed_by: vec!["user01".into()],
            history: Json(vec![]),
            priority: priority.into(),
            created_at: now,
            updated_at: now,
        }
    }

    #[test]
    fn decodable_row_becomes_note() {
        let note = to_note(row("Medium")).unwrap();
        assert_eq!(note.id, 9);
        assert_eq!(note.priority.as_str(), "Medium");
    }

    #[test]
    fn undecodable_row_is_corrupt() {
        assert_matches!(to_note(row("Urgent")), Err(StoreError::Corrupt { id: 9, .. }));
    }
}
