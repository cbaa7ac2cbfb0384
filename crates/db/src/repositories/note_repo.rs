//! Repository for the `notes` table.

use noteroom_core::filter::{NoteFilter, SortMode};
use noteroom_core::note::NewNote;
use noteroom_core::types::DbId;
use sqlx::types::Json;
use sqlx::PgPool;

use crate::models::note::NoteRow;

/// Column list for notes queries.
const COLUMNS: &str = "id, room, note, created_by, contributed_by, history, priority, \
    created_at, updated_at";

/// ORDER BY clause for a sort mode.
///
/// Ties fall back to `id` so results are deterministic. Alphabetical order
/// uses the byte-wise "C" collation to match the in-process comparator.
fn order_clause(sort: SortMode) -> &'static str {
    match sort {
        SortMode::Alphabetical => "note COLLATE \"C\" ASC, id ASC",
        SortMode::CreatedAt => "created_at DESC, id ASC",
        SortMode::UpdatedAt | SortMode::Unspecified => "updated_at DESC, id ASC",
    }
}

/// Provides CRUD and filtered listing for notes.
pub struct NoteRepo;

impl NoteRepo {
    /// Insert a note, returning the created row with id and timestamps.
    pub async fn create(pool: &PgPool, input: &NewNote) -> Result<NoteRow, sqlx::Error> {
        let query = format!(
            "INSERT INTO notes (room, note, created_by, contributed_by, history, priority)
             VALUES ($1, $2, $3, $4, $5, $6)
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, NoteRow>(&query)
            .bind(&input.room)
            .bind(&input.note)
            .bind(&input.created_by)
            .bind(&input.contributed_by)
            .bind(Json(&input.history))
            .bind(input.priority.as_str())
            .fetch_one(pool)
            .await
    }

    /// Replace every mutable field of a note and refresh `updated_at`.
    ///
    /// Returns `None` when no note has the given id.
    pub async fn replace(
        pool: &PgPool,
        id: DbId,
        input: &NewNote,
    ) -> Result<Option<NoteRow>, sqlx::Error> {
        let query = format!(
            "UPDATE notes SET
                room = $2,
                note = $3,
                created_by = $4,
                contributed_by = $5,
                history = $6,
                priority = $7,
                updated_at = GREATEST(NOW(), created_at)
             WHERE id = $1
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, NoteRow>(&query)
            .bind(id)
            .bind(&input.room)
            .bind(&input.note)
            .bind(&input.created_by)
            .bind(&input.contributed_by)
            .bind(Json(&input.history))
            .bind(input.priority.as_str())
            .fetch_optional(pool)
            .await
    }

    /// Delete a note by ID. Returns `true` if a row was deleted.
    pub async fn delete(pool: &PgPool, id: DbId) -> Result<bool, sqlx::Error> {
        let result = sqlx::query("DELETE FROM notes WHERE id = $1")
            .bind(id)
            .execute(pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }

    /// List notes matching `filter`, ordered and limited as it specifies.
    ///
    /// Empty author/priority lists disable that predicate. A `NULL` limit
    /// is `LIMIT ALL` in PostgreSQL.
    pub async fn list_filtered(
        pool: &PgPool,
        filter: &NoteFilter,
    ) -> Result<Vec<NoteRow>, sqlx::Error> {
        let priorities: Vec<String> = filter
            .priorities
            .iter()
            .map(|p| p.as_str().to_string())
            .collect();
        let limit = filter.limit.map(|l| l as i64);

        let query = format!(
            "SELECT {COLUMNS} FROM notes
             WHERE (cardinality($1::text[]) = 0 OR created_by = ANY($1))
               AND (cardinality($2::text[]) = 0 OR priority = ANY($2))
             ORDER BY {}
             LIMIT $3",
            order_clause(filter.sort)
        );
        sqlx::query_as::<_, NoteRow>(&query)
            .bind(&filter.author_ids)
            .bind(&priorities)
            .bind(limit)
            .fetch_all(pool)
            .await
    }

    /// Total number of notes.
    pub async fn count(pool: &PgPool) -> Result<i64, sqlx::Error> {
        let row: (i64,) = sqlx::query_as("SELECT COUNT(*) FROM notes")
            .fetch_one(pool)
            .await?;
        Ok(row.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn every_sort_mode_has_a_tiebreak() {
        for mode in [
            SortMode::Alphabetical,
            SortMode::CreatedAt,
            SortMode::UpdatedAt,
            SortMode::Unspecified,
        ] {
            assert!(order_clause(mode).ends_with("id ASC"), "{mode:?}");
        }
    }

    #[test]
    fn unspecified_sort_matches_updated_at() {
        assert_eq!(
            order_clause(SortMode::Unspecified),
            order_clause(SortMode::UpdatedAt)
        );
    }
}
