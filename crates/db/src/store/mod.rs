//! The note store capability.
//!
//! Everything outside this crate talks to the collection through
//! [`NoteStore`]. The store assigns ids and timestamps; callers never
//! mutate notes except through `insert`, `replace` and `remove`.

use async_trait::async_trait;
use noteroom_core::error::CoreError;
use noteroom_core::filter::NoteFilter;
use noteroom_core::note::{NewNote, Note};
use noteroom_core::types::DbId;

mod memory;
mod postgres;

pub use memory::MemoryNoteStore;
pub use postgres::PgNoteStore;

/// Failure of a store operation.
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error("Note with id {id} not found")]
    NotFound { id: DbId },

    #[error("Persistence error: {0}")]
    Persistence(String),

    /// A stored note no longer satisfies the note invariants.
    #[error("Stored note {id} is corrupt: {reason}")]
    Corrupt { id: DbId, reason: String },
}

impl From<sqlx::Error> for StoreError {
    fn from(err: sqlx::Error) -> Self {
        StoreError::Persistence(err.to_string())
    }
}

impl From<StoreError> for CoreError {
    fn from(err: StoreError) -> Self {
        match err {
            StoreError::NotFound { id } => CoreError::NotFound { entity: "Note", id },
            StoreError::Persistence(msg) => CoreError::Persistence(msg),
            StoreError::Corrupt { id, reason } => {
                CoreError::Internal(format!("note {id} failed to decode: {reason}"))
            }
        }
    }
}

/// Owner of the note collection.
#[async_trait]
pub trait NoteStore: Send + Sync {
    /// Persist a new note; the returned note carries its id and timestamps.
    async fn insert(&self, note: NewNote) -> Result<Note, StoreError>;

    /// Replace every mutable field of note `id`, refreshing `updated_at`.
    async fn replace(&self, id: DbId, note: NewNote) -> Result<Note, StoreError>;

    async fn remove(&self, id: DbId) -> Result<(), StoreError>;

    /// Notes matching `filter`, in its order, truncated to its limit.
    async fn query_ordered(&self, filter: &NoteFilter) -> Result<Vec<Note>, StoreError>;

    /// Total number of notes, irrespective of any filter.
    async fn count(&self) -> Result<i64, StoreError>;

    async fn health_check(&self) -> Result<(), StoreError>;
}
