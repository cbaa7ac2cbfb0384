use std::collections::BTreeMap;

use async_trait::async_trait;
use chrono::{Duration, Utc};
use noteroom_core::filter::NoteFilter;
use noteroom_core::note::{NewNote, Note};
use noteroom_core::types::{DbId, Timestamp};
use tokio::sync::RwLock;

use crate::store::{NoteStore, StoreError};

/// [`NoteStore`] holding the collection in process memory.
///
/// Ids come from a sequence that never rewinds, so deleted ids are never
/// handed out again. The clock is strictly monotonic at microsecond
/// resolution: two mutations never share a timestamp.
pub struct MemoryNoteStore {
    inner: RwLock<Inner>,
}

struct Inner {
    notes: BTreeMap<DbId, Note>,
    last_id: DbId,
    last_tick: Option<Timestamp>,
}

impl Inner {
    fn tick(&mut self) -> Timestamp {
        let now = Utc::now();
        let ts = match self.last_tick {
            Some(last) if now <= last => last + Duration::microseconds(1),
            _ => now,
        };
        self.last_tick = Some(ts);
        ts
    }
}

impl MemoryNoteStore {
    pub fn new() -> Self {
        Self {
            inner: RwLock::new(Inner {
                notes: BTreeMap::new(),
                last_id: 0,
                last_tick: None,
            }),
        }
    }
}

impl Default for MemoryNoteStore {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl NoteStore for MemoryNoteStore {
    async fn insert(&self, note: NewNote) -> Result<Note, StoreError> {
        let mut inner = self.inner.write().await;
        inner.last_id += 1;
        let id = inner.last_id;
        let now = inner.tick();

        let stored = Note {
            id,
            room: note.room,
            note: note.note,
            created_by: note.created_by,
            contributed_by: note.contributed_by,
            history: note.history,
            priority: note.priority,
            created_at: now,
            updated_at: now,
        };
        inner.notes.insert(id, stored.clone());
        Ok(stored)
    }

    async fn replace(&self, id: DbId, note: NewNote) -> Result<Note, StoreError> {
        let mut inner = self.inner.write().await;
        if !inner.notes.contains_key(&id) {
            return Err(StoreError::NotFound { id });
        }
        let now = inner.tick();
        let existing = inner
            .notes
            .get_mut(&id)
            .ok_or(StoreError::NotFound { id })?;

        existing.room = note.room;
        existing.note = note.note;
        existing.created_by = note.created_by;
        existing.contributed_by = note.contributed_by;
        existing.history = note.history;
        existing.priority = note.priority;
        existing.updated_at = now.max(existing.created_at);
        Ok(existing.clone())
    }

    async fn remove(&self, id: DbId) -> Result<(), StoreError> {
        self.inner
            .write()
            .await
            .notes
            .remove(&id)
            .map(|_| ())
            .ok_or(StoreError::NotFound { id })
    }

    async fn query_ordered(&self, filter: &NoteFilter) -> Result<Vec<Note>, StoreError> {
        let candidates: Vec<Note> = self.inner.read().await.notes.values().cloned().collect();
        Ok(filter.apply(candidates))
    }

    async fn count(&self) -> Result<i64, StoreError> {
        Ok(self.inner.read().await.notes.len() as i64)
    }

    async fn health_check(&self) -> Result<(), StoreError> {
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use assert_matches::assert_matches;
    use noteroom_core::catalog::Priority;
    use noteroom_core::filter::{FilterRequest, SortMode};

    use super::*;

    fn new_note(body: &str, author: &str, priority: Priority) -> NewNote {
        NewNote {
            room: "app".into(),
            note: body.into(),
            created_by: author.into(),
            contributed_by: vec![author.into()],
            history: vec![],
            priority,
        }
    }

    #[tokio::test]
    async fn insert_assigns_id_and_timestamps() {
        let store = MemoryNoteStore::new();
        let a = store.insert(new_note("a", "user01", Priority::High)).await.unwrap();
        let b = store.insert(new_note("b", "user02", Priority::Low)).await.unwrap();

        assert_eq!(a.id, 1);
        assert_eq!(b.id, 2);
        assert_eq!(a.created_at, a.updated_at);
        assert!(b.created_at > a.created_at);
        assert_eq!(store.count().await.unwrap(), 2);
    }

    #[tokio::test]
    async fn replace_refreshes_updated_at_only() {
        let store = MemoryNoteStore::new();
        let a = store.insert(new_note("a", "user01", Priority::High)).await.unwrap();

        let edited = store
            .replace(a.id, new_note("a2", "user01", Priority::Medium))
            .await
            .unwrap();

        assert_eq!(edited.id, a.id);
        assert_eq!(edited.note, "a2");
        assert_eq!(edited.priority, Priority::Medium);
        assert_eq!(edited.created_at, a.created_at);
        assert!(edited.updated_at > a.updated_at);
    }

    #[tokio::test]
    async fn replace_unknown_id_is_not_found() {
        let store = MemoryNoteStore::new();
        let result = store.replace(42, new_note("x", "user01", Priority::Low)).await;
        assert_matches!(result, Err(StoreError::NotFound { id: 42 }));
        assert_eq!(store.count().await.unwrap(), 0);
    }

    #[tokio::test]
    async fn remove_unknown_id_is_not_found() {
        let store = MemoryNoteStore::new();
        assert_matches!(store.remove(3).await, Err(StoreError::NotFound { id: 3 }));
    }

    #[tokio::test]
    async fn ids_are_not_reused_after_delete() {
        let store = MemoryNoteStore::new();
        let a = store.insert(new_note("a", "user01", Priority::High)).await.unwrap();
        store.remove(a.id).await.unwrap();
        let b = store.insert(new_note("b", "user01", Priority::High)).await.unwrap();
        assert!(b.id > a.id);
    }

    #[tokio::test]
    async fn query_applies_filter_sort_and_limit() {
        let store = MemoryNoteStore::new();
        store.insert(new_note("cherry", "user01", Priority::High)).await.unwrap();
        store.insert(new_note("apple", "user02", Priority::High)).await.unwrap();
        store.insert(new_note("banana", "user01", Priority::Low)).await.unwrap();

        let request = FilterRequest {
            selected_priorities: vec!["High".into()],
            sort: Some("Alphabetical Order".into()),
            ..FilterRequest::default()
        };
        let filter = NoteFilter::resolve(&request).unwrap();
        let notes = store.query_ordered(&filter).await.unwrap();
        let bodies: Vec<_> = notes.iter().map(|n| n.note.as_str()).collect();
        assert_eq!(bodies, vec!["apple", "cherry"]);

        let canonical = store.query_ordered(&NoteFilter::canonical(Some(2))).await.unwrap();
        let bodies: Vec<_> = canonical.iter().map(|n| n.note.as_str()).collect();
        assert_eq!(bodies, vec!["banana", "apple"]);
    }

    #[tokio::test]
    async fn edited_note_moves_to_front_of_updated_order() {
        let store = MemoryNoteStore::new();
        let a = store.insert(new_note("a", "user01", Priority::High)).await.unwrap();
        store.insert(new_note("b", "user02", Priority::Low)).await.unwrap();
        store.insert(new_note("c", "user03", Priority::Low)).await.unwrap();

        store.replace(a.id, new_note("a", "user01", Priority::High)).await.unwrap();

        let filter = NoteFilter {
            sort: SortMode::UpdatedAt,
            ..NoteFilter::default()
        };
        let notes = store.query_ordered(&filter).await.unwrap();
        assert_eq!(notes[0].id, a.id);
    }

    #[tokio::test]
    async fn deleted_note_disappears_from_queries() {
        let store = MemoryNoteStore::new();
        let a = store.insert(new_note("a", "user01", Priority::High)).await.unwrap();
        store.insert(new_note("b", "user01", Priority::High)).await.unwrap();

        store.remove(a.id).await.unwrap();

        let notes = store.query_ordered(&NoteFilter::canonical(None)).await.unwrap();
        assert!(notes.iter().all(|n| n.id != a.id));
        assert_eq!(store.count().await.unwrap(), 1);
    }
}
