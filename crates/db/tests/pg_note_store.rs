//! Integration tests for `PgNoteStore` against a real database.
//!
//! Run with `DATABASE_URL` pointing at a disposable PostgreSQL server and
//! `cargo test -- --ignored`.

use assert_matches::assert_matches;
use noteroom_core::catalog::Priority;
use noteroom_core::filter::{FilterRequest, NoteFilter};
use noteroom_core::note::NewNote;
use noteroom_db::{NoteStore, PgNoteStore, StoreError};
use sqlx::PgPool;

fn new_note(body: &str, author: &str, priority: Priority) -> NewNote {
    NewNote {
        room: "app".to_string(),
        note: body.to_string(),
        created_by: author.to_string(),
        contributed_by: vec![author.to_string()],
        history: vec![serde_json::json!({"note": "draft"})],
        priority,
    }
}

#[sqlx::test(migrations = "./migrations")]
#[ignore = "requires DATABASE_URL"]
async fn insert_returns_populated_note(pool: PgPool) {
    let store = PgNoteStore::new(pool);
    let note = store
        .insert(new_note("hello", "user01", Priority::High))
        .await
        .unwrap();

    assert!(note.id > 0);
    assert_eq!(note.priority, Priority::High);
    assert_eq!(note.contributed_by, vec!["user01"]);
    assert_eq!(note.history, vec![serde_json::json!({"note": "draft"})]);
    assert!(note.updated_at >= note.created_at);
    assert_eq!(store.count().await.unwrap(), 1);
}

#[sqlx::test(migrations = "./migrations")]
#[ignore = "requires DATABASE_URL"]
async fn replace_keeps_created_at(pool: PgPool) {
    let store = PgNoteStore::new(pool);
    let original = store
        .insert(new_note("v1", "user01", Priority::Low))
        .await
        .unwrap();

    let edited = store
        .replace(original.id, new_note("v2", "user02", Priority::Medium))
        .await
        .unwrap();

    assert_eq!(edited.id, original.id);
    assert_eq!(edited.note, "v2");
    assert_eq!(edited.created_by, "user02");
    assert_eq!(edited.created_at, original.created_at);
    assert!(edited.updated_at >= original.updated_at);
}

#[sqlx::test(migrations = "./migrations")]
#[ignore = "requires DATABASE_URL"]
async fn replace_and_remove_unknown_id(pool: PgPool) {
    let store = PgNoteStore::new(pool);
    assert_matches!(
        store.replace(999, new_note("x", "user01", Priority::Low)).await,
        Err(StoreError::NotFound { id: 999 })
    );
    assert_matches!(store.remove(999).await, Err(StoreError::NotFound { id: 999 }));
}

#[sqlx::test(migrations = "./migrations")]
#[ignore = "requires DATABASE_URL"]
async fn filtered_query_matches_engine(pool: PgPool) {
    let store = PgNoteStore::new(pool);
    store.insert(new_note("cherry", "user01", Priority::High)).await.unwrap();
    store.insert(new_note("apple", "user02", Priority::High)).await.unwrap();
    store.insert(new_note("banana", "user01", Priority::Low)).await.unwrap();

    let request = FilterRequest {
        selected_users: vec!["User 1".to_string()],
        sort: Some("Alphabetical Order".to_string()),
        ..FilterRequest::default()
    };
    let filter = NoteFilter::resolve(&request).unwrap();
    let bodies: Vec<String> = store
        .query_ordered(&filter)
        .await
        .unwrap()
        .into_iter()
        .map(|n| n.note)
        .collect();
    assert_eq!(bodies, vec!["banana", "cherry"]);

    let limited = store
        .query_ordered(&NoteFilter::canonical(Some(1)))
        .await
        .unwrap();
    assert_eq!(limited.len(), 1);
}

#[sqlx::test(migrations = "./migrations")]
#[ignore = "requires DATABASE_URL"]
async fn deleted_ids_are_not_reused(pool: PgPool) {
    let store = PgNoteStore::new(pool);
    let a = store.insert(new_note("a", "user01", Priority::High)).await.unwrap();
    store.remove(a.id).await.unwrap();
    let b = store.insert(new_note("b", "user01", Priority::High)).await.unwrap();

    assert!(b.id > a.id);
    let all = store.query_ordered(&NoteFilter::canonical(None)).await.unwrap();
    assert!(all.iter().all(|n| n.id != a.id));
}
