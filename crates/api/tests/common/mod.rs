#![allow(dead_code)]

use std::sync::Arc;

use async_trait::async_trait;
use axum::body::Body;
use axum::extract::ws::Message;
use axum::http::{Method, Request};
use axum::response::Response;
use axum::Router;
use http_body_util::BodyExt;
use noteroom_core::filter::NoteFilter;
use noteroom_core::note::{NewNote, Note};
use noteroom_core::types::DbId;
use noteroom_db::{MemoryNoteStore, NoteStore, StoreError};
use tokio::sync::mpsc::UnboundedReceiver;
use tower::ServiceExt;

use noteroom_api::config::{MutationFailurePolicy, ServerConfig, StoreBackend};
use noteroom_api::router::build_app_router;
use noteroom_api::state::AppState;

/// Build a test `ServerConfig` with safe defaults.
pub fn test_config() -> ServerConfig {
    ServerConfig {
        host: "127.0.0.1".to_string(),
        port: 0,
        cors_origins: vec!["http://localhost:3000".to_string()],
        request_timeout_secs: 30,
        shutdown_timeout_secs: 5,
        heartbeat_interval_secs: 30,
        store_backend: StoreBackend::Memory,
        room_channel: "app".to_string(),
        broadcast_limit: None,
        failure_policy: MutationFailurePolicy::Notify,
        log_json: false,
    }
}

/// App state over a fresh in-memory store.
pub fn memory_state() -> AppState {
    AppState::new(Arc::new(MemoryNoteStore::new()), test_config())
}

/// App state with a custom config over a fresh in-memory store.
pub fn memory_state_with(config: ServerConfig) -> AppState {
    AppState::new(Arc::new(MemoryNoteStore::new()), config)
}

/// The full router, sharing `state` with the caller.
pub fn build_test_app(state: &AppState) -> Router {
    build_app_router(state.clone())
}

// ---------------------------------------------------------------------------
// HTTP helpers
// ---------------------------------------------------------------------------

pub async fn get(app: Router, uri: &str) -> Response {
    app.oneshot(Request::builder().uri(uri).body(Body::empty()).unwrap())
        .await
        .unwrap()
}

pub async fn post_json(app: Router, uri: &str, body: serde_json::Value) -> Response {
    app.oneshot(
        Request::builder()
            .method(Method::POST)
            .uri(uri)
            .header("content-type", "application/json")
            .body(Body::from(body.to_string()))
            .unwrap(),
    )
    .await
    .unwrap()
}

pub async fn body_json(response: Response) -> serde_json::Value {
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    serde_json::from_slice(&bytes).unwrap()
}

// ---------------------------------------------------------------------------
// Channel helpers
// ---------------------------------------------------------------------------

/// Register a connection and join it to the shared channel.
pub async fn join_member(state: &AppState, conn_id: &str) -> UnboundedReceiver<Message> {
    let rx = state.ws_manager.add(conn_id.to_string()).await;
    assert!(state.ws_manager.join(conn_id, &state.config.room_channel).await);
    rx
}

/// Pop the next queued frame and parse it as JSON. Panics if none is queued.
pub fn next_frame(rx: &mut UnboundedReceiver<Message>) -> serde_json::Value {
    match rx.try_recv().expect("a frame should be queued") {
        Message::Text(text) => serde_json::from_str(text.as_str()).unwrap(),
        other => panic!("Expected a text frame, got: {other:?}"),
    }
}

/// Assert no frame is queued.
pub fn assert_no_frame(rx: &mut UnboundedReceiver<Message>) {
    assert!(rx.try_recv().is_err(), "No frame should be queued");
}

pub fn add_frame(body: &str, author: &str, priority: &str) -> String {
    serde_json::json!({
        "event": "add_note",
        "data": {
            "note": body,
            "createdBy": author,
            "contributedBy": [author],
            "priority": priority,
            "history": []
        }
    })
    .to_string()
}

pub fn edit_frame(id: i64, body: &str, author: &str, priority: &str) -> String {
    serde_json::json!({
        "event": "edit_note",
        "data": {
            "id": id,
            "note": body,
            "createdBy": author,
            "contributedBy": [author],
            "priority": priority
        }
    })
    .to_string()
}

pub fn delete_frame(id: i64) -> String {
    serde_json::json!({"event": "delete_note", "data": {"id": id}}).to_string()
}

// ---------------------------------------------------------------------------
// Failing store
// ---------------------------------------------------------------------------

/// Store whose every operation fails with a persistence error.
pub struct UnavailableStore;

fn unavailable() -> StoreError {
    StoreError::Persistence("connection refused".to_string())
}

#[async_trait]
impl NoteStore for UnavailableStore {
    async fn insert(&self, _note: NewNote) -> Result<Note, StoreError> {
        Err(unavailable())
    }

    async fn replace(&self, _id: DbId, _note: NewNote) -> Result<Note, StoreError> {
        Err(unavailable())
    }

    async fn remove(&self, _id: DbId) -> Result<(), StoreError> {
        Err(unavailable())
    }

    async fn query_ordered(&self, _filter: &NoteFilter) -> Result<Vec<Note>, StoreError> {
        Err(unavailable())
    }

    async fn count(&self) -> Result<i64, StoreError> {
        Err(unavailable())
    }

    async fn health_check(&self) -> Result<(), StoreError> {
        Err(unavailable())
    }
}
