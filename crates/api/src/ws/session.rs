//! Room sessions: per-connection channel membership and mutation dispatch.
//!
//! A connection moves `Connected → Joined(channel) → Disconnected`. While
//! joined, every inbound text frame is parsed as a [`ClientEvent`], applied
//! to the store, acknowledged to its sender, and followed by a canonical
//! snapshot broadcast. Failed mutations never reach other members.

use std::sync::Arc;

use axum::extract::ws::Message;
use noteroom_core::error::CoreError;
use noteroom_core::note::Note;
use noteroom_core::types::DbId;
use noteroom_db::NoteStore;
use tokio::sync::mpsc;

use crate::config::MutationFailurePolicy;
use crate::error::{AppError, AppResult};
use crate::state::AppState;
use crate::ws::manager::WsManager;
use crate::ws::protocol::{Ack, ClientEvent, MutationFailure, ServerEvent};

// ---------------------------------------------------------------------------
// Session state
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SessionState {
    Connected,
    Joined(String),
    Disconnected,
}

/// One WebSocket connection's membership in the shared channel.
pub struct RoomSession {
    conn_id: String,
    state: SessionState,
    ws_manager: Arc<WsManager>,
}

impl RoomSession {
    /// Register the connection with `ws_manager`.
    ///
    /// Returns the session and the receiver of its outbound frames.
    pub async fn connect(
        ws_manager: Arc<WsManager>,
        conn_id: String,
    ) -> (Self, mpsc::UnboundedReceiver<Message>) {
        let rx = ws_manager.add(conn_id.clone()).await;
        let session = Self {
            conn_id,
            state: SessionState::Connected,
            ws_manager,
        };
        (session, rx)
    }

    /// Join `channel`. Only a freshly connected session can join.
    pub async fn join(&mut self, channel: &str) -> bool {
        if self.state != SessionState::Connected {
            return false;
        }
        if !self.ws_manager.join(&self.conn_id, channel).await {
            return false;
        }
        tracing::debug!(conn_id = %self.conn_id, channel, "Joined channel");
        self.state = SessionState::Joined(channel.to_string());
        true
    }

    /// Tear the session down. Notes are not connection-scoped and stay put.
    pub async fn disconnect(&mut self) {
        if self.state == SessionState::Disconnected {
            return;
        }
        self.ws_manager.remove(&self.conn_id).await;
        self.state = SessionState::Disconnected;
    }

    pub fn conn_id(&self) -> &str {
        &self.conn_id
    }

    pub fn state(&self) -> &SessionState {
        &self.state
    }

    pub fn is_joined(&self) -> bool {
        matches!(self.state, SessionState::Joined(_))
    }
}

// ---------------------------------------------------------------------------
// Mutation dispatch
// ---------------------------------------------------------------------------

/// Result of a mutation the store accepted.
#[derive(Debug, Clone)]
pub struct Applied {
    pub event: &'static str,
    pub id: DbId,
    pub note: Option<Note>,
}

/// Parse an inbound text frame.
pub fn parse_frame(text: &str) -> AppResult<ClientEvent> {
    serde_json::from_str(text)
        .map_err(|e| AppError::Core(CoreError::Validation(format!("Malformed event: {e}"))))
}

/// Validate `event` and apply it to `store`.
///
/// Notes without a room are placed in `default_room`.
pub async fn apply_mutation(
    store: &dyn NoteStore,
    event: ClientEvent,
    default_room: &str,
) -> AppResult<Applied> {
    let name = event.name();
    match event {
        ClientEvent::AddNote(payload) => {
            let note = store.insert(payload.into_new_note(default_room)?).await?;
            Ok(Applied {
                event: name,
                id: note.id,
                note: Some(note),
            })
        }
        ClientEvent::EditNote(payload) => {
            let id = payload.require_id()?;
            let note = store.replace(id, payload.into_new_note(default_room)?).await?;
            Ok(Applied {
                event: name,
                id,
                note: Some(note),
            })
        }
        ClientEvent::DeleteNote(target) => {
            store.remove(target.id).await?;
            Ok(Applied {
                event: name,
                id: target.id,
                note: None,
            })
        }
    }
}

/// Handle one inbound text frame from `conn_id`.
///
/// On success the sender gets a `note_ack` and the channel gets a fresh
/// `list_note`. On failure nothing is broadcast and the sender is told
/// according to the configured [`MutationFailurePolicy`].
pub async fn handle_text(state: &AppState, conn_id: &str, text: &str) {
    let event = match parse_frame(text) {
        Ok(event) => event,
        Err(err) => {
            report_failure(state, conn_id, None, &err).await;
            return;
        }
    };
    let name = event.name();

    let applied =
        match apply_mutation(state.store.as_ref(), event, &state.config.room_channel).await {
            Ok(applied) => applied,
            Err(err) => {
                report_failure(state, conn_id, Some(name), &err).await;
                return;
            }
        };

    tracing::info!(conn_id, event = name, note_id = applied.id, "Mutation applied");

    let ack = ServerEvent::NoteAck(Ack {
        event: applied.event,
        id: applied.id,
        note: applied.note,
    });
    match ack.to_message() {
        Ok(msg) => {
            state.ws_manager.send_to(conn_id, msg).await;
        }
        Err(e) => tracing::error!(conn_id, error = %e, "Failed to encode acknowledgment"),
    }

    if let Err(e) = state.broadcaster.on_mutation_applied().await {
        tracing::error!(conn_id, event = name, error = %e, "Canonical snapshot broadcast failed");
    }
}

async fn report_failure(
    state: &AppState,
    conn_id: &str,
    event: Option<&'static str>,
    err: &AppError,
) {
    let (_, code, message) = err.classify();
    tracing::warn!(conn_id, event, code, error = %err, "Mutation rejected");

    if state.config.failure_policy != MutationFailurePolicy::Notify {
        return;
    }

    let frame = ServerEvent::NoteError(MutationFailure {
        event,
        code,
        message,
    });
    match frame.to_message() {
        Ok(msg) => {
            state.ws_manager.send_to(conn_id, msg).await;
        }
        Err(e) => tracing::error!(conn_id, error = %e, "Failed to encode failure report"),
    }
}
