//! Channel event frames.
//!
//! Every frame is a JSON text message `{"event": <name>, "data": <payload>}`.

use axum::extract::ws::Message;
use noteroom_core::note::{Note, NotePayload};
use noteroom_core::types::DbId;
use serde::{Deserialize, Serialize};

pub const EVENT_ADD_NOTE: &str = "add_note";
pub const EVENT_EDIT_NOTE: &str = "edit_note";
pub const EVENT_DELETE_NOTE: &str = "delete_note";

/// Client → server mutation events.
#[derive(Debug, Deserialize)]
#[serde(tag = "event", content = "data", rename_all = "snake_case")]
pub enum ClientEvent {
    AddNote(NotePayload),
    EditNote(NotePayload),
    DeleteNote(DeleteNote),
}

impl ClientEvent {
    pub fn name(&self) -> &'static str {
        match self {
            ClientEvent::AddNote(_) => EVENT_ADD_NOTE,
            ClientEvent::EditNote(_) => EVENT_EDIT_NOTE,
            ClientEvent::DeleteNote(_) => EVENT_DELETE_NOTE,
        }
    }
}

/// `delete_note` payload. Extra fields (clients often send the whole note)
/// are ignored.
#[derive(Debug, Deserialize)]
pub struct DeleteNote {
    pub id: DbId,
}

/// The canonical view: notes most recently updated first, plus the total.
#[derive(Debug, Clone, Serialize)]
pub struct Snapshot {
    pub notes: Vec<Note>,
    pub count: i64,
}

/// Acknowledgment sent to the connection that issued a mutation.
#[derive(Debug, Clone, Serialize)]
pub struct Ack {
    pub event: &'static str,
    pub id: DbId,
    /// The stored note after `add_note` / `edit_note`; absent for deletes.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub note: Option<Note>,
}

/// Failure report sent to the connection that issued a mutation.
#[derive(Debug, Clone, Serialize)]
pub struct MutationFailure {
    /// `None` when the frame could not be parsed far enough to tell.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub event: Option<&'static str>,
    pub code: &'static str,
    pub message: String,
}

/// Server → client events.
#[derive(Debug, Clone, Serialize)]
#[serde(tag = "event", content = "data", rename_all = "snake_case")]
pub enum ServerEvent {
    ListNote(Snapshot),
    NoteAck(Ack),
    NoteError(MutationFailure),
}

impl ServerEvent {
    /// Encode as a WebSocket text frame.
    pub fn to_message(&self) -> Result<Message, serde_json::Error> {
        let text = serde_json::to_string(self)?;
        Ok(Message::Text(text.into()))
    }
}

#[cfg(test)]
mod tests {
    use assert_matches::assert_matches;
    use serde_json::json;

    use super::*;

    #[test]
    fn parses_add_note() {
        let frame = json!({
            "event": "add_note",
            "data": {"note": "hi", "createdBy": "user01", "priority": "High"}
        });
        let event: ClientEvent = serde_json::from_value(frame).unwrap();
        assert_eq!(event.name(), "add_note");
        assert_matches!(event, ClientEvent::AddNote(p) if p.note == "hi");
    }

    #[test]
    fn parses_delete_note_ignoring_extra_fields() {
        let frame = json!({"event": "delete_note", "data": {"id": 3, "note": "bye"}});
        let event: ClientEvent = serde_json::from_value(frame).unwrap();
        assert_matches!(event, ClientEvent::DeleteNote(DeleteNote { id: 3 }));
    }

    #[test]
    fn rejects_unknown_event() {
        let frame = json!({"event": "list_note", "data": {}});
        assert!(serde_json::from_value::<ClientEvent>(frame).is_err());
    }

    #[test]
    fn list_note_frame_shape() {
        let event = ServerEvent::ListNote(Snapshot {
            notes: vec![],
            count: 0,
        });
        let value = serde_json::to_value(&event).unwrap();
        assert_eq!(value, json!({"event": "list_note", "data": {"notes": [], "count": 0}}));
    }

    #[test]
    fn delete_ack_omits_note() {
        let event = ServerEvent::NoteAck(Ack {
            event: EVENT_DELETE_NOTE,
            id: 9,
            note: None,
        });
        let value = serde_json::to_value(&event).unwrap();
        assert_eq!(value, json!({"event": "note_ack", "data": {"event": "delete_note", "id": 9}}));
    }

    #[test]
    fn to_message_is_text() {
        let event = ServerEvent::NoteError(MutationFailure {
            event: None,
            code: "VALIDATION_ERROR",
            message: "bad".into(),
        });
        assert_matches!(event.to_message().unwrap(), Message::Text(_));
    }
}
