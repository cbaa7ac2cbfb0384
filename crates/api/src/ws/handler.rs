use axum::extract::ws::{Message, WebSocket, WebSocketUpgrade};
use axum::extract::State;
use axum::response::IntoResponse;
use futures::{SinkExt, StreamExt};

use crate::state::AppState;
use crate::ws::protocol::ServerEvent;
use crate::ws::session::{self, RoomSession};

/// HTTP handler that upgrades the connection to WebSocket.
///
/// After the upgrade the connection joins the shared channel and is
/// managed by a sender task plus the receive loop.
pub async fn ws_handler(ws: WebSocketUpgrade, State(state): State<AppState>) -> impl IntoResponse {
    ws.on_upgrade(move |socket| handle_socket(socket, state))
}

/// Manage a single WebSocket connection after upgrade.
///
///   1. Registers the session and auto-joins the shared channel.
///   2. Spawns a sender task that forwards frames queued for this connection.
///   3. Sends the current canonical snapshot to the new member.
///   4. Spawns one task per inbound mutation frame.
///   5. Tears the session down on disconnect.
async fn handle_socket(socket: WebSocket, state: AppState) {
    let conn_id = uuid::Uuid::new_v4().to_string();
    tracing::info!(conn_id = %conn_id, "WebSocket connected");

    let (mut session, mut rx) =
        RoomSession::connect(state.ws_manager.clone(), conn_id.clone()).await;

    let (mut sink, mut stream) = socket.split();

    let sender_conn_id = conn_id.clone();
    let send_task = tokio::spawn(async move {
        while let Some(msg) = rx.recv().await {
            if sink.send(msg).await.is_err() {
                tracing::debug!(conn_id = %sender_conn_id, "WebSocket sink closed");
                break;
            }
        }
    });

    session.join(&state.config.room_channel).await;
    send_initial_snapshot(&state, &conn_id).await;

    while let Some(result) = stream.next().await {
        match result {
            Ok(Message::Text(text)) => {
                if !session.is_joined() {
                    tracing::debug!(conn_id = %conn_id, "Frame from session outside the room ignored");
                    continue;
                }
                let state = state.clone();
                let conn_id = conn_id.clone();
                tokio::spawn(async move {
                    session::handle_text(&state, &conn_id, text.as_str()).await;
                });
            }
            Ok(Message::Close(_)) => break,
            Ok(Message::Pong(_)) => {
                tracing::trace!(conn_id = %conn_id, "Pong received");
            }
            Ok(_) => {}
            Err(e) => {
                tracing::debug!(conn_id = %conn_id, error = %e, "WebSocket receive error");
                break;
            }
        }
    }

    session.disconnect().await;
    send_task.abort();
    tracing::info!(conn_id = %conn_id, "WebSocket disconnected");
}

async fn send_initial_snapshot(state: &AppState, conn_id: &str) {
    let snapshot = match state.broadcaster.snapshot().await {
        Ok(snapshot) => snapshot,
        Err(e) => {
            tracing::warn!(conn_id, error = %e, "Could not load snapshot for new member");
            return;
        }
    };
    match ServerEvent::ListNote(snapshot).to_message() {
        Ok(msg) => {
            state.ws_manager.send_to(conn_id, msg).await;
        }
        Err(e) => tracing::error!(conn_id, error = %e, "Failed to encode snapshot"),
    }
}
