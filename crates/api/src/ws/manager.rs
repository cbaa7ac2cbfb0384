use std::collections::HashMap;

use axum::body::Bytes;
use axum::extract::ws::Message;
use noteroom_core::types::Timestamp;
use tokio::sync::{mpsc, RwLock};

/// Outbound queue of one connection. Drained by that connection's sender task.
pub type WsSender = mpsc::UnboundedSender<Message>;

pub struct WsConnection {
    /// `None` until the connection joins a channel.
    pub channel: Option<String>,
    pub sender: WsSender,
    pub connected_at: Timestamp,
}

impl WsConnection {
    fn is_member_of(&self, channel: &str) -> bool {
        self.channel.as_deref() == Some(channel)
    }

    /// Queue `message`. `false` once the receiving half is gone.
    fn push(&self, message: Message) -> bool {
        self.sender.send(message).is_ok()
    }
}

/// Registry of open connections keyed by connection id, with the channel
/// each has joined.
///
/// Shared behind an `Arc`; every method takes `&self`.
pub struct WsManager {
    connections: RwLock<HashMap<String, WsConnection>>,
}

impl WsManager {
    pub fn new() -> Self {
        Self {
            connections: RwLock::new(HashMap::new()),
        }
    }

    /// Register `conn_id` outside any channel and hand back its queue.
    ///
    /// Re-registering an id drops the previous queue and membership.
    pub async fn add(&self, conn_id: String) -> mpsc::UnboundedReceiver<Message> {
        let (sender, rx) = mpsc::unbounded_channel();
        let conn = WsConnection {
            channel: None,
            sender,
            connected_at: chrono::Utc::now(),
        };
        self.connections.write().await.insert(conn_id, conn);
        rx
    }

    /// Make `conn_id` a member of `channel`. `false` for unknown ids.
    pub async fn join(&self, conn_id: &str, channel: &str) -> bool {
        let mut conns = self.connections.write().await;
        let Some(conn) = conns.get_mut(conn_id) else {
            return false;
        };
        conn.channel = Some(channel.to_string());
        true
    }

    pub async fn remove(&self, conn_id: &str) {
        if let Some(conn) = self.connections.write().await.remove(conn_id) {
            let open_for = chrono::Utc::now() - conn.connected_at;
            tracing::debug!(
                conn_id,
                channel = conn.channel.as_deref(),
                open_secs = open_for.num_seconds(),
                "Connection removed"
            );
        }
    }

    /// Queue `message` for one connection.
    ///
    /// `false` if the id is unknown or its socket has already gone away.
    pub async fn send_to(&self, conn_id: &str, message: Message) -> bool {
        let conns = self.connections.read().await;
        conns.get(conn_id).is_some_and(|c| c.push(message))
    }

    /// Queue `message` for every member of `channel` and return how many
    /// accepted it. Closed queues are skipped; their receive loops clean up.
    pub async fn broadcast_to_channel(&self, channel: &str, message: Message) -> usize {
        let conns = self.connections.read().await;
        conns
            .values()
            .filter(|c| c.is_member_of(channel))
            .filter(|c| c.push(message.clone()))
            .count()
    }

    pub async fn member_count(&self, channel: &str) -> usize {
        let conns = self.connections.read().await;
        conns.values().filter(|c| c.is_member_of(channel)).count()
    }

    pub async fn connection_count(&self) -> usize {
        self.connections.read().await.len()
    }

    /// Queue a Close frame everywhere and forget every connection.
    pub async fn shutdown_all(&self) {
        let mut conns = self.connections.write().await;
        for conn in conns.values() {
            conn.push(Message::Close(None));
        }
        let count = conns.len();
        conns.clear();
        tracing::info!(count, "Closed all WebSocket connections");
    }

    /// Queue a Ping frame for every connection, joined or not.
    pub async fn ping_all(&self) {
        let conns = self.connections.read().await;
        for conn in conns.values() {
            conn.push(Message::Ping(Bytes::new()));
        }
    }
}

impl Default for WsManager {
    fn default() -> Self {
        Self::new()
    }
}
