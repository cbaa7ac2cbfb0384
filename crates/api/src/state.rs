use std::sync::Arc;

use noteroom_db::NoteStore;

use crate::broadcast::MutationBroadcaster;
use crate::config::ServerConfig;
use crate::ws::WsManager;

/// Shared application state available to all Axum handlers via `State<AppState>`.
///
/// This is cheaply cloneable (inner data is behind `Arc`).
#[derive(Clone)]
pub struct AppState {
    /// Owner of the note collection.
    pub store: Arc<dyn NoteStore>,
    /// Server configuration.
    pub config: Arc<ServerConfig>,
    /// WebSocket connection manager.
    pub ws_manager: Arc<WsManager>,
    /// Publishes canonical snapshots to the shared channel.
    pub broadcaster: Arc<MutationBroadcaster>,
}

impl AppState {
    /// Wire a store and config into a fresh connection manager and
    /// broadcaster.
    pub fn new(store: Arc<dyn NoteStore>, config: ServerConfig) -> Self {
        let ws_manager = Arc::new(WsManager::new());
        let broadcaster = Arc::new(MutationBroadcaster::new(
            Arc::clone(&store),
            Arc::clone(&ws_manager),
            config.room_channel.clone(),
            config.broadcast_limit,
        ));
        Self {
            store,
            config: Arc::new(config),
            ws_manager,
            broadcaster,
        }
    }
}
