//! Mutation broadcaster.
//!
//! After every accepted mutation the canonical view is re-read from the
//! store and pushed, whole, to every member of the shared channel. Clients
//! never patch their local state; each `list_note` replaces it. Two
//! concurrent mutations each trigger their own re-read, so a member can see
//! at most one stale snapshot before converging.

use std::sync::Arc;

use noteroom_core::filter::NoteFilter;
use noteroom_db::{NoteStore, StoreError};

use crate::ws::protocol::{ServerEvent, Snapshot};
use crate::ws::WsManager;

#[derive(Debug, thiserror::Error)]
pub enum BroadcastError {
    #[error(transparent)]
    Store(#[from] StoreError),

    #[error("Failed to encode snapshot: {0}")]
    Encode(#[from] serde_json::Error),
}

/// Publishes canonical snapshots to one channel.
pub struct MutationBroadcaster {
    store: Arc<dyn NoteStore>,
    ws_manager: Arc<WsManager>,
    channel: String,
    limit: Option<usize>,
}

impl MutationBroadcaster {
    /// `limit` caps the notes carried in each snapshot; `count` is always
    /// the store total.
    pub fn new(
        store: Arc<dyn NoteStore>,
        ws_manager: Arc<WsManager>,
        channel: impl Into<String>,
        limit: Option<usize>,
    ) -> Self {
        Self {
            store,
            ws_manager,
            channel: channel.into(),
            limit,
        }
    }

    pub fn channel(&self) -> &str {
        &self.channel
    }

    /// Read the canonical view without publishing it.
    pub async fn snapshot(&self) -> Result<Snapshot, StoreError> {
        let notes = self
            .store
            .query_ordered(&NoteFilter::canonical(self.limit))
            .await?;
        let count = self.store.count().await?;
        Ok(Snapshot { notes, count })
    }

    /// Re-derive the canonical view and send it to every channel member.
    ///
    /// Returns the snapshot that was published.
    pub async fn on_mutation_applied(&self) -> Result<Snapshot, BroadcastError> {
        let snapshot = self.snapshot().await?;
        let message = ServerEvent::ListNote(snapshot.clone()).to_message()?;
        let delivered = self
            .ws_manager
            .broadcast_to_channel(&self.channel, message)
            .await;

        tracing::debug!(
            channel = %self.channel,
            notes = snapshot.notes.len(),
            count = snapshot.count,
            delivered,
            "Broadcast canonical snapshot"
        );
        Ok(snapshot)
    }
}
