use std::sync::Arc;
use std::time::Duration;

use tokio::task::JoinHandle;
use tokio::time::MissedTickBehavior;

use crate::ws::manager::WsManager;

/// Ping every open connection once per `period` until aborted.
pub fn start_heartbeat(ws_manager: Arc<WsManager>, period: Duration) -> JoinHandle<()> {
    tokio::spawn(async move {
        let start = tokio::time::Instant::now() + period;
        let mut ticker = tokio::time::interval_at(start, period);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);

        loop {
            ticker.tick().await;
            match ws_manager.connection_count().await {
                0 => continue,
                count => {
                    tracing::debug!(count, "WebSocket heartbeat ping");
                    ws_manager.ping_all().await;
                }
            }
        }
    })
}
