//! WebSocket infrastructure for the shared room.
//!
//! Provides connection management, room sessions and mutation dispatch,
//! the event frame types, heartbeat pings, and the HTTP upgrade handler.

mod handler;
mod heartbeat;
pub mod manager;
pub mod protocol;
pub mod session;

pub use handler::ws_handler;
pub use heartbeat::start_heartbeat;
pub use manager::WsManager;
pub use session::{RoomSession, SessionState};
