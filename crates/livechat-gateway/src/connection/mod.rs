//! Connection layer
//!
//! Sessions wrap one live WebSocket each; the room registry tracks which
//! sessions are subscribed to which rooms.

mod registry;
mod session;

pub use registry::RoomRegistry;
pub use session::{SendError, Session, SessionState};
