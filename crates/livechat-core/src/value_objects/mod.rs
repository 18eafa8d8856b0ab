//! Value objects

mod room_id;
mod session_id;

pub use room_id::RoomId;
pub use session_id::SessionId;
