//! Wire sub-protocol
//!
//! Defines the frame structure and the textual codec used on the WebSocket.

mod codec;
mod frame;

pub use codec::{decode, encode, DecodeError};
pub use frame::Frame;

/// Destination path conventions.
///
/// Destinations are slash-delimited paths whose first segment selects the
/// handler and whose second segment carries the room id, following the
/// `/sub` / `/pub` topic convention of the web client.
pub mod destinations {
    use livechat_core::RoomId;

    /// Prefix of room-subscribe destinations (`/sub/{roomId}`)
    pub const SUBSCRIBE: &str = "/sub/";

    /// Prefix of room-unsubscribe destinations (`/unsub/{roomId}`)
    pub const UNSUBSCRIBE: &str = "/unsub/";

    /// Prefix of room-publish destinations (`/pub/{roomId}`)
    pub const PUBLISH: &str = "/pub/";

    /// Destination on which a room's broadcasts are delivered to subscribers
    #[must_use]
    pub fn topic(room: &RoomId) -> String {
        format!("{SUBSCRIBE}{room}")
    }
}
