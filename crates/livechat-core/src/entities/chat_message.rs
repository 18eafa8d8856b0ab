//! Chat message entity - the application payload carried in a frame body

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::value_objects::RoomId;

/// A chat message published to a room.
///
/// The router treats this as opaque text; only the publish handler and the
/// publisher interpret its fields.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChatMessage {
    pub room_id: RoomId,
    pub sender: String,
    pub content: String,
    pub timestamp: DateTime<Utc>,
}

impl ChatMessage {
    /// Create a new message timestamped now
    pub fn new(room_id: RoomId, sender: impl Into<String>, content: impl Into<String>) -> Self {
        Self {
            room_id,
            sender: sender.into(),
            content: content.into(),
            timestamp: Utc::now(),
        }
    }

    /// Replace the content, keeping all other fields.
    ///
    /// Used by the publisher when the content is encrypted before fan-out.
    #[must_use]
    pub fn with_content(mut self, content: impl Into<String>) -> Self {
        self.content = content.into();
        self
    }
}
