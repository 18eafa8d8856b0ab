//! Publish handler (`/pub/{roomId}`)

use super::{room_segment, HandlerError, HandlerResult, MessageHandler};
use crate::broadcast::Publisher;
use crate::connection::Session;
use crate::protocol::{destinations, Frame};
use async_trait::async_trait;
use livechat_core::ChatMessage;
use std::sync::Arc;

/// Parses a chat message from the frame body and hands it to the publisher
/// for room fan-out
pub struct PublishHandler {
    publisher: Arc<Publisher>,
}

impl PublishHandler {
    pub fn new(publisher: Arc<Publisher>) -> Self {
        Self { publisher }
    }
}

#[async_trait]
impl MessageHandler for PublishHandler {
    fn pattern(&self) -> &'static str {
        destinations::PUBLISH
    }

    async fn handle(&self, session: &Arc<Session>, frame: &Frame) -> HandlerResult<()> {
        let room = room_segment(self.pattern(), &frame.destination)?;

        let message: ChatMessage = serde_json::from_str(&frame.body)
            .map_err(|e| HandlerError::InvalidPayload(e.to_string()))?;

        // The destination is authoritative; a contradictory body is rejected
        if message.room_id != room {
            return Err(HandlerError::RoomMismatch {
                destination: room,
                body: message.room_id,
            });
        }

        let report = self.publisher.publish(&room, message).await;

        tracing::debug!(
            session_id = %session.id(),
            %room,
            delivered = report.delivered,
            failed = report.failures.len(),
            "Frame published"
        );

        Ok(())
    }
}
