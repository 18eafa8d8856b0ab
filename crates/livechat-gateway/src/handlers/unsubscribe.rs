//! Unsubscribe handler (`/unsub/{roomId}`)

use super::{room_segment, HandlerResult, MessageHandler};
use crate::connection::{RoomRegistry, Session};
use crate::protocol::{self, destinations, Frame};
use async_trait::async_trait;
use std::sync::Arc;

/// Removes the session from the destination room's member set
pub struct UnsubscribeHandler {
    registry: Arc<RoomRegistry>,
}

impl UnsubscribeHandler {
    pub fn new(registry: Arc<RoomRegistry>) -> Self {
        Self { registry }
    }
}

#[async_trait]
impl MessageHandler for UnsubscribeHandler {
    fn pattern(&self) -> &'static str {
        destinations::UNSUBSCRIBE
    }

    async fn handle(&self, session: &Arc<Session>, frame: &Frame) -> HandlerResult<()> {
        let room = room_segment(self.pattern(), &frame.destination)?;

        // No-op when the session was never a member
        self.registry.unsubscribe(&room, session).await;

        tracing::info!(session_id = %session.id(), %room, "Session unsubscribed");

        let ack = Frame::new(frame.destination.clone()).with_header("ack", "unsubscribe");
        session.send(&protocol::encode(&ack)).await?;

        Ok(())
    }
}
