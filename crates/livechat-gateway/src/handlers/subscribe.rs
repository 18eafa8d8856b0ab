//! Subscribe handler (`/sub/{roomId}`)

use super::{room_segment, HandlerError, HandlerResult, MessageHandler};
use crate::connection::{RoomRegistry, Session};
use crate::protocol::{self, destinations, Frame};
use async_trait::async_trait;
use std::sync::Arc;

/// Registers the session as a member of the destination room and
/// acknowledges the subscription
pub struct SubscribeHandler {
    registry: Arc<RoomRegistry>,
}

impl SubscribeHandler {
    pub fn new(registry: Arc<RoomRegistry>) -> Self {
        Self { registry }
    }
}

#[async_trait]
impl MessageHandler for SubscribeHandler {
    fn pattern(&self) -> &'static str {
        destinations::SUBSCRIBE
    }

    async fn handle(&self, session: &Arc<Session>, frame: &Frame) -> HandlerResult<()> {
        let room = room_segment(self.pattern(), &frame.destination)?;

        if !self.registry.subscribe(&room, session).await {
            return Err(HandlerError::SessionGone);
        }

        tracing::info!(session_id = %session.id(), %room, "Session subscribed");

        let ack = Frame::new(frame.destination.clone()).with_header("ack", "subscribe");
        session.send(&protocol::encode(&ack)).await?;

        Ok(())
    }
}
