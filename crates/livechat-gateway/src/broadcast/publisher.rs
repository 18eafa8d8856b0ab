//! Publisher
//!
//! Delivers one chat message independently to every current member of a
//! room. Delivery is best-effort, all-recipients-attempted: one dead
//! recipient never blocks the rest.

use crate::connection::RoomRegistry;
use crate::protocol::{self, destinations, Frame};
use livechat_common::Aes128Cipher;
use livechat_core::{ChatMessage, RoomId, SessionId};
use serde::Serialize;
use std::sync::Arc;

/// One recipient that could not be reached during fan-out
#[derive(Debug, Clone, Serialize)]
pub struct DeliveryFailure {
    pub session_id: SessionId,
    pub reason: String,
}

/// Outcome of a single publish call
#[derive(Debug, Clone, Serialize)]
pub struct PublishReport {
    pub room_id: RoomId,
    /// Members in the snapshot this fan-out was attempted against
    pub attempted: usize,
    pub delivered: usize,
    pub failures: Vec<DeliveryFailure>,
}

impl PublishReport {
    /// Whether every snapshot member received the message
    #[must_use]
    pub fn all_delivered(&self) -> bool {
        self.failures.is_empty()
    }
}

/// Fans published messages out to room members
pub struct Publisher {
    registry: Arc<RoomRegistry>,
    /// When present, message content is encrypted before fan-out
    cipher: Option<Aes128Cipher>,
}

impl Publisher {
    /// Create a publisher over the given registry
    pub fn new(registry: Arc<RoomRegistry>, cipher: Option<Aes128Cipher>) -> Self {
        Self { registry, cipher }
    }

    /// Deliver a message to every current member of a room
    ///
    /// The membership snapshot is taken once and the outbound frame encoded
    /// once; each member is then attempted independently. A session that
    /// closed mid-flight is recorded as a delivery failure and skipped over.
    ///
    /// The publishing session is not treated specially: when it is itself a
    /// member of the room it receives its own broadcast.
    pub async fn publish(&self, room: &RoomId, message: ChatMessage) -> PublishReport {
        let outbound = match &self.cipher {
            Some(cipher) => {
                let ciphertext = cipher.encrypt(&message.content);
                message.with_content(ciphertext)
            }
            None => message,
        };

        let frame = Frame::new(destinations::topic(room))
            .with_body(serde_json::to_string(&outbound).unwrap_or_default());
        let text = protocol::encode(&frame);

        let members = self.registry.members_of(room);
        let attempted = members.len();
        let mut failures = Vec::new();

        for member in members {
            if let Err(e) = member.send(&text).await {
                tracing::debug!(
                    %room,
                    session_id = %member.id(),
                    error = %e,
                    "Recipient unreachable during fan-out"
                );
                failures.push(DeliveryFailure {
                    session_id: member.id(),
                    reason: e.to_string(),
                });
            }
        }

        let report = PublishReport {
            room_id: room.clone(),
            attempted,
            delivered: attempted - failures.len(),
            failures,
        };

        tracing::debug!(
            %room,
            attempted = report.attempted,
            delivered = report.delivered,
            "Publish fan-out complete"
        );

        report
    }
}

impl std::fmt::Debug for Publisher {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Publisher")
            .field("encryption", &self.cipher.is_some())
            .finish()
    }
}
