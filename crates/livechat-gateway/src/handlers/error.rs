//! Handler error types

use crate::connection::SendError;
use livechat_core::RoomId;
use thiserror::Error;

/// Business-rule failures inside a handler
///
/// Never fatal to the connection: the router logs these and keeps the
/// session open.
#[derive(Debug, Error)]
pub enum HandlerError {
    /// Destination matched the handler prefix but carries no valid room id
    #[error("invalid destination: {0}")]
    InvalidDestination(String),

    /// Frame body could not be interpreted
    #[error("invalid payload: {0}")]
    InvalidPayload(String),

    /// Body room id contradicts the destination room id
    #[error("room mismatch: destination says {destination}, body says {body}")]
    RoomMismatch { destination: RoomId, body: RoomId },

    /// Could not write an acknowledgement back to the session
    #[error("failed to send acknowledgement: {0}")]
    Ack(#[from] SendError),

    /// Session is no longer registered (disconnect raced the frame)
    #[error("session is no longer registered")]
    SessionGone,
}

/// Handler result type
pub type HandlerResult<T> = Result<T, HandlerError>;
