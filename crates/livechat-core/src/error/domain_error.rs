//! Domain error types

use thiserror::Error;

/// Errors raised by domain-level validation
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DomainError {
    #[error("room id must not be empty")]
    EmptyRoomId,

    #[error("invalid room id: {0}")]
    InvalidRoomId(String),
}
