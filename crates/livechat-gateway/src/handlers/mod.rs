//! Destination handlers
//!
//! Each handler declares the destination prefix it accepts; the registry
//! guarantees at most one handler matches any destination and resolves the
//! match at dispatch time.

mod error;
mod publish;
mod subscribe;
mod unsubscribe;

pub use error::{HandlerError, HandlerResult};
pub use publish::PublishHandler;
pub use subscribe::SubscribeHandler;
pub use unsubscribe::UnsubscribeHandler;

use crate::connection::Session;
use crate::protocol::Frame;
use async_trait::async_trait;
use livechat_core::RoomId;
use std::sync::Arc;
use thiserror::Error;

/// A pluggable destination handler
#[async_trait]
pub trait MessageHandler: Send + Sync {
    /// Destination prefix this handler accepts (e.g. `/sub/`)
    fn pattern(&self) -> &'static str;

    /// Whether this handler accepts the destination
    fn can_handle(&self, destination: &str) -> bool {
        destination.starts_with(self.pattern())
    }

    /// Perform the action for a matched frame
    async fn handle(&self, session: &Arc<Session>, frame: &Frame) -> HandlerResult<()>;
}

/// Extract the room id segment following a handler's prefix
pub(crate) fn room_segment(pattern: &str, destination: &str) -> HandlerResult<RoomId> {
    let segment = destination
        .strip_prefix(pattern)
        .ok_or_else(|| HandlerError::InvalidDestination(destination.to_string()))?;
    RoomId::new(segment).map_err(|_| HandlerError::InvalidDestination(destination.to_string()))
}

/// Raised when handler registration is misconfigured
#[derive(Debug, Error)]
pub enum RegistryError {
    /// Two handlers would both match some destination
    #[error("handler patterns overlap: {0:?} and {1:?}")]
    OverlappingPatterns(String, String),
}

/// Raised at dispatch time when a destination matches nothing
#[derive(Debug, Error)]
pub enum DispatchError {
    #[error("no handler for destination: {0}")]
    NoHandler(String),
}

/// Statically constructed, validated set of handlers
///
/// Built once at startup. Construction rejects any pair of handlers whose
/// prefixes overlap (one being a prefix of the other), so ambiguity is a
/// configuration error caught before the first frame arrives.
pub struct HandlerRegistry {
    handlers: Vec<Arc<dyn MessageHandler>>,
}

impl HandlerRegistry {
    /// Validate and build a handler registry
    pub fn new(handlers: Vec<Arc<dyn MessageHandler>>) -> Result<Self, RegistryError> {
        for (i, first) in handlers.iter().enumerate() {
            for second in &handlers[i + 1..] {
                let (a, b) = (first.pattern(), second.pattern());
                if a.starts_with(b) || b.starts_with(a) {
                    return Err(RegistryError::OverlappingPatterns(
                        a.to_string(),
                        b.to_string(),
                    ));
                }
            }
        }
        Ok(Self { handlers })
    }

    /// Find the single handler accepting a destination
    pub fn find(&self, destination: &str) -> Result<&Arc<dyn MessageHandler>, DispatchError> {
        self.handlers
            .iter()
            .find(|h| h.can_handle(destination))
            .ok_or_else(|| DispatchError::NoHandler(destination.to_string()))
    }

    /// Number of registered handlers
    pub fn len(&self) -> usize {
        self.handlers.len()
    }

    /// Whether the registry is empty
    pub fn is_empty(&self) -> bool {
        self.handlers.is_empty()
    }
}

impl std::fmt::Debug for HandlerRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let patterns: Vec<&str> = self.handlers.iter().map(|h| h.pattern()).collect();
        f.debug_struct("HandlerRegistry")
            .field("patterns", &patterns)
            .finish()
    }
}
