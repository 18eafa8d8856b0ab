//! Gateway state
//!
//! Shared dependencies for the gateway server, constructed once at startup
//! and torn down when the process stops.

use crate::broadcast::Publisher;
use crate::connection::RoomRegistry;
use crate::handlers::HandlerRegistry;
use livechat_common::AppConfig;
use std::sync::Arc;

/// Gateway application state
#[derive(Clone)]
pub struct GatewayState {
    registry: Arc<RoomRegistry>,
    handlers: Arc<HandlerRegistry>,
    publisher: Arc<Publisher>,
    config: Arc<AppConfig>,
}

impl GatewayState {
    /// Create a new gateway state
    pub fn new(
        registry: Arc<RoomRegistry>,
        handlers: Arc<HandlerRegistry>,
        publisher: Arc<Publisher>,
        config: AppConfig,
    ) -> Self {
        Self {
            registry,
            handlers,
            publisher,
            config: Arc::new(config),
        }
    }

    /// Get the room registry
    pub fn registry(&self) -> &RoomRegistry {
        &self.registry
    }

    /// Get the handler registry
    pub fn handlers(&self) -> &HandlerRegistry {
        &self.handlers
    }

    /// Get the publisher
    pub fn publisher(&self) -> &Publisher {
        &self.publisher
    }

    /// Get the application configuration
    pub fn config(&self) -> &AppConfig {
        &self.config
    }
}

impl std::fmt::Debug for GatewayState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("GatewayState")
            .field("registry", &self.registry)
            .field("handlers", &self.handlers)
            .finish()
    }
}
