//! Gateway server setup
//!
//! Wires the WebSocket endpoint, the health check, and the out-of-band HTTP
//! broadcast trigger.

mod handler;
mod state;

pub use handler::ws_handler;
pub use state::GatewayState;

use crate::broadcast::{PublishReport, Publisher};
use crate::connection::RoomRegistry;
use crate::handlers::{HandlerRegistry, PublishHandler, SubscribeHandler, UnsubscribeHandler};
use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::routing::{get, post};
use axum::{Json, Router};
use chrono::{DateTime, Utc};
use livechat_common::{Aes128Cipher, AppConfig, AppError};
use livechat_core::{ChatMessage, RoomId};
use serde::Deserialize;
use std::net::SocketAddr;
use std::sync::Arc;
use tokio::net::TcpListener;
use tower_http::trace::TraceLayer;

/// Create the gateway router
pub fn create_router() -> Router<GatewayState> {
    Router::new()
        .route("/ws", get(ws_handler))
        .route("/health", get(health_check))
        .route("/api/rooms/:room_id/broadcast", post(broadcast_room))
}

/// Health check endpoint
async fn health_check() -> &'static str {
    "OK"
}

/// Body of the HTTP broadcast trigger
#[derive(Debug, Deserialize)]
struct BroadcastRequest {
    sender: String,
    content: String,
    timestamp: Option<DateTime<Utc>>,
}

/// Out-of-band publish trigger
///
/// Equivalent entry point to the publisher, independent of any live
/// WebSocket frame.
async fn broadcast_room(
    State(state): State<GatewayState>,
    Path(room_id): Path<String>,
    Json(request): Json<BroadcastRequest>,
) -> Result<Json<PublishReport>, (StatusCode, String)> {
    let room = RoomId::new(room_id).map_err(|e| (StatusCode::BAD_REQUEST, e.to_string()))?;

    let message = ChatMessage {
        room_id: room.clone(),
        sender: request.sender,
        content: request.content,
        timestamp: request.timestamp.unwrap_or_else(Utc::now),
    };

    let report = state.publisher().publish(&room, message).await;

    tracing::info!(
        %room,
        delivered = report.delivered,
        failed = report.failures.len(),
        "HTTP broadcast complete"
    );

    Ok(Json(report))
}

/// Build the complete application
pub fn create_app(state: GatewayState) -> Router {
    create_router()
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

/// Initialize all dependencies and create `GatewayState`
pub fn create_gateway_state(config: AppConfig) -> Result<GatewayState, AppError> {
    let cipher = config
        .encryption
        .key
        .as_deref()
        .map(Aes128Cipher::new)
        .transpose()?;

    if cipher.is_some() {
        tracing::info!("Message encryption enabled");
    }

    let registry = RoomRegistry::new_shared();
    let publisher = Arc::new(Publisher::new(registry.clone(), cipher));

    let handlers = HandlerRegistry::new(vec![
        Arc::new(SubscribeHandler::new(registry.clone())),
        Arc::new(UnsubscribeHandler::new(registry.clone())),
        Arc::new(PublishHandler::new(publisher.clone())),
    ])
    .map_err(|e| AppError::Config(e.to_string()))?;

    Ok(GatewayState::new(registry, Arc::new(handlers), publisher, config))
}

/// Run the gateway server on an already-bound listener
pub async fn run_server(app: Router, listener: TcpListener) -> Result<(), AppError> {
    let addr = listener
        .local_addr()
        .map_err(|e| AppError::Config(format!("Failed to read local address: {e}")))?;

    tracing::info!("Gateway listening on ws://{addr}/ws");

    axum::serve(listener, app)
        .await
        .map_err(|e| AppError::Config(format!("Server error: {e}")))?;

    Ok(())
}

/// Run the complete gateway server with configuration
pub async fn run(config: AppConfig) -> Result<(), AppError> {
    let addr: SocketAddr = config
        .gateway
        .address()
        .parse()
        .map_err(|e| AppError::Config(format!("Invalid gateway address: {e}")))?;

    let state = create_gateway_state(config)?;
    let app = create_app(state);

    let listener = TcpListener::bind(addr)
        .await
        .map_err(|e| AppError::Config(format!("Failed to bind to {addr}: {e}")))?;

    run_server(app, listener).await
}
