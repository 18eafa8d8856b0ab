//! # livechat-gateway
//!
//! Real-time message router. Each client holds one WebSocket connection;
//! inbound frames are decoded, dispatched by destination to exactly one
//! handler, and published chat messages are fanned out to every session
//! subscribed to the target room.

pub mod broadcast;
pub mod connection;
pub mod handlers;
pub mod protocol;
pub mod server;

pub use server::{create_app, create_gateway_state, run, GatewayState};
