//! Integration tests for the livechat gateway
//!
//! Spins up a real gateway server on an ephemeral port and drives it with
//! WebSocket and HTTP clients.

pub mod helpers;
