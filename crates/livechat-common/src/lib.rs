//! # livechat-common
//!
//! Shared utilities including configuration, error handling, the message
//! cipher, and telemetry.

pub mod config;
pub mod crypto;
pub mod error;
pub mod telemetry;

// Re-export commonly used types at crate root
pub use config::{AppConfig, AppSettings, ConfigError, EncryptionConfig, Environment, ServerConfig};
pub use crypto::{Aes128Cipher, CryptoError};
pub use error::{AppError, AppResult};
pub use telemetry::{init_tracing, init_tracing_with_config, try_init_tracing, TracingConfig};
