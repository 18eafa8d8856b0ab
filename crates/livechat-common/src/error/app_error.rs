//! Application error types
//!
//! Unified process-level error handling. Per-frame and per-recipient faults
//! are handled locally in the gateway; this type covers startup and wiring
//! failures only.

use livechat_core::DomainError;

/// Application-wide error type
#[derive(Debug, thiserror::Error)]
pub enum AppError {
    // Configuration errors
    #[error("Configuration error: {0}")]
    Config(String),

    // Cipher errors (bad key, malformed ciphertext)
    #[error(transparent)]
    Crypto(#[from] crate::crypto::CryptoError),

    // Domain errors
    #[error(transparent)]
    Domain(#[from] DomainError),

    // Internal errors
    #[error("Internal server error")]
    Internal(#[source] anyhow::Error),
}

impl From<crate::config::ConfigError> for AppError {
    fn from(e: crate::config::ConfigError) -> Self {
        Self::Config(e.to_string())
    }
}

/// Application result type alias
pub type AppResult<T> = Result<T, AppError>;
