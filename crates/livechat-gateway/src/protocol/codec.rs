//! Frame codec
//!
//! Pure functions translating between raw wire text and [`Frame`] values.

use super::Frame;
use thiserror::Error;

/// Frame decoding errors
#[derive(Debug, Error)]
pub enum DecodeError {
    /// Payload is not valid frame JSON
    #[error("malformed frame: {0}")]
    Malformed(#[from] serde_json::Error),

    /// Destination field is absent or empty
    #[error("frame destination is missing or empty")]
    MissingDestination,
}

/// Decode raw wire text into a validated frame
pub fn decode(raw: &str) -> Result<Frame, DecodeError> {
    let frame: Frame = serde_json::from_str(raw)?;
    if frame.destination.trim().is_empty() {
        return Err(DecodeError::MissingDestination);
    }
    Ok(frame)
}

/// Encode a frame to wire text
///
/// Total for any well-formed frame: serialization of string-keyed maps and
/// strings cannot fail.
#[must_use]
pub fn encode(frame: &Frame) -> String {
    serde_json::to_string(frame).unwrap_or_default()
}
