//! Frame structure
//!
//! One decoded unit of the wire sub-protocol: a destination path, optional
//! headers, and a raw string body. Immutable once decoded.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// A sub-protocol frame
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Frame {
    /// Destination path selecting the operation (e.g. `/sub/lobby`)
    pub destination: String,

    /// Optional string headers; keys are unique
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub headers: BTreeMap<String, String>,

    /// Raw payload; may be empty
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub body: String,
}

impl Frame {
    /// Create a frame with no headers and an empty body
    #[must_use]
    pub fn new(destination: impl Into<String>) -> Self {
        Self {
            destination: destination.into(),
            headers: BTreeMap::new(),
            body: String::new(),
        }
    }

    /// Add a header
    #[must_use]
    pub fn with_header(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.headers.insert(key.into(), value.into());
        self
    }

    /// Set the body
    #[must_use]
    pub fn with_body(mut self, body: impl Into<String>) -> Self {
        self.body = body.into();
        self
    }

    /// Look up a header value
    pub fn header(&self, key: &str) -> Option<&str> {
        self.headers.get(key).map(String::as_str)
    }
}
