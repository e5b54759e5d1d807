//! Client configuration.
//!
//! # Design
//! `ClientConfig` is a plain deserializable value so it can come from a JSON
//! file or be filled in by hand. Every field has a default: an empty base URI
//! (no URL rewriting), no default headers, a 30 second timeout, and
//! certificate verification left on (`verify: false`, see `UreqTransport`).

use std::collections::HashMap;
use std::time::Duration;

use serde::Deserialize;

use crate::error::{ApiError, Result};

const DEFAULT_TIMEOUT_MS: u64 = 30_000;

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct ClientConfig {
    pub base_uri: String,
    pub headers: HashMap<String, String>,
    pub timeout_ms: u64,
    /// When true, TLS certificates are NOT verified.
    pub verify: bool,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            base_uri: String::new(),
            headers: HashMap::new(),
            timeout_ms: DEFAULT_TIMEOUT_MS,
            verify: false,
        }
    }
}

impl ClientConfig {
    /// Parse a JSON document. Missing fields take their defaults.
    ///
    /// # Errors
    /// Returns `ApiError::Decoding` if the document is not valid JSON or a
    /// field has the wrong type.
    pub fn from_json(raw: &str) -> Result<Self> {
        serde_json::from_str(raw).map_err(|e| ApiError::Decoding(e.to_string()))
    }

    pub fn timeout(&self) -> Duration {
        Duration::from_millis(self.timeout_ms)
    }
}
