//! Error types for the API client.
//!
//! # Design
//! Failures are grouped by where they happen: before the request exists
//! (`Encoding`, `RequestConstruction`), while it is on the wire
//! (`Transport`), or when a caller asks a response helper to decode a body
//! (`Decoding`). HTTP status codes are never errors here; a 404 or 500 comes
//! back as an ordinary `HttpResponse`.

use thiserror::Error;

/// Convenience alias used throughout the crate.
pub type Result<T> = std::result::Result<T, ApiError>;

/// Errors returned by `ApiClient` verbs and `Transport` implementations.
#[derive(Debug, Error)]
pub enum ApiError {
    /// The request payload could not be serialized to JSON.
    #[error("failed to encode request body: {0}")]
    Encoding(#[from] serde_json::Error),

    /// The method/path combination was rejected before anything was sent.
    #[error("invalid request: {0}")]
    RequestConstruction(String),

    /// Network, DNS, TLS or timeout failure reported by the transport.
    #[error("transport error: {0}")]
    Transport(#[source] Box<dyn std::error::Error + Send + Sync>),

    /// A response body (or config document) could not be deserialized.
    #[error("failed to decode: {0}")]
    Decoding(String),
}

impl From<ureq::Error> for ApiError {
    fn from(err: ureq::Error) -> Self {
        ApiError::Transport(Box::new(err))
    }
}
