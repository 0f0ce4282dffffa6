//! Error types for the cache
//!
//! Provides unified error handling using thiserror. Store and decode errors
//! never leave the engine; only [`CacheError`] is visible to callers.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use thiserror::Error;

// == Store Error Enum ==
/// Failures reported by an object store backend.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum StoreError {
    /// No object exists under the requested name
    #[error("Object not found: {0}")]
    NotFound(String),

    /// Credentials were rejected or missing
    #[error("Access denied: {0}")]
    Unauthorized(String),

    /// The store asked us to slow down
    #[error("Rate limited: {0}")]
    RateLimited(String),

    /// Network or I/O failure talking to the store
    #[error("Transport error: {0}")]
    Transport(String),

    /// Anything else the backend reported
    #[error("Store error: {0}")]
    Other(String),
}

impl StoreError {
    /// Returns true if the error only says the object is absent.
    pub fn is_not_found(&self) -> bool {
        matches!(self, StoreError::NotFound(_))
    }
}

// == Decode Error Enum ==
/// Failures while interpreting a stored entry blob.
#[derive(Error, Debug)]
pub enum DecodeError {
    /// Blob is shorter than the fixed entry header
    #[error("Entry truncated: {0} bytes")]
    Truncated(usize),

    /// Leading format tag is not one we write
    #[error("Unknown entry format tag: {0}")]
    UnknownFormat(u8),

    /// Expiry field is NaN or infinite
    #[error("Invalid expiry timestamp")]
    InvalidExpiry,

    /// Declared payload length disagrees with the blob size
    #[error("Payload length mismatch: declared {declared}, found {actual}")]
    LengthMismatch { declared: usize, actual: usize },

    /// Serialized payload does not fit the length prefix
    #[error("Payload too large: {0} bytes")]
    Oversized(usize),

    /// Payload could not be (de)serialized
    #[error("Payload error: {0}")]
    Payload(#[from] serde_json::Error),
}

// == Cache Error Enum ==
/// Unified error type for the cache.
#[derive(Error, Debug)]
pub enum CacheError {
    /// Key failed validation after pre-processing
    #[error("Invalid key: {0}")]
    InvalidKey(String),

    /// Configuration could not be turned into a working cache
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    /// Object store backend could not be constructed
    #[error("Backend error: {0}")]
    Backend(String),

    /// Invalid request data
    #[error("Invalid request: {0}")]
    InvalidRequest(String),

    /// Key not present in the cache
    #[error("Key not found: {0}")]
    NotFound(String),
}

// == IntoResponse Implementation ==
impl IntoResponse for CacheError {
    fn into_response(self) -> Response {
        let (status, message) = match &self {
            CacheError::InvalidKey(_) => (StatusCode::BAD_REQUEST, self.to_string()),
            CacheError::InvalidRequest(msg) => (StatusCode::BAD_REQUEST, msg.clone()),
            CacheError::NotFound(_) => (StatusCode::NOT_FOUND, self.to_string()),
            CacheError::InvalidConfig(msg) | CacheError::Backend(msg) => {
                (StatusCode::INTERNAL_SERVER_ERROR, msg.clone())
            }
        };

        let body = Json(json!({
            "error": message
        }));

        (status, body).into_response()
    }
}

// == Result Type Alias ==
/// Convenience Result type for the cache.
pub type Result<T> = std::result::Result<T, CacheError>;
