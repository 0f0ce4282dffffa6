//! Response DTOs for the cache gateway
//!
//! Defines the structure of outgoing HTTP response bodies.

use serde::Serialize;
use serde_json::Value;

/// Response body for GET /cache/:key
#[derive(Debug, Clone, Serialize)]
pub struct GetResponse {
    /// The requested key
    pub key: String,
    /// The stored value
    pub value: Value,
}

impl GetResponse {
    /// Creates a new GetResponse
    pub fn new(key: impl Into<String>, value: Value) -> Self {
        Self {
            key: key.into(),
            value,
        }
    }
}

/// Response body for PUT /cache/:key and DELETE /cache/:key
#[derive(Debug, Clone, Serialize)]
pub struct KeyResponse {
    /// Human readable outcome
    pub message: String,
    /// The key that was acted on
    pub key: String,
}

impl KeyResponse {
    /// Creates a response for a stored key
    pub fn stored(key: impl Into<String>) -> Self {
        let key = key.into();
        Self {
            message: format!("Key '{}' stored", key),
            key,
        }
    }

    /// Creates a response for a deleted key
    pub fn deleted(key: impl Into<String>) -> Self {
        let key = key.into();
        Self {
            message: format!("Key '{}' deleted", key),
            key,
        }
    }
}

/// Response body for POST /cache/:key/add
#[derive(Debug, Clone, Serialize)]
pub struct AddResponse {
    pub key: String,
    /// False if a live entry already existed
    pub added: bool,
}

/// Response body for GET /cache/:key/exists
#[derive(Debug, Clone, Serialize)]
pub struct ExistsResponse {
    pub key: String,
    pub exists: bool,
}

/// Response body for DELETE /cache
#[derive(Debug, Clone, Serialize)]
pub struct ClearResponse {
    pub message: String,
}

impl ClearResponse {
    pub fn cleared() -> Self {
        Self {
            message: "Cache cleared".to_string(),
        }
    }
}

/// Response body for the health endpoint (GET /health)
#[derive(Debug, Clone, Serialize)]
pub struct HealthResponse {
    /// "healthy" if the store could be listed, "degraded" otherwise
    pub status: String,
    /// Current timestamp in ISO 8601 format
    pub timestamp: String,
    /// Listed entries under the cache location (capped at 1000)
    pub entries: Option<usize>,
}

impl HealthResponse {
    /// Creates a HealthResponse from the current entry count
    pub fn from_entry_count(entries: Option<usize>) -> Self {
        let status = if entries.is_some() { "healthy" } else { "degraded" };
        Self {
            status: status.to_string(),
            timestamp: chrono::Utc::now().to_rfc3339(),
            entries,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_get_response_serialize() {
        let resp = GetResponse::new("test_key", json!({"a": 1}));
        let json = serde_json::to_string(&resp).unwrap();
        assert!(json.contains("test_key"));
        assert!(json.contains(r#""value":{"a":1}"#));
    }

    #[test]
    fn test_key_responses() {
        assert!(KeyResponse::stored("my_key").message.contains("stored"));
        assert!(KeyResponse::deleted("my_key").message.contains("deleted"));
    }

    #[test]
    fn test_health_response_status() {
        let healthy = HealthResponse::from_entry_count(Some(3));
        assert_eq!(healthy.status, "healthy");
        assert_eq!(healthy.entries, Some(3));

        let degraded = HealthResponse::from_entry_count(None);
        assert_eq!(degraded.status, "degraded");
        let json = serde_json::to_string(&degraded).unwrap();
        assert!(json.contains("timestamp"));
    }
}
