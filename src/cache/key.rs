//! Key Codec Module
//!
//! Turns application keys into flat, fixed-length object names.

use std::sync::Arc;

use sha2::{Digest, Sha256};

use crate::cache::MAX_KEY_LENGTH;
use crate::error::{CacheError, Result};

/// Host-supplied key function: `(key, key_prefix, version) -> full key`.
pub type KeyFunc = Arc<dyn Fn(&str, &str, u32) -> String + Send + Sync>;

/// Default key function, joining prefix, version and key with `:`.
pub fn default_key_func(key: &str, key_prefix: &str, version: u32) -> String {
    format!("{}:{}:{}", key_prefix, version, key)
}

// == Validate Key ==
/// Checks a pre-processed key before it is hashed.
///
/// Rejects empty keys, keys longer than [`MAX_KEY_LENGTH`] bytes, and keys
/// containing spaces or control characters.
pub fn validate_key(key: &str) -> Result<()> {
    if key.is_empty() {
        return Err(CacheError::InvalidKey("Key cannot be empty".to_string()));
    }
    if key.len() > MAX_KEY_LENGTH {
        return Err(CacheError::InvalidKey(format!(
            "Key exceeds maximum length of {} bytes",
            MAX_KEY_LENGTH
        )));
    }
    if key.chars().any(|c| c == ' ' || c.is_control()) {
        return Err(CacheError::InvalidKey(format!(
            "Key contains whitespace or control characters: {:?}",
            key
        )));
    }
    Ok(())
}

// == Object Name ==
/// Maps a key to its object name: lowercase hex SHA-256 of the UTF-8 bytes.
pub fn object_name(key: &str) -> String {
    hex::encode(Sha256::digest(key.as_bytes()))
}

/// Joins a location prefix and an object name into a store path.
pub fn object_path(location: &str, name: &str) -> String {
    if location.is_empty() {
        name.to_string()
    } else {
        format!("{}/{}", location, name)
    }
}
