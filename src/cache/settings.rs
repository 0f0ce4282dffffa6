//! Cache Settings Module
//!
//! Immutable per-instance settings consumed by the engine.

use chrono::Duration;

use crate::cache::LISTING_LIMIT;

// == Cache Settings ==
/// Settings fixed at construction time.
#[derive(Debug, Clone, PartialEq)]
pub struct CacheSettings {
    max_entries: usize,
    cull_frequency: usize,
    default_ttl: Duration,
    location: String,
    key_prefix: String,
    version: u32,
}

impl CacheSettings {
    // == Constructor ==
    /// Creates settings, clamping `max_entries` to the store listing limit.
    ///
    /// # Arguments
    /// * `max_entries` - Maximum entries before culling kicks in (0 = unbounded)
    /// * `cull_frequency` - 0 deletes everything, N deletes every Nth listed entry
    /// * `default_ttl` - TTL used when `set` is called without one
    pub fn new(max_entries: usize, cull_frequency: usize, default_ttl: Duration) -> Self {
        Self {
            max_entries: max_entries.min(LISTING_LIMIT),
            cull_frequency,
            default_ttl,
            location: String::new(),
            key_prefix: String::new(),
            version: 1,
        }
    }

    /// Sets the namespace prefix, stripping leading and trailing slashes.
    pub fn with_location(mut self, location: &str) -> Self {
        self.location = location.trim_matches('/').to_string();
        self
    }

    /// Sets the prefix handed to the key function.
    pub fn with_key_prefix(mut self, key_prefix: impl Into<String>) -> Self {
        self.key_prefix = key_prefix.into();
        self
    }

    /// Sets the key version handed to the key function.
    pub fn with_version(mut self, version: u32) -> Self {
        self.version = version;
        self
    }

    pub fn max_entries(&self) -> usize {
        self.max_entries
    }

    pub fn cull_frequency(&self) -> usize {
        self.cull_frequency
    }

    pub fn default_ttl(&self) -> Duration {
        self.default_ttl
    }

    pub fn location(&self) -> &str {
        &self.location
    }

    pub fn key_prefix(&self) -> &str {
        &self.key_prefix
    }

    pub fn version(&self) -> u32 {
        self.version
    }
}

impl Default for CacheSettings {
    fn default() -> Self {
        Self::new(300, 3, Duration::seconds(300))
    }
}
