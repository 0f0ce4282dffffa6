//! Configuration Module
//!
//! Handles loading and managing cache and gateway configuration from
//! environment variables.

use std::env;
use std::path::PathBuf;

use chrono::Duration;

use crate::cache::CacheSettings;
use crate::error::CacheError;
use crate::options::StoreOptions;
use crate::store::StoreBackend;

/// Prefix of environment variables forwarded as store options.
const STORE_OPTION_PREFIX: &str = "S3_";

/// Cache and server configuration parameters.
///
/// All values can be configured via environment variables with sensible defaults.
#[derive(Debug, Clone)]
pub struct Config {
    /// Entries allowed before culling (0 = unbounded, clamped to 1000)
    pub max_entries: usize,
    /// 0 clears everything when full, N deletes every Nth listed entry
    pub cull_frequency: usize,
    /// Default TTL in seconds for entries without explicit TTL
    pub default_ttl: i64,
    /// Namespace prefix for stored objects
    pub location: String,
    /// Prefix handed to the key function
    pub key_prefix: String,
    /// Version handed to the key function
    pub key_version: u32,
    /// HTTP server port
    pub server_port: u16,
    /// Object store implementation
    pub backend: StoreBackend,
    /// Root directory for the local backend
    pub store_dir: PathBuf,
    /// Connection options for the S3 backend
    pub store_options: StoreOptions,
}

fn parsed<T: std::str::FromStr>(name: &str, default: T) -> T {
    env::var(name)
        .ok()
        .and_then(|v| v.parse().ok())
        .unwrap_or(default)
}

/// Parses `STORE_BACKEND`, defaulting to memory only when it is unset or empty.
fn backend_from(value: Option<String>) -> Result<StoreBackend, CacheError> {
    match value.filter(|v| !v.is_empty()) {
        Some(name) => name.parse(),
        None => Ok(StoreBackend::Memory),
    }
}

impl Config {
    /// Creates a new Config by loading values from environment variables.
    ///
    /// # Environment Variables
    /// - `MAX_ENTRIES` - Entries before culling (default: 300)
    /// - `CULL_FREQUENCY` - Culling sample rate (default: 3)
    /// - `DEFAULT_TTL` - TTL in seconds (default: 300)
    /// - `CACHE_LOCATION` - Namespace prefix (default: `S3_LOCATION` or empty)
    /// - `KEY_PREFIX` / `KEY_VERSION` - Key namespacing (default: empty / 1)
    /// - `SERVER_PORT` - HTTP server port (default: 3000)
    /// - `STORE_BACKEND` - `memory`, `local` or `s3` (default: memory)
    /// - `STORE_DIR` - Directory for the local backend (default: ./cache-data)
    /// - `S3_*` - Store options, e.g. `S3_BUCKET_NAME`, `S3_ACCESS_KEY_ID`
    ///
    /// An unknown `STORE_BACKEND` is an error rather than a silent fallback.
    pub fn from_env() -> Result<Self, CacheError> {
        let store_options = StoreOptions::from_pairs(env::vars().filter_map(|(name, value)| {
            name.strip_prefix(STORE_OPTION_PREFIX)
                .map(|option| (option.to_string(), value))
        }));
        let location = env::var("CACHE_LOCATION")
            .ok()
            .filter(|l| !l.is_empty())
            .unwrap_or_else(|| store_options.location().to_string());

        let backend = backend_from(env::var("STORE_BACKEND").ok())?;

        Ok(Self {
            max_entries: parsed("MAX_ENTRIES", 300),
            cull_frequency: parsed("CULL_FREQUENCY", 3),
            default_ttl: parsed("DEFAULT_TTL", 300),
            location,
            key_prefix: env::var("KEY_PREFIX").unwrap_or_default(),
            key_version: parsed("KEY_VERSION", 1),
            server_port: parsed("SERVER_PORT", 3000),
            backend,
            store_dir: env::var("STORE_DIR")
                .map(PathBuf::from)
                .unwrap_or_else(|_| PathBuf::from("./cache-data")),
            store_options,
        })
    }

    /// Engine settings derived from this configuration.
    pub fn cache_settings(&self) -> CacheSettings {
        CacheSettings::new(
            self.max_entries,
            self.cull_frequency,
            Duration::seconds(self.default_ttl),
        )
        .with_location(&self.location)
        .with_key_prefix(self.key_prefix.clone())
        .with_version(self.key_version)
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            max_entries: 300,
            cull_frequency: 3,
            default_ttl: 300,
            location: String::new(),
            key_prefix: String::new(),
            key_version: 1,
            server_port: 3000,
            backend: StoreBackend::Memory,
            store_dir: PathBuf::from("./cache-data"),
            store_options: StoreOptions::default(),
        }
    }
}
