//! S3 Cache - a key/value cache backed by an S3-compatible object store
//!
//! Entries carry their own expiry and are pruned lazily on read; a positional
//! culling pass on every write keeps the number of stored objects bounded.

pub mod api;
pub mod cache;
pub mod config;
pub mod error;
pub mod models;
pub mod options;
pub mod store;

pub use api::AppState;
pub use cache::{CacheSettings, S3Cache};
pub use config::Config;
pub use error::{CacheError, DecodeError, StoreError};
pub use options::StoreOptions;
pub use store::{MemoryStore, ObjectStore, RemoteStore};
