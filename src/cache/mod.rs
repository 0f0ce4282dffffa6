//! Cache Module
//!
//! Object-store backed caching with TTL expiration and bounded culling.

pub mod cull;
mod engine;
pub mod entry;
pub mod key;
mod settings;


// Re-export public types
pub use engine::S3Cache;
pub use key::{object_name, KeyFunc};
pub use settings::CacheSettings;

// == Public Constants ==
/// Maximum allowed key length in bytes, after pre-processing
pub const MAX_KEY_LENGTH: usize = 250;

/// Most names a single store listing returns; also the ceiling for `max_entries`
pub const LISTING_LIMIT: usize = 1000;
