//! Object Store Module
//!
//! The storage port the cache engine talks to, plus its implementations.

mod memory;
mod remote;

use std::path::Path;
use std::sync::Arc;

use async_trait::async_trait;
use bytes::Bytes;

use crate::error::{CacheError, StoreError};
use crate::options::StoreOptions;

pub use memory::MemoryStore;
pub use remote::RemoteStore;

// == Object Store Trait ==
/// Key-addressed blob storage with prefix listing and batch delete.
///
/// Names are flat strings; a `location/` prefix is only meaningful to
/// `list_objects`, which returns names under `prefix/` (or every name when
/// `prefix` is empty).
#[async_trait]
pub trait ObjectStore: Send + Sync {
    /// Writes `bytes` under `name`, replacing any existing object.
    async fn put_object(&self, name: &str, bytes: Bytes) -> Result<(), StoreError>;

    /// Reads the object stored under `name`.
    async fn get_object(&self, name: &str) -> Result<Bytes, StoreError>;

    /// Removes the object stored under `name`.
    async fn delete_object(&self, name: &str) -> Result<(), StoreError>;

    /// Lists at most `limit` names under `prefix`.
    async fn list_objects(&self, prefix: &str, limit: usize) -> Result<Vec<String>, StoreError>;

    /// Removes every object in `names`. Missing names are not an error.
    async fn delete_objects(&self, names: &[String]) -> Result<(), StoreError>;
}

#[async_trait]
impl<T: ObjectStore + ?Sized> ObjectStore for Arc<T> {
    async fn put_object(&self, name: &str, bytes: Bytes) -> Result<(), StoreError> {
        (**self).put_object(name, bytes).await
    }

    async fn get_object(&self, name: &str) -> Result<Bytes, StoreError> {
        (**self).get_object(name).await
    }

    async fn delete_object(&self, name: &str) -> Result<(), StoreError> {
        (**self).delete_object(name).await
    }

    async fn list_objects(&self, prefix: &str, limit: usize) -> Result<Vec<String>, StoreError> {
        (**self).list_objects(prefix, limit).await
    }

    async fn delete_objects(&self, names: &[String]) -> Result<(), StoreError> {
        (**self).delete_objects(names).await
    }
}

// == Store Backend ==
/// Which object store implementation to open.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StoreBackend {
    /// Process-local map, lost on exit
    Memory,
    /// A directory on the local filesystem
    Local,
    /// An S3-compatible bucket
    S3,
}

impl std::str::FromStr for StoreBackend {
    type Err = CacheError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "memory" => Ok(StoreBackend::Memory),
            "local" | "fs" => Ok(StoreBackend::Local),
            "s3" => Ok(StoreBackend::S3),
            other => Err(CacheError::InvalidConfig(format!(
                "Unknown store backend '{}'",
                other
            ))),
        }
    }
}

/// Opens the configured backend as a shared trait object.
pub fn open_store(
    backend: StoreBackend,
    options: &StoreOptions,
    store_dir: &Path,
) -> Result<Arc<dyn ObjectStore>, CacheError> {
    let store: Arc<dyn ObjectStore> = match backend {
        StoreBackend::Memory => Arc::new(MemoryStore::new()),
        StoreBackend::Local => Arc::new(RemoteStore::local(store_dir)?),
        StoreBackend::S3 => Arc::new(RemoteStore::s3(options)?),
    };
    Ok(store)
}
