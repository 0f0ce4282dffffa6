//! In-memory object store, used for tests and single-process runs.

use std::collections::BTreeMap;

use async_trait::async_trait;
use bytes::Bytes;
use tokio::sync::RwLock;

use crate::error::StoreError;
use crate::store::ObjectStore;

/// Object store backed by an ordered map.
///
/// Listings come back in lexicographic name order, which keeps culling
/// deterministic in tests.
#[derive(Debug, Default)]
pub struct MemoryStore {
    objects: RwLock<BTreeMap<String, Bytes>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of objects currently held.
    pub async fn len(&self) -> usize {
        self.objects.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.objects.read().await.is_empty()
    }

    pub async fn contains(&self, name: &str) -> bool {
        self.objects.read().await.contains_key(name)
    }

    /// Snapshot of all object names.
    pub async fn names(&self) -> Vec<String> {
        self.objects.read().await.keys().cloned().collect()
    }
}

fn under_prefix(name: &str, prefix: &str) -> bool {
    prefix.is_empty()
        || name
            .strip_prefix(prefix)
            .is_some_and(|rest| rest.starts_with('/'))
}

#[async_trait]
impl ObjectStore for MemoryStore {
    async fn put_object(&self, name: &str, bytes: Bytes) -> Result<(), StoreError> {
        self.objects.write().await.insert(name.to_string(), bytes);
        Ok(())
    }

    async fn get_object(&self, name: &str) -> Result<Bytes, StoreError> {
        self.objects
            .read()
            .await
            .get(name)
            .cloned()
            .ok_or_else(|| StoreError::NotFound(name.to_string()))
    }

    async fn delete_object(&self, name: &str) -> Result<(), StoreError> {
        self.objects.write().await.remove(name);
        Ok(())
    }

    async fn list_objects(&self, prefix: &str, limit: usize) -> Result<Vec<String>, StoreError> {
        Ok(self
            .objects
            .read()
            .await
            .keys()
            .filter(|name| under_prefix(name, prefix))
            .take(limit)
            .cloned()
            .collect())
    }

    async fn delete_objects(&self, names: &[String]) -> Result<(), StoreError> {
        let mut objects = self.objects.write().await;
        for name in names {
            objects.remove(name);
        }
        Ok(())
    }
}
