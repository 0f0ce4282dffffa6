//! Cache Engine Module
//!
//! get/set/add/delete/has/clear on top of an [`ObjectStore`].
//!
//! Store outages and corrupt entries degrade to cache misses; the only error
//! a caller ever sees is [`CacheError::InvalidKey`](crate::error::CacheError::InvalidKey).
//!
//! Nothing here is atomic across the network. `add` is a check-then-act
//! sequence, so two concurrent `add` calls for one key may both succeed with
//! the last write winning. Two concurrent writers may also cull the same
//! listing; deletes are idempotent so that only wastes a round-trip.

use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;

use bytes::Bytes;
use chrono::Duration;
use serde::{de::DeserializeOwned, Serialize};
use tracing::{debug, warn};

use crate::cache::cull::{cull, sweep};
use crate::cache::entry::{self, is_expired, now_secs};
use crate::cache::key::{default_key_func, object_name, object_path, validate_key, KeyFunc};
use crate::cache::{CacheSettings, LISTING_LIMIT};
use crate::error::Result;
use crate::store::ObjectStore;

/// Outcome of reading an entry's header.
enum Lookup {
    /// Entry is present and not expired
    Live(Bytes),
    /// No usable entry (absent, expired, corrupt or unreadable)
    Miss,
}

// == S3 Cache ==
/// Cache engine holding only immutable settings and a store handle.
pub struct S3Cache<S> {
    store: S,
    settings: CacheSettings,
    key_func: KeyFunc,
}

impl<S> fmt::Debug for S3Cache<S> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("S3Cache")
            .field("settings", &self.settings)
            .finish_non_exhaustive()
    }
}

impl<S: ObjectStore> S3Cache<S> {
    // == Constructor ==
    /// Creates a cache over `store` using the default key function.
    pub fn new(store: S, settings: CacheSettings) -> Self {
        Self {
            store,
            settings,
            key_func: Arc::new(default_key_func),
        }
    }

    /// Replaces the key function applied before validation and hashing.
    pub fn with_key_func<F>(mut self, key_func: F) -> Self
    where
        F: Fn(&str, &str, u32) -> String + Send + Sync + 'static,
    {
        self.key_func = Arc::new(key_func);
        self
    }

    pub fn settings(&self) -> &CacheSettings {
        &self.settings
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    // == Make Key ==
    /// Applies the key function to an application key.
    pub fn make_key(&self, key: &str) -> String {
        (self.key_func)(key, self.settings.key_prefix(), self.settings.version())
    }

    /// Full store path for an application key, after validation.
    pub fn object_path_for(&self, key: &str) -> Result<String> {
        let full_key = self.make_key(key);
        validate_key(&full_key)?;
        Ok(object_path(self.settings.location(), &object_name(&full_key)))
    }

    // == Get ==
    /// Returns the live value stored for `key`, or `None` on any miss.
    pub async fn get<V: DeserializeOwned>(&self, key: &str) -> Result<Option<V>> {
        let path = self.object_path_for(key)?;
        let blob = match self.lookup(&path).await {
            Lookup::Live(blob) => blob,
            Lookup::Miss => return Ok(None),
        };

        match entry::decode_value(&blob) {
            Ok(value) => Ok(Some(value)),
            Err(e) => {
                // Payload problems may be a type mismatch on our side, so the
                // blob is left in place.
                debug!("Cache miss for '{}': {}", key, e);
                Ok(None)
            }
        }
    }

    /// Like [`get`](Self::get), returning `default` on a miss.
    pub async fn get_or<V: DeserializeOwned>(&self, key: &str, default: V) -> Result<V> {
        Ok(self.get(key).await?.unwrap_or(default))
    }

    // == Has ==
    /// Returns true if a live entry exists for `key`.
    pub async fn has(&self, key: &str) -> Result<bool> {
        let path = self.object_path_for(key)?;
        Ok(matches!(self.lookup(&path).await, Lookup::Live(_)))
    }

    // == Set ==
    /// Stores `value` for `key`, expiring after `ttl` (or the default TTL).
    ///
    /// Culls first. Write failures are logged and leave the previous value
    /// (or its absence) in place.
    pub async fn set<V: Serialize + ?Sized>(
        &self,
        key: &str,
        value: &V,
        ttl: Option<Duration>,
    ) -> Result<()> {
        let path = self.object_path_for(key)?;
        self.cull().await;
        self.write(&path, value, ttl).await;
        Ok(())
    }

    // == Add ==
    /// Stores `value` only if `key` has no live entry.
    ///
    /// Returns false without writing when a live entry exists. A store
    /// failure during the check reads as absent, so the write is attempted.
    pub async fn add<V: Serialize + ?Sized>(
        &self,
        key: &str,
        value: &V,
        ttl: Option<Duration>,
    ) -> Result<bool> {
        if self.has(key).await? {
            return Ok(false);
        }
        self.set(key, value, ttl).await?;
        Ok(true)
    }

    // == Delete ==
    /// Removes the entry for `key`. Missing keys and store failures are ignored.
    pub async fn delete(&self, key: &str) -> Result<()> {
        let path = self.object_path_for(key)?;
        self.remove(&path).await;
        Ok(())
    }

    // == Clear ==
    /// Deletes every listed entry under the configured location.
    ///
    /// One listing pass, so at most the store's listing limit is removed.
    pub async fn clear(&self) {
        sweep(&self.store, self.settings.location(), 0, 0).await;
    }

    // == Batch Operations ==
    /// Fetches several keys, returning only the hits.
    pub async fn get_many<V: DeserializeOwned>(&self, keys: &[&str]) -> Result<HashMap<String, V>> {
        let mut found = HashMap::with_capacity(keys.len());
        for key in keys {
            if let Some(value) = self.get(key).await? {
                found.insert(key.to_string(), value);
            }
        }
        Ok(found)
    }

    /// Stores several entries with a shared TTL.
    ///
    /// Keys are validated up front so an invalid key writes nothing.
    pub async fn set_many<V: Serialize>(&self, entries: &[(&str, V)], ttl: Option<Duration>) -> Result<()> {
        let paths = entries
            .iter()
            .map(|(key, _)| self.object_path_for(key))
            .collect::<Result<Vec<_>>>()?;
        for (path, (_, value)) in paths.iter().zip(entries) {
            self.cull().await;
            self.write(path, value, ttl).await;
        }
        Ok(())
    }

    /// Removes several keys with a single batch delete.
    pub async fn delete_many(&self, keys: &[&str]) -> Result<()> {
        let paths = keys
            .iter()
            .map(|key| self.object_path_for(key))
            .collect::<Result<Vec<_>>>()?;
        if let Err(e) = self.store.delete_objects(&paths).await {
            warn!("Batch delete of {} entries failed: {}", paths.len(), e);
        }
        Ok(())
    }

    /// Number of objects listed under the location, capped at the listing
    /// limit. `None` if the store could not be listed.
    pub async fn entry_count(&self) -> Option<usize> {
        match self.store.list_objects(self.settings.location(), LISTING_LIMIT).await {
            Ok(names) => Some(names.len()),
            Err(e) => {
                warn!("Counting entries failed: {}", e);
                None
            }
        }
    }

    // == Internals ==
    async fn cull(&self) {
        cull(
            &self.store,
            self.settings.location(),
            self.settings.max_entries(),
            self.settings.cull_frequency(),
        )
        .await;
    }

    /// Fetches a blob and checks its expiry header, lazily deleting expired
    /// or corrupt entries.
    async fn lookup(&self, path: &str) -> Lookup {
        let blob = match self.store.get_object(path).await {
            Ok(blob) => blob,
            Err(e) if e.is_not_found() => return Lookup::Miss,
            Err(e) => {
                warn!("Reading '{}' failed, treating as miss: {}", path, e);
                return Lookup::Miss;
            }
        };

        match entry::decode_expiry(&blob) {
            Ok(expires_at) if is_expired(expires_at, now_secs()) => {
                debug!("Entry '{}' expired, deleting", path);
                self.remove(path).await;
                Lookup::Miss
            }
            Ok(_) => Lookup::Live(blob),
            Err(e) => {
                warn!("Entry '{}' is corrupt, deleting: {}", path, e);
                self.remove(path).await;
                Lookup::Miss
            }
        }
    }

    async fn write<V: Serialize + ?Sized>(&self, path: &str, value: &V, ttl: Option<Duration>) {
        let ttl = ttl.unwrap_or_else(|| self.settings.default_ttl());
        let expires_at = now_secs() + ttl.num_milliseconds() as f64 / 1000.0;

        let blob = match entry::encode(value, expires_at) {
            Ok(blob) => blob,
            Err(e) => {
                warn!("Could not encode entry for '{}': {}", path, e);
                return;
            }
        };

        if let Err(e) = self.store.put_object(path, blob).await {
            warn!("Writing '{}' failed, entry not cached: {}", path, e);
        }
    }

    async fn remove(&self, path: &str) {
        match self.store.delete_object(path).await {
            Err(e) if !e.is_not_found() => warn!("Deleting '{}' failed: {}", path, e),
            _ => {}
        }
    }
}
