//! Object store adapter over the `object_store` crate.
//!
//! Used for S3-compatible buckets and for plain local directories.

use std::path::Path as FsPath;
use std::sync::Arc;

use async_trait::async_trait;
use bytes::Bytes;
use futures::stream::{self, StreamExt, TryStreamExt};
use object_store::aws::AmazonS3Builder;
use object_store::local::LocalFileSystem;
use object_store::path::Path;
use object_store::{ObjectStore as _, PutPayload};
use tracing::debug;

use crate::error::{CacheError, StoreError};
use crate::options::StoreOptions;
use crate::store::ObjectStore;

/// Store that forwards to any `object_store` implementation.
#[derive(Debug, Clone)]
pub struct RemoteStore {
    inner: Arc<dyn object_store::ObjectStore>,
}

impl RemoteStore {
    /// Wraps an existing `object_store` client.
    pub fn new(inner: Arc<dyn object_store::ObjectStore>) -> Self {
        Self { inner }
    }

    /// Connects to an S3-compatible bucket.
    ///
    /// Credentials missing from `options` fall back to the standard `AWS_*`
    /// environment variables.
    pub fn s3(options: &StoreOptions) -> Result<Self, CacheError> {
        let bucket = options
            .bucket_name()
            .ok_or_else(|| CacheError::Backend("No bucket name configured".to_string()))?;

        let mut builder = AmazonS3Builder::from_env().with_bucket_name(bucket);
        if let Some(access_key) = options.access_key() {
            builder = builder.with_access_key_id(access_key);
        }
        if let Some(secret_key) = options.secret_key() {
            builder = builder.with_secret_access_key(secret_key);
        }
        if let Some(region) = options.region() {
            builder = builder.with_region(region);
        }
        if let Some(endpoint) = options.endpoint() {
            builder = builder
                .with_endpoint(endpoint)
                .with_allow_http(endpoint.starts_with("http://"));
        }

        let s3 = builder
            .build()
            .map_err(|e| CacheError::Backend(e.to_string()))?;
        debug!(
            "Connected S3 object store for bucket {} (default_acl={}, bucket_acl={})",
            bucket,
            options.default_acl(),
            options.bucket_acl()
        );
        Ok(Self::new(Arc::new(s3)))
    }

    /// Stores objects as files below `root`, creating it if needed.
    pub fn local(root: &FsPath) -> Result<Self, CacheError> {
        std::fs::create_dir_all(root).map_err(|e| CacheError::Backend(e.to_string()))?;
        let fs = LocalFileSystem::new_with_prefix(root)
            .map_err(|e| CacheError::Backend(e.to_string()))?;
        Ok(Self::new(Arc::new(fs)))
    }
}

/// Maps `object_store` failures onto the cache's store error kinds.
fn classify(err: object_store::Error) -> StoreError {
    match err {
        object_store::Error::NotFound { path, .. } => StoreError::NotFound(path),
        object_store::Error::PermissionDenied { path, .. }
        | object_store::Error::Unauthenticated { path, .. } => StoreError::Unauthorized(path),
        object_store::Error::Generic { store, source } => {
            let message = format!("{}: {}", store, source);
            if message.contains("SlowDown") || message.contains("429") {
                StoreError::RateLimited(message)
            } else {
                StoreError::Transport(message)
            }
        }
        other => StoreError::Other(other.to_string()),
    }
}

#[async_trait]
impl ObjectStore for RemoteStore {
    async fn put_object(&self, name: &str, bytes: Bytes) -> Result<(), StoreError> {
        self.inner
            .put(&Path::from(name), PutPayload::from(bytes))
            .await
            .map(|_| ())
            .map_err(classify)
    }

    async fn get_object(&self, name: &str) -> Result<Bytes, StoreError> {
        let result = self.inner.get(&Path::from(name)).await.map_err(classify)?;
        result.bytes().await.map_err(classify)
    }

    async fn delete_object(&self, name: &str) -> Result<(), StoreError> {
        match self.inner.delete(&Path::from(name)).await {
            Ok(()) | Err(object_store::Error::NotFound { .. }) => Ok(()),
            Err(e) => Err(classify(e)),
        }
    }

    async fn list_objects(&self, prefix: &str, limit: usize) -> Result<Vec<String>, StoreError> {
        let prefix = (!prefix.is_empty()).then(|| Path::from(prefix));
        self.inner
            .list(prefix.as_ref())
            .take(limit)
            .map_ok(|meta| meta.location.to_string())
            .try_collect()
            .await
            .map_err(classify)
    }

    async fn delete_objects(&self, names: &[String]) -> Result<(), StoreError> {
        let locations = stream::iter(names.iter().map(|name| Ok(Path::from(name.as_str())))).boxed();
        let failures: Vec<StoreError> = self
            .inner
            .delete_stream(locations)
            .filter_map(|result| async move {
                match result {
                    Ok(_) | Err(object_store::Error::NotFound { .. }) => None,
                    Err(e) => Some(classify(e)),
                }
            })
            .collect()
            .await;

        match failures.into_iter().next() {
            None => Ok(()),
            Some(first) => Err(first),
        }
    }
}
