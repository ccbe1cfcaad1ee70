//! # Object store driver
//!
//! [`ObjectStoreDriver`] adapts any `object_store::ObjectStore` (Amazon S3
//! and S3-compatible services, a local directory, or the crate's own
//! in-memory store) to the blocking [`Driver`] contract.
//!
//! The object store API is async. The driver owns a current-thread tokio
//! runtime and blocks on each call, so callers stay synchronous.
//!
//! ## Contract Alignment
//!
//! Object stores list by path component, while [`Driver::list`] is a
//! plain string prefix. `list` therefore asks the store for the deepest
//! directory contained in the prefix and filters the result. S3 deletes
//! succeed for missing keys, so `delete` checks existence first to report
//! `NotFound` like every other driver.
//!
//! `object_store` percent-encodes characters such as `~`, `%` and `#` in
//! each path segment. Listed locations are decoded again so `list` returns
//! the same keys that were written.

use std::path::Path as FsPath;
use std::sync::Arc;

use futures_util::TryStreamExt;
use object_store::aws::AmazonS3Builder;
use object_store::local::LocalFileSystem;
use object_store::memory::InMemory;
use object_store::path::Path;
use object_store::{ObjectStore, PutPayload};
use tokio::runtime::Runtime;

use crate::driver::Driver;
use crate::error::{StoreError, StoreResult};

/// Connection settings for an S3 bucket.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct S3Config {
    pub bucket: String,
    pub access_key: String,
    pub secret_key: String,
    pub region: Option<String>,
    /// Custom endpoint for S3-compatible services, e.g. `http://localhost:9000`.
    pub endpoint: Option<String>,
}

/// A [`Driver`] backed by an `object_store` implementation.
pub struct ObjectStoreDriver {
    store: Arc<dyn ObjectStore>,
    runtime: Runtime,
    location: String,
}

impl std::fmt::Debug for ObjectStoreDriver {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ObjectStoreDriver")
            .field("location", &self.location)
            .finish_non_exhaustive()
    }
}

impl ObjectStoreDriver {
    /// Wrap an existing store. `location` is only used in log output.
    pub fn new(store: Arc<dyn ObjectStore>, location: impl Into<String>) -> StoreResult<Self> {
        let runtime = tokio::runtime::Builder::new_current_thread()
            .enable_all()
            .build()
            .map_err(|e| StoreError::Driver(format!("failed to start I/O runtime: {e}")))?;
        Ok(Self {
            store,
            runtime,
            location: location.into(),
        })
    }

    /// Connect to an S3 bucket.
    pub fn s3(config: &S3Config) -> StoreResult<Self> {
        let mut builder = AmazonS3Builder::new()
            .with_bucket_name(&config.bucket)
            .with_access_key_id(&config.access_key)
            .with_secret_access_key(&config.secret_key);
        if let Some(region) = &config.region {
            builder = builder.with_region(region);
        }
        if let Some(endpoint) = &config.endpoint {
            builder = builder
                .with_endpoint(endpoint)
                .with_allow_http(endpoint.starts_with("http://"));
        }
        let store = builder
            .build()
            .map_err(|e| StoreError::Driver(format!("invalid S3 configuration: {e}")))?;
        Self::new(Arc::new(store), format!("s3://{}", config.bucket))
    }

    /// Store objects as files under `root`, creating it if needed.
    pub fn local(root: &FsPath) -> StoreResult<Self> {
        std::fs::create_dir_all(root).map_err(|e| {
            StoreError::Driver(format!("cannot create store root {}: {e}", root.display()))
        })?;
        let store = LocalFileSystem::new_with_prefix(root)
            .map_err(|e| StoreError::Driver(format!("invalid store root {}: {e}", root.display())))?;
        Self::new(Arc::new(store), format!("file://{}", root.display()))
    }

    /// A process-local store; contents vanish when the driver is dropped.
    pub fn in_memory() -> StoreResult<Self> {
        Self::new(Arc::new(InMemory::new()), "memory://")
    }

    /// Human-readable location of the backing store.
    pub fn location(&self) -> &str {
        &self.location
    }

    fn head(&self, key: &str) -> StoreResult<bool> {
        let path = Path::from(key);
        match self.runtime.block_on(self.store.head(&path)) {
            Ok(_) => Ok(true),
            Err(object_store::Error::NotFound { .. }) => Ok(false),
            Err(e) => Err(map_error(key, e)),
        }
    }
}

fn map_error(key: &str, err: object_store::Error) -> StoreError {
    match err {
        object_store::Error::NotFound { .. } => StoreError::not_found(key),
        other => StoreError::Driver(format!("{key}: {other}")),
    }
}

/// The key a location was written under, undoing per-segment encoding.
fn decode_location(location: &Path) -> StoreResult<String> {
    let encoded: &str = location.as_ref();
    urlencoding::decode(encoded)
        .map(|key| key.into_owned())
        .map_err(|e| StoreError::Driver(format!("{encoded}: undecodable key: {e}")))
}

impl Driver for ObjectStoreDriver {
    fn read(&self, key: &str) -> StoreResult<Vec<u8>> {
        let path = Path::from(key);
        tracing::debug!(key, store = %self.location, "read");
        let bytes = self
            .runtime
            .block_on(async {
                let result = self.store.get(&path).await?;
                result.bytes().await
            })
            .map_err(|e| map_error(key, e))?;
        Ok(bytes.to_vec())
    }

    fn write(&self, key: &str, bytes: &[u8]) -> StoreResult<()> {
        let path = Path::from(key);
        tracing::debug!(key, size = bytes.len(), store = %self.location, "write");
        self.runtime
            .block_on(self.store.put(&path, PutPayload::from(bytes.to_vec())))
            .map(|_| ())
            .map_err(|e| map_error(key, e))
    }

    fn list(&self, prefix: &str) -> StoreResult<Vec<String>> {
        let dir = prefix.rsplit_once('/').map(|(dir, _)| Path::from(dir));
        tracing::debug!(prefix, store = %self.location, "list");
        let locations = self
            .runtime
            .block_on(
                self.store
                    .list(dir.as_ref())
                    .map_ok(|meta| meta.location)
                    .try_collect::<Vec<Path>>(),
            )
            .map_err(|e| map_error(prefix, e))?;
        let mut keys = Vec::with_capacity(locations.len());
        for location in &locations {
            let key = decode_location(location)?;
            if key.starts_with(prefix) {
                keys.push(key);
            }
        }
        Ok(keys)
    }

    fn delete(&self, key: &str) -> StoreResult<()> {
        if !self.head(key)? {
            return Err(StoreError::not_found(key));
        }
        let path = Path::from(key);
        tracing::debug!(key, store = %self.location, "delete");
        self.runtime
            .block_on(self.store.delete(&path))
            .map_err(|e| map_error(key, e))
    }

    fn exists(&self, key: &str) -> StoreResult<bool> {
        self.head(key)
    }
}
