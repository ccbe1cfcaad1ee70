//! In-memory [`Driver`] for tests and dry runs.
//!
//! Clones share the same underlying map, so a test can hand one clone to
//! a [`crate::Repository`] and inspect the stored objects through another.

use std::collections::BTreeMap;
use std::sync::Arc;

use parking_lot::RwLock;

use crate::driver::Driver;
use crate::error::{StoreError, StoreResult};

/// A key → bytes map behind a shared lock.
#[derive(Debug, Clone, Default)]
pub struct MemoryDriver {
    objects: Arc<RwLock<BTreeMap<String, Vec<u8>>>>,
}

impl MemoryDriver {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of stored objects.
    pub fn len(&self) -> usize {
        self.objects.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.objects.read().is_empty()
    }
}

impl Driver for MemoryDriver {
    fn read(&self, key: &str) -> StoreResult<Vec<u8>> {
        self.objects
            .read()
            .get(key)
            .cloned()
            .ok_or_else(|| StoreError::not_found(key))
    }

    fn write(&self, key: &str, bytes: &[u8]) -> StoreResult<()> {
        self.objects.write().insert(key.to_string(), bytes.to_vec());
        Ok(())
    }

    fn list(&self, prefix: &str) -> StoreResult<Vec<String>> {
        Ok(self
            .objects
            .read()
            .keys()
            .filter(|k| k.starts_with(prefix))
            .cloned()
            .collect())
    }

    fn delete(&self, key: &str) -> StoreResult<()> {
        self.objects
            .write()
            .remove(key)
            .map(|_| ())
            .ok_or_else(|| StoreError::not_found(key))
    }

    fn exists(&self, key: &str) -> StoreResult<bool> {
        Ok(self.objects.read().contains_key(key))
    }
}
