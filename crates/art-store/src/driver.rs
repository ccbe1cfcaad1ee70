//! # Driver: storage backend capability
//!
//! A driver is a flat key → bytes store. Keys are `/`-separated strings
//! built by [`crate::keys`]; drivers treat them as opaque except for
//! prefix listing.
//!
//! ## Contract
//!
//! | operation | missing key       | existing key        |
//! |-----------|-------------------|---------------------|
//! | `read`    | `NotFound`        | the stored bytes    |
//! | `write`   | creates           | replaces entirely   |
//! | `delete`  | `NotFound`        | removes             |
//! | `exists`  | `false`           | `true`              |
//!
//! `list(prefix)` returns every key that starts with `prefix` as a plain
//! string prefix, in no particular order, and an empty list when nothing
//! matches. Backend failures surface as `StoreError::Driver`.
//!
//! All calls block until the backend answers.

use crate::error::StoreResult;

/// Key/blob storage used by [`crate::Repository`].
pub trait Driver {
    /// Fetch the bytes stored at `key`.
    fn read(&self, key: &str) -> StoreResult<Vec<u8>>;

    /// Create or fully overwrite the object at `key`.
    fn write(&self, key: &str, bytes: &[u8]) -> StoreResult<()>;

    /// Every key starting with `prefix`.
    fn list(&self, prefix: &str) -> StoreResult<Vec<String>>;

    /// Remove the object at `key`.
    fn delete(&self, key: &str) -> StoreResult<()>;

    /// True if an object is stored at `key`.
    fn exists(&self, key: &str) -> StoreResult<bool>;
}

impl<D: Driver + ?Sized> Driver for Box<D> {
    fn read(&self, key: &str) -> StoreResult<Vec<u8>> {
        (**self).read(key)
    }

    fn write(&self, key: &str, bytes: &[u8]) -> StoreResult<()> {
        (**self).write(key, bytes)
    }

    fn list(&self, prefix: &str) -> StoreResult<Vec<String>> {
        (**self).list(prefix)
    }

    fn delete(&self, key: &str) -> StoreResult<()> {
        (**self).delete(key)
    }

    fn exists(&self, key: &str) -> StoreResult<bool> {
        (**self).exists(key)
    }
}
