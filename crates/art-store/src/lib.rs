//! # art-store: Storage for the Artifact Registry
//!
//! Persists manifests and content blobs through a pluggable [`Driver`].
//!
//! - [`Driver`]: the five-operation key/blob capability every backend
//!   implements (`read`, `write`, `list`, `delete`, `exists`).
//! - [`MemoryDriver`]: shared in-memory map for tests.
//! - [`ObjectStoreDriver`]: S3, local directory or in-memory stores via
//!   the `object_store` crate.
//! - [`Repository`]: per-group manifest cache with lazy load and
//!   explicit save.
//! - [`keys`]: where manifests and blobs live in the key space.
//!
//! Repository and operation code only ever talk to the [`Driver`] trait;
//! backend details stay inside the driver modules.

pub mod driver;
pub mod error;
pub mod keys;
pub mod memory;
pub mod remote;
pub mod repository;

pub use driver::Driver;
pub use error::{StoreError, StoreResult};
pub use memory::MemoryDriver;
pub use remote::{ObjectStoreDriver, S3Config};
pub use repository::Repository;
