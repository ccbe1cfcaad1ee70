//! # Storage Error Types
//!
//! Every backend maps its native failures onto [`StoreError`] so that the
//! repository and the operations above it see the same error kinds no
//! matter which driver is in use.

use art_core::ValidationError;
use thiserror::Error;

/// Result alias used throughout `art-store`.
pub type StoreResult<T> = Result<T, StoreError>;

/// Errors from drivers and the repository.
#[derive(Error, Debug)]
pub enum StoreError {
    /// The key, manifest or blob does not exist.
    #[error("not found: {key}")]
    NotFound {
        /// The missing key (or a description of the missing selection).
        key: String,
    },

    /// A stored manifest exists but cannot be trusted.
    ///
    /// Never treated as an empty manifest: doing so would reuse revisions
    /// and overwrite stored blobs.
    #[error("manifest for {name:?} is corrupt: {reason}")]
    CorruptManifest {
        /// Artifact name whose manifest failed to decode.
        name: String,
        /// Decoder or invariant failure.
        reason: String,
    },

    /// The in-memory manifest could not be serialized.
    #[error("failed to encode manifest for {name:?}: {reason}")]
    Encode {
        /// Artifact name being saved.
        name: String,
        /// Encoder failure.
        reason: String,
    },

    /// Transport or backend failure.
    #[error("driver error: {0}")]
    Driver(String),

    /// The stored manifest changed since it was loaded.
    #[error("manifest for {name:?} was modified concurrently; reload and retry")]
    Conflict {
        /// Artifact name whose manifest changed.
        name: String,
    },

    /// A record or identifier failed validation.
    #[error("validation error: {0}")]
    Validation(#[from] ValidationError),
}

impl StoreError {
    /// Shorthand for [`StoreError::NotFound`].
    pub fn not_found(key: impl Into<String>) -> Self {
        Self::NotFound { key: key.into() }
    }

    /// True for [`StoreError::NotFound`].
    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::NotFound { .. })
    }
}
