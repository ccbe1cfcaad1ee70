//! Errors specific to the command layer.
//!
//! Storage and model errors pass through unchanged inside `anyhow::Error`
//! so callers can still downcast to `StoreError` or `FilenameParseError`.

use std::path::PathBuf;

use thiserror::Error;

#[derive(Error, Debug)]
pub enum OperationError {
    /// Downloaded bytes do not hash to the MD5 recorded at upload time.
    #[error("checksum mismatch for {artifact}: manifest records {expected}, blob hashes to {actual}")]
    ChecksumMismatch {
        artifact: String,
        expected: String,
        actual: String,
    },

    /// The local file changed between inspection and upload.
    #[error("{} changed while it was being uploaded", path.display())]
    FileChanged { path: PathBuf },

    /// A required store setting was not supplied anywhere.
    #[error("setting {setting:?} is missing; pass {flag} or add it to {}", config.display())]
    MissingSetting {
        setting: &'static str,
        flag: &'static str,
        config: PathBuf,
    },

    /// The config file exists but could not be parsed.
    #[error("cannot parse configuration file {}: {reason}", path.display())]
    InvalidConfig { path: PathBuf, reason: String },
}
