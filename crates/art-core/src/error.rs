//! # Error Types
//!
//! Errors raised while constructing artifact records, parsing upload
//! filenames, and decoding manifests. All errors use `thiserror`.

use thiserror::Error;

/// A record field failed construction-time validation.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ValidationError {
    /// A required identity field was empty.
    #[error("{field} must not be empty")]
    Empty {
        /// Name of the offending field.
        field: &'static str,
    },

    /// An identity field contains a character that cannot appear in a storage key.
    #[error("{field} contains an invalid character {ch:?}: {value:?}")]
    InvalidCharacter {
        /// Name of the offending field.
        field: &'static str,
        /// The rejected character.
        ch: char,
        /// The full rejected value.
        value: String,
    },

    /// Revisions start at 1.
    #[error("revision must be >= 1, got {0}")]
    Revision(u32),

    /// A hex digest had the wrong length or non-hex characters.
    #[error("{field} must be {expected} hex characters, got {value:?}")]
    HexDigest {
        /// Name of the offending field.
        field: &'static str,
        /// Required number of hex characters.
        expected: usize,
        /// The rejected value.
        value: String,
    },

    /// A timestamp could not be parsed or is out of range.
    #[error("invalid timestamp: {0}")]
    Timestamp(String),

    /// The record does not belong to the manifest it is being added to.
    #[error("record {actual} does not belong to manifest {expected}")]
    Partition {
        /// `group_id/name` the manifest is keyed by.
        expected: String,
        /// `group_id/name` of the rejected record.
        actual: String,
    },
}

/// An upload filename does not follow `<name>-<version>.<extension>`.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("filename {filename:?} does not match <name>-<version>.<extension>: {reason}")]
pub struct FilenameParseError {
    /// The rejected filename.
    pub filename: String,
    /// Which part of the convention was violated.
    pub reason: &'static str,
}

/// A serialized manifest could not be turned back into records.
#[derive(Error, Debug)]
pub enum ManifestError {
    /// The bytes are not a valid JSON array of artifact records.
    #[error("manifest decode failed: {0}")]
    Decode(#[from] serde_json::Error),

    /// The records decoded but break a manifest invariant.
    #[error("manifest is inconsistent: {0}")]
    Inconsistent(String),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_field_display() {
        let err = ValidationError::Empty { field: "name" };
        assert_eq!(err.to_string(), "name must not be empty");
    }

    #[test]
    fn hex_digest_display_names_length() {
        let err = ValidationError::HexDigest {
            field: "md5",
            expected: 32,
            value: "abc".to_string(),
        };
        let msg = err.to_string();
        assert!(msg.contains("md5"));
        assert!(msg.contains("32"));
        assert!(msg.contains("abc"));
    }

    #[test]
    fn filename_parse_display() {
        let err = FilenameParseError {
            filename: "README".to_string(),
            reason: "missing extension",
        };
        let msg = err.to_string();
        assert!(msg.contains("README"));
        assert!(msg.contains("missing extension"));
    }

    #[test]
    fn manifest_decode_from_serde() {
        let serde_err = serde_json::from_str::<Vec<u8>>("{").unwrap_err();
        let err = ManifestError::from(serde_err);
        assert!(err.to_string().starts_with("manifest decode failed"));
    }
}
