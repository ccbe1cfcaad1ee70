//! # art-core: Artifact Value Model
//!
//! The types every other crate in the workspace builds on. This crate does
//! no I/O beyond hashing readers handed to it; storage lives in `art-store`
//! and the command-line surface in `art-cli`.
//!
//! ## Contents
//!
//! - [`Artifact`], [`BasicInfo`], [`FileInfo`], [`GitInfo`]: immutable,
//!   validated records describing one stored file.
//! - [`Manifest`]: the ordered record list for one artifact name, with
//!   revision assignment and the JSON codec used for persistence.
//! - [`ArtifactFilename`]: the `<name>-<version>.<extension>` convention.
//! - [`Timestamp`]: UTC, seconds precision.
//! - [`md5_hex`] / [`md5_hex_reader`]: file checksums.
//!
//! ## Crate Policy
//!
//! - No dependencies on other `art-*` crates.
//! - No `.unwrap()` outside tests.
//! - Values are never mutated after construction; "updates" build new values.

pub mod artifact;
pub mod digest;
pub mod error;
pub mod filename;
pub mod manifest;
pub mod temporal;

pub use artifact::{Artifact, BasicInfo, FileInfo, GitInfo};
pub use digest::{md5_hex, md5_hex_reader};
pub use error::{FilenameParseError, ManifestError, ValidationError};
pub use filename::ArtifactFilename;
pub use manifest::Manifest;
pub use temporal::Timestamp;
