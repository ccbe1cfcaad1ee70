//! # Artifact Records
//!
//! An [`Artifact`] describes one stored file: who it is ([`BasicInfo`]),
//! what the file looked like when it was uploaded ([`FileInfo`]), and
//! optionally which commit produced it ([`GitInfo`]).
//!
//! ## Invariants
//!
//! Every record is validated when it is built and again when it is
//! deserialized, so a value of these types always satisfies:
//!
//! - `group_id`, `name`, `version` and `extension` are non-empty and
//!   usable as storage key segments (no `/`, no control characters).
//! - `revision >= 1`.
//! - `md5` is 32 lowercase hex characters; `commit_hash` is 40.
//!
//! Records are never mutated. Changing a field means building a new
//! record, e.g. [`Artifact::with_revision`].

use serde::{Deserialize, Serialize};

use crate::digest::{validate_hex, COMMIT_HASH_HEX_LEN, MD5_HEX_LEN};
use crate::error::ValidationError;
use crate::temporal::Timestamp;

/// Check that `value` can be used as one segment of a storage key.
pub fn validate_segment(field: &'static str, value: &str) -> Result<(), ValidationError> {
    if value.trim().is_empty() {
        return Err(ValidationError::Empty { field });
    }
    if let Some(ch) = value.chars().find(|c| *c == '/' || c.is_control()) {
        return Err(ValidationError::InvalidCharacter {
            field,
            ch,
            value: value.to_string(),
        });
    }
    Ok(())
}

// ---------------------------------------------------------------------------
// BasicInfo
// ---------------------------------------------------------------------------

/// Identity of one artifact record.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "RawBasicInfo")]
pub struct BasicInfo {
    group_id: String,
    name: String,
    version: String,
    extension: String,
    revision: u32,
}

#[derive(Deserialize)]
struct RawBasicInfo {
    group_id: String,
    name: String,
    version: String,
    extension: String,
    revision: u32,
}

impl TryFrom<RawBasicInfo> for BasicInfo {
    type Error = ValidationError;

    fn try_from(raw: RawBasicInfo) -> Result<Self, Self::Error> {
        Self::new(raw.group_id, raw.name, raw.version, raw.extension, raw.revision)
    }
}

impl BasicInfo {
    /// Build a validated identity.
    pub fn new(
        group_id: impl Into<String>,
        name: impl Into<String>,
        version: impl Into<String>,
        extension: impl Into<String>,
        revision: u32,
    ) -> Result<Self, ValidationError> {
        let info = Self {
            group_id: group_id.into(),
            name: name.into(),
            version: version.into(),
            extension: extension.into(),
            revision,
        };
        validate_segment("group_id", &info.group_id)?;
        validate_segment("name", &info.name)?;
        validate_segment("version", &info.version)?;
        validate_segment("extension", &info.extension)?;
        if info.revision == 0 {
            return Err(ValidationError::Revision(0));
        }
        Ok(info)
    }

    /// The same identity with a different revision.
    pub fn with_revision(&self, revision: u32) -> Result<Self, ValidationError> {
        if revision == 0 {
            return Err(ValidationError::Revision(0));
        }
        Ok(Self {
            revision,
            ..self.clone()
        })
    }

    pub fn group_id(&self) -> &str {
        &self.group_id
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn version(&self) -> &str {
        &self.version
    }

    pub fn extension(&self) -> &str {
        &self.extension
    }

    pub fn revision(&self) -> u32 {
        self.revision
    }

    /// The conventional filename, `<name>-<version>.<extension>`.
    pub fn filename(&self) -> String {
        format!("{}-{}.{}", self.name, self.version, self.extension)
    }

    /// True if both records name the same `(group_id, name, version, extension)`.
    pub fn same_identity(&self, other: &BasicInfo) -> bool {
        self.group_id == other.group_id
            && self.name == other.name
            && self.version == other.version
            && self.extension == other.extension
    }
}

impl std::fmt::Display for BasicInfo {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}:{} (r{})", self.group_id, self.filename(), self.revision)
    }
}

// ---------------------------------------------------------------------------
// FileInfo
// ---------------------------------------------------------------------------

/// Attributes of the uploaded file, captured at upload time.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "RawFileInfo")]
pub struct FileInfo {
    host: String,
    user: String,
    size: u64,
    modified_time: Timestamp,
    md5: String,
}

#[derive(Deserialize)]
struct RawFileInfo {
    host: String,
    user: String,
    size: u64,
    modified_time: Timestamp,
    md5: String,
}

impl TryFrom<RawFileInfo> for FileInfo {
    type Error = ValidationError;

    fn try_from(raw: RawFileInfo) -> Result<Self, Self::Error> {
        Self::new(raw.host, raw.user, raw.size, raw.modified_time, &raw.md5)
    }
}

impl FileInfo {
    pub fn new(
        host: impl Into<String>,
        user: impl Into<String>,
        size: u64,
        modified_time: Timestamp,
        md5: &str,
    ) -> Result<Self, ValidationError> {
        Ok(Self {
            host: host.into(),
            user: user.into(),
            size,
            modified_time,
            md5: validate_hex("md5", md5, MD5_HEX_LEN)?,
        })
    }

    pub fn host(&self) -> &str {
        &self.host
    }

    pub fn user(&self) -> &str {
        &self.user
    }

    pub fn size(&self) -> u64 {
        self.size
    }

    pub fn modified_time(&self) -> Timestamp {
        self.modified_time
    }

    pub fn md5(&self) -> &str {
        &self.md5
    }
}

// ---------------------------------------------------------------------------
// GitInfo
// ---------------------------------------------------------------------------

/// Source-control provenance of the build that produced the file.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "RawGitInfo")]
pub struct GitInfo {
    branch: String,
    tags: Vec<String>,
    author_name: String,
    author_email: String,
    commit_time: Timestamp,
    commit_message: String,
    commit_hash: String,
}

#[derive(Deserialize)]
struct RawGitInfo {
    branch: String,
    #[serde(default)]
    tags: Vec<String>,
    author_name: String,
    author_email: String,
    commit_time: Timestamp,
    commit_message: String,
    commit_hash: String,
}

impl TryFrom<RawGitInfo> for GitInfo {
    type Error = ValidationError;

    fn try_from(raw: RawGitInfo) -> Result<Self, Self::Error> {
        Self::new(
            raw.branch,
            raw.tags,
            raw.author_name,
            raw.author_email,
            raw.commit_time,
            raw.commit_message,
            &raw.commit_hash,
        )
    }
}

impl GitInfo {
    pub fn new(
        branch: impl Into<String>,
        tags: Vec<String>,
        author_name: impl Into<String>,
        author_email: impl Into<String>,
        commit_time: Timestamp,
        commit_message: impl Into<String>,
        commit_hash: &str,
    ) -> Result<Self, ValidationError> {
        Ok(Self {
            branch: branch.into(),
            tags,
            author_name: author_name.into(),
            author_email: author_email.into(),
            commit_time,
            commit_message: commit_message.into(),
            commit_hash: validate_hex("commit_hash", commit_hash, COMMIT_HASH_HEX_LEN)?,
        })
    }

    pub fn branch(&self) -> &str {
        &self.branch
    }

    pub fn tags(&self) -> &[String] {
        &self.tags
    }

    pub fn author_name(&self) -> &str {
        &self.author_name
    }

    pub fn author_email(&self) -> &str {
        &self.author_email
    }

    pub fn commit_time(&self) -> Timestamp {
        self.commit_time
    }

    pub fn commit_message(&self) -> &str {
        &self.commit_message
    }

    pub fn commit_hash(&self) -> &str {
        &self.commit_hash
    }

    /// First seven characters of the commit hash.
    pub fn short_hash(&self) -> &str {
        &self.commit_hash[..7]
    }
}

// ---------------------------------------------------------------------------
// Artifact
// ---------------------------------------------------------------------------

/// One stored file with its identity, file attributes and provenance.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Artifact {
    basic_info: BasicInfo,
    file_info: FileInfo,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    git_info: Option<GitInfo>,
}

impl Artifact {
    pub fn new(basic_info: BasicInfo, file_info: FileInfo, git_info: Option<GitInfo>) -> Self {
        Self {
            basic_info,
            file_info,
            git_info,
        }
    }

    pub fn basic_info(&self) -> &BasicInfo {
        &self.basic_info
    }

    pub fn file_info(&self) -> &FileInfo {
        &self.file_info
    }

    pub fn git_info(&self) -> Option<&GitInfo> {
        self.git_info.as_ref()
    }

    /// A copy of this record carrying a different revision.
    pub fn with_revision(&self, revision: u32) -> Result<Self, ValidationError> {
        Ok(Self {
            basic_info: self.basic_info.with_revision(revision)?,
            ..self.clone()
        })
    }

    /// True if both records name the same `(group_id, name, version, extension)`.
    pub fn same_identity(&self, other: &Artifact) -> bool {
        self.basic_info.same_identity(&other.basic_info)
    }
}
