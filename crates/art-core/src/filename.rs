//! Upload filename convention: `<name>-<version>.<extension>`.
//!
//! The last `.` separates the extension and the last `-` before it
//! separates the name from the version, so `test-artifact-1.2.3.dat`
//! parses as `("test-artifact", "1.2.3", "dat")`.

use std::path::Path;

use crate::error::FilenameParseError;

/// The three identity components encoded in an upload filename.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ArtifactFilename {
    pub name: String,
    pub version: String,
    pub extension: String,
}

impl ArtifactFilename {
    /// Parse a bare filename (no directory components).
    pub fn parse(filename: &str) -> Result<Self, FilenameParseError> {
        let fail = |reason| FilenameParseError {
            filename: filename.to_string(),
            reason,
        };

        let (stem, extension) = filename.rsplit_once('.').ok_or_else(|| fail("missing extension"))?;
        if extension.is_empty() {
            return Err(fail("empty extension"));
        }
        let (name, version) = stem.rsplit_once('-').ok_or_else(|| fail("missing version"))?;
        if name.is_empty() {
            return Err(fail("empty name"));
        }
        if version.is_empty() {
            return Err(fail("empty version"));
        }

        Ok(Self {
            name: name.to_string(),
            version: version.to_string(),
            extension: extension.to_string(),
        })
    }

    /// Parse the final component of a path.
    pub fn from_path(path: &Path) -> Result<Self, FilenameParseError> {
        let filename = path
            .file_name()
            .and_then(|n| n.to_str())
            .ok_or_else(|| FilenameParseError {
                filename: path.display().to_string(),
                reason: "not a UTF-8 file name",
            })?;
        Self::parse(filename)
    }
}
