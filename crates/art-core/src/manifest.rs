//! # Manifest: the per-name artifact index
//!
//! A [`Manifest`] is the ordered list of every record uploaded under one
//! `(group_id, name)`, oldest first. It is the unit of persistence: the
//! whole list is serialized to one JSON document and replaced on save.
//!
//! ## Revision Invariant
//!
//! For any `(version, extension)` pair, the revisions present in the
//! manifest are exactly `1..=k`, in increasing manifest order.
//! [`Manifest::append`] maintains this by assigning `1 + max(existing)` to
//! every new record, and [`Manifest::from_bytes`] rejects stored manifests
//! that violate it.
//!
//! Revision assignment only sees the in-memory list. Two processes that
//! load the same stored manifest will compute the same next revision.

use std::collections::BTreeMap;

use crate::artifact::{Artifact, BasicInfo};
use crate::error::{ManifestError, ValidationError};

/// Ordered records for one artifact name within one group.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Manifest {
    records: Vec<Artifact>,
}

impl Manifest {
    /// An empty manifest, for a name that has never been uploaded.
    pub fn new() -> Self {
        Self::default()
    }

    pub fn records(&self) -> &[Artifact] {
        &self.records
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Artifact> {
        self.records.iter()
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// The revision the next upload of `(version, extension)` receives.
    pub fn next_revision(&self, version: &str, extension: &str) -> u32 {
        self.records
            .iter()
            .map(Artifact::basic_info)
            .filter(|b| b.version() == version && b.extension() == extension)
            .map(BasicInfo::revision)
            .max()
            .map_or(1, |max| max + 1)
    }

    /// Append `record` with a freshly assigned revision and return the
    /// stored copy. The incoming revision is ignored.
    pub fn append(&mut self, record: Artifact) -> Result<&Artifact, ValidationError> {
        let info = record.basic_info();
        let revision = self.next_revision(info.version(), info.extension());
        let record = record.with_revision(revision)?;
        self.records.push(record);
        Ok(&self.records[self.records.len() - 1])
    }

    /// The most recently appended record, if any.
    pub fn latest(&self) -> Option<&Artifact> {
        self.records.last()
    }

    /// The most recently appended record with the same identity as `info`.
    pub fn latest_of(&self, info: &BasicInfo) -> Option<&Artifact> {
        self.records
            .iter()
            .rev()
            .find(|a| a.basic_info().same_identity(info))
    }

    /// The last record in manifest order matching every given filter.
    ///
    /// With no filters this is [`Manifest::latest`]. Version strings are
    /// free-form, so "latest" always means most recently appended, never
    /// highest version.
    pub fn select(
        &self,
        version: Option<&str>,
        revision: Option<u32>,
        extension: Option<&str>,
    ) -> Option<&Artifact> {
        self.records.iter().rev().find(|a| {
            let b = a.basic_info();
            version.map_or(true, |v| b.version() == v)
                && revision.map_or(true, |r| b.revision() == r)
                && extension.map_or(true, |e| b.extension() == e)
        })
    }

    /// Serialize to pretty JSON. The output depends only on the records,
    /// so saving the same manifest twice writes identical bytes.
    pub fn to_bytes(&self) -> Result<Vec<u8>, ManifestError> {
        Ok(serde_json::to_vec_pretty(&self.records)?)
    }

    /// Decode a stored manifest and check the revision invariant.
    pub fn from_bytes(bytes: &[u8]) -> Result<Self, ManifestError> {
        let records: Vec<Artifact> = serde_json::from_slice(bytes)?;
        let manifest = Self { records };
        manifest.check_revisions()?;
        Ok(manifest)
    }

    /// Check that every record belongs to `group_id/name`.
    pub fn check_partition(&self, group_id: &str, name: &str) -> Result<(), ValidationError> {
        for record in &self.records {
            let b = record.basic_info();
            if b.group_id() != group_id || b.name() != name {
                return Err(ValidationError::Partition {
                    expected: format!("{group_id}/{name}"),
                    actual: format!("{}/{}", b.group_id(), b.name()),
                });
            }
        }
        Ok(())
    }

    /// Walk records in manifest order; each `(version, extension)` must
    /// count up 1, 2, 3 with no repeats, gaps or reordering.
    fn check_revisions(&self) -> Result<(), ManifestError> {
        let mut counts: BTreeMap<(&str, &str), u32> = BTreeMap::new();
        for record in &self.records {
            let b = record.basic_info();
            let count = counts.entry((b.version(), b.extension())).or_insert(0);
            let expected = *count + 1;
            if b.revision() != expected {
                let problem = if b.revision() <= *count {
                    "duplicate"
                } else {
                    "out-of-order"
                };
                return Err(ManifestError::Inconsistent(format!(
                    "{problem} revision {} for {}: expected revision {expected}",
                    b.revision(),
                    b.filename()
                )));
            }
            *count = expected;
        }
        Ok(())
    }
}

impl<'a> IntoIterator for &'a Manifest {
    type Item = &'a Artifact;
    type IntoIter = std::slice::Iter<'a, Artifact>;

    fn into_iter(self) -> Self::IntoIter {
        self.records.iter()
    }
}
