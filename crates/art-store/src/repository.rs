//! # Repository: cached manifests for one group
//!
//! A [`Repository`] binds a [`Driver`] to one `group_id` and caches the
//! manifest of every artifact name it touches. Manifests are fetched on
//! first access and written back only by an explicit [`Repository::save`].
//!
//! ## Read-modify-write
//!
//! `save` replaces the stored manifest with the cached one. There is no
//! lock across processes: two uploads that load the same manifest assign
//! the same revision and the later save drops the earlier record. Callers
//! that need to detect this use [`Repository::save_if_unchanged`], which
//! compares the stored bytes against what this process last saw. The
//! check and the write are separate driver calls, so it narrows the race
//! window rather than closing it.

use std::collections::hash_map::Entry;
use std::collections::{BTreeSet, HashMap};

use art_core::artifact::validate_segment;
use art_core::{md5_hex, Artifact, Manifest, ValidationError};

use crate::driver::Driver;
use crate::error::{StoreError, StoreResult};
use crate::keys;

/// Manifest cache for one group, bound to one driver.
#[derive(Debug)]
pub struct Repository<D> {
    driver: D,
    group_id: String,
    manifests: HashMap<String, Manifest>,
    /// MD5 of the stored manifest bytes as of the last load or save;
    /// `None` when nothing was stored.
    fingerprints: HashMap<String, Option<String>>,
}

impl<D: Driver> Repository<D> {
    /// Create a repository with an empty cache.
    pub fn new(driver: D, group_id: impl Into<String>) -> StoreResult<Self> {
        let group_id = group_id.into();
        validate_segment("group_id", &group_id)?;
        Ok(Self {
            driver,
            group_id,
            manifests: HashMap::new(),
            fingerprints: HashMap::new(),
        })
    }

    pub fn group_id(&self) -> &str {
        &self.group_id
    }

    pub fn driver(&self) -> &D {
        &self.driver
    }

    /// The cached manifest for `name`, without touching the driver.
    pub fn cached(&self, name: &str) -> Option<&Manifest> {
        self.manifests.get(name)
    }

    /// The manifest for `name`, fetched from the driver on first access.
    ///
    /// A name with no stored manifest yields an empty manifest. A stored
    /// manifest that fails to decode is a [`StoreError::CorruptManifest`].
    pub fn load(&mut self, name: &str) -> StoreResult<&Manifest> {
        self.manifest_mut(name).map(|m| &*m)
    }

    /// Write the cached manifest for `name`, replacing the stored one.
    pub fn save(&mut self, name: &str) -> StoreResult<()> {
        let bytes = {
            let manifest = self.manifest_mut(name)?;
            manifest.to_bytes().map_err(|e| StoreError::Encode {
                name: name.to_string(),
                reason: e.to_string(),
            })?
        };
        let key = keys::manifest_key(&self.group_id, name);
        self.driver.write(&key, &bytes)?;
        tracing::debug!(group_id = %self.group_id, name, records = self.manifests[name].len(), "saved manifest");
        self.fingerprints.insert(name.to_string(), Some(md5_hex(&bytes)));
        Ok(())
    }

    /// Like [`Repository::save`], but fails with [`StoreError::Conflict`]
    /// if the stored manifest changed since this repository loaded or
    /// last saved it.
    pub fn save_if_unchanged(&mut self, name: &str) -> StoreResult<()> {
        self.manifest_mut(name)?;
        let key = keys::manifest_key(&self.group_id, name);
        let stored = match self.driver.read(&key) {
            Ok(bytes) => Some(md5_hex(&bytes)),
            Err(e) if e.is_not_found() => None,
            Err(e) => return Err(e),
        };
        let expected = self.fingerprints.get(name).cloned().flatten();
        if stored != expected {
            return Err(StoreError::Conflict {
                name: name.to_string(),
            });
        }
        self.save(name)
    }

    /// Assign the next revision to `record`, append it to the cached
    /// manifest for `name` and return the manifest. Nothing is saved.
    pub fn append(&mut self, name: &str, record: Artifact) -> StoreResult<&Manifest> {
        self.check_owner(name, &record)?;
        let manifest = self.manifest_mut(name)?;
        manifest.append(record)?;
        Ok(manifest)
    }

    /// Drop the cached manifest for `name`; the next access re-fetches it.
    pub fn evict(&mut self, name: &str) {
        self.manifests.remove(name);
        self.fingerprints.remove(name);
    }

    /// Every artifact name with a stored manifest in this group.
    pub fn names(&self) -> StoreResult<Vec<String>> {
        let names: BTreeSet<String> = self
            .driver
            .list(&keys::group_prefix(&self.group_id))?
            .iter()
            .filter_map(|key| keys::name_from_manifest_key(&self.group_id, key))
            .map(str::to_string)
            .collect();
        Ok(names.into_iter().collect())
    }

    /// Store the content blob for `record`.
    pub fn put_blob(&self, record: &Artifact, bytes: &[u8]) -> StoreResult<()> {
        self.check_owner(record.basic_info().name(), record)?;
        self.driver.write(&keys::blob_key(record.basic_info()), bytes)
    }

    /// Fetch the content blob for `record`.
    pub fn get_blob(&self, record: &Artifact) -> StoreResult<Vec<u8>> {
        self.check_owner(record.basic_info().name(), record)?;
        self.driver.read(&keys::blob_key(record.basic_info()))
    }

    fn check_owner(&self, name: &str, record: &Artifact) -> Result<(), ValidationError> {
        let b = record.basic_info();
        if b.group_id() != self.group_id || b.name() != name {
            return Err(ValidationError::Partition {
                expected: format!("{}/{}", self.group_id, name),
                actual: format!("{}/{}", b.group_id(), b.name()),
            });
        }
        Ok(())
    }

    fn manifest_mut(&mut self, name: &str) -> StoreResult<&mut Manifest> {
        let Self {
            driver,
            group_id,
            manifests,
            fingerprints,
        } = self;
        match manifests.entry(name.to_string()) {
            Entry::Occupied(entry) => Ok(entry.into_mut()),
            Entry::Vacant(entry) => {
                let (manifest, fingerprint) = fetch(driver, group_id, name)?;
                fingerprints.insert(name.to_string(), fingerprint);
                Ok(entry.insert(manifest))
            }
        }
    }
}

fn fetch<D: Driver>(
    driver: &D,
    group_id: &str,
    name: &str,
) -> StoreResult<(Manifest, Option<String>)> {
    validate_segment("name", name)?;
    let key = keys::manifest_key(group_id, name);
    let bytes = match driver.read(&key) {
        Ok(bytes) => bytes,
        Err(e) if e.is_not_found() => {
            tracing::debug!(group_id, name, "no stored manifest");
            return Ok((Manifest::new(), None));
        }
        Err(e) => return Err(e),
    };
    let corrupt = |reason: String| StoreError::CorruptManifest {
        name: name.to_string(),
        reason,
    };
    let manifest = Manifest::from_bytes(&bytes).map_err(|e| corrupt(e.to_string()))?;
    manifest
        .check_partition(group_id, name)
        .map_err(|e| corrupt(e.to_string()))?;
    tracing::debug!(group_id, name, records = manifest.len(), "loaded manifest");
    Ok((manifest, Some(md5_hex(&bytes))))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::memory::MemoryDriver;
    use art_core::{BasicInfo, FileInfo, Timestamp};

    const GROUP: &str = "com.github.mogproject";

    fn record(name: &str, version: &str, md5_seed: char) -> Artifact {
        Artifact::new(
            BasicInfo::new(GROUP, name, version, "dat", 1).unwrap(),
            FileInfo::new(
                "host1",
                "user1",
                11,
                Timestamp::parse("2014-12-31T09:12:34Z").unwrap(),
                &md5_seed.to_string().repeat(32),
            )
            .unwrap(),
            None,
        )
    }

    #[test]
    fn new_rejects_empty_group() {
        assert!(matches!(
            Repository::new(MemoryDriver::new(), ""),
            Err(StoreError::Validation(ValidationError::Empty { .. }))
        ));
    }

    #[test]
    fn load_missing_manifest_is_empty() {
        let mut repo = Repository::new(MemoryDriver::new(), GROUP).unwrap();
        assert!(repo.load("test-artifact").unwrap().is_empty());
        assert!(repo.cached("test-artifact").is_some());
    }

    #[test]
    fn load_is_fetch_once() {
        let driver = MemoryDriver::new();
        let mut repo = Repository::new(driver.clone(), GROUP).unwrap();
        repo.load("test-artifact").unwrap();

        // A write from elsewhere is not observed until eviction.
        let mut other = Repository::new(driver, GROUP).unwrap();
        other.append("test-artifact", record("test-artifact", "1.0", 'a')).unwrap();
        other.save("test-artifact").unwrap();

        assert!(repo.load("test-artifact").unwrap().is_empty());
        repo.evict("test-artifact");
        assert_eq!(repo.load("test-artifact").unwrap().len(), 1);
    }

    #[test]
    fn corrupt_manifest_is_not_empty() {
        let driver = MemoryDriver::new();
        driver
            .write(&keys::manifest_key(GROUP, "test-artifact"), b"{ not json")
            .unwrap();
        let mut repo = Repository::new(driver, GROUP).unwrap();
        assert!(matches!(
            repo.load("test-artifact"),
            Err(StoreError::CorruptManifest { .. })
        ));
        assert!(repo.cached("test-artifact").is_none());
        assert!(matches!(
            repo.append("test-artifact", record("test-artifact", "1.0", 'a')),
            Err(StoreError::CorruptManifest { .. })
        ));
    }

    #[test]
    fn manifest_with_foreign_records_is_corrupt() {
        let driver = MemoryDriver::new();
        let mut repo = Repository::new(driver.clone(), GROUP).unwrap();
        repo.append("other", record("other", "1.0", 'a')).unwrap();
        repo.save("other").unwrap();
        let bytes = driver.read(&keys::manifest_key(GROUP, "other")).unwrap();
        driver.write(&keys::manifest_key(GROUP, "copied"), &bytes).unwrap();

        let mut fresh = Repository::new(driver, GROUP).unwrap();
        let err = fresh.load("copied").unwrap_err();
        assert!(err.to_string().contains("does not belong"));
    }

    #[test]
    fn append_rejects_wrong_name() {
        let mut repo = Repository::new(MemoryDriver::new(), GROUP).unwrap();
        assert!(matches!(
            repo.append("test-artifact", record("other", "1.0", 'a')),
            Err(StoreError::Validation(ValidationError::Partition { .. }))
        ));
    }

    #[test]
    fn append_does_not_save() {
        let driver = MemoryDriver::new();
        let mut repo = Repository::new(driver.clone(), GROUP).unwrap();
        let m = repo.append("test-artifact", record("test-artifact", "1.0", 'a')).unwrap();
        assert_eq!(m.len(), 1);
        assert!(driver.is_empty());
    }

    #[test]
    fn save_is_idempotent() {
        let driver = MemoryDriver::new();
        let mut repo = Repository::new(driver.clone(), GROUP).unwrap();
        repo.append("test-artifact", record("test-artifact", "1.0", 'a')).unwrap();
        let key = keys::manifest_key(GROUP, "test-artifact");
        repo.save("test-artifact").unwrap();
        let first = driver.read(&key).unwrap();
        repo.save("test-artifact").unwrap();
        assert_eq!(driver.read(&key).unwrap(), first);
    }

    #[test]
    fn save_if_unchanged_detects_concurrent_write() {
        let driver = MemoryDriver::new();
        let mut a = Repository::new(driver.clone(), GROUP).unwrap();
        let mut b = Repository::new(driver.clone(), GROUP).unwrap();
        a.load("test-artifact").unwrap();
        b.load("test-artifact").unwrap();

        a.append("test-artifact", record("test-artifact", "1.0", 'a')).unwrap();
        a.save_if_unchanged("test-artifact").unwrap();

        b.append("test-artifact", record("test-artifact", "1.0", 'b')).unwrap();
        assert!(matches!(
            b.save_if_unchanged("test-artifact"),
            Err(StoreError::Conflict { .. })
        ));

        // A's own follow-up save still succeeds.
        a.append("test-artifact", record("test-artifact", "1.0", 'c')).unwrap();
        a.save_if_unchanged("test-artifact").unwrap();
    }

    #[test]
    fn plain_save_is_last_writer_wins() {
        let driver = MemoryDriver::new();
        let mut a = Repository::new(driver.clone(), GROUP).unwrap();
        let mut b = Repository::new(driver.clone(), GROUP).unwrap();
        a.load("test-artifact").unwrap();
        b.load("test-artifact").unwrap();
        a.append("test-artifact", record("test-artifact", "1.0", 'a')).unwrap();
        b.append("test-artifact", record("test-artifact", "1.0", 'b')).unwrap();
        a.save("test-artifact").unwrap();
        b.save("test-artifact").unwrap();

        let mut fresh = Repository::new(driver, GROUP).unwrap();
        let m = fresh.load("test-artifact").unwrap();
        assert_eq!(m.len(), 1);
        assert_eq!(m.records()[0].file_info().md5(), "b".repeat(32));
    }

    #[test]
    fn names_lists_only_manifests() {
        let driver = MemoryDriver::new();
        let mut repo = Repository::new(driver.clone(), GROUP).unwrap();
        for name in ["beta", "alpha"] {
            let r = record(name, "1.0", 'a');
            repo.append(name, r.clone()).unwrap();
            repo.put_blob(&r.with_revision(1).unwrap(), b"x").unwrap();
            repo.save(name).unwrap();
        }
        driver.write("com.github.mogproject.other/gamma/.meta/index.json", b"[]").unwrap();
        assert_eq!(repo.names().unwrap(), vec!["alpha", "beta"]);
    }

    #[test]
    fn blobs_roundtrip() {
        let mut repo = Repository::new(MemoryDriver::new(), GROUP).unwrap();
        let stored = repo
            .append("test-artifact", record("test-artifact", "1.0", 'a'))
            .unwrap()
            .latest()
            .cloned()
            .unwrap();
        repo.put_blob(&stored, b"hello world").unwrap();
        assert_eq!(repo.get_blob(&stored).unwrap(), b"hello world");
        let missing = stored.with_revision(2).unwrap();
        assert!(repo.get_blob(&missing).unwrap_err().is_not_found());
    }
}
