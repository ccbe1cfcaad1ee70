//! The Driver contract, run against every driver.
//!
//! Each check is a plain function over `&dyn Driver`; the `contract!`
//! macro instantiates one `#[test]` per (driver, check) pair so failures
//! name the backend that diverged.

use art_core::{Artifact, BasicInfo, FileInfo, GitInfo, Timestamp};
use art_store::{Driver, MemoryDriver, ObjectStoreDriver, Repository, StoreError, StoreResult};

fn read_missing_is_not_found(d: &dyn Driver) {
    assert!(matches!(d.read("g/missing"), Err(StoreError::NotFound { .. })));
}

fn write_then_read(d: &dyn Driver) {
    d.write("g/a/1/1/a-1.bin", b"\x00\x01binary\xff").unwrap();
    assert_eq!(d.read("g/a/1/1/a-1.bin").unwrap(), b"\x00\x01binary\xff");
}

fn write_overwrites(d: &dyn Driver) {
    d.write("g/k", b"first, longer value").unwrap();
    d.write("g/k", b"second").unwrap();
    assert_eq!(d.read("g/k").unwrap(), b"second");
}

fn list_empty_is_ok(d: &dyn Driver) {
    assert!(d.list("nothing/here/").unwrap().is_empty());
}

fn list_filters_by_prefix(d: &dyn Driver) {
    for key in ["g/a/x", "g/a/y", "g/ab/z", "h/a/x"] {
        d.write(key, key.as_bytes()).unwrap();
    }
    let mut under_a = d.list("g/a/").unwrap();
    under_a.sort();
    assert_eq!(under_a, vec!["g/a/x", "g/a/y"]);

    let mut starting_a = d.list("g/a").unwrap();
    starting_a.sort();
    assert_eq!(starting_a, vec!["g/a/x", "g/a/y", "g/ab/z"]);
}

fn delete_semantics(d: &dyn Driver) {
    d.write("g/gone", b"x").unwrap();
    assert!(d.exists("g/gone").unwrap());
    d.delete("g/gone").unwrap();
    assert!(!d.exists("g/gone").unwrap());
    assert!(matches!(d.delete("g/gone"), Err(StoreError::NotFound { .. })));
    assert!(matches!(d.read("g/gone"), Err(StoreError::NotFound { .. })));
}

fn exists_missing_is_false(d: &dyn Driver) {
    assert!(!d.exists("g/never").unwrap());
}

fn keys_round_trip_verbatim(d: &dyn Driver) {
    let keys = [
        "g/tool~nightly/.meta/index.json",
        "g/50%off/1.0/1/50%off-1.0.zip",
        "g/build#7/2.0/1/build#7-2.0.tgz",
        "g/a%7Eb/x",
    ];
    for key in keys {
        d.write(key, key.as_bytes()).unwrap();
    }
    let mut listed = d.list("g/").unwrap();
    listed.sort();
    let mut expected: Vec<&str> = keys.to_vec();
    expected.sort();
    assert_eq!(listed, expected);
    for key in &listed {
        assert_eq!(d.read(key).unwrap(), key.as_bytes());
        assert!(d.exists(key).unwrap());
    }
    assert_eq!(d.list("g/tool~").unwrap(), vec!["g/tool~nightly/.meta/index.json"]);
}

macro_rules! contract {
    ($module:ident, $make:expr) => {
        mod $module {
            use super::*;

            #[test]
            fn read_missing_is_not_found() {
                super::read_missing_is_not_found(&$make);
            }

            #[test]
            fn write_then_read() {
                super::write_then_read(&$make);
            }

            #[test]
            fn write_overwrites() {
                super::write_overwrites(&$make);
            }

            #[test]
            fn list_empty_is_ok() {
                super::list_empty_is_ok(&$make);
            }

            #[test]
            fn list_filters_by_prefix() {
                super::list_filters_by_prefix(&$make);
            }

            #[test]
            fn delete_semantics() {
                super::delete_semantics(&$make);
            }

            #[test]
            fn exists_missing_is_false() {
                super::exists_missing_is_false(&$make);
            }

            #[test]
            fn keys_round_trip_verbatim() {
                super::keys_round_trip_verbatim(&$make);
            }
        }
    };
}

/// A local-directory driver that owns its temporary root.
struct LocalFixture {
    _root: tempfile::TempDir,
    driver: ObjectStoreDriver,
}

impl LocalFixture {
    fn new() -> Self {
        let root = tempfile::tempdir().unwrap();
        let driver = ObjectStoreDriver::local(root.path()).unwrap();
        Self {
            _root: root,
            driver,
        }
    }
}

impl Driver for LocalFixture {
    fn read(&self, key: &str) -> StoreResult<Vec<u8>> {
        self.driver.read(key)
    }

    fn write(&self, key: &str, bytes: &[u8]) -> StoreResult<()> {
        self.driver.write(key, bytes)
    }

    fn list(&self, prefix: &str) -> StoreResult<Vec<String>> {
        self.driver.list(prefix)
    }

    fn delete(&self, key: &str) -> StoreResult<()> {
        self.driver.delete(key)
    }

    fn exists(&self, key: &str) -> StoreResult<bool> {
        self.driver.exists(key)
    }
}

contract!(memory_driver, MemoryDriver::new());
contract!(object_store_in_memory, ObjectStoreDriver::in_memory().unwrap());
contract!(object_store_local, LocalFixture::new());

// ---------------------------------------------------------------------------
// Repository persistence through both drivers
// ---------------------------------------------------------------------------

const GROUP: &str = "com.github.mogproject";

fn sample(version: &str, with_git: bool) -> Artifact {
    let git = with_git.then(|| {
        GitInfo::new(
            "master",
            vec!["release 0.0.1".to_string()],
            "mogproject",
            "x@example.com",
            Timestamp::parse("2014-12-30T08:11:29Z").unwrap(),
            "first commit",
            "111122223333444455556666777788889999aaaa",
        )
        .unwrap()
    });
    Artifact::new(
        BasicInfo::new(GROUP, "test-artifact", version, "dat", 1).unwrap(),
        FileInfo::new(
            "host1",
            "user1",
            4_567_890,
            Timestamp::parse("2014-12-31T09:12:34Z").unwrap(),
            "ffffeeeeddddccccbbbbaaaa99998888",
        )
        .unwrap(),
        git,
    )
}

fn save_then_fresh_load<D: Driver + Clone>(driver: D) {
    let mut repo = Repository::new(driver.clone(), GROUP).unwrap();
    repo.append("test-artifact", sample("1.2.3", true)).unwrap();
    repo.append("test-artifact", sample("1.2.3", false)).unwrap();
    repo.append("test-artifact", sample("1.2.4", true)).unwrap();
    repo.save("test-artifact").unwrap();
    let saved = repo.cached("test-artifact").cloned().unwrap();

    let mut fresh = Repository::new(driver, GROUP).unwrap();
    assert_eq!(fresh.load("test-artifact").unwrap(), &saved);
    assert_eq!(fresh.names().unwrap(), vec!["test-artifact"]);
}

#[test]
fn memory_driver_save_then_fresh_load() {
    save_then_fresh_load(MemoryDriver::new());
}

#[test]
fn object_store_local_save_then_fresh_load() {
    let dir = tempfile::tempdir().unwrap();
    let root = dir.path().to_path_buf();

    let mut repo = Repository::new(ObjectStoreDriver::local(&root).unwrap(), GROUP).unwrap();
    repo.append("test-artifact", sample("1.2.3", true)).unwrap();
    repo.append("test-artifact", sample("1.2.3", false)).unwrap();
    repo.save("test-artifact").unwrap();
    let saved = repo.cached("test-artifact").cloned().unwrap();
    drop(repo);

    let mut fresh = Repository::new(ObjectStoreDriver::local(&root).unwrap(), GROUP).unwrap();
    let loaded = fresh.load("test-artifact").unwrap();
    assert_eq!(loaded, &saved);
    let revisions: Vec<u32> = loaded.iter().map(|a| a.basic_info().revision()).collect();
    assert_eq!(revisions, vec![1, 2]);
    assert!(root
        .join("com.github.mogproject/test-artifact/.meta/index.json")
        .is_file());
}

fn named_record(name: &str, version: &str) -> Artifact {
    Artifact::new(
        BasicInfo::new(GROUP, name, version, "zip", 1).unwrap(),
        FileInfo::new(
            "host1",
            "user1",
            3,
            Timestamp::parse("2021-03-04T05:06:07Z").unwrap(),
            "0123456789abcdef0123456789abcdef",
        )
        .unwrap(),
        None,
    )
}

/// Names containing characters object stores escape survive a
/// save, list and reload cycle.
fn listed_names_reload<D: Driver>(first: D, second: D) {
    let mut repo = Repository::new(first, GROUP).unwrap();
    for name in ["tool~nightly", "50%off"] {
        repo.append(name, named_record(name, "1.0")).unwrap();
        repo.append(name, named_record(name, "1.0")).unwrap();
        repo.save(name).unwrap();
    }
    let names = repo.names().unwrap();
    assert_eq!(names, vec!["50%off", "tool~nightly"]);

    let mut fresh = Repository::new(second, GROUP).unwrap();
    for name in &names {
        let reloaded = fresh.load(name).unwrap();
        let revisions: Vec<u32> = reloaded.iter().map(|a| a.basic_info().revision()).collect();
        assert_eq!(revisions, vec![1, 2]);
    }
}

#[test]
fn memory_driver_listed_names_reload() {
    let driver = MemoryDriver::new();
    listed_names_reload(driver.clone(), driver);
}

#[test]
fn object_store_local_listed_names_reload() {
    let dir = tempfile::tempdir().unwrap();
    listed_names_reload(
        ObjectStoreDriver::local(dir.path()).unwrap(),
        ObjectStoreDriver::local(dir.path()).unwrap(),
    );
}
