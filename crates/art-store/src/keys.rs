//! Storage key layout.
//!
//! ```text
//! {group_id}/{name}/.meta/index.json                                   manifest
//! {group_id}/{name}/{version}/{revision}/{name}-{version}.{extension}  content blob
//! ```
//!
//! Every identity component is validated to contain no `/`, so each
//! segment above is exactly one path component and two distinct
//! identities never map to the same key.

use art_core::BasicInfo;

const MANIFEST_SUFFIX: &str = "/.meta/index.json";

/// Prefix shared by every key of a group.
pub fn group_prefix(group_id: &str) -> String {
    format!("{group_id}/")
}

/// Key of the manifest for `(group_id, name)`.
pub fn manifest_key(group_id: &str, name: &str) -> String {
    format!("{group_id}/{name}{MANIFEST_SUFFIX}")
}

/// Key of the content blob for one record.
pub fn blob_key(info: &BasicInfo) -> String {
    format!(
        "{}/{}/{}/{}/{}",
        info.group_id(),
        info.name(),
        info.version(),
        info.revision(),
        info.filename()
    )
}

/// Recover the artifact name from a manifest key of `group_id`.
///
/// Returns `None` for blob keys and for keys of other groups.
pub fn name_from_manifest_key<'a>(group_id: &str, key: &'a str) -> Option<&'a str> {
    let rest = key.strip_prefix(group_id)?.strip_prefix('/')?;
    let name = rest.strip_suffix(MANIFEST_SUFFIX)?;
    (!name.is_empty() && !name.contains('/')).then_some(name)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn manifest_key_layout() {
        assert_eq!(
            manifest_key("com.github.mogproject", "test-artifact"),
            "com.github.mogproject/test-artifact/.meta/index.json"
        );
    }

    #[test]
    fn blob_key_includes_revision() {
        let info = BasicInfo::new("com.github.mogproject", "test-artifact", "1.2.3", "dat", 2).unwrap();
        assert_eq!(
            blob_key(&info),
            "com.github.mogproject/test-artifact/1.2.3/2/test-artifact-1.2.3.dat"
        );
    }

    #[test]
    fn blob_keys_never_collide_across_revisions() {
        let r1 = BasicInfo::new("g", "a", "1", "zip", 1).unwrap();
        let r2 = r1.with_revision(2).unwrap();
        assert_ne!(blob_key(&r1), blob_key(&r2));
    }

    #[test]
    fn name_from_manifest_key_roundtrip() {
        let key = manifest_key("com.example", "tool");
        assert_eq!(name_from_manifest_key("com.example", &key), Some("tool"));
    }

    #[test]
    fn name_from_manifest_key_rejects_other_keys() {
        let blob = blob_key(&BasicInfo::new("com.example", "tool", "1", "zip", 1).unwrap());
        assert_eq!(name_from_manifest_key("com.example", &blob), None);
        let nested_group = manifest_key("com.example.sub", "tool");
        assert_eq!(name_from_manifest_key("com.example", &nested_group), None);
        assert_eq!(name_from_manifest_key("com.example", "com.example/.meta/index.json"), None);
    }
}
