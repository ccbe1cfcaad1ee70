//! Local file inspection: the [`FileInfo`] recorded for an upload.

use std::fs::File;
use std::path::Path;

use anyhow::{Context, Result};
use art_core::{md5_hex_reader, FileInfo, Timestamp};

/// Size, mtime and MD5 of `path`, attributed to the current host and user.
pub fn inspect_file(path: &Path) -> Result<FileInfo> {
    let file = File::open(path).with_context(|| format!("cannot open {}", path.display()))?;
    let metadata = file
        .metadata()
        .with_context(|| format!("cannot stat {}", path.display()))?;
    if !metadata.is_file() {
        anyhow::bail!("{} is not a regular file", path.display());
    }
    let modified = metadata
        .modified()
        .with_context(|| format!("no modification time for {}", path.display()))?;
    let md5 = md5_hex_reader(file).with_context(|| format!("cannot read {}", path.display()))?;

    Ok(FileInfo::new(
        current_host(),
        current_user(),
        metadata.len(),
        Timestamp::from_system_time(modified),
        &md5,
    )?)
}

/// Name of this machine as the OS reports it, or `"unknown"`.
pub fn current_host() -> String {
    let host = gethostname::gethostname();
    let host = host.to_string_lossy();
    match host.trim() {
        "" => "unknown".to_string(),
        name => name.to_string(),
    }
}

/// Login name of the invoking user, or `"unknown"`.
pub fn current_user() -> String {
    std::env::var("USER")
        .or_else(|_| std::env::var("USERNAME"))
        .or_else(|_| std::env::var("LOGNAME"))
        .ok()
        .filter(|u| !u.trim().is_empty())
        .unwrap_or_else(|| "unknown".to_string())
}
