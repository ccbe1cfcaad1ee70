//! Git provenance for an uploaded file.
//!
//! Runs the `git` executable in the file's directory; git itself searches
//! upward for the enclosing checkout. Anything going wrong (no checkout, no
//! commits, no `git` on `PATH`) yields `None`.

use std::path::Path;
use std::process::Command;

use art_core::{GitInfo, Timestamp};

const LOG_FORMAT: &str = "--format=%an%x00%ae%x00%ct%x00%H%x00%B";

/// Describe the HEAD commit of the checkout containing `path`.
pub fn describe_head(path: &Path) -> Option<GitInfo> {
    let absolute = std::fs::canonicalize(path).ok()?;
    let dir = if absolute.is_dir() {
        absolute.as_path()
    } else {
        absolute.parent()?
    };

    if git(dir, &["rev-parse", "--is-inside-work-tree"])?.trim() != "true" {
        return None;
    }
    let branch = git(dir, &["rev-parse", "--abbrev-ref", "HEAD"])?
        .trim()
        .to_string();
    let tags: Vec<String> = git(dir, &["tag", "--points-at", "HEAD"])
        .map(|out| {
            out.lines()
                .map(str::trim)
                .filter(|t| !t.is_empty())
                .map(String::from)
                .collect()
        })
        .unwrap_or_default();
    let log = git(dir, &["log", "-1", LOG_FORMAT, "HEAD"])?;

    let mut fields = log.splitn(5, '\0');
    let author_name = fields.next()?.trim();
    let author_email = fields.next()?.trim();
    let commit_time = fields.next()?.trim().parse::<i64>().ok()?;
    let commit_hash = fields.next()?.trim();
    let commit_message = fields.next()?.trim_end();

    let commit_time = Timestamp::from_epoch_secs(commit_time).ok()?;
    match GitInfo::new(
        branch,
        tags,
        author_name,
        author_email,
        commit_time,
        commit_message,
        commit_hash,
    ) {
        Ok(info) => Some(info),
        Err(e) => {
            tracing::warn!(dir = %dir.display(), "ignoring git metadata: {e}");
            None
        }
    }
}

/// Run git in `dir`, returning stdout on success.
fn git(dir: &Path, args: &[&str]) -> Option<String> {
    let output = Command::new("git")
        .args(args)
        .current_dir(dir)
        .output()
        .ok()?;
    if !output.status.success() {
        tracing::trace!(?args, status = %output.status, "git command failed");
        return None;
    }
    String::from_utf8(output.stdout).ok()
}
