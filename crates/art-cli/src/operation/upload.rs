use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use art_core::{md5_hex, Artifact, ArtifactFilename, BasicInfo};
use art_store::{Driver, Repository};

use crate::error::OperationError;
use crate::{git, inspect};

/// Store local files as new revisions.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UploadOperation {
    pub group_id: String,
    pub files: Vec<PathBuf>,
    /// Print what would be stored without writing anything.
    pub dry_run: bool,
    /// Upload even when the latest matching revision has the same MD5.
    pub force: bool,
}

/// What happened to one file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum UploadOutcome {
    Uploaded(BasicInfo),
    Unchanged(BasicInfo),
    DryRun(Box<Artifact>),
}

impl UploadOperation {
    /// Upload every file independently. A failed file is logged and the
    /// rest still run; any failure makes the exit code 1.
    pub fn run<D: Driver>(&self, repo: &mut Repository<D>) -> u8 {
        let mut failed = 0usize;
        for path in &self.files {
            match self.upload(repo, path) {
                Ok(UploadOutcome::Uploaded(basic)) => {
                    tracing::info!(file = %path.display(), "uploaded {basic}");
                }
                Ok(UploadOutcome::Unchanged(basic)) => {
                    tracing::warn!(
                        file = %path.display(),
                        "identical to {basic}, skipped (use --force to upload anyway)"
                    );
                }
                Ok(UploadOutcome::DryRun(artifact)) => match serde_json::to_string_pretty(&artifact) {
                    Ok(json) => println!("{json}"),
                    Err(e) => {
                        tracing::error!(file = %path.display(), "cannot encode record: {e}");
                        failed += 1;
                    }
                },
                Err(e) => {
                    tracing::error!(file = %path.display(), "upload failed: {e:#}");
                    failed += 1;
                }
            }
        }
        if failed > 0 {
            tracing::error!("{failed} of {} file(s) failed", self.files.len());
            1
        } else {
            0
        }
    }

    /// Upload a single file.
    ///
    /// The blob is written before the manifest is saved. On any failure
    /// after the manifest is loaded, the cached manifest is evicted so no
    /// half-applied record survives into a later save.
    pub fn upload<D: Driver>(&self, repo: &mut Repository<D>, path: &Path) -> Result<UploadOutcome> {
        let parsed = ArtifactFilename::from_path(path)?;
        let file_info = inspect::inspect_file(path)?;
        let git_info = git::describe_head(path);
        let name = parsed.name;

        let group_id = repo.group_id().to_string();
        let (basic, unchanged) = {
            let manifest = repo.load(&name)?;
            let revision = manifest.next_revision(&parsed.version, &parsed.extension);
            let basic = BasicInfo::new(group_id, &name, parsed.version, parsed.extension, revision)?;
            let unchanged = manifest
                .latest_of(&basic)
                .filter(|prev| prev.file_info().md5() == file_info.md5())
                .map(|prev| prev.basic_info().clone());
            (basic, unchanged)
        };

        if let Some(prev) = unchanged.filter(|_| !self.force) {
            return Ok(UploadOutcome::Unchanged(prev));
        }
        let artifact = Artifact::new(basic, file_info, git_info);
        if self.dry_run {
            return Ok(UploadOutcome::DryRun(Box::new(artifact)));
        }

        let result = store(repo, &name, path, artifact);
        if result.is_err() {
            repo.evict(&name);
        }
        result
    }
}

fn store<D: Driver>(
    repo: &mut Repository<D>,
    name: &str,
    path: &Path,
    artifact: Artifact,
) -> Result<UploadOutcome> {
    let bytes = std::fs::read(path).with_context(|| format!("cannot read {}", path.display()))?;
    if md5_hex(&bytes) != artifact.file_info().md5() {
        return Err(OperationError::FileChanged {
            path: path.to_path_buf(),
        }
        .into());
    }
    repo.put_blob(&artifact, &bytes)?;
    let basic = artifact.basic_info().clone();
    repo.append(name, artifact)?;
    repo.save(name)?;
    Ok(UploadOutcome::Uploaded(basic))
}
