use std::path::PathBuf;

use anyhow::{Context, Result};
use art_core::md5_hex;
use art_store::{Driver, Repository};

use super::Selection;
use crate::error::OperationError;

/// Fetch one stored file into the local filesystem.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DownloadOperation {
    pub group_id: String,
    pub name: String,
    pub selection: Selection,
    /// Destination file or directory; defaults to the record's filename in
    /// the working directory.
    pub output: Option<PathBuf>,
}

impl DownloadOperation {
    /// Download and return the path written.
    ///
    /// Nothing is created locally unless a record matched and its bytes
    /// hash to the recorded MD5.
    pub fn run<D: Driver>(&self, repo: &mut Repository<D>) -> Result<PathBuf> {
        let record = self.selection.resolve(repo, &self.name)?;
        let basic = record.basic_info();
        tracing::debug!(artifact = %basic, "fetching blob");

        let bytes = repo
            .get_blob(&record)
            .with_context(|| format!("cannot fetch {basic}"))?;
        let actual = md5_hex(&bytes);
        if actual != record.file_info().md5() {
            return Err(OperationError::ChecksumMismatch {
                artifact: basic.to_string(),
                expected: record.file_info().md5().to_string(),
                actual,
            }
            .into());
        }

        let dest = match &self.output {
            Some(path) if path.is_dir() => path.join(basic.filename()),
            Some(path) => path.clone(),
            None => PathBuf::from(basic.filename()),
        };
        std::fs::write(&dest, &bytes).with_context(|| format!("cannot write {}", dest.display()))?;
        tracing::info!(artifact = %basic, path = %dest.display(), "downloaded");
        Ok(dest)
    }
}
