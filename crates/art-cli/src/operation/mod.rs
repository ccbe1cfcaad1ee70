//! The commands `art` can run against a repository.
//!
//! [`Operation`] is a closed enum with one variant per command. Every
//! variant runs against a [`Repository`] and reports a process exit code;
//! errors are logged here and never escape as panics.

pub mod download;
pub mod help;
pub mod info;
pub mod list;
pub mod upload;

use art_core::Artifact;
use art_store::{Driver, Repository, StoreError};
use clap::Args;

pub use download::DownloadOperation;
pub use help::HelpOperation;
pub use info::InfoOperation;
pub use list::ListOperation;
pub use upload::UploadOperation;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Operation {
    Help(HelpOperation),
    Upload(UploadOperation),
    Download(DownloadOperation),
    List(ListOperation),
    Info(InfoOperation),
}

impl Operation {
    /// Group the operation addresses; `None` for [`Operation::Help`].
    pub fn group_id(&self) -> Option<&str> {
        match self {
            Self::Help(_) => None,
            Self::Upload(op) => Some(&op.group_id),
            Self::Download(op) => Some(&op.group_id),
            Self::List(op) => Some(&op.group_id),
            Self::Info(op) => Some(&op.group_id),
        }
    }

    /// Run and return the exit code: 0 on success, 1 on any failure.
    pub fn run<D: Driver>(&self, repo: &mut Repository<D>) -> u8 {
        match self {
            Self::Help(op) => op.run(),
            Self::Upload(op) => op.run(repo),
            Self::Download(op) => exit_code(op.run(repo).map(drop)),
            Self::List(op) => exit_code(op.run(repo)),
            Self::Info(op) => exit_code(op.run(repo)),
        }
    }
}

fn exit_code(result: anyhow::Result<()>) -> u8 {
    match result {
        Ok(()) => 0,
        Err(e) => {
            tracing::error!("{e:#}");
            1
        }
    }
}

/// Filters picking one record out of a manifest. Omitted filters match
/// anything; among matches the most recently appended record wins.
#[derive(Args, Debug, Clone, Default, PartialEq, Eq)]
pub struct Selection {
    /// Version to select (default: any).
    #[arg(long)]
    pub version: Option<String>,

    /// Revision to select (default: the latest matching).
    #[arg(long)]
    pub revision: Option<u32>,

    /// Extension to select (default: any).
    #[arg(long)]
    pub extension: Option<String>,
}

impl Selection {
    /// Find the selected record of `name`, or `StoreError::NotFound`.
    pub fn resolve<D: Driver>(
        &self,
        repo: &mut Repository<D>,
        name: &str,
    ) -> Result<Artifact, StoreError> {
        let group_id = repo.group_id().to_string();
        repo.load(name)?
            .select(
                self.version.as_deref(),
                self.revision,
                self.extension.as_deref(),
            )
            .cloned()
            .ok_or_else(|| StoreError::not_found(self.describe(&group_id, name)))
    }

    fn describe(&self, group_id: &str, name: &str) -> String {
        let mut out = format!("{group_id}/{name}");
        if let Some(v) = &self.version {
            out.push_str(&format!(" version={v}"));
        }
        if let Some(r) = self.revision {
            out.push_str(&format!(" revision={r}"));
        }
        if let Some(e) = &self.extension {
            out.push_str(&format!(" extension={e}"));
        }
        out
    }
}
