//! Command-line subcommands and their mapping onto [`Operation`]s.

use std::path::PathBuf;

use clap::Subcommand;

use crate::operation::{
    DownloadOperation, HelpOperation, InfoOperation, ListOperation, Operation, Selection,
    UploadOperation,
};

#[derive(Subcommand, Debug, Clone, PartialEq, Eq)]
pub enum Command {
    /// Upload files named `<name>-<version>.<extension>` as new revisions.
    Upload {
        /// Group the artifacts belong to, e.g. `com.example.tools`.
        group_id: String,

        /// Files to upload.
        #[arg(required = true)]
        files: Vec<PathBuf>,

        /// Show the records that would be stored without writing anything.
        #[arg(long, short = 'n')]
        dry_run: bool,

        /// Upload even if the latest revision has the same checksum.
        #[arg(long, short = 'f')]
        force: bool,
    },

    /// Download a stored artifact (latest revision by default).
    Download {
        group_id: String,
        name: String,

        #[command(flatten)]
        selection: Selection,

        /// Output file or directory.
        #[arg(long, short = 'o')]
        output: Option<PathBuf>,
    },

    /// List artifact names in a group, or the revisions of one artifact.
    List {
        group_id: String,
        name: Option<String>,
    },

    /// Print the stored record of an artifact as JSON.
    Info {
        group_id: String,
        name: String,

        #[command(flatten)]
        selection: Selection,
    },

    /// Print usage.
    Help,
}

impl Command {
    /// Turn the parsed command into an operation. `usage` is the text
    /// printed by `help`.
    pub fn into_operation(self, usage: impl Into<String>) -> Operation {
        match self {
            Self::Upload {
                group_id,
                files,
                dry_run,
                force,
            } => Operation::Upload(UploadOperation {
                group_id,
                files,
                dry_run,
                force,
            }),
            Self::Download {
                group_id,
                name,
                selection,
                output,
            } => Operation::Download(DownloadOperation {
                group_id,
                name,
                selection,
                output,
            }),
            Self::List { group_id, name } => Operation::List(ListOperation { group_id, name }),
            Self::Info {
                group_id,
                name,
                selection,
            } => Operation::Info(InfoOperation {
                group_id,
                name,
                selection,
            }),
            Self::Help => Operation::Help(HelpOperation::new(usage)),
        }
    }
}
