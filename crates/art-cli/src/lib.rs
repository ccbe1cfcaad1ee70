//! # art-cli: the `art` command
//!
//! Uploads build outputs into a repository of versioned artifacts and
//! reads them back.
//!
//! ```bash
//! art upload com.example.tools target/tool-1.4.0.tar.gz
//! art list com.example.tools tool
//! art info com.example.tools tool --version 1.4.0
//! art download com.example.tools tool --revision 2 -o /tmp/
//! ```
//!
//! Each upload records file attributes (size, mtime, MD5, host, user) and,
//! when the file sits inside a git checkout, the HEAD commit it was built
//! from. Revisions count up per `(version, extension)` starting at 1.
//!
//! Store credentials resolve through [`settings::Settings`]: flags, then
//! `AWS_*` environment variables, then `~/.artifact-cli`.

pub mod command;
pub mod error;
pub mod git;
pub mod inspect;
pub mod operation;
pub mod settings;

pub use command::Command;
pub use error::OperationError;
pub use operation::Operation;
pub use settings::{Settings, StoreArgs};
