//! # art CLI entry point
//!
//! Parses arguments, resolves store settings, and runs one operation
//! against the group's repository. The exit code is the operation's.

use std::process::ExitCode;

use anyhow::Result;
use clap::{CommandFactory, Parser};
use tracing_subscriber::EnvFilter;

use art_cli::operation::HelpOperation;
use art_cli::{Command, Operation, Settings, StoreArgs};
use art_store::{ObjectStoreDriver, Repository};

/// Versioned artifact registry on S3 or a local directory.
#[derive(Parser, Debug)]
#[command(name = "art", version, about, long_about = None, disable_help_subcommand = true)]
struct Cli {
    /// Enable verbose output. Repeat for more verbosity (-v, -vv).
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    #[command(flatten)]
    store: StoreArgs,

    #[command(subcommand)]
    command: Option<Command>,
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    let level = match cli.verbose {
        0 => "info",
        1 => "debug",
        _ => "trace",
    };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();

    let usage = Cli::command().render_long_help().to_string();
    let operation = match cli.command {
        Some(command) => command.into_operation(usage),
        None => Operation::Help(HelpOperation::new(usage)),
    };
    if let Operation::Help(help) = &operation {
        return ExitCode::from(help.run());
    }

    match open_repository(&cli.store, &operation) {
        Ok(mut repo) => ExitCode::from(operation.run(&mut repo)),
        Err(e) => {
            tracing::error!("{e:#}");
            ExitCode::from(1)
        }
    }
}

fn open_repository(
    args: &StoreArgs,
    operation: &Operation,
) -> Result<Repository<ObjectStoreDriver>> {
    let group_id = operation.group_id().unwrap_or_default();
    let settings = Settings::from_args(args)
        .with_environ(std::env::vars())
        .with_config_file(group_id)?;
    let driver = settings.connect()?;
    tracing::debug!(group_id, location = driver.location(), "opening repository");
    Ok(Repository::new(driver, group_id)?)
}
