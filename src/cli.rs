//! Command-line interface for the backlog manager.
//!
//! The binary is a thin transport collaborator: it resolves the store
//! path, initializes logging, and serves the stdio request loop. All
//! semantics live in [`crate::service`].

use std::path::PathBuf;

use anyhow::Result;
use clap::Parser;

use crate::config::Config;
use crate::logging;
use crate::server;
use crate::service::BacklogService;
use crate::store::FileStore;

/// `blm` - backlog manager service over stdio.
#[derive(Parser, Debug)]
#[command(name = "blm")]
#[command(
    author,
    version,
    about = "Backlog manager service (issues + tasks, JSON file storage)",
    long_about = None,
    after_help = "Reads newline-delimited JSON requests from stdin and writes one JSON response per line."
)]
pub struct Cli {
    /// Path to the backlog store file
    #[arg(long, env = "TASKS_FILE")]
    pub tasks_file: Option<PathBuf>,

    /// Verbose output
    #[arg(short, long, action = clap::ArgAction::Count)]
    pub verbose: u8,

    /// Quiet mode (errors only)
    #[arg(short, long)]
    pub quiet: bool,
}

/// Parse arguments and serve until stdin closes.
///
/// # Errors
///
/// Returns an error if the stdio transport itself fails.
pub fn run() -> Result<()> {
    let cli = Cli::parse();
    logging::init(cli.verbose, cli.quiet);

    let config = Config::resolve(cli.tasks_file);
    let service = BacklogService::new(FileStore::new(config.tasks_file));

    let stdin = std::io::stdin().lock();
    let stdout = std::io::stdout().lock();
    server::serve(&service, stdin, stdout)?;

    Ok(())
}
