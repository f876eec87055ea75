//! CLI argument parsing using clap derive

use std::path::PathBuf;

use clap::{CommandFactory, Parser};
use replica_core::SyncConfig;

/// Keep a replica directory in one-way sync with a source directory
#[derive(Parser, Debug)]
#[command(name = "replica-sync")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Directory to mirror from
    pub source: PathBuf,

    /// Directory kept identical to SOURCE; must already exist
    pub replica: PathBuf,

    /// Seconds to wait between passes
    #[arg(value_name = "INTERVAL_SECONDS")]
    pub interval: u64,

    /// File that every Added/Updated/Removed action is appended to
    pub log_file: PathBuf,

    /// Enable verbose output
    #[arg(short, long)]
    pub verbose: bool,

    /// Run a single pass and exit
    #[arg(long)]
    pub once: bool,

    /// Preview changes without touching the replica or the log
    #[arg(long)]
    pub dry_run: bool,

    /// Print each pass report as a JSON line
    #[arg(long)]
    pub json: bool,
}

impl Cli {
    /// Build the driver configuration from the positional arguments.
    pub fn sync_config(&self) -> SyncConfig {
        SyncConfig::new(
            &self.source,
            &self.replica,
            self.interval,
            &self.log_file,
        )
    }

    /// Number of passes to run, `None` for forever.
    pub fn pass_limit(&self) -> Option<usize> {
        self.once.then_some(1)
    }
}

/// Render a parse failure so it always ends with the usage line.
///
/// Some clap errors (bad values) omit usage on their own.
pub fn usage_message(err: &clap::Error) -> String {
    let rendered = err.render().to_string();
    let rendered = rendered.trim_end();
    if rendered.contains("Usage:") {
        rendered.to_string()
    } else {
        format!("{rendered}\n\n{}", Cli::command().render_usage())
    }
}
