//! replica-sync CLI
//!
//! Runs reconcile passes forever on a fixed interval, keeping a replica
//! directory identical to a source directory.

mod cli;
mod error;

use std::io::Write;

use clap::Parser;
use clap::error::ErrorKind;
use colored::Colorize;
use tracing_subscriber::{EnvFilter, FmtSubscriber};

use cli::Cli;
use error::{CliError, Result};
use replica_core::{Driver, ReconcileOptions};

fn main() {
    match run() {
        Ok(()) => {}
        Err(CliError::Usage { message }) => {
            println!("{message}");
            std::process::exit(1);
        }
        Err(e) => {
            eprintln!("{}: {}", "error".red().bold(), e);
            std::process::exit(1);
        }
    }
}

fn run() -> Result<()> {
    let cli = match Cli::try_parse() {
        Ok(cli) => cli,
        Err(err) if matches!(err.kind(), ErrorKind::DisplayHelp | ErrorKind::DisplayVersion) => {
            err.print()?;
            return Ok(());
        }
        Err(err) => return Err(CliError::usage(cli::usage_message(&err))),
    };

    init_tracing(cli.verbose);

    let config = cli.sync_config();
    tracing::debug!(?config, once = cli.once, dry_run = cli.dry_run, "starting");
    config.validate()?;

    let driver = Driver::new(config, ReconcileOptions { dry_run: cli.dry_run });
    let stdout = std::io::stdout();
    let mut out = stdout.lock();

    driver.drive(cli.pass_limit(), &mut out, |report, out| {
        if cli.dry_run {
            for action in &report.actions {
                writeln!(out, "[dry-run] {action}")?;
            }
        }
        if cli.json {
            writeln!(out, "{}", report.to_json_line()?)?;
        }
        Ok(())
    })?;

    Ok(())
}

/// Install a stderr subscriber when `--verbose` is set or `RUST_LOG` is present.
fn init_tracing(verbose: bool) {
    let filter = if verbose {
        EnvFilter::new("debug")
    } else {
        match EnvFilter::try_from_default_env() {
            Ok(filter) => filter,
            Err(_) => return,
        }
    };

    let subscriber = FmtSubscriber::builder()
        .with_env_filter(filter)
        .with_target(true)
        .with_writer(std::io::stderr)
        .finish();

    if let Err(e) = tracing::subscriber::set_global_default(subscriber) {
        eprintln!("{}: failed to set tracing subscriber: {e}", "warning".yellow().bold());
    }
    tracing::debug!("Verbose mode enabled");
}
