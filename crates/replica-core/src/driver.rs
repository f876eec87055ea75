//! The run loop
//!
//! Each iteration opens the audit log, runs one reconcile pass, closes the
//! log, reports completion and sleeps for the configured interval. Passes
//! never overlap, so the real period is the interval plus the pass duration.

use std::io::Write;

use crate::{AuditLog, PassReport, ReconcileOptions, Reconciler, Result, SyncConfig};

/// Printed after every completed pass.
pub const COMPLETION_MESSAGE: &str = "Synchronization completed.";

/// Owns the loop that keeps a replica in sync.
#[derive(Debug, Clone)]
pub struct Driver {
    config: SyncConfig,
    reconciler: Reconciler,
    options: ReconcileOptions,
}

impl Driver {
    pub fn new(config: SyncConfig, options: ReconcileOptions) -> Self {
        let reconciler = config.reconciler().with_options(options);
        Self {
            config,
            reconciler,
            options,
        }
    }

    pub fn config(&self) -> &SyncConfig {
        &self.config
    }

    /// Run a single pass against the configured audit log.
    ///
    /// A dry run never opens the log file.
    pub fn run_pass(&self) -> Result<PassReport> {
        if self.options.dry_run {
            return self.reconciler.reconcile(&mut AuditLog::discard());
        }

        let mut log = AuditLog::open(&self.config.log_file)?;
        let report = self.reconciler.reconcile(&mut log)?;
        log.finish()?;
        Ok(report)
    }

    /// Loop forever. Only returns on error.
    pub fn run<W: Write>(&self, out: &mut W) -> Result<()> {
        self.drive(None, out, |_, _| Ok(()))
    }

    /// Run exactly `passes` iterations without sleeping after the last one.
    pub fn run_passes<W: Write>(&self, passes: usize, out: &mut W) -> Result<Vec<PassReport>> {
        let mut reports = Vec::with_capacity(passes);
        self.drive(Some(passes), out, |report, _| {
            reports.push(report.clone());
            Ok(())
        })?;
        Ok(reports)
    }

    /// Drive the loop, handing each report to `on_pass` before the
    /// completion message is written. `None` means no pass limit.
    pub fn drive<W, F>(&self, passes: Option<usize>, out: &mut W, mut on_pass: F) -> Result<()>
    where
        W: Write,
        F: FnMut(&PassReport, &mut W) -> Result<()>,
    {
        if passes == Some(0) {
            return Ok(());
        }

        let mut completed = 0usize;
        loop {
            let span = tracing::info_span!("pass", number = completed + 1);
            let report = span.in_scope(|| self.run_pass())?;

            on_pass(&report, &mut *out)?;
            writeln!(out, "{COMPLETION_MESSAGE}")?;
            out.flush()?;

            completed += 1;
            if passes.is_some_and(|limit| completed >= limit) {
                return Ok(());
            }

            tracing::debug!(seconds = self.config.interval.as_secs(), "sleeping");
            std::thread::sleep(self.config.interval);
        }
    }
}
