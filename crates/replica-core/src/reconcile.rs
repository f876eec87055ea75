//! The reconcile pass
//!
//! A pass runs two phases in a fixed order:
//!
//! 1. **Propagate**: every file in the source is copied to the replica when
//!    missing there (`Added`) or when the content fingerprints differ
//!    (`Updated`). Identical files are left alone.
//! 2. **Clean**: every non-directory entry in the replica with no source
//!    counterpart is deleted (`Removed`). Dangling symlinks and special
//!    files count.
//!
//! Content equality is decided only by full-file fingerprints, never by size
//! or timestamp.

use std::path::{Path, PathBuf};
use std::time::Instant;

use replica_fs::{RelativePath, checksum, io, list_files, list_non_directories};

use crate::{Action, AuditLog, Error, PassReport, Result};

/// Options for a reconcile pass
#[derive(Debug, Clone, Copy, Default)]
pub struct ReconcileOptions {
    /// If true, compute actions without modifying the replica or the log.
    pub dry_run: bool,
}

/// Brings a replica tree in line with a source tree.
#[derive(Debug, Clone)]
pub struct Reconciler {
    source: PathBuf,
    replica: PathBuf,
    options: ReconcileOptions,
}

impl Reconciler {
    /// Create a reconciler for the given roots.
    pub fn new(source: impl Into<PathBuf>, replica: impl Into<PathBuf>) -> Self {
        Self {
            source: source.into(),
            replica: replica.into(),
            options: ReconcileOptions::default(),
        }
    }

    /// Replace the pass options.
    pub fn with_options(mut self, options: ReconcileOptions) -> Self {
        self.options = options;
        self
    }

    pub fn source(&self) -> &Path {
        &self.source
    }

    pub fn replica(&self) -> &Path {
        &self.replica
    }

    /// Verify both roots exist and are directories.
    ///
    /// Returns the canonical `(source, replica)` paths for diagnostics. The
    /// replica root is never created here.
    pub fn check_roots(&self) -> Result<(PathBuf, PathBuf)> {
        let source = io::resolve_dir(&self.source).map_err(|e| {
            if e.is_not_found() {
                Error::SourceNotFound {
                    path: self.source.clone(),
                }
            } else {
                e.into()
            }
        })?;
        let replica = io::resolve_dir(&self.replica).map_err(|e| {
            if e.is_not_found() {
                Error::ReplicaNotFound {
                    path: self.replica.clone(),
                }
            } else {
                e.into()
            }
        })?;
        Ok((source, replica))
    }

    /// Run one full pass, recording every mutation in `log`.
    ///
    /// # Errors
    ///
    /// Any I/O failure other than a file vanishing mid-pass aborts the pass.
    /// Actions applied before the failure are already in `log`.
    pub fn reconcile(&self, log: &mut AuditLog) -> Result<PassReport> {
        let started = Instant::now();
        let (source_root, replica_root) = self.check_roots()?;

        let mut report = PassReport {
            dry_run: self.options.dry_run,
            ..Default::default()
        };

        tracing::debug!(source = %source_root.display(), "propagating");
        self.propagate(list_files(&self.source)?, log, &mut report)?;

        tracing::debug!(replica = %replica_root.display(), "cleaning");
        self.clean(list_non_directories(&self.replica)?, log, &mut report)?;

        report.elapsed_ms = started.elapsed().as_millis() as u64;
        tracing::debug!(
            added = report.added(),
            updated = report.updated(),
            removed = report.removed(),
            unchanged = report.unchanged,
            skipped = report.skipped.len(),
            "pass finished"
        );
        Ok(report)
    }

    /// Phase A over the files listed in the source.
    ///
    /// A not-found failure is skipped only when the source file itself is
    /// gone. Anything missing on the replica side aborts the pass.
    fn propagate(
        &self,
        paths: Vec<RelativePath>,
        log: &mut AuditLog,
        report: &mut PassReport,
    ) -> Result<()> {
        for path in paths {
            match self.propagate_one(&path) {
                Ok(Some(action)) => self.commit(action, log, report)?,
                Ok(None) => report.unchanged += 1,
                Err(err) if err.is_not_found() => {
                    if io::exists(&path.under(&self.source))? {
                        return Err(err);
                    }
                    self.skip(path, &err, report);
                }
                Err(err) => return Err(err),
            }
        }
        Ok(())
    }

    /// Phase B over the non-directory entries listed in the replica.
    fn clean(
        &self,
        paths: Vec<RelativePath>,
        log: &mut AuditLog,
        report: &mut PassReport,
    ) -> Result<()> {
        for path in paths {
            match self.clean_one(&path) {
                Ok(Some(action)) => self.commit(action, log, report)?,
                Ok(None) => {}
                // Already gone from the replica, which is what this phase wants.
                Err(err) if err.is_not_found() => self.skip(path, &err, report),
                Err(err) => return Err(err),
            }
        }
        Ok(())
    }

    fn propagate_one(&self, path: &RelativePath) -> Result<Option<Action>> {
        let source = path.under(&self.source);
        let replica = path.under(&self.replica);

        let action = if !io::exists(&replica)? {
            Action::Added(path.clone())
        } else if io::is_regular_file(&replica)? && checksum::same_content(&source, &replica)? {
            tracing::trace!(%path, "unchanged");
            return Ok(None);
        } else {
            Action::Updated(path.clone())
        };

        if !self.options.dry_run {
            if let Some(parent) = replica.parent() {
                io::create_dirs_below(&self.replica, parent)?;
            }
            io::copy_with_metadata(&source, &replica)?;
        }
        Ok(Some(action))
    }

    fn clean_one(&self, path: &RelativePath) -> Result<Option<Action>> {
        if io::exists(&path.under(&self.source))? {
            return Ok(None);
        }
        if !self.options.dry_run {
            io::remove_file(&path.under(&self.replica))?;
        }
        Ok(Some(Action::Removed(path.clone())))
    }

    fn commit(&self, action: Action, log: &mut AuditLog, report: &mut PassReport) -> Result<()> {
        if self.options.dry_run {
            tracing::info!("[dry-run] {action}");
        } else {
            log.record(&action)?;
        }
        report.actions.push(action);
        Ok(())
    }

    fn skip(&self, path: RelativePath, err: &Error, report: &mut PassReport) {
        tracing::warn!(%path, error = %err, "file vanished during pass, leaving for next pass");
        report.skipped.push(path);
    }
}
