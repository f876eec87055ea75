//! Configuration for a sync run

use std::path::PathBuf;
use std::time::Duration;

use crate::{Reconciler, Result};

/// Everything a driver needs to run passes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SyncConfig {
    /// Authoritative tree
    pub source: PathBuf,
    /// Tree kept in line with `source`; must already exist
    pub replica: PathBuf,
    /// Pause between the end of one pass and the start of the next
    pub interval: Duration,
    /// Audit log, opened for append on every pass
    pub log_file: PathBuf,
}

impl SyncConfig {
    pub fn new(
        source: impl Into<PathBuf>,
        replica: impl Into<PathBuf>,
        interval_secs: u64,
        log_file: impl Into<PathBuf>,
    ) -> Self {
        Self {
            source: source.into(),
            replica: replica.into(),
            interval: Duration::from_secs(interval_secs),
            log_file: log_file.into(),
        }
    }

    /// Check both roots exist as directories.
    pub fn validate(&self) -> Result<()> {
        let (source, replica) = self.reconciler().check_roots()?;
        tracing::debug!(
            source = %source.display(),
            replica = %replica.display(),
            "roots resolved"
        );
        Ok(())
    }

    pub(crate) fn reconciler(&self) -> Reconciler {
        Reconciler::new(&self.source, &self.replica)
    }
}
