//! Error types for replica-core

use std::path::PathBuf;

/// Result type for replica-core operations
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur in replica-core operations
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// Source root does not exist
    #[error("Source directory not found: {path}")]
    SourceNotFound { path: PathBuf },

    /// Replica root does not exist
    #[error("Replica directory not found: {path}")]
    ReplicaNotFound { path: PathBuf },

    /// Another process holds the audit log
    #[error("Log file {path} is locked by another process")]
    LogLocked { path: PathBuf },

    /// Filesystem error from replica-fs
    #[error(transparent)]
    Fs(#[from] replica_fs::Error),

    /// Standard I/O error
    #[error(transparent)]
    Io(#[from] std::io::Error),

    /// JSON serialization error
    #[error(transparent)]
    Json(#[from] serde_json::Error),
}

impl Error {
    /// Whether the underlying failure is a path that no longer exists.
    pub fn is_not_found(&self) -> bool {
        match self {
            Self::Fs(err) => err.is_not_found(),
            Self::Io(err) => err.kind() == std::io::ErrorKind::NotFound,
            _ => false,
        }
    }
}
