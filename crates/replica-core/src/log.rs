//! Append-only audit log of replica mutations
//!
//! One line per action, `Added: <path>`, `Updated: <path>` or
//! `Removed: <path>`. No timestamps or levels. The file is opened in append
//! mode for the duration of a single pass and never truncated.

use std::fs::{File, OpenOptions};
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};

use fs2::FileExt;

use crate::{Action, Error, Result};

enum Sink {
    File {
        path: PathBuf,
        writer: BufWriter<File>,
    },
    Memory(Vec<u8>),
    Discard,
}

/// Scoped handle to the audit log.
///
/// Holds an exclusive advisory lock on the log file while open. Buffered
/// lines are flushed by [`AuditLog::finish`], or on drop when a pass exits
/// early with an error.
pub struct AuditLog {
    sink: Sink,
    recorded: usize,
}

impl AuditLog {
    /// Open `path` for appending, creating it if needed.
    ///
    /// # Errors
    ///
    /// Returns [`Error::LogLocked`] if another process holds the log, or an
    /// I/O error if the file cannot be opened or locked.
    pub fn open(path: &Path) -> Result<Self> {
        let file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(path)
            .map_err(|e| replica_fs::Error::io(path, e))?;

        file.try_lock_exclusive().map_err(|e| lock_error(path, e))?;

        tracing::debug!(path = %path.display(), "audit log opened");
        Ok(Self {
            sink: Sink::File {
                path: path.to_path_buf(),
                writer: BufWriter::new(file),
            },
            recorded: 0,
        })
    }

    /// A log that keeps lines in memory.
    pub fn in_memory() -> Self {
        Self {
            sink: Sink::Memory(Vec::new()),
            recorded: 0,
        }
    }

    /// A log that drops every line.
    pub fn discard() -> Self {
        Self {
            sink: Sink::Discard,
            recorded: 0,
        }
    }

    /// Append one action as a line.
    pub fn record(&mut self, action: &Action) -> Result<()> {
        match &mut self.sink {
            Sink::File { path, writer } => {
                writeln!(writer, "{action}").map_err(|e| replica_fs::Error::io(path.as_path(), e))?;
            }
            Sink::Memory(buf) => writeln!(buf, "{action}")?,
            Sink::Discard => {}
        }
        self.recorded += 1;
        tracing::info!("{action}");
        Ok(())
    }

    /// Number of lines recorded through this handle.
    pub fn recorded(&self) -> usize {
        self.recorded
    }

    /// Lines held by an in-memory log, `None` for other sinks.
    pub fn lines(&self) -> Option<Vec<String>> {
        match &self.sink {
            Sink::Memory(buf) => Some(
                String::from_utf8_lossy(buf)
                    .lines()
                    .map(str::to_string)
                    .collect(),
            ),
            _ => None,
        }
    }

    /// Flush buffered lines and release the lock.
    pub fn finish(mut self) -> Result<()> {
        if let Sink::File { path, writer } = &mut self.sink {
            writer.flush().map_err(|e| replica_fs::Error::io(path.as_path(), e))?;
            writer
                .get_ref()
                .unlock()
                .map_err(|e| replica_fs::Error::io(path.as_path(), e))?;
            tracing::debug!(path = %path.display(), lines = self.recorded, "audit log closed");
        }
        Ok(())
    }
}

impl Drop for AuditLog {
    fn drop(&mut self) {
        if let Sink::File { path, writer } = &mut self.sink {
            if let Err(e) = writer.flush() {
                tracing::warn!(path = %path.display(), error = %e, "failed to flush audit log");
            }
        }
    }
}

impl std::fmt::Debug for AuditLog {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let sink = match &self.sink {
            Sink::File { path, .. } => format!("File({})", path.display()),
            Sink::Memory(_) => "Memory".to_string(),
            Sink::Discard => "Discard".to_string(),
        };
        f.debug_struct("AuditLog")
            .field("sink", &sink)
            .field("recorded", &self.recorded)
            .finish()
    }
}

/// Only contention means another process holds the log. Filesystems without
/// lock support fail with a plain I/O error instead.
fn lock_error(path: &Path, err: std::io::Error) -> Error {
    let contended = fs2::lock_contended_error();
    if err.kind() == std::io::ErrorKind::WouldBlock
        || (err.raw_os_error().is_some() && err.raw_os_error() == contended.raw_os_error())
    {
        Error::LogLocked {
            path: path.to_path_buf(),
        }
    } else {
        replica_fs::Error::io(path, err).into()
    }
}
