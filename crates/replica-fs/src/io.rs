//! Copy and delete primitives applied to the replica

use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use filetime::FileTime;

use crate::{Error, Result};

/// Create the directories between `root` and `dir`, one level at a time.
///
/// `root` itself must already exist and is never created. Returns
/// [`Error::OutsideRoot`] if `dir` is not below `root`.
pub fn create_dirs_below(root: &Path, dir: &Path) -> Result<()> {
    let relative = dir.strip_prefix(root).map_err(|_| Error::OutsideRoot {
        path: dir.to_path_buf(),
        root: root.to_path_buf(),
    })?;

    let mut current = root.to_path_buf();
    for component in relative.components() {
        current.push(component);
        match fs::create_dir(&current) {
            Ok(()) => tracing::trace!(path = %current.display(), "created directory"),
            Err(e) if e.kind() == ErrorKind::AlreadyExists && current.is_dir() => {}
            Err(e) => return Err(Error::io(&current, e)),
        }
    }
    Ok(())
}

/// Copy `from` to `to`, preserving permissions and timestamps.
///
/// The parent of `to` must exist. A regular file at `to` is overwritten in
/// place; a symlink or special file at `to` is replaced, never written
/// through. Returns the number of bytes copied.
pub fn copy_with_metadata(from: &Path, to: &Path) -> Result<u64> {
    // Read metadata first so a vanished source surfaces before the write.
    let metadata = fs::metadata(from).map_err(|e| Error::io(from, e))?;

    if let Ok(existing) = fs::symlink_metadata(to) {
        let kind = existing.file_type();
        if !kind.is_file() && !kind.is_dir() {
            fs::remove_file(to).map_err(|e| Error::io(to, e))?;
        }
    }

    // `fs::copy` does not say which side failed.
    let bytes = fs::copy(from, to).map_err(|e| {
        let culprit = if from.exists() { to } else { from };
        Error::io(culprit, e)
    })?;

    let mtime = FileTime::from_last_modification_time(&metadata);
    let atime = FileTime::from_last_access_time(&metadata);
    filetime::set_file_times(to, atime, mtime).map_err(|e| Error::io(to, e))?;

    tracing::debug!(from = %from.display(), to = %to.display(), bytes, "copied");
    Ok(bytes)
}

/// Whether `path` resolves to a regular file. Missing paths are not files.
pub fn is_regular_file(path: &Path) -> Result<bool> {
    match fs::metadata(path) {
        Ok(metadata) => Ok(metadata.is_file()),
        Err(e) if e.kind() == ErrorKind::NotFound => Ok(false),
        Err(e) => Err(Error::io(path, e)),
    }
}

/// Delete a single file.
pub fn remove_file(path: &Path) -> Result<()> {
    fs::remove_file(path).map_err(|e| Error::io(path, e))?;
    tracing::debug!(path = %path.display(), "removed");
    Ok(())
}

/// Whether something exists at `path`, following symlinks.
pub fn exists(path: &Path) -> Result<bool> {
    path.try_exists().map_err(|e| Error::io(path, e))
}

/// Resolve `path` to a canonical directory path.
///
/// # Errors
///
/// Returns a not-found I/O error if nothing exists at `path`, and
/// [`Error::NotADirectory`] if it is not a directory.
pub fn resolve_dir(path: &Path) -> Result<PathBuf> {
    let resolved = dunce::canonicalize(path).map_err(|e| Error::io(path, e))?;
    if !resolved.is_dir() {
        return Err(Error::NotADirectory { path: resolved });
    }
    Ok(resolved)
}
