//! Recursive enumeration of the regular files in a tree

use std::io::ErrorKind;
use std::path::Path;

use walkdir::{DirEntry, WalkDir};

use crate::{Error, RelativePath, Result};

/// List every regular file under `root`, relative to `root`.
///
/// Entries are yielded in file-name order within each directory. Symlinks
/// are not descended into; a symlink that resolves to a file counts as a
/// file. A subdirectory that disappears while being walked is skipped with a
/// warning, since the next pass will see the tree as it is by then.
///
/// # Errors
///
/// Returns an error if `root` itself cannot be read or any entry fails with
/// something other than "not found".
pub fn list_files(root: &Path) -> Result<Vec<RelativePath>> {
    collect(root, is_regular_file)
}

/// List every entry under `root` that is not a directory.
///
/// This is a superset of [`list_files`]: dangling symlinks, symlinks to
/// directories and special files such as FIFOs or sockets are included, so a
/// tree can be emptied of everything a source tree does not hold.
pub fn list_non_directories(root: &Path) -> Result<Vec<RelativePath>> {
    collect(root, |entry| !entry.file_type().is_dir())
}

fn collect(root: &Path, keep: impl Fn(&DirEntry) -> bool) -> Result<Vec<RelativePath>> {
    let mut files = Vec::new();

    let walker = WalkDir::new(root)
        .min_depth(1)
        .follow_links(false)
        .sort_by_file_name();

    for entry in walker {
        let entry = match entry {
            Ok(entry) => entry,
            Err(err) if err.depth() > 0 && is_vanished(&err) => {
                tracing::warn!(
                    path = ?err.path(),
                    "entry disappeared during walk, skipping"
                );
                continue;
            }
            Err(err) => return Err(err.into()),
        };

        if keep(&entry) {
            files.push(RelativePath::strip(entry.path(), root)?);
        }
    }

    tracing::debug!(root = %root.display(), count = files.len(), "listed files");
    Ok(files)
}

fn is_regular_file(entry: &DirEntry) -> bool {
    let file_type = entry.file_type();
    file_type.is_file() || (file_type.is_symlink() && entry.path().is_file())
}

fn is_vanished(err: &walkdir::Error) -> bool {
    err.io_error()
        .is_some_and(|e| e.kind() == ErrorKind::NotFound)
}
