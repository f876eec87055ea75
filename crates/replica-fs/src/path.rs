//! Tree-relative paths used as the join key between source and replica

use std::ffi::OsStr;
use std::path::{Component, Path, PathBuf};

use crate::{Error, Result};

/// A file's location relative to its tree root.
///
/// Only normal components are kept, so two paths compare equal when their
/// logical components match regardless of how they were spelled (`./a//b`
/// and `a/b` are the same entry). A `..` component removes the previous
/// component and is dropped at the start, so a `RelativePath` can never
/// point above the root it is joined to.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Default)]
pub struct RelativePath {
    /// Normal components only
    inner: PathBuf,
}

impl RelativePath {
    /// Create a relative path from any path-like input.
    pub fn new(path: impl AsRef<Path>) -> Self {
        let mut inner = PathBuf::new();
        for component in path.as_ref().components() {
            match component {
                Component::Normal(part) => inner.push(part),
                Component::ParentDir => {
                    inner.pop();
                }
                Component::CurDir | Component::RootDir | Component::Prefix(_) => {}
            }
        }
        Self { inner }
    }

    /// Express `path` relative to `root`.
    ///
    /// # Errors
    ///
    /// Returns [`Error::OutsideRoot`] if `path` does not start with `root`.
    pub fn strip(path: &Path, root: &Path) -> Result<Self> {
        let relative = path.strip_prefix(root).map_err(|_| Error::OutsideRoot {
            path: path.to_path_buf(),
            root: root.to_path_buf(),
        })?;
        Ok(Self::new(relative))
    }

    /// Resolve this path under a tree root for I/O.
    pub fn under(&self, root: &Path) -> PathBuf {
        root.join(&self.inner)
    }

    /// Borrow as a native path.
    pub fn as_path(&self) -> &Path {
        &self.inner
    }

    /// True for the root itself.
    pub fn is_empty(&self) -> bool {
        self.inner.as_os_str().is_empty()
    }

    /// Get the final component.
    pub fn file_name(&self) -> Option<&OsStr> {
        self.inner.file_name()
    }

    /// Get the parent directory, `None` for top-level entries.
    pub fn parent(&self) -> Option<Self> {
        let parent = self.inner.parent()?;
        if parent.as_os_str().is_empty() {
            None
        } else {
            Some(Self {
                inner: parent.to_path_buf(),
            })
        }
    }

    /// Number of components.
    pub fn depth(&self) -> usize {
        self.inner.components().count()
    }
}

impl AsRef<Path> for RelativePath {
    fn as_ref(&self) -> &Path {
        &self.inner
    }
}

/// Renders with `/` separators on every platform.
impl std::fmt::Display for RelativePath {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let mut first = true;
        for component in self.inner.components() {
            if !first {
                f.write_str("/")?;
            }
            first = false;
            write!(f, "{}", component.as_os_str().to_string_lossy())?;
        }
        Ok(())
    }
}

impl serde::Serialize for RelativePath {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl From<&str> for RelativePath {
    fn from(s: &str) -> Self {
        Self::new(s)
    }
}

impl From<String> for RelativePath {
    fn from(s: String) -> Self {
        Self::new(s)
    }
}

impl From<&Path> for RelativePath {
    fn from(p: &Path) -> Self {
        Self::new(p)
    }
}

impl From<PathBuf> for RelativePath {
    fn from(p: PathBuf) -> Self {
        Self::new(p)
    }
}
