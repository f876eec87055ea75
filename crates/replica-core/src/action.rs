//! Actions applied during a pass and the per-pass report

use std::fmt;

use replica_fs::RelativePath;
use serde::Serialize;

/// One mutation of the replica.
///
/// `Display` renders the exact audit log line, without the newline.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", content = "path")]
pub enum Action {
    /// File copied into the replica where none existed
    Added(RelativePath),
    /// Replica file overwritten because its content differed
    Updated(RelativePath),
    /// Replica file deleted because the source has no such file
    Removed(RelativePath),
}

impl Action {
    /// Get the path associated with this action.
    pub fn path(&self) -> &RelativePath {
        match self {
            Self::Added(path) | Self::Updated(path) | Self::Removed(path) => path,
        }
    }

    /// The log line prefix, without the trailing `": "`.
    pub fn label(&self) -> &'static str {
        match self {
            Self::Added(_) => "Added",
            Self::Updated(_) => "Updated",
            Self::Removed(_) => "Removed",
        }
    }
}

impl fmt::Display for Action {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.label(), self.path())
    }
}

/// Summary of a single reconcile pass.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct PassReport {
    /// Actions in the order they were applied
    pub actions: Vec<Action>,
    /// Files present on both sides with identical content
    pub unchanged: usize,
    /// Files that disappeared mid-pass and were left for the next pass
    pub skipped: Vec<RelativePath>,
    /// Whether the replica was left untouched
    pub dry_run: bool,
    /// Wall-clock duration of the pass
    pub elapsed_ms: u64,
}

impl PassReport {
    pub fn added(&self) -> usize {
        self.count(|a| matches!(a, Action::Added(_)))
    }

    pub fn updated(&self) -> usize {
        self.count(|a| matches!(a, Action::Updated(_)))
    }

    pub fn removed(&self) -> usize {
        self.count(|a| matches!(a, Action::Removed(_)))
    }

    /// True when the pass found nothing to change.
    pub fn is_converged(&self) -> bool {
        self.actions.is_empty()
    }

    /// Render as a single JSON line.
    pub fn to_json_line(&self) -> crate::Result<String> {
        Ok(serde_json::to_string(self)?)
    }

    fn count(&self, pred: impl Fn(&Action) -> bool) -> usize {
        self.actions.iter().filter(|a| pred(a)).count()
    }
}
