//! Filesystem primitives for replica-sync
//!
//! Provides relative path handling, content fingerprints, tree walking and
//! the copy/delete operations the reconciler applies to a replica.

pub mod checksum;
pub mod error;
pub mod io;
pub mod path;
pub mod walk;

pub use checksum::Fingerprint;
pub use error::{Error, Result};
pub use path::RelativePath;
pub use walk::{list_files, list_non_directories};
