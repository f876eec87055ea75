//! Reconcile engine for replica-sync
//!
//! This crate brings a replica directory tree in line with a source tree:
//!
//! - **Reconciler**: one full propagate-then-clean pass over both trees
//! - **AuditLog**: append-only record of every `Added`/`Updated`/`Removed` action
//! - **Driver**: runs a pass, reports completion, sleeps, repeats
//!
//! # Architecture
//!
//! ```text
//!        replica-cli
//!             |
//!       replica-core   (Driver -> Reconciler -> AuditLog)
//!             |
//!        replica-fs    (walk, fingerprint, copy, remove)
//! ```

pub mod action;
pub mod config;
pub mod driver;
pub mod error;
pub mod log;
pub mod reconcile;

pub use action::{Action, PassReport};
pub use config::SyncConfig;
pub use driver::{COMPLETION_MESSAGE, Driver};
pub use error::{Error, Result};
pub use log::AuditLog;
pub use reconcile::{ReconcileOptions, Reconciler};
