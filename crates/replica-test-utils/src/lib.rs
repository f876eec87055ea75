//! Shared test utilities for the replica-sync workspace.
//!
//! This crate is a dev-dependency only, never published.
//!
//! # Modules
//!
//! - [`fixture`]: [`SyncFixture`] with a source tree, a replica tree and a
//!   log path inside one temporary directory

pub mod fixture;

pub use fixture::SyncFixture;
