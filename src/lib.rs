//! Cutover - versioned, reversible zero-downtime upgrades for a Django host
//!
//! Every deploy builds a fresh, self-contained version directory, switches a
//! `current` symlink to it, verifies the app, and on failure falls back to
//! the version that was running before. Four pointers (`current`,
//! `previous`, `working`, `previous-working`) record the history.

pub mod application;
pub mod config;
pub mod domain;
pub mod error;
pub mod infrastructure;
pub mod logging;
pub mod presentation;

#[cfg(test)]
pub(crate) mod testing;

// Re-exports for convenience
pub use config::Config;
pub use domain::value_objects::{CommitRef, Identity, Phase, Pointer, VersionName};
pub use error::{CutoverError, CutoverResult, ErrorClass};
