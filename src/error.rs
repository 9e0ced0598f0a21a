//! Error types for Cutover
//!
//! Uses `thiserror` for library errors. Every error knows its class, which is
//! what the binaries turn into a process exit code.

use std::path::PathBuf;
use thiserror::Error;

use crate::domain::value_objects::{Identity, Phase};

/// Result type alias for Cutover operations
pub type CutoverResult<T> = Result<T, CutoverError>;

/// Coarse classification of a failure.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorClass {
    /// The environment failed: a remote command exited non-zero or a check on
    /// remote state did not hold.
    External,
    /// The engine itself misbehaved.
    Internal,
    /// Rejected before any remote interaction.
    InvalidInput,
    /// A deploy failed before the running app was stopped or switched.
    /// Carries the class of the original failure.
    Untouched(Cause),
    /// Something failed, and the automatic fallback restored the host.
    /// Carries the class of the original failure.
    Recovered(Cause),
}

/// Class of the error wrapped by an untouched or recovered failure.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Cause {
    External,
    Internal,
}

/// Main error type for Cutover operations
#[derive(Error, Debug)]
pub enum CutoverError {
    /// A remote command exited with a non-zero status
    #[error("remote command failed as '{identity}' (exit {exit_code}): {command}{}", stderr_suffix(.stderr))]
    Remote {
        identity: Identity,
        command: String,
        exit_code: i32,
        stderr: String,
    },

    /// The transport itself failed (ssh could not be spawned, pipe broke, ...)
    #[error("could not reach host as '{identity}': {message}")]
    Transport { identity: Identity, message: String },

    /// A check on remote state did not hold
    #[error("{message}")]
    Check { message: String },

    /// `whoami` did not echo the configured user
    #[error("connected as '{actual}' but expected '{expected}' for the {identity} identity")]
    IdentityMismatch {
        identity: Identity,
        expected: String,
        actual: String,
    },

    /// Commit token is empty or not alphanumeric
    #[error("invalid commit '{token}': commits must be non-empty and alphanumeric")]
    InvalidCommit { token: String },

    /// Version name is not an existing version directory
    #[error("version '{name}' not found; a version name is a version directory such as django-20190505-180000-abcdef-fedcba, never a pointer")]
    VersionNotFound { name: String },

    /// Version is referenced by one of the pointers
    #[error("refusing to delete protected version '{name}'")]
    ProtectedVersion { name: String },

    /// Configuration could not be loaded or is incomplete
    #[error("configuration error in {}: {message}", .file.display())]
    Config { file: PathBuf, message: String },

    /// Another deploy holds the lock and the lock policy is fail-fast
    #[error("another deploy is in progress (lock held on {})", .path.display())]
    LockBusy { path: PathBuf },

    /// Lock file could not be created or locked
    #[error("cannot lock {}: {source}", .path.display())]
    Lock {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Operator interrupted the run before any pointer was touched
    #[error("interrupted during {phase}; no pointer was changed")]
    Interrupted { phase: Phase },

    /// An internal invariant did not hold
    #[error("internal error: {message}")]
    Internal { message: String },

    /// A deploy failed in a phase that leaves the running app alone
    #[error("{phase} failed, the running app was not touched: {source}")]
    Untouched {
        phase: Phase,
        #[source]
        source: Box<CutoverError>,
    },

    /// An operation failed but the fallback restored the beginning version
    #[error("fallback executed successfully, '{restored}' is running again; original error: {source}")]
    FallbackRecovered {
        restored: String,
        #[source]
        source: Box<CutoverError>,
    },
}

fn stderr_suffix(stderr: &str) -> String {
    let trimmed = stderr.trim();
    if trimmed.is_empty() {
        String::new()
    } else {
        format!(": {}", trimmed)
    }
}

impl CutoverError {
    /// Shorthand for [`CutoverError::Check`]
    pub fn check(message: impl Into<String>) -> Self {
        Self::Check {
            message: message.into(),
        }
    }

    /// Shorthand for [`CutoverError::Internal`]
    pub fn internal(message: impl Into<String>) -> Self {
        Self::Internal {
            message: message.into(),
        }
    }

    /// Mark a deploy failure in `phase` as having left the host untouched.
    /// Interrupts and invalid input keep their own identity.
    pub fn untouched(phase: Phase, error: CutoverError) -> Self {
        match error.class() {
            ErrorClass::InvalidInput => error,
            _ if matches!(error, CutoverError::Interrupted { .. }) => error,
            _ => CutoverError::Untouched {
                phase,
                source: Box::new(error),
            },
        }
    }

    pub fn class(&self) -> ErrorClass {
        match self {
            CutoverError::Remote { .. }
            | CutoverError::Transport { .. }
            | CutoverError::Check { .. }
            | CutoverError::IdentityMismatch { .. }
            | CutoverError::LockBusy { .. }
            | CutoverError::Lock { .. }
            | CutoverError::Interrupted { .. } => ErrorClass::External,
            CutoverError::InvalidCommit { .. }
            | CutoverError::VersionNotFound { .. }
            | CutoverError::ProtectedVersion { .. }
            | CutoverError::Config { .. } => ErrorClass::InvalidInput,
            CutoverError::Internal { .. } => ErrorClass::Internal,
            CutoverError::Untouched { source, .. } => ErrorClass::Untouched(source.cause()),
            CutoverError::FallbackRecovered { source, .. } => ErrorClass::Recovered(source.cause()),
        }
    }

    fn cause(&self) -> Cause {
        match self.class() {
            ErrorClass::Internal | ErrorClass::Recovered(Cause::Internal) => Cause::Internal,
            _ => Cause::External,
        }
    }

    /// Whether the fallback restored the host after this error
    pub fn is_recovered(&self) -> bool {
        matches!(self, CutoverError::FallbackRecovered { .. })
    }
}
