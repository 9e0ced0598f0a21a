//! Phase results
//!
//! Each phase returns a tagged outcome instead of raising; the orchestrator
//! reads the tag to decide between continuing, falling back and giving up.

use serde::Serialize;

use crate::domain::value_objects::{Phase, VersionName};
use crate::error::{CutoverError, CutoverResult};

/// What a phase function produced
#[derive(Debug)]
pub enum PhaseOutcome<T> {
    Completed(T),
    /// The phase failed in a way the fallback can undo
    Recoverable(CutoverError),
    /// The phase failed and nothing will be undone
    Fatal(CutoverError),
}

impl<T> PhaseOutcome<T> {
    /// Tag a phase result: only switch & validate failures are recoverable
    pub fn from_result(phase: Phase, result: CutoverResult<T>) -> Self {
        match result {
            Ok(value) => PhaseOutcome::Completed(value),
            Err(e) if phase == Phase::SwitchAndValidate => PhaseOutcome::Recoverable(e),
            Err(e) => PhaseOutcome::Fatal(e),
        }
    }
}

/// In-memory record of the deploy in flight; never persisted
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DeployAttempt {
    pub beginning: Option<VersionName>,
    pub candidate: Option<VersionName>,
    pub phase: Phase,
}

impl DeployAttempt {
    pub fn new() -> Self {
        Self {
            beginning: None,
            candidate: None,
            phase: Phase::Preflight,
        }
    }
}

impl Default for DeployAttempt {
    fn default() -> Self {
        Self::new()
    }
}

/// Result of a completed deploy
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DeployReport {
    /// Version that was current before the deploy
    pub beginning: VersionName,
    /// Version now current and marked working
    pub version: VersionName,
}
