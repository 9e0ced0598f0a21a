//! Deploy Event Port
//!
//! Provides an observable interface for deploy operations.
//! Every phase transition is announced before it runs; fallbacks report both
//! the triggering error and the outcome.

use crate::domain::value_objects::{Phase, VersionName};

/// Event emitted during deploy operations
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DeployEvent {
    /// Deploy started from this version
    Started { beginning: VersionName },

    /// A phase is about to run
    PhaseStarted { phase: Phase },

    /// The new version directory is complete
    VersionCreated { name: VersionName },

    /// The current pointer now targets the new version
    Switched { name: VersionName },

    /// An S2 step failed; restoring the beginning version
    FallbackStarted { phase: Phase, error: String },

    /// Fallback finished and the beginning version is running again
    FallbackCompleted { restored: VersionName },

    /// Deploy completed and the new version is marked working
    Completed { name: VersionName },

    /// Deploy failed without a fallback
    Failed { phase: Phase, error: String },
}

/// Trait for receiving deploy events
///
/// Implementations can be:
/// - TracingEventSink: narration through `tracing`
/// - NoopEventSink: Silent operation
pub trait DeployEventSink: Send + Sync {
    /// Handle a deploy event
    fn on_event(&self, event: DeployEvent);
}

/// No-op event sink for silent operation
pub struct NoopEventSink;

impl DeployEventSink for NoopEventSink {
    fn on_event(&self, _event: DeployEvent) {
        // Do nothing
    }
}
