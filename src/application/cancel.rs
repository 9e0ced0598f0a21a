//! Operator interrupts
//!
//! Ctrl-C flips a shared flag. The flag is only honoured at checkpoints while
//! the host is untouched (pre-flight, materialize); once the codebase switch
//! has begun it is recorded and ignored.

use std::sync::atomic::{AtomicBool, AtomicU8, Ordering};
use std::sync::Arc;

use crate::domain::value_objects::Phase;
use crate::error::{CutoverError, CutoverResult};

/// Shared between the signal handler and the running deploy
#[derive(Debug, Clone)]
pub struct CancelToken {
    cancelled: Arc<AtomicBool>,
    phase: Arc<AtomicU8>,
}

impl Default for CancelToken {
    fn default() -> Self {
        Self::new()
    }
}

impl CancelToken {
    pub fn new() -> Self {
        Self {
            cancelled: Arc::new(AtomicBool::new(false)),
            phase: Arc::new(AtomicU8::new(Phase::Preflight.as_u8())),
        }
    }

    /// Record the phase the deploy is entering
    pub fn enter(&self, phase: Phase) {
        self.phase.store(phase.as_u8(), Ordering::SeqCst);
    }

    pub fn phase(&self) -> Phase {
        Phase::from_u8(self.phase.load(Ordering::SeqCst))
    }

    /// Request cancellation. Returns `true` when the request will be
    /// honoured at the next checkpoint.
    pub fn cancel(&self) -> bool {
        self.cancelled.store(true, Ordering::SeqCst);
        self.phase().is_safe()
    }

    pub fn is_cancelled(&self) -> bool {
        self.cancelled.load(Ordering::SeqCst)
    }

    /// Fail with `Interrupted` if cancelled while still in a safe phase
    pub fn checkpoint(&self) -> CutoverResult<()> {
        let phase = self.phase();
        if self.is_cancelled() && phase.is_safe() {
            return Err(CutoverError::Interrupted { phase });
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn checkpoint_passes_until_cancelled() {
        let token = CancelToken::new();
        token.enter(Phase::Materialize);
        token.checkpoint().unwrap();

        assert!(token.clone().cancel());
        let err = token.checkpoint().unwrap_err();
        assert!(matches!(
            err,
            CutoverError::Interrupted {
                phase: Phase::Materialize
            }
        ));
    }

    #[test]
    fn cancel_is_ignored_once_switching() {
        let token = CancelToken::new();
        token.enter(Phase::SwitchAndValidate);
        assert!(!token.cancel());
        assert!(token.is_cancelled());
        token.checkpoint().unwrap();

        token.enter(Phase::Commit);
        token.checkpoint().unwrap();
    }
}
