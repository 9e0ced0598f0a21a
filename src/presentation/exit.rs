//! Process exit codes
//!
//! Automation calling `cutover` tells outcomes apart by exit code alone:
//! "nothing happened", "happened then rolled back", "external tool failed"
//! and "internal defect" each get their own code. A deploy that fails before
//! the switch is "nothing happened".

use std::process::ExitStatus;

use crate::application::GateError;
use crate::error::{CutoverError, ErrorClass, Cause};

pub const SUCCESS: i32 = 0;
/// Fallback restored the beginning version after an external failure
pub const FALLBACK_AFTER_EXTERNAL: i32 = 1;
/// Rejected before any remote interaction (also configuration errors)
pub const INVALID_INPUT: i32 = 2;
/// Deploy failed before the switch after an external failure; app untouched
pub const UNTOUCHED_AFTER_EXTERNAL: i32 = 3;
/// Another deploy holds the lock
pub const LOCK_BUSY: i32 = 75;
/// Fallback restored the beginning version after an internal failure
pub const FALLBACK_AFTER_INTERNAL: i32 = 99;
/// Deploy failed before the switch after an internal failure; app untouched
pub const UNTOUCHED_AFTER_INTERNAL: i32 = 98;
pub const EXTERNAL: i32 = 101;
pub const INTERRUPTED: i32 = 130;
pub const INTERNAL: i32 = 199;

pub const GATE_WRONG_TOKEN_COUNT: i32 = 64;
pub const GATE_INVALID_TOKEN: i32 = 65;
/// The wrapped deploy was terminated by a signal
pub const GATE_SIGNALLED: i32 = 97;

pub fn code_for(err: &CutoverError) -> i32 {
    match err {
        CutoverError::LockBusy { .. } => LOCK_BUSY,
        CutoverError::Interrupted { .. } => INTERRUPTED,
        other => match other.class() {
            ErrorClass::External => EXTERNAL,
            ErrorClass::Internal => INTERNAL,
            ErrorClass::InvalidInput => INVALID_INPUT,
            ErrorClass::Untouched(Cause::External) => UNTOUCHED_AFTER_EXTERNAL,
            ErrorClass::Untouched(Cause::Internal) => UNTOUCHED_AFTER_INTERNAL,
            ErrorClass::Recovered(Cause::External) => FALLBACK_AFTER_EXTERNAL,
            ErrorClass::Recovered(Cause::Internal) => FALLBACK_AFTER_INTERNAL,
        },
    }
}

/// Exit code for an error surfacing in a binary; anything that is not a
/// `CutoverError` is a defect of ours.
pub fn code_for_anyhow(err: &anyhow::Error) -> i32 {
    err.chain()
        .find_map(|cause| cause.downcast_ref::<CutoverError>())
        .map(code_for)
        .unwrap_or(INTERNAL)
}

pub fn code_for_gate(err: &GateError) -> i32 {
    match err {
        GateError::WrongTokenCount { .. } => GATE_WRONG_TOKEN_COUNT,
        GateError::InvalidToken { .. } => GATE_INVALID_TOKEN,
    }
}

/// Relay a child's exit status; death by signal gets its own code
pub fn relay(status: ExitStatus) -> i32 {
    status.code().unwrap_or(GATE_SIGNALLED)
}

/// Short description of an exit code for summary lines
pub fn describe(code: i32) -> &'static str {
    match code {
        SUCCESS => "success",
        FALLBACK_AFTER_EXTERNAL | FALLBACK_AFTER_INTERNAL => "fallback completed",
        INVALID_INPUT => "invalid input",
        UNTOUCHED_AFTER_EXTERNAL | UNTOUCHED_AFTER_INTERNAL => "failed before the switch",
        LOCK_BUSY => "lock busy",
        EXTERNAL => "external error",
        INTERRUPTED => "interrupted",
        INTERNAL => "internal error",
        _ => "failed",
    }
}
