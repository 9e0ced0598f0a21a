//! Deploy phases, in the order they run

use serde::Serialize;

/// Phase of a deploy attempt
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum Phase {
    /// S0: record the beginning version, check for hotfixes
    Preflight,
    /// S1: build the new version directory
    Materialize,
    /// S2: stop, switch the codebase, validate
    SwitchAndValidate,
    /// S3: migrate, start, verify, mark working
    Commit,
    /// Restoring the beginning version after an S2 failure
    Fallback,
}

impl Phase {
    /// Whether the host is still untouched while in this phase
    pub fn is_safe(&self) -> bool {
        matches!(self, Phase::Preflight | Phase::Materialize)
    }

    pub(crate) fn as_u8(self) -> u8 {
        match self {
            Phase::Preflight => 0,
            Phase::Materialize => 1,
            Phase::SwitchAndValidate => 2,
            Phase::Commit => 3,
            Phase::Fallback => 4,
        }
    }

    pub(crate) fn from_u8(value: u8) -> Self {
        match value {
            0 => Phase::Preflight,
            1 => Phase::Materialize,
            2 => Phase::SwitchAndValidate,
            3 => Phase::Commit,
            _ => Phase::Fallback,
        }
    }
}

impl std::fmt::Display for Phase {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let label = match self {
            Phase::Preflight => "pre-flight",
            Phase::Materialize => "materialize",
            Phase::SwitchAndValidate => "switch & validate",
            Phase::Commit => "commit",
            Phase::Fallback => "fallback",
        };
        f.write_str(label)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn phases_are_ordered() {
        assert!(Phase::Preflight < Phase::Materialize);
        assert!(Phase::Materialize < Phase::SwitchAndValidate);
        assert!(Phase::SwitchAndValidate < Phase::Commit);
    }

    #[test]
    fn only_first_two_phases_are_safe() {
        assert!(Phase::Preflight.is_safe());
        assert!(Phase::Materialize.is_safe());
        assert!(!Phase::SwitchAndValidate.is_safe());
        assert!(!Phase::Commit.is_safe());
    }

    #[test]
    fn u8_roundtrip() {
        for phase in [
            Phase::Preflight,
            Phase::Materialize,
            Phase::SwitchAndValidate,
            Phase::Commit,
            Phase::Fallback,
        ] {
            assert_eq!(Phase::from_u8(phase.as_u8()), phase);
        }
    }
}
