//! Pointer value object - the four named indirections over versions

use serde::Serialize;

/// A named symlink meaning "the version currently in role X"
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum Pointer {
    Current,
    Previous,
    Working,
    PreviousWorking,
}

impl Pointer {
    pub const ALL: [Pointer; 4] = [
        Pointer::Current,
        Pointer::Previous,
        Pointer::Working,
        Pointer::PreviousWorking,
    ];

    /// The backup slot that receives this pointer's old target on a swap.
    ///
    /// Only `Current` and `Working` are swapped directly.
    pub fn backup(&self) -> Option<Pointer> {
        match self {
            Pointer::Current => Some(Pointer::Previous),
            Pointer::Working => Some(Pointer::PreviousWorking),
            Pointer::Previous | Pointer::PreviousWorking => None,
        }
    }
}

impl std::fmt::Display for Pointer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let label = match self {
            Pointer::Current => "current",
            Pointer::Previous => "previous",
            Pointer::Working => "working",
            Pointer::PreviousWorking => "previous-working",
        };
        f.write_str(label)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn backup_slots() {
        assert_eq!(Pointer::Current.backup(), Some(Pointer::Previous));
        assert_eq!(Pointer::Working.backup(), Some(Pointer::PreviousWorking));
        assert_eq!(Pointer::Previous.backup(), None);
    }

    #[test]
    fn pointer_display() {
        assert_eq!(Pointer::PreviousWorking.to_string(), "previous-working");
    }
}
