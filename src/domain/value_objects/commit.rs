//! Commit reference value object
//!
//! A commit token handed to `git checkout`. Only ASCII alphanumerics are
//! accepted, so a token can never smuggle shell syntax or a git option.

use crate::error::{CutoverError, CutoverResult};

/// Number of commit characters embedded in a version name
pub const SHORT_LEN: usize = 6;

/// A validated commit identifier (hash or plain branch/tag name)
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct CommitRef(String);

impl CommitRef {
    /// Parse a token, trimming surrounding whitespace.
    pub fn parse(token: &str) -> CutoverResult<Self> {
        let trimmed = token.trim();
        if trimmed.is_empty() || !trimmed.chars().all(|c| c.is_ascii_alphanumeric()) {
            return Err(CutoverError::InvalidCommit {
                token: token.to_string(),
            });
        }
        Ok(Self(trimmed.to_string()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// First six characters, as used in version names
    pub fn short(&self) -> &str {
        // ASCII only, so byte slicing is char slicing
        &self.0[..self.0.len().min(SHORT_LEN)]
    }
}

impl std::fmt::Display for CommitRef {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

impl std::str::FromStr for CommitRef {
    type Err = CutoverError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn parse_trims_whitespace() {
        let commit = CommitRef::parse("  abcdef0123\n").unwrap();
        assert_eq!(commit.as_str(), "abcdef0123");
    }

    #[test]
    fn parse_rejects_shell_syntax() {
        for token in ["", "   ", "abc;rm", "abc def", "../x", "-b", "release/1.0"] {
            let err = CommitRef::parse(token).unwrap_err();
            assert!(matches!(err, CutoverError::InvalidCommit { .. }), "{token}");
        }
    }

    #[test]
    fn short_takes_six_characters() {
        assert_eq!(CommitRef::parse("abcdef0123").unwrap().short(), "abcdef");
        assert_eq!(CommitRef::parse("abc").unwrap().short(), "abc");
    }

    proptest! {
        #[test]
        fn alphanumeric_tokens_always_parse(token in "[a-zA-Z0-9]{1,40}") {
            let commit = CommitRef::parse(&token).unwrap();
            prop_assert_eq!(commit.as_str(), token.as_str());
            prop_assert!(commit.short().len() <= SHORT_LEN);
        }

        #[test]
        fn tokens_with_other_characters_never_parse(
            head in "[a-z0-9]{0,5}",
            bad in "[^a-zA-Z0-9 \t\n\r]",
            tail in "[a-z0-9]{0,5}",
        ) {
            let token = format!("{head}{bad}{tail}");
            prop_assert!(CommitRef::parse(&token).is_err());
        }
    }
}
