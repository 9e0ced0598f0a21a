//! Front door request parsing
//!
//! The gate accepts one or two whitespace-separated tokens: a code commit
//! and optionally a config commit. Anything else is rejected before the
//! host is contacted.

use thiserror::Error;

use crate::domain::value_objects::CommitRef;

/// Why a gate request was rejected
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum GateError {
    #[error("expected <code-commit> [<config-commit>], got {count} argument(s)")]
    WrongTokenCount { count: usize },

    #[error("invalid {role} commit '{token}': commits must be alphanumeric")]
    InvalidToken { role: &'static str, token: String },
}

/// A validated gate request
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GateRequest {
    pub code: CommitRef,
    /// `None` means "tip of the config repository's branch"
    pub config: Option<CommitRef>,
}

impl GateRequest {
    /// Parse argv tokens; when there are none, fall back to the tokens of
    /// the forced-command channel (`SSH_ORIGINAL_COMMAND`).
    pub fn from_args(args: &[String], original_command: Option<&str>) -> Result<Self, GateError> {
        if !args.is_empty() {
            return Self::parse(args.iter().map(String::as_str));
        }
        Self::parse(original_command.unwrap_or_default().split_whitespace())
    }

    pub fn parse<'t>(tokens: impl IntoIterator<Item = &'t str>) -> Result<Self, GateError> {
        let tokens: Vec<&str> = tokens
            .into_iter()
            .flat_map(str::split_whitespace)
            .collect();

        match tokens.as_slice() {
            [code] => Ok(Self {
                code: commit("code", code)?,
                config: None,
            }),
            [code, config] => Ok(Self {
                code: commit("code", code)?,
                config: Some(commit("config", config)?),
            }),
            other => Err(GateError::WrongTokenCount { count: other.len() }),
        }
    }
}

fn commit(role: &'static str, token: &str) -> Result<CommitRef, GateError> {
    CommitRef::parse(token).map_err(|_| GateError::InvalidToken {
        role,
        token: token.to_string(),
    })
}
