//! Version name value object
//!
//! A version is a directory named `<prefix>-<YYYYmmdd>-<HHMMSS>-<code6>-<config6>`.
//! The timestamp is zero padded, so lexicographic order is chronological.

use chrono::{DateTime, Utc};
use serde::Serialize;

use super::CommitRef;

/// `chrono` format of the timestamp component
pub const TIMESTAMP_FORMAT: &str = "%Y%m%d-%H%M%S";

/// Name of a version directory
///
/// Names read back from the host (pointer targets, directory listings) are
/// wrapped without validation; use [`VersionName::is_version_of`] to filter.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
#[serde(transparent)]
pub struct VersionName(String);

impl VersionName {
    pub fn new(name: impl Into<String>) -> Self {
        Self(name.into())
    }

    /// Compose a new version name. Two calls within the same second with the
    /// same commits produce the same name; that collision is not detected.
    pub fn compose(
        prefix: &str,
        created_at: DateTime<Utc>,
        code: &CommitRef,
        config: &CommitRef,
    ) -> Self {
        Self(format!(
            "{}-{}-{}-{}",
            prefix,
            created_at.format(TIMESTAMP_FORMAT),
            code.short(),
            config.short()
        ))
    }

    /// Whether the name looks like `<prefix>-<digits>-...`
    pub fn is_version_of(&self, prefix: &str) -> bool {
        let Some(rest) = self.0.strip_prefix(prefix) else {
            return false;
        };
        let Some(rest) = rest.strip_prefix('-') else {
            return false;
        };
        let date = rest.split('-').next().unwrap_or("");
        !date.is_empty() && date.chars().all(|c| c.is_ascii_digit())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for VersionName {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for VersionName {
    fn from(s: &str) -> Self {
        Self::new(s)
    }
}

impl From<String> for VersionName {
    fn from(s: String) -> Self {
        Self(s)
    }
}

impl AsRef<str> for VersionName {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl PartialEq<str> for VersionName {
    fn eq(&self, other: &str) -> bool {
        self.0 == other
    }
}

impl PartialEq<&str> for VersionName {
    fn eq(&self, other: &&str) -> bool {
        self.0 == *other
    }
}
