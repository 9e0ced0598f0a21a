//! Branch tip lookup for the config repository
//!
//! When a deploy names no config commit, the tip of the configured branch is
//! used. It is resolved locally with `git ls-remote` so the version name
//! records an actual commit.

use std::process::{Command, Stdio};

use crate::domain::value_objects::CommitRef;
use crate::error::{CutoverError, CutoverResult};

pub fn resolve_branch_tip(url: &str, branch: &str) -> CutoverResult<CommitRef> {
    let reference = format!("refs/heads/{branch}");
    let output = Command::new("git")
        .arg("ls-remote")
        .arg("--")
        .arg(url)
        .arg(&reference)
        .stdin(Stdio::null())
        .output()
        .map_err(|e| CutoverError::check(format!("cannot run git ls-remote: {e}")))?;

    if !output.status.success() {
        return Err(CutoverError::check(format!(
            "git ls-remote {url} failed: {}",
            String::from_utf8_lossy(&output.stderr).trim()
        )));
    }

    let stdout = String::from_utf8_lossy(&output.stdout);
    let tip = stdout
        .lines()
        .filter_map(|line| line.split_once('\t'))
        .find(|(_, name)| *name == reference)
        .map(|(hash, _)| hash);

    match tip {
        Some(hash) => {
            tracing::debug!(%url, %branch, %hash, "resolved branch tip");
            CommitRef::parse(hash)
        }
        None => Err(CutoverError::check(format!(
            "branch '{branch}' not found in {url}"
        ))),
    }
}
