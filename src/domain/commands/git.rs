//! Source control commands

use super::RemoteCommand;
use crate::domain::value_objects::CommitRef;

fn git() -> RemoteCommand {
    RemoteCommand::new("git")
}

pub fn clone(url: &str, branch: &str, dest: &str) -> RemoteCommand {
    git()
        .flag("clone")
        .flag("--branch")
        .value(branch)
        .value(url)
        .path(dest)
}

pub fn checkout(commit: &CommitRef) -> RemoteCommand {
    git().flag("checkout").value(commit.as_str())
}

pub fn delete_branch(branch: &str) -> RemoteCommand {
    git().flag("branch").flag("-D").value(branch)
}

pub fn create_branch(branch: &str) -> RemoteCommand {
    git().flag("checkout").flag("-b").value(branch)
}

pub fn set_upstream(branch: &str) -> RemoteCommand {
    git()
        .flag("branch")
        .value(format!("--set-upstream-to=origin/{}", branch))
}

/// Refreshes the index stat info so `diff-index` does not report false positives
pub fn status() -> RemoteCommand {
    git().flag("status")
}

/// Exits non-zero when the working tree differs from HEAD
pub fn diff_index_quiet() -> RemoteCommand {
    git().flag("diff-index").flag("--quiet").flag("HEAD").flag("--")
}

/// Prints commits not yet pushed upstream
pub fn unpushed_log() -> RemoteCommand {
    git().flag("log").value("@{u}..")
}
