//! Filesystem commands (coreutils)

use super::RemoteCommand;

pub fn make_dir(path: &str) -> RemoteCommand {
    RemoteCommand::new("mkdir").path(path)
}

pub fn remove_file(path: &str) -> RemoteCommand {
    RemoteCommand::new("rm").flag("-f").path(path)
}

pub fn remove_tree(path: &str) -> RemoteCommand {
    RemoteCommand::new("rm").flag("-rf").path(path)
}

/// Copy a symlink itself, not what it points to
pub fn copy_link(from: &str, to: &str) -> RemoteCommand {
    RemoteCommand::new("cp").flag("-P").path(from).path(to)
}

/// Create (or overwrite) `link` pointing at `target`
pub fn symlink(target: &str, link: &str) -> RemoteCommand {
    RemoteCommand::new("ln").flag("-sfn").path(target).path(link)
}

/// rename(2) `from` over `to`, treating `to` as a plain entry
pub fn replace(from: &str, to: &str) -> RemoteCommand {
    RemoteCommand::new("mv").flag("-T").path(from).path(to)
}

/// Fully resolved target of a path
pub fn resolve_link(path: &str) -> RemoteCommand {
    RemoteCommand::new("readlink").flag("-f").path(path)
}

pub fn is_link(path: &str) -> RemoteCommand {
    RemoteCommand::new("test").flag("-L").path(path)
}

/// One entry per line
pub fn list_dir() -> RemoteCommand {
    RemoteCommand::new("ls").flag("-1")
}

/// Size in bytes
pub fn file_size(path: &str) -> RemoteCommand {
    RemoteCommand::new("stat").flag("--printf=%s").path(path)
}

pub fn whoami() -> RemoteCommand {
    RemoteCommand::new("whoami")
}
