//! Django management entrypoint commands

use super::RemoteCommand;

fn manage() -> RemoteCommand {
    RemoteCommand::at_path("./manage.py")
}

/// Runs the entrypoint with no subcommand; fails on settings/import errors
pub fn smoke_check() -> RemoteCommand {
    manage()
}

pub fn migrate() -> RemoteCommand {
    manage().flag("migrate").flag("--no-input")
}

pub fn collect_static() -> RemoteCommand {
    manage().flag("collectstatic").flag("--no-input")
}

pub fn clear_cache() -> RemoteCommand {
    manage().flag("clear_cache")
}

pub fn compress() -> RemoteCommand {
    manage().flag("compress")
}
