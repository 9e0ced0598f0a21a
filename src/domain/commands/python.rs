//! Python environment commands

use super::RemoteCommand;

pub fn create_venv(python: &str, dir: &str) -> RemoteCommand {
    RemoteCommand::new(python).flag("-m").flag("venv").path(dir)
}

/// Environment prefix that activates the virtualenv in `venv_dir`
pub fn activate(venv_dir: &str) -> RemoteCommand {
    RemoteCommand::new("source").path(format!("{}/bin/activate", venv_dir.trim_end_matches('/')))
}

pub fn install_requirements() -> RemoteCommand {
    RemoteCommand::new("pip")
        .flag("install")
        .flag("-r")
        .path("requirements.txt")
}
