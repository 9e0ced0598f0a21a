//! Service control commands (systemd)

use super::RemoteCommand;

fn systemctl(action: &str, service: &str) -> RemoteCommand {
    RemoteCommand::new("sudo")
        .flag("systemctl")
        .flag(action)
        .flag("-la")
        .value(service)
}

pub fn start(service: &str) -> RemoteCommand {
    systemctl("start", service)
}

pub fn stop(service: &str) -> RemoteCommand {
    systemctl("stop", service)
}
