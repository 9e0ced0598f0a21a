//! Operator-provided shell scripts (maintenance, backup, install)

use super::RemoteCommand;

pub fn run(path: &str) -> RemoteCommand {
    RemoteCommand::at_path(path)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn script_path_expands_home() {
        assert_eq!(
            run("~/scripts/start_maintenance.sh").render(),
            "~/'scripts/start_maintenance.sh'"
        );
    }
}
