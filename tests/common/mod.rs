//! Shared helpers for CLI integration tests
//!
//! `FakeHost` stands in for the remote machine: a temp dir serves as the
//! remote `$HOME`, and a generated `ssh` script answers `whoami` with the
//! user of the destination and runs every other command there with `sh -c`.

#![allow(dead_code)]

use std::os::unix::fs::PermissionsExt;
use std::path::{Path, PathBuf};
use std::process::{Command, Output};

use tempfile::TempDir;

pub struct FakeHost {
    pub dir: TempDir,
}

impl FakeHost {
    pub fn new() -> Self {
        let host = Self {
            dir: TempDir::new().unwrap(),
        };
        std::fs::create_dir_all(host.home()).unwrap();
        let script = format!(
            "#!/bin/sh\n\
             for a in \"$@\"; do dest=\"$cmd\"; cmd=\"$a\"; done\n\
             echo \"$cmd\" >> '{log}'\n\
             if [ \"$cmd\" = whoami ]; then echo \"${{dest%@*}}\"; exit 0; fi\n\
             cd '{home}' && HOME='{home}' exec sh -c \"$cmd\"\n",
            log = host.path("ssh.log").display(),
            home = host.home().display(),
        );
        host.write_executable("ssh", &script);
        host
    }

    pub fn path(&self, relative: &str) -> PathBuf {
        self.dir.path().join(relative)
    }

    /// Remote `$HOME`
    pub fn home(&self) -> PathBuf {
        self.path("home")
    }

    pub fn write_executable(&self, name: &str, body: &str) -> PathBuf {
        let path = self.path(name);
        std::fs::write(&path, body).unwrap();
        std::fs::set_permissions(&path, std::fs::Permissions::from_mode(0o755)).unwrap();
        path
    }

    pub fn make_version(&self, name: &str) {
        std::fs::create_dir_all(self.home().join(name)).unwrap();
    }

    pub fn point(&self, pointer: &str, name: &str) {
        std::os::unix::fs::symlink(self.home().join(name), self.home().join(pointer)).unwrap();
    }

    pub fn has_entry(&self, name: &str) -> bool {
        self.home().join(name).exists()
    }

    /// Commands the fake ssh received
    pub fn ssh_log(&self) -> String {
        std::fs::read_to_string(self.path("ssh.log")).unwrap_or_default()
    }

    /// Write a complete config pointing at this host, plus `extra` TOML
    pub fn write_config(&self, extra: &str) -> PathBuf {
        let config = format!(
            "host = \"web1.example.com\"\n\
             \n\
             [ssh]\n\
             binary = \"{ssh}\"\n\
             \n\
             [repositories.code]\n\
             url = \"{code}\"\n\
             \n\
             [repositories.config]\n\
             url = \"{config}\"\n\
             \n\
             [health]\n\
             url = \"http://127.0.0.1:9/\"\n\
             timeout_secs = 0\n\
             \n\
             [lock]\n\
             path = \"{lock}\"\n\
             wait = false\n\
             {extra}\n",
            ssh = self.path("ssh").display(),
            lock = self.lock_path().display(),
            code = self.path("code.git").display(),
            config = self.path("config.git").display(),
        );
        let path = self.path("cutover.toml");
        std::fs::write(&path, config).unwrap();
        path
    }

    pub fn lock_path(&self) -> PathBuf {
        self.path("cutover.lock")
    }
}

/// A command for `binary` isolated from the caller's environment
pub fn command(binary: &str, cwd: &Path) -> Command {
    let mut cmd = Command::new(binary);
    cmd.current_dir(cwd)
        .env_remove("CUTOVER_CONFIG")
        .env_remove("CUTOVER_HOST")
        .env_remove("CUTOVER_HEALTH_URL")
        .env_remove("CUTOVER_LOCK_PATH")
        .env_remove("SSH_ORIGINAL_COMMAND")
        .env_remove("RUST_LOG")
        .env("XDG_CONFIG_HOME", cwd.join("xdg"));
    cmd
}

pub fn cutover(cwd: &Path, args: &[&str]) -> Output {
    command(env!("CARGO_BIN_EXE_cutover"), cwd)
        .args(args)
        .output()
        .unwrap()
}

pub fn stdout(output: &Output) -> String {
    String::from_utf8_lossy(&output.stdout).into_owned()
}

pub fn stderr(output: &Output) -> String {
    String::from_utf8_lossy(&output.stderr).into_owned()
}
