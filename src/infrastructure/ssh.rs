//! SSH Remote Executor
//!
//! Implements the RemoteExecutor port by spawning the system `ssh` binary,
//! one process per command. Authentication, host keys and multiplexing are
//! left to the user's ssh configuration.

use std::process::{Command, Stdio};

use crate::config::Config;
use crate::domain::commands::{fs, Invocation};
use crate::domain::ports::{CommandOutput, RemoteExecutor, Shell};
use crate::domain::value_objects::Identity;
use crate::error::{CutoverError, CutoverResult};

/// ssh reserves this exit status for its own failures
const SSH_FAILURE: i32 = 255;

/// Remote executor backed by `ssh user@host <command>`
#[derive(Debug, Clone)]
pub struct SshExecutor {
    binary: String,
    options: Vec<String>,
    port: Option<u16>,
    host: String,
    admin: String,
    app: String,
}

impl SshExecutor {
    pub fn from_config(config: &Config) -> Self {
        Self {
            binary: config.ssh.binary.clone(),
            options: config.ssh.options.clone(),
            port: config.ssh.port,
            host: config.host.clone(),
            admin: config.identities.admin.clone(),
            app: config.identities.app.clone(),
        }
    }

    fn user(&self, identity: Identity) -> &str {
        match identity {
            Identity::Admin => &self.admin,
            Identity::App => &self.app,
        }
    }

    /// `user@host` for an identity
    pub fn destination(&self, identity: Identity) -> String {
        format!("{}@{}", self.user(identity), self.host)
    }

    fn command(&self, identity: Identity, invocation: &Invocation) -> Command {
        let mut cmd = Command::new(&self.binary);
        cmd.args(&self.options);
        if let Some(port) = self.port {
            cmd.arg("-p").arg(port.to_string());
        }
        cmd.arg(self.destination(identity))
            .arg(invocation.render())
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped());

        // Own process group: a Ctrl-C on the terminal must not kill a
        // command that is halfway through swapping a pointer.
        #[cfg(unix)]
        {
            use std::os::unix::process::CommandExt;
            cmd.process_group(0);
        }
        cmd
    }

    /// Check that each identity logs in as the configured user
    pub fn verify_identities(&self) -> CutoverResult<()> {
        for identity in Identity::ALL {
            let actual = Shell::new(self, identity).run(fs::whoami())?;
            let actual = actual.trim();
            if actual != self.user(identity) {
                return Err(CutoverError::IdentityMismatch {
                    identity,
                    expected: self.user(identity).to_string(),
                    actual: actual.to_string(),
                });
            }
            tracing::debug!(%identity, user = actual, "identity verified");
        }
        Ok(())
    }
}

impl RemoteExecutor for SshExecutor {
    fn execute(&self, identity: Identity, invocation: &Invocation) -> CutoverResult<CommandOutput> {
        let output = self
            .command(identity, invocation)
            .output()
            .map_err(|e| CutoverError::Transport {
                identity,
                message: format!("cannot run '{}': {}", self.binary, e),
            })?;

        let stdout = String::from_utf8_lossy(&output.stdout).into_owned();
        let stderr = String::from_utf8_lossy(&output.stderr).into_owned();

        match output.status.code() {
            Some(SSH_FAILURE) => Err(CutoverError::Transport {
                identity,
                message: non_empty(stderr.trim(), "ssh exited with status 255"),
            }),
            Some(exit_code) => {
                tracing::trace!(%identity, exit_code, "remote command finished");
                Ok(CommandOutput {
                    stdout,
                    stderr,
                    exit_code,
                })
            }
            None => Err(CutoverError::Transport {
                identity,
                message: "ssh was terminated by a signal".to_string(),
            }),
        }
    }
}

fn non_empty(text: &str, fallback: &str) -> String {
    if text.is_empty() {
        fallback.to_string()
    } else {
        text.to_string()
    }
}
