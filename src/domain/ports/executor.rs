//! Remote executor port - runs commands on the target host
//!
//! The executor itself is stateless: the working directory and environment
//! prefix travel with each [`Invocation`]. [`Shell`] is the scoped view the
//! rest of the engine uses; `cd`/`prefix` return a new handle, so leaving a
//! scope restores the previous context without any cleanup code.

use crate::domain::commands::{Invocation, RemoteCommand};
use crate::domain::value_objects::Identity;
use crate::error::{CutoverError, CutoverResult};

/// Captured result of one remote command
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommandOutput {
    pub stdout: String,
    pub stderr: String,
    pub exit_code: i32,
}

impl CommandOutput {
    pub fn success(stdout: impl Into<String>) -> Self {
        Self {
            stdout: stdout.into(),
            stderr: String::new(),
            exit_code: 0,
        }
    }

    pub fn failure(exit_code: i32, stderr: impl Into<String>) -> Self {
        Self {
            stdout: String::new(),
            stderr: stderr.into(),
            exit_code,
        }
    }

    pub fn is_success(&self) -> bool {
        self.exit_code == 0
    }
}

/// Runs one command as one identity
///
/// Implementations:
/// - `SshExecutor` - spawns `ssh user@host`
/// - test executors - run filesystem commands in a temp dir, script the rest
pub trait RemoteExecutor {
    /// Run the invocation. A non-zero exit is reported in the output, not as
    /// an error; `Err` means the command could not be run at all.
    fn execute(&self, identity: Identity, invocation: &Invocation) -> CutoverResult<CommandOutput>;
}

impl<E: RemoteExecutor + ?Sized> RemoteExecutor for &E {
    fn execute(&self, identity: Identity, invocation: &Invocation) -> CutoverResult<CommandOutput> {
        (**self).execute(identity, invocation)
    }
}

/// Scoped handle: executor + identity + working directory + env prefix
#[derive(Clone)]
pub struct Shell<'a> {
    executor: &'a dyn RemoteExecutor,
    identity: Identity,
    cwd: Option<String>,
    prefix: Option<RemoteCommand>,
}

impl<'a> Shell<'a> {
    pub fn new(executor: &'a dyn RemoteExecutor, identity: Identity) -> Self {
        Self {
            executor,
            identity,
            cwd: None,
            prefix: None,
        }
    }

    /// Same shell, running inside `dir`
    pub fn cd(&self, dir: impl Into<String>) -> Shell<'a> {
        Shell {
            cwd: Some(dir.into()),
            ..self.clone()
        }
    }

    /// Same shell, with `activation` run before every command
    pub fn prefix(&self, activation: RemoteCommand) -> Shell<'a> {
        Shell {
            prefix: Some(activation),
            ..self.clone()
        }
    }

    fn invocation(&self, command: RemoteCommand) -> Invocation {
        Invocation {
            command,
            cwd: self.cwd.clone(),
            prefix: self.prefix.clone(),
        }
    }

    /// Run and return raw output whatever the exit status
    pub fn probe(&self, command: RemoteCommand) -> CutoverResult<CommandOutput> {
        let invocation = self.invocation(command);
        tracing::debug!(identity = %self.identity, command = %invocation.render(), "remote");
        self.executor.execute(self.identity, &invocation)
    }

    /// Run, failing on a non-zero exit; returns stdout
    pub fn run(&self, command: RemoteCommand) -> CutoverResult<String> {
        let rendered = command.render();
        let output = self.probe(command)?;
        if !output.is_success() {
            return Err(CutoverError::Remote {
                identity: self.identity,
                command: rendered,
                exit_code: output.exit_code,
                stderr: output.stderr,
            });
        }
        Ok(output.stdout)
    }
}
