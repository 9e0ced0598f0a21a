//! Typed remote commands
//!
//! Every command the engine sends to the host is built here. A command is a
//! program plus argument slots; how each slot is quoted is decided by the slot
//! kind, never by string formatting at the call site.
//!
//! - `flag` - trusted literal (`--no-input`, `-la`)
//! - `value` - always single-quoted
//! - `path` - single-quoted, except a leading `~/` which stays bare so the
//!   remote shell expands it

pub mod fs;
pub mod git;
pub mod manage;
pub mod python;
pub mod script;
pub mod service;

/// One argument slot
#[derive(Debug, Clone, PartialEq, Eq)]
enum Arg {
    Flag(String),
    Value(String),
    Path(String),
}

/// A command with typed argument slots
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RemoteCommand {
    program: String,
    program_is_path: bool,
    args: Vec<Arg>,
}

impl RemoteCommand {
    /// A command resolved through `$PATH` (`git`, `mkdir`, ...)
    pub fn new(program: impl Into<String>) -> Self {
        Self {
            program: program.into(),
            program_is_path: false,
            args: Vec::new(),
        }
    }

    /// A command given by path (`~/scripts/backup.sh`, `./manage.py`)
    pub fn at_path(program: impl Into<String>) -> Self {
        Self {
            program: program.into(),
            program_is_path: true,
            args: Vec::new(),
        }
    }

    pub fn flag(mut self, flag: impl Into<String>) -> Self {
        self.args.push(Arg::Flag(flag.into()));
        self
    }

    pub fn value(mut self, value: impl Into<String>) -> Self {
        self.args.push(Arg::Value(value.into()));
        self
    }

    pub fn path(mut self, path: impl Into<String>) -> Self {
        self.args.push(Arg::Path(path.into()));
        self
    }

    /// Program name as given
    pub fn program(&self) -> &str {
        &self.program
    }

    /// Render to a single shell command line
    pub fn render(&self) -> String {
        let mut out = if self.program_is_path {
            quote_path(&self.program)
        } else {
            self.program.clone()
        };
        for arg in &self.args {
            out.push(' ');
            match arg {
                Arg::Flag(f) => out.push_str(f),
                Arg::Value(v) => out.push_str(&shell_quote(v)),
                Arg::Path(p) => out.push_str(&quote_path(p)),
            }
        }
        out
    }
}

impl std::fmt::Display for RemoteCommand {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.render())
    }
}

/// A command together with the context it runs in
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Invocation {
    pub command: RemoteCommand,
    pub cwd: Option<String>,
    pub prefix: Option<RemoteCommand>,
}

impl Invocation {
    pub fn new(command: RemoteCommand) -> Self {
        Self {
            command,
            cwd: None,
            prefix: None,
        }
    }

    /// `cd <cwd> && <prefix> && <command>`
    pub fn render(&self) -> String {
        let mut parts = Vec::with_capacity(3);
        if let Some(cwd) = &self.cwd {
            parts.push(format!("cd {}", quote_path(cwd)));
        }
        if let Some(prefix) = &self.prefix {
            parts.push(prefix.render());
        }
        parts.push(self.command.render());
        parts.join(" && ")
    }
}

/// Quote a string for safe use in a POSIX shell
pub fn shell_quote(s: &str) -> String {
    format!("'{}'", s.replace('\'', "'\\''"))
}

/// Quote a path, leaving a leading `~` or `~/` for the remote shell to expand
pub fn quote_path(path: &str) -> String {
    if path == "~" {
        return "~".to_string();
    }
    match path.strip_prefix("~/") {
        Some("") => "~/".to_string(),
        Some(rest) => format!("~/{}", shell_quote(rest)),
        None => shell_quote(path),
    }
}

/// Join a directory and a child name the way the remote shell will see it
pub fn join(dir: &str, child: &str) -> String {
    format!("{}/{}", dir.trim_end_matches('/'), child)
}

/// Last path component, as `basename` would print it
pub fn basename(path: &str) -> &str {
    let trimmed = path.trim().trim_end_matches('/');
    trimmed.rsplit('/').next().unwrap_or(trimmed)
}
