//! Test doubles shared by unit tests
//!
//! `LocalHost` plays the remote host inside a temp dir: filesystem commands
//! (`mkdir`, `rm`, `ln`, `readlink`, ...) really run through `sh -c`, so
//! pointer swaps happen on real symlinks; everything else (git, pip,
//! systemctl, scripts) is recorded and answered from scripted rules.
//! The most recently added matching rule wins.

use std::cell::{Cell, RefCell};
use std::collections::VecDeque;
use std::process::Command;
use std::sync::{Arc, Mutex};
use std::time::Duration;

use chrono::{DateTime, TimeZone, Utc};
use tempfile::TempDir;

use crate::config::Config;
use crate::domain::commands::Invocation;
use crate::domain::ports::{
    AppProbe, Clock, CommandOutput, DeployEvent, DeployEventSink, RemoteExecutor,
};
use crate::domain::value_objects::{Identity, VersionName};
use crate::error::CutoverResult;

const PASSTHROUGH: &[&str] = &["mkdir", "rm", "cp", "ln", "mv", "readlink", "test", "ls", "stat"];

type Matcher = Box<dyn Fn(&str) -> bool>;

struct Rule {
    matcher: Matcher,
    output: CommandOutput,
}

pub struct LocalHost {
    pub dir: TempDir,
    rules: RefCell<Vec<Rule>>,
    log: RefCell<Vec<(Identity, String)>>,
}

impl LocalHost {
    pub fn new() -> Self {
        Self {
            dir: tempfile::tempdir().unwrap(),
            rules: RefCell::new(Vec::new()),
            log: RefCell::new(Vec::new()),
        }
    }

    /// Absolute path inside the fake host
    pub fn path(&self, relative: &str) -> String {
        self.dir.path().join(relative).to_string_lossy().into_owned()
    }

    /// Answer commands matching `matcher` with `output`
    pub fn respond_when(&self, matcher: impl Fn(&str) -> bool + 'static, output: CommandOutput) {
        self.rules.borrow_mut().push(Rule {
            matcher: Box::new(matcher),
            output,
        });
    }

    pub fn respond(&self, needle: &str, stdout: &str) {
        let needle = needle.to_string();
        self.respond_when(move |c| c.contains(&needle), CommandOutput::success(stdout));
    }

    pub fn fail_when(&self, matcher: impl Fn(&str) -> bool + 'static) {
        self.respond_when(matcher, CommandOutput::failure(1, "injected failure"));
    }

    pub fn fail_on(&self, needle: &str) {
        let needle = needle.to_string();
        self.fail_when(move |c| c.contains(&needle));
    }

    pub fn commands(&self) -> Vec<String> {
        self.log.borrow().iter().map(|(_, c)| c.clone()).collect()
    }

    pub fn identity_of(&self, needle: &str) -> Option<Identity> {
        self.log
            .borrow()
            .iter()
            .find(|(_, c)| c.contains(needle))
            .map(|(i, _)| *i)
    }

    pub fn count(&self, needle: &str) -> usize {
        self.log.borrow().iter().filter(|(_, c)| c.contains(needle)).count()
    }

    pub fn ran(&self, needle: &str) -> bool {
        self.count(needle) > 0
    }

    /// Index of the first command containing `needle`
    pub fn position(&self, needle: &str) -> Option<usize> {
        self.log.borrow().iter().position(|(_, c)| c.contains(needle))
    }

    pub fn make_version(&self, name: &str) {
        std::fs::create_dir_all(self.dir.path().join(name)).unwrap();
    }

    pub fn has_entry(&self, name: &str) -> bool {
        self.dir.path().join(name).symlink_metadata().is_ok()
    }

    /// Point `pointer` (relative link name) at version `name`
    #[cfg(unix)]
    pub fn point(&self, pointer: &str, name: &str) {
        let link = self.dir.path().join(pointer);
        let _ = std::fs::remove_file(&link);
        std::os::unix::fs::symlink(self.dir.path().join(name), link).unwrap();
    }

    /// Version a pointer targets, read straight from the filesystem
    pub fn target_of(&self, pointer: &str) -> Option<String> {
        let target = std::fs::read_link(self.dir.path().join(pointer)).ok()?;
        target.file_name().map(|n| n.to_string_lossy().into_owned())
    }

    /// A config whose paths all live inside this host's temp dir
    pub fn config(&self) -> Config {
        let mut config = Config::for_host("test-host");
        config.layout.version_root = self.path("");
        config.layout.deployment_dir = self.path("deployment");
        config.layout.current_venv = self.path("venv");
        config.layout.current_code = self.path("django");
        config.layout.current_config = self.path("django-current/config");
        config.pointers.current = self.path("django-current");
        config.pointers.previous = self.path("django-previous");
        config.pointers.working = self.path("django-working");
        config.pointers.previous_working = self.path("django-previous-working");
        config.repositories.code.url = "git@example.com:app/code.git".to_string();
        config.repositories.config.url = "git@example.com:app/config.git".to_string();
        config.health.url = "http://test-host/".to_string();
        config
    }
}

impl RemoteExecutor for LocalHost {
    fn execute(&self, identity: Identity, invocation: &Invocation) -> CutoverResult<CommandOutput> {
        let rendered = invocation.render();
        self.log.borrow_mut().push((identity, rendered.clone()));

        let rules = self.rules.borrow();
        if let Some(rule) = rules.iter().rev().find(|r| (r.matcher)(&rendered)) {
            return Ok(rule.output.clone());
        }
        drop(rules);

        if PASSTHROUGH.contains(&invocation.command.program()) {
            let output = Command::new("sh")
                .arg("-c")
                .arg(&rendered)
                .current_dir(self.dir.path())
                .output()
                .unwrap();
            return Ok(CommandOutput {
                stdout: String::from_utf8_lossy(&output.stdout).into_owned(),
                stderr: String::from_utf8_lossy(&output.stderr).into_owned(),
                exit_code: output.status.code().unwrap_or(-1),
            });
        }

        Ok(CommandOutput::success(""))
    }
}

/// Clock starting at 2024-01-01 12:00:00 UTC; only sleeps and `advance`
/// move it. Sleeps are recorded.
pub struct FakeClock {
    now: Cell<DateTime<Utc>>,
    pub slept: RefCell<Vec<Duration>>,
}

impl FakeClock {
    pub fn new() -> Self {
        Self {
            now: Cell::new(Utc.with_ymd_and_hms(2024, 1, 1, 12, 0, 0).unwrap()),
            slept: RefCell::new(Vec::new()),
        }
    }

    /// Let time pass without a recorded sleep
    pub fn advance(&self, duration: Duration) {
        let step = chrono::Duration::from_std(duration).unwrap();
        self.now.set(self.now.get() + step);
    }
}

impl Clock for FakeClock {
    fn now(&self) -> DateTime<Utc> {
        self.now.get()
    }

    fn sleep(&self, duration: Duration) {
        self.slept.borrow_mut().push(duration);
        self.advance(duration);
    }
}

/// Probe answering from a script; repeats the last answer when exhausted
pub struct ScriptedProbe {
    answers: RefCell<VecDeque<bool>>,
    last: Cell<bool>,
    pub calls: Cell<usize>,
}

impl ScriptedProbe {
    pub fn up() -> Self {
        Self::script(&[true])
    }

    pub fn down() -> Self {
        Self::script(&[false])
    }

    pub fn script(answers: &[bool]) -> Self {
        Self {
            answers: RefCell::new(answers.iter().copied().collect()),
            last: Cell::new(answers.last().copied().unwrap_or(false)),
            calls: Cell::new(0),
        }
    }
}

impl AppProbe for ScriptedProbe {
    fn responds(&self, _within: Duration) -> bool {
        self.calls.set(self.calls.get() + 1);
        match self.answers.borrow_mut().pop_front() {
            Some(answer) => {
                self.last.set(answer);
                answer
            }
            None => self.last.get(),
        }
    }

    fn target(&self) -> String {
        "http://test-host/".to_string()
    }
}

/// Sink that keeps every event
#[derive(Default, Clone)]
pub struct RecordingSink {
    pub events: Arc<Mutex<Vec<DeployEvent>>>,
}

impl RecordingSink {
    pub fn events(&self) -> Vec<DeployEvent> {
        self.events.lock().unwrap().clone()
    }
}

impl DeployEventSink for RecordingSink {
    fn on_event(&self, event: DeployEvent) {
        self.events.lock().unwrap().push(event);
    }
}

pub fn version(name: &str) -> VersionName {
    VersionName::from(name)
}
