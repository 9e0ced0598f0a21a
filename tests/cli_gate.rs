//! Front door: token validation, lock, exit code relay

mod common;

use std::process::{Child, Output, Stdio};
use std::thread;
use std::time::{Duration, Instant};

use common::{command, stderr, FakeHost};
use cutover::infrastructure::DeployLock;
use cutover::CutoverError;

fn gate(host: &FakeHost, args: &[&str], envs: &[(&str, &str)]) -> Output {
    let mut cmd = command(env!("CARGO_BIN_EXE_cutover-gate"), host.dir.path());
    cmd.args(args);
    for (key, value) in envs {
        cmd.env(key, value);
    }
    cmd.output().unwrap()
}

/// Config whose `cutover` is a script recording its argv, then running `tail`
fn with_fake_cutover(host: &FakeHost, tail: &str) -> String {
    let args = host.path("child.args");
    let script = format!(
        "#!/bin/sh\nprintf '%s\\n' \"$@\" > '{}'\n{}\n",
        args.display(),
        tail
    );
    let child = host.write_executable("fake-cutover", &script);
    let config = host.write_config(&format!("[gate]\ncutover_bin = \"{}\"\n", child.display()));
    config.to_string_lossy().into_owned()
}

/// Config whose `cutover` is the real binary, talking to a slow fake ssh
fn with_real_cutover(host: &FakeHost, ssh_delay_secs: u32) -> String {
    std::fs::rename(host.path("ssh"), host.path("ssh-inner")).unwrap();
    host.write_executable(
        "ssh",
        &format!(
            "#!/bin/sh\ntouch '{}'\nsleep {ssh_delay_secs}\nexec '{}' \"$@\"\n",
            host.path("connected").display(),
            host.path("ssh-inner").display()
        ),
    );
    let config = host.write_config(&format!(
        "[gate]\ncutover_bin = \"{}\"\n",
        env!("CARGO_BIN_EXE_cutover")
    ));
    config.to_string_lossy().into_owned()
}

fn lock_is_busy(host: &FakeHost) -> bool {
    matches!(
        DeployLock::new(host.lock_path(), false).acquire(),
        Err(CutoverError::LockBusy { .. })
    )
}

fn spawn_gate(host: &FakeHost, config: &str) -> Child {
    command(env!("CARGO_BIN_EXE_cutover-gate"), host.dir.path())
        .env("CUTOVER_CONFIG", config)
        .env("SSH_ORIGINAL_COMMAND", "abc123 def456")
        .stdout(Stdio::null())
        .stderr(Stdio::null())
        .spawn()
        .unwrap()
}

fn child_args(host: &FakeHost) -> Option<String> {
    std::fs::read_to_string(host.path("child.args")).ok()
}

#[test]
fn test_no_tokens_exits_64() {
    let host = FakeHost::new();
    let output = gate(&host, &[], &[]);
    assert_eq!(output.status.code(), Some(64));
    assert!(stderr(&output).contains("usage: cutover-gate"));
}

#[test]
fn test_too_many_tokens_exits_64() {
    let host = FakeHost::new();
    let output = gate(&host, &[], &[("SSH_ORIGINAL_COMMAND", "abc def ghi")]);
    assert_eq!(output.status.code(), Some(64));
}

#[test]
fn test_non_alphanumeric_token_exits_65() {
    let host = FakeHost::new();
    let output = gate(&host, &[], &[("SSH_ORIGINAL_COMMAND", "abc $(reboot)")]);
    assert_eq!(output.status.code(), Some(65));
    assert!(stderr(&output).contains("must be alphanumeric"));
}

#[test]
fn test_missing_config_exits_2() {
    let host = FakeHost::new();
    let missing = host.path("missing.toml");
    let output = gate(
        &host,
        &["abc", "def"],
        &[("CUTOVER_CONFIG", missing.to_str().unwrap())],
    );
    assert_eq!(output.status.code(), Some(2));
}

#[test]
fn test_relays_child_exit_code_and_arguments() {
    let host = FakeHost::new();
    let config = with_fake_cutover(&host, "exit 7");

    let output = gate(&host, &[], &[("CUTOVER_CONFIG", &config), ("SSH_ORIGINAL_COMMAND", "abc123 def456")]);

    assert_eq!(output.status.code(), Some(7), "{}", stderr(&output));
    assert_eq!(
        child_args(&host).unwrap(),
        format!("--config\n{config}\ndeploy\nabc123\ndef456\n")
    );
}

#[test]
fn test_child_killed_by_signal_exits_97() {
    let host = FakeHost::new();
    let config = with_fake_cutover(&host, "kill -9 $$");

    let output = gate(&host, &["abc", "def"], &[("CUTOVER_CONFIG", &config)]);

    assert_eq!(output.status.code(), Some(97));
}

#[test]
fn test_busy_lock_is_relayed_as_75() {
    let host = FakeHost::new();
    let config = with_real_cutover(&host, 0);
    let _held = DeployLock::new(host.lock_path(), false).acquire().unwrap();

    let output = gate(&host, &["abc", "def"], &[("CUTOVER_CONFIG", &config)]);

    assert_eq!(output.status.code(), Some(75), "{}", stderr(&output));
    assert_eq!(host.ssh_log(), "");
}

#[test]
fn test_lock_outlives_a_killed_gate() {
    let host = FakeHost::new();
    let config = with_real_cutover(&host, 2);
    let mut gate = spawn_gate(&host, &config);

    // The deploy connects only after taking the lock
    let started = Instant::now();
    while !host.path("connected").exists() {
        assert!(started.elapsed() < Duration::from_secs(10), "deploy never connected");
        thread::sleep(Duration::from_millis(20));
    }
    assert!(lock_is_busy(&host));

    gate.kill().unwrap();
    gate.wait().unwrap();

    // The deploy is still talking to the host; nobody else may start one
    assert!(lock_is_busy(&host), "lock released while the deploy was still running");
}
