//! Cutover gate - constrained front door for deploys
//!
//! Meant as an SSH forced command: the client may only send
//! `<code-commit> [<config-commit>]`. The gate validates the tokens, runs
//! exactly one `cutover deploy` and relays its exit code.
//!
//! The deploy takes the lock itself, so the lock lives exactly as long as
//! the process doing the work. The gate survives SIGINT, SIGTERM and SIGHUP
//! and keeps waiting; if it is killed anyway the deploy keeps the lock.

use std::path::{Path, PathBuf};
use std::process::Command;

use anyhow::{Context, Result};

use cutover::application::GateRequest;
use cutover::infrastructure::resolve_branch_tip;
use cutover::presentation::exit;
use cutover::{logging, CommitRef, Config};

fn main() {
    logging::init(0);
    std::process::exit(run());
}

fn run() -> i32 {
    let args: Vec<String> = std::env::args().skip(1).collect();
    let original = std::env::var("SSH_ORIGINAL_COMMAND").ok();

    let request = match GateRequest::from_args(&args, original.as_deref()) {
        Ok(request) => request,
        Err(e) => {
            eprintln!("cutover-gate: {e}");
            eprintln!("usage: cutover-gate <code-commit> [<config-commit>]");
            return exit::code_for_gate(&e);
        }
    };

    match deploy(request) {
        Ok(code) => code,
        Err(e) => {
            let code = exit::code_for_anyhow(&e);
            eprintln!("cutover-gate: {e:#}");
            code
        }
    }
}

fn deploy(request: GateRequest) -> Result<i32> {
    let explicit = std::env::var_os("CUTOVER_CONFIG").map(PathBuf::from);
    let (config, config_path, warnings) = Config::discover(explicit.as_deref())?;
    for warning in &warnings {
        tracing::warn!("{}", warning);
    }

    let config_commit = match request.config {
        Some(commit) => commit,
        None => {
            let repository = &config.repositories.config;
            let tip = resolve_branch_tip(&repository.url, &repository.branch)?;
            tracing::info!(branch = %repository.branch, commit = %tip, "using tip of the config branch");
            tip
        }
    };

    // The terminal's Ctrl-C reaches the child too; the gate stays to relay
    ctrlc::set_handler(|| tracing::warn!("signal received; waiting for the running deploy"))
        .context("cannot install the signal handler")?;

    let binary = cutover_binary(&config)?;
    tracing::info!(code = %request.code, config = %config_commit, "starting deploy");
    let status = deploy_command(&binary, &config_path, &request.code, &config_commit)
        .status()
        .map_err(|e| cutover::CutoverError::check(format!("cannot run {}: {e}", binary.display())))?;

    Ok(exit::relay(status))
}

fn cutover_binary(config: &Config) -> Result<PathBuf> {
    if let Some(binary) = &config.gate.cutover_bin {
        return Ok(binary.clone());
    }
    let gate = std::env::current_exe().context("cannot locate the gate executable")?;
    let dir = gate
        .parent()
        .context("gate executable has no parent directory")?;
    Ok(dir.join(format!("cutover{}", std::env::consts::EXE_SUFFIX)))
}

fn deploy_command(binary: &Path, config_path: &Path, code: &CommitRef, config: &CommitRef) -> Command {
    let mut cmd = Command::new(binary);
    cmd.arg("--config")
        .arg(config_path)
        .arg("deploy")
        .arg(code.as_str())
        .arg(config.as_str());
    cmd
}
