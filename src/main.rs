//! Cutover CLI - versioned, reversible upgrades of a Django host
//!
//! Usage: cutover [--config PATH] [--json] [-v] <COMMAND>
//!
//! Commands:
//!   deploy               Build, switch, verify; fall back on failure
//!   create-version       Build a version directory only
//!   change-version       Switch to an existing version
//!   restart              Stop and start the app
//!   list-versions        List versions with their pointers
//!   delete-version       Delete one unprotected version
//!   delete-old-versions  Keep the newest N versions
//!   check-uncommitted    Look for hotfixes on the live checkouts

mod commands;

use std::io;

use anyhow::Result;
use clap::Parser;
use is_terminal::IsTerminal;

use cutover::infrastructure::DeployLock;
use cutover::presentation::{exit, Cli, OutputFormat, Renderer};
use cutover::{logging, Config};

fn main() {
    let cli = Cli::parse();
    logging::init(cli.verbose);

    let renderer = Renderer::new(
        OutputFormat::from_json_flag(cli.json),
        io::stdout().is_terminal(),
    );
    let command = cli.command.name();

    let code = match run(cli, &renderer) {
        Ok(()) => exit::SUCCESS,
        Err(e) => {
            let code = exit::code_for_anyhow(&e);
            let _ = renderer.failed(&mut io::stderr(), command, &e, code);
            code
        }
    };
    std::process::exit(code);
}

fn run(cli: Cli, renderer: &Renderer) -> Result<()> {
    let (config, path, warnings) = Config::discover(cli.config.as_deref())?;
    for warning in &warnings {
        tracing::warn!("{}", warning);
    }
    tracing::debug!(config = %path.display(), host = %config.host, "configuration loaded");

    // Held until `run` returns; released by the kernel if we die first
    let _lock = if cli.command.is_mutating() {
        Some(DeployLock::new(config.lock.path.clone(), config.lock.wait).acquire()?)
    } else {
        None
    };

    commands::dispatch(cli.command, config, renderer)
}
