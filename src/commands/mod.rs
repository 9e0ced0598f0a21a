//! Command handlers for the `cutover` binary
//!
//! Each handler wires a use case from the factory, runs it and renders the
//! result. Errors travel up as `anyhow::Error`; `main` turns them into exit
//! codes.

mod app;
mod deploy;
mod versions;

use std::sync::atomic::{AtomicUsize, Ordering};

use anyhow::Result;
use cutover::application::{CancelToken, ChangeVersionOptions, DeployOptions};
use cutover::presentation::{exit, Commands, Renderer};
use cutover::Config;

pub fn dispatch(command: Commands, config: Config, renderer: &Renderer) -> Result<()> {
    let cancellable = matches!(
        command,
        Commands::Deploy { .. } | Commands::CreateVersion { .. }
    );
    let cancel = install_interrupt_handler(cancellable)?;

    match command {
        Commands::Deploy {
            code_commit,
            config_commit,
            no_check_hotfixes,
            no_backup,
        } => {
            let options = DeployOptions::new(code_commit, config_commit)
                .with_check_hotfixes(!no_check_hotfixes)
                .with_backup(!no_backup);
            deploy::cmd_deploy(config, options, cancel, renderer)
        }
        Commands::CreateVersion {
            code_commit,
            config_commit,
        } => deploy::cmd_create_version(config, code_commit, config_commit, cancel, renderer),
        Commands::ChangeVersion {
            name,
            no_migrate,
            collect_static,
            no_clear_cache,
            compress,
            prepare_install,
        } => {
            let mut options = ChangeVersionOptions::new(name);
            options.migrate = !no_migrate;
            options.collect_static = collect_static;
            options.clear_cache = !no_clear_cache;
            options.compress = compress;
            options.prepare_install = prepare_install;
            versions::cmd_change_version(config, options, renderer)
        }
        Commands::Restart => app::cmd_restart(config, renderer),
        Commands::ListVersions => versions::cmd_list_versions(config, renderer),
        Commands::DeleteVersion { name } => versions::cmd_delete_version(config, name, renderer),
        Commands::DeleteOldVersions { to_keep } => {
            versions::cmd_delete_old_versions(config, to_keep, renderer)
        }
        Commands::CheckUncommitted => app::cmd_check_uncommitted(config, renderer),
    }
}

/// Route Ctrl-C into a cancel token.
///
/// With `cancellable`, the first Ctrl-C is handed to the token and honoured
/// at the next checkpoint while no pointer has changed; after the switch it
/// is only logged. A second Ctrl-C, or any Ctrl-C for other commands, exits
/// at once and may leave the host for manual recovery.
fn install_interrupt_handler(cancellable: bool) -> Result<CancelToken> {
    let token = CancelToken::new();
    let handler_token = token.clone();
    let presses = AtomicUsize::new(0);

    ctrlc::set_handler(move || {
        let first = presses.fetch_add(1, Ordering::SeqCst) == 0;
        if !(cancellable && first) {
            eprintln!("interrupted");
            std::process::exit(exit::INTERRUPTED);
        }
        if handler_token.cancel() {
            tracing::warn!("interrupt received; stopping before any pointer changes");
        } else {
            tracing::warn!(
                phase = %handler_token.phase(),
                "interrupt received after the codebase switch began; continuing. \
                 Press Ctrl-C again to abort and recover the host by hand"
            );
        }
    })?;
    Ok(token)
}
