//! Version switching, listing and deletion

use std::io;

use anyhow::Result;
use cutover::application::ChangeVersionOptions;
use cutover::presentation::factory;
use cutover::presentation::Renderer;
use cutover::{Config, VersionName};

pub fn cmd_change_version(
    config: Config,
    options: ChangeVersionOptions,
    renderer: &Renderer,
) -> Result<()> {
    let name = options.name.clone();
    factory::create_change_version_use_case(config)?.execute(&options)?;
    renderer.done(&mut io::stdout(), "change-version", &format!("now running {name}"))?;
    Ok(())
}

pub fn cmd_list_versions(config: Config, renderer: &Renderer) -> Result<()> {
    let listing = factory::create_versions_use_case(config)?.list()?;
    renderer.versions(&mut io::stdout(), &listing)?;
    Ok(())
}

pub fn cmd_delete_version(config: Config, name: String, renderer: &Renderer) -> Result<()> {
    let name = VersionName::new(name);
    factory::create_versions_use_case(config)?.delete(&name)?;
    renderer.done(&mut io::stdout(), "delete-version", &format!("deleted {name}"))?;
    Ok(())
}

pub fn cmd_delete_old_versions(config: Config, keep: usize, renderer: &Renderer) -> Result<()> {
    let report = factory::create_versions_use_case(config)?.delete_old(keep)?;
    renderer.deletion(&mut io::stdout(), &report)?;
    Ok(())
}
