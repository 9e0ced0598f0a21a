//! Commands acting on the running app without touching pointers

use std::io;

use anyhow::Result;
use cutover::application::AppControl;
use cutover::presentation::factory;
use cutover::presentation::Renderer;
use cutover::Config;

/// Stop and start; no health check
pub fn cmd_restart(config: Config, renderer: &Renderer) -> Result<()> {
    let executor = factory::connect(&config)?;
    AppControl::new(&executor, &config).restart_app()?;
    renderer.done(&mut io::stdout(), "restart", &config.service.name)?;
    Ok(())
}

pub fn cmd_check_uncommitted(config: Config, renderer: &Renderer) -> Result<()> {
    let executor = factory::connect(&config)?;
    AppControl::new(&executor, &config).check_uncommitted()?;
    renderer.done(
        &mut io::stdout(),
        "check-uncommitted",
        "no uncommitted changes or unpushed commits",
    )?;
    Ok(())
}
