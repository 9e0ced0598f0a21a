//! Deploy command entry points

use std::io;
use std::sync::Arc;

use anyhow::Result;
use cutover::application::{CancelToken, DeployOptions};
use cutover::domain::ports::DeployEventSink;
use cutover::infrastructure::{JsonEventSink, TracingEventSink};
use cutover::presentation::factory;
use cutover::presentation::{OutputFormat, Renderer};
use cutover::{CommitRef, Config};

pub fn cmd_deploy(
    config: Config,
    options: DeployOptions,
    cancel: CancelToken,
    renderer: &Renderer,
) -> Result<()> {
    let use_case = factory::create_deploy_use_case(config, cancel)?;

    let events: Arc<dyn DeployEventSink> = match renderer.format() {
        OutputFormat::Json => Arc::new(JsonEventSink::stdout()),
        OutputFormat::Text => Arc::new(TracingEventSink),
    };
    let report = use_case.execute_with_events(&options, events)?;
    renderer.deployed(&mut io::stdout(), &report)?;
    Ok(())
}

pub fn cmd_create_version(
    config: Config,
    code: CommitRef,
    config_commit: CommitRef,
    cancel: CancelToken,
    renderer: &Renderer,
) -> Result<()> {
    let use_case = factory::create_deploy_use_case(config, cancel)?;
    let name = use_case.create_version(&code, &config_commit)?;
    renderer.created(&mut io::stdout(), &name)?;
    Ok(())
}
