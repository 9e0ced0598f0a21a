//! Use Case Factory
//!
//! Creates use cases with infrastructure dependencies wired up.
//! This is the dependency injection point for the application.

use crate::application::{
    CancelToken, ChangeVersionUseCase, DeployUseCase, VersionsUseCase,
};
use crate::config::Config;
use crate::error::CutoverResult;
use crate::infrastructure::{HttpProbe, SshExecutor, SystemClock};

/// Type alias for the concrete DeployUseCase with all dependencies
pub type ConcreteDeployUseCase = DeployUseCase<SshExecutor, HttpProbe, SystemClock>;

/// Type alias for the concrete ChangeVersionUseCase with all dependencies
pub type ConcreteChangeVersionUseCase = ChangeVersionUseCase<SshExecutor, HttpProbe, SystemClock>;

pub type ConcreteVersionsUseCase = VersionsUseCase<SshExecutor>;

/// Open the transport and check both identities before anything else runs
pub fn connect(config: &Config) -> CutoverResult<SshExecutor> {
    let executor = SshExecutor::from_config(config);
    tracing::debug!(host = %config.host, "verifying remote identities");
    executor.verify_identities()?;
    Ok(executor)
}

/// Create a deploy use case with all dependencies wired up
pub fn create_deploy_use_case(
    config: Config,
    cancel: CancelToken,
) -> CutoverResult<ConcreteDeployUseCase> {
    let executor = connect(&config)?;
    let probe = HttpProbe::new(config.health.url.clone())?;
    Ok(DeployUseCase::new(executor, probe, SystemClock, config).with_cancel(cancel))
}

pub fn create_change_version_use_case(config: Config) -> CutoverResult<ConcreteChangeVersionUseCase> {
    let executor = connect(&config)?;
    let probe = HttpProbe::new(config.health.url.clone())?;
    Ok(ChangeVersionUseCase::new(executor, probe, SystemClock, config))
}

pub fn create_versions_use_case(config: Config) -> CutoverResult<ConcreteVersionsUseCase> {
    let executor = connect(&config)?;
    Ok(VersionsUseCase::new(executor, config))
}
