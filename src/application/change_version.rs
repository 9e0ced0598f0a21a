//! Change Version Use Case
//!
//! Manual switch to an existing version. Runs the same steps as a deploy's
//! switch and commit phases but without any fallback: the operator picked
//! the version and owns the outcome.

use crate::application::app_control::AppControl;
use crate::application::health::{wait_until_responds, HealthPolicy};
use crate::config::Config;
use crate::domain::ports::{AppProbe, Clock, RemoteExecutor};
use crate::domain::services::{PointerManager, VersionStore};
use crate::domain::value_objects::VersionName;
use crate::error::{CutoverError, CutoverResult};

/// What to run around the switch
#[derive(Debug, Clone)]
pub struct ChangeVersionOptions {
    pub name: VersionName,
    pub migrate: bool,
    pub collect_static: bool,
    pub clear_cache: bool,
    pub compress: bool,
    /// Run the version's install step before migrating
    pub prepare_install: bool,
}

impl ChangeVersionOptions {
    pub fn new(name: impl Into<VersionName>) -> Self {
        Self {
            name: name.into(),
            migrate: true,
            collect_static: false,
            clear_cache: true,
            compress: false,
            prepare_install: false,
        }
    }
}

pub struct ChangeVersionUseCase<E, P, C>
where
    E: RemoteExecutor,
    P: AppProbe,
    C: Clock,
{
    executor: E,
    probe: P,
    clock: C,
    config: Config,
}

impl<E, P, C> ChangeVersionUseCase<E, P, C>
where
    E: RemoteExecutor,
    P: AppProbe,
    C: Clock,
{
    pub fn new(executor: E, probe: P, clock: C, config: Config) -> Self {
        Self {
            executor,
            probe,
            clock,
            config,
        }
    }

    pub fn execute(&self, options: &ChangeVersionOptions) -> CutoverResult<()> {
        let layout = &self.config.layout;
        let versions = VersionStore::new(
            &self.executor,
            layout.version_root.clone(),
            layout.version_prefix.clone(),
        );
        let pointers = PointerManager::new(
            &self.executor,
            self.config.pointers.clone(),
            layout.version_root.clone(),
        );
        let app = AppControl::new(&self.executor, &self.config);

        if !versions.contains(&options.name)? {
            return Err(CutoverError::VersionNotFound {
                name: options.name.to_string(),
            });
        }

        app.stop_app()?;
        pointers.switch_codebase(&options.name)?;

        if options.prepare_install {
            app.perform_install()?;
        }
        if options.migrate {
            app.migrate()?;
        }
        if options.collect_static {
            app.collect_static()?;
        }
        if options.clear_cache {
            app.clear_cache()?;
        }
        if options.compress {
            app.compress()?;
        }

        app.start_app()?;
        wait_until_responds(
            &self.probe,
            &self.clock,
            HealthPolicy::new(self.config.health.timeout_secs, self.config.health.interval_secs),
        )?;
        pointers.mark_working(&options.name)?;
        Ok(())
    }
}
