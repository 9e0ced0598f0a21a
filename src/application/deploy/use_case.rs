//! Deploy Use Case
//!
//! Orchestrates one deploy attempt:
//! 1. Pre-flight: record the beginning version, check for hotfixes
//! 2. Materialize: build the new version inside maintenance mode
//! 3. Switch & validate: stop, switch `current`, smoke check, backup, install
//! 4. Commit: migrate, start, verify, mark working
//!
//! Failures in 1 and 2 leave the running app alone and are wrapped as
//! untouched (interrupts and invalid input excepted).
//! Failures in 3 run the fallback, which restores the beginning version and
//! re-raises the original error as recovered. Failures in 4 propagate as-is;
//! migrations are not undone.

use std::sync::Arc;

use crate::application::app_control::AppControl;
use crate::application::cancel::CancelToken;
use crate::application::health::{wait_until_responds, HealthPolicy};
use crate::config::Config;
use crate::domain::ports::{
    AppProbe, Clock, DeployEvent, DeployEventSink, NoopEventSink, RemoteExecutor,
};
use crate::domain::services::{PointerManager, VersionStore};
use crate::domain::value_objects::{CommitRef, Phase, Pointer, VersionName};
use crate::error::{CutoverError, CutoverResult};

use super::options::DeployOptions;
use super::phase::{DeployAttempt, DeployReport, PhaseOutcome};

/// Deploy use case - owns its executor, probe and clock
pub struct DeployUseCase<E, P, C>
where
    E: RemoteExecutor,
    P: AppProbe,
    C: Clock,
{
    executor: E,
    probe: P,
    clock: C,
    config: Config,
    cancel: CancelToken,
}

impl<E, P, C> DeployUseCase<E, P, C>
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
            cancel: CancelToken::new(),
        }
    }

    /// Honour interrupts from `cancel` while the host is untouched
    pub fn with_cancel(mut self, cancel: CancelToken) -> Self {
        self.cancel = cancel;
        self
    }

    /// Execute the deploy
    pub fn execute(&self, options: &DeployOptions) -> CutoverResult<DeployReport> {
        self.execute_with_events(options, Arc::new(NoopEventSink))
    }

    /// Execute the deploy, reporting progress to `events`
    pub fn execute_with_events(
        &self,
        options: &DeployOptions,
        events: Arc<dyn DeployEventSink>,
    ) -> CutoverResult<DeployReport> {
        let mut attempt = DeployAttempt::new();
        let result = self.run(options, &mut attempt, events.as_ref());
        if let Err(e) = &result {
            if !e.is_recovered() {
                events.on_event(DeployEvent::Failed {
                    phase: attempt.phase,
                    error: e.to_string(),
                });
            }
        }
        result
    }

    /// Build a version directory without switching to it
    pub fn create_version(&self, code: &CommitRef, config: &CommitRef) -> CutoverResult<VersionName> {
        self.cancel.enter(Phase::Materialize);
        self.materialize(&self.versions(), &self.app(), code, config)
    }

    fn versions(&self) -> VersionStore<'_> {
        VersionStore::new(
            &self.executor,
            self.config.layout.version_root.clone(),
            self.config.layout.version_prefix.clone(),
        )
    }

    fn pointers(&self) -> PointerManager<'_> {
        PointerManager::new(
            &self.executor,
            self.config.pointers.clone(),
            self.config.layout.version_root.clone(),
        )
    }

    fn app(&self) -> AppControl<'_> {
        AppControl::new(&self.executor, &self.config).with_cancel(self.cancel.clone())
    }

    fn health(&self) -> HealthPolicy {
        HealthPolicy::new(
            self.config.health.timeout_secs,
            self.config.health.interval_secs,
        )
    }

    fn enter(&self, attempt: &mut DeployAttempt, phase: Phase, events: &dyn DeployEventSink) {
        attempt.phase = phase;
        self.cancel.enter(phase);
        events.on_event(DeployEvent::PhaseStarted { phase });
    }

    fn run(
        &self,
        options: &DeployOptions,
        attempt: &mut DeployAttempt,
        events: &dyn DeployEventSink,
    ) -> CutoverResult<DeployReport> {
        let versions = self.versions();
        let pointers = self.pointers();
        let app = self.app();

        // S0
        self.enter(attempt, Phase::Preflight, events);
        let outcome = PhaseOutcome::from_result(
            Phase::Preflight,
            self.preflight(&pointers, &app, options),
        );
        let beginning = match outcome {
            PhaseOutcome::Completed(beginning) => beginning,
            PhaseOutcome::Recoverable(e) | PhaseOutcome::Fatal(e) => {
                tracing::error!("pre-flight failed; the running app was not touched");
                return Err(CutoverError::untouched(Phase::Preflight, e));
            }
        };
        attempt.beginning = Some(beginning.clone());
        events.on_event(DeployEvent::Started {
            beginning: beginning.clone(),
        });

        // S1
        self.enter(attempt, Phase::Materialize, events);
        let outcome = PhaseOutcome::from_result(
            Phase::Materialize,
            self.materialize(&versions, &app, &options.code, &options.config),
        );
        let candidate = match outcome {
            PhaseOutcome::Completed(candidate) => candidate,
            PhaseOutcome::Recoverable(e) | PhaseOutcome::Fatal(e) => {
                tracing::error!("version creation failed; the running app was not touched");
                return Err(CutoverError::untouched(Phase::Materialize, e));
            }
        };
        attempt.candidate = Some(candidate.clone());
        events.on_event(DeployEvent::VersionCreated {
            name: candidate.clone(),
        });

        // S2
        self.enter(attempt, Phase::SwitchAndValidate, events);
        let outcome = PhaseOutcome::from_result(
            Phase::SwitchAndValidate,
            self.switch_and_validate(&pointers, &app, &candidate, options, events),
        );
        match outcome {
            PhaseOutcome::Completed(()) => {}
            PhaseOutcome::Recoverable(e) => {
                return Err(self.fall_back(&pointers, &app, &beginning, e, attempt, events));
            }
            PhaseOutcome::Fatal(e) => return Err(e),
        }

        // S3: no automatic rollback from here on
        self.enter(attempt, Phase::Commit, events);
        let outcome =
            PhaseOutcome::from_result(Phase::Commit, self.commit(&pointers, &app, &candidate));
        match outcome {
            PhaseOutcome::Completed(()) => {}
            PhaseOutcome::Recoverable(e) | PhaseOutcome::Fatal(e) => {
                tracing::error!(
                    version = %candidate,
                    "commit failed after the switch; not rolling back, the host needs attention"
                );
                return Err(e);
            }
        }

        events.on_event(DeployEvent::Completed {
            name: candidate.clone(),
        });
        Ok(DeployReport {
            beginning,
            version: candidate,
        })
    }

    fn preflight(
        &self,
        pointers: &PointerManager<'_>,
        app: &AppControl<'_>,
        options: &DeployOptions,
    ) -> CutoverResult<VersionName> {
        self.cancel.checkpoint()?;
        let beginning = pointers.resolve(Pointer::Current)?;
        tracing::info!(%beginning, "beginning version");

        if options.check_hotfixes {
            self.cancel.checkpoint()?;
            app.check_uncommitted()?;
        }
        self.cancel.checkpoint()?;
        Ok(beginning)
    }

    fn materialize(
        &self,
        versions: &VersionStore<'_>,
        app: &AppControl<'_>,
        code: &CommitRef,
        config: &CommitRef,
    ) -> CutoverResult<VersionName> {
        self.cancel.checkpoint()?;
        let name = versions.new_version_name(&self.clock, code, config);
        app.create_version(&versions.version_path(&name), code, config)?;
        Ok(name)
    }

    fn switch_and_validate(
        &self,
        pointers: &PointerManager<'_>,
        app: &AppControl<'_>,
        candidate: &VersionName,
        options: &DeployOptions,
        events: &dyn DeployEventSink,
    ) -> CutoverResult<()> {
        app.stop_app()?;
        pointers.switch_codebase(candidate)?;

        let current = pointers.resolve(Pointer::Current)?;
        if current != *candidate {
            return Err(CutoverError::internal(format!(
                "current points at '{}' right after switching to '{}'",
                current, candidate
            )));
        }
        events.on_event(DeployEvent::Switched {
            name: candidate.clone(),
        });

        app.check_manage()?;
        if options.backup {
            app.backup_database()?;
        }
        app.perform_install()
    }

    /// Restore `beginning` and wrap `error` as recovered, or return the error
    /// that stopped the fallback itself.
    fn fall_back(
        &self,
        pointers: &PointerManager<'_>,
        app: &AppControl<'_>,
        beginning: &VersionName,
        error: CutoverError,
        attempt: &mut DeployAttempt,
        events: &dyn DeployEventSink,
    ) -> CutoverError {
        events.on_event(DeployEvent::FallbackStarted {
            phase: attempt.phase,
            error: error.to_string(),
        });
        attempt.phase = Phase::Fallback;
        self.cancel.enter(Phase::Fallback);

        match self.restore(pointers, app, beginning) {
            Ok(()) => {
                events.on_event(DeployEvent::FallbackCompleted {
                    restored: beginning.clone(),
                });
                CutoverError::FallbackRecovered {
                    restored: beginning.to_string(),
                    source: Box::new(error),
                }
            }
            Err(fallback_error) => {
                tracing::error!(
                    original = %error,
                    error = %fallback_error,
                    "fallback failed; the host needs manual recovery"
                );
                fallback_error
            }
        }
    }

    fn restore(
        &self,
        pointers: &PointerManager<'_>,
        app: &AppControl<'_>,
        beginning: &VersionName,
    ) -> CutoverResult<()> {
        let current = match pointers.resolve(Pointer::Current) {
            Ok(current) => Some(current),
            Err(e) => {
                tracing::warn!(error = %e, "could not resolve current pointer");
                None
            }
        };
        if current.as_ref() != Some(beginning) {
            pointers.switch_codebase(beginning)?;
        }

        let restored = pointers.resolve(Pointer::Current)?;
        if restored != *beginning {
            return Err(CutoverError::internal(format!(
                "pointer restore did not converge: current is '{}', expected '{}'",
                restored, beginning
            )));
        }

        app.start_app()?;
        wait_until_responds(&self.probe, &self.clock, self.health())
    }

    fn commit(
        &self,
        pointers: &PointerManager<'_>,
        app: &AppControl<'_>,
        candidate: &VersionName,
    ) -> CutoverResult<()> {
        app.migrate()?;
        app.start_app()?;
        wait_until_responds(&self.probe, &self.clock, self.health())?;
        pointers.mark_working(candidate)?;
        Ok(())
    }
}
