//! Application control on the host
//!
//! Everything the deploy steps do besides moving pointers: maintenance mode,
//! the service unit, `manage.py`, the database backup and building a version
//! directory. Admin-identity work (scripts, systemctl, backups) and
//! app-identity work (checkouts, virtualenvs, manage.py) never mix.

use crate::config::{Config, RepositoryConfig};
use crate::domain::commands::{self, fs, git, manage, python, script, service};
use crate::domain::ports::{RemoteExecutor, Shell};
use crate::domain::value_objects::{CommitRef, Identity};
use crate::error::{CutoverError, CutoverResult};

use super::cancel::CancelToken;

pub struct AppControl<'a> {
    executor: &'a dyn RemoteExecutor,
    config: &'a Config,
    cancel: CancelToken,
}

impl<'a> AppControl<'a> {
    pub fn new(executor: &'a dyn RemoteExecutor, config: &'a Config) -> Self {
        Self {
            executor,
            config,
            cancel: CancelToken::new(),
        }
    }

    /// Check `cancel` between materialisation steps
    pub fn with_cancel(mut self, cancel: CancelToken) -> Self {
        self.cancel = cancel;
        self
    }

    fn admin(&self) -> Shell<'a> {
        Shell::new(self.executor, Identity::Admin)
    }

    fn app(&self) -> Shell<'a> {
        Shell::new(self.executor, Identity::App)
    }

    /// App shell with the current virtualenv active
    fn current_env(&self) -> Shell<'a> {
        self.app()
            .prefix(python::activate(&self.config.layout.current_venv))
    }

    /// Where `manage.py` runs
    fn manage_shell(&self) -> Shell<'a> {
        self.current_env()
            .cd(self.config.layout.deployment_dir.clone())
    }

    pub fn start_maintenance(&self) -> CutoverResult<()> {
        tracing::info!("starting maintenance mode");
        self.admin()
            .run(script::run(&self.config.scripts.maintenance_start))?;
        Ok(())
    }

    pub fn stop_maintenance(&self) -> CutoverResult<()> {
        tracing::info!("stopping maintenance mode");
        self.admin()
            .run(script::run(&self.config.scripts.maintenance_stop))?;
        Ok(())
    }

    /// Leave maintenance mode, then start the service
    pub fn start_app(&self) -> CutoverResult<()> {
        self.stop_maintenance()?;
        tracing::info!(service = %self.config.service.name, "starting the app");
        self.admin().run(service::start(&self.config.service.name))?;
        Ok(())
    }

    /// Stopping an already stopped unit succeeds
    pub fn stop_app(&self) -> CutoverResult<()> {
        tracing::info!(service = %self.config.service.name, "stopping the app");
        self.admin().run(service::stop(&self.config.service.name))?;
        Ok(())
    }

    pub fn restart_app(&self) -> CutoverResult<()> {
        self.stop_app()?;
        self.start_app()
    }

    /// Fail when either live checkout has uncommitted or unpushed changes
    pub fn check_uncommitted(&self) -> CutoverResult<()> {
        tracing::info!("checking for uncommitted or unpushed changes");
        self.check_repository(&self.config.layout.current_code)?;
        self.check_repository(&self.config.layout.current_config)
    }

    fn check_repository(&self, path: &str) -> CutoverResult<()> {
        let repo = self.app().cd(path);
        repo.run(git::status())?;
        if !repo.probe(git::diff_index_quiet())?.is_success() {
            return Err(CutoverError::check(format!(
                "found uncommitted changes in {}",
                path
            )));
        }
        let unpushed = repo.run(git::unpushed_log())?;
        if !unpushed.trim().is_empty() {
            return Err(CutoverError::check(format!(
                "found unpushed commits in {}",
                path
            )));
        }
        Ok(())
    }

    /// Build a version directory inside maintenance mode.
    ///
    /// Maintenance mode is always left again, whatever happened. On failure
    /// the partially built directory is removed so the host looks as before.
    pub fn create_version(
        &self,
        path: &str,
        code: &CommitRef,
        config: &CommitRef,
    ) -> CutoverResult<()> {
        let prepared = self
            .start_maintenance()
            .and_then(|()| self.prepare_version(path, code, config));
        let stopped = self.stop_maintenance();

        match (prepared, stopped) {
            (Ok(()), stopped) => stopped,
            (Err(e), Ok(())) => Err(e),
            (Err(e), Err(stop_err)) => {
                tracing::error!(error = %stop_err, "could not leave maintenance mode");
                Err(e)
            }
        }
    }

    /// Create and fill the version directory at `path`
    pub fn prepare_version(
        &self,
        path: &str,
        code: &CommitRef,
        config: &CommitRef,
    ) -> CutoverResult<()> {
        self.cancel.checkpoint()?;
        tracing::info!(%path, "creating code and config files");
        self.app().run(fs::make_dir(path))?;

        let filled = self.fill_version(path, code, config);
        if filled.is_err() {
            tracing::warn!(%path, "removing partially built version");
            if let Err(e) = self.app().run(fs::remove_tree(path)) {
                tracing::error!(%path, error = %e, "could not remove partial version");
            }
        }
        filled
    }

    fn fill_version(&self, path: &str, code: &CommitRef, config: &CommitRef) -> CutoverResult<()> {
        let layout = &self.config.layout;
        let repos = &self.config.repositories;
        let version = self.app().cd(path);

        version.run(fs::make_dir(&layout.static_subdir))?;
        self.cancel.checkpoint()?;
        self.download_repository(path, &repos.code, &layout.code_subdir, code)?;
        self.cancel.checkpoint()?;
        self.download_repository(path, &repos.config, &layout.config_subdir, config)?;
        self.cancel.checkpoint()?;

        tracing::info!("creating virtualenv");
        version.run(python::create_venv(&layout.python, &layout.venv_subdir))?;
        let env = version.prefix(python::activate(&commands::join(path, &layout.venv_subdir)));
        for subdir in [&layout.code_subdir, &layout.config_subdir] {
            self.cancel.checkpoint()?;
            tracing::info!(%subdir, "installing requirements");
            env.cd(commands::join(path, subdir))
                .run(python::install_requirements())?;
        }
        self.cancel.checkpoint()
    }

    fn download_repository(
        &self,
        version_path: &str,
        repo: &RepositoryConfig,
        subdir: &str,
        commit: &CommitRef,
    ) -> CutoverResult<()> {
        tracing::info!(url = %repo.url, %subdir, %commit, "downloading repository");
        self.app()
            .cd(version_path)
            .run(git::clone(&repo.url, &repo.branch, subdir))?;

        let checkout = self.app().cd(commands::join(version_path, subdir));
        checkout.run(git::checkout(commit))?;
        checkout.run(git::delete_branch(&repo.branch))?;
        checkout.run(git::create_branch(&repo.branch))?;
        checkout.run(git::set_upstream(&repo.branch))?;
        Ok(())
    }

    /// `manage.py` must run cleanly against the current version
    pub fn check_manage(&self) -> CutoverResult<()> {
        tracing::info!("checking manage.py");
        self.manage_shell().run(manage::smoke_check())?;
        Ok(())
    }

    pub fn migrate(&self) -> CutoverResult<()> {
        tracing::info!("applying migrations");
        self.manage_shell().run(manage::migrate())?;
        Ok(())
    }

    pub fn collect_static(&self) -> CutoverResult<()> {
        tracing::info!("collecting static files");
        self.manage_shell().run(manage::collect_static())?;
        Ok(())
    }

    pub fn clear_cache(&self) -> CutoverResult<()> {
        tracing::info!("clearing cache");
        self.manage_shell().run(manage::clear_cache())?;
        Ok(())
    }

    pub fn compress(&self) -> CutoverResult<()> {
        tracing::info!("compressing assets");
        self.manage_shell().run(manage::compress())?;
        Ok(())
    }

    /// Version-provided install/build step, run with the current venv active
    pub fn perform_install(&self) -> CutoverResult<()> {
        tracing::info!("preparing version install");
        self.current_env()
            .run(script::run(&self.config.scripts.perform_install))?;
        Ok(())
    }

    /// Run the backup script and reject a suspiciously small dump
    pub fn backup_database(&self) -> CutoverResult<()> {
        tracing::info!("backing up database");
        let admin = self.admin();
        let printed = admin.run(script::run(&self.config.scripts.backup))?;
        let Some(backup) = printed.lines().rev().map(str::trim).find(|l| !l.is_empty()) else {
            return Err(CutoverError::check("backup script did not print a file path"));
        };

        let size = admin.run(fs::file_size(backup))?;
        let size: u64 = size.trim().parse().map_err(|_| {
            CutoverError::check(format!("unexpected size of {}: '{}'", backup, size.trim()))
        })?;

        let minimum = self.config.backup.min_size_bytes;
        if size < minimum {
            return Err(CutoverError::check(format!(
                "backup {} is only {} bytes (expected at least {})",
                backup, size, minimum
            )));
        }
        tracing::debug!(%backup, size, "backup looks sane");
        Ok(())
    }
}
