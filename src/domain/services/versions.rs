//! Version naming and storage
//!
//! Versions live as sibling directories under the version root and are
//! recognised purely by name (`<prefix>-<digits>-...`).

use crate::domain::commands::{self, fs};
use crate::domain::ports::{Clock, RemoteExecutor, Shell};
use crate::domain::value_objects::{CommitRef, Identity, VersionName};
use crate::error::CutoverResult;

pub struct VersionStore<'a> {
    executor: &'a dyn RemoteExecutor,
    root: String,
    prefix: String,
}

impl<'a> VersionStore<'a> {
    pub fn new(
        executor: &'a dyn RemoteExecutor,
        root: impl Into<String>,
        prefix: impl Into<String>,
    ) -> Self {
        Self {
            executor,
            root: root.into(),
            prefix: prefix.into(),
        }
    }

    fn shell(&self) -> Shell<'a> {
        Shell::new(self.executor, Identity::App)
    }

    /// Directory of a version on the host
    pub fn version_path(&self, name: &VersionName) -> String {
        commands::join(&self.root, name.as_str())
    }

    /// All version directories, oldest first
    pub fn list_versions(&self) -> CutoverResult<Vec<VersionName>> {
        let listing = self.shell().cd(self.root.clone()).run(fs::list_dir())?;
        let mut versions: Vec<VersionName> = listing
            .split_whitespace()
            .map(VersionName::from)
            .filter(|v| v.is_version_of(&self.prefix))
            .collect();
        versions.sort();
        Ok(versions)
    }

    pub fn contains(&self, name: &VersionName) -> CutoverResult<bool> {
        Ok(self.list_versions()?.contains(name))
    }

    /// Name for a version built now from these commits
    pub fn new_version_name(
        &self,
        clock: &dyn Clock,
        code: &CommitRef,
        config: &CommitRef,
    ) -> VersionName {
        VersionName::compose(&self.prefix, clock.now(), code, config)
    }

    /// `rm -rf` the version directory, no questions asked
    pub(crate) fn remove(&self, name: &VersionName) -> CutoverResult<()> {
        tracing::info!(version = %name, "deleting version");
        self.shell().run(fs::remove_tree(&self.version_path(name)))?;
        Ok(())
    }
}
