//! Version Pointer Manager
//!
//! Four symlinks name the versions in each role. `current` and `working` are
//! swapped; `previous` and `previous-working` are their backup slots.
//!
//! A swap of pointer `P` with backup `B` to version `V`:
//!
//! 1. `rm -f B`
//! 2. `cp -P P B` (only when `P` exists)
//! 3. `ln -sfn V P.next`
//! 4. `mv -T P.next P`
//!
//! Step 4 is a single rename(2), so a reader of `P` sees either the old or the
//! new target, never neither. A crash between steps 1 and 2 leaves `B`
//! missing; that window is not closed.

use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};

use crate::domain::commands::{self, fs};
use crate::domain::ports::{RemoteExecutor, Shell};
use crate::domain::value_objects::{Identity, Pointer, VersionName};
use crate::error::{CutoverError, CutoverResult};

/// Where the pointer symlinks live on the host
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PointerPaths {
    #[serde(default = "default_current")]
    pub current: String,
    #[serde(default = "default_previous")]
    pub previous: String,
    #[serde(default = "default_working")]
    pub working: String,
    #[serde(default = "default_previous_working")]
    pub previous_working: String,
}

fn default_current() -> String {
    "~/django-current".to_string()
}

fn default_previous() -> String {
    "~/django-previous".to_string()
}

fn default_working() -> String {
    "~/django-working".to_string()
}

fn default_previous_working() -> String {
    "~/django-previous-working".to_string()
}

impl Default for PointerPaths {
    fn default() -> Self {
        Self {
            current: default_current(),
            previous: default_previous(),
            working: default_working(),
            previous_working: default_previous_working(),
        }
    }
}

impl PointerPaths {
    pub fn path(&self, pointer: Pointer) -> &str {
        match pointer {
            Pointer::Current => &self.current,
            Pointer::Previous => &self.previous,
            Pointer::Working => &self.working,
            Pointer::PreviousWorking => &self.previous_working,
        }
    }
}

pub struct PointerManager<'a> {
    executor: &'a dyn RemoteExecutor,
    paths: PointerPaths,
    version_root: String,
}

impl<'a> PointerManager<'a> {
    pub fn new(
        executor: &'a dyn RemoteExecutor,
        paths: PointerPaths,
        version_root: impl Into<String>,
    ) -> Self {
        Self {
            executor,
            paths,
            version_root: version_root.into(),
        }
    }

    fn shell(&self) -> Shell<'a> {
        Shell::new(self.executor, Identity::App)
    }

    /// Version a pointer targets: follow the links, keep the last component
    pub fn resolve(&self, pointer: Pointer) -> CutoverResult<VersionName> {
        self.target(pointer)?.ok_or_else(|| {
            CutoverError::check(format!(
                "pointer '{}' ({}) does not exist",
                pointer,
                self.paths.path(pointer)
            ))
        })
    }

    /// Like [`resolve`](Self::resolve), `None` when the symlink is missing.
    ///
    /// `readlink -f` happily canonicalises a path that does not exist, so the
    /// link is tested first.
    pub fn target(&self, pointer: Pointer) -> CutoverResult<Option<VersionName>> {
        let shell = self.shell();
        let link = self.paths.path(pointer);
        if !shell.probe(fs::is_link(link))?.is_success() {
            return Ok(None);
        }
        let resolved = shell.run(fs::resolve_link(link))?;
        let name = commands::basename(&resolved);
        if name.is_empty() {
            return Err(CutoverError::check(format!(
                "pointer '{}' did not resolve to anything",
                pointer
            )));
        }
        Ok(Some(VersionName::from(name)))
    }

    /// Make `current` target `version`, keeping the old target in `previous`
    pub fn switch_codebase(&self, version: &VersionName) -> CutoverResult<()> {
        tracing::info!(%version, "changing codebase");
        self.swap(Pointer::Current, version)
    }

    /// Make `working` target `version`. Returns `false` (and touches nothing)
    /// when it already does.
    pub fn mark_working(&self, version: &VersionName) -> CutoverResult<bool> {
        if self.target(Pointer::Working)?.as_ref() == Some(version) {
            tracing::debug!(%version, "already marked working");
            return Ok(false);
        }
        tracing::info!(%version, "marking working");
        self.swap(Pointer::Working, version)?;
        Ok(true)
    }

    fn swap(&self, pointer: Pointer, version: &VersionName) -> CutoverResult<()> {
        let Some(backup) = pointer.backup() else {
            return Err(CutoverError::internal(format!(
                "pointer '{}' has no backup slot and cannot be swapped",
                pointer
            )));
        };
        let shell = self.shell();
        let link = self.paths.path(pointer);
        let backup_link = self.paths.path(backup);
        let staging = format!("{}.next", link);
        let target = commands::join(&self.version_root, version.as_str());

        shell.run(fs::remove_file(backup_link))?;
        if shell.probe(fs::is_link(link))?.is_success() {
            shell.run(fs::copy_link(link, backup_link))?;
        }
        shell.run(fs::symlink(&target, &staging))?;
        shell.run(fs::replace(&staging, link))?;
        Ok(())
    }

    /// Targets of the existing pointers, in `Pointer::ALL` order
    pub fn snapshot(&self) -> CutoverResult<Vec<(Pointer, VersionName)>> {
        let mut targets = Vec::with_capacity(Pointer::ALL.len());
        for pointer in Pointer::ALL {
            if let Some(version) = self.target(pointer)? {
                targets.push((pointer, version));
            }
        }
        Ok(targets)
    }

    /// Versions that must never be deleted
    pub fn protected_versions(&self) -> CutoverResult<BTreeSet<VersionName>> {
        Ok(self.snapshot()?.into_iter().map(|(_, v)| v).collect())
    }
}
