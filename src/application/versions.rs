//! Versions Use Case
//!
//! Listing (read-only, no lock) and deletion of version directories.

use serde::Serialize;

use crate::config::Config;
use crate::domain::ports::RemoteExecutor;
use crate::domain::services::{DeletionReport, PointerManager, Retention, VersionStore};
use crate::domain::value_objects::{Pointer, VersionName};
use crate::error::CutoverResult;

/// One listed version and the pointers that target it
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct VersionListing {
    pub name: VersionName,
    pub tags: Vec<Pointer>,
}

impl VersionListing {
    pub fn is_protected(&self) -> bool {
        !self.tags.is_empty()
    }
}

pub struct VersionsUseCase<E: RemoteExecutor> {
    executor: E,
    config: Config,
}

impl<E: RemoteExecutor> VersionsUseCase<E> {
    pub fn new(executor: E, config: Config) -> Self {
        Self { executor, config }
    }

    fn store(&self) -> VersionStore<'_> {
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

    /// All versions, oldest first, tagged with the pointers targeting them
    pub fn list(&self) -> CutoverResult<Vec<VersionListing>> {
        let snapshot = self.pointers().snapshot()?;
        let listing = self
            .store()
            .list_versions()?
            .into_iter()
            .map(|name| {
                let tags = snapshot
                    .iter()
                    .filter(|(_, target)| *target == name)
                    .map(|(pointer, _)| *pointer)
                    .collect();
                VersionListing { name, tags }
            })
            .collect();
        Ok(listing)
    }

    pub fn delete(&self, name: &VersionName) -> CutoverResult<()> {
        let store = self.store();
        let pointers = self.pointers();
        Retention::new(&store, &pointers).delete_version(name)
    }

    pub fn delete_old(&self, keep: usize) -> CutoverResult<DeletionReport> {
        let store = self.store();
        let pointers = self.pointers();
        Retention::new(&store, &pointers).delete_old_versions(keep)
    }
}
