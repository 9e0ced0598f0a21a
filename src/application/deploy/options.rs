//! Deploy Options

use crate::domain::value_objects::CommitRef;

/// Options for the deploy use case
#[derive(Debug, Clone)]
pub struct DeployOptions {
    /// Commit of the code repository
    pub code: CommitRef,
    /// Commit of the config repository
    pub config: CommitRef,
    /// Refuse to deploy over uncommitted or unpushed changes on the host
    pub check_hotfixes: bool,
    /// Back up the database before migrating
    pub backup: bool,
}

impl DeployOptions {
    pub fn new(code: CommitRef, config: CommitRef) -> Self {
        Self {
            code,
            config,
            check_hotfixes: true,
            backup: true,
        }
    }

    pub fn with_check_hotfixes(mut self, check: bool) -> Self {
        self.check_hotfixes = check;
        self
    }

    pub fn with_backup(mut self, backup: bool) -> Self {
        self.backup = backup;
        self
    }
}
