//! Identity value object - which remote account runs a command
//!
//! - `Admin`: service control, maintenance scripts, database backups
//! - `App`: code, config, virtualenvs and version directories

use serde::{Deserialize, Serialize};

/// Remote account a command runs as
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Identity {
    /// Administrative account (has sudo)
    Admin,
    /// Account owning the application files
    App,
}

impl Identity {
    pub const ALL: [Identity; 2] = [Identity::Admin, Identity::App];
}

impl std::fmt::Display for Identity {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Identity::Admin => write!(f, "admin"),
            Identity::App => write!(f, "app"),
        }
    }
}
