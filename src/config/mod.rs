//! Configuration module for Cutover
//!
//! Configuration hierarchy:
//! 1. CLI flags (highest priority)
//! 2. Environment variables (CUTOVER_*)
//! 3. `--config <path>` / `CUTOVER_CONFIG`, else `./cutover.toml`
//! 4. User config (`<config dir>/cutover/config.toml`)
//! 5. Built-in defaults (lowest priority)

mod loader;
mod types;

pub use loader::{ConfigWarning, LOCAL_CONFIG_FILE};
pub use types::{
    BackupConfig, Config, GateConfig, HealthConfig, IdentitiesConfig, LayoutConfig, LockConfig,
    PointerPaths, RepositoriesConfig, RepositoryConfig, ScriptsConfig, ServiceConfig, SshConfig,
};
