//! Configuration type definitions

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::domain::value_objects::Identity;
use crate::error::{CutoverError, CutoverResult};

use super::loader::{self, ConfigWarning};

// Pointer locations are a domain type; the config embeds it directly
pub use crate::domain::services::PointerPaths;

/// SSH transport configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SshConfig {
    #[serde(default = "default_ssh_binary")]
    pub binary: String,

    /// Extra arguments passed before the destination (e.g. `-o BatchMode=yes`)
    #[serde(default)]
    pub options: Vec<String>,

    #[serde(default)]
    pub port: Option<u16>,
}

impl Default for SshConfig {
    fn default() -> Self {
        Self {
            binary: default_ssh_binary(),
            options: Vec::new(),
            port: None,
        }
    }
}

fn default_ssh_binary() -> String {
    "ssh".to_string()
}

/// Remote accounts
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct IdentitiesConfig {
    #[serde(default = "default_admin")]
    pub admin: String,

    #[serde(default = "default_app")]
    pub app: String,
}

impl Default for IdentitiesConfig {
    fn default() -> Self {
        Self {
            admin: default_admin(),
            app: default_app(),
        }
    }
}

fn default_admin() -> String {
    "admin".to_string()
}

fn default_app() -> String {
    "app".to_string()
}

/// Where things live on the host
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LayoutConfig {
    #[serde(default = "default_version_root")]
    pub version_root: String,

    #[serde(default = "default_version_prefix")]
    pub version_prefix: String,

    #[serde(default = "default_code_subdir")]
    pub code_subdir: String,

    #[serde(default = "default_config_subdir")]
    pub config_subdir: String,

    #[serde(default = "default_venv_subdir")]
    pub venv_subdir: String,

    #[serde(default = "default_static_subdir")]
    pub static_subdir: String,

    /// Directory holding `manage.py` (symlinks into the current config)
    #[serde(default = "default_deployment_dir")]
    pub deployment_dir: String,

    /// Virtualenv of the current version (usually a symlink)
    #[serde(default = "default_current_venv")]
    pub current_venv: String,

    /// Live code checkout, checked for hotfixes
    #[serde(default = "default_current_code")]
    pub current_code: String,

    /// Live config checkout, checked for hotfixes
    #[serde(default = "default_current_config")]
    pub current_config: String,

    #[serde(default = "default_python")]
    pub python: String,
}

impl Default for LayoutConfig {
    fn default() -> Self {
        Self {
            version_root: default_version_root(),
            version_prefix: default_version_prefix(),
            code_subdir: default_code_subdir(),
            config_subdir: default_config_subdir(),
            venv_subdir: default_venv_subdir(),
            static_subdir: default_static_subdir(),
            deployment_dir: default_deployment_dir(),
            current_venv: default_current_venv(),
            current_code: default_current_code(),
            current_config: default_current_config(),
            python: default_python(),
        }
    }
}

fn default_version_root() -> String {
    "~".to_string()
}

fn default_version_prefix() -> String {
    "django".to_string()
}

fn default_code_subdir() -> String {
    "code".to_string()
}

fn default_config_subdir() -> String {
    "config".to_string()
}

fn default_venv_subdir() -> String {
    "venv".to_string()
}

fn default_static_subdir() -> String {
    "static".to_string()
}

fn default_deployment_dir() -> String {
    "~/deployment".to_string()
}

fn default_current_venv() -> String {
    "~/venv".to_string()
}

fn default_current_code() -> String {
    "~/django".to_string()
}

fn default_current_config() -> String {
    "~/django-current/config".to_string()
}

fn default_python() -> String {
    "python3".to_string()
}

/// Service manager unit
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServiceConfig {
    #[serde(default = "default_service_name")]
    pub name: String,
}

impl Default for ServiceConfig {
    fn default() -> Self {
        Self {
            name: default_service_name(),
        }
    }
}

fn default_service_name() -> String {
    "app".to_string()
}

/// Operator scripts on the host; each must exit non-zero on failure
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScriptsConfig {
    #[serde(default = "default_maintenance_start")]
    pub maintenance_start: String,

    #[serde(default = "default_maintenance_stop")]
    pub maintenance_stop: String,

    /// Prints the path of the backup it wrote
    #[serde(default = "default_backup")]
    pub backup: String,

    #[serde(default = "default_perform_install")]
    pub perform_install: String,
}

impl Default for ScriptsConfig {
    fn default() -> Self {
        Self {
            maintenance_start: default_maintenance_start(),
            maintenance_stop: default_maintenance_stop(),
            backup: default_backup(),
            perform_install: default_perform_install(),
        }
    }
}

fn default_maintenance_start() -> String {
    "~/scripts/start_maintenance.sh".to_string()
}

fn default_maintenance_stop() -> String {
    "~/scripts/stop_maintenance.sh".to_string()
}

fn default_backup() -> String {
    "~/scripts/backup_database.sh".to_string()
}

fn default_perform_install() -> String {
    "~/django-current/config/perform_install.sh".to_string()
}

/// One git repository
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RepositoryConfig {
    #[serde(default)]
    pub url: String,

    #[serde(default = "default_branch")]
    pub branch: String,
}

impl Default for RepositoryConfig {
    fn default() -> Self {
        Self {
            url: String::new(),
            branch: default_branch(),
        }
    }
}

fn default_branch() -> String {
    "master".to_string()
}

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct RepositoriesConfig {
    #[serde(default)]
    pub code: RepositoryConfig,

    #[serde(default)]
    pub config: RepositoryConfig,
}

/// App-responds check
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HealthConfig {
    #[serde(default)]
    pub url: String,

    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,

    #[serde(default = "default_interval_secs")]
    pub interval_secs: u64,
}

impl Default for HealthConfig {
    fn default() -> Self {
        Self {
            url: String::new(),
            timeout_secs: default_timeout_secs(),
            interval_secs: default_interval_secs(),
        }
    }
}

fn default_timeout_secs() -> u64 {
    60
}

fn default_interval_secs() -> u64 {
    1
}

/// Database backup sanity check
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BackupConfig {
    #[serde(default = "default_min_size_bytes")]
    pub min_size_bytes: u64,
}

impl Default for BackupConfig {
    fn default() -> Self {
        Self {
            min_size_bytes: default_min_size_bytes(),
        }
    }
}

fn default_min_size_bytes() -> u64 {
    100_000
}

/// Deploy lock
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LockConfig {
    #[serde(default = "default_lock_path")]
    pub path: PathBuf,

    /// Block until the lock frees up (`true`) or fail fast (`false`)
    #[serde(default = "default_true")]
    pub wait: bool,
}

impl Default for LockConfig {
    fn default() -> Self {
        Self {
            path: default_lock_path(),
            wait: true,
        }
    }
}

fn default_lock_path() -> PathBuf {
    dirs::runtime_dir()
        .unwrap_or_else(std::env::temp_dir)
        .join("cutover.lock")
}

fn default_true() -> bool {
    true
}

/// Front door settings
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct GateConfig {
    /// `cutover` binary the gate launches (defaults to the sibling binary)
    #[serde(default)]
    pub cutover_bin: Option<PathBuf>,
}

/// Main configuration structure
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct Config {
    #[serde(default)]
    pub host: String,

    #[serde(default)]
    pub ssh: SshConfig,

    #[serde(default)]
    pub identities: IdentitiesConfig,

    #[serde(default)]
    pub layout: LayoutConfig,

    #[serde(default)]
    pub pointers: PointerPaths,

    #[serde(default)]
    pub service: ServiceConfig,

    #[serde(default)]
    pub scripts: ScriptsConfig,

    #[serde(default)]
    pub repositories: RepositoriesConfig,

    #[serde(default)]
    pub health: HealthConfig,

    #[serde(default)]
    pub backup: BackupConfig,

    #[serde(default)]
    pub lock: LockConfig,

    #[serde(default)]
    pub gate: GateConfig,
}

impl Config {
    /// Defaults for everything, pointed at `host`
    pub fn for_host(host: impl Into<String>) -> Self {
        Self {
            host: host.into(),
            ..Self::default()
        }
    }

    /// Load configuration from a TOML file
    pub fn load(path: &Path) -> CutoverResult<Self> {
        let (config, _warnings) = loader::load_with_warnings(path)?;
        Ok(config)
    }

    /// Load configuration and collect non-fatal warnings (e.g. unknown keys).
    pub fn load_with_warnings(path: &Path) -> CutoverResult<(Self, Vec<ConfigWarning>)> {
        loader::load_with_warnings(path)
    }

    /// Resolve, load, override and validate: what the binaries call
    pub fn discover(explicit: Option<&Path>) -> CutoverResult<(Self, PathBuf, Vec<ConfigWarning>)> {
        loader::discover(explicit)
    }

    /// Apply environment variable overrides (CUTOVER_* prefix)
    pub fn with_env_overrides(self) -> Self {
        loader::with_env_overrides(self)
    }

    /// Check that every setting without a sensible default was provided
    pub fn validate(&self, file: &Path) -> CutoverResult<()> {
        let missing = [
            ("host", self.host.trim().is_empty()),
            ("repositories.code.url", self.repositories.code.url.trim().is_empty()),
            (
                "repositories.config.url",
                self.repositories.config.url.trim().is_empty(),
            ),
            ("health.url", self.health.url.trim().is_empty()),
        ];
        let missing: Vec<&str> = missing
            .iter()
            .filter(|(_, is_missing)| *is_missing)
            .map(|(key, _)| *key)
            .collect();
        if !missing.is_empty() {
            return Err(CutoverError::Config {
                file: file.to_path_buf(),
                message: format!("missing required setting(s): {}", missing.join(", ")),
            });
        }
        if self.layout.version_prefix.is_empty() || self.layout.version_prefix.contains('/') {
            return Err(CutoverError::Config {
                file: file.to_path_buf(),
                message: "layout.version_prefix must be a non-empty name without '/'".to_string(),
            });
        }
        if self.health.interval_secs == 0 {
            return Err(CutoverError::Config {
                file: file.to_path_buf(),
                message: "health.interval_secs must be at least 1".to_string(),
            });
        }
        Ok(())
    }

    /// Remote login for an identity
    pub fn user_for(&self, identity: Identity) -> &str {
        match identity {
            Identity::Admin => &self.identities.admin,
            Identity::App => &self.identities.app,
        }
    }
}
