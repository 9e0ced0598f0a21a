//! Configuration loading

use std::fs;
use std::path::{Path, PathBuf};

use crate::error::{CutoverError, CutoverResult};

use super::types::Config;

/// File name looked up in the working directory
pub const LOCAL_CONFIG_FILE: &str = "cutover.toml";

/// Non-fatal configuration warning surfaced to CLI users.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConfigWarning {
    pub key: String,
    pub file: PathBuf,
    pub line: Option<usize>,
    pub suggestion: Option<String>,
}

impl std::fmt::Display for ConfigWarning {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "unknown key '{}' in {}", self.key, self.file.display())?;
        if let Some(line) = self.line {
            write!(f, ":{}", line)?;
        }
        if let Some(suggestion) = &self.suggestion {
            write!(f, " (did you mean '{}'?)", suggestion)?;
        }
        Ok(())
    }
}

/// Load configuration and collect non-fatal warnings (e.g. unknown keys).
pub fn load_with_warnings(path: &Path) -> CutoverResult<(Config, Vec<ConfigWarning>)> {
    let content = fs::read_to_string(path).map_err(|e| CutoverError::Config {
        file: path.to_path_buf(),
        message: e.to_string(),
    })?;

    let mut ignored = Vec::new();
    let config: Config = serde_ignored::deserialize(toml::de::Deserializer::new(&content), |p| {
        ignored.push(p.to_string())
    })
    .map_err(|e| CutoverError::Config {
        file: path.to_path_buf(),
        message: e.to_string(),
    })?;

    let warnings = ignored
        .iter()
        .map(|dotted| {
            let key = dotted.rsplit('.').next().unwrap_or(dotted);
            ConfigWarning {
                key: key.to_string(),
                file: path.to_path_buf(),
                line: find_line_number(&content, key),
                suggestion: suggest_key(key),
            }
        })
        .collect();

    Ok((config, warnings))
}

/// Pick the config file: explicit path, `./cutover.toml`, then the user
/// config dir. Returns `None` when nothing exists.
pub fn locate(explicit: Option<&Path>) -> Option<PathBuf> {
    if let Some(path) = explicit {
        return Some(path.to_path_buf());
    }

    let local = PathBuf::from(LOCAL_CONFIG_FILE);
    if local.exists() {
        return Some(local);
    }

    dirs::config_dir()
        .map(|dir| dir.join("cutover/config.toml"))
        .filter(|p| p.exists())
}

/// Locate, load, apply env overrides and validate
pub fn discover(explicit: Option<&Path>) -> CutoverResult<(Config, PathBuf, Vec<ConfigWarning>)> {
    let path = locate(explicit).ok_or_else(|| CutoverError::Config {
        file: PathBuf::from(LOCAL_CONFIG_FILE),
        message: "no configuration found (pass --config, set CUTOVER_CONFIG or create cutover.toml)"
            .to_string(),
    })?;

    let (config, warnings) = load_with_warnings(&path)?;
    let config = with_env_overrides(config);
    config.validate(&path)?;
    Ok((config, path, warnings))
}

/// Apply environment variable overrides (CUTOVER_* prefix)
pub fn with_env_overrides(mut config: Config) -> Config {
    // CUTOVER_HOST
    if let Ok(host) = std::env::var("CUTOVER_HOST") {
        if !host.trim().is_empty() {
            config.host = host.trim().to_string();
        }
    }

    // CUTOVER_HEALTH_URL
    if let Ok(url) = std::env::var("CUTOVER_HEALTH_URL") {
        if !url.trim().is_empty() {
            config.health.url = url.trim().to_string();
        }
    }

    // CUTOVER_LOCK_PATH
    if let Ok(path) = std::env::var("CUTOVER_LOCK_PATH") {
        if !path.trim().is_empty() {
            config.lock.path = PathBuf::from(path.trim());
        }
    }

    config
}

/// First line mentioning `key`, 1-based
fn find_line_number(content: &str, key: &str) -> Option<usize> {
    content
        .lines()
        .position(|line| line.trim_start().starts_with(key))
        .map(|index| index + 1)
}

/// Closest known key within two edits
fn suggest_key(unknown: &str) -> Option<String> {
    const CANDIDATES: &[&str] = &[
        "host",
        "ssh",
        "binary",
        "options",
        "port",
        "identities",
        "admin",
        "app",
        "layout",
        "version_root",
        "version_prefix",
        "code_subdir",
        "config_subdir",
        "venv_subdir",
        "static_subdir",
        "deployment_dir",
        "current_venv",
        "current_code",
        "current_config",
        "python",
        "pointers",
        "current",
        "previous",
        "working",
        "previous_working",
        "service",
        "name",
        "scripts",
        "maintenance_start",
        "maintenance_stop",
        "backup",
        "perform_install",
        "repositories",
        "code",
        "config",
        "url",
        "branch",
        "health",
        "timeout_secs",
        "interval_secs",
        "min_size_bytes",
        "lock",
        "path",
        "wait",
        "gate",
        "cutover_bin",
    ];

    CANDIDATES
        .iter()
        .map(|candidate| (edit_distance(unknown, candidate), *candidate))
        .min()
        .filter(|(distance, _)| *distance <= 2)
        .map(|(_, candidate)| candidate.to_string())
}

/// Levenshtein distance over bytes, single-row
fn edit_distance(a: &str, b: &str) -> usize {
    let b = b.as_bytes();
    let mut row: Vec<usize> = (0..=b.len()).collect();
    for (i, &ca) in a.as_bytes().iter().enumerate() {
        let mut diagonal = row[0];
        row[0] = i + 1;
        for (j, &cb) in b.iter().enumerate() {
            let above = row[j + 1];
            row[j + 1] = (above + 1)
                .min(row[j] + 1)
                .min(diagonal + usize::from(ca != cb));
            diagonal = above;
        }
    }
    row[b.len()]
}
