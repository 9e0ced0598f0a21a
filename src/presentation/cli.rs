//! CLI Argument Parsing
//!
//! This module defines the CLI interface using clap.
//!
//! ## Design Notes
//!
//! - Global flags (--config, --json, --verbose) are inherited by all subcommands
//! - Commit tokens are validated while parsing, so a bad token exits 2 before
//!   anything touches the host

use std::path::PathBuf;

use clap::{Parser, Subcommand};

use crate::domain::value_objects::CommitRef;

/// Cutover - versioned, reversible upgrades of a Django host
#[derive(Parser, Debug)]
#[command(name = "cutover")]
#[command(author, version, about, long_about = None)]
#[command(after_help = "Exit codes: 0 ok, 1/99 fallback restored the previous version, \
2 invalid input, 3/98 deploy failed before the switch (app untouched), 75 lock busy, \
101 external failure, 130 interrupted, 199 internal error.")]
pub struct Cli {
    /// Configuration file (default: ./cutover.toml, then the user config dir)
    #[arg(long, global = true, env = "CUTOVER_CONFIG", value_name = "PATH")]
    pub config: Option<PathBuf>,

    /// Output format for CI
    #[arg(long, global = true)]
    pub json: bool,

    /// Verbosity level (-v, -vv)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Build a new version, switch to it and verify it (falls back on failure)
    Deploy {
        /// Code repository commit
        #[arg(value_parser = CommitRef::parse)]
        code_commit: CommitRef,

        /// Config repository commit
        #[arg(value_parser = CommitRef::parse)]
        config_commit: CommitRef,

        /// Skip the check for uncommitted changes on the live checkouts
        #[arg(long)]
        no_check_hotfixes: bool,

        /// Skip the database backup
        #[arg(long)]
        no_backup: bool,
    },

    /// Build a new version directory and print its name
    CreateVersion {
        /// Code repository commit
        #[arg(value_parser = CommitRef::parse)]
        code_commit: CommitRef,

        /// Config repository commit
        #[arg(value_parser = CommitRef::parse)]
        config_commit: CommitRef,
    },

    /// Switch to an existing version (no automatic fallback)
    ChangeVersion {
        /// Version directory name, e.g. django-20190505-180000-abcdef-fedcba
        name: String,

        /// Do not run migrations
        #[arg(long)]
        no_migrate: bool,

        /// Run collectstatic
        #[arg(long)]
        collect_static: bool,

        /// Do not clear the cache
        #[arg(long)]
        no_clear_cache: bool,

        /// Run compress
        #[arg(long)]
        compress: bool,

        /// Run the version's install script before migrating
        #[arg(long)]
        prepare_install: bool,
    },

    /// Stop and start the app
    Restart,

    /// List versions and the pointers targeting them
    ListVersions,

    /// Delete one unprotected version
    #[command(alias = "delete")]
    DeleteVersion {
        /// Version directory name
        name: String,
    },

    /// Delete all but the newest versions (protected versions always stay)
    DeleteOldVersions {
        /// Number of newest versions to keep
        #[arg(long, default_value_t = 10)]
        to_keep: usize,
    },

    /// Check the live checkouts for uncommitted changes and unpushed commits
    CheckUncommitted,
}

impl Commands {
    /// Whether the command changes host state and must hold the deploy lock
    pub fn is_mutating(&self) -> bool {
        !matches!(self, Commands::ListVersions | Commands::CheckUncommitted)
    }

    /// Name used in summary lines
    pub fn name(&self) -> &'static str {
        match self {
            Commands::Deploy { .. } => "deploy",
            Commands::CreateVersion { .. } => "create-version",
            Commands::ChangeVersion { .. } => "change-version",
            Commands::Restart => "restart",
            Commands::ListVersions => "list-versions",
            Commands::DeleteVersion { .. } => "delete-version",
            Commands::DeleteOldVersions { .. } => "delete-old-versions",
            Commands::CheckUncommitted => "check-uncommitted",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cli_parse_deploy() {
        let cli = Cli::try_parse_from(["cutover", "deploy", "abc123", "def456"]).unwrap();
        if let Commands::Deploy {
            code_commit,
            config_commit,
            no_check_hotfixes,
            no_backup,
        } = cli.command
        {
            assert_eq!(code_commit.as_str(), "abc123");
            assert_eq!(config_commit.as_str(), "def456");
            assert!(!no_check_hotfixes);
            assert!(!no_backup);
        } else {
            panic!("Expected Deploy command");
        }
    }

    #[test]
    fn test_cli_parse_deploy_flags() {
        let cli = Cli::try_parse_from([
            "cutover",
            "deploy",
            "abc",
            "def",
            "--no-check-hotfixes",
            "--no-backup",
        ])
        .unwrap();
        if let Commands::Deploy {
            no_check_hotfixes,
            no_backup,
            ..
        } = cli.command
        {
            assert!(no_check_hotfixes);
            assert!(no_backup);
        } else {
            panic!("Expected Deploy command");
        }
    }

    #[test]
    fn test_cli_rejects_invalid_commit() {
        let err = Cli::try_parse_from(["cutover", "deploy", "abc;rm", "def"]).unwrap_err();
        assert_eq!(err.exit_code(), 2);
    }

    #[test]
    fn test_cli_deploy_requires_both_commits() {
        assert!(Cli::try_parse_from(["cutover", "deploy", "abc"]).is_err());
    }

    #[test]
    fn test_cli_parse_change_version_defaults() {
        let cli = Cli::try_parse_from([
            "cutover",
            "change-version",
            "django-20240101-120000-abcdef-fedcba",
        ])
        .unwrap();
        if let Commands::ChangeVersion {
            name,
            no_migrate,
            collect_static,
            no_clear_cache,
            compress,
            prepare_install,
        } = cli.command
        {
            assert_eq!(name, "django-20240101-120000-abcdef-fedcba");
            assert!(!no_migrate);
            assert!(!collect_static);
            assert!(!no_clear_cache);
            assert!(!compress);
            assert!(!prepare_install);
        } else {
            panic!("Expected ChangeVersion command");
        }
    }

    #[test]
    fn test_cli_parse_delete_alias() {
        let cli = Cli::try_parse_from(["cutover", "delete", "django-1"]).unwrap();
        assert!(matches!(cli.command, Commands::DeleteVersion { ref name } if name == "django-1"));
    }

    #[test]
    fn test_cli_delete_old_versions_default_keep() {
        let cli = Cli::try_parse_from(["cutover", "delete-old-versions"]).unwrap();
        assert!(matches!(cli.command, Commands::DeleteOldVersions { to_keep: 10 }));

        let cli = Cli::try_parse_from(["cutover", "delete-old-versions", "--to-keep", "3"]).unwrap();
        assert!(matches!(cli.command, Commands::DeleteOldVersions { to_keep: 3 }));
    }

    #[test]
    fn test_cli_global_flags_after_subcommand() {
        let cli = Cli::try_parse_from([
            "cutover",
            "list-versions",
            "--json",
            "-vv",
            "--config",
            "/etc/cutover.toml",
        ])
        .unwrap();
        assert!(cli.json);
        assert_eq!(cli.verbose, 2);
        assert_eq!(cli.config, Some(PathBuf::from("/etc/cutover.toml")));
    }

    #[test]
    fn test_read_only_commands_skip_the_lock() {
        let cli = Cli::try_parse_from(["cutover", "list-versions"]).unwrap();
        assert!(!cli.command.is_mutating());
        let cli = Cli::try_parse_from(["cutover", "check-uncommitted"]).unwrap();
        assert!(!cli.command.is_mutating());
        let cli = Cli::try_parse_from(["cutover", "restart"]).unwrap();
        assert!(cli.command.is_mutating());
    }

    #[test]
    fn test_deploy_has_no_way_to_skip_the_lock() {
        assert!(Cli::try_parse_from(["cutover", "deploy", "--lock-held", "abc", "def"]).is_err());
        let cli = Cli::try_parse_from(["cutover", "deploy", "abc", "def"]).unwrap();
        assert!(cli.command.is_mutating());
    }
}
