//! CLI configuration resolution.
//!
//! # Responsibility
//! - Collect global flags (with environment fallbacks) into one config value.
//! - Resolve relative paths before they reach core APIs that require
//!   absolute ones.

use agenda_core::default_log_level;
use clap::Args;
use std::path::{Path, PathBuf};

pub const DEFAULT_DB_FILE: &str = "agenda.db";

/// Flags shared by every subcommand.
#[derive(Debug, Clone, Args)]
pub struct GlobalArgs {
    /// SQLite database file holding the agenda.
    #[arg(long = "db", env = "AGENDA_DB", default_value = DEFAULT_DB_FILE, global = true)]
    pub db_path: PathBuf,
    /// Directory for rolling log files; logging stays off when unset.
    #[arg(long, env = "AGENDA_LOG_DIR", global = true)]
    pub log_dir: Option<PathBuf>,
    /// trace|debug|info|warn|error
    #[arg(long, env = "AGENDA_LOG_LEVEL", global = true)]
    pub log_level: Option<String>,
}

/// Resolved runtime configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AgendaConfig {
    pub db_path: PathBuf,
    pub log_dir: Option<PathBuf>,
    pub log_level: String,
}

impl AgendaConfig {
    /// Builds the config, anchoring a relative log directory at `cwd`.
    pub fn resolve(args: GlobalArgs, cwd: &Path) -> Self {
        Self {
            db_path: args.db_path,
            log_dir: args.log_dir.map(|dir| absolutize(dir, cwd)),
            log_level: args
                .log_level
                .unwrap_or_else(|| default_log_level().to_string()),
        }
    }
}

fn absolutize(path: PathBuf, cwd: &Path) -> PathBuf {
    if path.is_absolute() {
        path
    } else {
        cwd.join(path)
    }
}
