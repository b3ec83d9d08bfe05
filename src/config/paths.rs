//! Path management for finvault
//!
//! ## Path Resolution Order
//!
//! 1. `FINVAULT_DATA_DIR` environment variable (if set)
//! 2. The platform config directory from `directories::ProjectDirs`
//!    (`~/.config/finvault` on Linux)

use std::path::{Path, PathBuf};

use directories::ProjectDirs;

use crate::error::{VaultError, VaultResult};

/// Environment variable overriding the base directory
pub const DATA_DIR_ENV_VAR: &str = "FINVAULT_DATA_DIR";

/// Manages all paths used by finvault
#[derive(Debug, Clone)]
pub struct FinvaultPaths {
    base_dir: PathBuf,
}

impl FinvaultPaths {
    /// Resolve the base directory from the environment or the platform default
    pub fn new() -> VaultResult<Self> {
        let base_dir = match std::env::var_os(DATA_DIR_ENV_VAR) {
            Some(custom) if !custom.is_empty() => PathBuf::from(custom),
            _ => ProjectDirs::from("", "", "finvault")
                .map(|dirs| dirs.config_dir().to_path_buf())
                .ok_or_else(|| {
                    VaultError::Config("Could not determine a home directory".into())
                })?,
        };

        Ok(Self { base_dir })
    }

    /// Use an explicit base directory (tests, `--data-dir`)
    pub fn with_base_dir(base_dir: impl Into<PathBuf>) -> Self {
        Self {
            base_dir: base_dir.into(),
        }
    }

    pub fn base_dir(&self) -> &Path {
        &self.base_dir
    }

    /// Ledger files live here
    pub fn data_dir(&self) -> PathBuf {
        self.base_dir.join("data")
    }

    /// Default destination of scheduled backups
    pub fn backup_dir(&self) -> PathBuf {
        self.base_dir.join("backups")
    }

    pub fn settings_file(&self) -> PathBuf {
        self.base_dir.join("config.json")
    }

    pub fn audit_log(&self) -> PathBuf {
        self.base_dir.join("audit.log")
    }

    pub fn transactions_file(&self) -> PathBuf {
        self.data_dir().join("transactions.json")
    }

    pub fn categories_file(&self) -> PathBuf {
        self.data_dir().join("categories.json")
    }

    /// Create the base, data and backup directories
    pub fn ensure_directories(&self) -> VaultResult<()> {
        for dir in [self.base_dir.clone(), self.data_dir(), self.backup_dir()] {
            std::fs::create_dir_all(&dir).map_err(|e| {
                VaultError::Io(format!("Failed to create {}: {}", dir.display(), e))
            })?;
        }
        Ok(())
    }

    /// A ledger is initialized once its settings file exists
    pub fn is_initialized(&self) -> bool {
        self.settings_file().exists()
    }
}
