//! User settings for finvault
//!
//! Holds display preferences (which travel inside backups), the KDF strategy
//! used for backup encryption, and the backup retention policy.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use super::paths::FinvaultPaths;
use crate::crypto::CryptoConfig;
use crate::error::{VaultError, VaultResult};
use crate::storage::{stage_json, StagedWrite};

/// Current settings schema version
pub const SETTINGS_SCHEMA_VERSION: u32 = 1;

/// Field separator for CSV exports
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum CsvDelimiter {
    #[default]
    Comma,
    Semicolon,
}

impl CsvDelimiter {
    pub fn as_byte(&self) -> u8 {
        match self {
            Self::Comma => b',',
            Self::Semicolon => b';',
        }
    }
}

impl fmt::Display for CsvDelimiter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Comma => write!(f, "comma"),
            Self::Semicolon => write!(f, "semicolon"),
        }
    }
}

impl FromStr for CsvDelimiter {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "comma" | "," => Ok(Self::Comma),
            "semicolon" | ";" => Ok(Self::Semicolon),
            other => Err(format!("Unknown delimiter: {} (use comma or semicolon)", other)),
        }
    }
}

/// Preferences that describe how the user reads their ledger
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserPreferences {
    #[serde(default = "default_currency")]
    pub currency_symbol: String,

    /// strftime format used when printing dates
    #[serde(default = "default_date_format")]
    pub date_format: String,

    /// 0 = Sunday, 1 = Monday
    #[serde(default = "default_first_day_of_week")]
    pub first_day_of_week: u8,

    #[serde(default)]
    pub csv_delimiter: CsvDelimiter,
}

fn default_currency() -> String {
    "$".to_string()
}

fn default_date_format() -> String {
    "%Y-%m-%d".to_string()
}

fn default_first_day_of_week() -> u8 {
    1
}

impl Default for UserPreferences {
    fn default() -> Self {
        Self {
            currency_symbol: default_currency(),
            date_format: default_date_format(),
            first_day_of_week: default_first_day_of_week(),
            csv_delimiter: CsvDelimiter::default(),
        }
    }
}

/// Backup retention settings
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct BackupRetention {
    /// Number of daily backups to keep
    pub daily_count: u32,
    /// Number of monthly backups to keep
    pub monthly_count: u32,
}

impl Default for BackupRetention {
    fn default() -> Self {
        Self {
            daily_count: 30,
            monthly_count: 12,
        }
    }
}

/// User settings for finvault
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Settings {
    #[serde(default = "default_schema_version")]
    pub schema_version: u32,

    #[serde(default)]
    pub preferences: UserPreferences,

    /// Key-derivation strategy for backup encryption
    #[serde(default)]
    pub crypto: CryptoConfig,

    #[serde(default)]
    pub backup_retention: BackupRetention,

    #[serde(default)]
    pub setup_completed: bool,
}

fn default_schema_version() -> u32 {
    SETTINGS_SCHEMA_VERSION
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            schema_version: default_schema_version(),
            preferences: UserPreferences::default(),
            crypto: CryptoConfig::default(),
            backup_retention: BackupRetention::default(),
            setup_completed: false,
        }
    }
}

impl Settings {
    /// Load settings from disk, or defaults if the file doesn't exist yet
    pub fn load_or_create(paths: &FinvaultPaths) -> VaultResult<Self> {
        let settings_path = paths.settings_file();

        if !settings_path.exists() {
            return Ok(Settings::default());
        }

        let contents = std::fs::read_to_string(&settings_path)
            .map_err(|e| VaultError::Io(format!("Failed to read settings file: {}", e)))?;

        let settings: Settings = serde_json::from_str(&contents)
            .map_err(|e| VaultError::Config(format!("Failed to parse settings file: {}", e)))?;

        settings.crypto.validate()?;
        Ok(settings)
    }

    /// Save settings to disk
    pub fn save(&self, paths: &FinvaultPaths) -> VaultResult<()> {
        self.stage(paths)?.commit()
    }

    /// Write the settings to a temp file for a later commit
    pub fn stage(&self, paths: &FinvaultPaths) -> VaultResult<StagedWrite> {
        paths.ensure_directories()?;
        stage_json(paths.settings_file(), self)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::crypto::KdfAlgorithm;
    use tempfile::TempDir;

    #[test]
    fn test_default_settings() {
        let settings = Settings::default();
        assert_eq!(settings.schema_version, SETTINGS_SCHEMA_VERSION);
        assert_eq!(settings.backup_retention.daily_count, 30);
        assert_eq!(settings.backup_retention.monthly_count, 12);
        assert_eq!(settings.preferences.csv_delimiter, CsvDelimiter::Comma);
        assert_eq!(settings.crypto, CryptoConfig::default());
    }

    #[test]
    fn test_save_and_load() {
        let temp_dir = TempDir::new().unwrap();
        let paths = FinvaultPaths::with_base_dir(temp_dir.path());

        let mut settings = Settings::default();
        settings.preferences.currency_symbol = "R$".into();
        settings.preferences.csv_delimiter = CsvDelimiter::Semicolon;
        settings.crypto = CryptoConfig::pbkdf2(100_000);
        settings.setup_completed = true;
        settings.save(&paths).unwrap();

        let loaded = Settings::load_or_create(&paths).unwrap();
        assert_eq!(loaded.preferences.currency_symbol, "R$");
        assert_eq!(loaded.preferences.csv_delimiter, CsvDelimiter::Semicolon);
        assert_eq!(
            loaded.crypto.kdf,
            KdfAlgorithm::Pbkdf2Sha256 {
                iterations: 100_000
            }
        );
        assert!(loaded.setup_completed);
    }

    #[test]
    fn test_missing_fields_use_defaults() {
        let settings: Settings = serde_json::from_str("{}").unwrap();
        assert_eq!(settings.preferences, UserPreferences::default());
        assert_eq!(settings.crypto, CryptoConfig::default());
    }

    #[test]
    fn test_invalid_crypto_rejected_on_load() {
        let temp_dir = TempDir::new().unwrap();
        let paths = FinvaultPaths::with_base_dir(temp_dir.path());
        paths.ensure_directories().unwrap();
        std::fs::write(
            paths.settings_file(),
            r#"{"crypto":{"kdf":{"algorithm":"pbkdf2_sha256","iterations":0}}}"#,
        )
        .unwrap();

        assert!(matches!(
            Settings::load_or_create(&paths),
            Err(VaultError::Config(_))
        ));
    }

    #[test]
    fn test_delimiter_parse() {
        assert_eq!("semicolon".parse::<CsvDelimiter>(), Ok(CsvDelimiter::Semicolon));
        assert_eq!(",".parse::<CsvDelimiter>(), Ok(CsvDelimiter::Comma));
        assert!("tab".parse::<CsvDelimiter>().is_err());
        assert_eq!(CsvDelimiter::Semicolon.as_byte(), b';');
    }
}
