//! Backup restoration
//!
//! A backup is fully decrypted and validated before the ledger is touched.
//! Two modes:
//!
//! - `Replace` (default): the ledger and preferences become exactly the
//!   backup's contents.
//! - `Merge`: records from the backup are added to the existing ledger.
//!   Existing records win on id conflicts, and an incoming category whose
//!   name matches an existing one is folded into it.

use std::collections::HashMap;
use std::fmt;
use std::fs;
use std::path::{Path, PathBuf};

use chrono::{DateTime, Utc};

use crate::audit::{AuditEntry, Operation};
use crate::config::settings::Settings;
use crate::error::{VaultError, VaultResult};
use crate::models::CategoryId;
use crate::storage::Storage;

use super::codec::{BackupCodec, BackupContents, EncryptedBackup, BACKUP_SCHEMA_VERSION};

/// How restored records combine with the current ledger
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum RestoreMode {
    #[default]
    Replace,
    Merge,
}

impl fmt::Display for RestoreMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Replace => write!(f, "replace"),
            Self::Merge => write!(f, "merge"),
        }
    }
}

/// Restores backups into a ledger
pub struct RestoreManager<'a> {
    storage: &'a Storage,
    codec: &'a BackupCodec,
}

impl<'a> RestoreManager<'a> {
    pub fn new(storage: &'a Storage, codec: &'a BackupCodec) -> Self {
        Self { storage, codec }
    }

    /// Read a backup file and restore it
    pub fn restore_from_file(
        &self,
        backup_path: &Path,
        password: &str,
        mode: RestoreMode,
    ) -> VaultResult<RestoreResult> {
        let decoded = self.decode_file(backup_path, password)?;
        self.apply(decoded, mode)
    }

    /// Decrypt and validate a backup file without touching the ledger
    ///
    /// A wrong password fails here, before any caller-side preparation
    /// such as a safety backup is written.
    pub fn decode_file(&self, backup_path: &Path, password: &str) -> VaultResult<DecodedBackup> {
        let backup = read_backup_file(backup_path)?;
        let contents = self.codec.import_backup(&backup, password)?;
        Ok(DecodedBackup {
            contents,
            created_at: backup.metadata.created_at,
            source: backup_path.to_path_buf(),
        })
    }

    /// Write decoded backup contents into the ledger and record it in the
    /// audit log
    pub fn apply(&self, decoded: DecodedBackup, mode: RestoreMode) -> VaultResult<RestoreResult> {
        let DecodedBackup {
            contents,
            created_at,
            source,
        } = decoded;

        let mut result = self.apply_contents(contents, mode)?;
        result.backup_date = created_at;

        let name = source
            .file_name()
            .map(|n| n.to_string_lossy().to_string())
            .unwrap_or_else(|| source.display().to_string());
        self.storage.audit().log(&AuditEntry::backup_event(
            Operation::Restore,
            name,
            serde_json::json!({
                "mode": mode.to_string(),
                "transactionsAdded": result.transactions_added,
                "categoriesAdded": result.categories_added,
            }),
        ))?;

        result.source = Some(source.display().to_string());
        Ok(result)
    }

    /// Restore a parsed backup
    pub fn restore(
        &self,
        backup: &EncryptedBackup,
        password: &str,
        mode: RestoreMode,
    ) -> VaultResult<RestoreResult> {
        let contents = self.codec.import_backup(backup, password)?;
        let mut result = self.apply_contents(contents, mode)?;
        result.backup_date = backup.metadata.created_at;
        Ok(result)
    }

    fn apply_contents(&self, contents: BackupContents, mode: RestoreMode) -> VaultResult<RestoreResult> {
        let result = match mode {
            RestoreMode::Replace => self.replace(contents)?,
            RestoreMode::Merge => self.merge(contents)?,
        };

        tracing::info!(
            %mode,
            transactions = result.transactions_added,
            categories = result.categories_added,
            "Restored backup"
        );
        Ok(result)
    }

    fn replace(&self, contents: BackupContents) -> VaultResult<RestoreResult> {
        let result = RestoreResult {
            mode: RestoreMode::Replace,
            transactions_added: contents.transactions.len(),
            categories_added: contents.categories.len(),
            preferences_restored: true,
            ..Default::default()
        };

        let paths = self.storage.paths();
        let mut settings = Settings::load_or_create(paths)?;
        settings.preferences = contents.preferences;
        let settings_write = settings.stage(paths)?;

        let previous_categories = self.storage.categories.get_all()?;
        let previous_transactions = self.storage.transactions.get_all()?;

        self.storage.categories.replace_all(contents.categories)?;
        self.storage.transactions.replace_all(contents.transactions)?;

        if let Err(e) = self.storage.save_all_with(vec![settings_write]) {
            self.storage.categories.replace_all(previous_categories)?;
            self.storage.transactions.replace_all(previous_transactions)?;
            return Err(e);
        }

        Ok(result)
    }

    fn merge(&self, contents: BackupContents) -> VaultResult<RestoreResult> {
        let mut result = RestoreResult {
            mode: RestoreMode::Merge,
            ..Default::default()
        };

        let existing = self.storage.categories.get_all()?;
        let mut by_name: HashMap<String, CategoryId> = existing
            .iter()
            .map(|c| (c.name.to_lowercase(), c.id))
            .collect();
        let mut remap: HashMap<CategoryId, CategoryId> = HashMap::new();

        for category in contents.categories {
            if self.storage.categories.get(category.id)?.is_some() {
                result.categories_skipped += 1;
                continue;
            }
            if let Some(&existing_id) = by_name.get(&category.name.to_lowercase()) {
                remap.insert(category.id, existing_id);
                result.categories_skipped += 1;
                continue;
            }
            by_name.insert(category.name.to_lowercase(), category.id);
            self.storage.categories.upsert(category)?;
            result.categories_added += 1;
        }

        for mut txn in contents.transactions {
            if self.storage.transactions.exists(txn.id)? {
                result.transactions_skipped += 1;
                continue;
            }
            if let Some(&target) = remap.get(&txn.category_id) {
                txn.category_id = target;
            }
            self.storage.transactions.upsert(txn)?;
            result.transactions_added += 1;
        }

        self.storage.save_all()?;
        Ok(result)
    }

    /// Inspect a backup file without a password
    ///
    /// Only the plaintext metadata and blob framing are checked; the payload
    /// stays sealed.
    pub fn validate_backup(backup_path: &Path) -> VaultResult<ValidationResult> {
        let size_bytes = fs::metadata(backup_path)
            .map_err(|e| VaultError::Io(format!("Failed to read backup file: {}", e)))?
            .len();
        let backup = read_backup_file(backup_path)?;

        let blob_len = crate::crypto::CryptoEnvelope::blob_len(&backup.encrypted_data);

        Ok(ValidationResult {
            app_version: backup.metadata.app_version,
            db_version: backup.metadata.db_version,
            backup_date: backup.metadata.created_at,
            size_bytes,
            schema_supported: backup.metadata.db_version == BACKUP_SCHEMA_VERSION,
            blob_well_formed: blob_len.is_some_and(|n| n >= crate::crypto::MIN_BLOB_SIZE),
        })
    }
}

fn read_backup_file(path: &Path) -> VaultResult<EncryptedBackup> {
    let contents = fs::read_to_string(path)
        .map_err(|e| VaultError::Io(format!("Failed to read backup file: {}", e)))?;
    EncryptedBackup::from_json(&contents)
}

/// A backup that decrypted and passed validation
#[derive(Debug)]
pub struct DecodedBackup {
    pub contents: BackupContents,
    pub created_at: DateTime<Utc>,
    pub source: PathBuf,
}

/// Result of a restore operation
#[derive(Debug, Default)]
pub struct RestoreResult {
    pub mode: RestoreMode,
    pub source: Option<String>,
    pub backup_date: DateTime<Utc>,
    pub transactions_added: usize,
    pub transactions_skipped: usize,
    pub categories_added: usize,
    pub categories_skipped: usize,
    pub preferences_restored: bool,
}

impl RestoreResult {
    pub fn summary(&self) -> String {
        let mut summary = format!(
            "Restored ({}): {} transactions, {} categories",
            self.mode, self.transactions_added, self.categories_added
        );
        if self.transactions_skipped + self.categories_skipped > 0 {
            summary.push_str(&format!(
                "; kept existing {} transactions, {} categories",
                self.transactions_skipped, self.categories_skipped
            ));
        }
        if self.preferences_restored {
            summary.push_str("; preferences restored");
        }
        summary
    }
}

/// Result of inspecting a backup file
#[derive(Debug)]
pub struct ValidationResult {
    pub app_version: String,
    pub db_version: u32,
    pub backup_date: DateTime<Utc>,
    pub size_bytes: u64,
    pub schema_supported: bool,
    /// The blob decodes to at least salt, IV and tag
    pub blob_well_formed: bool,
}

impl ValidationResult {
    pub fn is_restorable(&self) -> bool {
        self.schema_supported && self.blob_well_formed
    }

    pub fn summary(&self) -> String {
        let status = if self.is_restorable() {
            "looks restorable"
        } else if !self.schema_supported {
            "unsupported schema version"
        } else {
            "malformed encrypted data"
        };
        format!(
            "Backup from {} (app {}, schema {}): {}",
            self.backup_date.format("%Y-%m-%d %H:%M:%S UTC"),
            self.app_version,
            self.db_version,
            status
        )
    }
}
