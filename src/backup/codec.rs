//! Backup codec
//!
//! Converts the live dataset (transactions, categories, user preferences)
//! into a canonical JSON payload, seals it with a [`CryptoEnvelope`], and
//! wraps the blob with plaintext metadata. Import is the mirror image.
//!
//! Failure classes on import:
//! - `Decode`: malformed base64 or truncated blob
//! - `Authentication`: wrong password or tampered data (never told apart)
//! - `PayloadCorrupt`: decrypted fine, but the structure is invalid
//! - `UnsupportedSchema`: valid structure with an unknown version

use std::collections::HashSet;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use zeroize::Zeroizing;

use crate::config::UserPreferences;
use crate::crypto::{CryptoConfig, CryptoEnvelope};
use crate::error::{VaultError, VaultResult};
use crate::models::{Category, Transaction};

/// Payload schema version this build writes and reads
pub const BACKUP_SCHEMA_VERSION: u32 = 1;

/// Application version recorded in backup metadata
pub const APP_VERSION: &str = env!("CARGO_PKG_VERSION");

/// Plaintext metadata stored next to the encrypted blob
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BackupMetadata {
    pub app_version: String,
    /// Schema version of the sealed payload; gates import compatibility
    pub db_version: u32,
    pub created_at: DateTime<Utc>,
}

/// The exchange format written to backup files
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EncryptedBackup {
    pub metadata: BackupMetadata,
    /// base64(salt ∥ iv ∥ ciphertext+tag)
    pub encrypted_data: String,
}

impl EncryptedBackup {
    /// Parse a backup file's contents
    ///
    /// Anything that is not the expected JSON shape is a `Decode` error.
    pub fn from_json(contents: &str) -> VaultResult<Self> {
        serde_json::from_str(contents)
            .map_err(|e| VaultError::Decode(format!("Invalid backup file: {}", e)))
    }

    pub fn to_json(&self) -> VaultResult<String> {
        serde_json::to_string_pretty(self)
            .map_err(|e| VaultError::Json(format!("Failed to serialize backup: {}", e)))
    }
}

/// The structure sealed inside the envelope
///
/// Field order is fixed by declaration order; collections are sorted by
/// [`BackupPayload::new`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BackupPayload {
    pub schema_version: u32,
    pub transactions: Vec<Transaction>,
    pub categories: Vec<Category>,
    pub user_preferences: UserPreferences,
}

impl BackupPayload {
    /// Build a canonical payload: transactions by (date, id), categories
    /// by (name, id)
    pub fn new(
        transactions: &[Transaction],
        categories: &[Category],
        preferences: &UserPreferences,
    ) -> Self {
        let mut transactions = transactions.to_vec();
        transactions.sort_by(|a, b| a.date.cmp(&b.date).then(a.id.cmp(&b.id)));

        let mut categories = categories.to_vec();
        categories.sort_by(|a, b| a.name.cmp(&b.name).then(a.id.cmp(&b.id)));

        Self {
            schema_version: BACKUP_SCHEMA_VERSION,
            transactions,
            categories,
            user_preferences: preferences.clone(),
        }
    }

    /// Structural checks that serde cannot express
    fn check_integrity(&self) -> VaultResult<()> {
        let mut category_ids = HashSet::with_capacity(self.categories.len());
        for category in &self.categories {
            if !category_ids.insert(category.id) {
                return Err(VaultError::PayloadCorrupt(format!(
                    "duplicate category id {}",
                    category.id.to_full_string()
                )));
            }
        }

        let mut transaction_ids = HashSet::with_capacity(self.transactions.len());
        for txn in &self.transactions {
            if !transaction_ids.insert(txn.id) {
                return Err(VaultError::PayloadCorrupt(format!(
                    "duplicate transaction id {}",
                    txn.id.to_full_string()
                )));
            }
            if !category_ids.contains(&txn.category_id) {
                return Err(VaultError::PayloadCorrupt(format!(
                    "transaction {} references missing category {}",
                    txn.id.to_full_string(),
                    txn.category_id.to_full_string()
                )));
            }
            if txn.amount.is_negative() {
                return Err(VaultError::PayloadCorrupt(format!(
                    "transaction {} has a negative amount",
                    txn.id.to_full_string()
                )));
            }
        }

        Ok(())
    }
}

/// Everything a backup restores
#[derive(Debug, Clone, PartialEq)]
pub struct BackupContents {
    pub transactions: Vec<Transaction>,
    pub categories: Vec<Category>,
    pub preferences: UserPreferences,
}

/// Encodes and decodes encrypted backups
#[derive(Debug, Clone)]
pub struct BackupCodec {
    envelope: CryptoEnvelope,
}

impl BackupCodec {
    /// Create a codec; fails if the crypto configuration is invalid
    pub fn new(config: CryptoConfig) -> VaultResult<Self> {
        Ok(Self {
            envelope: CryptoEnvelope::new(config)?,
        })
    }

    pub fn envelope(&self) -> &CryptoEnvelope {
        &self.envelope
    }

    /// Serialize and encrypt the dataset
    pub fn export_backup(
        &self,
        transactions: &[Transaction],
        categories: &[Category],
        preferences: &UserPreferences,
        password: &str,
    ) -> VaultResult<EncryptedBackup> {
        let payload = BackupPayload::new(transactions, categories, preferences);
        let plaintext = Zeroizing::new(
            serde_json::to_vec(&payload)
                .map_err(|e| VaultError::Json(format!("Failed to serialize backup payload: {}", e)))?,
        );

        let encrypted_data = self.envelope.encrypt(&plaintext, password)?;

        tracing::info!(
            transactions = payload.transactions.len(),
            categories = payload.categories.len(),
            "Encrypted backup payload"
        );

        Ok(EncryptedBackup {
            metadata: BackupMetadata {
                app_version: APP_VERSION.to_string(),
                db_version: BACKUP_SCHEMA_VERSION,
                created_at: Utc::now(),
            },
            encrypted_data,
        })
    }

    /// Decrypt, parse and validate a backup
    pub fn import_backup(
        &self,
        backup: &EncryptedBackup,
        password: &str,
    ) -> VaultResult<BackupContents> {
        check_schema_version(backup.metadata.db_version)?;

        let plaintext = Zeroizing::new(self.envelope.decrypt(&backup.encrypted_data, password)?);

        let value: serde_json::Value = serde_json::from_slice(&plaintext)
            .map_err(|e| VaultError::PayloadCorrupt(format!("not valid JSON: {}", e)))?;

        let version = value
            .get("schemaVersion")
            .and_then(serde_json::Value::as_u64)
            .ok_or_else(|| VaultError::PayloadCorrupt("missing schemaVersion".into()))?;
        check_schema_version(u32::try_from(version).unwrap_or(u32::MAX))?;

        let payload: BackupPayload = serde_json::from_value(value)
            .map_err(|e| VaultError::PayloadCorrupt(e.to_string()))?;
        payload.check_integrity()?;

        tracing::info!(
            transactions = payload.transactions.len(),
            categories = payload.categories.len(),
            "Decrypted backup payload"
        );

        Ok(BackupContents {
            transactions: payload.transactions,
            categories: payload.categories,
            preferences: payload.user_preferences,
        })
    }
}

fn check_schema_version(found: u32) -> VaultResult<()> {
    if found == BACKUP_SCHEMA_VERSION {
        Ok(())
    } else {
        Err(VaultError::UnsupportedSchema {
            found,
            supported: BACKUP_SCHEMA_VERSION,
        })
    }
}
