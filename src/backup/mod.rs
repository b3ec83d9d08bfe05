//! Encrypted backups for finvault
//!
//! # Architecture
//!
//! - `BackupCodec`: turns the dataset into an `EncryptedBackup` and back
//! - `BackupManager`: writes dated backup files and enforces retention
//! - `RestoreManager`: validates and restores backups (replace or merge)
//!
//! # Backup Format
//!
//! ```json
//! {
//!   "metadata": { "appVersion": "0.1.0", "dbVersion": 1, "createdAt": "..." },
//!   "encryptedData": "<base64 salt || iv || ciphertext+tag>"
//! }
//! ```
//!
//! # Retention Policy
//!
//! By default the manager keeps 30 daily backups and 12 monthly backups
//! (the first backup of each calendar month).

mod codec;
mod manager;
mod restore;

pub use codec::{
    BackupCodec, BackupContents, BackupMetadata, BackupPayload, EncryptedBackup, APP_VERSION,
    BACKUP_SCHEMA_VERSION,
};
pub use manager::{export_ledger, write_backup, BackupInfo, BackupManager, RetentionPlan};
pub use restore::{DecodedBackup, RestoreManager, RestoreMode, RestoreResult, ValidationResult};
