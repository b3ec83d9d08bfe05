//! Backup CLI commands
//!
//! Encrypted backups of the ledger: creation (the routine a scheduler
//! runs), listing, inspection, restore and retention pruning.

use std::path::PathBuf;

use clap::Subcommand;

use crate::audit::{AuditEntry, Operation};
use crate::backup::{
    export_ledger, write_backup, BackupCodec, BackupManager, EncryptedBackup, RestoreManager,
    RestoreMode,
};
use crate::config::Settings;
use crate::crypto::SecretPassword;
use crate::display::{format_backup_list, format_size};
use crate::error::{VaultError, VaultResult};
use crate::storage::Storage;

/// Backup subcommands
#[derive(Subcommand)]
pub enum BackupCommands {
    /// Create an encrypted backup
    Create {
        /// Write to this file instead of the backup directory
        #[arg(short, long)]
        output: Option<PathBuf>,
        /// Skip the retention policy after writing to the backup directory
        #[arg(long)]
        no_prune: bool,
    },

    /// List backups in the backup directory
    List {
        /// Show detailed information
        #[arg(short, long)]
        verbose: bool,
    },

    /// Show backup metadata without decrypting
    Info {
        /// Backup filename or path (use 'latest' for most recent)
        backup: String,
    },

    /// Decrypt a backup and report its contents without restoring
    Verify {
        /// Backup filename or path (use 'latest' for most recent)
        backup: String,
    },

    /// Restore from a backup
    Restore {
        /// Backup filename or path (use 'latest' for most recent)
        backup: String,

        /// Add missing records instead of replacing the ledger
        #[arg(long)]
        merge: bool,

        /// Skip confirmation for a replacing restore
        #[arg(short, long)]
        force: bool,
    },

    /// Delete old backups according to the retention policy
    Prune {
        /// Skip confirmation prompt
        #[arg(short, long)]
        force: bool,
    },
}

/// Handle a backup command
pub fn handle_backup_command(
    storage: &Storage,
    settings: &Settings,
    cmd: BackupCommands,
) -> VaultResult<()> {
    let manager = BackupManager::new(storage.paths().backup_dir(), settings.backup_retention);

    match cmd {
        BackupCommands::Create { output, no_prune } => {
            let codec = BackupCodec::new(settings.crypto)?;
            let password = SecretPassword::prompt_new()?;

            match output {
                Some(path) => {
                    let backup =
                        export_ledger(storage, &settings.preferences, &codec, password.expose())?;
                    write_backup(storage, &backup, &path)?;
                    println!("Backup written to: {}", path.display());
                }
                None if no_prune => {
                    let path = manager.create_backup(
                        storage,
                        &settings.preferences,
                        &codec,
                        password.expose(),
                    )?;
                    println!("Backup created: {}", display_name(&path));
                    println!("Location: {}", path.display());
                }
                None => {
                    let (path, deleted) = manager.create_backup_with_retention(
                        storage,
                        &settings.preferences,
                        &codec,
                        password.expose(),
                    )?;
                    println!("Backup created: {}", display_name(&path));
                    println!("Location: {}", path.display());
                    if !deleted.is_empty() {
                        println!("Pruned {} old backup(s).", deleted.len());
                    }
                }
            }
        }

        BackupCommands::List { verbose } => {
            let backups = manager.list_backups()?;
            print!("{}", format_backup_list(&backups, chrono::Utc::now()));
            if verbose && !backups.is_empty() {
                println!("Directory: {}", manager.backup_dir().display());
            }
        }

        BackupCommands::Info { backup } => {
            let path = manager.resolve(&backup)?;
            let validation = RestoreManager::validate_backup(&path)?;

            println!("Backup Details");
            println!("==============");
            println!("File:        {}", path.display());
            println!("Size:        {}", format_size(validation.size_bytes));
            println!(
                "Created:     {}",
                validation.backup_date.format("%Y-%m-%d %H:%M:%S UTC")
            );
            println!("App version: {}", validation.app_version);
            println!("DB version:  {}", validation.db_version);
            println!();
            println!("Status: {}", validation.summary());
        }

        BackupCommands::Verify { backup } => {
            let path = manager.resolve(&backup)?;
            let contents = std::fs::read_to_string(&path)
                .map_err(|e| VaultError::Io(format!("Failed to read backup file: {}", e)))?;
            let encrypted = EncryptedBackup::from_json(&contents)?;

            let codec = BackupCodec::new(settings.crypto)?;
            let password = SecretPassword::from_env_or_prompt("Backup password: ")?;
            let decoded = codec.import_backup(&encrypted, password.expose())?;

            println!("Backup OK: {}", path.display());
            println!("  Transactions: {}", decoded.transactions.len());
            println!("  Categories:   {}", decoded.categories.len());
        }

        BackupCommands::Restore {
            backup,
            merge,
            force,
        } => {
            let path = manager.resolve(&backup)?;
            let validation = RestoreManager::validate_backup(&path)?;
            let mode = if merge {
                RestoreMode::Merge
            } else {
                RestoreMode::Replace
            };

            println!("{}", validation.summary());
            if !validation.is_restorable() {
                return Err(if validation.schema_supported {
                    VaultError::Decode("encrypted data is malformed".into())
                } else {
                    VaultError::UnsupportedSchema {
                        found: validation.db_version,
                        supported: crate::backup::BACKUP_SCHEMA_VERSION,
                    }
                });
            }

            if mode == RestoreMode::Replace && !force {
                println!();
                println!("WARNING: This will replace ALL current transactions and categories!");
                println!("To proceed, run again with --force, or use --merge to keep existing data:");
                println!("  finvault backup restore {} --force", backup);
                return Ok(());
            }

            let codec = BackupCodec::new(settings.crypto)?;
            let password = SecretPassword::from_env_or_prompt("Backup password: ")?;
            let restore = RestoreManager::new(storage, &codec);
            let decoded = restore.decode_file(&path, password.expose())?;

            if mode == RestoreMode::Replace {
                let safety = manager.create_backup(
                    storage,
                    &settings.preferences,
                    &codec,
                    password.expose(),
                )?;
                println!("Saved current data to: {}", display_name(&safety));
            }

            let result = restore.apply(decoded, mode)?;
            println!("{}", result.summary());
        }

        BackupCommands::Prune { force } => {
            let plan = manager.plan_retention()?;
            let retention = settings.backup_retention;

            println!(
                "Keeping up to {} daily and {} monthly backups",
                retention.daily_count, retention.monthly_count
            );
            if plan.expired.is_empty() {
                println!("Nothing to prune.");
                return Ok(());
            }

            println!(
                "Expired: {} ({} daily, {} monthly)",
                plan.expired.len(),
                plan.expired_daily(),
                plan.expired_monthly()
            );
            for backup in &plan.expired {
                println!("  {}", backup.filename);
            }

            if !force {
                println!();
                println!("Nothing deleted. Re-run with --force to remove them.");
                return Ok(());
            }

            let deleted = manager.enforce_retention()?;
            storage.audit().log(&AuditEntry::backup_event(
                Operation::Prune,
                manager.backup_dir().display().to_string(),
                serde_json::json!({ "deleted": deleted.len() }),
            ))?;
            println!("Deleted {} backup(s).", deleted.len());
        }
    }

    Ok(())
}

fn display_name(path: &std::path::Path) -> String {
    path.file_name()
        .map(|s| s.to_string_lossy().to_string())
        .unwrap_or_else(|| path.display().to_string())
}
