//! Backup manager for finvault
//!
//! Writes encrypted backups as dated JSON files and applies the retention
//! policy. `create_backup_with_retention` is the entry point an external
//! scheduler calls.

use std::fs;
use std::path::{Path, PathBuf};

use chrono::{DateTime, Datelike, NaiveDate, Utc};
use serde::Serialize;

use crate::audit::{AuditEntry, Operation};
use crate::config::settings::{BackupRetention, UserPreferences};
use crate::error::{VaultError, VaultResult};
use crate::storage::{write_json_atomic, Storage};

use super::codec::{BackupCodec, EncryptedBackup};

/// A backup file found on disk
#[derive(Debug, Clone, Serialize)]
pub struct BackupInfo {
    pub filename: String,
    pub path: PathBuf,
    /// Parsed from the file name
    pub created_at: DateTime<Utc>,
    pub size_bytes: u64,
    /// First backup of its calendar month; kept under the monthly quota
    pub is_monthly: bool,
}

/// Outcome of applying the retention quotas to the current backups
#[derive(Debug, Default)]
pub struct RetentionPlan {
    pub kept_daily: usize,
    pub kept_monthly: usize,
    /// Backups to delete, newest first
    pub expired: Vec<BackupInfo>,
}

impl RetentionPlan {
    pub fn expired_daily(&self) -> usize {
        self.expired.iter().filter(|b| !b.is_monthly).count()
    }

    pub fn expired_monthly(&self) -> usize {
        self.expired.iter().filter(|b| b.is_monthly).count()
    }
}

/// Manages backup creation and retention
pub struct BackupManager {
    backup_dir: PathBuf,
    retention: BackupRetention,
}

impl BackupManager {
    pub fn new(backup_dir: PathBuf, retention: BackupRetention) -> Self {
        Self {
            backup_dir,
            retention,
        }
    }

    /// File name for a backup created at `timestamp`
    pub fn backup_filename(timestamp: DateTime<Utc>) -> String {
        format!(
            "backup-{}-{:03}.json",
            timestamp.format("%Y%m%d-%H%M%S"),
            timestamp.timestamp_subsec_millis()
        )
    }

    /// Encrypt the current ledger into the backup directory
    pub fn create_backup(
        &self,
        storage: &Storage,
        preferences: &UserPreferences,
        codec: &BackupCodec,
        password: &str,
    ) -> VaultResult<PathBuf> {
        let backup = export_ledger(storage, preferences, codec, password)?;
        let path = self
            .backup_dir
            .join(Self::backup_filename(backup.metadata.created_at));
        write_backup(storage, &backup, &path)?;
        Ok(path)
    }

    /// Create a backup and then enforce the retention policy
    pub fn create_backup_with_retention(
        &self,
        storage: &Storage,
        preferences: &UserPreferences,
        codec: &BackupCodec,
        password: &str,
    ) -> VaultResult<(PathBuf, Vec<PathBuf>)> {
        let path = self.create_backup(storage, preferences, codec, password)?;
        let deleted = self.enforce_retention()?;
        if !deleted.is_empty() {
            storage.audit().log(&AuditEntry::backup_event(
                Operation::Prune,
                self.backup_dir.display().to_string(),
                serde_json::json!({ "deleted": deleted.len() }),
            ))?;
        }
        Ok((path, deleted))
    }

    /// All backups in the backup directory, newest first
    pub fn list_backups(&self) -> VaultResult<Vec<BackupInfo>> {
        if !self.backup_dir.exists() {
            return Ok(Vec::new());
        }

        let mut backups = Vec::new();
        let entries = fs::read_dir(&self.backup_dir)
            .map_err(|e| VaultError::Io(format!("Failed to read backup directory: {}", e)))?;

        for entry in entries {
            let entry = entry
                .map_err(|e| VaultError::Io(format!("Failed to read directory entry: {}", e)))?;
            if let Some(info) = parse_backup_info(&entry.path()) {
                backups.push(info);
            }
        }

        backups.sort_by(|a, b| a.created_at.cmp(&b.created_at));
        let mut last_month = None;
        for backup in &mut backups {
            let month = (backup.created_at.year(), backup.created_at.month());
            backup.is_monthly = last_month != Some(month);
            last_month = Some(month);
        }
        backups.reverse();

        Ok(backups)
    }

    /// Work out which backups fall outside the daily and monthly quotas
    pub fn plan_retention(&self) -> VaultResult<RetentionPlan> {
        let mut plan = RetentionPlan::default();
        let mut daily_seen = 0u32;
        let mut monthly_seen = 0u32;

        // Newest first, so the first N of each kind survive
        for backup in self.list_backups()? {
            let (seen, quota) = if backup.is_monthly {
                (&mut monthly_seen, self.retention.monthly_count)
            } else {
                (&mut daily_seen, self.retention.daily_count)
            };
            *seen += 1;
            if *seen > quota {
                plan.expired.push(backup);
            } else if backup.is_monthly {
                plan.kept_monthly += 1;
            } else {
                plan.kept_daily += 1;
            }
        }

        Ok(plan)
    }

    /// Delete backups beyond the daily and monthly quotas
    ///
    /// Returns the deleted paths.
    pub fn enforce_retention(&self) -> VaultResult<Vec<PathBuf>> {
        let plan = self.plan_retention()?;

        let mut deleted = Vec::with_capacity(plan.expired.len());
        for backup in plan.expired {
            fs::remove_file(&backup.path)
                .map_err(|e| VaultError::Io(format!("Failed to delete old backup: {}", e)))?;
            tracing::info!(file = %backup.filename, "Deleted expired backup");
            deleted.push(backup.path);
        }

        Ok(deleted)
    }

    pub fn backup_dir(&self) -> &Path {
        &self.backup_dir
    }

    /// Look up a backup by file name
    pub fn get_backup(&self, filename: &str) -> VaultResult<Option<BackupInfo>> {
        Ok(self
            .list_backups()?
            .into_iter()
            .find(|b| b.filename == filename))
    }

    pub fn get_latest_backup(&self) -> VaultResult<Option<BackupInfo>> {
        Ok(self.list_backups()?.into_iter().next())
    }

    /// Resolve `latest`, a file name in the backup directory, or a path
    pub fn resolve(&self, reference: &str) -> VaultResult<PathBuf> {
        if reference == "latest" {
            return self
                .get_latest_backup()?
                .map(|b| b.path)
                .ok_or_else(|| VaultError::backup_not_found("latest"));
        }

        let in_dir = self.backup_dir.join(reference);
        if in_dir.is_file() {
            return Ok(in_dir);
        }

        let path = PathBuf::from(reference);
        if path.is_file() {
            Ok(path)
        } else {
            Err(VaultError::backup_not_found(reference))
        }
    }
}

/// Snapshot the ledger and encrypt it
pub fn export_ledger(
    storage: &Storage,
    preferences: &UserPreferences,
    codec: &BackupCodec,
    password: &str,
) -> VaultResult<EncryptedBackup> {
    let transactions = storage.transactions.get_all()?;
    let categories = storage.categories.get_all()?;
    codec.export_backup(&transactions, &categories, preferences, password)
}

/// Write an encrypted backup to `path` and record it in the audit log
pub fn write_backup(storage: &Storage, backup: &EncryptedBackup, path: &Path) -> VaultResult<()> {
    write_json_atomic(path, backup)?;

    let name = path
        .file_name()
        .map(|n| n.to_string_lossy().to_string())
        .unwrap_or_else(|| path.display().to_string());
    storage.audit().log(&AuditEntry::backup_event(
        Operation::Export,
        name,
        serde_json::json!({
            "path": path.display().to_string(),
            "dbVersion": backup.metadata.db_version,
        }),
    ))?;

    tracing::info!(path = %path.display(), "Wrote encrypted backup");
    Ok(())
}

fn parse_backup_info(path: &Path) -> Option<BackupInfo> {
    let filename = path.file_name()?.to_string_lossy().to_string();
    let stamp = filename.strip_prefix("backup-")?.strip_suffix(".json")?;
    let created_at = parse_backup_timestamp(stamp)?;
    let size_bytes = fs::metadata(path).ok()?.len();

    Some(BackupInfo {
        filename,
        path: path.to_path_buf(),
        created_at,
        size_bytes,
        is_monthly: false,
    })
}

/// Parse `YYYYMMDD-HHMMSS` or `YYYYMMDD-HHMMSS-mmm`
fn parse_backup_timestamp(stamp: &str) -> Option<DateTime<Utc>> {
    let parts: Vec<&str> = stamp.split('-').collect();
    let (date_part, time_part, millis) = match parts.as_slice() {
        [date, time] => (*date, *time, 0),
        [date, time, millis] => (*date, *time, millis.parse().ok()?),
        _ => return None,
    };

    if date_part.len() != 8 || time_part.len() != 6 {
        return None;
    }

    let date = NaiveDate::from_ymd_opt(
        date_part[0..4].parse().ok()?,
        date_part[4..6].parse().ok()?,
        date_part[6..8].parse().ok()?,
    )?;
    let time = chrono::NaiveTime::from_hms_milli_opt(
        time_part[0..2].parse().ok()?,
        time_part[2..4].parse().ok()?,
        time_part[4..6].parse().ok()?,
        millis,
    )?;

    Some(DateTime::from_naive_utc_and_offset(
        chrono::NaiveDateTime::new(date, time),
        Utc,
    ))
}
