//! Backup list formatting

use chrono::{DateTime, Utc};
use tabled::Tabled;

use crate::backup::BackupInfo;

use super::render_table;

#[derive(Tabled)]
struct BackupRow {
    #[tabled(rename = "#")]
    index: usize,
    #[tabled(rename = "File")]
    filename: String,
    #[tabled(rename = "Created (UTC)")]
    created: String,
    #[tabled(rename = "Age")]
    age: String,
    #[tabled(rename = "Size")]
    size: String,
    #[tabled(rename = "Kind")]
    kind: &'static str,
}

/// Backups as a table, ages measured against `now`
pub fn format_backup_list(backups: &[BackupInfo], now: DateTime<Utc>) -> String {
    if backups.is_empty() {
        return "No backups found.\nCreate one with: finvault backup create\n".to_string();
    }

    let rows = backups
        .iter()
        .enumerate()
        .map(|(i, backup)| BackupRow {
            index: i + 1,
            filename: backup.filename.clone(),
            created: backup.created_at.format("%Y-%m-%d %H:%M").to_string(),
            age: format_age(now - backup.created_at),
            size: format_size(backup.size_bytes),
            kind: if backup.is_monthly { "monthly" } else { "daily" },
        })
        .collect();

    let monthly = backups.iter().filter(|b| b.is_monthly).count();
    format!(
        "{}\nTotal: {} backup(s), {} monthly\n",
        render_table(rows),
        backups.len(),
        monthly
    )
}

/// Coarse age such as "3h" or "2mo"
pub fn format_age(age: chrono::Duration) -> String {
    const UNITS: [(i64, &str); 4] = [(30 * 86_400, "mo"), (86_400, "d"), (3_600, "h"), (60, "m")];

    let seconds = age.num_seconds().max(0);
    UNITS
        .iter()
        .find(|(unit, _)| seconds >= *unit)
        .map(|(unit, suffix)| format!("{}{}", seconds / unit, suffix))
        .unwrap_or_else(|| format!("{}s", seconds))
}

/// Byte count scaled to B, KiB or MiB
pub fn format_size(bytes: u64) -> String {
    match bytes {
        0..=1023 => format!("{} B", bytes),
        1024..=1_048_575 => format!("{:.1} KiB", bytes as f64 / 1024.0),
        _ => format!("{:.1} MiB", bytes as f64 / 1_048_576.0),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    fn info(filename: &str, created_at: DateTime<Utc>, is_monthly: bool) -> BackupInfo {
        BackupInfo {
            filename: filename.to_string(),
            path: PathBuf::from(filename),
            created_at,
            size_bytes: 2048,
            is_monthly,
        }
    }

    #[test]
    fn test_format_age() {
        assert_eq!(format_age(chrono::Duration::seconds(42)), "42s");
        assert_eq!(format_age(chrono::Duration::minutes(90)), "1h");
        assert_eq!(format_age(chrono::Duration::days(65)), "2mo");
        assert_eq!(format_age(chrono::Duration::seconds(-5)), "0s");
    }

    #[test]
    fn test_format_size() {
        assert_eq!(format_size(512), "512 B");
        assert_eq!(format_size(2048), "2.0 KiB");
        assert_eq!(format_size(3 * 1024 * 1024), "3.0 MiB");
    }

    #[test]
    fn test_backup_list() {
        let now = Utc::now();
        let backups = vec![
            info("backup-b.json", now - chrono::Duration::hours(2), false),
            info("backup-a.json", now - chrono::Duration::days(3), true),
        ];

        let output = format_backup_list(&backups, now);
        assert!(output.contains("backup-b.json"));
        assert!(output.contains("2h"));
        assert!(output.contains("3d"));
        assert!(output.contains("monthly"));
        assert!(output.contains("Total: 2 backup(s), 1 monthly"));
    }

    #[test]
    fn test_empty_backup_list() {
        assert!(format_backup_list(&[], Utc::now()).starts_with("No backups found."));
    }
}
