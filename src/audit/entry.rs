//! Audit entry data structures

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Types of operations that can be audited
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Operation {
    Create,
    Update,
    Delete,
    /// An encrypted backup was written
    Export,
    /// A backup was loaded into the ledger
    Restore,
    /// Old backups were removed by the retention policy
    Prune,
}

impl std::fmt::Display for Operation {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let label = match self {
            Operation::Create => "CREATE",
            Operation::Update => "UPDATE",
            Operation::Delete => "DELETE",
            Operation::Export => "EXPORT",
            Operation::Restore => "RESTORE",
            Operation::Prune => "PRUNE",
        };
        f.write_str(label)
    }
}

/// Types of entities that can be audited
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EntityType {
    Transaction,
    Category,
    Backup,
}

impl std::fmt::Display for EntityType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            EntityType::Transaction => write!(f, "Transaction"),
            EntityType::Category => write!(f, "Category"),
            EntityType::Backup => write!(f, "Backup"),
        }
    }
}

/// A single audit log entry
///
/// Ledger mutations carry before/after snapshots. Backup events carry a
/// free-form `details` object instead (file name, record counts), never
/// key material or plaintext.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AuditEntry {
    pub timestamp: DateTime<Utc>,

    pub operation: Operation,

    pub entity_type: EntityType,

    pub entity_id: String,

    /// Human-readable label (category name, transaction description)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub entity_name: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub before: Option<serde_json::Value>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub after: Option<serde_json::Value>,

    /// Top-level fields that changed in an update
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub changed_fields: Vec<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<serde_json::Value>,
}

impl AuditEntry {
    fn base(
        operation: Operation,
        entity_type: EntityType,
        entity_id: String,
        entity_name: Option<String>,
    ) -> Self {
        Self {
            timestamp: Utc::now(),
            operation,
            entity_type,
            entity_id,
            entity_name,
            before: None,
            after: None,
            changed_fields: Vec::new(),
            details: None,
        }
    }

    /// Entry for a newly created entity
    pub fn create<T: Serialize>(
        entity_type: EntityType,
        entity_id: impl Into<String>,
        entity_name: Option<String>,
        entity: &T,
    ) -> Self {
        let mut entry = Self::base(Operation::Create, entity_type, entity_id.into(), entity_name);
        entry.after = serde_json::to_value(entity).ok();
        entry
    }

    /// Entry for an update; the changed top-level fields are computed here
    pub fn update<T: Serialize>(
        entity_type: EntityType,
        entity_id: impl Into<String>,
        entity_name: Option<String>,
        before: &T,
        after: &T,
    ) -> Self {
        let mut entry = Self::base(Operation::Update, entity_type, entity_id.into(), entity_name);
        entry.before = serde_json::to_value(before).ok();
        entry.after = serde_json::to_value(after).ok();
        entry.changed_fields = changed_fields(entry.before.as_ref(), entry.after.as_ref());
        entry
    }

    /// Entry for a deleted entity
    pub fn delete<T: Serialize>(
        entity_type: EntityType,
        entity_id: impl Into<String>,
        entity_name: Option<String>,
        entity: &T,
    ) -> Self {
        let mut entry = Self::base(Operation::Delete, entity_type, entity_id.into(), entity_name);
        entry.before = serde_json::to_value(entity).ok();
        entry
    }

    /// Entry for a backup export, restore or prune
    pub fn backup_event(
        operation: Operation,
        backup_name: impl Into<String>,
        details: serde_json::Value,
    ) -> Self {
        let name = backup_name.into();
        let mut entry = Self::base(operation, EntityType::Backup, name.clone(), Some(name));
        entry.details = Some(details);
        entry
    }

    /// Format the entry for human-readable output
    pub fn format_human_readable(&self) -> String {
        let mut output = format!(
            "[{}] {} {} {}",
            self.timestamp.format("%Y-%m-%d %H:%M:%S UTC"),
            self.operation,
            self.entity_type,
            self.entity_id
        );

        if let Some(name) = &self.entity_name {
            if name != &self.entity_id {
                output.push_str(&format!(" ({})", name));
            }
        }

        if !self.changed_fields.is_empty() {
            output.push_str(&format!("\n  Changed: {}", self.changed_fields.join(", ")));
        }

        output
    }
}

/// Names of top-level object keys whose values differ, sorted
fn changed_fields(
    before: Option<&serde_json::Value>,
    after: Option<&serde_json::Value>,
) -> Vec<String> {
    let (Some(serde_json::Value::Object(before)), Some(serde_json::Value::Object(after))) =
        (before, after)
    else {
        return Vec::new();
    };

    let mut fields: Vec<String> = before
        .keys()
        .chain(after.keys())
        .filter(|key| key.as_str() != "updatedAt" && before.get(*key) != after.get(*key))
        .cloned()
        .collect();
    fields.sort();
    fields.dedup();
    fields
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_display() {
        assert_eq!(Operation::Create.to_string(), "CREATE");
        assert_eq!(Operation::Restore.to_string(), "RESTORE");
        assert_eq!(EntityType::Backup.to_string(), "Backup");
    }

    #[test]
    fn test_create_entry() {
        let data = json!({"name": "Food", "color": 1});
        let entry = AuditEntry::create(EntityType::Category, "cat-1234", Some("Food".into()), &data);

        assert_eq!(entry.operation, Operation::Create);
        assert!(entry.before.is_none());
        assert_eq!(entry.after, Some(data));
    }

    #[test]
    fn test_update_tracks_changed_fields() {
        let before = json!({"name": "Food", "color": 1, "updatedAt": "a"});
        let after = json!({"name": "Groceries", "color": 1, "updatedAt": "b", "icon": "cart"});
        let entry = AuditEntry::update(EntityType::Category, "cat-1", None, &before, &after);

        assert_eq!(entry.changed_fields, vec!["icon".to_string(), "name".to_string()]);
        assert!(entry.format_human_readable().contains("Changed: icon, name"));
    }

    #[test]
    fn test_delete_entry() {
        let data = json!({"amount": 100});
        let entry = AuditEntry::delete(EntityType::Transaction, "txn-1", None, &data);
        assert_eq!(entry.before, Some(data));
        assert!(entry.after.is_none());
    }

    #[test]
    fn test_backup_event() {
        let entry = AuditEntry::backup_event(
            Operation::Export,
            "backup-20250101-120000-000.json",
            json!({"transactions": 3}),
        );
        assert_eq!(entry.entity_type, EntityType::Backup);
        assert_eq!(entry.details.unwrap()["transactions"], 3);

        let text = AuditEntry::backup_event(Operation::Prune, "b.json", json!({}))
            .format_human_readable();
        assert!(text.contains("PRUNE Backup b.json"));
        assert!(!text.contains("(b.json)"));
    }

    #[test]
    fn test_serialization_skips_empty() {
        let entry = AuditEntry::create(EntityType::Transaction, "txn-1", None, &json!({}));
        let line = serde_json::to_string(&entry).unwrap();
        assert!(!line.contains("changed_fields"));
        assert!(!line.contains("before"));
        let back: AuditEntry = serde_json::from_str(&line).unwrap();
        assert_eq!(back.entity_id, "txn-1");
    }
}
