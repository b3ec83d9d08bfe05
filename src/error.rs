//! Custom error types for finvault
//!
//! Every fallible operation in the crate returns [`VaultResult`]. The binary
//! wraps these in `anyhow` at the top level.
//!
//! The four backup errors (`Decode`, `Authentication`, `PayloadCorrupt`,
//! `UnsupportedSchema`) are terminal for the operation that raised them and
//! are never retried internally.

use thiserror::Error;

/// The main error type for finvault operations
#[derive(Error, Debug)]
pub enum VaultError {
    /// Unreadable or invalid settings
    #[error("Configuration error: {0}")]
    Config(String),

    /// Filesystem failures, with the failing step in the message
    #[error("I/O error: {0}")]
    Io(String),

    /// Ledger files that fail to parse or serialize
    #[error("JSON error: {0}")]
    Json(String),

    /// Input rejected before it reaches storage
    #[error("Validation error: {0}")]
    Validation(String),

    /// Lookup by id or name came back empty
    #[error("{entity_type} not found: {identifier}")]
    NotFound {
        entity_type: &'static str,
        identifier: String,
    },

    /// Category names are unique, case-insensitively
    #[error("{entity_type} already exists: {identifier}")]
    Duplicate {
        entity_type: &'static str,
        identifier: String,
    },

    /// A category still referenced by transactions cannot be deleted
    #[error("Category '{category}' is used by {transaction_count} transaction(s)")]
    CategoryInUse {
        category: String,
        transaction_count: usize,
    },

    /// CSV writer failures
    #[error("Export error: {0}")]
    Export(String),

    /// Cipher or key-derivation setup failures
    #[error("Encryption error: {0}")]
    Encryption(String),

    /// Malformed base64 or truncated backup blob
    #[error("Malformed backup: {0}")]
    Decode(String),

    /// Tag verification failed. Wrong password and tampered data are
    /// deliberately reported the same way.
    #[error("Wrong password or corrupted backup")]
    Authentication,

    /// Decryption succeeded but the payload structure is invalid
    #[error("Backup payload is corrupt: {0}")]
    PayloadCorrupt(String),

    /// Valid payload with a schema version this build cannot read
    #[error("Unsupported backup schema version {found} (supported: {supported})")]
    UnsupportedSchema { found: u32, supported: u32 },

    /// Atomic write or lock failures in the data directory
    #[error("Storage error: {0}")]
    Storage(String),
}

impl VaultError {
    /// Create a "not found" error for categories
    pub fn category_not_found(identifier: impl Into<String>) -> Self {
        Self::NotFound {
            entity_type: "Category",
            identifier: identifier.into(),
        }
    }

    /// Create a "not found" error for transactions
    pub fn transaction_not_found(identifier: impl Into<String>) -> Self {
        Self::NotFound {
            entity_type: "Transaction",
            identifier: identifier.into(),
        }
    }

    /// Create a "not found" error for backups
    pub fn backup_not_found(identifier: impl Into<String>) -> Self {
        Self::NotFound {
            entity_type: "Backup",
            identifier: identifier.into(),
        }
    }

    /// True when a lookup found nothing
    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::NotFound { .. })
    }

    pub fn is_validation(&self) -> bool {
        matches!(self, Self::Validation(_))
    }

    /// Check if this error came from reading a backup blob or payload
    pub fn is_backup_failure(&self) -> bool {
        matches!(
            self,
            Self::Decode(_)
                | Self::Authentication
                | Self::PayloadCorrupt(_)
                | Self::UnsupportedSchema { .. }
        )
    }
}

impl From<std::io::Error> for VaultError {
    fn from(err: std::io::Error) -> Self {
        Self::Io(err.to_string())
    }
}

impl From<serde_json::Error> for VaultError {
    fn from(err: serde_json::Error) -> Self {
        Self::Json(err.to_string())
    }
}

impl From<csv::Error> for VaultError {
    fn from(err: csv::Error) -> Self {
        Self::Export(err.to_string())
    }
}

/// Result type alias for finvault operations
pub type VaultResult<T> = Result<T, VaultError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = VaultError::Config("test error".into());
        assert_eq!(err.to_string(), "Configuration error: test error");
    }

    #[test]
    fn test_not_found_error() {
        let err = VaultError::category_not_found("Groceries");
        assert_eq!(err.to_string(), "Category not found: Groceries");
        assert!(err.is_not_found());
    }

    #[test]
    fn test_authentication_error_has_no_detail() {
        let err = VaultError::Authentication;
        assert_eq!(err.to_string(), "Wrong password or corrupted backup");
        assert!(err.is_backup_failure());
    }

    #[test]
    fn test_category_in_use_error() {
        let err = VaultError::CategoryInUse {
            category: "Food".into(),
            transaction_count: 3,
        };
        assert_eq!(err.to_string(), "Category 'Food' is used by 3 transaction(s)");
        assert!(!err.is_backup_failure());
    }

    #[test]
    fn test_unsupported_schema_error() {
        let err = VaultError::UnsupportedSchema {
            found: 7,
            supported: 1,
        };
        assert!(err.to_string().contains("7"));
    }

    #[test]
    fn test_from_io_error() {
        let io_err = std::io::Error::new(std::io::ErrorKind::NotFound, "file not found");
        let vault_err: VaultError = io_err.into();
        assert!(matches!(vault_err, VaultError::Io(_)));
    }
}
