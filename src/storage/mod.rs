//! Storage layer for finvault
//!
//! JSON file storage with atomic writes. Each repository keeps its records
//! in an `RwLock`-guarded map and writes the whole file on save.

pub mod categories;
pub mod file_io;
pub mod init;
pub mod transactions;

pub use categories::CategoryRepository;
pub use file_io::{read_json, read_json_required, stage_json, write_json_atomic, StagedWrite};
pub use init::initialize_storage;
pub use transactions::TransactionRepository;

use serde::Serialize;

use crate::audit::{AuditEntry, AuditLogger, EntityType};
use crate::config::paths::FinvaultPaths;
use crate::error::{VaultError, VaultResult};

/// Map a poisoned lock into a storage error
pub(crate) fn lock_error<E: std::fmt::Display>(e: E) -> VaultError {
    VaultError::Storage(format!("Failed to acquire lock: {}", e))
}

/// Main storage coordinator that provides access to all repositories
pub struct Storage {
    paths: FinvaultPaths,
    pub transactions: TransactionRepository,
    pub categories: CategoryRepository,
    audit: AuditLogger,
}

impl Storage {
    /// Create a storage handle; nothing is read until `load_all`
    pub fn new(paths: FinvaultPaths) -> VaultResult<Self> {
        paths.ensure_directories()?;

        Ok(Self {
            transactions: TransactionRepository::new(paths.transactions_file()),
            categories: CategoryRepository::new(paths.categories_file()),
            audit: AuditLogger::new(paths.audit_log()),
            paths,
        })
    }

    /// Open storage and load both collections
    pub fn open(paths: FinvaultPaths) -> VaultResult<Self> {
        let storage = Self::new(paths)?;
        storage.load_all()?;
        Ok(storage)
    }

    pub fn paths(&self) -> &FinvaultPaths {
        &self.paths
    }

    pub fn load_all(&self) -> VaultResult<()> {
        self.transactions.load()?;
        self.categories.load()?;
        Ok(())
    }

    pub fn save_all(&self) -> VaultResult<()> {
        self.save_all_with(Vec::new())
    }

    /// Write both ledger files, plus any other staged files, together
    ///
    /// Every file is fully written before the first rename, so a failed
    /// write leaves all of them as they were.
    pub fn save_all_with(&self, extra: Vec<StagedWrite>) -> VaultResult<()> {
        let mut staged = extra;
        staged.push(self.categories.stage()?);
        staged.push(self.transactions.stage()?);

        for write in staged {
            write.commit()?;
        }
        Ok(())
    }

    pub fn is_initialized(&self) -> bool {
        self.paths.is_initialized()
    }

    pub fn audit(&self) -> &AuditLogger {
        &self.audit
    }

    pub fn log_create<T: Serialize>(
        &self,
        entity_type: EntityType,
        entity_id: impl Into<String>,
        entity_name: Option<String>,
        entity: &T,
    ) -> VaultResult<()> {
        self.audit
            .log(&AuditEntry::create(entity_type, entity_id, entity_name, entity))
    }

    pub fn log_update<T: Serialize>(
        &self,
        entity_type: EntityType,
        entity_id: impl Into<String>,
        entity_name: Option<String>,
        before: &T,
        after: &T,
    ) -> VaultResult<()> {
        self.audit.log(&AuditEntry::update(
            entity_type,
            entity_id,
            entity_name,
            before,
            after,
        ))
    }

    pub fn log_delete<T: Serialize>(
        &self,
        entity_type: EntityType,
        entity_id: impl Into<String>,
        entity_name: Option<String>,
        entity: &T,
    ) -> VaultResult<()> {
        self.audit
            .log(&AuditEntry::delete(entity_type, entity_id, entity_name, entity))
    }
}
