//! Transaction repository for JSON storage
//!
//! Manages loading and saving transactions to transactions.json, with a
//! category index backing the restrict-on-delete rule.

use std::collections::HashMap;
use std::path::PathBuf;
use std::sync::RwLock;

use chrono::NaiveDate;

use crate::error::VaultResult;
use crate::models::{CategoryId, Transaction, TransactionId};

use super::file_io::{read_json, stage_json, StagedWrite};
use super::lock_error;

/// On-disk shape of transactions.json
#[derive(Debug, Clone, Default, serde::Serialize, serde::Deserialize)]
struct TransactionData {
    transactions: Vec<Transaction>,
}

/// Repository for transaction persistence with a category index
pub struct TransactionRepository {
    path: PathBuf,
    data: RwLock<HashMap<TransactionId, Transaction>>,
    by_category: RwLock<HashMap<CategoryId, Vec<TransactionId>>>,
}

impl TransactionRepository {
    pub fn new(path: PathBuf) -> Self {
        Self {
            path,
            data: RwLock::new(HashMap::new()),
            by_category: RwLock::new(HashMap::new()),
        }
    }

    /// Load transactions from disk and rebuild the index
    pub fn load(&self) -> VaultResult<()> {
        let file_data: TransactionData = read_json(&self.path)?;
        self.replace_all(file_data.transactions)
    }

    /// Save transactions to disk, oldest first
    pub fn save(&self) -> VaultResult<()> {
        self.stage()?.commit()
    }

    /// Write the collection to a temp file for a later commit
    pub fn stage(&self) -> VaultResult<StagedWrite> {
        let transactions = self.get_all()?;
        stage_json(&self.path, &TransactionData { transactions })
    }

    pub fn get(&self, id: TransactionId) -> VaultResult<Option<Transaction>> {
        let data = self.data.read().map_err(lock_error)?;
        Ok(data.get(&id).cloned())
    }

    /// Every transaction in ledger order: ascending by date, then id
    pub fn get_all(&self) -> VaultResult<Vec<Transaction>> {
        let data = self.data.read().map_err(lock_error)?;
        let mut transactions: Vec<_> = data.values().cloned().collect();
        transactions.sort_by(|a, b| a.date.cmp(&b.date).then(a.id.cmp(&b.id)));
        Ok(transactions)
    }

    /// Transactions filed under a category, ascending by date
    pub fn get_by_category(&self, category_id: CategoryId) -> VaultResult<Vec<Transaction>> {
        let data = self.data.read().map_err(lock_error)?;
        let by_category = self.by_category.read().map_err(lock_error)?;

        let ids = by_category
            .get(&category_id)
            .map(|v| v.as_slice())
            .unwrap_or(&[]);
        let mut transactions: Vec<_> = ids.iter().filter_map(|id| data.get(id).cloned()).collect();
        transactions.sort_by(|a, b| a.date.cmp(&b.date).then(a.id.cmp(&b.id)));
        Ok(transactions)
    }

    /// Number of transactions referencing a category
    pub fn count_by_category(&self, category_id: CategoryId) -> VaultResult<usize> {
        let by_category = self.by_category.read().map_err(lock_error)?;
        Ok(by_category.get(&category_id).map(Vec::len).unwrap_or(0))
    }

    /// Transactions with `start <= date <= end`
    pub fn get_by_date_range(
        &self,
        start: NaiveDate,
        end: NaiveDate,
    ) -> VaultResult<Vec<Transaction>> {
        Ok(self
            .get_all()?
            .into_iter()
            .filter(|t| t.date >= start && t.date <= end)
            .collect())
    }

    /// Insert or update a transaction
    pub fn upsert(&self, txn: Transaction) -> VaultResult<()> {
        let mut data = self.data.write().map_err(lock_error)?;
        let mut by_category = self.by_category.write().map_err(lock_error)?;

        if let Some(old) = data.get(&txn.id) {
            if let Some(ids) = by_category.get_mut(&old.category_id) {
                ids.retain(|&id| id != txn.id);
            }
        }

        by_category.entry(txn.category_id).or_default().push(txn.id);
        data.insert(txn.id, txn);
        Ok(())
    }

    /// Delete a transaction, returning it if it existed
    pub fn delete(&self, id: TransactionId) -> VaultResult<Option<Transaction>> {
        let mut data = self.data.write().map_err(lock_error)?;
        let mut by_category = self.by_category.write().map_err(lock_error)?;

        let removed = data.remove(&id);
        if let Some(txn) = &removed {
            if let Some(ids) = by_category.get_mut(&txn.category_id) {
                ids.retain(|&other| other != id);
            }
        }
        Ok(removed)
    }

    /// Swap the whole in-memory ledger (used by restore)
    pub fn replace_all(&self, transactions: Vec<Transaction>) -> VaultResult<()> {
        let mut data = self.data.write().map_err(lock_error)?;
        let mut by_category = self.by_category.write().map_err(lock_error)?;

        data.clear();
        by_category.clear();
        for txn in transactions {
            by_category.entry(txn.category_id).or_default().push(txn.id);
            data.insert(txn.id, txn);
        }
        Ok(())
    }

    pub fn count(&self) -> VaultResult<usize> {
        let data = self.data.read().map_err(lock_error)?;
        Ok(data.len())
    }

    pub fn exists(&self, id: TransactionId) -> VaultResult<bool> {
        let data = self.data.read().map_err(lock_error)?;
        Ok(data.contains_key(&id))
    }
}
