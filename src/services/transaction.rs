//! Transaction service
//!
//! Validated CRUD for ledger entries. Every transaction must reference an
//! existing category.

use chrono::NaiveDate;

use crate::audit::EntityType;
use crate::error::{VaultError, VaultResult};
use crate::models::{CategoryId, Money, Transaction, TransactionId, TransactionType, YearMonth};
use crate::storage::Storage;

/// Service for transaction management
pub struct TransactionService<'a> {
    storage: &'a Storage,
}

/// Options for filtering transactions
#[derive(Debug, Clone, Default)]
pub struct TransactionFilter {
    pub category_id: Option<CategoryId>,
    pub kind: Option<TransactionType>,
    pub start_date: Option<NaiveDate>,
    pub end_date: Option<NaiveDate>,
    /// Maximum number of transactions to return (most recent kept)
    pub limit: Option<usize>,
}

impl TransactionFilter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn category(mut self, category_id: CategoryId) -> Self {
        self.category_id = Some(category_id);
        self
    }

    pub fn kind(mut self, kind: TransactionType) -> Self {
        self.kind = Some(kind);
        self
    }

    pub fn date_range(mut self, start: NaiveDate, end: NaiveDate) -> Self {
        self.start_date = Some(start);
        self.end_date = Some(end);
        self
    }

    /// Restrict to one calendar month
    pub fn month(self, month: YearMonth) -> Self {
        self.date_range(month.start_date(), month.end_date())
    }

    pub fn limit(mut self, limit: usize) -> Self {
        self.limit = Some(limit);
        self
    }
}

/// Input for creating a new transaction
#[derive(Debug, Clone)]
pub struct CreateTransactionInput {
    pub description: String,
    pub amount: Money,
    pub date: NaiveDate,
    pub kind: TransactionType,
    pub category_id: CategoryId,
}

/// Field changes for `update`; `None` leaves a field untouched
#[derive(Debug, Clone, Default)]
pub struct UpdateTransactionInput {
    pub description: Option<String>,
    pub amount: Option<Money>,
    pub date: Option<NaiveDate>,
    pub kind: Option<TransactionType>,
    pub category_id: Option<CategoryId>,
}

impl<'a> TransactionService<'a> {
    pub fn new(storage: &'a Storage) -> Self {
        Self { storage }
    }

    /// Record a new transaction
    pub fn create(&self, input: CreateTransactionInput) -> VaultResult<Transaction> {
        self.storage.categories.require(input.category_id)?;

        let txn = Transaction::new(
            input.description.trim(),
            input.amount,
            input.date,
            input.kind,
            input.category_id,
        );

        txn.validate()
            .map_err(|e| VaultError::Validation(e.to_string()))?;

        self.storage.transactions.upsert(txn.clone())?;
        self.storage.transactions.save()?;

        self.storage.log_create(
            EntityType::Transaction,
            txn.id.to_string(),
            Some(audit_label(&txn)),
            &txn,
        )?;

        Ok(txn)
    }

    pub fn get(&self, id: TransactionId) -> VaultResult<Option<Transaction>> {
        self.storage.transactions.get(id)
    }

    /// Find a transaction by full UUID or short display id ("txn-1a2b3c4d")
    pub fn find(&self, identifier: &str) -> VaultResult<Option<Transaction>> {
        if let Ok(id) = identifier.parse::<TransactionId>() {
            return self.storage.transactions.get(id);
        }

        let wanted = identifier.trim();
        Ok(self
            .storage
            .transactions
            .get_all()?
            .into_iter()
            .find(|t| t.id.to_string() == wanted))
    }

    /// Like `find`, but a miss is an error
    pub fn require(&self, identifier: &str) -> VaultResult<Transaction> {
        self.find(identifier)?
            .ok_or_else(|| VaultError::transaction_not_found(identifier))
    }

    /// List transactions, most recent first
    pub fn list(&self, filter: TransactionFilter) -> VaultResult<Vec<Transaction>> {
        let mut transactions = match filter.category_id {
            Some(category_id) => self.storage.transactions.get_by_category(category_id)?,
            None => self.storage.transactions.get_all()?,
        };

        if let Some(kind) = filter.kind {
            transactions.retain(|t| t.kind == kind);
        }
        if let Some(start) = filter.start_date {
            transactions.retain(|t| t.date >= start);
        }
        if let Some(end) = filter.end_date {
            transactions.retain(|t| t.date <= end);
        }

        transactions.reverse();

        if let Some(limit) = filter.limit {
            transactions.truncate(limit);
        }

        Ok(transactions)
    }

    /// The whole ledger in ascending date order
    pub fn ledger(&self) -> VaultResult<Vec<Transaction>> {
        self.storage.transactions.get_all()
    }

    /// Apply field changes to a transaction
    pub fn update(&self, id: TransactionId, input: UpdateTransactionInput) -> VaultResult<Transaction> {
        let mut txn = self
            .storage
            .transactions
            .get(id)?
            .ok_or_else(|| VaultError::transaction_not_found(id.to_string()))?;

        let before = txn.clone();

        if let Some(description) = input.description {
            txn.description = description.trim().to_string();
        }
        if let Some(amount) = input.amount {
            txn.amount = amount;
        }
        if let Some(date) = input.date {
            txn.date = date;
        }
        if let Some(kind) = input.kind {
            txn.kind = kind;
        }
        if let Some(category_id) = input.category_id {
            self.storage.categories.require(category_id)?;
            txn.category_id = category_id;
        }

        txn.touch();
        txn.validate()
            .map_err(|e| VaultError::Validation(e.to_string()))?;

        self.storage.transactions.upsert(txn.clone())?;
        self.storage.transactions.save()?;

        self.storage.log_update(
            EntityType::Transaction,
            txn.id.to_string(),
            Some(audit_label(&txn)),
            &before,
            &txn,
        )?;

        Ok(txn)
    }

    /// Delete a transaction
    pub fn delete(&self, id: TransactionId) -> VaultResult<Transaction> {
        let txn = self
            .storage
            .transactions
            .delete(id)?
            .ok_or_else(|| VaultError::transaction_not_found(id.to_string()))?;
        self.storage.transactions.save()?;

        self.storage.log_delete(
            EntityType::Transaction,
            id.to_string(),
            Some(audit_label(&txn)),
            &txn,
        )?;

        Ok(txn)
    }

    pub fn count(&self) -> VaultResult<usize> {
        self.storage.transactions.count()
    }
}

fn audit_label(txn: &Transaction) -> String {
    if txn.description.is_empty() {
        format!("{} {}", txn.date, txn.kind)
    } else {
        format!("{} {}", txn.date, txn.description)
    }
}
