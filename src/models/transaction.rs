//! Transaction model
//!
//! A ledger entry: an income or expense of a non-negative amount on a
//! calendar date, always tagged with a category.

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use super::ids::{CategoryId, TransactionId};
use super::money::Money;

/// Maximum description length
pub const MAX_DESCRIPTION_LEN: usize = 200;

/// Direction of a transaction
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum TransactionType {
    Income,
    Expense,
}

impl fmt::Display for TransactionType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Income => write!(f, "INCOME"),
            Self::Expense => write!(f, "EXPENSE"),
        }
    }
}

impl FromStr for TransactionType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "income" | "in" => Ok(Self::Income),
            "expense" | "out" => Ok(Self::Expense),
            other => Err(format!("Unknown transaction type: {}", other)),
        }
    }
}

/// A financial transaction
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Transaction {
    /// Unique identifier
    pub id: TransactionId,

    /// Free-text description
    #[serde(default)]
    pub description: String,

    /// Amount, never negative; direction comes from `kind`
    pub amount: Money,

    /// Transaction date
    pub date: NaiveDate,

    /// Income or expense
    #[serde(rename = "type")]
    pub kind: TransactionType,

    /// Category this transaction is filed under
    pub category_id: CategoryId,

    pub created_at: DateTime<Utc>,

    pub updated_at: DateTime<Utc>,
}

impl Transaction {
    /// Create a new transaction
    pub fn new(
        description: impl Into<String>,
        amount: Money,
        date: NaiveDate,
        kind: TransactionType,
        category_id: CategoryId,
    ) -> Self {
        let now = Utc::now();
        Self {
            id: TransactionId::new(),
            description: description.into(),
            amount,
            date,
            kind,
            category_id,
            created_at: now,
            updated_at: now,
        }
    }

    /// Shorthand for an expense
    pub fn expense(amount: Money, date: NaiveDate, category_id: CategoryId) -> Self {
        Self::new("", amount, date, TransactionType::Expense, category_id)
    }

    /// Shorthand for an income
    pub fn income(amount: Money, date: NaiveDate, category_id: CategoryId) -> Self {
        Self::new("", amount, date, TransactionType::Income, category_id)
    }

    pub fn is_income(&self) -> bool {
        self.kind == TransactionType::Income
    }

    pub fn is_expense(&self) -> bool {
        self.kind == TransactionType::Expense
    }

    /// Amount with sign applied (income positive, expense negative)
    pub fn signed_amount(&self) -> Money {
        match self.kind {
            TransactionType::Income => self.amount,
            TransactionType::Expense => -self.amount,
        }
    }

    /// Mark the transaction as modified
    pub fn touch(&mut self) {
        self.updated_at = Utc::now();
    }

    /// Validate the transaction
    pub fn validate(&self) -> Result<(), TransactionValidationError> {
        if self.amount.is_negative() {
            return Err(TransactionValidationError::NegativeAmount(self.amount));
        }

        let len = self.description.chars().count();
        if len > MAX_DESCRIPTION_LEN {
            return Err(TransactionValidationError::DescriptionTooLong(len));
        }

        Ok(())
    }
}

impl fmt::Display for Transaction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} {} {} {}",
            self.date.format("%Y-%m-%d"),
            self.kind,
            self.amount,
            self.description
        )
    }
}

/// Validation errors for transactions
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TransactionValidationError {
    NegativeAmount(Money),
    DescriptionTooLong(usize),
}

impl fmt::Display for TransactionValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::NegativeAmount(amount) => {
                write!(f, "Amount cannot be negative: {}", amount)
            }
            Self::DescriptionTooLong(len) => write!(
                f,
                "Description too long ({} characters, max {})",
                len, MAX_DESCRIPTION_LEN
            ),
        }
    }
}

impl std::error::Error for TransactionValidationError {}

#[cfg(test)]
mod tests {
    use super::*;

    fn date() -> NaiveDate {
        NaiveDate::from_ymd_opt(2025, 1, 15).unwrap()
    }

    #[test]
    fn test_signed_amount() {
        let cat = CategoryId::new();
        let income = Transaction::income(Money::from_units(100), date(), cat);
        let expense = Transaction::expense(Money::from_units(40), date(), cat);
        assert_eq!(income.signed_amount(), Money::from_units(100));
        assert_eq!(expense.signed_amount(), Money::from_units(-40));
        assert!(income.is_income());
        assert!(expense.is_expense());
    }

    #[test]
    fn test_validate_negative_amount() {
        let txn = Transaction::expense(Money::from_cents(-1), date(), CategoryId::new());
        assert_eq!(
            txn.validate(),
            Err(TransactionValidationError::NegativeAmount(Money::from_cents(-1)))
        );
    }

    #[test]
    fn test_validate_description_length() {
        let mut txn = Transaction::expense(Money::from_units(1), date(), CategoryId::new());
        txn.description = "x".repeat(MAX_DESCRIPTION_LEN);
        assert!(txn.validate().is_ok());
        txn.description.push('x');
        assert!(txn.validate().is_err());
    }

    #[test]
    fn test_type_parse() {
        assert_eq!("income".parse::<TransactionType>(), Ok(TransactionType::Income));
        assert_eq!("EXPENSE".parse::<TransactionType>(), Ok(TransactionType::Expense));
        assert!("transfer".parse::<TransactionType>().is_err());
    }

    #[test]
    fn test_serialization_field_names() {
        let txn = Transaction::new(
            "Lunch",
            Money::from_cents(1250),
            date(),
            TransactionType::Expense,
            CategoryId::new(),
        );
        let json = serde_json::to_value(&txn).unwrap();
        assert_eq!(json["type"], "EXPENSE");
        assert_eq!(json["amount"], 1250);
        assert_eq!(json["date"], "2025-01-15");
        assert!(json.get("categoryId").is_some());

        let back: Transaction = serde_json::from_value(json).unwrap();
        assert_eq!(back, txn);
    }
}
