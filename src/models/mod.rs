//! Core data models for finvault
//!
//! The ledger is two collections: transactions and the categories they are
//! filed under. Months and money get their own value types.

pub mod category;
pub mod ids;
pub mod money;
pub mod period;
pub mod transaction;

pub use category::{Category, CategoryKind, DefaultCategory};
pub use ids::{CategoryId, TransactionId};
pub use money::Money;
pub use period::YearMonth;
pub use transaction::{Transaction, TransactionType};
