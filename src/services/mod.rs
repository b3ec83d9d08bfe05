//! Business logic layer for finvault
//!
//! Services validate input, persist through `Storage`, and write the audit
//! trail.

pub mod category;
pub mod transaction;

pub use category::{CategoryChanges, CategoryService};
pub use transaction::{
    CreateTransactionInput, TransactionFilter, TransactionService, UpdateTransactionInput,
};
