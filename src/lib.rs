//! finvault - personal finance ledger with encrypted backups
//!
//! Records income and expense transactions filed under categories, folds
//! the ledger into monthly analytics, and protects exports with
//! password-based AES-256-GCM encryption.
//!
//! # Architecture
//!
//! The crate is organized into the following modules:
//!
//! - `config`: Path resolution and persisted settings
//! - `error`: Custom error types
//! - `crypto`: Password-based envelope encryption
//! - `models`: Transactions, categories, money and months
//! - `storage`: JSON file storage layer
//! - `services`: Validated create/update/delete
//! - `audit`: Audit logging system
//! - `backup`: Encrypted backup files, retention and restore
//! - `reports`: Monthly flow, category trends, expense patterns
//! - `export`: CSV export
//! - `display`: Terminal rendering
//! - `cli`: Command handlers for the `finvault` binary
//!
//! # Example
//!
//! ```rust,ignore
//! use finvault::config::{FinvaultPaths, Settings};
//! use finvault::reports::FinancialFlowReport;
//! use finvault::storage::Storage;
//!
//! let paths = FinvaultPaths::new()?;
//! let storage = Storage::open(paths)?;
//! let report = FinancialFlowReport::generate(
//!     &storage.transactions.get_all()?,
//!     &storage.categories.get_all()?,
//!     chrono::Local::now().date_naive(),
//! );
//! ```

pub mod audit;
pub mod backup;
pub mod cli;
pub mod config;
pub mod crypto;
pub mod display;
pub mod error;
pub mod export;
pub mod models;
pub mod reports;
pub mod services;
pub mod storage;

pub use error::{VaultError, VaultResult};
