//! Plain-text exports
//!
//! CSV renditions of the ledger and of the monthly report series, for use
//! in spreadsheets. Unlike backups these files are not encrypted.

pub mod csv;

pub use self::csv::{export_flow_csv, export_transactions_csv, export_trends_csv};
