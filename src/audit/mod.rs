//! Audit trail for finvault
//!
//! Every create/update/delete on transactions and categories, and every
//! backup export, restore and prune, appends one JSON line to `audit.log`.

mod entry;
mod logger;

pub use entry::{AuditEntry, EntityType, Operation};
pub use logger::AuditLogger;
