//! Configuration module for finvault
//!
//! This module provides configuration management including:
//! - Data directory resolution
//! - User settings persistence (preferences, KDF strategy, backup retention)

pub mod paths;
pub mod settings;

pub use paths::FinvaultPaths;
pub use settings::{BackupRetention, CsvDelimiter, Settings, UserPreferences};
