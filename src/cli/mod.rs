//! CLI command handlers
//!
//! Bridges clap argument parsing with the service, report and backup
//! layers. Handlers print their results and return library errors; the
//! binary decides how to present those.

pub mod backup;
pub mod category;
pub mod export;
pub mod report;
pub mod transaction;

pub use backup::{handle_backup_command, BackupCommands};
pub use category::{handle_category_command, CategoryCommands};
pub use export::{handle_export_command, ExportCommands};
pub use report::{handle_report_command, ReportCommands};
pub use transaction::{handle_transaction_command, TransactionCommands};

use chrono::{Local, NaiveDate};

use crate::error::{VaultError, VaultResult};
use crate::models::{Money, YearMonth};

/// Today's local date
pub fn today() -> NaiveDate {
    Local::now().date_naive()
}

/// Parse a `YYYY-MM-DD` date argument
pub fn parse_date(s: &str) -> VaultResult<NaiveDate> {
    NaiveDate::parse_from_str(s.trim(), "%Y-%m-%d").map_err(|_| {
        VaultError::Validation(format!("Invalid date '{}': expected YYYY-MM-DD", s))
    })
}

/// Parse a `YYYY-MM` month argument
pub fn parse_month(s: &str) -> VaultResult<YearMonth> {
    s.parse()
        .map_err(|e| VaultError::Validation(format!("Invalid month '{}': {}", s, e)))
}

/// Parse a non-negative amount argument
pub fn parse_amount(s: &str) -> VaultResult<Money> {
    let amount =
        Money::parse(s).map_err(|e| VaultError::Validation(format!("Invalid amount: {}", e)))?;
    if amount.is_negative() {
        return Err(VaultError::Validation(
            "Amount must not be negative; use --income or --expense for direction".into(),
        ));
    }
    Ok(amount)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_date() {
        assert_eq!(
            parse_date("2025-03-09").unwrap(),
            NaiveDate::from_ymd_opt(2025, 3, 9).unwrap()
        );
        assert!(parse_date("09/03/2025").unwrap_err().is_validation());
    }

    #[test]
    fn test_parse_amount() {
        assert_eq!(parse_amount("12.5").unwrap(), Money::from_cents(1250));
        assert!(parse_amount("-3").is_err());
        assert!(parse_amount("abc").is_err());
    }

    #[test]
    fn test_parse_month() {
        assert_eq!(parse_month("2025-02").unwrap().to_string(), "2025-02");
        assert!(parse_month("2025-13").is_err());
    }
}
