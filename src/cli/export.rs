//! CLI commands for CSV export

use std::fs::File;
use std::io::{self, BufWriter, Write};
use std::path::PathBuf;

use clap::{Args, Subcommand};

use crate::config::{CsvDelimiter, Settings};
use crate::error::{VaultError, VaultResult};
use crate::export::{export_flow_csv, export_transactions_csv, export_trends_csv};
use crate::reports::{CategoryTrendsReport, FinancialFlowReport};
use crate::storage::Storage;

use super::{parse_date, today};

/// Output options shared by every export
#[derive(Args, Debug, Clone)]
pub struct ExportTarget {
    /// Output file (defaults to stdout)
    #[arg(short, long)]
    output: Option<PathBuf>,
    /// Field delimiter: comma or semicolon (defaults to the configured one)
    #[arg(short, long)]
    delimiter: Option<CsvDelimiter>,
}

/// Export subcommands
#[derive(Subcommand, Debug)]
pub enum ExportCommands {
    /// Export the raw ledger
    Transactions {
        #[command(flatten)]
        target: ExportTarget,
    },

    /// Export monthly expense totals per category
    Trends {
        /// Treat this date as today (YYYY-MM-DD)
        #[arg(long)]
        as_of: Option<String>,
        #[command(flatten)]
        target: ExportTarget,
    },

    /// Export the monthly financial flow
    Flow {
        /// Treat this date as today (YYYY-MM-DD)
        #[arg(long)]
        as_of: Option<String>,
        #[command(flatten)]
        target: ExportTarget,
    },
}

/// Handle export commands
pub fn handle_export_command(
    storage: &Storage,
    settings: &Settings,
    cmd: ExportCommands,
) -> VaultResult<()> {
    let transactions = storage.transactions.get_all()?;
    let as_of = |value: Option<String>| -> VaultResult<_> {
        value.as_deref().map(parse_date).unwrap_or_else(|| Ok(today()))
    };

    match cmd {
        ExportCommands::Transactions { target } => {
            let delimiter = target.delimiter(settings);
            let count = target.write(|out| export_transactions_csv(&transactions, out, delimiter))?;
            target.report(count, "transaction(s)");
        }

        ExportCommands::Trends { as_of: date, target } => {
            let categories = storage.categories.get_all()?;
            let report = CategoryTrendsReport::generate(&transactions, &categories, as_of(date)?);
            let delimiter = target.delimiter(settings);
            let count = target.write(|out| export_trends_csv(&report, out, delimiter))?;
            target.report(count, "month(s)");
        }

        ExportCommands::Flow { as_of: date, target } => {
            let categories = storage.categories.get_all()?;
            let report = FinancialFlowReport::generate(&transactions, &categories, as_of(date)?);
            let delimiter = target.delimiter(settings);
            let count = target.write(|out| export_flow_csv(&report, out, delimiter))?;
            target.report(count, "month(s)");
        }
    }

    Ok(())
}

impl ExportTarget {
    fn delimiter(&self, settings: &Settings) -> CsvDelimiter {
        self.delimiter
            .unwrap_or(settings.preferences.csv_delimiter)
    }

    fn write<F>(&self, export: F) -> VaultResult<usize>
    where
        F: FnOnce(&mut dyn Write) -> VaultResult<usize>,
    {
        match &self.output {
            Some(path) => {
                let file = File::create(path).map_err(|e| {
                    VaultError::Export(format!("Failed to create file {}: {}", path.display(), e))
                })?;
                let mut writer = BufWriter::new(file);
                let count = export(&mut writer)?;
                writer.flush()?;
                Ok(count)
            }
            None => {
                let stdout = io::stdout();
                let mut lock = stdout.lock();
                export(&mut lock)
            }
        }
    }

    /// Summary line, kept off stdout when stdout carries the data
    fn report(&self, count: usize, what: &str) {
        match &self.output {
            Some(path) => println!("Exported {} {} to: {}", count, what, path.display()),
            None => tracing::debug!(count, what, "Exported to stdout"),
        }
    }
}
