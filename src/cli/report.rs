//! Report CLI commands

use chrono::NaiveDate;
use clap::{Args, Subcommand};
use serde::Serialize;

use crate::config::Settings;
use crate::display::report::{
    format_budget_progress, format_category_metrics, format_category_trends,
    format_expense_statistics, format_flow_report,
};
use crate::error::VaultResult;
use crate::models::{Transaction, YearMonth};
use crate::reports::{
    classify, BudgetProgressReport, CategoryTrendsReport, ExpenseStatistics, FinancialFlowReport,
};
use crate::storage::Storage;

use super::{parse_date, parse_month, today};

/// Options shared by every report
#[derive(Args, Clone)]
pub struct ReportOptions {
    /// Treat this date as today (YYYY-MM-DD)
    #[arg(long)]
    as_of: Option<String>,
    /// Print JSON instead of a table
    #[arg(long)]
    json: bool,
}

/// Optional date window applied before aggregating
#[derive(Args, Clone)]
pub struct DateWindow {
    /// Start date (YYYY-MM-DD)
    #[arg(long)]
    from: Option<String>,
    /// End date (YYYY-MM-DD)
    #[arg(long)]
    to: Option<String>,
}

impl DateWindow {
    fn apply(&self, mut transactions: Vec<Transaction>) -> VaultResult<Vec<Transaction>> {
        if let Some(from) = &self.from {
            let from = parse_date(from)?;
            transactions.retain(|t| t.date >= from);
        }
        if let Some(to) = &self.to {
            let to = parse_date(to)?;
            transactions.retain(|t| t.date <= to);
        }
        Ok(transactions)
    }
}

/// Report subcommands
#[derive(Subcommand)]
pub enum ReportCommands {
    /// Monthly salary, yield, expenses and running totals
    Flow {
        #[command(flatten)]
        options: ReportOptions,
    },

    /// Expense totals per category across months
    Trends {
        /// Only show the largest N categories
        #[arg(long)]
        top: Option<usize>,
        #[command(flatten)]
        options: ReportOptions,
    },

    /// Averages, peak weekday and peak day of month for expenses
    Expenses {
        #[command(flatten)]
        window: DateWindow,
        #[command(flatten)]
        options: ReportOptions,
    },

    /// Recurring vs occasional spending categories
    Categories {
        #[command(flatten)]
        window: DateWindow,
        #[command(flatten)]
        options: ReportOptions,
    },

    /// Spending against category budget limits
    Budget {
        /// Month to report (YYYY-MM, defaults to the current month)
        #[arg(short, long)]
        month: Option<String>,
        #[command(flatten)]
        options: ReportOptions,
    },
}

impl ReportOptions {
    fn as_of(&self) -> VaultResult<NaiveDate> {
        self.as_of.as_deref().map(parse_date).unwrap_or_else(|| Ok(today()))
    }
}

fn print_json<T: Serialize>(value: &T) -> VaultResult<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

/// Handle a report command
pub fn handle_report_command(
    storage: &Storage,
    settings: &Settings,
    cmd: ReportCommands,
) -> VaultResult<()> {
    let transactions = storage.transactions.get_all()?;
    let categories = storage.categories.get_all()?;
    let currency = settings.preferences.currency_symbol.as_str();

    match cmd {
        ReportCommands::Flow { options } => {
            let report = FinancialFlowReport::generate(&transactions, &categories, options.as_of()?);
            if options.json {
                return print_json(&report);
            }
            print!("{}", format_flow_report(&report, currency));
        }

        ReportCommands::Trends { top, options } => {
            let mut report =
                CategoryTrendsReport::generate(&transactions, &categories, options.as_of()?);
            if let Some(n) = top {
                report = report.top(n);
            }
            if options.json {
                return print_json(&report);
            }
            print!("{}", format_category_trends(&report, currency));
        }

        ReportCommands::Expenses { window, options } => {
            let transactions = window.apply(transactions)?;
            let stats = ExpenseStatistics::generate(&transactions);
            if options.json {
                return print_json(&stats);
            }
            print!("{}", format_expense_statistics(&stats, currency));
        }

        ReportCommands::Categories { window, options } => {
            let transactions = window.apply(transactions)?;
            let metrics = classify(&transactions, &categories);
            if options.json {
                return print_json(&metrics);
            }
            print!("{}", format_category_metrics(&metrics, currency));
        }

        ReportCommands::Budget { month, options } => {
            let month = match month {
                Some(m) => parse_month(&m)?,
                None => YearMonth::from_date(options.as_of()?),
            };
            let report = BudgetProgressReport::generate(&transactions, &categories, month);
            if options.json {
                return print_json(&report);
            }
            print!("{}", format_budget_progress(&report, currency));
        }
    }

    Ok(())
}
