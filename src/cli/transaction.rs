//! Transaction CLI commands

use std::collections::HashMap;

use clap::Subcommand;

use crate::config::Settings;
use crate::display::transaction::{format_transaction_details, format_transaction_list};
use crate::error::VaultResult;
use crate::models::TransactionType;
use crate::services::{
    CategoryService, CreateTransactionInput, TransactionFilter, TransactionService,
    UpdateTransactionInput,
};
use crate::storage::Storage;

use super::{parse_amount, parse_date, parse_month, today};

/// Transaction subcommands
#[derive(Subcommand)]
pub enum TransactionCommands {
    /// Record a transaction
    Add {
        /// Amount (e.g. "42.50")
        amount: String,
        /// Category name or ID
        #[arg(short, long)]
        category: String,
        /// Record as income instead of an expense
        #[arg(short, long)]
        income: bool,
        /// Transaction date (YYYY-MM-DD, defaults to today)
        #[arg(short, long)]
        date: Option<String>,
        /// Description
        #[arg(short = 'm', long)]
        description: Option<String>,
    },

    /// List transactions, most recent first
    List {
        /// Filter by category name or ID
        #[arg(short, long)]
        category: Option<String>,
        /// Only income or only expense
        #[arg(short = 't', long = "type")]
        kind: Option<TransactionType>,
        /// Only this month (YYYY-MM)
        #[arg(long, conflicts_with_all = ["from", "to"])]
        month: Option<String>,
        /// Start date (YYYY-MM-DD)
        #[arg(long)]
        from: Option<String>,
        /// End date (YYYY-MM-DD)
        #[arg(long)]
        to: Option<String>,
        /// Number of transactions to show
        #[arg(short, long, default_value = "20")]
        limit: usize,
    },

    /// Show transaction details
    Show {
        /// Transaction ID
        id: String,
    },

    /// Edit a transaction
    Edit {
        /// Transaction ID
        id: String,
        /// New amount
        #[arg(short, long)]
        amount: Option<String>,
        /// New category name or ID
        #[arg(short, long)]
        category: Option<String>,
        /// New type (income or expense)
        #[arg(short = 't', long = "type")]
        kind: Option<TransactionType>,
        /// New date (YYYY-MM-DD)
        #[arg(short, long)]
        date: Option<String>,
        /// New description
        #[arg(short = 'm', long)]
        description: Option<String>,
    },

    /// Delete a transaction
    Delete {
        /// Transaction ID
        id: String,
    },
}

/// Handle a transaction command
pub fn handle_transaction_command(
    storage: &Storage,
    settings: &Settings,
    cmd: TransactionCommands,
) -> VaultResult<()> {
    let service = TransactionService::new(storage);
    let categories = CategoryService::new(storage);
    let currency = settings.preferences.currency_symbol.as_str();

    match cmd {
        TransactionCommands::Add {
            amount,
            category,
            income,
            date,
            description,
        } => {
            let category = categories.require_category(&category)?;
            let date = match date {
                Some(d) => parse_date(&d)?,
                None => today(),
            };
            let kind = if income {
                TransactionType::Income
            } else {
                TransactionType::Expense
            };

            let txn = service.create(CreateTransactionInput {
                description: description.unwrap_or_default(),
                amount: parse_amount(&amount)?,
                date,
                kind,
                category_id: category.id,
            })?;

            println!(
                "Recorded {} of {} in {} on {}",
                if txn.is_income() { "income" } else { "expense" },
                txn.amount.format_with_symbol(currency),
                category.name,
                txn.date
            );
            println!("  ID: {}", txn.id);
        }

        TransactionCommands::List {
            category,
            kind,
            month,
            from,
            to,
            limit,
        } => {
            let mut filter = TransactionFilter::new().limit(limit);
            if let Some(category) = category {
                filter = filter.category(categories.require_category(&category)?.id);
            }
            if let Some(kind) = kind {
                filter = filter.kind(kind);
            }
            if let Some(month) = month {
                filter = filter.month(parse_month(&month)?);
            }
            if let Some(from) = from {
                filter.start_date = Some(parse_date(&from)?);
            }
            if let Some(to) = to {
                filter.end_date = Some(parse_date(&to)?);
            }

            let transactions = service.list(filter)?;
            let names: HashMap<_, _> = categories
                .list_categories()?
                .into_iter()
                .map(|c| (c.id, c.name))
                .collect();
            print!("{}", format_transaction_list(&transactions, &names, currency));
        }

        TransactionCommands::Show { id } => {
            let txn = service.require(&id)?;
            let category = categories.get_category(txn.category_id)?;
            print!(
                "{}",
                format_transaction_details(&txn, category.as_ref().map(|c| c.name.as_str()), currency)
            );
        }

        TransactionCommands::Edit {
            id,
            amount,
            category,
            kind,
            date,
            description,
        } => {
            let txn = service.require(&id)?;
            let input = UpdateTransactionInput {
                description,
                amount: amount.map(|a| parse_amount(&a)).transpose()?,
                date: date.map(|d| parse_date(&d)).transpose()?,
                kind,
                category_id: category
                    .map(|c| categories.require_category(&c).map(|c| c.id))
                    .transpose()?,
            };

            let updated = service.update(txn.id, input)?;
            println!("Updated transaction {}", updated.id);
        }

        TransactionCommands::Delete { id } => {
            let txn = service.require(&id)?;
            service.delete(txn.id)?;
            println!("Deleted transaction {}", txn.id);
        }
    }

    Ok(())
}
