//! Category CLI commands

use clap::Subcommand;

use crate::config::Settings;
use crate::display::category::{format_category_details, format_category_list};
use crate::error::{VaultError, VaultResult};
use crate::models::category::parse_color;
use crate::models::CategoryKind;
use crate::services::{CategoryChanges, CategoryService};
use crate::storage::Storage;

use super::parse_amount;

/// Category subcommands
#[derive(Subcommand)]
pub enum CategoryCommands {
    /// List all categories
    List,

    /// Create a new category
    Add {
        /// Category name
        name: String,
        /// Kind: expense, salary, investment or yield
        #[arg(short, long, default_value = "expense")]
        kind: CategoryKind,
        /// Monthly budget limit (e.g. "500" or "500.00")
        #[arg(short, long)]
        budget: Option<String>,
        /// Color as #RRGGBB or #AARRGGBB
        #[arg(long)]
        color: Option<String>,
        /// Icon token
        #[arg(long)]
        icon: Option<String>,
    },

    /// Show category details
    Show {
        /// Category name or ID
        category: String,
    },

    /// Edit a category
    Edit {
        /// Category name or ID
        category: String,
        /// New name
        #[arg(short, long)]
        name: Option<String>,
        /// New kind
        #[arg(short, long)]
        kind: Option<CategoryKind>,
        /// New monthly budget limit
        #[arg(short, long, conflicts_with = "clear_budget")]
        budget: Option<String>,
        /// Remove the budget limit
        #[arg(long)]
        clear_budget: bool,
        /// New color
        #[arg(long)]
        color: Option<String>,
        /// New icon token
        #[arg(long)]
        icon: Option<String>,
    },

    /// Delete a category with no transactions
    Delete {
        /// Category name or ID
        category: String,
    },
}

fn parse_color_arg(color: Option<String>) -> VaultResult<Option<u32>> {
    color
        .map(|c| parse_color(&c).map_err(|e| VaultError::Validation(e.to_string())))
        .transpose()
}

fn parse_budget_arg(budget: Option<String>) -> VaultResult<Option<crate::models::Money>> {
    budget.map(|b| parse_amount(&b)).transpose()
}

/// Handle a category command
pub fn handle_category_command(
    storage: &Storage,
    settings: &Settings,
    cmd: CategoryCommands,
) -> VaultResult<()> {
    let service = CategoryService::new(storage);
    let currency = settings.preferences.currency_symbol.as_str();

    match cmd {
        CategoryCommands::List => {
            let categories = service.list_categories()?;
            let counts = categories
                .iter()
                .map(|c| Ok((c.id, storage.transactions.count_by_category(c.id)?)))
                .collect::<VaultResult<_>>()?;
            print!("{}", format_category_list(&categories, &counts, currency));
        }

        CategoryCommands::Add {
            name,
            kind,
            budget,
            color,
            icon,
        } => {
            let changes = CategoryChanges {
                color: parse_color_arg(color)?,
                icon: icon.map(Some),
                budget_limit: parse_budget_arg(budget)?.map(Some),
                ..Default::default()
            };
            let category = service.create_category(&name, kind, changes)?;

            println!("Created category: {}", category.name);
            println!("  Kind: {}", category.kind());
            if let Some(limit) = category.budget_limit {
                println!("  Budget: {}", limit.format_with_symbol(currency));
            }
            println!("  ID: {}", category.id);
        }

        CategoryCommands::Show { category } => {
            let category = service.require_category(&category)?;
            let count = storage.transactions.count_by_category(category.id)?;
            print!("{}", format_category_details(&category, count, currency));
        }

        CategoryCommands::Edit {
            category,
            name,
            kind,
            budget,
            clear_budget,
            color,
            icon,
        } => {
            let existing = service.require_category(&category)?;

            let budget_limit = if clear_budget {
                Some(None)
            } else {
                parse_budget_arg(budget)?.map(Some)
            };
            let changes = CategoryChanges {
                name,
                color: parse_color_arg(color)?,
                icon: icon.map(Some),
                budget_limit,
                kind,
            };

            if changes.is_empty() {
                println!("Nothing to change. See 'finvault category edit --help'.");
                return Ok(());
            }

            let updated = service.update_category(existing.id, changes)?;
            println!("Updated category: {}", updated.name);
        }

        CategoryCommands::Delete { category } => {
            let existing = service.require_category(&category)?;
            let deleted = service.delete_category(existing.id)?;
            println!("Deleted category: {}", deleted.name);
        }
    }

    Ok(())
}
