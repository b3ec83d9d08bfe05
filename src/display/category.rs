//! Category display formatting

use std::collections::HashMap;

use tabled::Tabled;

use crate::models::{Category, CategoryId};

use super::render_table;

#[derive(Tabled)]
struct CategoryRow {
    #[tabled(rename = "ID")]
    id: String,
    #[tabled(rename = "Name")]
    name: String,
    #[tabled(rename = "Kind")]
    kind: String,
    #[tabled(rename = "Budget")]
    budget: String,
    #[tabled(rename = "Color")]
    color: String,
    #[tabled(rename = "Txns")]
    transactions: usize,
}

/// Table of categories with their transaction counts
pub fn format_category_list(
    categories: &[Category],
    counts: &HashMap<CategoryId, usize>,
    currency: &str,
) -> String {
    if categories.is_empty() {
        return "No categories found.\n\nRun 'finvault init' to create the default categories."
            .to_string();
    }

    let rows = categories
        .iter()
        .map(|c| CategoryRow {
            id: c.id.to_string(),
            name: if c.is_default {
                format!("{} *", c.name)
            } else {
                c.name.clone()
            },
            kind: c.kind().to_string(),
            budget: c
                .budget_limit
                .map(|b| b.format_with_symbol(currency))
                .unwrap_or_else(|| "-".to_string()),
            color: c.color_hex(),
            transactions: counts.get(&c.id).copied().unwrap_or(0),
        })
        .collect();

    format!("{}\n* default category\n", render_table(rows))
}

pub fn format_category_details(category: &Category, transaction_count: usize, currency: &str) -> String {
    let mut output = String::new();

    output.push_str(&format!("Category: {}\n", category.name));
    output.push_str(&format!("  ID:           {}\n", category.id.to_full_string()));
    output.push_str(&format!("  Kind:         {}\n", category.kind()));
    output.push_str(&format!("  Color:        {}\n", category.color_hex()));
    if let Some(icon) = &category.icon {
        output.push_str(&format!("  Icon:         {}\n", icon));
    }
    match category.budget_limit {
        Some(limit) => output.push_str(&format!(
            "  Budget:       {}\n",
            limit.format_with_symbol(currency)
        )),
        None => output.push_str("  Budget:       none\n"),
    }
    output.push_str(&format!("  Default:      {}\n", if category.is_default { "yes" } else { "no" }));
    output.push_str(&format!("  Transactions: {}\n", transaction_count));
    output.push_str(&format!(
        "  Created:      {}\n",
        category.created_at.format("%Y-%m-%d %H:%M")
    ));

    output
}
