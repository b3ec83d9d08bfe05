//! Transaction display formatting

use std::collections::HashMap;

use tabled::Tabled;

use crate::models::{CategoryId, Transaction, TransactionType};

use super::{render_table, truncate};

#[derive(Tabled)]
struct TransactionRow {
    #[tabled(rename = "ID")]
    id: String,
    #[tabled(rename = "Date")]
    date: String,
    #[tabled(rename = "Description")]
    description: String,
    #[tabled(rename = "Category")]
    category: String,
    #[tabled(rename = "Amount")]
    amount: String,
}

/// Signed amount: income positive, expenses negative
fn signed(txn: &Transaction, currency: &str) -> String {
    txn.signed_amount().format_with_symbol(currency)
}

pub fn format_transaction_list(
    transactions: &[Transaction],
    category_names: &HashMap<CategoryId, String>,
    currency: &str,
) -> String {
    if transactions.is_empty() {
        return "No transactions found.\n".to_string();
    }

    let rows = transactions
        .iter()
        .map(|t| TransactionRow {
            id: t.id.to_string(),
            date: t.date.format("%Y-%m-%d").to_string(),
            description: if t.description.is_empty() {
                "(no description)".to_string()
            } else {
                truncate(&t.description, 30)
            },
            category: category_names
                .get(&t.category_id)
                .cloned()
                .unwrap_or_else(|| "Unknown".to_string()),
            amount: signed(t, currency),
        })
        .collect();

    format!("{}\n", render_table(rows))
}

pub fn format_transaction_details(txn: &Transaction, category_name: Option<&str>, currency: &str) -> String {
    let mut output = String::new();

    output.push_str(&format!("Transaction: {}\n", txn.id.to_full_string()));
    output.push_str(&format!("  Date:        {}\n", txn.date.format("%Y-%m-%d")));
    output.push_str(&format!(
        "  Type:        {}\n",
        match txn.kind {
            TransactionType::Income => "income",
            TransactionType::Expense => "expense",
        }
    ));
    output.push_str(&format!("  Amount:      {}\n", txn.amount.format_with_symbol(currency)));
    output.push_str(&format!("  Category:    {}\n", category_name.unwrap_or("Unknown")));
    if !txn.description.is_empty() {
        output.push_str(&format!("  Description: {}\n", txn.description));
    }
    output.push_str(&format!("  Created:     {}\n", txn.created_at.format("%Y-%m-%d %H:%M")));
    if txn.updated_at != txn.created_at {
        output.push_str(&format!("  Updated:     {}\n", txn.updated_at.format("%Y-%m-%d %H:%M")));
    }

    output
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{Category, Money};
    use chrono::NaiveDate;

    #[test]
    fn test_list_signs_amounts() {
        let food = Category::new("Food");
        let salary = Category::new("Salary");
        let date = NaiveDate::from_ymd_opt(2025, 1, 10).unwrap();
        let txns = vec![
            Transaction::new("Lunch", Money::from_cents(1550), date, TransactionType::Expense, food.id),
            Transaction::new("Pay", Money::from_units(1000), date, TransactionType::Income, salary.id),
        ];
        let names: HashMap<_, _> = [(food.id, "Food".to_string())].into_iter().collect();

        let output = format_transaction_list(&txns, &names, "$");
        assert!(output.contains("-$15.50"));
        assert!(output.contains("$1000.00"));
        assert!(output.contains("Unknown"));
    }

    #[test]
    fn test_empty_list() {
        assert_eq!(format_transaction_list(&[], &HashMap::new(), "$"), "No transactions found.\n");
    }

    #[test]
    fn test_details() {
        let food = Category::new("Food");
        let txn = Transaction::expense(
            Money::from_units(12),
            NaiveDate::from_ymd_opt(2025, 2, 3).unwrap(),
            food.id,
        );
        let output = format_transaction_details(&txn, Some("Food"), "$");
        assert!(output.contains("Type:        expense"));
        assert!(output.contains("Category:    Food"));
        assert!(!output.contains("Description"));
    }
}
