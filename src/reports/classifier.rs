//! Recurring vs occasional spending categories

use std::collections::HashMap;

use serde::Serialize;

use crate::models::{Category, CategoryId, Money, Transaction};

use super::category_trends::unknown_category_label;
use super::{category_map, day_span, expense_date_range};

/// Minimum transactions per month for a category to count as recurring
pub const RECURRING_THRESHOLD: f64 = 1.0;

/// Per-category spending metrics
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CategoryMetric {
    pub category_id: CategoryId,
    pub name: String,
    pub transaction_count: usize,
    pub total: Money,
    pub average_ticket: Money,
    /// Transactions per 30-day month over the ledger's expense span
    pub monthly_frequency: f64,
    pub is_recurring: bool,
}

impl CategoryMetric {
    pub fn label(&self) -> &'static str {
        if self.is_recurring {
            "recurring"
        } else {
            "occasional"
        }
    }
}

/// Classify every category that has at least one expense
///
/// The month span is shared by all categories: the inclusive day span of
/// the whole expense ledger divided by 30, floored at one month. Results
/// are ordered by total, largest first.
pub fn classify(transactions: &[Transaction], categories: &[Category]) -> Vec<CategoryMetric> {
    let Some((first, last)) = expense_date_range(transactions) else {
        return Vec::new();
    };
    let months_span = (day_span(first, last) as f64 / 30.0).max(1.0);

    let mut grouped: HashMap<CategoryId, (usize, Money)> = HashMap::new();
    for txn in transactions.iter().filter(|t| t.is_expense()) {
        let (count, total) = grouped.entry(txn.category_id).or_default();
        *count += 1;
        *total += txn.amount;
    }

    let lookup = category_map(categories);
    let mut metrics: Vec<CategoryMetric> = grouped
        .into_iter()
        .map(|(category_id, (count, total))| {
            let monthly_frequency = count as f64 / months_span;
            CategoryMetric {
                category_id,
                name: lookup
                    .get(&category_id)
                    .map(|c| c.name.clone())
                    .unwrap_or_else(|| unknown_category_label(category_id)),
                transaction_count: count,
                total,
                average_ticket: total.div_f64(count as f64),
                monthly_frequency,
                is_recurring: monthly_frequency >= RECURRING_THRESHOLD,
            }
        })
        .collect();

    metrics.sort_by(|a, b| {
        b.total
            .cmp(&a.total)
            .then_with(|| a.name.to_lowercase().cmp(&b.name.to_lowercase()))
            .then_with(|| a.category_id.cmp(&b.category_id))
    });
    metrics
}
