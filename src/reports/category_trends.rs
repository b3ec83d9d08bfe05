//! Expense totals per category, month by month
//!
//! Only expense transactions count, and categories whose kind marks them
//! as income-only (salary, investment, yield) are left out entirely.

use std::collections::HashMap;

use chrono::NaiveDate;
use serde::Serialize;

use crate::models::{Category, CategoryId, Money, Transaction, YearMonth};

use super::{category_map, ledger_months};

/// Label used for transactions whose category no longer exists
pub const UNKNOWN_CATEGORY: &str = "(unknown)";

/// Label for a missing category, kept distinct per id
pub fn unknown_category_label(id: CategoryId) -> String {
    format!("{} {}", UNKNOWN_CATEGORY, id)
}

/// All-time expense total of one category
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CategoryTotal {
    pub category_id: CategoryId,
    pub name: String,
    pub color: Option<u32>,
    pub total: Money,
    pub transaction_count: usize,
}

/// Expense amounts for one month, keyed by category
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MonthlyCategoryExpenses {
    pub month: YearMonth,
    pub amounts: HashMap<CategoryId, Money>,
}

impl MonthlyCategoryExpenses {
    /// Amount spent in a category this month (zero when absent)
    pub fn amount(&self, category_id: &CategoryId) -> Money {
        self.amounts.get(category_id).copied().unwrap_or_default()
    }

    pub fn total(&self) -> Money {
        self.amounts.values().sum()
    }
}

/// Category trends over the ledger's months
#[derive(Debug, Clone, Default, Serialize)]
pub struct CategoryTrendsReport {
    /// Categories ordered by all-time total, largest first
    pub categories: Vec<CategoryTotal>,
    /// One entry per ledger month, ascending
    pub months: Vec<MonthlyCategoryExpenses>,
}

impl CategoryTrendsReport {
    pub fn generate(transactions: &[Transaction], categories: &[Category], as_of: NaiveDate) -> Self {
        let lookup = category_map(categories);

        let mut totals: HashMap<CategoryId, CategoryTotal> = HashMap::new();
        let mut by_month: HashMap<YearMonth, HashMap<CategoryId, Money>> = HashMap::new();

        for txn in transactions.iter().filter(|t| t.is_expense()) {
            let category = lookup.get(&txn.category_id);
            if category.is_some_and(|c| c.is_income_only()) {
                continue;
            }

            let entry = totals.entry(txn.category_id).or_insert_with(|| CategoryTotal {
                category_id: txn.category_id,
                name: category
                    .map(|c| c.name.clone())
                    .unwrap_or_else(|| unknown_category_label(txn.category_id)),
                color: category.map(|c| c.color),
                total: Money::zero(),
                transaction_count: 0,
            });
            entry.total += txn.amount;
            entry.transaction_count += 1;

            *by_month
                .entry(YearMonth::from_date(txn.date))
                .or_default()
                .entry(txn.category_id)
                .or_default() += txn.amount;
        }

        let mut categories: Vec<CategoryTotal> = totals.into_values().collect();
        categories.sort_by(|a, b| {
            b.total
                .cmp(&a.total)
                .then_with(|| a.name.to_lowercase().cmp(&b.name.to_lowercase()))
                .then_with(|| a.category_id.cmp(&b.category_id))
        });

        let months = ledger_months(transactions, as_of)
            .into_iter()
            .map(|month| MonthlyCategoryExpenses {
                month,
                amounts: by_month.remove(&month).unwrap_or_default(),
            })
            .collect();

        Self { categories, months }
    }

    pub fn is_empty(&self) -> bool {
        self.categories.is_empty()
    }

    /// Sum of every category's all-time total
    pub fn grand_total(&self) -> Money {
        self.categories.iter().map(|c| c.total).sum()
    }

    /// Share of the grand total spent in a category, as a percentage
    pub fn share(&self, category_id: &CategoryId) -> f64 {
        let grand = self.grand_total();
        if grand.is_zero() {
            return 0.0;
        }
        self.categories
            .iter()
            .find(|c| &c.category_id == category_id)
            .map(|c| c.total.as_f64() / grand.as_f64() * 100.0)
            .unwrap_or(0.0)
    }

    /// Keep only the `n` largest categories
    pub fn top(mut self, n: usize) -> Self {
        self.categories.truncate(n);
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::CategoryKind;
    use crate::reports::test_support::*;

    #[test]
    fn test_totals_sorted_descending() {
        let food = Category::new("Food");
        let transport = Category::new("Transport");
        let txns = vec![
            expense(&food, 40, date(2025, 1, 3)),
            expense(&transport, 100, date(2025, 1, 4)),
            expense(&food, 30, date(2025, 2, 3)),
        ];

        let report = CategoryTrendsReport::generate(
            &txns,
            &[food.clone(), transport.clone()],
            date(2025, 2, 28),
        );

        let names: Vec<_> = report.categories.iter().map(|c| c.name.as_str()).collect();
        assert_eq!(names, vec!["Transport", "Food"]);
        assert_eq!(report.categories[1].total, Money::from_units(70));
        assert_eq!(report.categories[1].transaction_count, 2);

        assert_eq!(report.months.len(), 2);
        assert_eq!(report.months[0].amount(&food.id), Money::from_units(40));
        assert_eq!(report.months[1].amount(&transport.id), Money::zero());
        assert_eq!(report.grand_total(), Money::from_units(170));
    }

    #[test]
    fn test_excludes_income_categories_and_income_transactions() {
        let food = Category::new("Food");
        let investments = Category::with_kind("Investments", CategoryKind::Investment);
        let salary = Category::with_kind("Salary", CategoryKind::Salary);
        let txns = vec![
            expense(&food, 10, date(2025, 1, 3)),
            expense(&investments, 500, date(2025, 1, 4)),
            income(&salary, 1000, date(2025, 1, 5)),
            income(&food, 5, date(2025, 1, 6)),
        ];

        let report = CategoryTrendsReport::generate(
            &txns,
            &[food, investments, salary],
            date(2025, 1, 31),
        );
        assert_eq!(report.categories.len(), 1);
        assert_eq!(report.categories[0].name, "Food");
        assert_eq!(report.grand_total(), Money::from_units(10));
    }

    #[test]
    fn test_gap_months_are_present_and_empty() {
        let food = Category::new("Food");
        let txns = vec![
            expense(&food, 10, date(2025, 1, 3)),
            expense(&food, 10, date(2025, 3, 3)),
        ];
        let report = CategoryTrendsReport::generate(&txns, &[food], date(2025, 3, 31));

        assert_eq!(report.months.len(), 3);
        assert_eq!(report.months[1].total(), Money::zero());
    }

    #[test]
    fn test_share_and_top() {
        let food = Category::new("Food");
        let fun = Category::new("Leisure");
        let txns = vec![
            expense(&food, 75, date(2025, 1, 3)),
            expense(&fun, 25, date(2025, 1, 4)),
        ];
        let report = CategoryTrendsReport::generate(&txns, &[food.clone(), fun], date(2025, 1, 31));

        assert!((report.share(&food.id) - 75.0).abs() < 1e-9);
        assert_eq!(report.top(1).categories.len(), 1);
    }

    #[test]
    fn test_unknown_category_label() {
        let ghost = Category::new("Ghost");
        let txns = vec![expense(&ghost, 12, date(2025, 1, 3))];
        let report = CategoryTrendsReport::generate(&txns, &[], date(2025, 1, 31));
        assert_eq!(report.categories[0].name, format!("(unknown) {}", ghost.id));
    }

    #[test]
    fn test_empty_ledger() {
        let report = CategoryTrendsReport::generate(&[], &[], date(2025, 1, 1));
        assert!(report.is_empty());
        assert!(report.months.is_empty());
        assert_eq!(report.grand_total(), Money::zero());
    }
}
