//! Analytics over the transaction ledger
//!
//! Every report is a pure function of a ledger snapshot: the transactions,
//! the categories, and an `as_of` date standing in for "today". Empty
//! ledgers produce empty or zero-valued reports, never errors.

pub mod budget_progress;
pub mod category_trends;
pub mod classifier;
pub mod expense_patterns;
pub mod flow;

pub use budget_progress::{BudgetProgressReport, BudgetProgressRow};
pub use category_trends::{
    unknown_category_label, CategoryTotal, CategoryTrendsReport, MonthlyCategoryExpenses,
};
pub use classifier::{classify, CategoryMetric, RECURRING_THRESHOLD};
pub use expense_patterns::ExpenseStatistics;
pub use flow::{FinancialFlowReport, MonthlyFinancialData};

use std::collections::HashMap;

use chrono::NaiveDate;

use crate::models::{Category, CategoryId, Transaction, YearMonth};

/// Category lookup by id
pub(crate) fn category_map(categories: &[Category]) -> HashMap<CategoryId, &Category> {
    categories.iter().map(|c| (c.id, c)).collect()
}

/// Every month from the earliest transaction through the later of `as_of`
/// and the latest transaction, ascending with no gaps
pub fn ledger_months(transactions: &[Transaction], as_of: NaiveDate) -> Vec<YearMonth> {
    let Some(first) = transactions.iter().map(|t| t.date).min() else {
        return Vec::new();
    };
    let last = transactions
        .iter()
        .map(|t| t.date)
        .max()
        .unwrap_or(first)
        .max(as_of);

    YearMonth::from_date(first).range_inclusive(YearMonth::from_date(last))
}

/// Inclusive number of days between two dates, at least 1
pub fn day_span(first: NaiveDate, last: NaiveDate) -> i64 {
    ((last - first).num_days() + 1).max(1)
}

/// First and last date of the expense transactions, if any
pub(crate) fn expense_date_range(transactions: &[Transaction]) -> Option<(NaiveDate, NaiveDate)> {
    let mut dates = transactions.iter().filter(|t| t.is_expense()).map(|t| t.date);
    let first = dates.next()?;
    Some(dates.fold((first, first), |(lo, hi), d| (lo.min(d), hi.max(d))))
}

#[cfg(test)]
pub(crate) mod test_support {
    use chrono::NaiveDate;

    use crate::models::{Category, Money, Transaction, TransactionType};

    pub fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    pub fn expense(category: &Category, units: i64, on: NaiveDate) -> Transaction {
        Transaction::new("", Money::from_units(units), on, TransactionType::Expense, category.id)
    }

    pub fn income(category: &Category, units: i64, on: NaiveDate) -> Transaction {
        Transaction::new("", Money::from_units(units), on, TransactionType::Income, category.id)
    }
}

#[cfg(test)]
mod tests {
    use super::test_support::*;
    use super::*;

    #[test]
    fn test_ledger_months_extends_to_as_of() {
        let food = Category::new("Food");
        let txns = vec![expense(&food, 10, date(2024, 11, 20))];

        let months = ledger_months(&txns, date(2025, 2, 3));
        let labels: Vec<_> = months.iter().map(|m| m.to_string()).collect();
        assert_eq!(labels, vec!["2024-11", "2024-12", "2025-01", "2025-02"]);
    }

    #[test]
    fn test_ledger_months_covers_future_dated_entries() {
        let food = Category::new("Food");
        let txns = vec![
            expense(&food, 10, date(2025, 1, 5)),
            expense(&food, 10, date(2025, 3, 5)),
        ];
        assert_eq!(ledger_months(&txns, date(2025, 1, 31)).len(), 3);
    }

    #[test]
    fn test_ledger_months_empty() {
        assert!(ledger_months(&[], date(2025, 1, 1)).is_empty());
    }

    #[test]
    fn test_day_span() {
        assert_eq!(day_span(date(2025, 1, 1), date(2025, 1, 1)), 1);
        assert_eq!(day_span(date(2025, 1, 1), date(2025, 4, 30)), 120);
    }
}
