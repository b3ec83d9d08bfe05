//! Budget progress for a single month
//!
//! Every category with a budget limit gets a row comparing the month's
//! expenses against the limit.

use serde::Serialize;

use crate::models::{Category, CategoryId, Money, Transaction, YearMonth};

/// One budgeted category
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BudgetProgressRow {
    pub category_id: CategoryId,
    pub name: String,
    pub limit: Money,
    pub spent: Money,
    /// Negative when over budget
    pub remaining: Money,
    pub percent_used: f64,
    pub over_budget: bool,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BudgetProgressReport {
    pub month: YearMonth,
    pub rows: Vec<BudgetProgressRow>,
    pub total_limit: Money,
    pub total_spent: Money,
}

impl BudgetProgressReport {
    pub fn generate(transactions: &[Transaction], categories: &[Category], month: YearMonth) -> Self {
        let mut budgeted: Vec<&Category> = categories
            .iter()
            .filter(|c| c.budget_limit.is_some())
            .collect();
        budgeted.sort_by(|a, b| a.name.to_lowercase().cmp(&b.name.to_lowercase()));

        let rows: Vec<BudgetProgressRow> = budgeted
            .into_iter()
            .map(|category| {
                let limit = category.budget_limit.unwrap_or_default();
                let spent: Money = transactions
                    .iter()
                    .filter(|t| {
                        t.is_expense() && t.category_id == category.id && month.contains(t.date)
                    })
                    .map(|t| t.amount)
                    .sum();

                let percent_used = if limit.is_zero() {
                    if spent.is_zero() {
                        0.0
                    } else {
                        100.0
                    }
                } else {
                    spent.as_f64() / limit.as_f64() * 100.0
                };

                BudgetProgressRow {
                    category_id: category.id,
                    name: category.name.clone(),
                    limit,
                    spent,
                    remaining: limit - spent,
                    percent_used,
                    over_budget: spent > limit,
                }
            })
            .collect();

        Self {
            month,
            total_limit: rows.iter().map(|r| r.limit).sum(),
            total_spent: rows.iter().map(|r| r.spent).sum(),
            rows,
        }
    }

    pub fn over_budget_count(&self) -> usize {
        self.rows.iter().filter(|r| r.over_budget).count()
    }

    pub fn total_remaining(&self) -> Money {
        self.total_limit - self.total_spent
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::reports::test_support::*;

    #[test]
    fn test_progress_rows() {
        let mut food = Category::new("Food");
        food.set_budget(Money::from_units(200));
        let mut fun = Category::new("Leisure");
        fun.set_budget(Money::from_units(50));
        let rent = Category::new("Housing");

        let txns = vec![
            expense(&food, 150, date(2025, 3, 2)),
            expense(&food, 999, date(2025, 2, 27)),
            expense(&fun, 80, date(2025, 3, 10)),
            expense(&rent, 1000, date(2025, 3, 1)),
        ];
        let month = YearMonth::new(2025, 3).unwrap();
        let report = BudgetProgressReport::generate(&txns, &[food, fun, rent], month);

        assert_eq!(report.rows.len(), 2);
        let food_row = &report.rows[0];
        assert_eq!(food_row.name, "Food");
        assert_eq!(food_row.spent, Money::from_units(150));
        assert_eq!(food_row.remaining, Money::from_units(50));
        assert!((food_row.percent_used - 75.0).abs() < 1e-9);
        assert!(!food_row.over_budget);

        let fun_row = &report.rows[1];
        assert!(fun_row.over_budget);
        assert_eq!(fun_row.remaining, Money::from_units(-30));

        assert_eq!(report.over_budget_count(), 1);
        assert_eq!(report.total_limit, Money::from_units(250));
        assert_eq!(report.total_spent, Money::from_units(230));
    }

    #[test]
    fn test_no_budgets() {
        let food = Category::new("Food");
        let report = BudgetProgressReport::generate(&[], &[food], YearMonth::new(2025, 1).unwrap());
        assert!(report.rows.is_empty());
        assert_eq!(report.total_remaining(), Money::zero());
    }
}
