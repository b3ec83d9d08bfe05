//! Financial flow report
//!
//! Folds the ledger into one row per calendar month with salary, yield and
//! expense totals plus running accumulators carried forward from the first
//! month of the ledger.

use chrono::NaiveDate;
use serde::Serialize;

use crate::models::{Category, Money, Transaction, TransactionType, YearMonth};

use super::{category_map, ledger_months};

/// Totals for one month and the running sums up to it
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MonthlyFinancialData {
    pub month: YearMonth,
    /// Income outside yield categories
    pub salary: Money,
    /// Income filed under yield categories
    pub monthly_yield: Money,
    pub total_expense: Money,
    /// Sum of `monthly_yield` through this month
    pub accumulated_yield: Money,
    /// Sum of `salary + monthly_yield - total_expense` through this month
    pub accumulated_balance: Money,
    /// Sum of `salary + monthly_yield` through this month
    pub total_wealth: Money,
}

impl MonthlyFinancialData {
    /// Net result of this month alone
    pub fn net(&self) -> Money {
        self.salary + self.monthly_yield - self.total_expense
    }
}

/// Month-by-month financial flow
#[derive(Debug, Clone, Default, Serialize)]
pub struct FinancialFlowReport {
    pub months: Vec<MonthlyFinancialData>,
}

impl FinancialFlowReport {
    /// Build the report
    ///
    /// Income whose category is missing from `categories` counts as salary.
    pub fn generate(transactions: &[Transaction], categories: &[Category], as_of: NaiveDate) -> Self {
        let months = ledger_months(transactions, as_of);
        let Some(&first_month) = months.first() else {
            return Self::default();
        };

        let lookup = category_map(categories);
        let mut buckets = vec![(Money::zero(), Money::zero(), Money::zero()); months.len()];

        for txn in transactions {
            let index = month_index(first_month, YearMonth::from_date(txn.date));
            let Some((salary, yield_, expense)) = buckets.get_mut(index) else {
                continue;
            };

            match txn.kind {
                TransactionType::Expense => *expense += txn.amount,
                TransactionType::Income => {
                    let is_yield = lookup
                        .get(&txn.category_id)
                        .is_some_and(|c| c.is_yield());
                    if is_yield {
                        *yield_ += txn.amount;
                    } else {
                        *salary += txn.amount;
                    }
                }
            }
        }

        let mut accumulated_yield = Money::zero();
        let mut accumulated_balance = Money::zero();
        let mut total_wealth = Money::zero();

        let rows = months
            .into_iter()
            .zip(buckets)
            .map(|(month, (salary, monthly_yield, total_expense))| {
                accumulated_yield += monthly_yield;
                accumulated_balance += salary + monthly_yield - total_expense;
                total_wealth += salary + monthly_yield;

                MonthlyFinancialData {
                    month,
                    salary,
                    monthly_yield,
                    total_expense,
                    accumulated_yield,
                    accumulated_balance,
                    total_wealth,
                }
            })
            .collect();

        Self { months: rows }
    }

    pub fn is_empty(&self) -> bool {
        self.months.is_empty()
    }

    /// The most recent month
    pub fn latest(&self) -> Option<&MonthlyFinancialData> {
        self.months.last()
    }

    pub fn get(&self, month: YearMonth) -> Option<&MonthlyFinancialData> {
        self.months.iter().find(|m| m.month == month)
    }

    /// Month with the highest net result; earliest wins ties
    pub fn best_month(&self) -> Option<&MonthlyFinancialData> {
        self.months
            .iter()
            .fold(None, |best: Option<&MonthlyFinancialData>, m| match best {
                Some(b) if b.net() >= m.net() => Some(b),
                _ => Some(m),
            })
    }
}

fn month_index(first: YearMonth, month: YearMonth) -> usize {
    let offset = (month.year() - first.year()) * 12 + month.month() as i32 - first.month() as i32;
    usize::try_from(offset).unwrap_or(usize::MAX)
}
