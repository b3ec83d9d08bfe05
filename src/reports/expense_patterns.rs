//! Descriptive statistics over expense transactions
//!
//! Averages are taken over the inclusive day span between the first and
//! last expense. The peak weekday compares the mean daily total across the
//! distinct dates falling on each weekday, so a single heavy Tuesday does
//! not lose to two light Mondays just because Monday has more entries.

use std::collections::BTreeMap;

use chrono::{Datelike, NaiveDate, Weekday};
use serde::Serialize;

use crate::models::{Money, Transaction};

use super::{day_span, expense_date_range};

/// Monday through Sunday
pub const WEEKDAYS: [Weekday; 7] = [
    Weekday::Mon,
    Weekday::Tue,
    Weekday::Wed,
    Weekday::Thu,
    Weekday::Fri,
    Weekday::Sat,
    Weekday::Sun,
];

#[derive(Debug, Clone, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ExpenseStatistics {
    pub total_expense: Money,
    pub transaction_count: usize,
    pub first_date: Option<NaiveDate>,
    pub last_date: Option<NaiveDate>,
    /// Inclusive days between first and last expense
    pub day_span: i64,
    pub average_daily: Money,
    pub average_weekly: Money,
    pub average_monthly: Money,
    /// Weekday with the highest mean daily total
    pub peak_weekday: Option<Weekday>,
    /// Day of month (1-31) with the highest total
    pub peak_day_of_month: Option<u32>,
    /// Total spent per weekday, Monday first
    pub weekday_totals: [Money; 7],
    /// Mean daily total per weekday, Monday first
    pub weekday_means: [Money; 7],
    /// Total spent per day of month, index 0 is the 1st
    pub day_of_month_totals: Vec<Money>,
}

impl ExpenseStatistics {
    pub fn generate(transactions: &[Transaction]) -> Self {
        let Some((first, last)) = expense_date_range(transactions) else {
            return Self {
                day_of_month_totals: vec![Money::zero(); 31],
                ..Self::default()
            };
        };

        let expenses: Vec<&Transaction> = transactions.iter().filter(|t| t.is_expense()).collect();
        let total_expense: Money = expenses.iter().map(|t| t.amount).sum();
        let days = day_span(first, last);

        let mut daily: BTreeMap<NaiveDate, Money> = BTreeMap::new();
        let mut day_of_month_totals = vec![Money::zero(); 31];
        for txn in &expenses {
            *daily.entry(txn.date).or_default() += txn.amount;
            day_of_month_totals[txn.date.day0() as usize] += txn.amount;
        }

        let mut weekday_totals = [Money::zero(); 7];
        let mut weekday_dates = [0i64; 7];
        for (date, amount) in &daily {
            let index = date.weekday().num_days_from_monday() as usize;
            weekday_totals[index] += *amount;
            weekday_dates[index] += 1;
        }

        let mut weekday_means = [Money::zero(); 7];
        for i in 0..7 {
            if weekday_dates[i] > 0 {
                weekday_means[i] = weekday_totals[i].div_f64(weekday_dates[i] as f64);
            }
        }

        Self {
            total_expense,
            transaction_count: expenses.len(),
            first_date: Some(first),
            last_date: Some(last),
            day_span: days,
            average_daily: total_expense.div_f64(days as f64),
            average_weekly: total_expense.div_f64((days as f64 / 7.0).max(1.0)),
            average_monthly: total_expense.div_f64((days as f64 / 30.0).max(1.0)),
            peak_weekday: peak_weekday(&weekday_totals, &weekday_dates),
            peak_day_of_month: peak_day_of_month(&day_of_month_totals),
            weekday_totals,
            weekday_means,
            day_of_month_totals,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.transaction_count == 0
    }

    /// Weekday totals scaled to 0.0..=1.0 against the busiest weekday
    pub fn weekday_heatmap(&self) -> [f64; 7] {
        let max = self.weekday_totals.iter().max().copied().unwrap_or_default();
        let mut heat = [0.0; 7];
        if max.is_positive() {
            for (cell, total) in heat.iter_mut().zip(self.weekday_totals.iter()) {
                *cell = total.as_f64() / max.as_f64();
            }
        }
        heat
    }
}

/// Compares means exactly as `total_a * count_b` vs `total_b * count_a`;
/// earlier weekdays win ties.
fn peak_weekday(totals: &[Money; 7], counts: &[i64; 7]) -> Option<Weekday> {
    let mut best: Option<usize> = None;
    for i in 0..7 {
        if counts[i] == 0 {
            continue;
        }
        let better = match best {
            None => true,
            Some(b) => {
                let lhs = i128::from(totals[i].cents()) * i128::from(counts[b]);
                let rhs = i128::from(totals[b].cents()) * i128::from(counts[i]);
                lhs > rhs
            }
        };
        if better {
            best = Some(i);
        }
    }
    best.map(|i| WEEKDAYS[i])
}

/// Smallest day wins ties
fn peak_day_of_month(totals: &[Money]) -> Option<u32> {
    let mut best: Option<(usize, Money)> = None;
    for (i, total) in totals.iter().enumerate() {
        if total.is_zero() {
            continue;
        }
        if best.map_or(true, |(_, b)| *total > b) {
            best = Some((i, *total));
        }
    }
    best.map(|(i, _)| i as u32 + 1)
}
