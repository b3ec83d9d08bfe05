//! CSV export
//!
//! Writes the raw ledger, the category-trend matrix and the financial flow
//! series as delimited text. Fields are quoted by the `csv` writer whenever
//! they contain the delimiter, quotes or line breaks.

use std::io::Write;

use crate::config::CsvDelimiter;
use crate::error::VaultResult;
use crate::models::Transaction;
use crate::reports::{CategoryTrendsReport, FinancialFlowReport};

/// Ledger export header
pub const TRANSACTION_HEADER: [&str; 6] = ["id", "description", "amount", "date", "type", "categoryId"];

/// Flow export header
pub const FLOW_HEADER: [&str; 6] = [
    "date",
    "salary",
    "monthlyYield",
    "accumulatedYield",
    "accumulatedBalance",
    "totalWealth",
];

fn writer<W: Write>(out: W, delimiter: CsvDelimiter) -> csv::Writer<W> {
    csv::WriterBuilder::new()
        .delimiter(delimiter.as_byte())
        .from_writer(out)
}

/// Export transactions in the order given, returning the row count
pub fn export_transactions_csv<W: Write>(
    transactions: &[Transaction],
    out: W,
    delimiter: CsvDelimiter,
) -> VaultResult<usize> {
    let mut wtr = writer(out, delimiter);
    wtr.write_record(TRANSACTION_HEADER)?;

    for txn in transactions {
        wtr.write_record([
            txn.id.to_full_string(),
            txn.description.clone(),
            txn.amount.to_decimal_string(),
            txn.date.format("%Y-%m-%d").to_string(),
            txn.kind.to_string(),
            txn.category_id.to_full_string(),
        ])?;
    }

    wtr.flush()?;
    Ok(transactions.len())
}

/// Export one row per month with a column per category, largest category first
pub fn export_trends_csv<W: Write>(
    report: &CategoryTrendsReport,
    out: W,
    delimiter: CsvDelimiter,
) -> VaultResult<usize> {
    let mut wtr = writer(out, delimiter);

    let mut header = vec!["date".to_string()];
    header.extend(report.categories.iter().map(|c| c.name.clone()));
    wtr.write_record(&header)?;

    for month in &report.months {
        let mut record = vec![month.month.to_string()];
        record.extend(
            report
                .categories
                .iter()
                .map(|c| month.amount(&c.category_id).to_decimal_string()),
        );
        wtr.write_record(&record)?;
    }

    wtr.flush()?;
    Ok(report.months.len())
}

/// Export the financial flow series
pub fn export_flow_csv<W: Write>(
    report: &FinancialFlowReport,
    out: W,
    delimiter: CsvDelimiter,
) -> VaultResult<usize> {
    let mut wtr = writer(out, delimiter);
    wtr.write_record(FLOW_HEADER)?;

    for row in &report.months {
        wtr.write_record([
            row.month.to_string(),
            row.salary.to_decimal_string(),
            row.monthly_yield.to_decimal_string(),
            row.accumulated_yield.to_decimal_string(),
            row.accumulated_balance.to_decimal_string(),
            row.total_wealth.to_decimal_string(),
        ])?;
    }

    wtr.flush()?;
    Ok(report.months.len())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{Category, CategoryKind, Money, TransactionType};
    use chrono::NaiveDate;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn render<F>(f: F) -> String
    where
        F: FnOnce(&mut Vec<u8>) -> VaultResult<usize>,
    {
        let mut buf = Vec::new();
        f(&mut buf).unwrap();
        String::from_utf8(buf).unwrap()
    }

    #[test]
    fn test_transactions_quote_delimiters() {
        let food = Category::new("Food");
        let txn = Transaction::new(
            "Lunch, with \"friends\"",
            Money::from_cents(1250),
            date(2025, 1, 15),
            TransactionType::Expense,
            food.id,
        );

        let output = render(|buf| export_transactions_csv(&[txn.clone()], buf, CsvDelimiter::Comma));
        let mut lines = output.lines();
        assert_eq!(lines.next(), Some("id,description,amount,date,type,categoryId"));

        let row = lines.next().unwrap();
        assert!(row.contains("\"Lunch, with \"\"friends\"\"\""));
        assert!(row.contains(",12.50,2025-01-15,EXPENSE,"));
        assert!(row.starts_with(&txn.id.to_full_string()));
    }

    #[test]
    fn test_semicolon_delimiter() {
        let food = Category::new("Food");
        let txn = Transaction::expense(Money::from_units(3), date(2025, 1, 1), food.id);

        let output = render(|buf| export_transactions_csv(&[txn], buf, CsvDelimiter::Semicolon));
        assert!(output.starts_with("id;description;amount;date;type;categoryId"));
        assert!(output.contains(";3.00;2025-01-01;EXPENSE;"));
    }

    #[test]
    fn test_trends_matrix() {
        let food = Category::new("Food");
        let rent = Category::new("Housing");
        let txns = vec![
            Transaction::expense(Money::from_units(20), date(2025, 1, 3), food.id),
            Transaction::expense(Money::from_units(500), date(2025, 2, 1), rent.id),
        ];
        let report = CategoryTrendsReport::generate(&txns, &[food, rent], date(2025, 2, 28));

        let output = render(|buf| export_trends_csv(&report, buf, CsvDelimiter::Comma));
        let lines: Vec<_> = output.lines().collect();
        assert_eq!(lines, vec!["date,Housing,Food", "2025-01,0.00,20.00", "2025-02,500.00,0.00"]);
    }

    #[test]
    fn test_trends_keeps_deleted_categories_apart() {
        let gone_a = Category::new("Gym");
        let gone_b = Category::new("Pets");
        let txns = vec![
            Transaction::expense(Money::from_units(30), date(2025, 1, 3), gone_a.id),
            Transaction::expense(Money::from_units(10), date(2025, 1, 4), gone_b.id),
        ];
        let report = CategoryTrendsReport::generate(&txns, &[], date(2025, 1, 31));

        let output = render(|buf| export_trends_csv(&report, buf, CsvDelimiter::Comma));
        let header = output.lines().next().unwrap();
        assert_eq!(
            header,
            format!("date,(unknown) {},(unknown) {}", gone_a.id, gone_b.id)
        );
    }

    #[test]
    fn test_flow_series() {
        let salary = Category::with_kind("Salary", CategoryKind::Salary);
        let food = Category::new("Food");
        let txns = vec![
            Transaction::income(Money::from_units(1000), date(2025, 1, 5), salary.id),
            Transaction::expense(Money::from_units(300), date(2025, 1, 20), food.id),
        ];
        let report = FinancialFlowReport::generate(&txns, &[salary, food], date(2025, 1, 31));

        let output = render(|buf| export_flow_csv(&report, buf, CsvDelimiter::Comma));
        let lines: Vec<_> = output.lines().collect();
        assert_eq!(
            lines,
            vec![
                "date,salary,monthlyYield,accumulatedYield,accumulatedBalance,totalWealth",
                "2025-01,1000.00,0.00,0.00,700.00,1000.00",
            ]
        );
    }

    #[test]
    fn test_empty_exports_write_header_only() {
        let output = render(|buf| export_flow_csv(&FinancialFlowReport::default(), buf, CsvDelimiter::Comma));
        assert_eq!(output.lines().count(), 1);
    }
}
