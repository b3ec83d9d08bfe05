//! Report formatting for terminal output

use chrono::Weekday;
use tabled::Tabled;

use crate::models::Money;
use crate::reports::expense_patterns::WEEKDAYS;
use crate::reports::{
    BudgetProgressReport, CategoryMetric, CategoryTrendsReport, ExpenseStatistics,
    FinancialFlowReport,
};

use super::{render_table, truncate};

/// Format a percentage with appropriate precision
pub fn format_percentage(pct: f64) -> String {
    if pct > 0.0 && pct < 0.1 {
        format!("{:.2}%", pct)
    } else if pct < 10.0 {
        format!("{:.1}%", pct)
    } else {
        format!("{:.0}%", pct)
    }
}

/// Horizontal bar scaled against `max_value`
pub fn format_bar(value: f64, max_value: f64, width: usize) -> String {
    if max_value <= 0.0 || value <= 0.0 {
        return " ".repeat(width);
    }

    let filled = ((value / max_value) * width as f64).round() as usize;
    let filled = filled.min(width);

    format!("{}{}", "█".repeat(filled), "░".repeat(width - filled))
}

fn weekday_name(day: Weekday) -> &'static str {
    match day {
        Weekday::Mon => "Monday",
        Weekday::Tue => "Tuesday",
        Weekday::Wed => "Wednesday",
        Weekday::Thu => "Thursday",
        Weekday::Fri => "Friday",
        Weekday::Sat => "Saturday",
        Weekday::Sun => "Sunday",
    }
}

#[derive(Tabled)]
struct FlowRow {
    #[tabled(rename = "Month")]
    month: String,
    #[tabled(rename = "Salary")]
    salary: String,
    #[tabled(rename = "Yield")]
    monthly_yield: String,
    #[tabled(rename = "Expenses")]
    expense: String,
    #[tabled(rename = "Acc. Yield")]
    accumulated_yield: String,
    #[tabled(rename = "Acc. Balance")]
    accumulated_balance: String,
    #[tabled(rename = "Total Wealth")]
    total_wealth: String,
}

pub fn format_flow_report(report: &FinancialFlowReport, currency: &str) -> String {
    if report.is_empty() {
        return "No transactions recorded yet.\n".to_string();
    }

    let fmt = |m: Money| m.format_with_symbol(currency);
    let rows = report
        .months
        .iter()
        .map(|m| FlowRow {
            month: m.month.to_string(),
            salary: fmt(m.salary),
            monthly_yield: fmt(m.monthly_yield),
            expense: fmt(m.total_expense),
            accumulated_yield: fmt(m.accumulated_yield),
            accumulated_balance: fmt(m.accumulated_balance),
            total_wealth: fmt(m.total_wealth),
        })
        .collect();

    let mut output = String::from("Financial Flow\n\n");
    output.push_str(&render_table(rows));
    output.push('\n');

    if let Some(best) = report.best_month() {
        output.push_str(&format!("\nBest month: {} (net {})\n", best.month, fmt(best.net())));
    }

    output
}

#[derive(Tabled)]
struct TrendRow {
    #[tabled(rename = "Category")]
    name: String,
    #[tabled(rename = "Total")]
    total: String,
    #[tabled(rename = "Share")]
    share: String,
    #[tabled(rename = "Txns")]
    count: usize,
    #[tabled(rename = "")]
    bar: String,
}

pub fn format_category_trends(report: &CategoryTrendsReport, currency: &str) -> String {
    if report.is_empty() {
        return "No expenses recorded yet.\n".to_string();
    }

    let max = report
        .categories
        .first()
        .map(|c| c.total.as_f64())
        .unwrap_or(0.0);

    let rows = report
        .categories
        .iter()
        .map(|c| TrendRow {
            name: truncate(&c.name, 24),
            total: c.total.format_with_symbol(currency),
            share: format_percentage(report.share(&c.category_id)),
            count: c.transaction_count,
            bar: format_bar(c.total.as_f64(), max, 20),
        })
        .collect();

    let mut output = String::from("Spending by Category\n\n");
    output.push_str(&render_table(rows));
    output.push_str(&format!(
        "\n\nTotal: {} over {} month(s)\n",
        report.grand_total().format_with_symbol(currency),
        report.months.len()
    ));
    output
}

pub fn format_expense_statistics(stats: &ExpenseStatistics, currency: &str) -> String {
    if stats.is_empty() {
        return "No expenses recorded yet.\n".to_string();
    }

    let fmt = |m: Money| m.format_with_symbol(currency);
    let mut output = String::from("Expense Patterns\n\n");

    if let (Some(first), Some(last)) = (stats.first_date, stats.last_date) {
        output.push_str(&format!(
            "  Period:          {} to {} ({} days)\n",
            first, last, stats.day_span
        ));
    }
    output.push_str(&format!(
        "  Total:           {} in {} transaction(s)\n",
        fmt(stats.total_expense),
        stats.transaction_count
    ));
    output.push_str(&format!("  Daily average:   {}\n", fmt(stats.average_daily)));
    output.push_str(&format!("  Weekly average:  {}\n", fmt(stats.average_weekly)));
    output.push_str(&format!("  Monthly average: {}\n", fmt(stats.average_monthly)));
    if let Some(day) = stats.peak_weekday {
        output.push_str(&format!("  Peak weekday:    {}\n", weekday_name(day)));
    }
    if let Some(day) = stats.peak_day_of_month {
        output.push_str(&format!("  Peak day:        {}\n", day));
    }

    output.push_str("\nBy weekday (mean per active day)\n");
    let heat = stats.weekday_heatmap();
    for (i, day) in WEEKDAYS.iter().enumerate() {
        output.push_str(&format!(
            "  {:<10} {} {:>12}\n",
            weekday_name(*day),
            format_bar(heat[i], 1.0, 20),
            fmt(stats.weekday_means[i])
        ));
    }

    output
}

#[derive(Tabled)]
struct MetricRow {
    #[tabled(rename = "Category")]
    name: String,
    #[tabled(rename = "Txns")]
    count: usize,
    #[tabled(rename = "Total")]
    total: String,
    #[tabled(rename = "Avg Ticket")]
    average_ticket: String,
    #[tabled(rename = "Per Month")]
    frequency: String,
    #[tabled(rename = "Pattern")]
    pattern: &'static str,
}

pub fn format_category_metrics(metrics: &[CategoryMetric], currency: &str) -> String {
    if metrics.is_empty() {
        return "No expenses recorded yet.\n".to_string();
    }

    let rows = metrics
        .iter()
        .map(|m| MetricRow {
            name: truncate(&m.name, 24),
            count: m.transaction_count,
            total: m.total.format_with_symbol(currency),
            average_ticket: m.average_ticket.format_with_symbol(currency),
            frequency: format!("{:.2}", m.monthly_frequency),
            pattern: m.label(),
        })
        .collect();

    let recurring = metrics.iter().filter(|m| m.is_recurring).count();
    format!(
        "Category Patterns\n\n{}\n\n{} recurring, {} occasional\n",
        render_table(rows),
        recurring,
        metrics.len() - recurring
    )
}

#[derive(Tabled)]
struct BudgetRow {
    #[tabled(rename = "Category")]
    name: String,
    #[tabled(rename = "Limit")]
    limit: String,
    #[tabled(rename = "Spent")]
    spent: String,
    #[tabled(rename = "Remaining")]
    remaining: String,
    #[tabled(rename = "Used")]
    used: String,
    #[tabled(rename = "")]
    flag: &'static str,
}

pub fn format_budget_progress(report: &BudgetProgressReport, currency: &str) -> String {
    let mut output = format!("Budget Progress - {}\n\n", report.month);

    if report.rows.is_empty() {
        output.push_str("No category has a budget limit.\n");
        output.push_str("Set one with 'finvault category edit <name> --budget <amount>'.\n");
        return output;
    }

    let fmt = |m: Money| m.format_with_symbol(currency);
    let rows = report
        .rows
        .iter()
        .map(|r| BudgetRow {
            name: truncate(&r.name, 24),
            limit: fmt(r.limit),
            spent: fmt(r.spent),
            remaining: fmt(r.remaining),
            used: format_percentage(r.percent_used),
            flag: if r.over_budget { "OVER" } else { "" },
        })
        .collect();

    output.push_str(&render_table(rows));
    output.push_str(&format!(
        "\n\nTotal: {} of {} ({} remaining)\n",
        fmt(report.total_spent),
        fmt(report.total_limit),
        fmt(report.total_remaining())
    ));
    if report.over_budget_count() > 0 {
        output.push_str(&format!("{} category(ies) over budget\n", report.over_budget_count()));
    }

    output
}
