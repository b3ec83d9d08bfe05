//! Display formatting for terminal output
//!
//! Turns models and report structs into printable strings. List views are
//! rendered as `tabled` tables; detail views are plain aligned text.

pub mod backup;
pub mod category;
pub mod report;
pub mod transaction;

pub use backup::{format_age, format_backup_list, format_size};
pub use category::{format_category_details, format_category_list};
pub use report::{
    format_budget_progress, format_category_metrics, format_category_trends,
    format_expense_statistics, format_flow_report,
};
pub use transaction::{format_transaction_details, format_transaction_list};

use tabled::settings::Style;
use tabled::{Table, Tabled};

/// Render rows as a table in the shared style
pub(crate) fn render_table<T: Tabled>(rows: Vec<T>) -> String {
    let mut table = Table::new(rows);
    table.with(Style::psql());
    table.to_string()
}

/// Shorten to `max_len` characters, marking the cut with "..."
pub fn truncate(s: &str, max_len: usize) -> String {
    if s.chars().count() <= max_len {
        s.to_string()
    } else if max_len <= 3 {
        ".".repeat(max_len)
    } else {
        let kept: String = s.chars().take(max_len - 3).collect();
        format!("{}...", kept)
    }
}
