//! Table output formatting

use colored::Colorize;
use tabled::{
    Table, Tabled,
    settings::{Alignment, Modify, Style, object::Rows},
};

/// Format rows as a rounded table with centered headers
pub fn format_table<T: Tabled>(data: &[T]) -> String {
    if data.is_empty() {
        return "No results found.".to_string();
    }

    Table::new(data)
        .with(Style::rounded())
        .with(Modify::new(Rows::first()).with(Alignment::center()))
        .to_string()
}

/// A bold title line over a table; empty when there are no rows
pub fn format_section<T: Tabled>(title: &str, data: &[T]) -> String {
    if data.is_empty() {
        return String::new();
    }
    format!("\n{}\n{}", title.bold(), format_table(data))
}
