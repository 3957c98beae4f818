//! Common display utilities and helpers

use chrono::{DateTime, Local, Utc};
use serde::Serialize;
use tabled::Tabled;

use crate::models::NOT_AVAILABLE;

/// One labelled value of a detail view
#[derive(Debug, Clone, Tabled, Serialize)]
pub struct FieldRow {
    #[tabled(rename = "FIELD")]
    pub field: String,

    #[tabled(rename = "VALUE")]
    pub value: String,
}

impl FieldRow {
    pub fn new(field: &str, value: impl ToString) -> Self {
        Self {
            field: field.to_string(),
            value: value.to_string(),
        }
    }
}

/// Truncate string to max length with ellipsis
pub fn truncate_string(s: &str, max_len: usize) -> String {
    if s.chars().count() <= max_len {
        s.to_string()
    } else {
        let kept: String = s.chars().take(max_len.saturating_sub(3)).collect();
        format!("{}...", kept)
    }
}

/// Group digits in thousands: 1234567 -> "1,234,567"
pub fn format_number(n: i64) -> String {
    let digits = n.unsigned_abs().to_string();
    let mut grouped = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, c) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(c);
    }
    if n < 0 { format!("-{}", grouped) } else { grouped }
}

/// "$1,234" style amount
pub fn format_money(amount: i64) -> String {
    if amount < 0 {
        format!("-${}", format_number(-amount))
    } else {
        format!("${}", format_number(amount))
    }
}

/// Local "YYYY-MM-DD HH:MM", or "N/A"
pub fn format_time(at: Option<DateTime<Utc>>) -> String {
    at.map(|t| t.with_timezone(&Local).format("%Y-%m-%d %H:%M").to_string())
        .unwrap_or_else(|| NOT_AVAILABLE.to_string())
}
