//! Shared formatting helpers for command output

use chrono::{DateTime, Local, Utc};

/// Truncate string to max characters with ellipsis
pub fn truncate(s: &str, max_chars: usize) -> String {
    let chars: Vec<char> = s.chars().collect();
    if chars.len() <= max_chars {
        s.to_string()
    } else {
        let truncated: String = chars[..max_chars.saturating_sub(3)].iter().collect();
        format!("{}...", truncated)
    }
}

/// Optional text, "-" when missing or blank
pub fn or_dash(value: Option<&str>) -> String {
    match value {
        Some(v) if !v.trim().is_empty() => v.to_string(),
        _ => "-".to_string(),
    }
}

/// Calendar date in local time
pub fn format_date(dt: &DateTime<Utc>) -> String {
    dt.with_timezone(&Local).format("%Y-%m-%d").to_string()
}

pub fn format_opt_date(dt: Option<&DateTime<Utc>>) -> String {
    dt.map(format_date).unwrap_or_else(|| "-".to_string())
}

/// Credit amounts drop a trailing ".0"
pub fn format_credit(credit: f64) -> String {
    if credit.fract() == 0.0 {
        format!("{}", credit as i64)
    } else {
        format!("{:.2}", credit)
    }
}
