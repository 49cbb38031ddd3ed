//! Number and text formatting shared by all renderers
//!
//! Formatting is fixed-width and locale-independent so rendered output is
//! byte-for-byte reproducible.

use chrono::{DateTime, Utc};

/// Format currency with dollar sign and two decimals
///
/// # Examples
/// ```
/// use costwatch_report::format::format_currency;
///
/// assert_eq!(format_currency(1247.849), "$1247.85");
/// assert_eq!(format_currency(0.0), "$0.00");
/// ```
pub fn format_currency(amount: f64) -> String {
    format!("${:.2}", without_negative_zero(amount))
}

/// Format a percentage with one decimal and an explicit `+` when ≥ 0
///
/// # Examples
/// ```
/// use costwatch_report::format::format_percent;
///
/// assert_eq!(format_percent(4.26), "+4.3%");
/// assert_eq!(format_percent(0.0), "+0.0%");
/// assert_eq!(format_percent(-12.5), "-12.5%");
/// ```
pub fn format_percent(value: f64) -> String {
    let value = without_negative_zero(value);
    if value >= 0.0 {
        format!("+{value:.1}%")
    } else {
        format!("{value:.1}%")
    }
}

/// Format a generation timestamp
pub fn format_timestamp(ts: &DateTime<Utc>) -> String {
    ts.format("%B %-d, %Y %H:%M UTC").to_string()
}

fn without_negative_zero(value: f64) -> f64 {
    if value == 0.0 { 0.0 } else { value }
}

/// Escape text for inclusion in HTML element content or attribute values
pub fn html_escape(s: &str) -> String {
    let mut escaped = String::with_capacity(s.len());
    for ch in s.chars() {
        match ch {
            '&' => escaped.push_str("&amp;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            '"' => escaped.push_str("&quot;"),
            '\'' => escaped.push_str("&#39;"),
            _ => escaped.push(ch),
        }
    }
    escaped
}
