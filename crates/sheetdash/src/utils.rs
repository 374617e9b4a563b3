//! Shared utilities for the dashboard planner.
//!
//! This module contains the parsing and formatting helpers every stage
//! agrees on: what counts as a number, what counts as a date, and how values
//! are displayed on KPI cards.

use chrono::{DateTime, NaiveDate, NaiveDateTime};

// =============================================================================
// Numeric Parsing Utilities
// =============================================================================

/// Thousands separator stripped before numeric coercion.
pub const THOUSANDS_SEPARATOR: char = ',';

/// Remove thousands separators and surrounding whitespace.
///
/// # Example
///
/// ```rust,ignore
/// use sheetdash::utils::clean_numeric_string;
///
/// assert_eq!(clean_numeric_string(" 1,234.5 "), "1234.5");
/// ```
pub fn clean_numeric_string(s: &str) -> String {
    s.replace(THOUSANDS_SEPARATOR, "").trim().to_string()
}

/// Parse a whole string as a finite number.
///
/// Only plain decimal / scientific notation is accepted; spelled-out
/// infinities and `NaN` are rejected.
pub fn parse_number(s: &str) -> Option<f64> {
    let trimmed = s.trim();
    if trimmed.is_empty() {
        return None;
    }
    let starts_ok = trimmed
        .chars()
        .next()
        .is_some_and(|c| c.is_ascii_digit() || matches!(c, '-' | '+' | '.'));
    if !starts_ok {
        return None;
    }
    trimmed.parse::<f64>().ok().filter(|v| v.is_finite())
}

/// Parse a string as a number after stripping thousands separators.
pub fn parse_numeric_string(s: &str) -> Option<f64> {
    parse_number(&clean_numeric_string(s))
}

/// Check if a string can be parsed as a number (no separator stripping).
pub fn is_numeric_string(s: &str) -> bool {
    parse_number(s).is_some()
}

// =============================================================================
// Date Parsing Utilities
// =============================================================================

const DATETIME_FORMATS: [&str; 8] = [
    "%Y-%m-%dT%H:%M:%S%.f",
    "%Y-%m-%dT%H:%M",
    "%Y-%m-%d %H:%M:%S%.f",
    "%Y-%m-%d %H:%M",
    "%m/%d/%Y %H:%M:%S",
    "%m/%d/%Y %H:%M",
    "%Y/%m/%d %H:%M:%S",
    "%Y/%m/%d %H:%M",
];

const DATE_FORMATS: [&str; 11] = [
    "%Y-%m-%d",
    "%Y/%m/%d",
    "%m/%d/%Y",
    "%m-%d-%Y",
    "%B %d, %Y",
    "%b %d, %Y",
    "%b %d %Y",
    "%d %B %Y",
    "%d %b %Y",
    "%a %b %d %Y",
    "%Y.%m.%d",
];

/// Parse a string as a calendar date or timestamp.
///
/// Accepts RFC 3339, RFC 2822, ISO dates and datetimes, US-style
/// `MM/DD/YYYY`, month-only values (`2023-01`, `Jan 2023`) and bare
/// four-digit years. Month-only values resolve to the first of the month,
/// years to January 1st.
pub fn parse_date(s: &str) -> Option<NaiveDateTime> {
    let trimmed = s.trim();
    if trimmed.is_empty() {
        return None;
    }

    if let Ok(dt) = DateTime::parse_from_rfc3339(trimmed) {
        return Some(dt.naive_utc());
    }
    if let Ok(dt) = DateTime::parse_from_rfc2822(trimmed) {
        return Some(dt.naive_utc());
    }

    for format in DATETIME_FORMATS {
        if let Ok(dt) = NaiveDateTime::parse_from_str(trimmed, format) {
            return Some(dt);
        }
    }

    for format in DATE_FORMATS {
        if let Ok(date) = NaiveDate::parse_from_str(trimmed, format) {
            return date.and_hms_opt(0, 0, 0);
        }
    }

    parse_month(trimmed).or_else(|| parse_year(trimmed))
}

/// Check if a string parses as a date.
pub fn is_date_string(s: &str) -> bool {
    parse_date(s).is_some()
}

fn parse_month(s: &str) -> Option<NaiveDateTime> {
    let candidates = [
        (format!("{s}-01"), "%Y-%m-%d"),
        (format!("{s}/01"), "%Y/%m/%d"),
        (format!("1 {s}"), "%d %b %Y"),
        (format!("1 {s}"), "%d %B %Y"),
    ];
    candidates
        .iter()
        .find_map(|(value, format)| NaiveDate::parse_from_str(value, format).ok())
        .and_then(|date| date.and_hms_opt(0, 0, 0))
}

fn parse_year(s: &str) -> Option<NaiveDateTime> {
    if s.len() != 4 || !s.chars().all(|c| c.is_ascii_digit()) {
        return None;
    }
    let year: i32 = s.parse().ok()?;
    NaiveDate::from_ymd_opt(year, 1, 1).and_then(|date| date.and_hms_opt(0, 0, 0))
}

// =============================================================================
// Display Formatting Utilities
// =============================================================================

/// Format a number the way it prints inside a label: integers without a
/// fractional part, everything else in shortest round-trip form.
pub fn format_plain_number(value: f64) -> String {
    if value == 0.0 {
        return "0".to_string();
    }
    format!("{value}")
}

/// Format a number with thousands separators and at most three fraction
/// digits, e.g. `1234567.891` → `1,234,567.891`.
pub fn format_thousands(value: f64) -> String {
    let fixed = format!("{:.3}", value.abs());
    let (int_part, frac_part) = fixed.split_once('.').unwrap_or((fixed.as_str(), ""));
    let frac = frac_part.trim_end_matches('0');

    let mut grouped = String::with_capacity(int_part.len() + int_part.len() / 3);
    for (i, c) in int_part.chars().enumerate() {
        if i > 0 && (int_part.len() - i) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(c);
    }

    let is_zero = grouped.chars().all(|c| c == '0' || c == ',') && frac.is_empty();
    let sign = if value < 0.0 && !is_zero { "-" } else { "" };
    if frac.is_empty() {
        format!("{sign}{grouped}")
    } else {
        format!("{sign}{grouped}.{frac}")
    }
}

/// Format a number with exactly `digits` fraction digits.
pub fn format_fixed(value: f64, digits: usize) -> String {
    format!("{value:.digits$}")
}

// =============================================================================
// Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_clean_numeric_string() {
        assert_eq!(clean_numeric_string("1,200"), "1200");
        assert_eq!(clean_numeric_string("  3,000,000.5 "), "3000000.5");
        assert_eq!(clean_numeric_string("East"), "East");
    }

    #[test]
    fn test_parse_number() {
        assert_eq!(parse_number("42"), Some(42.0));
        assert_eq!(parse_number(" -1.5 "), Some(-1.5));
        assert_eq!(parse_number("1e3"), Some(1000.0));
        assert_eq!(parse_number(".5"), Some(0.5));
        assert_eq!(parse_number(""), None);
        assert_eq!(parse_number("1,200"), None);
        assert_eq!(parse_number("NaN"), None);
        assert_eq!(parse_number("inf"), None);
        assert_eq!(parse_number("12abc"), None);
    }

    #[test]
    fn test_parse_numeric_string_strips_separators() {
        assert_eq!(parse_numeric_string("1,200"), Some(1200.0));
        assert_eq!(parse_numeric_string(" , "), None);
        assert_eq!(parse_numeric_string("$5"), None);
    }

    #[test]
    fn test_parse_date_iso_variants() {
        assert!(is_date_string("2024-01-15"));
        assert!(is_date_string("2024-01-15T10:30:00"));
        assert!(is_date_string("2024-01-15 10:30"));
        assert!(is_date_string("2024-01-15T10:30:00Z"));
        assert!(is_date_string("2024/01/15"));
    }

    #[test]
    fn test_parse_date_regional_variants() {
        assert!(is_date_string("01/15/2024"));
        assert!(is_date_string("1/5/2024"));
        assert!(is_date_string("Jan 15, 2024"));
        assert!(is_date_string("15 January 2024"));
        assert!(is_date_string("Tue, 1 Jul 2003 10:52:37 +0200"));
    }

    #[test]
    fn test_parse_date_month_and_year() {
        let jan = parse_date("2023-01").unwrap();
        let feb = parse_date("2023-02").unwrap();
        assert!(jan < feb);
        assert!(is_date_string("Mar 2023"));
        assert!(is_date_string("March 2023"));
        assert!(is_date_string("2023"));
    }

    #[test]
    fn test_parse_date_rejects_labels() {
        assert!(!is_date_string("East"));
        assert!(!is_date_string("Widget A"));
        assert!(!is_date_string(""));
        assert!(!is_date_string("12345"));
        assert!(!is_date_string("2023-13"));
    }

    #[test]
    fn test_format_plain_number() {
        assert_eq!(format_plain_number(1500.0), "1500");
        assert_eq!(format_plain_number(1.5), "1.5");
        assert_eq!(format_plain_number(-0.0), "0");
    }

    #[test]
    fn test_format_thousands() {
        assert_eq!(format_thousands(1500.0), "1,500");
        assert_eq!(format_thousands(1234567.891), "1,234,567.891");
        assert_eq!(format_thousands(999.0), "999");
        assert_eq!(format_thousands(-2500.5), "-2,500.5");
        assert_eq!(format_thousands(0.0), "0");
        assert_eq!(format_thousands(1.23456), "1.235");
    }

    #[test]
    fn test_format_fixed() {
        assert_eq!(format_fixed(12.5, 2), "12.50");
        assert_eq!(format_fixed(3.0, 2), "3.00");
    }
}
