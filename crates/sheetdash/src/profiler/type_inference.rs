//! Type inference logic for column classification.

use once_cell::sync::Lazy;
use regex::Regex;

use crate::types::Cell;
use crate::utils::{is_date_string, is_numeric_string};

// Header names that mark a column as calendar time regardless of content
static DATE_HEADER_PATTERN: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?i)date|month|day|year|period|timestamp").expect("Invalid regex: date header")
});

/// Whether a column name suggests calendar time.
pub(crate) fn header_suggests_date(name: &str) -> bool {
    DATE_HEADER_PATTERN.is_match(name)
}

/// Whether at least one non-blank text value parses as a date.
pub(crate) fn any_value_parses_as_date<'a, I>(values: I) -> bool
where
    I: IntoIterator<Item = &'a Cell>,
{
    values.into_iter().any(|cell| match cell {
        Cell::Text(s) if !s.trim().is_empty() => is_date_string(s),
        _ => false,
    })
}

/// Whether every value is empty, a number, or numeric text.
///
/// A column with no values at all passes.
pub(crate) fn all_values_numeric<'a, I>(values: I) -> bool
where
    I: IntoIterator<Item = &'a Cell>,
{
    values.into_iter().all(|cell| match cell {
        Cell::Empty | Cell::Number(_) => true,
        Cell::Text(s) => s.trim().is_empty() || is_numeric_string(s),
        Cell::Bool(_) => false,
    })
}
