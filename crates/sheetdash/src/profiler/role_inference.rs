//! Semantic role inference from column names.
//!
//! Everything here looks only at header names: the identifier pattern, the
//! domain keyword tables and the candidate-term lists the KPI and measure
//! builders resolve through [`find_key`].

use once_cell::sync::Lazy;
use regex::Regex;
use serde::Serialize;

// Names like `CustomerID`, `order_id`, `ids`, `Product Code`, `Store`
static IDENTIFIER_PATTERN: Lazy<Regex> = Lazy::new(|| {
    Regex::new(
        r"(?i)(^|[^a-z])ids?$|id\b|_id\b|\bcode\b|\bstore\b|\bproduct\b|\bsku\b|\bref\b|\bclient\b|\bcustomer\b",
    )
    .expect("Invalid regex: identifier name")
});

// =============================================================================
// Keyword Tables
// =============================================================================

/// Header fragments that switch on the finance KPI cards.
pub const FINANCE_KEYWORDS: &[&str] = &["sales", "revenue", "profit", "income", "price", "amount"];

/// Header fragments that switch on the healthcare KPI cards.
pub const HEALTHCARE_KEYWORDS: &[&str] = &[
    "admission",
    "admit",
    "birth",
    "lengthofstay",
    "los",
    "visit",
    "emergency",
    "patient",
];

pub const SALES_TERMS: &[&str] = &["sales", "amount", "units", "quantity"];
pub const REVENUE_TERMS: &[&str] = &["revenue", "income"];
pub const PROFIT_TERMS: &[&str] = &["profit", "net profit"];
pub const CUSTOMER_TERMS: &[&str] = &["customer", "client"];

pub const ADMISSION_TERMS: &[&str] = &["admission", "admit", "admissions"];
pub const LENGTH_OF_STAY_TERMS: &[&str] = &["lengthofstay", "los", "length"];
pub const EMERGENCY_TERMS: &[&str] = &["emergency", "er", "er visits", "emergency visits"];
pub const BIRTH_TERMS: &[&str] = &["birth", "births", "deliveries"];

// Measure lookups cast a slightly wider net than the KPI cards
pub const MEASURE_REVENUE_TERMS: &[&str] = &["revenue", "income", "salesamount", "sales amount"];
pub const MEASURE_PROFIT_TERMS: &[&str] = &["profit", "net profit", "margin"];
pub const MEASURE_CUSTOMER_TERMS: &[&str] = &["customer", "client", "customerid", "clientid"];
pub const MEASURE_QUANTITY_TERMS: &[&str] = &["quantity", "qty", "units"];

// =============================================================================
// Lookups
// =============================================================================

/// Whether a column name looks like a key (id, code, sku, customer, ...).
pub fn is_identifier_name(name: &str) -> bool {
    !name.is_empty() && IDENTIFIER_PATTERN.is_match(name)
}

/// Resolve the first column matching a list of candidate terms.
///
/// Candidates are tried in order. For each one an exact case-insensitive
/// match is looked for first, then any column whose name contains it.
///
/// # Example
///
/// ```rust,ignore
/// let columns = vec!["CustomerName".to_string(), "cust_id".to_string()];
/// assert_eq!(find_key(&columns, &["customer"]), Some("CustomerName"));
/// assert_eq!(find_key(&columns, &["cust_id"]), Some("cust_id"));
/// ```
pub fn find_key<'a, S: AsRef<str>>(columns: &'a [String], candidates: &[S]) -> Option<&'a str> {
    let lowered: Vec<String> = columns.iter().map(|c| c.to_lowercase()).collect();

    for candidate in candidates {
        let term = candidate.as_ref().to_lowercase();
        let exact = lowered.iter().position(|c| *c == term);
        let found = exact.or_else(|| lowered.iter().position(|c| c.contains(&term)));
        if let Some(index) = found {
            return Some(columns[index].as_str());
        }
    }

    None
}

/// Which domain-specific card families apply to a set of column names.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
pub struct DomainSignals {
    pub finance: bool,
    pub healthcare: bool,
}

/// Detect finance / healthcare vocabulary in the column names.
pub fn detect_domains(columns: &[String]) -> DomainSignals {
    let lowered: Vec<String> = columns.iter().map(|c| c.to_lowercase()).collect();
    let mentions = |keywords: &[&str]| {
        keywords
            .iter()
            .any(|k| lowered.iter().any(|c| c.contains(k)))
    };

    DomainSignals {
        finance: mentions(FINANCE_KEYWORDS),
        healthcare: mentions(HEALTHCARE_KEYWORDS),
    }
}
