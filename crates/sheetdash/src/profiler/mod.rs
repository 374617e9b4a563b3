//! Column profiling for dashboard planning.
//!
//! This module provides:
//! - Column classification into numeric, categorical and date-like buckets
//! - Name-based role inference (identifier pattern, domain keywords, key lookup)
//! - The aggregations every downstream stage shares

mod role_inference;
pub mod statistics;
mod type_inference;

pub use role_inference::{
    detect_domains, find_key, is_identifier_name, DomainSignals, ADMISSION_TERMS, BIRTH_TERMS,
    CUSTOMER_TERMS, EMERGENCY_TERMS, FINANCE_KEYWORDS, HEALTHCARE_KEYWORDS, LENGTH_OF_STAY_TERMS,
    MEASURE_CUSTOMER_TERMS, MEASURE_PROFIT_TERMS, MEASURE_QUANTITY_TERMS, MEASURE_REVENUE_TERMS,
    PROFIT_TERMS, REVENUE_TERMS, SALES_TERMS,
};

use crate::types::{ColumnClassification, ColumnKind, Dataset};
use tracing::debug;
use type_inference::{all_values_numeric, any_value_parses_as_date, header_suggests_date};

/// Classifier that buckets every column of a dataset.
pub struct ColumnClassifier;

impl ColumnClassifier {
    /// Classify every column of a dataset.
    ///
    /// Each column lands in exactly one bucket, checked in this order:
    /// date-like (name or any parseable date value), numeric (every value
    /// empty or numeric), categorical. Bucket order follows column order.
    /// An empty dataset yields three empty buckets.
    pub fn classify(dataset: &Dataset) -> ColumnClassification {
        let mut classification = ColumnClassification::default();
        if dataset.is_empty() {
            return classification;
        }

        for column in dataset.columns() {
            match Self::classify_column(dataset, column) {
                ColumnKind::DateLike => classification.date_like.push(column.clone()),
                ColumnKind::Numeric => classification.numeric.push(column.clone()),
                ColumnKind::Categorical => classification.categorical.push(column.clone()),
            }
        }

        debug!(
            "Classified columns: {} numeric, {} categorical, {} date-like",
            classification.numeric.len(),
            classification.categorical.len(),
            classification.date_like.len()
        );
        classification
    }

    /// Bucket for a single column.
    pub fn classify_column(dataset: &Dataset, column: &str) -> ColumnKind {
        if header_suggests_date(column) || any_value_parses_as_date(dataset.column_values(column)) {
            ColumnKind::DateLike
        } else if all_values_numeric(dataset.column_values(column)) {
            ColumnKind::Numeric
        } else {
            ColumnKind::Categorical
        }
    }
}
