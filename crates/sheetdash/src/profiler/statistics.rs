//! Column aggregations shared by the KPI selector, the chart planner and
//! the config exporter.
//!
//! Grouping always compares the stringified cell value exactly; blank cells
//! never form a group. Non-numeric values contribute zero to every sum.

use std::collections::{HashMap, HashSet};

use crate::types::{Cell, Dataset};
use crate::utils::parse_date;

/// Sum of a column. Unknown columns sum to zero.
pub fn sum_column(dataset: &Dataset, column: &str) -> f64 {
    dataset.column_values(column).map(Cell::numeric_or_zero).sum()
}

/// Number of distinct non-blank values in a column.
pub fn unique_count(dataset: &Dataset, column: &str) -> usize {
    dataset
        .column_values(column)
        .filter(|cell| !cell.is_blank())
        .map(Cell::stringify)
        .collect::<HashSet<_>>()
        .len()
}

/// Distinct non-blank labels of a column, in first-seen order.
pub fn distinct_labels(dataset: &Dataset, column: &str) -> Vec<String> {
    let mut seen = HashSet::new();
    dataset
        .column_values(column)
        .filter(|cell| !cell.is_blank())
        .map(Cell::stringify)
        .filter(|label| seen.insert(label.clone()))
        .collect()
}

/// Distinct labels in chronological order when every label parses as a
/// date, otherwise in first-seen order.
pub fn chronological_labels(dataset: &Dataset, column: &str) -> Vec<String> {
    let labels = distinct_labels(dataset, column);
    let parsed: Option<Vec<_>> = labels.iter().map(|label| parse_date(label)).collect();

    match parsed {
        Some(dates) => {
            let mut pairs: Vec<_> = dates.into_iter().zip(labels).collect();
            pairs.sort_by_key(|(date, _)| *date);
            pairs.into_iter().map(|(_, label)| label).collect()
        }
        None => labels,
    }
}

/// Sum of `measure` per label of `group`, aligned with `labels`.
pub fn sum_by_group(dataset: &Dataset, group: &str, measure: &str, labels: &[String]) -> Vec<f64> {
    let (Some(group_idx), measure_idx) = (dataset.column_index(group), dataset.column_index(measure))
    else {
        return vec![0.0; labels.len()];
    };

    let mut totals: HashMap<String, f64> = HashMap::new();
    for record in dataset.records() {
        let value = measure_idx.map_or(0.0, |i| record.get(i).numeric_or_zero());
        *totals.entry(record.get(group_idx).stringify()).or_default() += value;
    }

    labels
        .iter()
        .map(|label| totals.get(label).copied().unwrap_or(0.0))
        .collect()
}

/// Number of records per label of `group`, aligned with `labels`.
pub fn count_by_group(dataset: &Dataset, group: &str, labels: &[String]) -> Vec<f64> {
    let mut counts: HashMap<String, usize> = HashMap::new();
    for cell in dataset.column_values(group) {
        *counts.entry(cell.stringify()).or_default() += 1;
    }

    labels
        .iter()
        .map(|label| counts.get(label).copied().unwrap_or(0) as f64)
        .collect()
}

/// Up to `limit` distinct non-blank values of a column, in first-seen order.
pub fn sample_distinct(dataset: &Dataset, column: &str, limit: usize) -> Vec<String> {
    let mut labels = distinct_labels(dataset, column);
    labels.truncate(limit);
    labels
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::Record;
    use pretty_assertions::assert_eq;

    fn regional_sales() -> Dataset {
        Dataset::new(
            vec!["Region".to_string(), "Sales".to_string()],
            vec![
                Record::new(vec![Cell::text("East"), Cell::Number(1200.0)]),
                Record::new(vec![Cell::text("West"), Cell::Number(800.0)]),
                Record::new(vec![Cell::text("East"), Cell::Number(300.0)]),
                Record::new(vec![Cell::Empty, Cell::text("n/a")]),
            ],
        )
    }

    #[test]
    fn test_sum_column_ignores_non_numeric() {
        let dataset = regional_sales();
        assert_eq!(sum_column(&dataset, "Sales"), 2300.0);
        assert_eq!(sum_column(&dataset, "Region"), 0.0);
        assert_eq!(sum_column(&dataset, "Missing"), 0.0);
    }

    #[test]
    fn test_all_empty_column_aggregates_to_zero() {
        let dataset = Dataset::new(
            vec!["Blank".to_string()],
            vec![Record::new(vec![Cell::Empty]), Record::new(vec![Cell::text("")])],
        );
        assert_eq!(sum_column(&dataset, "Blank"), 0.0);
        assert_eq!(unique_count(&dataset, "Blank"), 0);
    }

    #[test]
    fn test_unique_count_and_labels() {
        let dataset = regional_sales();
        assert_eq!(unique_count(&dataset, "Region"), 2);
        assert_eq!(distinct_labels(&dataset, "Region"), vec!["East", "West"]);
        assert_eq!(sample_distinct(&dataset, "Region", 1), vec!["East"]);
    }

    #[test]
    fn test_zero_is_a_label() {
        let dataset = Dataset::new(
            vec!["Flag".to_string()],
            vec![Record::new(vec![Cell::Number(0.0)]), Record::new(vec![Cell::Bool(false)])],
        );
        assert_eq!(distinct_labels(&dataset, "Flag"), vec!["0", "false"]);
    }

    #[test]
    fn test_sum_and_count_by_group() {
        let dataset = regional_sales();
        let labels = distinct_labels(&dataset, "Region");
        assert_eq!(sum_by_group(&dataset, "Region", "Sales", &labels), vec![1500.0, 800.0]);
        assert_eq!(count_by_group(&dataset, "Region", &labels), vec![2.0, 1.0]);
        assert_eq!(sum_by_group(&dataset, "Nope", "Sales", &labels), vec![0.0, 0.0]);
    }

    #[test]
    fn test_chronological_labels() {
        let dataset = Dataset::new(
            vec!["Month".to_string()],
            vec![
                Record::new(vec![Cell::text("2023-02")]),
                Record::new(vec![Cell::text("2023-01")]),
                Record::new(vec![Cell::text("2023-02")]),
            ],
        );
        assert_eq!(chronological_labels(&dataset, "Month"), vec!["2023-01", "2023-02"]);

        let mixed = Dataset::new(
            vec!["Period".to_string()],
            vec![
                Record::new(vec![Cell::text("Q2")]),
                Record::new(vec![Cell::text("2023-01")]),
            ],
        );
        assert_eq!(chronological_labels(&mixed, "Period"), vec!["Q2", "2023-01"]);
    }
}
