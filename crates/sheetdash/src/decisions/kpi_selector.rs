//! Rule-based KPI card selection.

use std::collections::HashSet;

use crate::config::AnalysisConfig;
use crate::profiler::statistics::{sum_column, unique_count};
use crate::profiler::{
    detect_domains, find_key, is_identifier_name, ADMISSION_TERMS, BIRTH_TERMS, CUSTOMER_TERMS,
    EMERGENCY_TERMS, LENGTH_OF_STAY_TERMS, PROFIT_TERMS, REVENUE_TERMS, SALES_TERMS,
};
use crate::types::{Cell, ColumnClassification, Dataset, KpiAggregation, KpiCard};
use crate::utils::{format_fixed, format_plain_number, format_thousands};
use tracing::debug;

/// Placeholder shown for an empty sample value.
pub const EMPTY_SAMPLE: &str = "—";

/// Value a column contributes under the default aggregation rule.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ColumnAggregate {
    pub aggregation: KpiAggregation,
    pub value: f64,
}

/// Aggregation rule shared by every card family.
///
/// Identifier-named or categorical columns are unique-counted, numeric
/// columns are summed, anything else reports the row count.
pub fn aggregate_column(
    dataset: &Dataset,
    classification: &ColumnClassification,
    column: &str,
) -> ColumnAggregate {
    if is_identifier_name(column) || classification.is_categorical(column) {
        ColumnAggregate {
            aggregation: KpiAggregation::UniqueCount,
            value: unique_count(dataset, column) as f64,
        }
    } else if classification.is_numeric(column) {
        ColumnAggregate {
            aggregation: KpiAggregation::Sum,
            value: sum_column(dataset, column),
        }
    } else {
        ColumnAggregate {
            aggregation: KpiAggregation::RowCount,
            value: dataset.len() as f64,
        }
    }
}

/// Selector for headline KPI cards.
///
/// Runs the finance and healthcare card families when their vocabulary is
/// present, backfills with identifier and numeric columns up to the
/// configured slot count and, if still nothing applies, shows raw values
/// from the first record.
pub struct KpiSelector {
    config: AnalysisConfig,
}

impl KpiSelector {
    pub fn new(config: AnalysisConfig) -> Self {
        Self { config }
    }

    /// Select the KPI cards for a dataset. An empty dataset has no cards.
    pub fn select(&self, dataset: &Dataset, classification: &ColumnClassification) -> Vec<KpiCard> {
        if dataset.is_empty() {
            return Vec::new();
        }

        let mut builder = CardBuilder::new(dataset, classification);
        let domains = detect_domains(dataset.columns());

        if domains.finance {
            self.finance_cards(&mut builder);
        }
        if domains.healthcare {
            self.healthcare_cards(&mut builder);
        }

        self.backfill(&mut builder);

        if builder.cards.is_empty() {
            self.sample_cards(&mut builder);
        }

        debug!(
            "Selected {} KPI cards (finance: {}, healthcare: {})",
            builder.cards.len(),
            domains.finance,
            domains.healthcare
        );
        builder.cards
    }

    fn finance_cards(&self, builder: &mut CardBuilder<'_>) {
        let columns = builder.dataset.columns();
        let currency = &self.config.currency_symbol;

        if let Some(column) = find_key(columns, SALES_TERMS) {
            let agg = builder.aggregate(column);
            builder.push(format!("Total {column}"), display_value(&agg), agg);
        }

        if let Some(column) = find_key(columns, REVENUE_TERMS) {
            let agg = builder.aggregate(column);
            let value = match agg.aggregation {
                KpiAggregation::Sum => format!("{currency}{}", format_thousands(agg.value)),
                _ => format_plain_number(agg.value),
            };
            builder.push(format!("Total {column}"), value, agg);
        }

        if let Some(column) = find_key(columns, PROFIT_TERMS) {
            let agg = builder.aggregate(column);
            if agg.aggregation == KpiAggregation::Sum {
                let average = agg.value / builder.dataset.len() as f64;
                builder.push(
                    format!("Avg {column}"),
                    format!("{currency}{}", format_fixed(average, 2)),
                    ColumnAggregate {
                        aggregation: KpiAggregation::Average,
                        value: average,
                    },
                );
            } else {
                builder.push(format!("Avg {column}"), format_plain_number(agg.value), agg);
            }
        }

        if let Some(column) = find_key(columns, CUSTOMER_TERMS) {
            let agg = builder.aggregate(column);
            builder.push(format!("Unique {column}"), format_plain_number(agg.value), agg);
        }
    }

    fn healthcare_cards(&self, builder: &mut CardBuilder<'_>) {
        let columns = builder.dataset.columns();

        if let Some(column) = find_key(columns, ADMISSION_TERMS) {
            let agg = builder.aggregate(column);
            builder.push(column.to_string(), format_plain_number(agg.value), agg);
        }

        if let Some(column) = find_key(columns, LENGTH_OF_STAY_TERMS) {
            let agg = builder.aggregate(column);
            if agg.aggregation == KpiAggregation::Sum {
                let average = agg.value / builder.dataset.len() as f64;
                builder.push(
                    format!("Avg {column}"),
                    format_fixed(average, 2),
                    ColumnAggregate {
                        aggregation: KpiAggregation::Average,
                        value: average,
                    },
                );
            } else {
                builder.push(format!("Avg {column}"), format_plain_number(agg.value), agg);
            }
        }

        for terms in [EMERGENCY_TERMS, BIRTH_TERMS] {
            if let Some(column) = find_key(columns, terms) {
                let agg = builder.aggregate(column);
                builder.push(column.to_string(), format_plain_number(agg.value), agg);
            }
        }
    }

    /// Identifier-named columns first, then numeric columns, until the slot
    /// count is reached. A column with a domain card can get a second card.
    fn backfill(&self, builder: &mut CardBuilder<'_>) {
        let needed = self.config.kpi_slots.saturating_sub(builder.cards.len());
        if needed == 0 {
            return;
        }

        let dataset = builder.dataset;
        let classification = builder.classification;
        let mut seen = HashSet::new();
        let picks: Vec<&String> = dataset
            .columns()
            .iter()
            .filter(|column| is_identifier_name(column))
            .chain(classification.numeric.iter())
            .filter(|column| seen.insert(column.as_str()))
            .take(needed)
            .collect();

        for column in picks {
            let agg = builder.aggregate(column);
            builder.push(column.clone(), display_value(&agg), agg);
        }
    }

    fn sample_cards(&self, builder: &mut CardBuilder<'_>) {
        let dataset = builder.dataset;
        let Some(first) = dataset.first_record() else {
            return;
        };

        for (index, column) in dataset
            .columns()
            .iter()
            .enumerate()
            .take(self.config.fallback_kpi_count)
        {
            let cell = first.get(index);
            let value = if cell.is_blank() {
                EMPTY_SAMPLE.to_string()
            } else {
                cell.stringify()
            };
            let raw = match cell {
                Cell::Number(n) => Some(*n),
                _ => None,
            };
            builder.cards.push(KpiCard {
                label: column.clone(),
                value,
                raw,
                aggregation: KpiAggregation::Sample,
            });
        }
    }
}

/// Sums get thousands separators; counts print plainly.
fn display_value(agg: &ColumnAggregate) -> String {
    match agg.aggregation {
        KpiAggregation::Sum => format_thousands(agg.value),
        _ => format_plain_number(agg.value),
    }
}

struct CardBuilder<'a> {
    dataset: &'a Dataset,
    classification: &'a ColumnClassification,
    cards: Vec<KpiCard>,
}

impl<'a> CardBuilder<'a> {
    fn new(dataset: &'a Dataset, classification: &'a ColumnClassification) -> Self {
        Self {
            dataset,
            classification,
            cards: Vec::new(),
        }
    }

    fn aggregate(&self, column: &str) -> ColumnAggregate {
        aggregate_column(self.dataset, self.classification, column)
    }

    fn push(&mut self, label: String, value: String, agg: ColumnAggregate) {
        self.cards.push(KpiCard {
            label,
            value,
            raw: Some(agg.value),
            aggregation: agg.aggregation,
        });
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::profiler::ColumnClassifier;
    use crate::types::Record;
    use pretty_assertions::assert_eq;

    fn dataset(columns: &[&str], rows: Vec<Vec<Cell>>) -> Dataset {
        Dataset::new(
            columns.iter().map(|c| c.to_string()).collect(),
            rows.into_iter().map(Record::new).collect(),
        )
    }

    fn select(data: &Dataset) -> Vec<KpiCard> {
        let classification = ColumnClassifier::classify(data);
        KpiSelector::new(AnalysisConfig::default()).select(data, &classification)
    }

    fn summary(cards: &[KpiCard]) -> Vec<(String, String, &'static str)> {
        cards
            .iter()
            .map(|c| (c.label.clone(), c.value.clone(), c.subtitle()))
            .collect()
    }

    #[test]
    fn test_empty_dataset_has_no_cards() {
        let data = dataset(&["Sales"], vec![]);
        assert!(select(&data).is_empty());
    }

    #[test]
    fn test_finance_cards() {
        let data = dataset(
            &["Region", "Sales", "Revenue", "Profit", "Customer"],
            vec![
                vec![
                    Cell::text("East"),
                    Cell::Number(1200.0),
                    Cell::Number(2500.0),
                    Cell::Number(10.0),
                    Cell::text("c1"),
                ],
                vec![
                    Cell::text("West"),
                    Cell::Number(800.0),
                    Cell::Number(1000.0),
                    Cell::Number(5.0),
                    Cell::text("c2"),
                ],
            ],
        );

        let cards = select(&data);

        assert_eq!(
            summary(&cards),
            vec![
                ("Total Sales".to_string(), "2,000".to_string(), "sum"),
                ("Total Revenue".to_string(), "$3,500".to_string(), "sum"),
                ("Avg Profit".to_string(), "$7.50".to_string(), "avg"),
                ("Unique Customer".to_string(), "2".to_string(), "unique"),
            ]
        );
    }

    #[test]
    fn test_healthcare_cards_and_backfill() {
        let data = dataset(
            &["PatientID", "Admissions", "LOS"],
            vec![
                vec![Cell::text("p1"), Cell::Number(3.0), Cell::Number(2.0)],
                vec![Cell::text("p2"), Cell::Number(1.0), Cell::Number(5.0)],
            ],
        );

        let cards = select(&data);

        assert_eq!(
            summary(&cards),
            vec![
                ("Admissions".to_string(), "4".to_string(), "sum"),
                ("Avg LOS".to_string(), "3.50".to_string(), "avg"),
                ("PatientID".to_string(), "2".to_string(), "unique"),
                ("Admissions".to_string(), "4".to_string(), "sum"),
            ]
        );
    }

    #[test]
    fn test_backfill_repeats_carded_columns() {
        let data = dataset(
            &["Region", "Sales"],
            vec![
                vec![Cell::text("East"), Cell::Number(1200.0)],
                vec![Cell::text("West"), Cell::Number(800.0)],
            ],
        );

        let cards = select(&data);

        assert_eq!(
            summary(&cards),
            vec![
                ("Total Sales".to_string(), "2,000".to_string(), "sum"),
                ("Sales".to_string(), "2,000".to_string(), "sum"),
            ]
        );
    }

    #[test]
    fn test_identifier_backfill() {
        let data = dataset(
            &["CustomerID"],
            vec![
                vec![Cell::text("A-1")],
                vec![Cell::text("A-2")],
                vec![Cell::text("A-3")],
            ],
        );

        let cards = select(&data);

        assert_eq!(cards.len(), 1);
        assert_eq!(cards[0].label, "CustomerID");
        assert_eq!(cards[0].value, "3");
        assert_eq!(cards[0].subtitle(), "unique");
    }

    #[test]
    fn test_identifier_named_numeric_is_unique_counted() {
        let data = dataset(
            &["OrderID", "Units"],
            vec![
                vec![Cell::Number(1.0), Cell::Number(1500.0)],
                vec![Cell::Number(2.0), Cell::Number(250.0)],
            ],
        );

        let cards = select(&data);

        assert_eq!(
            summary(&cards),
            vec![
                ("OrderID".to_string(), "2".to_string(), "unique"),
                ("Units".to_string(), "1,750".to_string(), "sum"),
            ]
        );
    }

    #[test]
    fn test_backfill_respects_slot_count() {
        let data = dataset(
            &["A", "B", "C", "D", "E"],
            vec![vec![
                Cell::Number(1.0),
                Cell::Number(2.0),
                Cell::Number(3.0),
                Cell::Number(4.0),
                Cell::Number(5.0),
            ]],
        );
        let cards = select(&data);
        let labels: Vec<_> = cards.iter().map(|c| c.label.as_str()).collect();
        assert_eq!(labels, vec!["A", "B", "C", "D"]);
    }

    #[test]
    fn test_sample_fallback() {
        let data = dataset(
            &["Name", "Colour", "Note", "Extra"],
            vec![
                vec![
                    Cell::text("Widget"),
                    Cell::Empty,
                    Cell::text("fragile"),
                    Cell::text("x"),
                ],
                vec![
                    Cell::text("Gadget"),
                    Cell::text("red"),
                    Cell::text("sturdy"),
                    Cell::text("y"),
                ],
            ],
        );

        let cards = select(&data);

        assert_eq!(
            summary(&cards),
            vec![
                ("Name".to_string(), "Widget".to_string(), "sample"),
                ("Colour".to_string(), EMPTY_SAMPLE.to_string(), "sample"),
                ("Note".to_string(), "fragile".to_string(), "sample"),
            ]
        );
    }
}
