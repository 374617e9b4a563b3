//! Chart plan construction.
//!
//! Plans are emitted section by section: time series, bars, donuts, the
//! stacked bar and finally the top-N tables. Every plan carries its computed
//! series so a renderer can draw it without touching the dataset.

use crate::config::AnalysisConfig;
use crate::profiler::statistics::{
    chronological_labels, count_by_group, distinct_labels, sum_by_group,
};
use crate::types::{
    Cell, ChartAggregation, ChartKind, ChartPlan, ChartSeries, ColumnClassification, Dataset,
};
use tracing::debug;

/// Series name for row-count plans.
pub const COUNT_SERIES: &str = "Count";

/// Planner for renderer-agnostic chart plans.
pub struct ChartPlanner {
    config: AnalysisConfig,
}

impl ChartPlanner {
    pub fn new(config: AnalysisConfig) -> Self {
        Self { config }
    }

    /// Build every chart plan that applies to a dataset.
    pub fn plan(&self, dataset: &Dataset, classification: &ColumnClassification) -> Vec<ChartPlan> {
        if dataset.is_empty() {
            return Vec::new();
        }

        let mut plans = Vec::new();
        plans.extend(self.time_series(dataset, classification));
        plans.extend(self.bars(dataset, classification));
        plans.extend(self.donuts(dataset, classification));
        plans.extend(self.stacked_bar(dataset, classification));
        plans.extend(self.top_tables(dataset, classification));

        debug!("Planned {} charts", plans.len());
        plans
    }

    fn time_series(&self, dataset: &Dataset, classification: &ColumnClassification) -> Vec<ChartPlan> {
        let Some(date_column) = classification.date_like.first() else {
            return Vec::new();
        };
        if classification.numeric.is_empty() {
            return Vec::new();
        }

        let labels = chronological_labels(dataset, date_column);
        classification
            .numeric
            .iter()
            .take(self.config.max_time_series)
            .map(|measure| {
                grouped_sum_plan(
                    ChartKind::Line,
                    format!("Time Series - {measure}"),
                    dataset,
                    date_column,
                    &[measure],
                    labels.clone(),
                )
            })
            .collect()
    }

    fn bars(&self, dataset: &Dataset, classification: &ColumnClassification) -> Vec<ChartPlan> {
        let measures = classification.numeric.iter().take(self.config.max_bar_charts);

        match classification.categorical.first() {
            Some(category) => {
                let labels = distinct_labels(dataset, category);
                measures
                    .map(|measure| {
                        grouped_sum_plan(
                            ChartKind::Bar,
                            format!("{measure} by {category}"),
                            dataset,
                            category,
                            &[measure],
                            labels.clone(),
                        )
                    })
                    .collect()
            }
            None => measures
                .map(|measure| self.row_bar(dataset, measure))
                .collect(),
        }
    }

    /// Per-row bar over the first rows, used when there is nothing to group by.
    fn row_bar(&self, dataset: &Dataset, measure: &str) -> ChartPlan {
        let limit = self.config.row_fallback_limit;
        let values: Vec<f64> = dataset
            .column_values(measure)
            .take(limit)
            .map(Cell::numeric_or_zero)
            .collect();
        let labels = (1..=values.len()).map(|i| format!("R{i}")).collect();

        ChartPlan {
            kind: ChartKind::Bar,
            title: format!("{measure} (first {limit} rows)"),
            dimension: None,
            measures: vec![measure.to_string()],
            aggregation: ChartAggregation::RowValue,
            labels,
            series: vec![ChartSeries {
                name: measure.to_string(),
                values,
            }],
        }
    }

    fn donuts(&self, dataset: &Dataset, classification: &ColumnClassification) -> Vec<ChartPlan> {
        let Some(category) = classification.categorical.first() else {
            return Vec::new();
        };
        let labels = distinct_labels(dataset, category);

        if classification.numeric.is_empty() {
            let values = count_by_group(dataset, category, &labels);
            return vec![ChartPlan {
                kind: ChartKind::Donut,
                title: format!("Distribution - {category}"),
                dimension: Some(category.clone()),
                measures: Vec::new(),
                aggregation: ChartAggregation::Count,
                labels,
                series: vec![ChartSeries {
                    name: COUNT_SERIES.to_string(),
                    values,
                }],
            }];
        }

        classification
            .numeric
            .iter()
            .take(self.config.max_donut_charts)
            .map(|measure| {
                grouped_sum_plan(
                    ChartKind::Donut,
                    format!("Donut: {measure} by {category}"),
                    dataset,
                    category,
                    &[measure],
                    labels.clone(),
                )
            })
            .collect()
    }

    fn stacked_bar(&self, dataset: &Dataset, classification: &ColumnClassification) -> Option<ChartPlan> {
        let category = classification.categorical.first()?;
        let [first, second, ..] = classification.numeric.as_slice() else {
            return None;
        };

        Some(grouped_sum_plan(
            ChartKind::StackedBar,
            format!("Stacked: {first} & {second} by {category}"),
            dataset,
            category,
            &[first, second],
            distinct_labels(dataset, category),
        ))
    }

    fn top_tables(&self, dataset: &Dataset, classification: &ColumnClassification) -> Vec<ChartPlan> {
        let Some(category) = classification.categorical.first() else {
            return Vec::new();
        };
        let labels = distinct_labels(dataset, category);

        classification
            .numeric
            .iter()
            .take(self.config.max_table_charts)
            .map(|measure| {
                let totals = sum_by_group(dataset, category, measure, &labels);
                let mut rows: Vec<(String, f64)> = labels.iter().cloned().zip(totals).collect();
                // sort_by is stable, so ties keep first-seen order
                rows.sort_by(|a, b| b.1.total_cmp(&a.1));
                rows.truncate(self.config.top_n);
                let (top_labels, values): (Vec<String>, Vec<f64>) = rows.into_iter().unzip();

                ChartPlan {
                    kind: ChartKind::Table,
                    title: format!("Top {measure} by {category}"),
                    dimension: Some(category.clone()),
                    measures: vec![measure.clone()],
                    aggregation: ChartAggregation::Sum,
                    labels: top_labels,
                    series: vec![ChartSeries {
                        name: measure.clone(),
                        values,
                    }],
                }
            })
            .collect()
    }
}

/// A plan whose series are per-label sums of `measures` grouped by `dimension`.
fn grouped_sum_plan(
    kind: ChartKind,
    title: String,
    dataset: &Dataset,
    dimension: &str,
    measures: &[&String],
    labels: Vec<String>,
) -> ChartPlan {
    let series = measures
        .iter()
        .map(|measure| ChartSeries {
            name: measure.to_string(),
            values: sum_by_group(dataset, dimension, measure, &labels),
        })
        .collect();

    ChartPlan {
        kind,
        title,
        dimension: Some(dimension.to_string()),
        measures: measures.iter().map(|m| m.to_string()).collect(),
        aggregation: ChartAggregation::Sum,
        labels,
        series,
    }
}
