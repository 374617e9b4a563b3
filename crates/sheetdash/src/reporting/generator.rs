use chrono::{DateTime, SecondsFormat, Utc};
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::config::AnalysisConfig;
use crate::decisions::aggregate_column;
use crate::error::{DashboardError, Result};
use crate::profiler::statistics::{sample_distinct, sum_column, unique_count};
use crate::profiler::{
    find_key, is_identifier_name, ColumnClassifier, MEASURE_CUSTOMER_TERMS, MEASURE_PROFIT_TERMS,
    MEASURE_QUANTITY_TERMS, MEASURE_REVENUE_TERMS, SALES_TERMS,
};
use crate::types::{ChartKind, ColumnClassification, Dataset, KpiAggregation};

/// Free-text note attached to every exported config.
pub const EXPORT_NOTES: &str = "This config is machine- and human-readable. Copy DAX into Power BI Desktop to create measures; use the visuals array to recreate report pages quickly.";

/// Placeholder metric name used when no revenue-like column exists.
pub const GENERIC_METRIC: &str = "Metric";

/// Maximum number of KPI definitions in an exported config.
pub const EXPORT_KPI_LIMIT: usize = 4;

// ============================================================================
// Export Types
// ============================================================================

/// Portable snapshot of a dashboard, readable without the live dataset.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DashboardExport {
    /// ISO-8601 UTC timestamp
    pub exported_at: String,
    pub row_count: usize,
    pub columns: Vec<ColumnExport>,
    pub dimensions: Vec<DimensionExport>,
    pub kpis: Vec<KpiExport>,
    pub measures: Vec<MeasureExport>,
    pub visuals: Vec<VisualExport>,
    pub notes: String,
}

/// Exported data type of a column.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ExportDataType {
    Numeric,
    Date,
    Text,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ColumnExport {
    pub name: String,
    pub data_type: ExportDataType,
    pub is_identifier: bool,
    /// Distinct sample values, categorical columns only.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sample_values: Option<Vec<String>>,
}

/// A categorical column usable as a slicer.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DimensionExport {
    pub column: String,
    pub sample_values: Vec<String>,
    pub distinct_count: usize,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum KpiExportType {
    UniqueCount,
    Sum,
    Sample,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct KpiExport {
    pub key: String,
    pub label: String,
    #[serde(rename = "type")]
    pub kind: KpiExportType,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub value: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sample: Option<String>,
}

/// A suggested Power BI measure.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MeasureExport {
    pub name: String,
    pub dax: String,
    pub description: String,
    pub usage: Vec<String>,
}

/// A declarative visual hint: fields and aggregation, no computed data.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VisualExport {
    #[serde(rename = "type")]
    pub kind: ChartKind,
    pub title: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub x: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub y: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub category: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub value: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub columns: Option<Vec<String>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub aggregation: Option<String>,
    pub notes: String,
}

impl VisualExport {
    fn new(kind: ChartKind, title: String, notes: &str) -> Self {
        Self {
            kind,
            title,
            x: None,
            y: None,
            category: None,
            value: None,
            columns: None,
            aggregation: None,
            notes: notes.to_string(),
        }
    }
}

// ============================================================================
// Config Exporter
// ============================================================================

/// Builds [`DashboardExport`] snapshots.
pub struct ConfigExporter {
    config: AnalysisConfig,
}

impl ConfigExporter {
    pub fn new(config: AnalysisConfig) -> Self {
        Self { config }
    }

    /// Snapshot a dataset, stamped with the current time.
    pub fn build(&self, dataset: &Dataset) -> Result<DashboardExport> {
        self.build_at(dataset, Utc::now())
    }

    /// Snapshot a dataset with an explicit timestamp.
    ///
    /// # Errors
    ///
    /// Returns [`DashboardError::EmptyDataset`] when there are no records.
    pub fn build_at(&self, dataset: &Dataset, exported_at: DateTime<Utc>) -> Result<DashboardExport> {
        if dataset.is_empty() {
            return Err(DashboardError::EmptyDataset);
        }

        let classification = ColumnClassifier::classify(dataset);
        let export = DashboardExport {
            exported_at: exported_at.to_rfc3339_opts(SecondsFormat::Millis, true),
            row_count: dataset.len(),
            columns: self.columns(dataset, &classification),
            dimensions: self.dimensions(dataset, &classification),
            kpis: self.kpis(dataset, &classification),
            measures: self.measures(dataset, &classification),
            visuals: self.visuals(&classification),
            notes: EXPORT_NOTES.to_string(),
        };

        debug!(
            "Built dashboard config: {} measures, {} visuals",
            export.measures.len(),
            export.visuals.len()
        );
        Ok(export)
    }

    fn columns(&self, dataset: &Dataset, classification: &ColumnClassification) -> Vec<ColumnExport> {
        dataset
            .columns()
            .iter()
            .map(|column| {
                let data_type = if classification.is_numeric(column) {
                    ExportDataType::Numeric
                } else if classification.is_date_like(column) {
                    ExportDataType::Date
                } else {
                    ExportDataType::Text
                };
                let sample_values = classification.is_categorical(column).then(|| {
                    sample_distinct(dataset, column, self.config.sample_distinct_limit)
                });
                ColumnExport {
                    name: column.clone(),
                    data_type,
                    is_identifier: is_identifier_name(column),
                    sample_values,
                }
            })
            .collect()
    }

    fn dimensions(
        &self,
        dataset: &Dataset,
        classification: &ColumnClassification,
    ) -> Vec<DimensionExport> {
        classification
            .categorical
            .iter()
            .map(|column| DimensionExport {
                column: column.clone(),
                sample_values: sample_distinct(dataset, column, self.config.sample_distinct_limit),
                distinct_count: unique_count(dataset, column),
            })
            .collect()
    }

    /// Identifier-named columns then numeric columns, without the
    /// domain-specific cards.
    fn kpis(&self, dataset: &Dataset, classification: &ColumnClassification) -> Vec<KpiExport> {
        let mut candidates: Vec<&String> = Vec::new();
        for column in dataset
            .columns()
            .iter()
            .filter(|c| is_identifier_name(c))
            .chain(classification.numeric.iter())
        {
            if !candidates.contains(&column) {
                candidates.push(column);
            }
        }

        candidates
            .into_iter()
            .take(EXPORT_KPI_LIMIT)
            .map(|column| {
                let agg = aggregate_column(dataset, classification, column);
                match agg.aggregation {
                    KpiAggregation::UniqueCount => KpiExport {
                        key: column.clone(),
                        label: format!("Unique {column}"),
                        kind: KpiExportType::UniqueCount,
                        value: Some(agg.value),
                        sample: None,
                    },
                    KpiAggregation::Sum => KpiExport {
                        key: column.clone(),
                        label: format!("Total {column}"),
                        kind: KpiExportType::Sum,
                        value: Some(sum_column(dataset, column)),
                        sample: None,
                    },
                    _ => KpiExport {
                        key: column.clone(),
                        label: column.clone(),
                        kind: KpiExportType::Sample,
                        value: None,
                        sample: dataset
                            .first_record()
                            .and_then(|r| dataset.cell(r, column))
                            .map(|cell| cell.stringify()),
                    },
                }
            })
            .collect()
    }

    fn measures(&self, dataset: &Dataset, classification: &ColumnClassification) -> Vec<MeasureExport> {
        let table = &self.config.model_table_name;
        let columns = dataset.columns();
        let mut measures = MeasureList::default();

        let sales = find_key(columns, SALES_TERMS);
        let revenue = find_key(columns, MEASURE_REVENUE_TERMS);
        let profit = find_key(columns, MEASURE_PROFIT_TERMS);
        let customer = find_key(columns, MEASURE_CUSTOMER_TERMS);
        let quantity = find_key(columns, MEASURE_QUANTITY_TERMS);

        if let Some(key) = sales {
            measures.push(
                format!("Total {key}"),
                format!("Total {key} = SUM('{table}'[{key}])"),
                format!("Total {key} (use in cards, totals)."),
                &["Cards", "Tables", "Bar/Line"],
            );
        }
        if let Some(key) = revenue {
            measures.push(
                format!("Total {key}"),
                format!("Total {key} = SUM('{table}'[{key}])"),
                "Total revenue / income.".to_string(),
                &["Cards", "Bar/Line", "Donut"],
            );
        }
        if let Some(key) = profit {
            measures.push(
                format!("Average {key}"),
                format!("Avg {key} = AVERAGE('{table}'[{key}])"),
                "Average profit per row. Useful as Average KPI.".to_string(),
                &["Cards", "Line"],
            );
            measures.push(
                format!("Total {key}"),
                format!("Total {key} = SUM('{table}'[{key}])"),
                "Total profit.".to_string(),
                &["Cards", "Bar", "Stacked Bar"],
            );
        }
        if let Some(key) = customer {
            measures.push(
                format!("Unique {key}"),
                format!("Unique {key} = DISTINCTCOUNT('{table}'[{key}])"),
                "Unique customer count.".to_string(),
                &["Cards", "Slicers"],
            );
        }
        if let Some(key) = quantity {
            measures.push(
                format!("Total {key}"),
                format!("Total {key} = SUM('{table}'[{key}])"),
                "Total quantity sold.".to_string(),
                &["Bars", "Tables"],
            );
        }

        measures.push(
            "Row Count".to_string(),
            format!("Row Count = COUNTROWS('{table}')"),
            "Number of rows in the current filter context.".to_string(),
            &["Cards", "Tables"],
        );

        if let (Some(revenue), Some(profit)) = (revenue, profit) {
            measures.push(
                "Profit Margin %".to_string(),
                format!("Profit Margin % = DIVIDE([Total {profit}], [Total {revenue}], 0)"),
                "Profit margin as percentage. Use FORMAT() or % in visuals.".to_string(),
                &["Cards", "Bar", "Line"],
            );
        }

        let base = revenue.or_else(|| classification.numeric.first().map(String::as_str));
        if let (Some(date), Some(base)) = (classification.date_like.first(), base) {
            let name = format!("YoY {}", revenue.unwrap_or(GENERIC_METRIC));
            let dax = format!(
                "{name} = \n  VAR Cur = [Total {base}]\n  VAR Prev = CALCULATE([Total {base}], SAMEPERIODLASTYEAR('{table}'[{date}]))\n  RETURN DIVIDE(Cur - Prev, Prev, 0)"
            );
            measures.push(
                name,
                dax,
                "Year-over-year growth for revenue-like metric (requires date table).".to_string(),
                &["Line", "Cards"],
            );
        }

        measures.into_inner()
    }

    /// Hints mirroring the chart planner's choices.
    fn visuals(&self, classification: &ColumnClassification) -> Vec<VisualExport> {
        let numeric = &classification.numeric;
        let category = classification.categorical.first();
        let mut visuals = Vec::new();

        if let Some(date) = classification.date_like.first() {
            for measure in numeric.iter().take(self.config.max_time_series) {
                let mut visual = VisualExport::new(
                    ChartKind::Line,
                    format!("Time Series - {measure}"),
                    "Use date hierarchy; consider continuous axis.",
                );
                visual.x = Some(date.clone());
                visual.y = Some(measure.clone());
                visual.aggregation = Some("SUM".to_string());
                visuals.push(visual);
            }
        }

        for measure in numeric.iter().take(self.config.max_bar_charts) {
            let visual = match category {
                Some(category) => {
                    let mut visual = VisualExport::new(
                        ChartKind::Bar,
                        format!("{measure} by {category}"),
                        "Top N by value or sort descending.",
                    );
                    visual.category = Some(category.clone());
                    visual
                }
                None => {
                    let limit = self.config.row_fallback_limit;
                    let mut visual = VisualExport::new(
                        ChartKind::Bar,
                        format!("{measure} (first {limit} rows)"),
                        &format!("Shows first {limit} rows; useful when no categorical dims."),
                    );
                    visual.category = Some("Row Index".to_string());
                    visual
                }
            };
            visuals.push(VisualExport {
                value: Some(measure.clone()),
                aggregation: Some("SUM".to_string()),
                ..visual
            });
        }

        if let Some(category) = category {
            if numeric.is_empty() {
                let mut visual = VisualExport::new(
                    ChartKind::Donut,
                    format!("Distribution - {category}"),
                    "Use as slicer companion.",
                );
                visual.category = Some(category.clone());
                visual.aggregation = Some("COUNT".to_string());
                visuals.push(visual);
            }

            for measure in numeric.iter().take(self.config.max_donut_charts) {
                let mut visual = VisualExport::new(
                    ChartKind::Donut,
                    format!("Donut: {measure} by {category}"),
                    "Share of total per category.",
                );
                visual.category = Some(category.clone());
                visual.value = Some(measure.clone());
                visual.aggregation = Some("SUM".to_string());
                visuals.push(visual);
            }

            if let [first, second, ..] = numeric.as_slice() {
                let mut visual = VisualExport::new(
                    ChartKind::StackedBar,
                    format!("Stacked: {first} & {second} by {category}"),
                    "Stack both measures on the value axis.",
                );
                visual.category = Some(category.clone());
                visual.columns = Some(vec![first.clone(), second.clone()]);
                visual.aggregation = Some("SUM".to_string());
                visuals.push(visual);
            }

            for measure in numeric.iter().take(self.config.max_table_charts) {
                let mut visual = VisualExport::new(
                    ChartKind::Table,
                    format!("Top {measure} by {category}"),
                    &format!("Sort by metric desc, show top {}.", self.config.top_n),
                );
                visual.columns = Some(vec![category.clone(), measure.clone()]);
                visuals.push(visual);
            }
        }

        visuals
    }
}

/// Measures keyed by name; a name already present is not added again.
#[derive(Default)]
struct MeasureList {
    measures: Vec<MeasureExport>,
}

impl MeasureList {
    fn push(&mut self, name: String, dax: String, description: String, usage: &[&str]) {
        if self.measures.iter().any(|m| m.name == name) {
            return;
        }
        self.measures.push(MeasureExport {
            name,
            dax,
            description,
            usage: usage.iter().map(|u| u.to_string()).collect(),
        });
    }

    fn into_inner(self) -> Vec<MeasureExport> {
        self.measures
    }
}

static_assertions::assert_impl_all!(DashboardExport: Send, Sync);

/// Snapshot a dataset with the default settings.
pub fn build_dashboard_config(dataset: &Dataset) -> Result<DashboardExport> {
    ConfigExporter::new(AnalysisConfig::default()).build(dataset)
}
