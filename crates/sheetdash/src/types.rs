use serde::{Deserialize, Serialize};

use crate::utils::{format_plain_number, parse_number};

// ============================================================================
// Cells, Records and Datasets
// ============================================================================

/// A single cell value.
///
/// Serializes untagged: numbers as JSON numbers, text as strings, booleans as
/// booleans and [`Cell::Empty`] as `null`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
#[serde(untagged)]
pub enum Cell {
    Number(f64),
    Text(String),
    Bool(bool),
    #[default]
    Empty,
}

impl Cell {
    /// Build a text cell.
    pub fn text(value: impl Into<String>) -> Self {
        Cell::Text(value.into())
    }

    /// True for missing cells and whitespace-only text.
    pub fn is_blank(&self) -> bool {
        match self {
            Cell::Empty => true,
            Cell::Text(s) => s.trim().is_empty(),
            Cell::Number(_) | Cell::Bool(_) => false,
        }
    }

    /// Numeric view of the cell, if it has one.
    ///
    /// Text that parses fully as a number counts; booleans do not.
    pub fn as_number(&self) -> Option<f64> {
        match self {
            Cell::Number(n) => Some(*n),
            Cell::Text(s) => parse_number(s),
            Cell::Bool(_) | Cell::Empty => None,
        }
    }

    /// Contribution of this cell to a sum: non-numeric values count as zero.
    pub fn numeric_or_zero(&self) -> f64 {
        self.as_number().unwrap_or(0.0)
    }

    /// String form used for grouping and slicer matching.
    pub fn stringify(&self) -> String {
        match self {
            Cell::Number(n) => format_plain_number(*n),
            Cell::Text(s) => s.clone(),
            Cell::Bool(b) => b.to_string(),
            Cell::Empty => String::new(),
        }
    }
}

impl From<f64> for Cell {
    fn from(value: f64) -> Self {
        Cell::Number(value)
    }
}

impl From<&str> for Cell {
    fn from(value: &str) -> Self {
        Cell::Text(value.to_string())
    }
}

impl From<String> for Cell {
    fn from(value: String) -> Self {
        Cell::Text(value)
    }
}

impl From<bool> for Cell {
    fn from(value: bool) -> Self {
        Cell::Bool(value)
    }
}

/// One row, positionally aligned with its dataset's column list.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct Record {
    cells: Vec<Cell>,
}

impl Record {
    pub fn new(cells: Vec<Cell>) -> Self {
        Self { cells }
    }

    /// Cell at a column position; out-of-range positions read as empty.
    pub fn get(&self, index: usize) -> &Cell {
        static EMPTY: Cell = Cell::Empty;
        self.cells.get(index).unwrap_or(&EMPTY)
    }

    pub fn cells(&self) -> &[Cell] {
        &self.cells
    }
}

/// An ordered sequence of records sharing one column list.
///
/// The column list is fixed when the dataset is built; every record is
/// padded or truncated to it.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct Dataset {
    columns: Vec<String>,
    records: Vec<Record>,
}

impl Dataset {
    /// Build a dataset, aligning every record to `columns`.
    pub fn new(columns: Vec<String>, records: Vec<Record>) -> Self {
        let width = columns.len();
        let records = records
            .into_iter()
            .map(|record| {
                let mut cells = record.cells;
                cells.resize(width, Cell::Empty);
                Record { cells }
            })
            .collect();
        Self { columns, records }
    }

    pub fn empty() -> Self {
        Self::default()
    }

    pub fn columns(&self) -> &[String] {
        &self.columns
    }

    pub fn records(&self) -> &[Record] {
        &self.records
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn first_record(&self) -> Option<&Record> {
        self.records.first()
    }

    /// Position of a column by exact name.
    pub fn column_index(&self, name: &str) -> Option<usize> {
        self.columns.iter().position(|c| c == name)
    }

    /// All values of one column, in record order. Unknown columns yield
    /// nothing.
    pub fn column_values<'a>(&'a self, name: &str) -> impl Iterator<Item = &'a Cell> + use<'a> {
        let index = self.column_index(name);
        self.records
            .iter()
            .filter_map(move |record| index.map(|i| record.get(i)))
    }

    /// Cell of `record` in column `name`.
    pub fn cell<'a>(&self, record: &'a Record, name: &str) -> Option<&'a Cell> {
        self.column_index(name).map(|i| record.get(i))
    }

    /// Order-preserving subsequence of the records matching `predicate`.
    pub fn filter<F>(&self, mut predicate: F) -> Dataset
    where
        F: FnMut(&Record) -> bool,
    {
        Dataset {
            columns: self.columns.clone(),
            records: self
                .records
                .iter()
                .filter(|record| predicate(record))
                .cloned()
                .collect(),
        }
    }

    /// The first `n` records.
    pub fn head(&self, n: usize) -> Dataset {
        Dataset {
            columns: self.columns.clone(),
            records: self.records.iter().take(n).cloned().collect(),
        }
    }
}

/// Tabular input as produced by a parsing collaborator.
#[derive(Debug, Clone, PartialEq)]
pub enum RawTable {
    /// Row 0 is the header row; later rows are positional cells.
    Rows(Vec<Vec<Cell>>),
    /// Already-keyed records, each an ordered list of (column, value).
    Records(Vec<Vec<(String, Cell)>>),
}

impl From<&Dataset> for RawTable {
    fn from(dataset: &Dataset) -> Self {
        RawTable::Records(
            dataset
                .records()
                .iter()
                .map(|record| {
                    dataset
                        .columns()
                        .iter()
                        .cloned()
                        .zip(record.cells().iter().cloned())
                        .collect()
                })
                .collect(),
        )
    }
}

// ============================================================================
// Column Classification
// ============================================================================

/// The bucket a column is placed in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum ColumnKind {
    Numeric,
    Categorical,
    DateLike,
}

/// Partition of a dataset's columns into numeric, categorical and date-like
/// buckets. Each bucket keeps the original column order.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ColumnClassification {
    pub numeric: Vec<String>,
    pub categorical: Vec<String>,
    pub date_like: Vec<String>,
}

impl ColumnClassification {
    /// Bucket of a column, if the column was classified.
    pub fn kind_of(&self, column: &str) -> Option<ColumnKind> {
        if self.date_like.iter().any(|c| c == column) {
            Some(ColumnKind::DateLike)
        } else if self.numeric.iter().any(|c| c == column) {
            Some(ColumnKind::Numeric)
        } else if self.categorical.iter().any(|c| c == column) {
            Some(ColumnKind::Categorical)
        } else {
            None
        }
    }

    pub fn is_numeric(&self, column: &str) -> bool {
        self.numeric.iter().any(|c| c == column)
    }

    pub fn is_categorical(&self, column: &str) -> bool {
        self.categorical.iter().any(|c| c == column)
    }

    pub fn is_date_like(&self, column: &str) -> bool {
        self.date_like.iter().any(|c| c == column)
    }

    /// Total number of classified columns.
    pub fn column_count(&self) -> usize {
        self.numeric.len() + self.categorical.len() + self.date_like.len()
    }
}

// ============================================================================
// KPI Cards
// ============================================================================

/// How a KPI value was computed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum KpiAggregation {
    Sum,
    Average,
    UniqueCount,
    RowCount,
    Sample,
}

impl KpiAggregation {
    /// Short tag shown under the card value.
    pub fn subtitle(&self) -> &'static str {
        match self {
            Self::Sum => "sum",
            Self::Average => "avg",
            Self::UniqueCount => "unique",
            Self::RowCount => "rows",
            Self::Sample => "sample",
        }
    }
}

/// One headline metric.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct KpiCard {
    pub label: String,
    /// Display-ready value.
    pub value: String,
    /// Underlying number, when the card has one.
    pub raw: Option<f64>,
    pub aggregation: KpiAggregation,
}

impl KpiCard {
    pub fn subtitle(&self) -> &'static str {
        self.aggregation.subtitle()
    }
}

// ============================================================================
// Chart Plans
// ============================================================================

/// Kind of chart a plan describes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ChartKind {
    Line,
    Bar,
    Donut,
    StackedBar,
    Table,
}

impl ChartKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Line => "line",
            Self::Bar => "bar",
            Self::Donut => "donut",
            Self::StackedBar => "stacked-bar",
            Self::Table => "table",
        }
    }
}

/// How a chart's values were computed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ChartAggregation {
    /// Sum of the measure per label.
    Sum,
    /// Number of rows per label.
    Count,
    /// One value per row, no grouping.
    RowValue,
}

/// A named series of values aligned with a plan's labels.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChartSeries {
    pub name: String,
    pub values: Vec<f64>,
}

/// Renderer-agnostic description of one chart, with its data computed.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChartPlan {
    pub kind: ChartKind,
    pub title: String,
    /// Grouping column (category or date), if any.
    pub dimension: Option<String>,
    /// Measured columns, in series order.
    pub measures: Vec<String>,
    pub aggregation: ChartAggregation,
    pub labels: Vec<String>,
    pub series: Vec<ChartSeries>,
}

// ============================================================================
// Table Preview
// ============================================================================

/// The first rows of the working dataset, stringified for display.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct TablePreview {
    pub columns: Vec<String>,
    pub rows: Vec<Vec<String>>,
    /// Rows in the working dataset (may exceed `rows.len()`).
    pub total_rows: usize,
}

impl TablePreview {
    pub fn from_dataset(dataset: &Dataset, limit: usize) -> Self {
        Self {
            columns: dataset.columns().to_vec(),
            rows: dataset
                .records()
                .iter()
                .take(limit)
                .map(|record| record.cells().iter().map(Cell::stringify).collect())
                .collect(),
            total_rows: dataset.len(),
        }
    }
}
