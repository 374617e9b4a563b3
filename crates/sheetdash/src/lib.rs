//! Spreadsheet Dashboard Planner Library
//!
//! Turns an uploaded spreadsheet (CSV or XLSX) into an interactive dashboard
//! description: KPI cards, chart plans with their data computed, categorical
//! slicers and a table preview, plus an export package for rebuilding the
//! dashboard in Power BI.
//!
//! # Overview
//!
//! - **Normalization**: Raw rows or keyed records become a uniform [`Dataset`]
//!   with numeric strings coerced to numbers
//! - **Classification**: Every column lands in a numeric, categorical or
//!   date-like bucket
//! - **KPI Selection**: Finance and healthcare card families, identifier and
//!   numeric backfill, raw sample fallback
//! - **Chart Planning**: Line, bar, donut, stacked-bar and top-N table plans
//! - **Slicers**: Exact-match filters on categorical columns, recomputing the
//!   whole dashboard on every change
//! - **Export**: A JSON dashboard config with DAX measures, the dataset as an
//!   XLSX workbook and Power BI instructions
//!
//! # Quick Start
//!
//! ```rust,ignore
//! use sheetdash::{AnalysisConfig, DashboardController, SlicerSelection, TerminalRenderer};
//! use std::path::Path;
//!
//! let mut controller =
//!     DashboardController::new(AnalysisConfig::default(), TerminalRenderer::new(std::io::stdout()));
//!
//! controller.open(Path::new("sales.csv")).await?;
//! controller.select("Region", SlicerSelection::value("East"))?;
//! controller.renderer_mut().present()?;
//!
//! let files = controller.export_to("./export")?;
//! println!("Workbook written to {}", files.workbook.display());
//! ```
//!
//! # Without a renderer
//!
//! The stages are plain functions of a dataset and can be used directly:
//!
//! ```rust,ignore
//! use sheetdash::{ChartPlanner, ColumnClassifier, KpiSelector, Normalizer, AnalysisConfig};
//! use sheetdash::io::parse_csv;
//!
//! let dataset = Normalizer::normalize(parse_csv(bytes)?);
//! let classification = ColumnClassifier::classify(&dataset);
//! let kpis = KpiSelector::new(AnalysisConfig::default()).select(&dataset, &classification);
//! let charts = ChartPlanner::new(AnalysisConfig::default()).plan(&dataset, &classification);
//! ```

pub mod cleaner;
pub mod config;
pub mod decisions;
pub mod error;
pub mod io;
pub mod pipeline;
pub mod profiler;
pub mod render;
pub mod reporting;
pub mod types;
pub mod utils;

// Re-exports for convenient access
pub use cleaner::Normalizer;
pub use config::{AnalysisConfig, AnalysisConfigBuilder, ConfigValidationError};
pub use decisions::{ChartPlanner, KpiSelector};
pub use error::{DashboardError, Result as DashboardResult, ResultExt};
pub use io::SourceFormat;
pub use pipeline::{
    DashboardController, DashboardSession, DashboardView, Slicer, SlicerSelection, SlicerSet,
};
pub use profiler::{ColumnClassifier, DomainSignals};
pub use render::{ClosureNotifier, DashboardRenderer, JsonRenderer, TerminalRenderer};
pub use reporting::{
    ConfigExporter, DashboardExport, ExportPackage, ExportedFiles, export_dataset_xlsx,
};
pub use types::{
    Cell, ChartAggregation, ChartKind, ChartPlan, ChartSeries, ColumnClassification, ColumnKind,
    Dataset, KpiAggregation, KpiCard, RawTable, Record, TablePreview,
};
pub use utils::{format_thousands, is_date_string, parse_date, parse_number};
