//! Export of a dashboard for rebuilding in a BI tool.
//!
//! This module provides:
//! - [`ConfigExporter`]: a JSON-serializable snapshot of columns, KPIs,
//!   suggested DAX measures and visual hints
//! - [`export_dataset_xlsx`]: the working dataset as a single-sheet workbook
//! - [`ExportPackage`]: both of the above plus written instructions, saved to
//!   a directory

mod generator;
mod xlsx;

pub use generator::{
    build_dashboard_config, ColumnExport, ConfigExporter, DashboardExport, DimensionExport,
    ExportDataType, KpiExport, KpiExportType, MeasureExport, VisualExport, EXPORT_KPI_LIMIT,
    EXPORT_NOTES, GENERIC_METRIC,
};
pub use xlsx::{
    export_dataset_xlsx, ExportPackage, ExportedFiles, CONFIG_FILE_NAME, DATA_SHEET_NAME,
    INSTRUCTIONS_FILE_NAME, POWER_BI_INSTRUCTIONS, WORKBOOK_FILE_NAME,
};
