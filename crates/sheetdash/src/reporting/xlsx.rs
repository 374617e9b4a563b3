//! Dataset workbook export and the on-disk export package.

use std::fs::{self, File};
use std::io::Write;
use std::path::{Path, PathBuf};

use rust_xlsxwriter::Workbook;
use serde::Serialize;
use tracing::info;

use crate::config::AnalysisConfig;
use crate::error::{DashboardError, Result, ResultExt};
use crate::reporting::generator::{ConfigExporter, DashboardExport};
use crate::types::{Cell, Dataset};

/// Sheet holding the exported records; the DAX measures reference it.
pub const DATA_SHEET_NAME: &str = "Data";

pub const WORKBOOK_FILE_NAME: &str = "dataset.xlsx";
pub const CONFIG_FILE_NAME: &str = "dashboard-config.json";
pub const INSTRUCTIONS_FILE_NAME: &str = "POWERBI_INSTRUCTIONS.txt";

/// Steps for rebuilding the dashboard in Power BI Desktop.
pub const POWER_BI_INSTRUCTIONS: &str = "\
Power BI steps:
1. Open Power BI Desktop.
2. Home -> Get Data -> Excel -> choose dataset.xlsx.
3. Option A: if you have a .pbit template, use File -> Import -> Power BI Template.
4. Option B: recreate the visuals listed in dashboard-config.json and paste the DAX measures.
5. File -> Save to create the .pbix.
";

/// Write a dataset to an XLSX workbook with a single sheet.
///
/// Row 0 holds the column names. Numbers and booleans keep their type;
/// text is written as strings and empty cells are left blank.
///
/// # Errors
///
/// Returns [`DashboardError::EmptyDataset`] when there are no records.
pub fn export_dataset_xlsx(dataset: &Dataset) -> Result<Vec<u8>> {
    if dataset.is_empty() {
        return Err(DashboardError::EmptyDataset);
    }

    let mut workbook = Workbook::new();
    let sheet = workbook.add_worksheet();
    sheet.set_name(DATA_SHEET_NAME).map_err(xlsx_error)?;

    for (col, name) in dataset.columns().iter().enumerate() {
        sheet
            .write_string(0, column_index(col)?, name.as_str())
            .map_err(xlsx_error)?;
    }

    for (row, record) in dataset.records().iter().enumerate() {
        let row = u32::try_from(row + 1)
            .map_err(|_| DashboardError::ExportFailed("too many rows for a worksheet".to_string()))?;
        for (col, cell) in record.cells().iter().enumerate() {
            let col = column_index(col)?;
            match cell {
                Cell::Number(n) => sheet.write_number(row, col, *n).map(|_| ()),
                Cell::Text(s) => sheet.write_string(row, col, s.as_str()).map(|_| ()),
                Cell::Bool(b) => sheet.write_boolean(row, col, *b).map(|_| ()),
                Cell::Empty => Ok(()),
            }
            .map_err(xlsx_error)?;
        }
    }

    let bytes = workbook.save_to_buffer().map_err(xlsx_error)?;
    info!(
        "Dataset workbook: {} rows x {} columns, {} bytes",
        dataset.len(),
        dataset.columns().len(),
        bytes.len()
    );
    Ok(bytes)
}

fn column_index(col: usize) -> Result<u16> {
    u16::try_from(col)
        .map_err(|_| DashboardError::ExportFailed("too many columns for a worksheet".to_string()))
}

fn xlsx_error(e: rust_xlsxwriter::XlsxError) -> DashboardError {
    DashboardError::ExportFailed(e.to_string())
}

// ============================================================================
// Export Package
// ============================================================================

/// Everything the export step hands to the user.
#[derive(Debug, Clone)]
pub struct ExportPackage {
    /// `dataset.xlsx` contents
    pub workbook: Vec<u8>,
    pub config: DashboardExport,
}

/// Paths of the files written by [`ExportPackage::write_to`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ExportedFiles {
    pub workbook: PathBuf,
    pub config: PathBuf,
    pub instructions: PathBuf,
}

impl ExportPackage {
    /// Build the workbook and config for a dataset.
    pub fn build(dataset: &Dataset, config: &AnalysisConfig) -> Result<Self> {
        let workbook = export_dataset_xlsx(dataset)?;
        let config = ConfigExporter::new(config.clone()).build(dataset)?;
        Ok(Self { workbook, config })
    }

    /// Write the workbook, the pretty-printed config and the Power BI
    /// instructions into `dir`, creating it if needed.
    pub fn write_to(&self, dir: &Path) -> Result<ExportedFiles> {
        fs::create_dir_all(dir).context(format!("Failed to create {}", dir.display()))?;

        let files = ExportedFiles {
            workbook: dir.join(WORKBOOK_FILE_NAME),
            config: dir.join(CONFIG_FILE_NAME),
            instructions: dir.join(INSTRUCTIONS_FILE_NAME),
        };

        write_file(&files.workbook, &self.workbook)?;
        info!("Workbook saved: {}", files.workbook.display());

        let json = serde_json::to_string_pretty(&self.config)?;
        write_file(&files.config, json.as_bytes())?;
        info!("Dashboard config saved: {}", files.config.display());

        write_file(&files.instructions, POWER_BI_INSTRUCTIONS.as_bytes())?;
        info!("Instructions saved: {}", files.instructions.display());

        Ok(files)
    }
}

fn write_file(path: &Path, contents: &[u8]) -> Result<()> {
    let mut file = File::create(path).context(format!("Failed to create {}", path.display()))?;
    file.write_all(contents)
        .context(format!("Failed to write {}", path.display()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::Record;
    use calamine::{open_workbook_from_rs, Data, Reader, Xlsx};
    use pretty_assertions::assert_eq;
    use std::io::Cursor;
    use tempfile::tempdir;

    fn mixed() -> Dataset {
        Dataset::new(
            vec!["Region".to_string(), "Sales".to_string(), "Active".to_string()],
            vec![
                Record::new(vec![Cell::text("East"), Cell::Number(1200.0), Cell::Bool(true)]),
                Record::new(vec![Cell::text("West"), Cell::Empty, Cell::Bool(false)]),
            ],
        )
    }

    #[test]
    fn test_empty_dataset_rejected() {
        let err = export_dataset_xlsx(&Dataset::empty()).unwrap_err();
        assert!(matches!(err, DashboardError::EmptyDataset));
    }

    #[test]
    fn test_workbook_round_trip_keeps_types() {
        let bytes = export_dataset_xlsx(&mixed()).unwrap();

        let mut workbook: Xlsx<_> = open_workbook_from_rs(Cursor::new(bytes)).unwrap();
        assert_eq!(workbook.sheet_names(), vec![DATA_SHEET_NAME.to_string()]);

        let range = workbook.worksheet_range(DATA_SHEET_NAME).unwrap();
        assert_eq!(range.get_value((0, 1)), Some(&Data::String("Sales".to_string())));
        assert_eq!(range.get_value((1, 1)), Some(&Data::Float(1200.0)));
        assert_eq!(range.get_value((1, 2)), Some(&Data::Bool(true)));
        assert_eq!(range.get_value((2, 1)), Some(&Data::Empty));
    }

    #[test]
    fn test_write_package() {
        let dir = tempdir().unwrap();
        let package = ExportPackage::build(&mixed(), &AnalysisConfig::default()).unwrap();

        let files = package.write_to(&dir.path().join("out")).unwrap();

        assert!(files.workbook.exists());
        let json = fs::read_to_string(&files.config).unwrap();
        let config: DashboardExport = serde_json::from_str(&json).unwrap();
        assert_eq!(config.row_count, 2);
        let instructions = fs::read_to_string(&files.instructions).unwrap();
        assert!(instructions.contains("dataset.xlsx"));
    }
}
