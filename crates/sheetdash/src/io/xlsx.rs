//! XLSX parsing through calamine.

use std::io::Cursor;

use calamine::{open_workbook_from_rs, Data, DataType, Reader, Xlsx};
use tracing::debug;

use crate::error::{DashboardError, Result};
use crate::types::{Cell, RawTable};
use crate::utils::format_plain_number;

/// Parse the first worksheet of an XLSX workbook into a header-first grid.
///
/// Every non-empty cell is rendered as a string, the way it would display;
/// numeric coercion is left to the normalizer.
pub fn parse_xlsx(bytes: &[u8]) -> Result<RawTable> {
    let mut workbook: Xlsx<_> = open_workbook_from_rs(Cursor::new(bytes))
        .map_err(|e| DashboardError::parse_failed("xlsx", e))?;

    let range = workbook
        .worksheet_range_at(0)
        .ok_or_else(|| DashboardError::parse_failed("xlsx", "workbook has no worksheets"))?
        .map_err(|e| DashboardError::parse_failed("xlsx", e))?;

    let rows: Vec<Vec<Cell>> = range
        .rows()
        .map(|row| row.iter().map(cell_from_data).collect())
        .collect();

    debug!("XLSX sheet: {} rows including header", rows.len());
    Ok(RawTable::Rows(rows))
}

fn cell_from_data(value: &Data) -> Cell {
    match value {
        Data::Empty => Cell::Empty,
        Data::String(s) => Cell::text(s.as_str()),
        Data::Float(f) => Cell::text(format_plain_number(*f)),
        Data::Int(i) => Cell::text(i.to_string()),
        Data::Bool(b) => Cell::text(b.to_string()),
        Data::DateTime(_) => match value.as_datetime() {
            Some(dt) if dt.time() == chrono::NaiveTime::MIN => {
                Cell::text(dt.format("%Y-%m-%d").to_string())
            }
            Some(dt) => Cell::text(dt.format("%Y-%m-%d %H:%M:%S").to_string()),
            None => Cell::text(value.to_string()),
        },
        other => Cell::text(other.to_string()),
    }
}
