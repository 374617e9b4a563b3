//! CSV parsing through polars.

use std::io::Cursor;

use polars::io::csv::read::CsvReadOptions;
use polars::prelude::*;
use tracing::debug;

use crate::error::{DashboardError, Result, ResultExt};
use crate::types::{Cell, RawTable};

/// Rows used for type inference on the first attempt.
const INFER_SCHEMA_ROWS: usize = 100;

/// Parse CSV bytes into keyed records.
///
/// The first line is the header. Polars infers column types from the first
/// 100 rows, so numeric columns arrive as numbers and empty fields as
/// [`Cell::Empty`]. When a later value does not fit the inferred type, the
/// file is read again with every column as text; the normalizer coerces
/// numeric text afterwards. Short rows are padded with nulls and long rows
/// are truncated to the header.
pub fn parse_csv(bytes: &[u8]) -> Result<RawTable> {
    let df = match read_frame(bytes, Some(INFER_SCHEMA_ROWS)) {
        Ok(df) => df,
        Err(e) => {
            debug!("Typed CSV read failed, retrying as text: {}", e);
            read_frame(bytes, Some(0)).map_err(|e| DashboardError::parse_failed("csv", e))?
        }
    };

    debug!("CSV frame: {} rows x {} columns", df.height(), df.width());
    records_from_frame(&df).context("Failed to read csv rows")
}

// An inference length of zero reads every column as a string
fn read_frame(bytes: &[u8], infer_schema_length: Option<usize>) -> PolarsResult<DataFrame> {
    CsvReadOptions::default()
        .with_infer_schema_length(infer_schema_length)
        .with_has_header(true)
        .with_parse_options(
            CsvParseOptions::default()
                .with_quote_char(Some(b'"'))
                .with_truncate_ragged_lines(true),
        )
        .into_reader_with_file_handle(Cursor::new(bytes.to_vec()))
        .finish()
}

fn records_from_frame(df: &DataFrame) -> PolarsResult<RawTable> {
    let columns = df.get_columns();
    let mut records = Vec::with_capacity(df.height());

    for row in 0..df.height() {
        let mut record = Vec::with_capacity(columns.len());
        for column in columns {
            record.push((column.name().to_string(), cell_from_any(column.get(row)?)));
        }
        records.push(record);
    }

    Ok(RawTable::Records(records))
}

fn cell_from_any(value: AnyValue<'_>) -> Cell {
    match value {
        AnyValue::Null => Cell::Empty,
        AnyValue::Boolean(b) => Cell::Bool(b),
        AnyValue::String(s) => Cell::text(s),
        AnyValue::StringOwned(s) => Cell::text(s.as_str()),
        AnyValue::Int8(v) => number_cell(v as f64),
        AnyValue::Int16(v) => number_cell(v as f64),
        AnyValue::Int32(v) => number_cell(v as f64),
        AnyValue::Int64(v) => number_cell(v as f64),
        AnyValue::UInt8(v) => number_cell(v as f64),
        AnyValue::UInt16(v) => number_cell(v as f64),
        AnyValue::UInt32(v) => number_cell(v as f64),
        AnyValue::UInt64(v) => number_cell(v as f64),
        AnyValue::Float32(v) => number_cell(v as f64),
        AnyValue::Float64(v) => number_cell(v),
        other => Cell::text(other.to_string()),
    }
}

// NaN and infinities are never numbers downstream
fn number_cell(value: f64) -> Cell {
    if value.is_finite() {
        Cell::Number(value)
    } else {
        Cell::text(value.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn records(raw: RawTable) -> Vec<Vec<(String, Cell)>> {
        match raw {
            RawTable::Records(records) => records,
            RawTable::Rows(_) => panic!("CSV parses into keyed records"),
        }
    }

    #[test]
    fn test_parse_typed_columns() {
        let csv = b"Region,Sales,Active\nEast,1200,true\nWest,800.5,false\n";

        let rows = records(parse_csv(csv).unwrap());

        assert_eq!(rows.len(), 2);
        assert_eq!(
            rows[0],
            vec![
                ("Region".to_string(), Cell::text("East")),
                ("Sales".to_string(), Cell::Number(1200.0)),
                ("Active".to_string(), Cell::Bool(true)),
            ]
        );
        assert_eq!(rows[1][1].1, Cell::Number(800.5));
    }

    #[test]
    fn test_parse_quoted_and_missing_fields() {
        let csv = b"Region,Sales\nEast,\"1,200\"\nWest,\n";

        let rows = records(parse_csv(csv).unwrap());

        assert_eq!(rows[0][1].1, Cell::text("1,200"));
        assert_eq!(rows[1][1].1, Cell::Empty);
    }

    #[test]
    fn test_late_text_value_falls_back_to_text_columns() {
        let mut csv = String::from("Region,Sales\n");
        for i in 0..150 {
            csv.push_str(&format!("East,{i}\n"));
        }
        csv.push_str("West,n/a\n");

        let rows = records(parse_csv(csv.as_bytes()).unwrap());

        assert_eq!(rows.len(), 151);
        assert_eq!(rows[0][0].1, Cell::text("East"));
        assert_eq!(rows[149][1].1, Cell::text("149"));
        assert_eq!(rows[150][1].1, Cell::text("n/a"));
    }

    #[test]
    fn test_ragged_rows_are_padded_and_truncated() {
        let rows = records(parse_csv(b"A,B\n1,2\n3\n4,5,6\n").unwrap());

        assert_eq!(rows.len(), 3);
        assert!(rows.iter().all(|row| row.len() == 2));
        assert_eq!(rows[1][0].1.as_number(), Some(3.0));
        assert!(rows[1][1].1.is_blank());
        assert_eq!(rows[2][1].1.as_number(), Some(5.0));
    }

    #[test]
    fn test_header_only() {
        let rows = records(parse_csv(b"A,B\n").unwrap());
        assert!(rows.is_empty());
    }
}
