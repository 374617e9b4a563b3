//! Normalization of parsed tabular input.
//!
//! This module turns whatever shape the parsing collaborator produced
//! (a header-first grid or keyed records) into a [`Dataset`]:
//! - Trimmed column names, `col<N>` for blank headers
//! - A stable column list taken from the header row / first record
//! - Entirely empty grid rows dropped
//! - Numeric-looking text coerced to numbers
//!
//! Normalization never fails and is idempotent.

mod converters;

use crate::types::{Cell, Dataset, RawTable, Record};
use converters::{coerce_cell, header_from_cell, header_name, resolve_columns};
use tracing::debug;

/// Normalizer for raw parsed tables.
pub struct Normalizer;

impl Normalizer {
    /// Normalize a raw table into a dataset.
    pub fn normalize(input: RawTable) -> Dataset {
        let dataset = match input {
            RawTable::Rows(rows) => Self::from_rows(rows),
            RawTable::Records(records) => Self::from_records(records),
        };
        debug!(
            "Normalized {} records across {} columns",
            dataset.len(),
            dataset.columns().len()
        );
        dataset
    }

    fn from_rows(rows: Vec<Vec<Cell>>) -> Dataset {
        let mut rows = rows.into_iter();
        let Some(header) = rows.next() else {
            return Dataset::empty();
        };

        let (columns, slots) = resolve_columns(
            header
                .iter()
                .enumerate()
                .map(|(position, cell)| header_from_cell(cell, position)),
        );

        let records = rows
            .filter(|row| !row.iter().all(Cell::is_blank))
            .map(|row| {
                let mut cells = vec![Cell::Empty; columns.len()];
                for (position, cell) in row.into_iter().enumerate().take(slots.len()) {
                    cells[slots[position]] = coerce_cell(cell);
                }
                Record::new(cells)
            })
            .collect();

        Dataset::new(columns, records)
    }

    fn from_records(records: Vec<Vec<(String, Cell)>>) -> Dataset {
        let Some(first) = records.first() else {
            return Dataset::empty();
        };

        let (columns, slots) = resolve_columns(
            first
                .iter()
                .enumerate()
                .map(|(position, (name, _))| header_name(name, position)),
        );

        // Blank keys keep the placeholder slot chosen from the first record
        let blank_slot = first
            .iter()
            .position(|(name, _)| name.trim().is_empty())
            .map(|position| slots[position]);

        let records = records
            .into_iter()
            .map(|record| {
                let mut cells = vec![Cell::Empty; columns.len()];
                for (name, cell) in record {
                    let name = name.trim();
                    let slot = if name.is_empty() {
                        blank_slot
                    } else {
                        columns.iter().position(|c| c == name)
                    };
                    if let Some(slot) = slot {
                        cells[slot] = coerce_cell(cell);
                    }
                }
                Record::new(cells)
            })
            .collect();

        Dataset::new(columns, records)
    }
}
