//! Cell and header conversion functions for normalization.

use crate::types::Cell;
use crate::utils::parse_numeric_string;

/// Coerce numeric-looking text to a number.
///
/// Text that is non-empty after removing thousands separators and trimming,
/// and parses fully as a finite number, becomes [`Cell::Number`]. Every other
/// cell passes through unchanged.
pub(crate) fn coerce_cell(cell: Cell) -> Cell {
    match cell {
        Cell::Text(text) => match parse_numeric_string(&text) {
            Some(value) => Cell::Number(value),
            None => Cell::Text(text),
        },
        other => other,
    }
}

/// Trimmed header name, with a positional placeholder for blanks.
pub(crate) fn header_name(raw: &str, position: usize) -> String {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        format!("col{position}")
    } else {
        trimmed.to_string()
    }
}

/// Header name for a header-row cell of any type.
pub(crate) fn header_from_cell(cell: &Cell, position: usize) -> String {
    header_name(&cell.stringify(), position)
}

/// Ordered, duplicate-free column list plus the slot each input position
/// writes to. Later duplicates land on the first occurrence's slot.
pub(crate) fn resolve_columns<I>(names: I) -> (Vec<String>, Vec<usize>)
where
    I: IntoIterator<Item = String>,
{
    let mut columns: Vec<String> = Vec::new();
    let mut slots = Vec::new();

    for name in names {
        match columns.iter().position(|c| *c == name) {
            Some(existing) => slots.push(existing),
            None => {
                slots.push(columns.len());
                columns.push(name);
            }
        }
    }

    (columns, slots)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_coerce_cell_numeric_text() {
        assert_eq!(coerce_cell(Cell::text("1,200")), Cell::Number(1200.0));
        assert_eq!(coerce_cell(Cell::text("  42 ")), Cell::Number(42.0));
        assert_eq!(coerce_cell(Cell::text("-3.5")), Cell::Number(-3.5));
    }

    #[test]
    fn test_coerce_cell_passthrough() {
        assert_eq!(coerce_cell(Cell::text("East")), Cell::text("East"));
        assert_eq!(coerce_cell(Cell::text("   ")), Cell::text("   "));
        assert_eq!(coerce_cell(Cell::text("2023-01")), Cell::text("2023-01"));
        assert_eq!(coerce_cell(Cell::Bool(true)), Cell::Bool(true));
        assert_eq!(coerce_cell(Cell::Empty), Cell::Empty);
    }

    #[test]
    fn test_header_name() {
        assert_eq!(header_name("  Sales ", 0), "Sales");
        assert_eq!(header_name("", 3), "col3");
        assert_eq!(header_from_cell(&Cell::Number(2024.0), 1), "2024");
        assert_eq!(header_from_cell(&Cell::Empty, 2), "col2");
    }

    #[test]
    fn test_resolve_columns_collapses_duplicates() {
        let (columns, slots) =
            resolve_columns(vec!["A".to_string(), "B".to_string(), "A".to_string()]);
        assert_eq!(columns, vec!["A", "B"]);
        assert_eq!(slots, vec![0, 1, 0]);
    }
}
