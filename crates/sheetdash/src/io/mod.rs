//! Source loading.
//!
//! Reading bytes is the only asynchronous step of the whole planner. Once
//! the full buffer is in memory it is handed to one of two parsers:
//! - `.csv` / `.txt` through polars, producing keyed records
//! - anything else as an XLSX workbook through calamine, producing a
//!   header-first grid of strings from the first sheet

mod csv;
mod xlsx;

pub use self::csv::parse_csv;
pub use self::xlsx::parse_xlsx;

use std::path::Path;

use serde::Serialize;
use tracing::{debug, info};

use crate::error::{Result, ResultExt};
use crate::types::RawTable;

/// Parser a file is routed to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum SourceFormat {
    Csv,
    Xlsx,
}

impl SourceFormat {
    /// Pick the parser from a file extension (case-insensitive).
    pub fn from_path(path: &Path) -> Self {
        let extension = path
            .extension()
            .map(|e| e.to_string_lossy().to_lowercase())
            .unwrap_or_default();
        match extension.as_str() {
            "csv" | "txt" => Self::Csv,
            _ => Self::Xlsx,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Csv => "csv",
            Self::Xlsx => "xlsx",
        }
    }
}

/// Read a whole file into memory.
pub async fn read_source(path: &Path) -> Result<Vec<u8>> {
    let bytes = tokio::fs::read(path)
        .await
        .context(format!("Failed to read {}", path.display()))?;
    info!("Read {} bytes from {}", bytes.len(), path.display());
    Ok(bytes)
}

/// Parse an in-memory file with the parser for `format`.
pub fn parse_source(format: SourceFormat, bytes: &[u8]) -> Result<RawTable> {
    debug!("Parsing {} bytes as {}", bytes.len(), format.as_str());
    match format {
        SourceFormat::Csv => parse_csv(bytes),
        SourceFormat::Xlsx => parse_xlsx(bytes),
    }
}
