//! Custom error types for the dashboard planner.
//!
//! This module provides the error hierarchy using `thiserror`. Heuristic
//! stages (classification, KPI selection, chart planning) never fail; errors
//! only come from the edges: parsing a source file, addressing an unknown
//! slicer, exporting, or invalid settings.
//!
//! Errors are serializable so a front end can show them as a single
//! notification.

use serde::Serialize;
use serde::ser::SerializeStruct;
use thiserror::Error;

/// The main error type for the dashboard planner.
#[derive(Error, Debug)]
pub enum DashboardError {
    /// The source file could not be parsed into rows.
    #[error("Failed to parse {format} input: {reason}")]
    ParseFailed { format: String, reason: String },

    /// Column was not found in the dataset (or has no slicer).
    #[error("Column '{0}' not found in dataset")]
    ColumnNotFound(String),

    /// The operation needs at least one record.
    #[error("No data to export")]
    EmptyDataset,

    /// No dataset has been loaded into the session yet.
    #[error("No data loaded")]
    NoDataLoaded,

    /// Invalid configuration provided.
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    /// Writing an export artifact failed.
    #[error("Export failed: {0}")]
    ExportFailed(String),

    /// IO error wrapper.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Polars error wrapper.
    #[error("Polars error: {0}")]
    Polars(#[from] polars::error::PolarsError),

    /// JSON serialization/deserialization error.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Generic error with context.
    #[error("{context}: {source}")]
    WithContext {
        context: String,
        #[source]
        source: Box<DashboardError>,
    },
}

impl DashboardError {
    /// Add context to an error.
    pub fn with_context(self, context: impl Into<String>) -> Self {
        DashboardError::WithContext {
            context: context.into(),
            source: Box::new(self),
        }
    }

    /// Shorthand for a parse failure.
    pub fn parse_failed(format: impl Into<String>, reason: impl ToString) -> Self {
        DashboardError::ParseFailed {
            format: format.into(),
            reason: reason.to_string(),
        }
    }

    /// Get error code for front-end handling.
    pub fn error_code(&self) -> &'static str {
        match self {
            Self::ParseFailed { .. } => "PARSE_FAILED",
            Self::ColumnNotFound(_) => "COLUMN_NOT_FOUND",
            Self::EmptyDataset => "EMPTY_DATASET",
            Self::NoDataLoaded => "NO_DATA_LOADED",
            Self::InvalidConfig(_) => "INVALID_CONFIG",
            Self::ExportFailed(_) => "EXPORT_FAILED",
            Self::Io(_) => "IO_ERROR",
            Self::Polars(_) => "POLARS_ERROR",
            Self::Json(_) => "JSON_ERROR",
            Self::WithContext { source, .. } => source.error_code(),
        }
    }

    /// True when the failure leaves the session usable and only needs to be
    /// reported to the user.
    pub fn is_recoverable(&self) -> bool {
        match self {
            Self::ParseFailed { .. }
            | Self::EmptyDataset
            | Self::NoDataLoaded
            | Self::ColumnNotFound(_) => true,
            Self::WithContext { source, .. } => source.is_recoverable(),
            _ => false,
        }
    }
}

/// Errors are serialized as a struct with `code` and `message` fields.
impl Serialize for DashboardError {
    fn serialize<S>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        let mut state = serializer.serialize_struct("DashboardError", 2)?;
        state.serialize_field("code", &self.error_code())?;
        state.serialize_field("message", &self.to_string())?;
        state.end()
    }
}

/// Result type alias for dashboard operations.
pub type Result<T> = std::result::Result<T, DashboardError>;

/// Extension trait for adding context to Results.
pub trait ResultExt<T> {
    /// Add context to an error result.
    fn context(self, context: impl Into<String>) -> Result<T>;
}

impl<T> ResultExt<T> for Result<T> {
    fn context(self, context: impl Into<String>) -> Result<T> {
        self.map_err(|e| e.with_context(context))
    }
}

impl<T> ResultExt<T> for std::result::Result<T, polars::error::PolarsError> {
    fn context(self, context: impl Into<String>) -> Result<T> {
        self.map_err(|e| DashboardError::Polars(e).with_context(context))
    }
}

impl<T> ResultExt<T> for std::result::Result<T, std::io::Error> {
    fn context(self, context: impl Into<String>) -> Result<T> {
        self.map_err(|e| DashboardError::Io(e).with_context(context))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_code() {
        assert_eq!(DashboardError::EmptyDataset.error_code(), "EMPTY_DATASET");
        assert_eq!(
            DashboardError::ColumnNotFound("Region".to_string()).error_code(),
            "COLUMN_NOT_FOUND"
        );
        assert_eq!(
            DashboardError::parse_failed("csv", "bad quote").error_code(),
            "PARSE_FAILED"
        );
    }

    #[test]
    fn test_is_recoverable() {
        assert!(DashboardError::EmptyDataset.is_recoverable());
        assert!(DashboardError::parse_failed("xlsx", "zip").is_recoverable());
        assert!(!DashboardError::ExportFailed("disk".to_string()).is_recoverable());
    }

    #[test]
    fn test_error_serialization() {
        let error = DashboardError::ColumnNotFound("Region".to_string());
        let json = serde_json::to_string(&error).unwrap();
        assert!(json.contains("COLUMN_NOT_FOUND"));
        assert!(json.contains("Region"));
    }

    #[test]
    fn test_polars_error_context() {
        let result: std::result::Result<(), polars::error::PolarsError> = Err(
            polars::error::PolarsError::ComputeError("row out of bounds".into()),
        );

        let error = result.context("Failed to read csv rows").unwrap_err();

        assert_eq!(error.error_code(), "POLARS_ERROR");
        assert!(!error.is_recoverable());
        assert!(error.to_string().starts_with("Failed to read csv rows"));
    }

    #[test]
    fn test_with_context() {
        let error = DashboardError::EmptyDataset.with_context("While exporting");
        assert!(error.to_string().contains("While exporting"));
        assert_eq!(error.error_code(), "EMPTY_DATASET");
        assert!(error.is_recoverable());
    }
}
