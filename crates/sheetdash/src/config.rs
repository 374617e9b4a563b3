//! Configuration types for the dashboard planner.
//!
//! The heuristics themselves (keyword tables, regexes) live next to the code
//! that uses them; this module only carries the tunable limits of the layout
//! and export, using the builder pattern.

use serde::{Deserialize, Serialize};

/// Layout and export limits for a dashboard.
///
/// Use [`AnalysisConfig::builder()`] to create a new configuration
/// with fluent API.
///
/// # Example
///
/// ```rust,ignore
/// use sheetdash::config::AnalysisConfig;
///
/// let config = AnalysisConfig::builder()
///     .kpi_slots(6)
///     .currency_symbol("€")
///     .build()?;
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AnalysisConfig {
    /// Number of KPI cards the backfill stage tries to reach.
    /// Default: 4
    pub kpi_slots: usize,

    /// Number of columns shown as raw sample cards when no KPI applies.
    /// Default: 3
    pub fallback_kpi_count: usize,

    /// Maximum number of time-series (line) plans.
    /// Default: 3
    pub max_time_series: usize,

    /// Maximum number of bar plans.
    /// Default: 4
    pub max_bar_charts: usize,

    /// Maximum number of donut plans when numeric columns exist.
    /// Default: 3
    pub max_donut_charts: usize,

    /// Maximum number of top-N table plans.
    /// Default: 2
    pub max_table_charts: usize,

    /// Rows kept in a top-N table.
    /// Default: 10
    pub top_n: usize,

    /// Rows shown by the per-row bar fallback when no categorical column exists.
    /// Default: 20
    pub row_fallback_limit: usize,

    /// Distinct sample values captured per column in the exported config.
    /// Default: 10
    pub sample_distinct_limit: usize,

    /// Rows kept in the table preview.
    /// Default: 100
    pub preview_rows: usize,

    /// Prefix for monetary KPI values.
    /// Default: "$"
    pub currency_symbol: String,

    /// Table name referenced by the generated DAX measures.
    /// Default: "Data"
    pub model_table_name: String,
}

impl Default for AnalysisConfig {
    fn default() -> Self {
        Self {
            kpi_slots: 4,
            fallback_kpi_count: 3,
            max_time_series: 3,
            max_bar_charts: 4,
            max_donut_charts: 3,
            max_table_charts: 2,
            top_n: 10,
            row_fallback_limit: 20,
            sample_distinct_limit: 10,
            preview_rows: 100,
            currency_symbol: "$".to_string(),
            model_table_name: "Data".to_string(),
        }
    }
}

impl AnalysisConfig {
    /// Create a new configuration builder.
    pub fn builder() -> AnalysisConfigBuilder {
        AnalysisConfigBuilder::default()
    }

    /// Validate the configuration and return errors if invalid.
    pub fn validate(&self) -> Result<(), ConfigValidationError> {
        let limits = [
            ("kpi_slots", self.kpi_slots),
            ("fallback_kpi_count", self.fallback_kpi_count),
            ("max_time_series", self.max_time_series),
            ("max_bar_charts", self.max_bar_charts),
            ("max_donut_charts", self.max_donut_charts),
            ("max_table_charts", self.max_table_charts),
            ("top_n", self.top_n),
            ("row_fallback_limit", self.row_fallback_limit),
            ("sample_distinct_limit", self.sample_distinct_limit),
            ("preview_rows", self.preview_rows),
        ];

        if let Some((field, _)) = limits.iter().find(|(_, value)| *value == 0) {
            return Err(ConfigValidationError::ZeroLimit(field.to_string()));
        }

        if self.currency_symbol.trim().is_empty() {
            return Err(ConfigValidationError::EmptyValue(
                "currency_symbol".to_string(),
            ));
        }

        if self.model_table_name.trim().is_empty() {
            return Err(ConfigValidationError::EmptyValue(
                "model_table_name".to_string(),
            ));
        }

        Ok(())
    }
}

/// Errors that can occur during configuration validation.
#[derive(Debug, thiserror::Error)]
pub enum ConfigValidationError {
    #[error("Invalid limit for '{0}': must be at least 1")]
    ZeroLimit(String),

    #[error("Invalid value for '{0}': must not be empty")]
    EmptyValue(String),
}

impl From<ConfigValidationError> for crate::error::DashboardError {
    fn from(err: ConfigValidationError) -> Self {
        crate::error::DashboardError::InvalidConfig(err.to_string())
    }
}

/// Builder for [`AnalysisConfig`] with fluent API.
#[derive(Debug, Default)]
pub struct AnalysisConfigBuilder {
    kpi_slots: Option<usize>,
    fallback_kpi_count: Option<usize>,
    max_time_series: Option<usize>,
    max_bar_charts: Option<usize>,
    max_donut_charts: Option<usize>,
    max_table_charts: Option<usize>,
    top_n: Option<usize>,
    row_fallback_limit: Option<usize>,
    sample_distinct_limit: Option<usize>,
    preview_rows: Option<usize>,
    currency_symbol: Option<String>,
    model_table_name: Option<String>,
}

impl AnalysisConfigBuilder {
    /// Set the number of KPI cards the backfill stage aims for.
    pub fn kpi_slots(mut self, slots: usize) -> Self {
        self.kpi_slots = Some(slots);
        self
    }

    /// Set how many raw sample cards the last-resort fallback shows.
    pub fn fallback_kpi_count(mut self, count: usize) -> Self {
        self.fallback_kpi_count = Some(count);
        self
    }

    /// Set the maximum number of time-series plans.
    pub fn max_time_series(mut self, max: usize) -> Self {
        self.max_time_series = Some(max);
        self
    }

    /// Set the maximum number of bar plans.
    pub fn max_bar_charts(mut self, max: usize) -> Self {
        self.max_bar_charts = Some(max);
        self
    }

    /// Set the maximum number of donut plans.
    pub fn max_donut_charts(mut self, max: usize) -> Self {
        self.max_donut_charts = Some(max);
        self
    }

    /// Set the maximum number of top-N table plans.
    pub fn max_table_charts(mut self, max: usize) -> Self {
        self.max_table_charts = Some(max);
        self
    }

    /// Set the number of rows kept in each top-N table.
    pub fn top_n(mut self, n: usize) -> Self {
        self.top_n = Some(n);
        self
    }

    /// Set the row limit of the per-row bar fallback.
    pub fn row_fallback_limit(mut self, limit: usize) -> Self {
        self.row_fallback_limit = Some(limit);
        self
    }

    /// Set the number of distinct sample values kept per exported column.
    pub fn sample_distinct_limit(mut self, limit: usize) -> Self {
        self.sample_distinct_limit = Some(limit);
        self
    }

    /// Set the number of rows kept in the table preview.
    pub fn preview_rows(mut self, rows: usize) -> Self {
        self.preview_rows = Some(rows);
        self
    }

    /// Set the currency prefix used for monetary KPI values.
    pub fn currency_symbol(mut self, symbol: impl Into<String>) -> Self {
        self.currency_symbol = Some(symbol.into());
        self
    }

    /// Set the table name referenced by generated DAX.
    pub fn model_table_name(mut self, name: impl Into<String>) -> Self {
        self.model_table_name = Some(name.into());
        self
    }

    /// Build the configuration.
    ///
    /// Returns a validated `AnalysisConfig` or an error if validation fails.
    pub fn build(self) -> Result<AnalysisConfig, ConfigValidationError> {
        let defaults = AnalysisConfig::default();
        let config = AnalysisConfig {
            kpi_slots: self.kpi_slots.unwrap_or(defaults.kpi_slots),
            fallback_kpi_count: self
                .fallback_kpi_count
                .unwrap_or(defaults.fallback_kpi_count),
            max_time_series: self.max_time_series.unwrap_or(defaults.max_time_series),
            max_bar_charts: self.max_bar_charts.unwrap_or(defaults.max_bar_charts),
            max_donut_charts: self.max_donut_charts.unwrap_or(defaults.max_donut_charts),
            max_table_charts: self.max_table_charts.unwrap_or(defaults.max_table_charts),
            top_n: self.top_n.unwrap_or(defaults.top_n),
            row_fallback_limit: self
                .row_fallback_limit
                .unwrap_or(defaults.row_fallback_limit),
            sample_distinct_limit: self
                .sample_distinct_limit
                .unwrap_or(defaults.sample_distinct_limit),
            preview_rows: self.preview_rows.unwrap_or(defaults.preview_rows),
            currency_symbol: self.currency_symbol.unwrap_or(defaults.currency_symbol),
            model_table_name: self.model_table_name.unwrap_or(defaults.model_table_name),
        };

        config.validate()?;
        Ok(config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = AnalysisConfig::default();
        assert_eq!(config.kpi_slots, 4);
        assert_eq!(config.fallback_kpi_count, 3);
        assert_eq!(config.max_time_series, 3);
        assert_eq!(config.max_bar_charts, 4);
        assert_eq!(config.top_n, 10);
        assert_eq!(config.currency_symbol, "$");
        assert_eq!(config.model_table_name, "Data");
    }

    #[test]
    fn test_builder_defaults() {
        let config = AnalysisConfig::builder().build().unwrap();
        assert_eq!(config, AnalysisConfig::default());
    }

    #[test]
    fn test_builder_custom_values() {
        let config = AnalysisConfig::builder()
            .kpi_slots(6)
            .top_n(5)
            .currency_symbol("€")
            .model_table_name("Sales")
            .build()
            .unwrap();

        assert_eq!(config.kpi_slots, 6);
        assert_eq!(config.top_n, 5);
        assert_eq!(config.currency_symbol, "€");
        assert_eq!(config.model_table_name, "Sales");
    }

    #[test]
    fn test_validation_zero_limit() {
        let result = AnalysisConfig::builder().top_n(0).build();

        assert!(matches!(
            result.unwrap_err(),
            ConfigValidationError::ZeroLimit(field) if field == "top_n"
        ));
    }

    #[test]
    fn test_validation_empty_currency() {
        let result = AnalysisConfig::builder().currency_symbol("  ").build();
        assert!(matches!(
            result.unwrap_err(),
            ConfigValidationError::EmptyValue(_)
        ));
    }

    #[test]
    fn test_config_from_partial_json() {
        let json = r#"{ "kpi_slots": 5, "currency_symbol": "£" }"#;
        let config: AnalysisConfig = serde_json::from_str(json).unwrap();

        assert_eq!(config.kpi_slots, 5);
        assert_eq!(config.currency_symbol, "£");
        assert_eq!(config.max_bar_charts, 4);
        assert!(config.validate().is_ok());
    }
}
