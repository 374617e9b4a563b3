//! Dashboard session state.
//!
//! A session owns the loaded dataset, the working (filtered) dataset and the
//! slicers. Every change replaces derived state wholesale; views are
//! recomputed from scratch on request.

use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::config::AnalysisConfig;
use crate::decisions::{ChartPlanner, KpiSelector};
use crate::error::{DashboardError, Result};
use crate::pipeline::slicers::{Slicer, SlicerSelection, SlicerSet};
use crate::profiler::ColumnClassifier;
use crate::reporting::{ConfigExporter, DashboardExport, ExportPackage};
use crate::types::{ChartPlan, ColumnClassification, Dataset, KpiCard, TablePreview};

/// Everything a renderer needs to draw one frame of the dashboard.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DashboardView {
    /// Name of the loaded source, if known.
    pub source: Option<String>,
    /// Records in the loaded dataset.
    pub total_rows: usize,
    /// Records in the working dataset.
    pub filtered_rows: usize,
    pub classification: ColumnClassification,
    pub slicers: Vec<Slicer>,
    pub filter_summary: String,
    pub kpis: Vec<KpiCard>,
    pub charts: Vec<ChartPlan>,
    pub preview: TablePreview,
}

/// Loaded data plus the slicer state over it.
#[derive(Debug, Clone)]
pub struct DashboardSession {
    config: AnalysisConfig,
    source: Option<String>,
    raw: Option<Dataset>,
    filtered: Dataset,
    slicers: SlicerSet,
}

impl DashboardSession {
    pub fn new(config: AnalysisConfig) -> Self {
        Self {
            config,
            source: None,
            raw: None,
            filtered: Dataset::empty(),
            slicers: SlicerSet::default(),
        }
    }

    pub fn config(&self) -> &AnalysisConfig {
        &self.config
    }

    pub fn is_loaded(&self) -> bool {
        self.raw.is_some()
    }

    pub fn source(&self) -> Option<&str> {
        self.source.as_deref()
    }

    /// The loaded dataset, if any.
    pub fn raw(&self) -> Option<&Dataset> {
        self.raw.as_ref()
    }

    /// The working dataset: the loaded one narrowed by the slicers.
    pub fn filtered(&self) -> &Dataset {
        &self.filtered
    }

    pub fn slicers(&self) -> &SlicerSet {
        &self.slicers
    }

    /// Replace the session's data. Slicers are rebuilt and reset.
    pub fn load(&mut self, source: Option<String>, dataset: Dataset) {
        let classification = ColumnClassifier::classify(&dataset);
        self.slicers = SlicerSet::from_dataset(&dataset, &classification);
        self.filtered = dataset.clone();
        self.raw = Some(dataset);

        info!(
            "Loaded {} rows x {} columns{}",
            self.filtered.len(),
            self.filtered.columns().len(),
            source.as_deref().map(|s| format!(" from {s}")).unwrap_or_default()
        );
        self.source = source;
    }

    /// Change one slicer and recompute the working dataset.
    pub fn select(&mut self, column: &str, selection: SlicerSelection) -> Result<()> {
        let raw = self.raw.as_ref().ok_or(DashboardError::NoDataLoaded)?;
        self.slicers.select(column, selection)?;
        self.filtered = self.slicers.apply(raw);
        debug!(
            "Filter '{}' leaves {} of {} rows",
            self.slicers.summary(),
            self.filtered.len(),
            raw.len()
        );
        Ok(())
    }

    /// Clear every slicer.
    pub fn reset_filters(&mut self) -> Result<()> {
        let raw = self.raw.as_ref().ok_or(DashboardError::NoDataLoaded)?;
        self.slicers.reset();
        self.filtered = raw.clone();
        Ok(())
    }

    /// Recompute classification, KPI cards, chart plans and the preview for
    /// the working dataset.
    pub fn view(&self) -> DashboardView {
        let dataset = &self.filtered;
        let classification = ColumnClassifier::classify(dataset);
        let kpis = KpiSelector::new(self.config.clone()).select(dataset, &classification);
        let charts = ChartPlanner::new(self.config.clone()).plan(dataset, &classification);

        DashboardView {
            source: self.source.clone(),
            total_rows: self.raw.as_ref().map_or(0, Dataset::len),
            filtered_rows: dataset.len(),
            classification,
            slicers: self.slicers.slicers().to_vec(),
            filter_summary: self.slicers.summary(),
            kpis,
            charts,
            preview: TablePreview::from_dataset(dataset, self.config.preview_rows),
        }
    }

    /// Snapshot the working dataset as a portable dashboard config.
    pub fn export_config(&self) -> Result<DashboardExport> {
        self.ensure_exportable()?;
        ConfigExporter::new(self.config.clone()).build(&self.filtered)
    }

    /// Dataset workbook plus dashboard config for the working dataset.
    pub fn export_package(&self) -> Result<ExportPackage> {
        self.ensure_exportable()?;
        ExportPackage::build(&self.filtered, &self.config)
    }

    fn ensure_exportable(&self) -> Result<()> {
        if !self.is_loaded() {
            return Err(DashboardError::NoDataLoaded);
        }
        if self.filtered.is_empty() {
            return Err(DashboardError::EmptyDataset);
        }
        Ok(())
    }
}

impl Default for DashboardSession {
    fn default() -> Self {
        Self::new(AnalysisConfig::default())
    }
}

static_assertions::assert_impl_all!(DashboardSession: Send, Sync);
static_assertions::assert_impl_all!(DashboardView: Send, Sync);

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{Cell, ChartKind, Record};
    use pretty_assertions::assert_eq;

    fn regional_sales() -> Dataset {
        Dataset::new(
            vec!["Region".to_string(), "Sales".to_string()],
            vec![
                Record::new(vec![Cell::text("East"), Cell::Number(1200.0)]),
                Record::new(vec![Cell::text("West"), Cell::Number(800.0)]),
                Record::new(vec![Cell::text("East"), Cell::Number(300.0)]),
            ],
        )
    }

    fn loaded() -> DashboardSession {
        let mut session = DashboardSession::default();
        session.load(Some("sales.csv".to_string()), regional_sales());
        session
    }

    #[test]
    fn test_new_session_is_empty() {
        let session = DashboardSession::default();
        assert!(!session.is_loaded());
        let view = session.view();
        assert!(view.kpis.is_empty());
        assert!(view.charts.is_empty());
        assert_eq!(view.filter_summary, "No filters");
    }

    #[test]
    fn test_select_requires_loaded_data() {
        let mut session = DashboardSession::default();
        let err = session.select("Region", SlicerSelection::All).unwrap_err();
        assert!(matches!(err, DashboardError::NoDataLoaded));
    }

    #[test]
    fn test_view_after_load() {
        let view = loaded().view();

        assert_eq!(view.source.as_deref(), Some("sales.csv"));
        assert_eq!(view.total_rows, 3);
        assert_eq!(view.filtered_rows, 3);
        assert_eq!(view.kpis[0].label, "Total Sales");
        assert_eq!(view.kpis[0].value, "2,300");
        assert_eq!(view.kpis.len(), 2);
        assert_eq!(view.kpis[1].label, "Sales");
        assert_eq!(view.charts[0].kind, ChartKind::Bar);
        assert_eq!(view.preview.rows.len(), 3);
    }

    #[test]
    fn test_select_recomputes_view() {
        let mut session = loaded();
        session
            .select("Region", SlicerSelection::value("East"))
            .unwrap();

        let view = session.view();

        assert_eq!(view.filtered_rows, 2);
        assert_eq!(view.total_rows, 3);
        assert_eq!(view.kpis[0].value, "1,500");
        assert_eq!(view.filter_summary, "Region: East");
    }

    #[test]
    fn test_load_resets_slicers() {
        let mut session = loaded();
        session
            .select("Region", SlicerSelection::value("West"))
            .unwrap();
        session.load(None, regional_sales());

        assert_eq!(session.filtered().len(), 3);
        assert_eq!(session.slicers().selection("Region"), Some(&SlicerSelection::All));
    }

    #[test]
    fn test_export_rejects_empty_working_set() {
        let mut session = loaded();
        session
            .select("Region", SlicerSelection::value("Nowhere"))
            .unwrap();

        let err = session.export_config().unwrap_err();
        assert!(matches!(err, DashboardError::EmptyDataset));

        session.reset_filters().unwrap();
        let export = session.export_config().unwrap();
        assert_eq!(export.row_count, 3);
    }
}
