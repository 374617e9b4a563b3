//! Dashboard controller.
//!
//! The controller is the single event handler of a dashboard: it owns the
//! [`DashboardSession`] and a [`DashboardRenderer`], turns user events (file
//! loaded, slicer changed, export requested) into session updates and
//! re-renders after every successful change. Failures are reported once
//! through the renderer and leave the session untouched.

use std::path::{Path, PathBuf};

use tracing::{error, info, warn};

use crate::cleaner::Normalizer;
use crate::config::AnalysisConfig;
use crate::error::{DashboardError, Result};
use crate::io::{parse_source, read_source, SourceFormat};
use crate::pipeline::session::{DashboardSession, DashboardView};
use crate::pipeline::slicers::SlicerSelection;
use crate::render::DashboardRenderer;
use crate::reporting::{DashboardExport, ExportedFiles};

/// Message shown when an export is attempted on an empty working dataset.
pub const EMPTY_EXPORT_MESSAGE: &str = "No data to export.";

/// Event handler tying a session to a renderer.
pub struct DashboardController<R: DashboardRenderer> {
    session: DashboardSession,
    renderer: R,
}

impl<R: DashboardRenderer> DashboardController<R> {
    pub fn new(config: AnalysisConfig, renderer: R) -> Self {
        Self {
            session: DashboardSession::new(config),
            renderer,
        }
    }

    pub fn session(&self) -> &DashboardSession {
        &self.session
    }

    pub fn renderer(&self) -> &R {
        &self.renderer
    }

    pub fn renderer_mut(&mut self) -> &mut R {
        &mut self.renderer
    }

    pub fn into_renderer(self) -> R {
        self.renderer
    }

    /// Read a file and load it. The read is the only suspension point; all
    /// parsing and planning happens after the whole buffer is available.
    pub async fn open(&mut self, path: &Path) -> Result<()> {
        let bytes = match read_source(path).await {
            Ok(bytes) => bytes,
            Err(e) => return Err(self.report(e)),
        };
        let name = path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| path.display().to_string());
        self.load_bytes(&name, &bytes)
    }

    /// Parse and load an in-memory file. The format is chosen from `name`.
    ///
    /// On a parse failure the renderer is notified once and the previously
    /// loaded data stays in place.
    pub fn load_bytes(&mut self, name: &str, bytes: &[u8]) -> Result<()> {
        let format = SourceFormat::from_path(Path::new(name));
        let raw = match parse_source(format, bytes) {
            Ok(raw) => raw,
            Err(e) => return Err(self.report(e)),
        };

        self.session
            .load(Some(name.to_string()), Normalizer::normalize(raw));
        self.refresh();
        Ok(())
    }

    /// Change one slicer and re-render.
    pub fn select(&mut self, column: &str, selection: SlicerSelection) -> Result<()> {
        if let Err(e) = self.session.select(column, selection) {
            return Err(self.report(e));
        }
        self.refresh();
        Ok(())
    }

    /// Apply several slicer changes and re-render once.
    ///
    /// Stops at the first unknown column; earlier changes stay applied and
    /// are rendered.
    pub fn select_all<I, S>(&mut self, selections: I) -> Result<()>
    where
        I: IntoIterator<Item = (S, SlicerSelection)>,
        S: AsRef<str>,
    {
        let mut outcome = Ok(());
        for (column, selection) in selections {
            if let Err(e) = self.session.select(column.as_ref(), selection) {
                outcome = Err(self.report(e));
                break;
            }
        }
        if self.session.is_loaded() {
            self.refresh();
        }
        outcome
    }

    /// Clear all slicers and re-render.
    pub fn reset_filters(&mut self) -> Result<()> {
        if let Err(e) = self.session.reset_filters() {
            return Err(self.report(e));
        }
        self.refresh();
        Ok(())
    }

    /// Release the previous frame and render the current view.
    pub fn refresh(&mut self) -> DashboardView {
        let view = self.session.view();
        self.renderer.release();
        self.renderer.render(&view);
        view
    }

    /// Snapshot the working dataset as a dashboard config.
    pub fn export_config(&mut self) -> Result<DashboardExport> {
        self.session.export_config().map_err(|e| self.report(e))
    }

    /// Write the export package (workbook, config, instructions) to `dir`.
    pub fn export_to(&mut self, dir: impl Into<PathBuf>) -> Result<ExportedFiles> {
        let dir = dir.into();
        let package = self.session.export_package().map_err(|e| self.report(e))?;
        let files = package.write_to(&dir).map_err(|e| self.report(e))?;
        info!("Exported dashboard package to {}", dir.display());
        Ok(files)
    }

    /// Notify the user about a failed operation and hand the error back.
    fn report(&mut self, error: DashboardError) -> DashboardError {
        if error.is_recoverable() {
            warn!("Operation failed: {}", error);
        } else {
            error!("Operation failed: {}", error);
        }
        let message = match &error {
            DashboardError::EmptyDataset => EMPTY_EXPORT_MESSAGE.to_string(),
            other => other.to_string(),
        };
        self.renderer.notify(&message);
        error
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pipeline::DashboardView;
    use pretty_assertions::assert_eq;

    #[derive(Default)]
    struct RecordingRenderer {
        events: Vec<String>,
        last: Option<DashboardView>,
    }

    impl DashboardRenderer for RecordingRenderer {
        fn release(&mut self) {
            self.events.push("release".to_string());
            self.last = None;
        }

        fn render(&mut self, view: &DashboardView) {
            self.events.push(format!("render {}", view.filtered_rows));
            self.last = Some(view.clone());
        }

        fn notify(&mut self, message: &str) {
            self.events.push(format!("notify {message}"));
        }
    }

    const SALES_CSV: &[u8] = b"Region,Sales\nEast,\"1,200\"\nWest,800\nEast,300\n";

    fn controller() -> DashboardController<RecordingRenderer> {
        DashboardController::new(AnalysisConfig::default(), RecordingRenderer::default())
    }

    #[test]
    fn test_load_releases_then_renders() {
        let mut controller = controller();
        controller.load_bytes("sales.csv", SALES_CSV).unwrap();

        assert_eq!(controller.renderer().events, vec!["release", "render 3"]);
        let view = controller.renderer().last.as_ref().unwrap();
        assert_eq!(view.charts[0].title, "Sales by Region");
        assert_eq!(view.charts[0].series[0].values, vec![1500.0, 800.0]);
    }

    #[test]
    fn test_parse_failure_keeps_previous_state() {
        let mut controller = controller();
        controller.load_bytes("sales.csv", SALES_CSV).unwrap();

        let err = controller.load_bytes("broken.xlsx", b"not a workbook").unwrap_err();

        assert!(matches!(err, DashboardError::ParseFailed { .. }));
        assert_eq!(controller.session().filtered().len(), 3);
        assert_eq!(controller.session().source(), Some("sales.csv"));
        let events = &controller.renderer().events;
        assert_eq!(events.len(), 3);
        assert!(events[2].starts_with("notify "));
    }

    #[test]
    fn test_select_renders_filtered_view() {
        let mut controller = controller();
        controller.load_bytes("sales.csv", SALES_CSV).unwrap();
        controller
            .select("Region", SlicerSelection::value("West"))
            .unwrap();

        let view = controller.renderer().last.as_ref().unwrap();
        assert_eq!(view.filtered_rows, 1);
        assert_eq!(view.filter_summary, "Region: West");
    }

    #[test]
    fn test_select_all_renders_once() {
        let mut controller = controller();
        controller.load_bytes("sales.csv", SALES_CSV).unwrap();
        controller
            .select_all([("Region", SlicerSelection::value("East"))])
            .unwrap();

        assert_eq!(
            controller.renderer().events,
            vec!["release", "render 3", "release", "render 2"]
        );
    }

    #[test]
    fn test_export_on_empty_dataset_notifies() {
        let mut controller = controller();
        controller.load_bytes("sales.csv", SALES_CSV).unwrap();
        controller
            .select("Region", SlicerSelection::value("Nowhere"))
            .unwrap();

        let err = controller.export_config().unwrap_err();

        assert!(matches!(err, DashboardError::EmptyDataset));
        assert_eq!(
            controller.renderer().events.last().map(String::as_str),
            Some("notify No data to export.")
        );
    }

    #[test]
    fn test_select_before_load_notifies() {
        let mut controller = controller();
        let err = controller
            .select("Region", SlicerSelection::All)
            .unwrap_err();
        assert!(matches!(err, DashboardError::NoDataLoaded));
        assert_eq!(controller.renderer().events.len(), 1);
    }
}
