//! Text and JSON renderers for terminal hosts.
//!
//! Both renderers compose the current frame in memory; `release` drops it
//! and `present` writes whatever frame is current to the output.

use std::fmt::Write as _;
use std::io::{self, Write};

use tracing::{debug, warn};

use super::DashboardRenderer;
use crate::pipeline::DashboardView;
use crate::types::{ChartPlan, KpiCard};
use crate::utils::format_thousands;

/// Default number of preview rows printed by [`TerminalRenderer`].
pub const DEFAULT_TERMINAL_PREVIEW_ROWS: usize = 10;

// ============================================================================
// Plain-text renderer
// ============================================================================

/// Renders dashboards as plain text.
pub struct TerminalRenderer<W: Write> {
    out: W,
    frame: Option<String>,
    preview_rows: usize,
}

impl<W: Write> TerminalRenderer<W> {
    pub fn new(out: W) -> Self {
        Self {
            out,
            frame: None,
            preview_rows: DEFAULT_TERMINAL_PREVIEW_ROWS,
        }
    }

    /// Set how many preview rows are printed.
    pub fn with_preview_rows(mut self, rows: usize) -> Self {
        self.preview_rows = rows;
        self
    }

    /// The composed frame, if one is live.
    pub fn frame(&self) -> Option<&str> {
        self.frame.as_deref()
    }

    /// Write the live frame to the output.
    pub fn present(&mut self) -> io::Result<()> {
        if let Some(frame) = &self.frame {
            self.out.write_all(frame.as_bytes())?;
            self.out.flush()?;
        }
        Ok(())
    }

    pub fn into_inner(self) -> W {
        self.out
    }

    fn compose(&self, view: &DashboardView) -> String {
        let mut text = String::new();
        let source = view.source.as_deref().unwrap_or("dataset");
        let _ = writeln!(
            text,
            "== {source} ({} of {} rows) ==",
            view.filtered_rows, view.total_rows
        );
        let _ = writeln!(text, "Filters: {}", view.filter_summary);

        if !view.slicers.is_empty() {
            let _ = writeln!(text, "\nSlicers");
            for slicer in &view.slicers {
                let _ = writeln!(text, "  {}: {}", slicer.column, slicer.options.join(", "));
            }
        }

        let _ = writeln!(text, "\nKPIs");
        if view.kpis.is_empty() {
            let _ = writeln!(text, "  (none)");
        }
        for card in &view.kpis {
            text.push_str(&kpi_line(card));
        }

        let _ = writeln!(text, "\nCharts");
        if view.charts.is_empty() {
            let _ = writeln!(text, "  (none)");
        }
        for chart in &view.charts {
            text.push_str(&chart_block(chart));
        }

        let preview = &view.preview;
        let shown = preview.rows.len().min(self.preview_rows);
        let _ = writeln!(
            text,
            "\nPreview (first {shown} of {} rows)",
            preview.total_rows
        );
        if !preview.columns.is_empty() {
            let _ = writeln!(text, "  {}", preview.columns.join(" | "));
        }
        for row in preview.rows.iter().take(shown) {
            let _ = writeln!(text, "  {}", row.join(" | "));
        }

        text
    }
}

fn kpi_line(card: &KpiCard) -> String {
    format!("  {}: {} ({})\n", card.label, card.value, card.subtitle())
}

fn chart_block(chart: &ChartPlan) -> String {
    let mut text = format!("  [{}] {}\n", chart.kind.as_str(), chart.title);
    for (i, label) in chart.labels.iter().enumerate() {
        let values: Vec<String> = chart
            .series
            .iter()
            .map(|series| {
                let value = series.values.get(i).copied().unwrap_or(0.0);
                if chart.series.len() > 1 {
                    format!("{}={}", series.name, format_thousands(value))
                } else {
                    format_thousands(value)
                }
            })
            .collect();
        let _ = writeln!(text, "    {label}: {}", values.join(", "));
    }
    text
}

impl<W: Write> DashboardRenderer for TerminalRenderer<W> {
    fn release(&mut self) {
        if self.frame.take().is_some() {
            debug!("Released previous terminal frame");
        }
    }

    fn render(&mut self, view: &DashboardView) {
        if self.frame.is_some() {
            warn!("Rendering over a frame that was not released");
        }
        self.frame = Some(self.compose(view));
    }

    fn notify(&mut self, message: &str) {
        if let Err(e) = writeln!(self.out, "! {message}") {
            warn!("Failed to write notification: {}", e);
        }
    }
}

// ============================================================================
// JSON renderer
// ============================================================================

/// Renders dashboards as a single pretty-printed JSON document.
///
/// Notifications go to stderr so the output stays machine-readable.
pub struct JsonRenderer<W: Write> {
    out: W,
    frame: Option<DashboardView>,
    notices: Vec<String>,
}

impl<W: Write> JsonRenderer<W> {
    pub fn new(out: W) -> Self {
        Self {
            out,
            frame: None,
            notices: Vec::new(),
        }
    }

    pub fn frame(&self) -> Option<&DashboardView> {
        self.frame.as_ref()
    }

    /// Notifications received so far.
    pub fn notices(&self) -> &[String] {
        &self.notices
    }

    /// Write the live frame as JSON.
    pub fn present(&mut self) -> io::Result<()> {
        if let Some(view) = &self.frame {
            serde_json::to_writer_pretty(&mut self.out, view)?;
            writeln!(self.out)?;
            self.out.flush()?;
        }
        Ok(())
    }

    pub fn into_inner(self) -> W {
        self.out
    }
}

impl<W: Write> DashboardRenderer for JsonRenderer<W> {
    fn release(&mut self) {
        self.frame = None;
    }

    fn render(&mut self, view: &DashboardView) {
        self.frame = Some(view.clone());
    }

    fn notify(&mut self, message: &str) {
        eprintln!("{message}");
        self.notices.push(message.to_string());
    }
}
