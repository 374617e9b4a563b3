//! Rendering boundary.
//!
//! The planner never draws anything itself. A [`DashboardRenderer`] receives
//! complete [`DashboardView`]s and user-facing notifications; it owns every
//! drawing resource and must drop the previous frame's resources in
//! [`release`](DashboardRenderer::release) before the next
//! [`render`](DashboardRenderer::render).

mod terminal;

pub use terminal::{JsonRenderer, TerminalRenderer};

use crate::pipeline::DashboardView;

/// Trait for drawing dashboards.
///
/// # Example
///
/// ```rust,ignore
/// use sheetdash::render::DashboardRenderer;
/// use sheetdash::pipeline::DashboardView;
///
/// struct CountingRenderer {
///     frames: usize,
/// }
///
/// impl DashboardRenderer for CountingRenderer {
///     fn release(&mut self) {}
///     fn render(&mut self, _view: &DashboardView) {
///         self.frames += 1;
///     }
///     fn notify(&mut self, message: &str) {
///         eprintln!("{message}");
///     }
/// }
/// ```
pub trait DashboardRenderer {
    /// Drop everything drawn for the previous view.
    fn release(&mut self);

    /// Draw a freshly computed view.
    fn render(&mut self, view: &DashboardView);

    /// Show a one-off message to the user (parse failures, rejected exports).
    fn notify(&mut self, message: &str);
}

/// Renderer that forwards notifications to a closure and ignores frames.
///
/// Useful for hosts that only care about the data, e.g. batch exports.
pub struct ClosureNotifier<F>
where
    F: FnMut(&str),
{
    callback: F,
}

impl<F> ClosureNotifier<F>
where
    F: FnMut(&str),
{
    pub fn new(callback: F) -> Self {
        Self { callback }
    }
}

impl<F> DashboardRenderer for ClosureNotifier<F>
where
    F: FnMut(&str),
{
    fn release(&mut self) {}

    fn render(&mut self, _view: &DashboardView) {}

    fn notify(&mut self, message: &str) {
        (self.callback)(message);
    }
}
