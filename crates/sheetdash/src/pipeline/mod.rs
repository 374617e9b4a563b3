//! Pipeline module.
//!
//! This module provides the interactive dashboard state machine: the
//! session holding loaded and filtered data, the slicer engine and the
//! controller that routes events to a renderer.

pub mod controller;
pub mod session;
pub mod slicers;

pub use controller::{DashboardController, EMPTY_EXPORT_MESSAGE};
pub use session::{DashboardSession, DashboardView};
pub use slicers::{Slicer, SlicerSelection, SlicerSet, NO_FILTERS, SUMMARY_SEPARATOR};
