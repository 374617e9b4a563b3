//! Heuristic dashboard decisions.
//!
//! This module turns a classified dataset into the two halves of a
//! dashboard: headline KPI cards and chart plans with their data computed.
//! Both stages are pure functions of the dataset they are given.

mod chart_planner;
mod kpi_selector;

pub use chart_planner::{ChartPlanner, COUNT_SERIES};
pub use kpi_selector::{aggregate_column, ColumnAggregate, KpiSelector, EMPTY_SAMPLE};
