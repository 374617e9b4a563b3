//! Slicer (filter) engine.
//!
//! One slicer exists per categorical column of the loaded dataset. Each is
//! either unconstrained or pinned to one stringified value; the working
//! dataset is the order-preserving subsequence of the loaded one that
//! satisfies every pinned slicer.

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::error::{DashboardError, Result};
use crate::profiler::statistics::distinct_labels;
use crate::types::{ColumnClassification, Dataset};

/// Separator between active constraints in the summary line.
pub const SUMMARY_SEPARATOR: &str = " • ";

/// Summary shown when no slicer is pinned.
pub const NO_FILTERS: &str = "No filters";

/// Constraint held by one slicer.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case", tag = "mode", content = "value")]
pub enum SlicerSelection {
    #[default]
    All,
    Value(String),
}

impl SlicerSelection {
    pub fn value(value: impl Into<String>) -> Self {
        Self::Value(value.into())
    }

    pub fn is_active(&self) -> bool {
        matches!(self, Self::Value(_))
    }
}

/// A filter slot on one categorical column.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Slicer {
    pub column: String,
    /// Distinct non-blank values, sorted case-insensitively.
    pub options: Vec<String>,
    pub selection: SlicerSelection,
}

/// The full set of slicers for a loaded dataset.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct SlicerSet {
    slicers: Vec<Slicer>,
}

impl SlicerSet {
    /// One unconstrained slicer per categorical column of `raw`.
    pub fn from_dataset(raw: &Dataset, classification: &ColumnClassification) -> Self {
        let slicers = classification
            .categorical
            .iter()
            .map(|column| {
                let mut options = distinct_labels(raw, column);
                options.sort_by_cached_key(|option| option.to_lowercase());
                Slicer {
                    column: column.clone(),
                    options,
                    selection: SlicerSelection::All,
                }
            })
            .collect();

        Self { slicers }
    }

    pub fn slicers(&self) -> &[Slicer] {
        &self.slicers
    }

    pub fn is_empty(&self) -> bool {
        self.slicers.is_empty()
    }

    /// Current selection of a column's slicer.
    pub fn selection(&self, column: &str) -> Option<&SlicerSelection> {
        self.slicers
            .iter()
            .find(|s| s.column == column)
            .map(|s| &s.selection)
    }

    /// Change one slicer's constraint.
    ///
    /// # Errors
    ///
    /// Returns [`DashboardError::ColumnNotFound`] when no slicer exists for
    /// the column.
    pub fn select(&mut self, column: &str, selection: SlicerSelection) -> Result<()> {
        let slicer = self
            .slicers
            .iter_mut()
            .find(|s| s.column == column)
            .ok_or_else(|| DashboardError::ColumnNotFound(column.to_string()))?;

        debug!("Slicer '{}' set to {:?}", column, selection);
        slicer.selection = selection;
        Ok(())
    }

    /// Return every slicer to unconstrained.
    pub fn reset(&mut self) {
        for slicer in &mut self.slicers {
            slicer.selection = SlicerSelection::All;
        }
    }

    /// Active constraints as `(column, value)` pairs, in slicer order.
    pub fn active(&self) -> Vec<(&str, &str)> {
        self.slicers
            .iter()
            .filter_map(|s| match &s.selection {
                SlicerSelection::Value(v) => Some((s.column.as_str(), v.as_str())),
                SlicerSelection::All => None,
            })
            .collect()
    }

    /// Records of `raw` whose cells stringify to every active value.
    ///
    /// With no active constraint this is a full copy of `raw`.
    pub fn apply(&self, raw: &Dataset) -> Dataset {
        let constraints: Vec<(Option<usize>, &str)> = self
            .active()
            .into_iter()
            .map(|(column, value)| (raw.column_index(column), value))
            .collect();

        if constraints.is_empty() {
            return raw.clone();
        }

        raw.filter(|record| {
            constraints.iter().all(|(index, value)| match index {
                Some(i) => record.get(*i).stringify() == *value,
                None => false,
            })
        })
    }

    /// Human-readable list of the active constraints.
    pub fn summary(&self) -> String {
        let active = self.active();
        if active.is_empty() {
            return NO_FILTERS.to_string();
        }
        active
            .iter()
            .map(|(column, value)| format!("{column}: {value}"))
            .collect::<Vec<_>>()
            .join(SUMMARY_SEPARATOR)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::profiler::ColumnClassifier;
    use crate::types::{Cell, Record};
    use pretty_assertions::assert_eq;

    fn orders() -> Dataset {
        Dataset::new(
            vec!["Region".to_string(), "Channel".to_string(), "Sales".to_string()],
            vec![
                Record::new(vec![Cell::text("East"), Cell::text("web"), Cell::Number(10.0)]),
                Record::new(vec![Cell::text("west"), Cell::text("Store"), Cell::Number(20.0)]),
                Record::new(vec![Cell::text("East"), Cell::text("Store"), Cell::Number(30.0)]),
                Record::new(vec![Cell::text("North"), Cell::Empty, Cell::Number(40.0)]),
            ],
        )
    }

    fn slicers(data: &Dataset) -> SlicerSet {
        SlicerSet::from_dataset(data, &ColumnClassifier::classify(data))
    }

    #[test]
    fn test_one_slicer_per_categorical_column() {
        let set = slicers(&orders());

        let columns: Vec<_> = set.slicers().iter().map(|s| s.column.as_str()).collect();
        assert_eq!(columns, vec!["Region", "Channel"]);
        assert_eq!(set.slicers()[0].options, vec!["East", "North", "west"]);
        assert_eq!(set.slicers()[1].options, vec!["Store", "web"]);
        assert!(set.slicers().iter().all(|s| s.selection == SlicerSelection::All));
    }

    #[test]
    fn test_apply_without_constraints_copies_everything() {
        let data = orders();
        let set = slicers(&data);
        assert_eq!(set.apply(&data), data);
        assert_eq!(set.summary(), NO_FILTERS);
    }

    #[test]
    fn test_apply_is_sound_complete_and_ordered() {
        let data = orders();
        let mut set = slicers(&data);
        set.select("Region", SlicerSelection::value("East")).unwrap();

        let filtered = set.apply(&data);

        let sales: Vec<_> = filtered.column_values("Sales").cloned().collect();
        assert_eq!(sales, vec![Cell::Number(10.0), Cell::Number(30.0)]);

        set.select("Channel", SlicerSelection::value("Store")).unwrap();
        let filtered = set.apply(&data);
        assert_eq!(filtered.len(), 1);
        assert_eq!(filtered.records()[0].get(2), &Cell::Number(30.0));
        assert_eq!(set.summary(), "Region: East • Channel: Store");
    }

    #[test]
    fn test_select_unknown_column() {
        let mut set = slicers(&orders());
        let err = set.select("Sales", SlicerSelection::value("10")).unwrap_err();
        assert!(matches!(err, DashboardError::ColumnNotFound(c) if c == "Sales"));
    }

    #[test]
    fn test_reset_clears_constraints() {
        let data = orders();
        let mut set = slicers(&data);
        set.select("Region", SlicerSelection::value("North")).unwrap();
        set.reset();
        assert!(set.active().is_empty());
        assert_eq!(set.apply(&data).len(), 4);
    }
}
