use std::collections::{BTreeMap, BTreeSet};

use crate::data::aggregate::{
    aggregate, AggregatedPoint, TrackedField, AVG_HIGH, AVG_LOW, ORIGINAL_VALUE, PER_ACRE_VALUE,
};
use crate::data::filter::{apply_filters, normalize_selection, unique_values, FilterSpec, SELECT_ALL};
use crate::data::model::{full_label, Dataset, LeafRow, Record, SoilRow, ThresholdRecord};
use crate::data::threshold::{summarize_by_selection, summarize_by_series, ThresholdSummary};

// ---------------------------------------------------------------------------
// Application state
// ---------------------------------------------------------------------------

/// The full UI state, independent of rendering. Everything below the
/// "derived" line is a pure function of (dataset, thresholds, filters) and
/// is fully recomputed by [`AppState::recompute`] on every change; no
/// incremental state is carried between recomputations.
pub struct AppState {
    /// Loaded measurement rows (None until the user opens a file).
    pub dataset: Option<Dataset>,

    /// Threshold reference table (leaf variant only).
    pub thresholds: Vec<ThresholdRecord>,

    /// Per-field accepted values. Empty set = no restriction.
    pub filters: FilterSpec,

    /// Unique values per filter field, computed once per load from the
    /// unfiltered row set.
    pub unique: BTreeMap<String, Vec<String>>,

    /// Per-series visibility, toggled from the legend panel. Absent = shown.
    pub visibility: BTreeMap<String, bool>,

    // -- derived --
    /// Aggregated, time-ordered series.
    pub series: Vec<AggregatedPoint>,

    /// Averaged high/low reference values for the current view.
    pub threshold_summary: ThresholdSummary,

    /// Size of the filtered subset.
    pub filtered_count: usize,

    /// Status / error message shown in the UI.
    pub status_message: Option<String>,

    /// Whether a file loading operation is in progress.
    pub loading: bool,
}

impl Default for AppState {
    fn default() -> Self {
        Self {
            dataset: None,
            thresholds: Vec::new(),
            filters: FilterSpec::default(),
            unique: BTreeMap::new(),
            visibility: BTreeMap::new(),
            series: Vec::new(),
            threshold_summary: ThresholdSummary::default(),
            filtered_count: 0,
            status_message: None,
            loading: false,
        }
    }
}

impl AppState {
    /// Ingest a newly loaded dataset: reset filters and visibility,
    /// pre-compute unique values, derive the initial series.
    pub fn set_dataset(&mut self, dataset: Dataset) {
        self.unique = match &dataset {
            Dataset::Leaf(rows) => LeafRow::filter_fields()
                .iter()
                .map(|f| (f.name.to_string(), unique_values(rows, f)))
                .collect(),
            Dataset::Soil(rows) => SoilRow::filter_fields()
                .iter()
                .map(|f| (f.name.to_string(), unique_values(rows, f)))
                .collect(),
        };
        self.filters = FilterSpec::default();
        self.visibility = BTreeMap::new();
        self.dataset = Some(dataset);
        self.status_message = None;
        self.loading = false;
        self.recompute();
    }

    /// Replace the threshold reference table.
    pub fn set_thresholds(&mut self, records: Vec<ThresholdRecord>) {
        self.thresholds = records;
        self.recompute();
    }

    /// Toggle one accepted value in a field's filter.
    pub fn toggle_filter_value(&mut self, field: &str, value: &str) {
        let accepted = self.filters.entry(field.to_string()).or_default();
        if !accepted.remove(value) {
            accepted.insert(value.to_string());
        }
        self.recompute();
    }

    /// Accept every value of a field. Routed through the select-all marker
    /// so the normalization step stays the single source of that rule.
    pub fn select_all(&mut self, field: &str) {
        let all = self.unique.get(field).cloned().unwrap_or_default();
        let marker: BTreeSet<String> = [SELECT_ALL.to_string()].into();
        self.filters
            .insert(field.to_string(), normalize_selection(&marker, &all));
        self.recompute();
    }

    /// Drop a field's constraint entirely (empty set = accept all).
    pub fn clear_filter(&mut self, field: &str) {
        self.filters.insert(field.to_string(), BTreeSet::new());
        self.recompute();
    }

    /// Flip a series' visibility. Pure presentation state: the engine
    /// outputs are untouched.
    pub fn toggle_series(&mut self, name: &str) {
        let visible = self.is_series_visible(name);
        self.visibility.insert(name.to_string(), !visible);
    }

    pub fn is_series_visible(&self, name: &str) -> bool {
        self.visibility.get(name).copied().unwrap_or(true)
    }

    /// Threshold lines are anchored to the Original Value series and hide
    /// together with it.
    pub fn thresholds_visible(&self) -> bool {
        self.is_series_visible(ORIGINAL_VALUE)
    }

    /// Re-derive the filtered subset, the aggregated series and the
    /// threshold summary from scratch.
    pub fn recompute(&mut self) {
        let Some(dataset) = &self.dataset else {
            self.series = Vec::new();
            self.threshold_summary = ThresholdSummary::default();
            self.filtered_count = 0;
            return;
        };

        match dataset {
            Dataset::Leaf(rows) => {
                let subset = apply_filters(rows, &self.filters);
                self.filtered_count = subset.len();
                self.series = aggregate(
                    &subset,
                    LeafRow::group_key,
                    &[
                        TrackedField::new(ORIGINAL_VALUE, |r: &LeafRow| r.value),
                        TrackedField::new(PER_ACRE_VALUE, |r: &LeafRow| r.normalized_value),
                    ],
                );
                // Thresholds follow the element selection, bridged to the
                // full labels the reference table is keyed by.
                let selected: BTreeSet<String> = self
                    .filters
                    .get("element")
                    .map(|s| s.iter().map(|e| full_label(e)).collect())
                    .unwrap_or_default();
                self.threshold_summary = summarize_by_selection(&self.thresholds, &selected);
            }
            Dataset::Soil(rows) => {
                let subset = apply_filters(rows, &self.filters);
                self.filtered_count = subset.len();
                self.series = aggregate(
                    &subset,
                    SoilRow::group_key,
                    &[
                        TrackedField::new(ORIGINAL_VALUE, |r: &SoilRow| r.value),
                        TrackedField::new(PER_ACRE_VALUE, |r: &SoilRow| r.value_per_acre),
                        TrackedField::new(AVG_HIGH, |r: &SoilRow| r.avg_high),
                        TrackedField::new(AVG_LOW, |r: &SoilRow| r.avg_low),
                    ],
                );
                self.threshold_summary = summarize_by_series(&self.series);
            }
        }
    }
}
