use std::collections::BTreeSet;

use crate::color::ColorMap;
use crate::data::model::{DateIndex, SeriesStore};
use crate::data::project::{ChartSpec, Selection, project};

// ---------------------------------------------------------------------------
// Application state
// ---------------------------------------------------------------------------

/// The full UI state, independent of rendering.
///
/// `store` and `date_index` are built once at startup and never mutated; the
/// selection fields are the only moving parts and are re-projected into a
/// fresh [`ChartSpec`] on every interaction.
pub struct AppState {
    /// All loaded series, keyed by model id.
    pub store: SeriesStore,

    /// Global scrub-bar domain (union of all series date ranges).
    pub date_index: DateIndex,

    /// Currently checked model ids.
    pub chosen_models: BTreeSet<String>,

    /// `(start, end)` indices into `date_index`, inclusive, start <= end.
    pub range: (usize, usize),

    /// Per-model line colours, fixed at startup.
    pub color_map: ColorMap,
}

impl AppState {
    pub fn new(store: SeriesStore) -> Self {
        let date_index = store.date_index();
        let range = (0, date_index.len().saturating_sub(1));
        let color_map = ColorMap::new(store.model_ids());
        AppState {
            store,
            date_index,
            chosen_models: BTreeSet::new(),
            range,
            color_map,
        }
    }

    /// Check/uncheck one model.
    pub fn toggle_model(&mut self, model_id: &str) {
        if !self.chosen_models.remove(model_id) {
            self.chosen_models.insert(model_id.to_string());
        }
    }

    /// Clamp the range so `start <= end` after a slider drag, moving the
    /// endpoint that was not dragged.
    pub fn set_range_start(&mut self, start: usize) {
        self.range.0 = start;
        self.range.1 = self.range.1.max(start);
    }

    pub fn set_range_end(&mut self, end: usize) {
        self.range.1 = end;
        self.range.0 = self.range.0.min(end);
    }

    /// Snapshot of the current selection. `BTreeSet` iteration keeps the
    /// chosen ids in ascending model-id order, the documented tie-break for
    /// which model contributes the ground-truth line.
    pub fn selection(&self) -> Selection {
        Selection {
            chosen: self.chosen_models.iter().cloned().collect(),
            range: self.range,
        }
    }

    /// Project the current selection, recovering projection errors into a
    /// diagnostic chart so one bad interaction never takes the session down.
    pub fn chart_spec(&self) -> ChartSpec {
        match project(&self.store, &self.date_index, &self.selection()) {
            Ok(spec) => spec,
            Err(e) => {
                log::error!("projection failed: {e}");
                ChartSpec::diagnostic(format!("Error loading data: {e}"))
            }
        }
    }
}
