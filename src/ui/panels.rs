use eframe::egui::{self, RichText, ScrollArea, Slider, Ui};

use crate::data::project::display_name;
use crate::state::AppState;

// ---------------------------------------------------------------------------
// Left side panel – model selection
// ---------------------------------------------------------------------------

/// Render the model-selection checklist.
pub fn side_panel(ui: &mut Ui, state: &mut AppState) {
    ui.heading("Select Models");
    ui.separator();

    let model_ids: Vec<String> = state.store.model_ids().map(str::to_string).collect();

    ScrollArea::vertical()
        .auto_shrink([false, false])
        .show(ui, |ui: &mut Ui| {
            for model_id in &model_ids {
                let mut checked = state.chosen_models.contains(model_id);
                let color = state.color_map.color_for(model_id);
                let text = RichText::new(display_name(model_id)).color(color);
                if ui.checkbox(&mut checked, text).changed() {
                    state.toggle_model(model_id);
                }
            }
        });
}

// ---------------------------------------------------------------------------
// Top bar
// ---------------------------------------------------------------------------

/// Render the top status bar.
pub fn top_bar(ui: &mut Ui, state: &AppState) {
    egui::menu::bar(ui, |ui: &mut Ui| {
        ui.strong("Time-Series Forecast Dashboard");
        ui.separator();
        ui.label(format!(
            "{} models loaded, {} selected",
            state.store.len(),
            state.chosen_models.len()
        ));
        ui.separator();
        let last = state.date_index.len().saturating_sub(1);
        ui.label(format!(
            "{} .. {}",
            state.date_index.label(0),
            state.date_index.label(last)
        ));
    });
}

// ---------------------------------------------------------------------------
// Bottom panel – date range scrub bar
// ---------------------------------------------------------------------------

/// Render the start/end sliders over the global date index. Endpoints push
/// each other so `start <= end` always holds.
pub fn range_controls(ui: &mut Ui, state: &mut AppState) {
    let max_index = state.date_index.len().saturating_sub(1);

    ui.label("Adjust Date Range");
    ui.horizontal(|ui: &mut Ui| {
        let (mut start, mut end) = state.range;

        ui.label("From");
        if ui
            .add(Slider::new(&mut start, 0..=max_index).show_value(false))
            .changed()
        {
            state.set_range_start(start);
        }
        ui.monospace(state.date_index.label(state.range.0));

        ui.separator();

        ui.label("To");
        if ui
            .add(Slider::new(&mut end, 0..=max_index).show_value(false))
            .changed()
        {
            state.set_range_end(end);
        }
        ui.monospace(state.date_index.label(state.range.1));
    });
}
