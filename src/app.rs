use eframe::egui;

use crate::state::AppState;
use crate::ui::{panels, plot};

// ---------------------------------------------------------------------------
// eframe App implementation
// ---------------------------------------------------------------------------

pub struct ForecastDashApp {
    pub state: AppState,
}

impl ForecastDashApp {
    pub fn new(state: AppState) -> Self {
        Self { state }
    }
}

impl eframe::App for ForecastDashApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        // ---- Top panel: status bar ----
        egui::TopBottomPanel::top("top_bar").show(ctx, |ui| {
            panels::top_bar(ui, &self.state);
        });

        // ---- Left side panel: model checklist ----
        egui::SidePanel::left("model_panel")
            .default_width(220.0)
            .resizable(true)
            .show(ctx, |ui| {
                panels::side_panel(ui, &mut self.state);
            });

        // ---- Bottom panel: date range scrub bar ----
        egui::TopBottomPanel::bottom("range_panel").show(ctx, |ui| {
            panels::range_controls(ui, &mut self.state);
        });

        // ---- Central panel: chart ----
        let spec = self.state.chart_spec();
        egui::CentralPanel::default().show(ctx, |ui| {
            plot::forecast_plot(ui, &spec, &self.state.color_map);
        });
    }
}
