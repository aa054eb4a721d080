mod app;
mod color;
mod data;
mod state;
mod ui;

use std::path::Path;

use app::ForecastDashApp;
use eframe::egui;
use state::AppState;

/// All model CSVs are read from here, once, at startup.
const MODEL_DATA_DIR: &str = "model_data";

fn main() -> eframe::Result {
    env_logger::init();

    // The store is built before the event loop starts; a broken dataset
    // refuses to serve rather than failing later at render time.
    let store = match data::loader::load_dir(Path::new(MODEL_DATA_DIR)) {
        Ok(store) => store,
        Err(e) => {
            log::error!("startup failed: {e:#}");
            eprintln!("error: {e:#}");
            std::process::exit(1);
        }
    };

    let options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default()
            .with_inner_size([1200.0, 800.0])
            .with_min_inner_size([600.0, 400.0]),
        ..Default::default()
    };

    eframe::run_native(
        "Time-Series Forecast Dashboard",
        options,
        Box::new(move |_cc| Ok(Box::new(ForecastDashApp::new(AppState::new(store))))),
    )
}
