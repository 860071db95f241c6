mod app;
mod color;
mod config;
mod data;
mod error;
mod state;
mod ui;
mod view;

use app::SleepDashApp;
use config::DashboardConfig;
use eframe::egui;
use state::AppState;

fn main() -> eframe::Result {
    env_logger::init();

    let config = DashboardConfig::from_env().unwrap_or_else(|e| {
        log::warn!("{e}; using defaults");
        DashboardConfig::default()
    });

    let mut state = AppState::new(config.default_min_sleep);
    if let Some(path) = &config.data_path {
        state.load(path);
    }

    let options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default()
            .with_inner_size([1280.0, 860.0])
            .with_min_inner_size([720.0, 480.0]),
        ..Default::default()
    };

    eframe::run_native(
        "Sleep Health & Lifestyle Dashboard",
        options,
        Box::new(|_cc| Ok(Box::new(SleepDashApp::new(state)))),
    )
}
