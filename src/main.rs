mod app;
mod color;
mod config;
mod data;
mod state;
mod ui;

use app::EstateLensApp;
use config::DashboardConfig;
use eframe::egui;

fn main() -> eframe::Result {
    env_logger::init();

    let config = DashboardConfig::resolve();
    let app = EstateLensApp::new(config);

    let options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default()
            .with_inner_size([1280.0, 900.0])
            .with_min_inner_size([720.0, 480.0]),
        ..Default::default()
    };

    eframe::run_native(
        "Estate Lens – Property Market Analytics",
        options,
        Box::new(|_cc| Ok(Box::new(app))),
    )
}
