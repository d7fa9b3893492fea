mod app;
mod color;
mod config;
mod data;
mod pipeline;
mod state;
mod ui;

use anyhow::{anyhow, Result};
use app::CascadeTunerApp;
use config::Settings;
use eframe::egui;

fn main() -> Result<()> {
    env_logger::init();

    let settings = Settings::from_env()?;
    log::debug!("settings: {settings:?}");

    let options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default()
            .with_inner_size([1100.0, 720.0])
            .with_min_inner_size([640.0, 420.0]),
        ..Default::default()
    };

    eframe::run_native(
        "Cascade Tuner",
        options,
        Box::new(|_cc| Ok(Box::new(CascadeTunerApp::new(settings)))),
    )
    .map_err(|e| anyhow!("viewer exited with error: {e}"))
}
