use eframe::egui;

use crate::color::StagePalette;
use crate::config::Settings;
use crate::state::AppState;
use crate::ui::{panels, plot};

// ---------------------------------------------------------------------------
// eframe App implementation
// ---------------------------------------------------------------------------

pub struct CascadeTunerApp {
    pub state: AppState,
    palette: StagePalette,
}

impl CascadeTunerApp {
    pub fn new(settings: Settings) -> Self {
        Self {
            state: AppState::new(settings),
            palette: StagePalette::default(),
        }
    }
}

impl eframe::App for CascadeTunerApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        // One unit of engine work per frame; keep repainting while busy.
        if self.state.tick() {
            ctx.request_repaint();
        }

        // ---- Top panel: mode and status ----
        egui::TopBottomPanel::top("top_bar").show(ctx, |ui| {
            panels::top_bar(ui, &mut self.state);
        });

        // ---- Bottom panel: per-stage chart ----
        egui::TopBottomPanel::bottom("chart_panel")
            .default_height(220.0)
            .resizable(true)
            .show(ctx, |ui| {
                plot::stage_chart(ui, &self.state);
            });

        // ---- Central panel: stages, overall rate, table ----
        egui::CentralPanel::default().show(ctx, |ui| {
            panels::stage_row(ui, &mut self.state, &self.palette);
            panels::overall_rate(ui, &self.state);
            ui.separator();
            panels::summary_table(ui, &self.state, &self.palette);
        });
    }
}
