use eframe::egui::{self, Color32, RichText, Ui};
use egui_extras::{Column, TableBuilder};

use crate::color::{self, StagePalette};
use crate::data::filter::Partition;
use crate::pipeline::Mode;
use crate::state::{Action, AppState};

const STAGE_WIDTH: f32 = 150.0;
const BAR_HEIGHT: f32 = 20.0;

/// The state has already logged a rejection and put it in the status line.
fn send(state: &mut AppState, action: Action) {
    if let Err(e) = state.dispatch(action) {
        log::trace!("UI action not applied: {e}");
    }
}

/// Whether the committed results form a filtering chain.
fn showing_chain(state: &AppState) -> bool {
    let pipeline = state.pipeline();
    pipeline.mode() == Mode::Filtering && pipeline.results_mode() == Some(Mode::Filtering)
}

// ---------------------------------------------------------------------------
// Top bar
// ---------------------------------------------------------------------------

/// Mode selector, dataset info and status line.
pub fn top_bar(ui: &mut Ui, state: &mut AppState) {
    ui.horizontal(|ui: &mut Ui| {
        let current = state.target_mode();
        let mut selected = current;
        egui::ComboBox::from_id_salt("mode")
            .selected_text(RichText::new(current.label()).size(18.0))
            .show_ui(ui, |ui: &mut Ui| {
                for mode in Mode::ALL {
                    ui.selectable_value(&mut selected, mode, mode.label());
                }
            });
        if selected != current {
            send(state, Action::SetMode(selected));
        }

        ui.separator();

        match state.dataset() {
            Some(ds) => ui.label(format!("{} items", ds.len())),
            None => ui.label("generating items…"),
        };

        if state.is_busy() {
            ui.spinner();
        }

        if let Some(msg) = &state.status_message {
            ui.label(RichText::new(msg).color(Color32::RED));
        }
    });
}

// ---------------------------------------------------------------------------
// Stage columns
// ---------------------------------------------------------------------------

/// One column per stage: counts, approval bar, name and threshold slider.
pub fn stage_row(ui: &mut Ui, state: &mut AppState, palette: &StagePalette) {
    let summaries = state.summaries();
    let filtering = showing_chain(state);
    let step = state.settings.threshold_step;
    let mut actions = Vec::new();

    egui::ScrollArea::horizontal().show(ui, |ui: &mut Ui| {
        ui.horizontal(|ui: &mut Ui| {
            for (index, summary) in summaries.iter().enumerate() {
                ui.vertical(|ui: &mut Ui| {
                    ui.set_width(STAGE_WIDTH);
                    let total = summary.approved + summary.rejected;
                    ui.label(
                        RichText::new(format!("Approved: {}", summary.approved)).color(color::APPROVED),
                    );
                    ui.label(
                        RichText::new(format!("Rejected: {}", summary.rejected)).color(color::REJECTED),
                    );
                    ui.label(format!("Total: {total}"));

                    if let Some(stage) = state.pipeline().stage(index) {
                        approval_bar(ui, &stage.result);
                    }

                    ui.heading(RichText::new(summary.name).color(palette.color_for(index)));

                    let mut value = state.target_threshold(index).unwrap_or(summary.threshold);
                    let slider = ui.add(egui::Slider::new(&mut value, 0.0..=1.0).step_by(step));
                    if slider.changed() {
                        actions.push(Action::SetThreshold { stage: index, value });
                    }
                    ui.label(format!("Threshold: {value:.2}"));
                });

                if index + 1 < summaries.len() {
                    let arrow = if filtering { "➔" } else { " " };
                    ui.label(RichText::new(arrow).size(48.0).color(color::ARROW));
                }
            }
        });
    });

    for action in actions {
        send(state, action);
    }
}

/// Red/green bar split by the stage's rejection and approval shares.
fn approval_bar(ui: &mut Ui, result: &Partition) {
    let (rect, _) = ui.allocate_exact_size(egui::vec2(STAGE_WIDTH, BAR_HEIGHT), egui::Sense::hover());
    let split = rect.left() + rejected_width(rect.width(), result);
    let painter = ui.painter();
    painter.rect_filled(
        egui::Rect::from_min_max(rect.min, egui::pos2(split, rect.max.y)),
        0.0,
        color::REJECTED,
    );
    painter.rect_filled(
        egui::Rect::from_min_max(egui::pos2(split, rect.min.y), rect.max),
        0.0,
        color::APPROVED,
    );
}

fn rejected_width(width: f32, result: &Partition) -> f32 {
    width * (result.rejection_percentage() / 100.0) as f32
}

// ---------------------------------------------------------------------------
// Overall approval rate
// ---------------------------------------------------------------------------

/// Shown once filtering-mode results are committed.
pub fn overall_rate(ui: &mut Ui, state: &AppState) {
    if !showing_chain(state) {
        return;
    }
    ui.add_space(12.0);
    ui.label(
        RichText::new(format!(
            "Overall Approval Rate: {:.0}%",
            state.overall_approval_rate()
        ))
        .size(32.0),
    );
}

// ---------------------------------------------------------------------------
// Summary table
// ---------------------------------------------------------------------------

pub fn summary_table(ui: &mut Ui, state: &AppState, palette: &StagePalette) {
    let pipeline = state.pipeline();
    let dirty = pipeline.dirty();
    let stages = pipeline.stages();

    TableBuilder::new(ui)
        .striped(true)
        .column(Column::auto().at_least(100.0))
        .columns(Column::auto().at_least(80.0), 5)
        .header(20.0, |mut header| {
            for title in ["Stage", "Threshold", "Approved", "Rejected", "Approval %", "Stale"] {
                header.col(|ui: &mut Ui| {
                    ui.strong(title);
                });
            }
        })
        .body(|mut body| {
            for (index, stage) in stages.iter().enumerate() {
                let result = &stage.result;
                body.row(18.0, |mut row| {
                    row.col(|ui: &mut Ui| {
                        ui.colored_label(palette.color_for(index), stage.kind.name());
                    });
                    row.col(|ui: &mut Ui| {
                        ui.label(format!("{:.2}", stage.threshold));
                    });
                    row.col(|ui: &mut Ui| {
                        ui.label(result.approved.len().to_string());
                    });
                    row.col(|ui: &mut Ui| {
                        ui.label(result.rejected.len().to_string());
                    });
                    row.col(|ui: &mut Ui| {
                        ui.label(format!("{:.1}", result.approval_percentage()));
                    });
                    row.col(|ui: &mut Ui| {
                        ui.label(if dirty.contains(index) { "yes" } else { "" });
                    });
                });
            }
        });
}

#[cfg(test)]
mod tests {
    use super::*;

    fn split(approved: usize, rejected: usize) -> Partition {
        Partition {
            approved: (0..approved).collect(),
            rejected: (approved..approved + rejected).collect(),
        }
    }

    #[test]
    fn bar_splits_by_rejection_share() {
        assert_eq!(rejected_width(200.0, &split(1, 3)), 150.0);
        assert_eq!(rejected_width(200.0, &split(4, 0)), 0.0);
        assert_eq!(rejected_width(200.0, &split(0, 4)), 200.0);
    }

    #[test]
    fn empty_stage_bar_is_all_rejected() {
        assert_eq!(rejected_width(150.0, &Partition::default()), 150.0);
    }
}
