use eframe::egui::Ui;
use egui_plot::{Bar, BarChart, Legend, Plot};

use crate::color;
use crate::state::AppState;

// ---------------------------------------------------------------------------
// Approved / rejected counts per stage
// ---------------------------------------------------------------------------

/// Stacked bar chart: approved at the bottom, rejected on top.
pub fn stage_chart(ui: &mut Ui, state: &AppState) {
    let summaries = state.summaries();
    let names: Vec<&'static str> = summaries.iter().map(|s| s.name).collect();

    let approved: Vec<Bar> = summaries
        .iter()
        .enumerate()
        .map(|(i, s)| Bar::new(i as f64, s.approved as f64).name(s.name))
        .collect();
    let rejected: Vec<Bar> = summaries
        .iter()
        .enumerate()
        .map(|(i, s)| Bar::new(i as f64, s.rejected as f64).name(s.name))
        .collect();

    let approved = BarChart::new(approved)
        .name("approved")
        .color(color::APPROVED)
        .width(0.6);
    let rejected = BarChart::new(rejected)
        .name("rejected")
        .color(color::REJECTED)
        .width(0.6)
        .stack_on(&[&approved]);

    Plot::new("stage_chart")
        .legend(Legend::default())
        .y_axis_label("Items")
        .x_axis_formatter(move |mark, _range| {
            let idx = mark.value.round();
            if (mark.value - idx).abs() > f64::EPSILON || idx < 0.0 {
                return String::new();
            }
            names.get(idx as usize).map(|n| n.to_string()).unwrap_or_default()
        })
        .allow_drag(false)
        .allow_zoom(false)
        .allow_scroll(false)
        .allow_boxed_zoom(false)
        .show(ui, |plot_ui| {
            plot_ui.bar_chart(approved);
            plot_ui.bar_chart(rejected);
        });
}
