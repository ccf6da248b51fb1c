//! Statistics tiles.

use egui::{self, RichText};
use stillpoint_types::stats::StatsSummary;

use crate::format::{minutes_total, streak_label};
use crate::theme::*;

pub fn stats_panel(ui: &mut egui::Ui, summary: &StatsSummary) {
    egui::Frame::default()
        .fill(BG_SECONDARY)
        .inner_margin(PANEL_PADDING)
        .corner_radius(PANEL_ROUNDING)
        .show(ui, |ui| {
            ui.label(RichText::new("Your Practice").color(ACCENT).strong());
            ui.separator();

            egui::Grid::new("stats_grid")
                .num_columns(2)
                .spacing([24.0, 6.0])
                .show(ui, |ui| {
                    row(ui, "Sessions", summary.total_sessions.to_string());
                    row(ui, "Total minutes", minutes_total(summary.total_minutes));
                    row(ui, "Current streak", streak_label(summary.current_streak));
                    row(ui, "Longest streak", streak_label(summary.longest_streak));
                    row(ui, "This week", format!("{} min", minutes_total(summary.week_minutes)));
                    row(ui, "This month", format!("{} min", minutes_total(summary.month_minutes)));
                });
        });
}

fn row(ui: &mut egui::Ui, label: &str, value: String) {
    ui.label(RichText::new(label).color(TEXT_SECONDARY).small());
    ui.label(RichText::new(value).color(TEXT_PRIMARY).strong());
    ui.end_row();
}
