//! Recent sessions list with a guarded clear button.

use egui::{self, RichText, ScrollArea, Vec2};
use stillpoint_core::ports::ClockPort;
use stillpoint_types::session::SessionRecord;

use crate::format::{duration_label, quoted, session_when};
use crate::state::UiState;
use crate::theme::*;

pub const CONFIRM_TEXT: &str = "Are you sure you want to clear all meditation sessions?";

/// What the caller should do after rendering the history panel
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HistoryAction {
    None,
    /// The user confirmed the wipe
    ClearConfirmed,
}

/// Render the recent-session log. Renders nothing when there is no history.
pub fn history_panel(ui: &mut egui::Ui, state: &mut UiState, clock: &dyn ClockPort) -> HistoryAction {
    if state.recent.is_empty() {
        state.confirm_clear = false;
        return HistoryAction::None;
    }

    let mut action = HistoryAction::None;

    egui::Frame::default()
        .fill(BG_SECONDARY)
        .inner_margin(PANEL_PADDING)
        .corner_radius(PANEL_ROUNDING)
        .show(ui, |ui| {
            ui.label(RichText::new("Recent Sessions").color(ACCENT).strong());
            ui.separator();

            ScrollArea::vertical()
                .max_height(260.0)
                .auto_shrink([false, true])
                .show(ui, |ui| {
                    for record in &state.recent {
                        render_session(ui, record, clock);
                        ui.add_space(4.0);
                    }
                });

            ui.add_space(8.0);

            if state.confirm_clear {
                ui.label(RichText::new(CONFIRM_TEXT).color(WARNING).small());
                ui.horizontal(|ui| {
                    let yes = ui.add(
                        egui::Button::new(RichText::new("Clear").color(TEXT_PRIMARY))
                            .fill(ERROR)
                            .corner_radius(PANEL_ROUNDING),
                    );
                    if yes.clicked() {
                        action = HistoryAction::ClearConfirmed;
                    }
                    if ui.button("Cancel").clicked() {
                        state.confirm_clear = false;
                    }
                });
            } else if ui
                .add(
                    egui::Button::new(RichText::new("Clear History").color(TEXT_SECONDARY))
                        .fill(BG_SURFACE)
                        .corner_radius(PANEL_ROUNDING)
                        .min_size(Vec2::new(120.0, 0.0)),
                )
                .clicked()
            {
                state.confirm_clear = true;
            }
        });

    action
}

fn render_session(ui: &mut egui::Ui, record: &SessionRecord, clock: &dyn ClockPort) {
    egui::Frame::default()
        .fill(BG_SURFACE)
        .corner_radius(PANEL_ROUNDING)
        .inner_margin(8.0)
        .show(ui, |ui| {
            ui.horizontal(|ui| {
                ui.label(
                    RichText::new(duration_label(record.duration_seconds))
                        .color(TEXT_PRIMARY)
                        .strong(),
                );
                ui.label(
                    RichText::new(session_when(record, clock))
                        .color(TEXT_SECONDARY)
                        .small(),
                );
            });
            if let Some(intention) = &record.intention {
                ui.label(RichText::new(quoted(intention)).color(TEXT_SECONDARY).italics());
            }
        });
}
