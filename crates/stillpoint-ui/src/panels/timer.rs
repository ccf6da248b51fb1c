//! Timer panel: countdown, duration stepper, intention, controls.

use egui::{self, Align, Layout, ProgressBar, RichText, Vec2};
use stillpoint_types::timer::TimerState;

use crate::format::{duration_label, format_clock};
use crate::state::UiState;
use crate::theme::*;

/// What the caller should do after rendering the timer panel
#[derive(Debug, Clone, PartialEq)]
pub enum TimerAction {
    None,
    Start,
    Pause,
    Reset,
    /// Signed change to the configured duration, in seconds
    AdjustDuration(i64),
    IntentionChanged(String),
    SetIntervalBell(bool),
}

/// Render the timer panel. `step_secs` is the stepper increment.
pub fn timer_panel(ui: &mut egui::Ui, state: &mut UiState, step_secs: u32) -> TimerAction {
    let mut action = TimerAction::None;
    let idle = state.snapshot.is_idle();

    egui::Frame::default()
        .fill(BG_SECONDARY)
        .inner_margin(PANEL_PADDING)
        .corner_radius(PANEL_ROUNDING)
        .show(ui, |ui| {
            ui.vertical_centered(|ui| {
                ui.horizontal(|ui| {
                    ui.heading(RichText::new("Stillpoint").color(TEXT_PRIMARY).strong());
                    ui.with_layout(Layout::right_to_left(Align::Center), |ui| {
                        let color = match state.snapshot.state {
                            TimerState::Running => SUCCESS,
                            TimerState::Paused => WARNING,
                            _ => TEXT_SECONDARY,
                        };
                        ui.label(RichText::new(&state.status_text).color(color).small());
                    });
                });

                ui.add_space(12.0);
                ui.label(
                    RichText::new(format_clock(state.snapshot.remaining_secs))
                        .color(TEXT_PRIMARY)
                        .size(CLOCK_SIZE)
                        .monospace(),
                );
                ui.add(
                    ProgressBar::new((state.snapshot.progress_pct() / 100.0) as f32)
                        .desired_width(ui.available_width() * 0.8)
                        .fill(ACCENT),
                );

                if let Some(intention) = state.intention_display() {
                    ui.add_space(4.0);
                    ui.label(RichText::new(intention).color(TEXT_SECONDARY).italics());
                }

                ui.add_space(12.0);

                // ── Duration ────────────────────────────────────
                ui.horizontal(|ui| {
                    let step = step_secs as i64;
                    if ui.add_enabled(idle, egui::Button::new("−")).clicked() {
                        action = TimerAction::AdjustDuration(-step);
                    }
                    ui.label(
                        RichText::new(duration_label(state.snapshot.configured_secs))
                            .color(TEXT_PRIMARY),
                    );
                    if ui.add_enabled(idle, egui::Button::new("+")).clicked() {
                        action = TimerAction::AdjustDuration(step);
                    }
                });

                // ── Intention ───────────────────────────────────
                let edit = egui::TextEdit::singleline(&mut state.intention_input)
                    .hint_text("Set an intention (optional)")
                    .desired_width(ui.available_width() * 0.8);
                if ui.add_enabled(idle, edit).changed() {
                    action = TimerAction::IntentionChanged(state.intention_input.clone());
                }

                let mut bell = state.snapshot.interval_bell;
                if ui.checkbox(&mut bell, "Interval bell at halfway").changed() {
                    action = TimerAction::SetIntervalBell(bell);
                }

                ui.add_space(12.0);

                // ── Controls ────────────────────────────────────
                ui.horizontal(|ui| {
                    if state.is_running() {
                        if control_button(ui, "Pause", WARNING).clicked() {
                            action = TimerAction::Pause;
                        }
                    } else if control_button(ui, state.start_label(), ACCENT).clicked() {
                        action = TimerAction::Start;
                    }
                    if control_button(ui, "Reset", BG_SURFACE).clicked() {
                        action = TimerAction::Reset;
                    }
                });
            });
        });

    action
}

fn control_button(ui: &mut egui::Ui, text: &str, fill: egui::Color32) -> egui::Response {
    ui.add(
        egui::Button::new(RichText::new(text).color(TEXT_PRIMARY).strong())
            .fill(fill)
            .corner_radius(PANEL_ROUNDING)
            .min_size(Vec2::new(140.0, 32.0)),
    )
}

/// Centered completion banner, drawn over everything else.
pub fn completion_banner(ctx: &egui::Context, text: &str) {
    egui::Area::new(egui::Id::new("completion_banner"))
        .anchor(egui::Align2::CENTER_CENTER, Vec2::ZERO)
        .order(egui::Order::Foreground)
        .show(ctx, |ui| {
            egui::Frame::default()
                .fill(BANNER_BG)
                .corner_radius(PANEL_ROUNDING)
                .inner_margin(Vec2::new(32.0, 24.0))
                .show(ui, |ui| {
                    ui.label(RichText::new(text).color(TEXT_PRIMARY).size(20.0).strong());
                });
        });
}
