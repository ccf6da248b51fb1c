//! UI theme constants

use egui::{Color32, CornerRadius, Stroke, Vec2};

pub const BG_PRIMARY: Color32 = Color32::from_rgb(22, 24, 38);
pub const BG_SECONDARY: Color32 = Color32::from_rgb(34, 37, 58);
pub const BG_SURFACE: Color32 = Color32::from_rgb(48, 52, 80);
pub const TEXT_PRIMARY: Color32 = Color32::from_rgb(232, 232, 244);
pub const TEXT_SECONDARY: Color32 = Color32::from_rgb(160, 164, 190);
pub const ACCENT: Color32 = Color32::from_rgb(107, 115, 255);
pub const SUCCESS: Color32 = Color32::from_rgb(52, 199, 140);
pub const ERROR: Color32 = Color32::from_rgb(239, 68, 68);
pub const WARNING: Color32 = Color32::from_rgb(234, 179, 8);
pub const BANNER_BG: Color32 = Color32::from_rgba_premultiplied(102, 110, 242, 242);

pub const PANEL_ROUNDING: CornerRadius = CornerRadius::same(10);
pub const PANEL_PADDING: Vec2 = Vec2::new(16.0, 12.0);
pub const CLOCK_SIZE: f32 = 64.0;

/// Apply the night theme to an egui context
pub fn apply_theme(ctx: &egui::Context) {
    let mut style = (*ctx.style()).clone();

    style.visuals.dark_mode = true;
    style.visuals.panel_fill = BG_PRIMARY;
    style.visuals.window_fill = BG_SECONDARY;
    style.visuals.extreme_bg_color = BG_SECONDARY;

    style.visuals.widgets.inactive.bg_fill = BG_SURFACE;
    style.visuals.widgets.inactive.fg_stroke = Stroke::new(1.0, TEXT_SECONDARY);
    style.visuals.widgets.hovered.bg_fill = BG_SURFACE;
    style.visuals.widgets.hovered.fg_stroke = Stroke::new(1.0, TEXT_PRIMARY);
    style.visuals.widgets.active.bg_fill = ACCENT;
    style.visuals.widgets.active.fg_stroke = Stroke::new(1.0, TEXT_PRIMARY);

    style.visuals.selection.bg_fill = ACCENT.linear_multiply(0.4);
    style.visuals.selection.stroke = Stroke::new(1.0, ACCENT);

    style.spacing.item_spacing = Vec2::new(10.0, 8.0);

    ctx.set_style(style);
}
