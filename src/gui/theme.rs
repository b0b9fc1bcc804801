//! Palette and context styling for the overlay window.

use eframe::egui;
use egui::{Color32, Context};

use crate::channel::ChannelKey;

pub struct Palette;

impl Palette {
    pub const BACKGROUND: Color32 = Color32::from_rgb(14, 17, 23);
    pub const SURFACE: Color32 = Color32::from_rgb(22, 27, 36);
    pub const BORDER: Color32 = Color32::from_rgb(52, 62, 76);
    pub const TEXT_PRIMARY: Color32 = Color32::from_rgb(222, 228, 236);
    pub const TEXT_MUTED: Color32 = Color32::from_rgb(128, 140, 156);
    pub const ACCENT: Color32 = Color32::from_rgb(0, 200, 255);
}

/// Chart line color per metric.
pub fn channel_color(key: ChannelKey) -> Color32 {
    match key {
        ChannelKey::Cpu => Color32::from_rgb(0, 200, 255),
        ChannelKey::Memory => Color32::from_rgb(170, 120, 255),
        ChannelKey::Disk => Color32::from_rgb(255, 180, 60),
        ChannelKey::Network => Color32::from_rgb(80, 230, 140),
        ChannelKey::Gpu => Color32::from_rgb(120, 255, 80),
        ChannelKey::System => Color32::from_rgb(255, 110, 110),
    }
}

/// Install the dark style once at startup.
pub fn apply(ctx: &Context) {
    let mut visuals = egui::Visuals::dark();
    visuals.panel_fill = Palette::BACKGROUND;
    visuals.window_fill = Palette::BACKGROUND;
    visuals.override_text_color = Some(Palette::TEXT_PRIMARY);
    visuals.widgets.noninteractive.bg_stroke = egui::Stroke::new(1.0, Palette::BORDER);
    visuals.selection.bg_fill = Palette::ACCENT.linear_multiply(0.3);
    ctx.set_visuals(visuals);
}
