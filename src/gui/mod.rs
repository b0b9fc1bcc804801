//! eframe front end: the borderless, always-on-top window docked to the
//! right screen edge.
//!
//! All interaction logic lives in [`crate::overlay`]; this module only
//! translates egui input into pointer enter/leave notifications, drains the
//! timer queue once per frame, and turns surface pushes into viewport
//! commands and widgets.

mod app;
mod theme;
mod widgets;

pub use app::OverlayApp;

use eframe::egui;

use crate::config::Config;
use crate::error::{EmonError, Result};

/// Run the overlay window until the user exits.
pub fn run(config: Config) -> Result<()> {
    let size = egui::vec2(
        config.window.compact_width as f32,
        config.window.compact_height as f32,
    );
    let options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default()
            .with_title("Edge Monitor")
            .with_inner_size(size)
            .with_decorations(false)
            .with_resizable(false)
            .with_always_on_top(),
        ..Default::default()
    };
    eframe::run_native(
        "edge-monitor",
        options,
        Box::new(move |cc| Ok(Box::new(OverlayApp::new(cc, config)))),
    )
    .map_err(|e| EmonError::Gui(e.to_string()))
}
