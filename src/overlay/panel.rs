//! Compact/expanded layout switching, panel selection and pinning.

use super::{AnimationController, Geometry, WindowState};
use crate::channel::{ChannelKey, ChannelSet, PanelMode};
use crate::surface::{LabelKey, OverlaySurface};

/// Applies layout mode changes atomically: window state, slide targets,
/// channel capacities and the surface geometry all move together, so a
/// half-switched window is never observable.
#[derive(Default)]
pub struct PanelModeManager;

impl PanelModeManager {
    pub fn set_mode(
        &mut self,
        state: &mut WindowState,
        geometry: &Geometry,
        anim: &mut AnimationController,
        channels: &mut ChannelSet,
        surface: &mut dyn OverlaySurface,
        mode: PanelMode,
    ) {
        if state.panel_mode == mode {
            return;
        }
        state.panel_mode = mode;
        channels.set_mode(mode);

        state.open_target = geometry.open_x(mode);
        state.closed_target = geometry.closed_x();
        anim.retarget(state);

        let (w, h) = geometry.size(mode);
        surface.set_geometry(state.position, geometry.y, w, h);
        self.render_active(state, channels, surface);
    }

    /// Make `key` the active panel and redraw it from history, without
    /// waiting for the next sampling tick.
    pub fn select_panel(
        &mut self,
        state: &mut WindowState,
        channels: &ChannelSet,
        surface: &mut dyn OverlaySurface,
        key: ChannelKey,
    ) {
        state.active_panel = key;
        self.render_active(state, channels, surface);
    }

    pub fn toggle_pin(&mut self, state: &mut WindowState, surface: &mut dyn OverlaySurface) {
        state.pinned = !state.pinned;
        let label = if state.pinned { "Pinned" } else { "Pin" };
        surface.set_label(LabelKey::Pin, label);
    }

    fn render_active(
        &self,
        state: &WindowState,
        channels: &ChannelSet,
        surface: &mut dyn OverlaySurface,
    ) {
        let history = channels.get(state.active_panel).snapshot();
        surface.render_channel(state.active_panel, &history);
    }
}
