//! The reveal/retract interaction machinery.
//!
//! One explicit [`WindowState`] replaces the pile of booleans the obvious
//! implementation grows (`is_open`, `animating`, `expanded`, ...): the slide
//! state is an enum, pinning and layout mode are orthogonal flags, and
//! invalid combinations ("animating but also already open") cannot be
//! represented.
//!
//! [`OverlayController`] composes the hover tracker, the slide animation and
//! the panel mode manager over the shared timer queue. Everything runs on one
//! control flow; timer events are drained and dispatched one at a time, so a
//! mode switch triggered from inside a redraw cannot recurse into another
//! redraw.

mod animation;
mod hover;
mod panel;

pub use animation::AnimationController;
pub use hover::{CloseDecision, HoverTracker};
pub use panel::PanelModeManager;

use std::time::{Duration, Instant};

use crate::channel::{ChannelKey, ChannelSet, PanelMode};
use crate::config::Config;
use crate::surface::OverlaySurface;
use crate::timer::TimerQueue;

/// Slide position of the docked window.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SlideState {
    Closed,
    Opening,
    Open,
    Closing,
}

/// Timer-driven callbacks, all on one queue.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OverlayEvent {
    /// Metrics sampling tick (dispatched by the runtime loop)
    SampleTick,
    /// One slide animation step
    AnimationFrame,
    /// Debounced hover-leave close check
    CloseCheck,
}

/// Screen-derived geometry for both layout modes.
#[derive(Debug, Clone, Copy)]
pub struct Geometry {
    pub screen_width: f64,
    pub y: f64,
    pub hide_gap: f64,
    compact: (f64, f64),
    expanded: (f64, f64),
}

impl Geometry {
    pub fn new(window: &crate::config::WindowConfig, screen_width: f64) -> Self {
        Self {
            screen_width,
            y: window.y,
            hide_gap: window.hide_gap,
            compact: (window.compact_width, window.compact_height),
            expanded: (window.expanded_width, window.expanded_height),
        }
    }

    /// Window size for a layout mode.
    pub fn size(&self, mode: PanelMode) -> (f64, f64) {
        match mode {
            PanelMode::Compact => self.compact,
            PanelMode::Expanded => self.expanded,
        }
    }

    /// X of the window's left edge when fully revealed.
    pub fn open_x(&self, mode: PanelMode) -> f64 {
        self.screen_width - self.size(mode).0
    }

    /// X of the window's left edge when retracted to the hide gap.
    pub fn closed_x(&self) -> f64 {
        self.screen_width - self.hide_gap
    }
}

/// The single mutable window state.
///
/// Invariants: `open_target <= position <= closed_target`; an animating
/// slide state implies a scheduled frame; `pinned` forbids entering
/// `Closing`.
#[derive(Debug, Clone)]
pub struct WindowState {
    pub slide: SlideState,
    pub position: f64,
    pub open_target: f64,
    pub closed_target: f64,
    pub pinned: bool,
    pub panel_mode: PanelMode,
    pub active_panel: ChannelKey,
}

impl WindowState {
    /// Start retracted, compact, on the CPU panel.
    pub fn new(geometry: &Geometry) -> Self {
        Self {
            slide: SlideState::Closed,
            position: geometry.closed_x(),
            open_target: geometry.open_x(PanelMode::Compact),
            closed_target: geometry.closed_x(),
            pinned: false,
            panel_mode: PanelMode::Compact,
            active_panel: ChannelKey::Cpu,
        }
    }
}

/// Composes hover, animation and panel mode handling over the timer queue.
pub struct OverlayController {
    pub state: WindowState,
    geometry: Geometry,
    anim: AnimationController,
    hover: HoverTracker,
    panel: PanelModeManager,
}

impl OverlayController {
    pub fn new(config: &Config, screen_width: f64) -> Self {
        let geometry = Geometry::new(&config.window, screen_width);
        let state = WindowState::new(&geometry);
        Self {
            state,
            geometry,
            anim: AnimationController::new(
                config.animation.step,
                Duration::from_millis(config.animation.frame_delay_ms),
            ),
            hover: HoverTracker::new(Duration::from_millis(config.hover.debounce_ms)),
            panel: PanelModeManager::default(),
        }
    }

    /// Push the current position/size to the surface.
    pub fn apply_geometry(&self, surface: &mut dyn OverlaySurface) {
        let (w, h) = self.geometry.size(self.state.panel_mode);
        surface.set_geometry(self.state.position, self.geometry.y, w, h);
    }

    /// Pointer entered the window: cancel any pending close, slide in.
    pub fn pointer_entered(&mut self, timers: &mut TimerQueue<OverlayEvent>, now: Instant) {
        self.hover.on_enter(timers);
        self.anim.open(&mut self.state, timers, now);
    }

    /// Pointer left the window: schedule the debounced close check.
    pub fn pointer_left(&mut self, timers: &mut TimerQueue<OverlayEvent>, now: Instant) {
        self.hover.on_leave(timers, now, self.state.pinned);
    }

    /// Dispatch one due timer event. `pointer_x` is the pointer's current
    /// screen x, `None` when it is not over the window.
    pub fn handle_event(
        &mut self,
        event: OverlayEvent,
        timers: &mut TimerQueue<OverlayEvent>,
        now: Instant,
        pointer_x: Option<f64>,
        surface: &mut dyn OverlaySurface,
    ) {
        match event {
            OverlayEvent::AnimationFrame => {
                if self.anim.on_frame(&mut self.state, timers, now) {
                    self.apply_geometry(surface);
                }
            }
            OverlayEvent::CloseCheck => {
                let decision = self.hover.on_close_check(
                    pointer_x,
                    self.state.open_target,
                    self.state.pinned,
                );
                if decision == CloseDecision::Close {
                    self.anim.close(&mut self.state, timers, now);
                }
            }
            // Sampling is owned by the runtime loop.
            OverlayEvent::SampleTick => {}
        }
    }

    /// Switch compact/expanded layout. Retargets any in-flight animation
    /// and re-renders the active panel immediately.
    pub fn set_mode(
        &mut self,
        mode: PanelMode,
        channels: &mut ChannelSet,
        surface: &mut dyn OverlaySurface,
    ) {
        self.panel.set_mode(
            &mut self.state,
            &self.geometry,
            &mut self.anim,
            channels,
            surface,
            mode,
        );
    }

    pub fn toggle_mode(&mut self, channels: &mut ChannelSet, surface: &mut dyn OverlaySurface) {
        self.set_mode(self.state.panel_mode.toggled(), channels, surface);
    }

    /// Make `key` the active panel and redraw it without waiting for the
    /// next tick.
    pub fn select_panel(
        &mut self,
        key: ChannelKey,
        channels: &ChannelSet,
        surface: &mut dyn OverlaySurface,
    ) {
        self.panel.select_panel(&mut self.state, channels, surface, key);
    }

    /// Flip pinning. No geometric effect; only gates the close path.
    pub fn toggle_pin(&mut self, surface: &mut dyn OverlaySurface) {
        self.panel.toggle_pin(&mut self.state, surface);
    }
}
