//! Fixed-step slide animation toward the open or closed target.

use std::time::{Duration, Instant};

use super::{OverlayEvent, SlideState, WindowState};
use crate::timer::{TimerHandle, TimerQueue};

/// Moves the window position in discrete steps on the shared timer queue.
///
/// At most one frame is ever pending: `open()`/`close()` while already in or
/// animating toward the requested state are no-ops, which prevents duplicate
/// step chains.
pub struct AnimationController {
    step: f64,
    frame_delay: Duration,
    frame_timer: Option<TimerHandle>,
}

impl AnimationController {
    pub fn new(step: f64, frame_delay: Duration) -> Self {
        Self {
            step,
            frame_delay,
            frame_timer: None,
        }
    }

    /// Start sliding in. No-op when already open or opening.
    pub fn open(
        &mut self,
        state: &mut WindowState,
        timers: &mut TimerQueue<OverlayEvent>,
        now: Instant,
    ) {
        match state.slide {
            SlideState::Open | SlideState::Opening => {}
            SlideState::Closed | SlideState::Closing => {
                state.slide = SlideState::Opening;
                self.ensure_frame(timers, now);
            }
        }
    }

    /// Start sliding out. No-op when already closed or closing, and blocked
    /// entirely while pinned.
    pub fn close(
        &mut self,
        state: &mut WindowState,
        timers: &mut TimerQueue<OverlayEvent>,
        now: Instant,
    ) {
        if state.pinned {
            return;
        }
        match state.slide {
            SlideState::Closed | SlideState::Closing => {}
            SlideState::Open | SlideState::Opening => {
                state.slide = SlideState::Closing;
                self.ensure_frame(timers, now);
            }
        }
    }

    /// Advance one frame. Returns true when the position changed and the
    /// surface geometry should be pushed.
    pub fn on_frame(
        &mut self,
        state: &mut WindowState,
        timers: &mut TimerQueue<OverlayEvent>,
        now: Instant,
    ) -> bool {
        self.frame_timer = None;
        let target = match state.slide {
            SlideState::Opening => state.open_target,
            SlideState::Closing => state.closed_target,
            // Stable state: a stale frame after a cancelled transition.
            SlideState::Open | SlideState::Closed => return false,
        };

        if (state.position - target).abs() <= self.step {
            state.position = target;
        } else if state.position > target {
            state.position -= self.step;
        } else {
            state.position += self.step;
        }
        state.position = state.position.clamp(state.open_target, state.closed_target);

        if state.position == target {
            state.slide = match state.slide {
                SlideState::Opening => SlideState::Open,
                _ => SlideState::Closed,
            };
        } else {
            self.ensure_frame(timers, now);
        }
        true
    }

    /// Recompute after a geometry change. In-flight animations keep going
    /// toward the updated targets; stable states snap to theirs.
    pub fn retarget(&mut self, state: &mut WindowState) {
        match state.slide {
            SlideState::Open => state.position = state.open_target,
            SlideState::Closed => state.position = state.closed_target,
            SlideState::Opening | SlideState::Closing => {
                state.position = state.position.clamp(state.open_target, state.closed_target);
            }
        }
    }

    pub fn frame_pending(&self) -> bool {
        self.frame_timer.is_some()
    }

    fn ensure_frame(&mut self, timers: &mut TimerQueue<OverlayEvent>, now: Instant) {
        if self.frame_timer.is_none() {
            self.frame_timer =
                Some(timers.schedule(now, self.frame_delay, OverlayEvent::AnimationFrame));
        }
    }
}
