//! Debounced hover-leave handling.
//!
//! Leaving the window does not close it directly. It arms a single close
//! check that fires after the debounce interval; re-entering in the meantime
//! cancels it. At fire time the pointer position is re-read, so a spurious
//! leave (the pointer crossed an inner widget boundary but is still over the
//! revealed area) never retracts the panel.

use std::time::{Duration, Instant};

use super::OverlayEvent;
use crate::timer::{TimerHandle, TimerQueue};

/// Outcome of a fired close check.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CloseDecision {
    Close,
    Stay,
}

pub struct HoverTracker {
    debounce: Duration,
    pending: Option<TimerHandle>,
}

impl HoverTracker {
    pub fn new(debounce: Duration) -> Self {
        Self {
            debounce,
            pending: None,
        }
    }

    /// Pointer entered: cancel any armed close check.
    pub fn on_enter(&mut self, timers: &mut TimerQueue<OverlayEvent>) {
        if let Some(handle) = self.pending.take() {
            timers.cancel(handle);
        }
    }

    /// Pointer left: arm the debounced close check. Pinned windows never
    /// arm one. Repeated leaves rearm rather than stack.
    pub fn on_leave(
        &mut self,
        timers: &mut TimerQueue<OverlayEvent>,
        now: Instant,
        pinned: bool,
    ) {
        if pinned {
            return;
        }
        if let Some(handle) = self.pending.take() {
            timers.cancel(handle);
        }
        self.pending = Some(timers.schedule(now, self.debounce, OverlayEvent::CloseCheck));
    }

    /// The armed check fired. `pointer_x` is the live pointer position,
    /// `None` when it is not over the window at all.
    pub fn on_close_check(
        &mut self,
        pointer_x: Option<f64>,
        open_target: f64,
        pinned: bool,
    ) -> CloseDecision {
        self.pending = None;
        if pinned {
            return CloseDecision::Stay;
        }
        match pointer_x {
            Some(x) if x >= open_target => CloseDecision::Stay,
            _ => CloseDecision::Close,
        }
    }

    pub fn has_pending(&self) -> bool {
        self.pending.is_some()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_enter_cancels_armed_check() {
        let mut hover = HoverTracker::new(Duration::from_millis(700));
        let mut timers = TimerQueue::new();
        let now = Instant::now();
        hover.on_leave(&mut timers, now, false);
        assert!(hover.has_pending());
        hover.on_enter(&mut timers);
        assert!(!hover.has_pending());
        assert!(timers.pop_due(now + Duration::from_secs(1)).is_none());
    }

    #[test]
    fn test_repeated_leaves_keep_one_check() {
        let mut hover = HoverTracker::new(Duration::from_millis(700));
        let mut timers = TimerQueue::new();
        let now = Instant::now();
        hover.on_leave(&mut timers, now, false);
        hover.on_leave(&mut timers, now + Duration::from_millis(100), false);
        hover.on_leave(&mut timers, now + Duration::from_millis(200), false);

        let late = now + Duration::from_secs(2);
        assert!(timers.pop_due(late).is_some());
        assert!(timers.pop_due(late).is_none());
    }

    #[test]
    fn test_leave_while_pinned_arms_nothing() {
        let mut hover = HoverTracker::new(Duration::from_millis(700));
        let mut timers = TimerQueue::new();
        hover.on_leave(&mut timers, Instant::now(), true);
        assert!(!hover.has_pending());
        assert!(timers.is_empty());
    }

    #[test]
    fn test_check_closes_when_pointer_gone() {
        let mut hover = HoverTracker::new(Duration::from_millis(700));
        assert_eq!(
            hover.on_close_check(None, 1515.0, false),
            CloseDecision::Close
        );
    }

    #[test]
    fn test_check_stays_when_pointer_over_revealed_area() {
        let mut hover = HoverTracker::new(Duration::from_millis(700));
        assert_eq!(
            hover.on_close_check(Some(1700.0), 1515.0, false),
            CloseDecision::Stay
        );
        assert_eq!(
            hover.on_close_check(Some(1515.0), 1515.0, false),
            CloseDecision::Stay
        );
    }

    #[test]
    fn test_check_closes_when_pointer_left_of_panel() {
        let mut hover = HoverTracker::new(Duration::from_millis(700));
        assert_eq!(
            hover.on_close_check(Some(900.0), 1515.0, false),
            CloseDecision::Close
        );
    }

    #[test]
    fn test_check_stays_when_pinned_regardless_of_pointer() {
        let mut hover = HoverTracker::new(Duration::from_millis(700));
        assert_eq!(
            hover.on_close_check(None, 1515.0, true),
            CloseDecision::Stay
        );
    }
}
