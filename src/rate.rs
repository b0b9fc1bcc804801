//! Per-second rates from cumulative OS counters.
//!
//! Disk and network I/O are exposed by the OS as monotonically non-decreasing
//! byte counters. A [`RateCounter`] keeps the previous snapshot and turns each
//! new reading into a rate over the elapsed interval.
//!
//! Counters are monotonic by contract of the source. A provider restart that
//! resets a counter to a smaller value is not special-cased and yields a
//! negative or near-zero rate for exactly one tick.

use std::time::Instant;

/// Floor for the elapsed interval, guarding division by zero when ticks
/// fire faster than expected.
pub const MIN_DT_SECS: f64 = 0.001;

/// Bytes per mebibyte, the display unit for I/O rates.
pub const BYTES_PER_MB: f64 = 1024.0 * 1024.0;

/// Rate between two cumulative readings over `dt_secs`, with the interval
/// floored at [`MIN_DT_SECS`].
pub fn rate(prev: f64, cur: f64, dt_secs: f64) -> f64 {
    (cur - prev) / dt_secs.max(MIN_DT_SECS)
}

/// State for one cumulative counter source: previous value and timestamp.
///
/// Owned by the sampling engine, updated at every tick after the rate is
/// computed, never read outside the tick.
#[derive(Debug, Clone, Copy)]
pub struct RateCounter {
    prev_value: u64,
    prev_at: Instant,
}

impl RateCounter {
    /// Prime the counter with an initial snapshot. The first call to
    /// [`advance`](Self::advance) measures from here.
    pub fn new(initial: u64, at: Instant) -> Self {
        Self {
            prev_value: initial,
            prev_at: at,
        }
    }

    /// Rate in bytes/sec since the previous snapshot, then roll the state
    /// forward for the next tick.
    pub fn advance(&mut self, value: u64, at: Instant) -> f64 {
        let dt = at.saturating_duration_since(self.prev_at).as_secs_f64();
        let r = rate(self.prev_value as f64, value as f64, dt);
        self.prev_value = value;
        self.prev_at = at;
        r
    }

    /// Like [`advance`](Self::advance) but scaled to MB/s.
    pub fn advance_mb(&mut self, value: u64, at: Instant) -> f64 {
        self.advance(value, at) / BYTES_PER_MB
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    #[test]
    fn test_rate_over_two_seconds() {
        assert_eq!(rate(100.0, 150.0, 2.0), 25.0);
    }

    #[test]
    fn test_rate_zero_dt_is_floored() {
        let r = rate(0.0, 10.0, 0.0);
        assert!(r.is_finite());
        assert_eq!(r, 10.0 / MIN_DT_SECS);
    }

    #[test]
    fn test_counter_advance() {
        let t0 = Instant::now();
        let mut rc = RateCounter::new(100, t0);
        let r = rc.advance(150, t0 + Duration::from_secs(2));
        assert_eq!(r, 25.0);
    }

    #[test]
    fn test_counter_advance_same_instant_does_not_divide_by_zero() {
        let t0 = Instant::now();
        let mut rc = RateCounter::new(0, t0);
        let r = rc.advance(1, t0);
        assert!(r.is_finite());
    }

    #[test]
    fn test_counter_state_rolls_forward() {
        let t0 = Instant::now();
        let mut rc = RateCounter::new(0, t0);
        rc.advance(1000, t0 + Duration::from_secs(1));
        let r = rc.advance(3000, t0 + Duration::from_secs(2));
        assert_eq!(r, 2000.0);
    }

    #[test]
    fn test_counter_reset_yields_one_negative_tick() {
        let t0 = Instant::now();
        let mut rc = RateCounter::new(5000, t0);
        // Source restarted: cumulative value went backwards.
        let r = rc.advance(100, t0 + Duration::from_secs(1));
        assert!(r < 0.0);
        // Next tick is sane again.
        let r = rc.advance(200, t0 + Duration::from_secs(2));
        assert_eq!(r, 100.0);
    }

    #[test]
    fn test_mb_scaling() {
        let t0 = Instant::now();
        let mut rc = RateCounter::new(0, t0);
        let r = rc.advance_mb(50 * 1024 * 1024, t0 + Duration::from_secs(2));
        assert_eq!(r, 25.0);
    }
}
