//! Single-threaded timer queue driving sampling ticks, animation frames and
//! hover debounce checks.
//!
//! There is one control flow; "concurrency" is simulated by draining due
//! entries in order. Entries fire in deadline order, ties in scheduling
//! (FIFO) order, and every entry is cancellable by the handle returned at
//! scheduling time, so a newer request can retract a stale one without side
//! effects.

use std::cmp::Ordering;
use std::collections::{BinaryHeap, HashSet};
use std::time::{Duration, Instant};

/// Identity of a scheduled entry, used for cancellation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct TimerHandle(u64);

#[derive(Debug)]
struct Entry<E> {
    deadline: Instant,
    seq: u64,
    id: u64,
    event: E,
}

// Min-heap ordering on (deadline, seq); the event payload is not compared.
impl<E> PartialEq for Entry<E> {
    fn eq(&self, other: &Self) -> bool {
        self.deadline == other.deadline && self.seq == other.seq
    }
}

impl<E> Eq for Entry<E> {}

impl<E> PartialOrd for Entry<E> {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl<E> Ord for Entry<E> {
    fn cmp(&self, other: &Self) -> Ordering {
        // Reversed: BinaryHeap is a max-heap, we want the earliest first.
        (other.deadline, other.seq).cmp(&(self.deadline, self.seq))
    }
}

/// Deterministic timer queue over event payloads of type `E`.
#[derive(Debug)]
pub struct TimerQueue<E> {
    heap: BinaryHeap<Entry<E>>,
    cancelled: HashSet<u64>,
    next_id: u64,
}

impl<E> TimerQueue<E> {
    pub fn new() -> Self {
        Self {
            heap: BinaryHeap::new(),
            cancelled: HashSet::new(),
            next_id: 0,
        }
    }

    /// Schedule `event` to fire `delay` after `now`.
    pub fn schedule(&mut self, now: Instant, delay: Duration, event: E) -> TimerHandle {
        self.schedule_at(now + delay, event)
    }

    /// Schedule `event` at an absolute deadline.
    pub fn schedule_at(&mut self, deadline: Instant, event: E) -> TimerHandle {
        let id = self.next_id;
        self.next_id += 1;
        self.heap.push(Entry {
            deadline,
            seq: id,
            id,
            event,
        });
        TimerHandle(id)
    }

    /// Retract a pending entry. Returns false if it already fired or was
    /// cancelled before.
    pub fn cancel(&mut self, handle: TimerHandle) -> bool {
        if self.heap.iter().any(|e| e.id == handle.0) {
            self.cancelled.insert(handle.0)
        } else {
            false
        }
    }

    /// Earliest pending deadline, skipping cancelled entries.
    pub fn next_deadline(&mut self) -> Option<Instant> {
        self.drop_cancelled_head();
        self.heap.peek().map(|e| e.deadline)
    }

    /// Pop the next entry due at or before `now`, in (deadline, FIFO) order.
    pub fn pop_due(&mut self, now: Instant) -> Option<E> {
        loop {
            self.drop_cancelled_head();
            match self.heap.peek() {
                Some(e) if e.deadline <= now => {}
                _ => return None,
            }
            if let Some(e) = self.heap.pop() {
                return Some(e.event);
            }
        }
    }

    pub fn is_empty(&mut self) -> bool {
        self.next_deadline().is_none()
    }

    fn drop_cancelled_head(&mut self) {
        while let Some(e) = self.heap.peek() {
            if self.cancelled.remove(&e.id) {
                self.heap.pop();
            } else {
                break;
            }
        }
    }
}

impl<E> Default for TimerQueue<E> {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn drain<E>(q: &mut TimerQueue<E>, now: Instant) -> Vec<E> {
        let mut out = Vec::new();
        while let Some(e) = q.pop_due(now) {
            out.push(e);
        }
        out
    }

    #[test]
    fn test_fires_in_deadline_order() {
        let t0 = Instant::now();
        let mut q = TimerQueue::new();
        q.schedule(t0, Duration::from_millis(20), "b");
        q.schedule(t0, Duration::from_millis(10), "a");
        q.schedule(t0, Duration::from_millis(30), "c");
        assert_eq!(drain(&mut q, t0 + Duration::from_millis(40)), vec!["a", "b", "c"]);
    }

    #[test]
    fn test_same_deadline_fires_fifo() {
        let t0 = Instant::now();
        let mut q = TimerQueue::new();
        for name in ["first", "second", "third"] {
            q.schedule(t0, Duration::from_millis(10), name);
        }
        assert_eq!(
            drain(&mut q, t0 + Duration::from_millis(10)),
            vec!["first", "second", "third"]
        );
    }

    #[test]
    fn test_nothing_due_before_deadline() {
        let t0 = Instant::now();
        let mut q = TimerQueue::new();
        q.schedule(t0, Duration::from_millis(50), "later");
        assert!(q.pop_due(t0 + Duration::from_millis(10)).is_none());
        assert_eq!(q.next_deadline(), Some(t0 + Duration::from_millis(50)));
    }

    #[test]
    fn test_cancel_retracts_entry() {
        let t0 = Instant::now();
        let mut q = TimerQueue::new();
        let keep = q.schedule(t0, Duration::from_millis(10), "keep");
        let drop = q.schedule(t0, Duration::from_millis(10), "drop");
        assert!(q.cancel(drop));
        let _ = keep;
        assert_eq!(drain(&mut q, t0 + Duration::from_millis(10)), vec!["keep"]);
    }

    #[test]
    fn test_cancel_fired_entry_is_noop() {
        let t0 = Instant::now();
        let mut q = TimerQueue::new();
        let h = q.schedule(t0, Duration::from_millis(1), "x");
        assert_eq!(q.pop_due(t0 + Duration::from_millis(1)), Some("x"));
        assert!(!q.cancel(h));
    }

    #[test]
    fn test_cancelled_head_skipped_by_next_deadline() {
        let t0 = Instant::now();
        let mut q = TimerQueue::new();
        let h = q.schedule(t0, Duration::from_millis(5), "a");
        q.schedule(t0, Duration::from_millis(10), "b");
        q.cancel(h);
        assert_eq!(q.next_deadline(), Some(t0 + Duration::from_millis(10)));
    }
}
