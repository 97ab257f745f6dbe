//! Autosave debouncing and the clock it runs on.
//!
//! A [`Debouncer`] holds at most one pending deadline. Every
//! [`request`](Debouncer::request) replaces the deadline with `now + delay`,
//! so a burst of requests fires once, `delay` after the last one. The host
//! loop calls [`poll`](Debouncer::poll) regularly; the debouncer never
//! spawns timers of its own.
//!
//! Time comes from a [`MonotonicClock`]. [`SystemClock`] is backed by
//! [`Instant`]; [`ManualClock`] is advanced by hand so tests can step
//! through a debounce window deterministically.

use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::Instant;

/// Milliseconds elapsed since an arbitrary, fixed origin.
pub trait MonotonicClock: Send + Sync {
    /// Current time in milliseconds. Never decreases.
    fn now_ms(&self) -> u64;
}

/// Wall-clock time measured from the moment the clock was created.
#[derive(Debug, Clone, Copy)]
pub struct SystemClock {
    origin: Instant,
}

impl SystemClock {
    /// Start a clock at zero.
    pub fn new() -> Self {
        Self {
            origin: Instant::now(),
        }
    }
}

impl Default for SystemClock {
    fn default() -> Self {
        Self::new()
    }
}

impl MonotonicClock for SystemClock {
    fn now_ms(&self) -> u64 {
        u64::try_from(self.origin.elapsed().as_millis()).unwrap_or(u64::MAX)
    }
}

/// A clock that only moves when told to.
///
/// Clones share the same time, so a test can keep one handle while the
/// code under test owns another.
#[derive(Debug, Clone, Default)]
pub struct ManualClock {
    now: Arc<AtomicU64>,
}

impl ManualClock {
    /// A clock stopped at zero.
    pub fn new() -> Self {
        Self::default()
    }

    /// Move the clock forward by `ms` milliseconds.
    pub fn advance(&self, ms: u64) {
        let _ = self
            .now
            .fetch_update(Ordering::SeqCst, Ordering::SeqCst, |t| {
                Some(t.saturating_add(ms))
            });
    }
}

impl MonotonicClock for ManualClock {
    fn now_ms(&self) -> u64 {
        self.now.load(Ordering::SeqCst)
    }
}

/// Coalesces repeated requests into a single delayed firing.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Debouncer {
    delay_ms: u64,
    deadline: Option<u64>,
}

impl Debouncer {
    /// A debouncer that fires `delay_ms` after the latest request.
    pub const fn new(delay_ms: u64) -> Self {
        Self {
            delay_ms,
            deadline: None,
        }
    }

    /// The configured quiet period.
    pub const fn delay_ms(&self) -> u64 {
        self.delay_ms
    }

    /// Start or restart the quiet period at `now_ms`.
    pub const fn request(&mut self, now_ms: u64) {
        self.deadline = Some(now_ms.saturating_add(self.delay_ms));
    }

    /// When the pending request will fire, if any.
    pub const fn deadline(&self) -> Option<u64> {
        self.deadline
    }

    /// Whether a request is waiting to fire.
    pub const fn is_pending(&self) -> bool {
        self.deadline.is_some()
    }

    /// Drop any pending request.
    pub const fn cancel(&mut self) {
        self.deadline = None;
    }

    /// Returns `true` exactly once when the pending deadline has passed.
    pub const fn poll(&mut self, now_ms: u64) -> bool {
        match self.deadline {
            Some(deadline) if now_ms >= deadline => {
                self.deadline = None;
                true
            }
            _ => false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn burst_fires_once_from_last_request() {
        let clock = ManualClock::new();
        let mut debouncer = Debouncer::new(750);
        let mut fired = 0_u32;

        debouncer.request(clock.now_ms());
        clock.advance(300);
        debouncer.request(clock.now_ms());
        clock.advance(300);
        debouncer.request(clock.now_ms());

        // 749 ms after the last request: still quiet.
        clock.advance(749);
        if debouncer.poll(clock.now_ms()) {
            fired = fired.saturating_add(1);
        }
        assert_eq!(fired, 0);

        clock.advance(1);
        if debouncer.poll(clock.now_ms()) {
            fired = fired.saturating_add(1);
        }
        clock.advance(5_000);
        if debouncer.poll(clock.now_ms()) {
            fired = fired.saturating_add(1);
        }
        assert_eq!(fired, 1);
        assert!(!debouncer.is_pending());
    }

    #[test]
    fn request_resets_rather_than_stacks() {
        let mut debouncer = Debouncer::new(100);
        debouncer.request(0);
        debouncer.request(50);
        assert_eq!(debouncer.deadline(), Some(150));
        assert!(!debouncer.poll(100));
        assert!(debouncer.poll(150));
    }

    #[test]
    fn cancel_drops_pending_request() {
        let mut debouncer = Debouncer::new(10);
        debouncer.request(0);
        debouncer.cancel();
        assert!(!debouncer.poll(1_000));
    }

    #[test]
    fn manual_clock_clones_share_time() {
        let clock = ManualClock::new();
        let handle = clock.clone();
        handle.advance(42);
        assert_eq!(clock.now_ms(), 42);
    }

    #[test]
    fn system_clock_is_monotonic() {
        let clock = SystemClock::new();
        let a = clock.now_ms();
        let b = clock.now_ms();
        assert!(b >= a);
    }
}
