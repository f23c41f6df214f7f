//! Scroll-save throttle.
//!
//! Leading + trailing: the first event of an idle window fires at once, later
//! events inside the window collapse into a single trailing fire released by
//! `tick` when the window closes. At most one fire per interval.

use std::time::{Duration, Instant};

/// Default interval between store writes.
pub const DEFAULT_THROTTLE_INTERVAL: Duration = Duration::from_millis(100);

#[derive(Debug, Clone)]
pub struct ScrollThrottle {
    interval: Duration,
    last_fire: Option<Instant>,
    pending: bool,
}

impl ScrollThrottle {
    pub fn new(interval: Duration) -> Self {
        Self {
            interval,
            last_fire: None,
            pending: false,
        }
    }

    fn window_open(&self, now: Instant) -> bool {
        self.last_fire
            .is_some_and(|at| now.saturating_duration_since(at) < self.interval)
    }

    /// Record a scroll event. Returns `true` if the caller should write now.
    pub fn event(&mut self, now: Instant) -> bool {
        if self.window_open(now) {
            self.pending = true;
            false
        } else {
            self.last_fire = Some(now);
            self.pending = false;
            true
        }
    }

    /// Release the trailing fire once the window has closed.
    pub fn tick(&mut self, now: Instant) -> bool {
        if self.pending && !self.window_open(now) {
            self.pending = false;
            self.last_fire = Some(now);
            true
        } else {
            false
        }
    }

    /// When the pending trailing fire becomes due.
    pub fn deadline(&self) -> Option<Instant> {
        match (self.pending, self.last_fire) {
            (true, Some(at)) => Some(at + self.interval),
            _ => None,
        }
    }

    /// Drop any pending trailing fire.
    pub fn cancel(&mut self) {
        self.pending = false;
    }

    pub fn has_pending(&self) -> bool {
        self.pending
    }

    pub fn interval(&self) -> Duration {
        self.interval
    }
}

impl Default for ScrollThrottle {
    fn default() -> Self {
        Self::new(DEFAULT_THROTTLE_INTERVAL)
    }
}
