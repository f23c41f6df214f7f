//! Accessibility announcements.
//!
//! The shell pushes short status strings into an [`Announcer`]; nothing is
//! acknowledged. [`LiveRegion`] models a polite live region that clears its
//! text after a quiet period so the same message can be announced again.

use std::collections::VecDeque;
use std::time::{Duration, Instant};
use tracing::debug;

/// Announced when a skeleton becomes visible.
pub const LOADING_MESSAGE: &str = "Loading content";

/// Announced when real content mounts.
pub const LOADED_MESSAGE: &str = "Content loaded";

/// Default delay before a live region clears its message.
pub const DEFAULT_CLEAR_AFTER: Duration = Duration::from_millis(1000);

/// Announcements a region keeps before dropping the oldest.
pub const HISTORY_LIMIT: usize = 64;

/// Fire-and-forget sink for status messages.
pub trait Announcer {
    fn announce(&mut self, message: &str, now: Instant);

    /// Advance timers. Sinks without timers ignore this.
    fn tick(&mut self, _now: Instant) {}
}

/// One message as it was announced.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Announcement {
    pub message: String,
    pub at: Instant,
}

/// `aria-live="polite"` region.
#[derive(Debug, Clone)]
pub struct LiveRegion {
    clear_after: Duration,
    current: Option<String>,
    clear_at: Option<Instant>,
    history: VecDeque<Announcement>,
}

impl LiveRegion {
    pub fn new(clear_after: Duration) -> Self {
        Self {
            clear_after,
            current: None,
            clear_at: None,
            history: VecDeque::new(),
        }
    }

    pub fn politeness(&self) -> &'static str {
        "polite"
    }

    /// Text currently exposed to assistive technology.
    pub fn current(&self) -> Option<&str> {
        self.current.as_deref()
    }

    /// Announcements not yet taken, oldest first. Holds at most
    /// [`HISTORY_LIMIT`] entries.
    pub fn history(&self) -> &VecDeque<Announcement> {
        &self.history
    }

    /// Drain the announcements made since the last call.
    pub fn take_announcements(&mut self) -> Vec<Announcement> {
        self.history.drain(..).collect()
    }

    pub fn deadline(&self) -> Option<Instant> {
        self.clear_at
    }
}

impl Default for LiveRegion {
    fn default() -> Self {
        Self::new(DEFAULT_CLEAR_AFTER)
    }
}

impl Announcer for LiveRegion {
    fn announce(&mut self, message: &str, now: Instant) {
        debug!(message, "Live region announcement");
        self.current = Some(message.to_string());
        // Each announcement restarts the quiet period.
        self.clear_at = Some(now + self.clear_after);
        if self.history.len() == HISTORY_LIMIT {
            self.history.pop_front();
        }
        self.history.push_back(Announcement {
            message: message.to_string(),
            at: now,
        });
    }

    fn tick(&mut self, now: Instant) {
        if self.clear_at.is_some_and(|at| now >= at) {
            self.current = None;
            self.clear_at = None;
        }
    }
}

/// Announcer that shares its region with an outside observer.
///
/// The shell owns its announcer; the binary and tests keep a second handle
/// to read what was said.
#[derive(Debug, Clone, Default)]
pub struct SharedLiveRegion {
    inner: std::rc::Rc<std::cell::RefCell<LiveRegion>>,
}

impl SharedLiveRegion {
    pub fn new(clear_after: Duration) -> Self {
        Self {
            inner: std::rc::Rc::new(std::cell::RefCell::new(LiveRegion::new(clear_after))),
        }
    }

    pub fn current(&self) -> Option<String> {
        self.inner.borrow().current().map(str::to_string)
    }

    pub fn messages(&self) -> Vec<String> {
        self.inner
            .borrow()
            .history()
            .iter()
            .map(|a| a.message.clone())
            .collect()
    }

    /// Drain messages announced since the last call.
    pub fn take_messages(&self) -> Vec<String> {
        self.inner
            .borrow_mut()
            .take_announcements()
            .into_iter()
            .map(|a| a.message)
            .collect()
    }
}

impl Announcer for SharedLiveRegion {
    fn announce(&mut self, message: &str, now: Instant) {
        self.inner.borrow_mut().announce(message, now);
    }

    fn tick(&mut self, now: Instant) {
        self.inner.borrow_mut().tick(now);
    }
}
