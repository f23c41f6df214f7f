//! Per-page scroll restoration and tracking.
//!
//! One coordinator lives for the whole app shell; each mounted page owns at
//! most one subscription inside it. Attaching for a new page always detaches
//! (and flushes) the previous subscription first, so at most one listener is
//! ever active.

use super::locator::{DomWalkLocator, ScrollContainerLocator};
use super::store::ScrollPositionStore;
use super::throttle::ScrollThrottle;
use crate::dom::{DomNode, ListenerId, ListenerOptions};
use crate::model::{RouteKey, RouteMeta};
use std::time::{Duration, Instant};
use tracing::{debug, info, warn};

/// Why restoration did not move the scroll position.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SkipReason {
    /// No element on the page can scroll.
    NoScrollContainer,
    /// The route declared `no_scroll`.
    RouteOptedOut,
    /// The DOM refused the scroll (detached node, disposed document).
    ScrollFailed,
}

/// What restoration did for one navigation.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum RestoreOutcome {
    /// Route-level override offset applied.
    Explicit(f64),
    /// Saved offset from an earlier visit applied.
    Restored(f64),
    /// No saved offset (new view, or previously at top): scrolled to 0.
    Top,
    /// Nothing was scrolled.
    Skipped(SkipReason),
}

impl RestoreOutcome {
    /// The offset scrolled to, if any.
    pub fn offset(&self) -> Option<f64> {
        match self {
            RestoreOutcome::Explicit(o) | RestoreOutcome::Restored(o) => Some(*o),
            RestoreOutcome::Top => Some(0.0),
            RestoreOutcome::Skipped(_) => None,
        }
    }
}

#[derive(Debug)]
struct Subscription<N> {
    key: RouteKey,
    element: N,
    listener: Option<ListenerId>,
    throttle: ScrollThrottle,
}

/// Wires locator, store and a throttled passive scroll listener.
pub struct ScrollCoordinator<N: DomNode, L = DomWalkLocator> {
    store: ScrollPositionStore,
    locator: L,
    throttle_interval: Duration,
    active: Option<Subscription<N>>,
}

impl<N: DomNode, L: ScrollContainerLocator<N>> ScrollCoordinator<N, L> {
    /// Build a coordinator over an injected store.
    pub fn new(store: ScrollPositionStore, locator: L, throttle_interval: Duration) -> Self {
        Self {
            store,
            locator,
            throttle_interval,
            active: None,
        }
    }

    /// Restore scroll for a freshly mounted page and start tracking it.
    ///
    /// Any previous subscription is detached (with a final flush) first.
    pub fn attach(&mut self, root: &N, key: RouteKey, meta: &RouteMeta) -> RestoreOutcome {
        self.detach();

        let Some(element) = self.locator.locate(root) else {
            warn!(key = %key, "No scrollable container found, restoration skipped");
            return RestoreOutcome::Skipped(SkipReason::NoScrollContainer);
        };

        let outcome = self.restore(&element, &key, meta);
        if outcome == RestoreOutcome::Skipped(SkipReason::ScrollFailed) {
            return outcome;
        }

        let listener = match element.add_scroll_listener(ListenerOptions { passive: true }) {
            Ok(id) => Some(id),
            Err(error) => {
                warn!(key = %key, %error, "Failed to attach scroll listener");
                None
            }
        };

        info!(key = %key, node = %element.label(), ?outcome, "Scroll coordinator attached");
        self.active = Some(Subscription {
            key,
            element,
            listener,
            throttle: ScrollThrottle::new(self.throttle_interval),
        });
        outcome
    }

    fn restore(&self, element: &N, key: &RouteKey, meta: &RouteMeta) -> RestoreOutcome {
        if meta.no_scroll {
            debug!(key = %key, "Route opted out of scroll restoration");
            return RestoreOutcome::Skipped(SkipReason::RouteOptedOut);
        }

        let outcome = match meta.scroll_restoration {
            Some(offset) => RestoreOutcome::Explicit(offset),
            None => match self.store.get(key) {
                saved if saved > 0.0 => RestoreOutcome::Restored(saved),
                _ => RestoreOutcome::Top,
            },
        };

        let target = outcome.offset().unwrap_or(0.0);
        match element.scroll_to(target) {
            Ok(()) => outcome,
            Err(error) => {
                warn!(key = %key, %error, "Scroll restoration failed");
                RestoreOutcome::Skipped(SkipReason::ScrollFailed)
            }
        }
    }

    /// Scroll event from the active element. Writes at most once per interval.
    pub fn on_scroll(&mut self, now: Instant) {
        let fire = match self.active.as_mut() {
            Some(sub) if sub.listener.is_some() => sub.throttle.event(now),
            _ => false,
        };
        if fire {
            self.save_current();
        }
    }

    /// Release a due trailing save.
    pub fn tick(&mut self, now: Instant) {
        let fire = self
            .active
            .as_mut()
            .is_some_and(|sub| sub.throttle.tick(now));
        if fire {
            self.save_current();
        }
    }

    /// Stop tracking the current page: flush its final offset, cancel the
    /// pending trailing save, remove the listener.
    pub fn detach(&mut self) {
        let Some(mut sub) = self.active.take() else {
            return;
        };
        sub.throttle.cancel();
        if let Some(listener) = sub.listener.take() {
            match sub.element.scroll_top() {
                Ok(offset) => {
                    debug!(key = %sub.key, offset, "Flushing scroll offset on detach");
                    self.store.save(sub.key.clone(), offset);
                }
                Err(error) => warn!(key = %sub.key, %error, "Could not read final scroll offset"),
            }
            sub.element.remove_scroll_listener(listener);
        }
        debug!(key = %sub.key, "Scroll coordinator detached");
    }

    fn save_current(&mut self) {
        let Some(sub) = self.active.as_ref() else {
            return;
        };
        match sub.element.scroll_top() {
            Ok(offset) => {
                debug!(key = %sub.key, offset, "Saving scroll offset");
                self.store.save(sub.key.clone(), offset);
            }
            Err(error) => warn!(key = %sub.key, %error, "Could not read scroll offset"),
        }
    }

    /// Route currently tracked, if any.
    pub fn active_key(&self) -> Option<&RouteKey> {
        self.active.as_ref().map(|sub| &sub.key)
    }

    /// Element currently tracked, if any.
    pub fn active_element(&self) -> Option<&N> {
        self.active.as_ref().map(|sub| &sub.element)
    }

    /// Number of attached listeners: 0 or 1.
    pub fn listener_count(&self) -> usize {
        self.active
            .as_ref()
            .map_or(0, |sub| usize::from(sub.listener.is_some()))
    }

    /// When the pending trailing save becomes due.
    pub fn next_deadline(&self) -> Option<Instant> {
        self.active.as_ref().and_then(|sub| sub.throttle.deadline())
    }

    /// Read-only view of the store.
    pub fn store(&self) -> &ScrollPositionStore {
        &self.store
    }

    /// Forget the saved offset for one route.
    pub fn forget(&mut self, key: &RouteKey) {
        self.store.clear(key);
    }

    /// Forget every saved offset.
    pub fn forget_all(&mut self) {
        self.store.clear_all();
    }
}

#[cfg(test)]
#[path = "coordinator_tests.rs"]
mod tests;
