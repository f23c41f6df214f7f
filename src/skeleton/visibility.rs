//! Skeleton visibility.
//!
//! `show = route declares skeleton AND (navigation in flight OR page asked for it)`
//!
//! Router loading alone misses client-side waits after settle; the page flag
//! alone misses the gap between click and router dispatch. Their OR covers
//! both. [`SkeletonDisplayGate`] then holds a shown skeleton for a minimum
//! duration so fast navigations do not flash.

use super::component::SkeletonRef;
use crate::model::{NavigationState, RouteKey, RouteMeta};
use crate::transition::TransitionState;
use std::collections::HashSet;
use std::time::{Duration, Instant};

/// Default minimum time a shown skeleton stays on screen.
pub const DEFAULT_MIN_DISPLAY: Duration = Duration::from_millis(200);

/// The pure visibility rule.
pub fn show_skeleton(route_declares_skeleton: bool, navigation_in_flight: bool, page_loading: bool) -> bool {
    route_declares_skeleton && (navigation_in_flight || page_loading)
}

/// Derived visibility plus the skeleton to show.
#[derive(Debug, Clone)]
pub struct SkeletonDecision {
    pub show: bool,
    pub skeleton: Option<SkeletonRef>,
}

/// Tracks the policy inputs and recomputes on every change.
#[derive(Debug, Clone)]
pub struct SkeletonVisibilityPolicy {
    router_state: NavigationState,
    transitioning: bool,
    destination: RouteKey,
    skeleton: Option<SkeletonRef>,
    page_loading: HashSet<RouteKey>,
}

impl SkeletonVisibilityPolicy {
    pub fn new(initial: RouteKey) -> Self {
        Self {
            router_state: NavigationState::Idle,
            transitioning: false,
            destination: initial,
            skeleton: None,
            page_loading: HashSet::new(),
        }
    }

    /// Read the controller's state and the destination route's metadata.
    pub fn observe_transition(&mut self, state: &TransitionState, meta: &RouteMeta) -> SkeletonDecision {
        self.transitioning = state.is_transitioning;
        if self.destination != state.current_path {
            self.destination = state.current_path.clone();
        }
        self.skeleton = meta.skeleton.clone();
        self.decision()
    }

    pub fn set_router_state(&mut self, router_state: NavigationState) -> SkeletonDecision {
        self.router_state = router_state;
        self.decision()
    }

    /// Per-route override asserted by a page.
    pub fn set_page_loading(&mut self, route: RouteKey, loading: bool) -> SkeletonDecision {
        if loading {
            self.page_loading.insert(route);
        } else {
            self.page_loading.remove(&route);
        }
        self.decision()
    }

    pub fn navigation_in_flight(&self) -> bool {
        self.transitioning || self.router_state.is_in_flight()
    }

    pub fn page_loading(&self) -> bool {
        self.page_loading.contains(&self.destination)
    }

    pub fn decision(&self) -> SkeletonDecision {
        SkeletonDecision {
            show: show_skeleton(
                self.skeleton.is_some(),
                self.navigation_in_flight(),
                self.page_loading(),
            ),
            skeleton: self.skeleton.clone(),
        }
    }

    pub fn destination(&self) -> &RouteKey {
        &self.destination
    }
}

/// Holds a visible skeleton for at least `min_display`.
///
/// Showing is immediate. Hiding before the minimum elapsed is deferred until
/// `tick` passes the deadline.
#[derive(Debug, Clone)]
pub struct SkeletonDisplayGate {
    min_display: Duration,
    shown_since: Option<Instant>,
    release_pending: bool,
}

impl SkeletonDisplayGate {
    pub fn new(min_display: Duration) -> Self {
        Self {
            min_display,
            shown_since: None,
            release_pending: false,
        }
    }

    /// Feed the raw policy signal; returns whether the skeleton is visible.
    pub fn update(&mut self, show: bool, now: Instant) -> bool {
        match (show, self.shown_since) {
            (true, None) => {
                self.shown_since = Some(now);
                self.release_pending = false;
            }
            (true, Some(_)) => self.release_pending = false,
            (false, Some(since)) => {
                if now.saturating_duration_since(since) >= self.min_display {
                    self.hide();
                } else {
                    self.release_pending = true;
                }
            }
            (false, None) => {}
        }
        self.is_visible()
    }

    /// Release a deferred hide. Returns `true` if visibility changed.
    pub fn tick(&mut self, now: Instant) -> bool {
        match self.deadline() {
            Some(deadline) if now >= deadline => {
                self.hide();
                true
            }
            _ => false,
        }
    }

    fn hide(&mut self) {
        self.shown_since = None;
        self.release_pending = false;
    }

    /// Drop the skeleton at once, ignoring the minimum. Used when the
    /// destination has no skeleton to hold.
    pub fn reset(&mut self) {
        self.hide();
    }

    pub fn is_visible(&self) -> bool {
        self.shown_since.is_some()
    }

    /// When a deferred hide takes effect.
    pub fn deadline(&self) -> Option<Instant> {
        match (self.release_pending, self.shown_since) {
            (true, Some(since)) => Some(since + self.min_display),
            _ => None,
        }
    }
}

impl Default for SkeletonDisplayGate {
    fn default() -> Self {
        Self::new(DEFAULT_MIN_DISPLAY)
    }
}
