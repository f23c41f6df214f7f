//! Route transition state machine.
//!
//! States `Idle` and `Transitioning`. A navigation start enters
//! `Transitioning`; the router's settle signal for the current destination or
//! the settle timeout, whichever comes first, returns to `Idle`. Subscribers are called synchronously after
//! every state change, in registration order.

use super::history::{Direction, HistoryStack};
use crate::model::{NavigationAction, RouteKey};
use std::time::{Duration, Instant};
use tracing::debug;

/// Default upper bound on a transition without a settle signal.
pub const DEFAULT_SETTLE_TIMEOUT: Duration = Duration::from_millis(400);

/// Monotonic id of a navigation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NavigationId(pub u64);

/// Read model exposed to consumers.
///
/// `direction` keeps the last navigation's direction after settling so the
/// shell can slide the arriving content in from the right side.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TransitionState {
    pub is_transitioning: bool,
    pub direction: Direction,
    pub current_path: RouteKey,
}

/// Inputs to the state machine.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TransitionEvent {
    NavigationStarted {
        to: RouteKey,
        action: NavigationAction,
    },
    /// The router finished loading `to`. Ignored unless `to` is the
    /// current destination.
    NavigationSettled { to: RouteKey },
    /// Settle timer for the given navigation fired.
    SettleTimeout(NavigationId),
}

/// Handle returned by [`TransitionController::subscribe`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SubscriptionId(u64);

type Subscriber = Box<dyn FnMut(&TransitionState)>;

pub struct TransitionController {
    state: TransitionState,
    history: HistoryStack,
    settle_timeout: Duration,
    navigation: Option<NavigationId>,
    next_navigation: u64,
    settle_deadline: Option<(NavigationId, Instant)>,
    subscribers: Vec<(SubscriptionId, Subscriber)>,
    next_subscription: u64,
}

impl TransitionController {
    /// Start idle at `initial`.
    pub fn new(initial: RouteKey, settle_timeout: Duration) -> Self {
        Self {
            state: TransitionState {
                is_transitioning: false,
                direction: Direction::None,
                current_path: initial.clone(),
            },
            history: HistoryStack::new(initial),
            settle_timeout,
            navigation: None,
            next_navigation: 0,
            settle_deadline: None,
            subscribers: Vec::new(),
            next_subscription: 0,
        }
    }

    /// Apply an event at `now` and return the resulting read model.
    pub fn handle_event(&mut self, event: TransitionEvent, now: Instant) -> TransitionState {
        let changed = match event {
            TransitionEvent::NavigationStarted { to, action } => {
                self.start(to, action, now);
                true
            }
            TransitionEvent::NavigationSettled { to } => {
                if to == self.state.current_path {
                    self.settle("router")
                } else {
                    debug!(settled = %to, current = %self.state.current_path, "Ignoring settle for superseded navigation");
                    false
                }
            }
            TransitionEvent::SettleTimeout(id) => {
                if self.navigation == Some(id) {
                    self.settle("timeout")
                } else {
                    debug!(?id, current = ?self.navigation, "Ignoring stale settle timeout");
                    false
                }
            }
        };
        if changed {
            self.notify();
        }
        self.state.clone()
    }

    fn start(&mut self, to: RouteKey, action: NavigationAction, now: Instant) {
        let direction = self.history.navigate(&to, action);
        let id = NavigationId(self.next_navigation);
        self.next_navigation += 1;

        // Replacing the deadline cancels any timer from a superseded navigation.
        self.settle_deadline = Some((id, now + self.settle_timeout));
        self.navigation = Some(id);

        debug!(?id, from = %self.state.current_path, to = %to, ?direction, ?action, "Navigation started");
        self.state = TransitionState {
            is_transitioning: true,
            direction,
            current_path: to,
        };
    }

    fn settle(&mut self, cause: &'static str) -> bool {
        if !self.state.is_transitioning {
            return false;
        }
        self.settle_deadline = None;
        self.state.is_transitioning = false;
        debug!(navigation = ?self.navigation, path = %self.state.current_path, cause, "Navigation settled");
        true
    }

    /// Fire the settle timer if due. Returns the new state when it changed.
    pub fn tick(&mut self, now: Instant) -> Option<TransitionState> {
        let (id, deadline) = self.settle_deadline?;
        if now < deadline {
            return None;
        }
        self.settle_deadline = None;
        let before = self.state.is_transitioning;
        let state = self.handle_event(TransitionEvent::SettleTimeout(id), now);
        (before != state.is_transitioning).then_some(state)
    }

    /// Register a callback run after every state change.
    pub fn subscribe(&mut self, callback: impl FnMut(&TransitionState) + 'static) -> SubscriptionId {
        let id = SubscriptionId(self.next_subscription);
        self.next_subscription += 1;
        self.subscribers.push((id, Box::new(callback)));
        id
    }

    /// Remove a callback. Unknown ids are ignored.
    pub fn unsubscribe(&mut self, id: SubscriptionId) {
        self.subscribers.retain(|(sid, _)| *sid != id);
    }

    fn notify(&mut self) {
        let state = &self.state;
        for (_, callback) in self.subscribers.iter_mut() {
            callback(state);
        }
    }

    pub fn state(&self) -> &TransitionState {
        &self.state
    }

    pub fn is_transitioning(&self) -> bool {
        self.state.is_transitioning
    }

    /// Id of the latest navigation.
    pub fn navigation_id(&self) -> Option<NavigationId> {
        self.navigation
    }

    /// When the pending settle timer fires.
    pub fn next_deadline(&self) -> Option<Instant> {
        self.settle_deadline.map(|(_, at)| at)
    }

    pub fn history(&self) -> &HistoryStack {
        &self.history
    }

    pub fn settle_timeout(&self) -> Duration {
        self.settle_timeout
    }
}

impl std::fmt::Debug for TransitionController {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TransitionController")
            .field("state", &self.state)
            .field("navigation", &self.navigation)
            .field("settle_deadline", &self.settle_deadline)
            .field("subscribers", &self.subscribers.len())
            .finish()
    }
}

#[cfg(test)]
#[path = "controller_tests.rs"]
mod tests;
