//! App shell.
//!
//! Wires the navigation resilience layer in control-flow order:
//!
//! ```text
//! router event ─▶ TransitionController ─▶ SkeletonVisibilityPolicy ─▶ display gate
//!                                                        │
//!                          ┌─────────────────────────────┴──────────────┐
//!                          ▼                                            ▼
//!               ResilientRenderer(skeleton)                real content mounted
//!                                                                       │
//!                                                  ScrollCoordinator attach/detach
//! ```
//!
//! Every recomputation happens synchronously inside the call that caused it,
//! so [`AppShell::frame`] never observes a stale visibility value.

use crate::announce::{Announcer, DEFAULT_CLEAR_AFTER, LOADED_MESSAGE, LOADING_MESSAGE};
use crate::dom::DomNode;
use crate::model::{RouteKey, RouteMetadataProvider, RouterEvent};
use crate::scroll::{
    DomWalkLocator, RestoreOutcome, ScrollContainerLocator, ScrollCoordinator,
    ScrollPositionStore, DEFAULT_CAPACITY, DEFAULT_THROTTLE_INTERVAL,
};
use crate::skeleton::{
    FallbackLedger, Placeholder, ResilientRenderer, SkeletonDisplayGate, SkeletonRef,
    SkeletonVisibilityPolicy, DEFAULT_MAX_RETRIES, DEFAULT_MIN_DISPLAY,
};
use crate::transition::{
    Direction, SubscriptionId, TransitionController, TransitionEvent, TransitionState,
    DEFAULT_SETTLE_TIMEOUT,
};
use std::time::{Duration, Instant};
use tracing::{debug, info};

/// Tunables for one shell instance.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ShellConfig {
    pub scroll_store_capacity: usize,
    pub settle_timeout: Duration,
    pub scroll_throttle: Duration,
    pub skeleton_min_display: Duration,
    pub announcement_clear: Duration,
    pub max_render_retries: u32,
}

impl Default for ShellConfig {
    fn default() -> Self {
        Self {
            scroll_store_capacity: DEFAULT_CAPACITY,
            settle_timeout: DEFAULT_SETTLE_TIMEOUT,
            scroll_throttle: DEFAULT_THROTTLE_INTERVAL,
            skeleton_min_display: DEFAULT_MIN_DISPLAY,
            announcement_clear: DEFAULT_CLEAR_AFTER,
            max_render_retries: DEFAULT_MAX_RETRIES,
        }
    }
}

/// What the page shell displays right now.
#[derive(Debug, Clone, PartialEq)]
pub enum ShellFrame {
    /// Placeholder for the destination route.
    Skeleton {
        key: RouteKey,
        placeholder: Placeholder,
    },
    /// Real content of `key`, sliding in from `direction`.
    Content { key: RouteKey, direction: Direction },
}

impl ShellFrame {
    pub fn key(&self) -> &RouteKey {
        match self {
            ShellFrame::Skeleton { key, .. } | ShellFrame::Content { key, .. } => key,
        }
    }

    pub fn is_skeleton(&self) -> bool {
        matches!(self, ShellFrame::Skeleton { .. })
    }
}

pub struct AppShell<N: DomNode, L = DomWalkLocator> {
    config: ShellConfig,
    controller: TransitionController,
    coordinator: ScrollCoordinator<N, L>,
    policy: SkeletonVisibilityPolicy,
    gate: SkeletonDisplayGate,
    ledger: FallbackLedger,
    renderer: Option<ResilientRenderer>,
    routes: Box<dyn RouteMetadataProvider>,
    announcer: Box<dyn Announcer>,
    skeleton_visible: bool,
    mounted: Option<RouteKey>,
}

impl<N: DomNode, L: ScrollContainerLocator<N>> AppShell<N, L> {
    /// Build the shell idle at `initial`.
    ///
    /// The scroll store is created here and handed to the coordinator; it
    /// lives exactly as long as the shell.
    pub fn new(
        config: ShellConfig,
        initial: RouteKey,
        routes: impl RouteMetadataProvider + 'static,
        locator: L,
        announcer: impl Announcer + 'static,
    ) -> Self {
        let store = ScrollPositionStore::with_capacity(config.scroll_store_capacity);
        info!(
            initial = %initial,
            capacity = store.capacity(),
            settle_ms = config.settle_timeout.as_millis() as u64,
            throttle_ms = config.scroll_throttle.as_millis() as u64,
            "App shell created"
        );
        Self {
            controller: TransitionController::new(initial.clone(), config.settle_timeout),
            coordinator: ScrollCoordinator::new(store, locator, config.scroll_throttle),
            policy: SkeletonVisibilityPolicy::new(initial),
            gate: SkeletonDisplayGate::new(config.skeleton_min_display),
            ledger: FallbackLedger::new(),
            renderer: None,
            routes: Box::new(routes),
            announcer: Box::new(announcer),
            skeleton_visible: false,
            mounted: None,
            config,
        }
    }

    /// Feed one router signal and return the resulting frame.
    pub fn handle_router_event(&mut self, event: RouterEvent, now: Instant) -> ShellFrame {
        match event {
            RouterEvent::NavigationStarted { to, action } => {
                // Unmount first: the old page's final offset must be flushed
                // under its own key before anything attaches for the new one.
                self.unmount_content();
                self.controller
                    .handle_event(TransitionEvent::NavigationStarted { to, action }, now);
            }
            RouterEvent::StateChanged(state) => {
                self.policy.set_router_state(state);
            }
            RouterEvent::NavigationSettled { to } => {
                self.controller
                    .handle_event(TransitionEvent::NavigationSettled { to }, now);
            }
        }
        self.refresh(now);
        self.frame()
    }

    /// A page asserts (or withdraws) its own loading signal.
    pub fn set_page_loading(&mut self, route: RouteKey, loading: bool, now: Instant) -> ShellFrame {
        self.policy.set_page_loading(route, loading);
        self.refresh(now);
        self.frame()
    }

    /// Real content for the current route mounted under `root`.
    ///
    /// Returns `None` while a skeleton is displayed; there is nothing to
    /// restore into yet.
    pub fn content_mounted(&mut self, root: &N, now: Instant) -> Option<RestoreOutcome> {
        if self.skeleton_visible {
            debug!(key = %self.current_path(), "Content mount ignored while skeleton is visible");
            return None;
        }
        let key = self.current_path().clone();
        let meta = self.routes.meta(&key);
        let outcome = self.coordinator.attach(root, key.clone(), &meta);
        self.mounted = Some(key);
        self.announcer.announce(LOADED_MESSAGE, now);
        Some(outcome)
    }

    /// Scroll event from the mounted page.
    pub fn on_scroll(&mut self, now: Instant) {
        self.coordinator.on_scroll(now);
    }

    /// Advance every timer to `now` and return the resulting frame.
    pub fn tick(&mut self, now: Instant) -> ShellFrame {
        // Renderers created during this tick wait for the next one.
        if let Some(renderer) = self.renderer.as_mut() {
            renderer.tick();
        }
        if self.controller.tick(now).is_some() {
            self.refresh(now);
        }
        if self.gate.tick(now) {
            self.apply_visibility(false, None, now);
        }
        self.coordinator.tick(now);
        self.announcer.tick(now);
        self.frame()
    }

    /// A skeleton render callback reported failure.
    pub fn report_skeleton_failure(&mut self) {
        if let Some(renderer) = self.renderer.as_mut() {
            renderer.report_failure();
        }
    }

    /// Current frame. Renders the placeholder when a skeleton is visible.
    pub fn frame(&mut self) -> ShellFrame {
        let key = self.current_path().clone();
        if self.skeleton_visible {
            let placeholder = self
                .renderer
                .as_mut()
                .map_or_else(Placeholder::fallback, ResilientRenderer::render);
            ShellFrame::Skeleton { key, placeholder }
        } else {
            ShellFrame::Content {
                key,
                direction: self.controller.state().direction,
            }
        }
    }

    fn refresh(&mut self, now: Instant) {
        let state = self.controller.state().clone();
        let meta = self.routes.meta(&state.current_path);
        let decision = self.policy.observe_transition(&state, &meta);
        let visible = match decision.skeleton {
            Some(_) => self.gate.update(decision.show, now),
            None => {
                self.gate.reset();
                false
            }
        };
        self.apply_visibility(visible, decision.skeleton, now);
    }

    fn apply_visibility(&mut self, visible: bool, skeleton: Option<SkeletonRef>, now: Instant) {
        match (visible, skeleton) {
            (true, Some(skeleton)) => {
                if !self.skeleton_visible {
                    self.unmount_content();
                    self.announcer.announce(LOADING_MESSAGE, now);
                    debug!(key = %self.current_path(), skeleton = %skeleton.id, "Skeleton shown");
                }
                let stale = self
                    .renderer
                    .as_ref()
                    .is_none_or(|r| r.skeleton_id() != &skeleton.id);
                if stale {
                    self.renderer = Some(ResilientRenderer::new(
                        skeleton,
                        self.ledger.clone(),
                        self.config.max_render_retries,
                    ));
                }
                self.skeleton_visible = true;
            }
            _ => {
                if self.skeleton_visible {
                    debug!(key = %self.current_path(), "Skeleton hidden");
                }
                self.renderer = None;
                self.skeleton_visible = false;
            }
        }
    }

    fn unmount_content(&mut self) {
        if let Some(key) = self.mounted.take() {
            debug!(key = %key, "Unmounting content");
        }
        self.coordinator.detach();
    }

    fn current_path(&self) -> &RouteKey {
        &self.controller.state().current_path
    }

    /// Register a callback run after every transition state change.
    pub fn subscribe_transitions(
        &mut self,
        callback: impl FnMut(&TransitionState) + 'static,
    ) -> SubscriptionId {
        self.controller.subscribe(callback)
    }

    pub fn unsubscribe_transitions(&mut self, id: SubscriptionId) {
        self.controller.unsubscribe(id);
    }

    pub fn transition_state(&self) -> &TransitionState {
        self.controller.state()
    }

    pub fn skeleton_visible(&self) -> bool {
        self.skeleton_visible
    }

    /// Route whose content is mounted, if any.
    pub fn mounted(&self) -> Option<&RouteKey> {
        self.mounted.as_ref()
    }

    pub fn scroll_store(&self) -> &ScrollPositionStore {
        self.coordinator.store()
    }

    /// Attached scroll listeners: 0 or 1.
    pub fn listener_count(&self) -> usize {
        self.coordinator.listener_count()
    }

    pub fn ledger(&self) -> &FallbackLedger {
        &self.ledger
    }

    pub fn config(&self) -> &ShellConfig {
        &self.config
    }

    /// Earliest pending timer across controller, gate and coordinator.
    pub fn next_deadline(&self) -> Option<Instant> {
        [
            self.controller.next_deadline(),
            self.gate.deadline(),
            self.coordinator.next_deadline(),
        ]
        .into_iter()
        .flatten()
        .min()
    }
}

impl<N: DomNode, L> std::fmt::Debug for AppShell<N, L> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AppShell")
            .field("controller", &self.controller)
            .field("skeleton_visible", &self.skeleton_visible)
            .field("mounted", &self.mounted)
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
#[path = "shell_tests.rs"]
mod tests;
