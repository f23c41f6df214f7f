//! Router signal types.
//!
//! These mirror what the host router exposes: its pending state, the kind of
//! history operation behind a navigation, and the start/settle events.

use super::RouteKey;
use serde::Deserialize;

/// Router-level pending state.
///
/// `Loading` and `Submitting` both count as a navigation in flight.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum NavigationState {
    #[default]
    Idle,
    Loading,
    Submitting,
}

impl NavigationState {
    /// True for every non-idle state.
    pub fn is_in_flight(self) -> bool {
        !matches!(self, NavigationState::Idle)
    }
}

/// History operation behind a navigation.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum NavigationAction {
    /// New history entry (link click, programmatic navigate).
    #[default]
    Push,
    /// Back/forward button.
    Pop,
    /// Current entry replaced in place.
    Replace,
}

/// Events emitted by the router signal source.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RouterEvent {
    /// A navigation towards `to` began.
    NavigationStarted {
        to: RouteKey,
        action: NavigationAction,
    },
    /// The router's pending state changed.
    StateChanged(NavigationState),
    /// The router finished loading `to`.
    NavigationSettled { to: RouteKey },
}
