//! Route transition tracking (pure).
//!
//! All state transitions are explicit events; time enters only through the
//! `now` argument, so the state machine is testable without a browser.

pub mod controller;
pub mod history;

// Re-export for convenience
pub use controller::{
    NavigationId, SubscriptionId, TransitionController, TransitionEvent, TransitionState,
    DEFAULT_SETTLE_TIMEOUT,
};
pub use history::{Direction, HistoryStack};
