//! Scroll position restoration.
//!
//! - `locator`: find the element that owns scrolling on a page
//! - `store`: bounded route → offset cache
//! - `throttle`: rate-limit for scroll-save writes
//! - `coordinator`: per-page attach/restore/track/detach lifecycle

pub mod coordinator;
pub mod locator;
pub mod store;
pub mod throttle;

// Re-export for convenience
pub use coordinator::{RestoreOutcome, ScrollCoordinator, SkipReason};
pub use locator::{DomWalkLocator, FixedLocator, ScrollContainerLocator};
pub use store::{ScrollPositionStore, ScrollRecord, DEFAULT_CAPACITY};
pub use throttle::{ScrollThrottle, DEFAULT_THROTTLE_INTERVAL};
