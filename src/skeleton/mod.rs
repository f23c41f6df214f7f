//! Skeleton placeholders.
//!
//! - `component`: skeleton component trait and the placeholder it renders
//! - `visibility`: when to show a skeleton, with a minimum display time
//! - `renderer`: readiness/error/fallback state machine around a component

pub mod component;
pub mod renderer;
pub mod visibility;

// Re-export for convenience
pub use component::{
    BlockSkeleton, FlakySkeleton, Placeholder, RenderStrategy, SkeletonComponent, SkeletonId,
    SkeletonRef, PLACEHOLDER_LABEL, PLACEHOLDER_ROLE,
};
pub use renderer::{FallbackLedger, ResilientRenderer, SkeletonReadiness, DEFAULT_MAX_RETRIES};
pub use visibility::{
    show_skeleton, SkeletonDecision, SkeletonDisplayGate, SkeletonVisibilityPolicy,
    DEFAULT_MIN_DISPLAY,
};
