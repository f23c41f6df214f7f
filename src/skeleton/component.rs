//! Skeleton components and the placeholder they produce.

use crate::model::RenderError;
use std::cell::Cell;
use std::fmt;
use std::rc::Rc;

/// Landmark role every placeholder exposes to assistive technology.
pub const PLACEHOLDER_ROLE: &str = "status";

/// Accessible label every placeholder exposes.
pub const PLACEHOLDER_LABEL: &str = "Loading content";

/// Rendering strategies, fanciest first.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum RenderStrategy {
    /// Full animated skeleton (shimmer etc.).
    Animated,
    /// Static skeleton with the component's styling classes.
    StaticClassed,
    /// Minimal untyped box, still produced by the component.
    MinimalBox,
    /// Built-in static placeholder; never calls the component.
    Fallback,
}

impl RenderStrategy {
    /// Next simpler component strategy. `MinimalBox` is the floor; only the
    /// renderer itself switches to `Fallback`.
    pub fn simpler(self) -> Self {
        match self {
            RenderStrategy::Animated => RenderStrategy::StaticClassed,
            RenderStrategy::StaticClassed | RenderStrategy::MinimalBox => RenderStrategy::MinimalBox,
            RenderStrategy::Fallback => RenderStrategy::Fallback,
        }
    }
}

impl fmt::Display for RenderStrategy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            RenderStrategy::Animated => "animated",
            RenderStrategy::StaticClassed => "static",
            RenderStrategy::MinimalBox => "minimal-box",
            RenderStrategy::Fallback => "fallback",
        };
        f.write_str(name)
    }
}

/// Identifier of a skeleton shape (e.g. `"product-grid"`).
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct SkeletonId(String);

impl SkeletonId {
    pub fn new(raw: impl Into<String>) -> Self {
        Self(raw.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for SkeletonId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// A route's placeholder shape, external to the navigation core.
pub trait SkeletonComponent: fmt::Debug {
    /// Produce the placeholder body for `strategy`.
    fn render(&self, strategy: RenderStrategy) -> Result<String, RenderError>;
}

/// Named handle to a skeleton component, as declared in route metadata.
#[derive(Debug, Clone)]
pub struct SkeletonRef {
    pub id: SkeletonId,
    pub component: Rc<dyn SkeletonComponent>,
}

impl SkeletonRef {
    pub fn new(id: impl Into<String>, component: impl SkeletonComponent + 'static) -> Self {
        Self {
            id: SkeletonId::new(id),
            component: Rc::new(component),
        }
    }

    /// Share a component the caller keeps a handle to.
    pub fn shared(id: impl Into<String>, component: Rc<dyn SkeletonComponent>) -> Self {
        Self {
            id: SkeletonId::new(id),
            component,
        }
    }
}

/// What the page shows in place of real content.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Placeholder {
    pub role: &'static str,
    pub label: &'static str,
    pub busy: bool,
    pub strategy: RenderStrategy,
    pub body: String,
}

impl Placeholder {
    /// The built-in minimal static placeholder.
    pub fn fallback() -> Self {
        Self::with_body(RenderStrategy::Fallback, "<div class=\"skeleton-fallback\"></div>".to_string())
    }

    pub(crate) fn with_body(strategy: RenderStrategy, body: String) -> Self {
        Self {
            role: PLACEHOLDER_ROLE,
            label: PLACEHOLDER_LABEL,
            busy: true,
            strategy,
            body,
        }
    }

    /// Whether this is the built-in minimal placeholder.
    pub fn is_fallback(&self) -> bool {
        self.strategy == RenderStrategy::Fallback
    }
}

/// Simple block skeleton: `lines` grey bars.
#[derive(Debug, Clone)]
pub struct BlockSkeleton {
    lines: usize,
}

impl BlockSkeleton {
    pub fn new(lines: usize) -> Self {
        Self { lines }
    }
}

impl SkeletonComponent for BlockSkeleton {
    fn render(&self, strategy: RenderStrategy) -> Result<String, RenderError> {
        let bar = match strategy {
            RenderStrategy::Animated => "<span class=\"bar shimmer\"></span>",
            RenderStrategy::StaticClassed => "<span class=\"bar\"></span>",
            RenderStrategy::MinimalBox | RenderStrategy::Fallback => return Ok("<div></div>".to_string()),
        };
        Ok(bar.repeat(self.lines.max(1)))
    }
}

/// Wraps a component and makes its next `n` renders fail.
///
/// Used to exercise the fallback ladder from scripts and tests.
#[derive(Debug)]
pub struct FlakySkeleton<C> {
    id: String,
    inner: C,
    remaining_failures: Cell<u32>,
}

impl<C: SkeletonComponent> FlakySkeleton<C> {
    pub fn new(id: impl Into<String>, inner: C, failures: u32) -> Self {
        Self {
            id: id.into(),
            inner,
            remaining_failures: Cell::new(failures),
        }
    }

    /// Queue `n` more failures.
    pub fn fail_next(&self, n: u32) {
        self.remaining_failures
            .set(self.remaining_failures.get().saturating_add(n));
    }

    pub fn remaining_failures(&self) -> u32 {
        self.remaining_failures.get()
    }
}

impl<C: SkeletonComponent> SkeletonComponent for FlakySkeleton<C> {
    fn render(&self, strategy: RenderStrategy) -> Result<String, RenderError> {
        let remaining = self.remaining_failures.get();
        if remaining > 0 {
            self.remaining_failures.set(remaining - 1);
            return Err(RenderError::Component {
                skeleton: self.id.clone(),
                reason: format!("forced failure rendering {strategy}"),
            });
        }
        self.inner.render(strategy)
    }
}
