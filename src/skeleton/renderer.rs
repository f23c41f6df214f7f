//! Resilient placeholder renderer.
//!
//! Wraps one skeleton component with a readiness state machine that always
//! yields a placeholder:
//!
//! ```text
//! NotReady ──tick──▶ Ready ──render fails──▶ Errored ──retry (simpler)──▶ Ready
//!                      │                        │
//!                      └──── retries exhausted ─┴──▶ FallbackExhausted
//! ```
//!
//! Before the first post-mount tick, and after retries run out, the built-in
//! minimal placeholder is shown. Exhaustion is recorded in the session's
//! [`FallbackLedger`], so later instances for the same skeleton start
//! exhausted.

use super::component::{Placeholder, RenderStrategy, SkeletonId, SkeletonRef};
use crate::model::RenderError;
use std::cell::RefCell;
use std::collections::HashSet;
use std::rc::Rc;
use tracing::{debug, warn};

/// Default number of retries after the first failure.
pub const DEFAULT_MAX_RETRIES: u32 = 3;

/// Readiness of one renderer instance.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SkeletonReadiness {
    NotReady,
    Ready,
    Errored,
    FallbackExhausted,
}

/// Session-wide record of skeletons that exhausted their retries.
///
/// Cloning shares the same record.
#[derive(Debug, Clone, Default)]
pub struct FallbackLedger {
    exhausted: Rc<RefCell<HashSet<SkeletonId>>>,
}

impl FallbackLedger {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_exhausted(&self, id: &SkeletonId) -> bool {
        self.exhausted.borrow().contains(id)
    }

    pub fn mark_exhausted(&self, id: SkeletonId) {
        self.exhausted.borrow_mut().insert(id);
    }

    pub fn len(&self) -> usize {
        self.exhausted.borrow().len()
    }

    pub fn is_empty(&self) -> bool {
        self.exhausted.borrow().is_empty()
    }

    /// Forget every exhausted skeleton (new session).
    pub fn reset(&self) {
        self.exhausted.borrow_mut().clear();
    }
}

/// One mounted placeholder instance.
#[derive(Debug)]
pub struct ResilientRenderer {
    skeleton: SkeletonRef,
    ledger: FallbackLedger,
    readiness: SkeletonReadiness,
    strategy: RenderStrategy,
    failures: u32,
    max_retries: u32,
}

impl ResilientRenderer {
    /// Mount a renderer for `skeleton`.
    ///
    /// Starts `NotReady`, or `FallbackExhausted` if the ledger already lists
    /// this skeleton.
    pub fn new(skeleton: SkeletonRef, ledger: FallbackLedger, max_retries: u32) -> Self {
        let exhausted = ledger.is_exhausted(&skeleton.id);
        if exhausted {
            debug!(skeleton = %skeleton.id, "Skeleton exhausted earlier this session, using fallback");
        }
        Self {
            skeleton,
            ledger,
            readiness: if exhausted {
                SkeletonReadiness::FallbackExhausted
            } else {
                SkeletonReadiness::NotReady
            },
            strategy: if exhausted {
                RenderStrategy::Fallback
            } else {
                RenderStrategy::Animated
            },
            failures: 0,
            max_retries,
        }
    }

    /// First post-mount tick: `NotReady → Ready`. No effect otherwise.
    pub fn tick(&mut self) {
        if self.readiness == SkeletonReadiness::NotReady {
            self.readiness = SkeletonReadiness::Ready;
            debug!(skeleton = %self.skeleton.id, "Skeleton ready for enhanced rendering");
        }
    }

    /// Render the placeholder. Never fails.
    ///
    /// On a component failure the next simpler strategy is tried at once,
    /// until one succeeds or retries are exhausted.
    pub fn render(&mut self) -> Placeholder {
        loop {
            match self.readiness {
                SkeletonReadiness::NotReady | SkeletonReadiness::FallbackExhausted => {
                    return Placeholder::fallback();
                }
                SkeletonReadiness::Ready | SkeletonReadiness::Errored => {}
            }

            match self.skeleton.component.render(self.strategy) {
                Ok(body) => {
                    self.readiness = SkeletonReadiness::Ready;
                    return Placeholder::with_body(self.strategy, body);
                }
                Err(error) => self.fail(error),
            }
        }
    }

    /// A render callback reported failure after rendering.
    pub fn report_failure(&mut self) {
        if matches!(self.readiness, SkeletonReadiness::Ready) {
            let error = RenderError::Signalled {
                skeleton: self.skeleton.id.to_string(),
            };
            self.fail(error);
        }
    }

    fn fail(&mut self, error: RenderError) {
        self.failures += 1;
        warn!(
            skeleton = %self.skeleton.id,
            strategy = %self.strategy,
            failures = self.failures,
            %error,
            "Skeleton render failed"
        );

        if self.failures > self.max_retries {
            warn!(skeleton = %self.skeleton.id, "Skeleton retries exhausted, pinning fallback");
            self.readiness = SkeletonReadiness::FallbackExhausted;
            self.strategy = RenderStrategy::Fallback;
            self.ledger.mark_exhausted(self.skeleton.id.clone());
        } else {
            self.readiness = SkeletonReadiness::Errored;
            self.strategy = self.strategy.simpler();
        }
    }

    pub fn readiness(&self) -> SkeletonReadiness {
        self.readiness
    }

    /// Strategy the next render will try.
    pub fn strategy(&self) -> RenderStrategy {
        self.strategy
    }

    pub fn failures(&self) -> u32 {
        self.failures
    }

    pub fn skeleton_id(&self) -> &SkeletonId {
        &self.skeleton.id
    }
}

#[cfg(test)]
#[path = "renderer_tests.rs"]
mod tests;
