//! Route metadata provider.
//!
//! For a given route the host declares whether the shell may touch scroll
//! position, an optional explicit restore offset, and the skeleton shown while
//! the route loads.

use super::RouteKey;
use crate::skeleton::SkeletonRef;

/// Per-route metadata consumed by the scroll coordinator and skeleton policy.
#[derive(Debug, Clone, Default)]
pub struct RouteMeta {
    /// Leave scroll position untouched on arrival.
    pub no_scroll: bool,
    /// Always reopen the route at this offset, ignoring saved positions.
    pub scroll_restoration: Option<f64>,
    /// Placeholder shown while this route loads. `None` = no skeleton.
    pub skeleton: Option<SkeletonRef>,
}

impl RouteMeta {
    /// Whether the route declares a skeleton at all.
    pub fn declares_skeleton(&self) -> bool {
        self.skeleton.is_some()
    }
}

/// Source of route metadata.
pub trait RouteMetadataProvider {
    /// Metadata for `key`. Unknown routes get `RouteMeta::default()`.
    fn meta(&self, key: &RouteKey) -> RouteMeta;
}

/// Ordered pattern table: first matching pattern wins.
///
/// Pattern segments: a literal, `:name` (any single segment) or a trailing `*`
/// (any remainder, including nothing). Patterns match the pathname only.
#[derive(Debug, Clone, Default)]
pub struct RouteTable {
    routes: Vec<(String, RouteMeta)>,
}

impl RouteTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register `meta` for `pattern`. Re-registering a pattern replaces it in place.
    pub fn insert(&mut self, pattern: impl Into<String>, meta: RouteMeta) {
        let pattern = pattern.into();
        if let Some(slot) = self.routes.iter_mut().find(|(p, _)| *p == pattern) {
            slot.1 = meta;
        } else {
            self.routes.push((pattern, meta));
        }
    }

    /// Builder-style `insert`.
    pub fn with(mut self, pattern: impl Into<String>, meta: RouteMeta) -> Self {
        self.insert(pattern, meta);
        self
    }

    pub fn len(&self) -> usize {
        self.routes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.routes.is_empty()
    }
}

impl RouteMetadataProvider for RouteTable {
    fn meta(&self, key: &RouteKey) -> RouteMeta {
        self.routes
            .iter()
            .find(|(pattern, _)| pattern_matches(pattern, key.pathname()))
            .map(|(_, meta)| meta.clone())
            .unwrap_or_default()
    }
}

/// Whether a route pattern matches `pathname`.
pub(crate) fn pattern_matches(pattern: &str, pathname: &str) -> bool {
    let mut path = pathname.split('/').filter(|s| !s.is_empty());
    for segment in pattern.split('/').filter(|s| !s.is_empty()) {
        if segment == "*" {
            return true;
        }
        match path.next() {
            Some(actual) if segment.starts_with(':') || segment == actual => {}
            _ => return false,
        }
    }
    path.next().is_none()
}
