//! Page content region abstraction.
//!
//! The navigation core never touches a concrete DOM. It sees the page through
//! [`DomNode`], a handle to one element. `dom::memory` provides the in-memory
//! document used by the script runner and the tests.

pub mod memory;

pub use memory::{Document, Element, ElementSpec};

use crate::model::DomError;

/// Computed `overflow-y` of an element.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, serde::Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Overflow {
    #[default]
    Visible,
    Hidden,
    Auto,
    Scroll,
}

impl Overflow {
    /// Whether content beyond the box can be scrolled into view.
    pub fn allows_scroll(self) -> bool {
        !matches!(self, Overflow::Hidden)
    }
}

/// Identifier of an attached scroll listener.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ListenerId(pub u64);

/// Options passed when attaching a scroll listener.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ListenerOptions {
    /// Listener never blocks the platform's own scroll handling.
    pub passive: bool,
}

impl Default for ListenerOptions {
    fn default() -> Self {
        Self { passive: true }
    }
}

/// Handle to one element of the page.
///
/// Handles are cheap to clone and compare by identity via [`DomNode::same_node`].
/// Every fallible accessor returns `Result` so callers see DOM failures in the
/// signature instead of through unwinding.
pub trait DomNode: Clone {
    /// Short human-readable label (`tag#id`) for diagnostics.
    fn label(&self) -> String;

    /// Whether this element is tagged as the page's primary content region.
    fn is_primary_content(&self) -> bool;

    /// Total content height.
    fn scroll_height(&self) -> f64;

    /// Visible height.
    fn client_height(&self) -> f64;

    /// Computed overflow; fails for detached nodes or a disposed document.
    fn computed_overflow(&self) -> Result<Overflow, DomError>;

    /// Child elements in document order.
    fn children(&self) -> Vec<Self>;

    /// Current vertical scroll offset.
    fn scroll_top(&self) -> Result<f64, DomError>;

    /// Scroll vertically to `offset`.
    fn scroll_to(&self, offset: f64) -> Result<(), DomError>;

    /// Attach a scroll listener.
    fn add_scroll_listener(&self, options: ListenerOptions) -> Result<ListenerId, DomError>;

    /// Detach a listener. Unknown ids are ignored.
    fn remove_scroll_listener(&self, id: ListenerId);

    /// Identity comparison.
    fn same_node(&self, other: &Self) -> bool;

    /// Whether content overflows the visible box.
    fn overflows(&self) -> bool {
        self.scroll_height() > self.client_height()
    }

    /// First element tagged as primary content, depth-first pre-order from `self`.
    fn find_primary_content(&self) -> Option<Self> {
        if self.is_primary_content() {
            return Some(self.clone());
        }
        self.children()
            .iter()
            .find_map(|child| child.find_primary_content())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn only_hidden_overflow_blocks_scroll() {
        assert!(Overflow::Visible.allows_scroll());
        assert!(Overflow::Auto.allows_scroll());
        assert!(Overflow::Scroll.allows_scroll());
        assert!(!Overflow::Hidden.allows_scroll());
    }

    #[test]
    fn listeners_are_passive_by_default() {
        assert!(ListenerOptions::default().passive);
    }

    #[test]
    fn find_primary_content_uses_preorder() {
        let doc = Document::build(
            ElementSpec::new("body")
                .child(ElementSpec::new("div").child(ElementSpec::new("main").id("first").primary()))
                .child(ElementSpec::new("main").id("second").primary()),
        );
        let found = doc.root().find_primary_content().expect("primary region");
        assert_eq!(found.label(), "main#first");
    }
}
