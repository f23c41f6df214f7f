//! Scrollable container lookup.
//!
//! Finds the single element that owns scroll position for the current page.

use crate::dom::DomNode;
use tracing::{debug, warn};

/// Strategy for locating the page's scroll owner.
pub trait ScrollContainerLocator<N: DomNode> {
    /// The element whose scroll offset should be saved and restored, or `None`
    /// when the page has nothing scrollable (restoration is then a no-op).
    fn locate(&self, root: &N) -> Option<N>;
}

/// Default locator walking the element tree.
///
/// 1. Fast path: the element tagged as primary content, if it overflows.
/// 2. Depth-first pre-order search from `root` for the first element that
///    overflows and whose computed overflow is not `hidden`.
/// 3. `None`.
///
/// An element whose style lookup fails is treated as non-scrollable; its
/// children are still searched.
#[derive(Debug, Clone, Copy, Default)]
pub struct DomWalkLocator;

impl<N: DomNode> ScrollContainerLocator<N> for DomWalkLocator {
    fn locate(&self, root: &N) -> Option<N> {
        if let Some(primary) = root.find_primary_content() {
            if primary.overflows() {
                debug!(node = %primary.label(), "Primary content region owns scroll");
                return Some(primary);
            }
        }

        let mut stack = vec![root.clone()];
        while let Some(node) = stack.pop() {
            if node.overflows() {
                match node.computed_overflow() {
                    Ok(overflow) if overflow.allows_scroll() => {
                        debug!(node = %node.label(), ?overflow, "Found scroll container");
                        return Some(node);
                    }
                    Ok(_) => {}
                    Err(error) => {
                        warn!(node = %node.label(), %error, "Style lookup failed, treating node as non-scrollable");
                    }
                }
            }
            // Reverse so the first child is popped first (pre-order).
            stack.extend(node.children().into_iter().rev());
        }

        None
    }
}

/// Locator that always answers with a preset element.
///
/// Lets hosts pin the scroll owner explicitly, and lets tests drive the
/// coordinator without building a realistic tree.
#[derive(Debug, Clone)]
pub struct FixedLocator<N> {
    node: Option<N>,
}

impl<N> FixedLocator<N> {
    pub fn new(node: Option<N>) -> Self {
        Self { node }
    }
}

impl<N: DomNode> ScrollContainerLocator<N> for FixedLocator<N> {
    fn locate(&self, _root: &N) -> Option<N> {
        self.node.clone()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dom::{Document, ElementSpec, Overflow};

    fn locate_label(doc: &Document) -> Option<String> {
        DomWalkLocator.locate(&doc.root()).map(|n| n.label())
    }

    #[test]
    fn primary_region_that_overflows_wins_immediately() {
        let doc = Document::build(
            ElementSpec::new("body")
                .child(
                    ElementSpec::new("aside")
                        .id("sidebar")
                        .heights(900.0, 300.0)
                        .overflow(Overflow::Auto),
                )
                .child(
                    ElementSpec::new("main")
                        .id("content")
                        .primary()
                        .heights(2000.0, 600.0)
                        .overflow(Overflow::Auto),
                ),
        );
        assert_eq!(locate_label(&doc).as_deref(), Some("main#content"));
    }

    #[test]
    fn primary_region_wins_even_with_hidden_overflow() {
        let doc = Document::build(
            ElementSpec::new("body").child(
                ElementSpec::new("main")
                    .primary()
                    .heights(2000.0, 600.0)
                    .overflow(Overflow::Hidden),
            ),
        );
        assert_eq!(locate_label(&doc).as_deref(), Some("main"));
    }

    #[test]
    fn non_overflowing_primary_falls_back_to_generic_search() {
        let doc = Document::build(
            ElementSpec::new("body")
                .child(ElementSpec::new("main").primary().heights(400.0, 600.0))
                .child(
                    ElementSpec::new("div")
                        .id("feed")
                        .heights(5000.0, 600.0)
                        .overflow(Overflow::Scroll),
                ),
        );
        assert_eq!(locate_label(&doc).as_deref(), Some("div#feed"));
    }

    #[test]
    fn hidden_overflow_is_skipped() {
        let doc = Document::build(
            ElementSpec::new("body")
                .child(
                    ElementSpec::new("div")
                        .id("clipped")
                        .heights(900.0, 300.0)
                        .overflow(Overflow::Hidden),
                )
                .child(
                    ElementSpec::new("div")
                        .id("list")
                        .heights(900.0, 300.0)
                        .overflow(Overflow::Auto),
                ),
        );
        assert_eq!(locate_label(&doc).as_deref(), Some("div#list"));
    }

    #[test]
    fn ties_break_by_preorder_document_order() {
        let doc = Document::build(
            ElementSpec::new("body")
                .child(
                    ElementSpec::new("div").id("outer").child(
                        ElementSpec::new("div")
                            .id("nested")
                            .heights(800.0, 200.0)
                            .overflow(Overflow::Auto),
                    ),
                )
                .child(
                    ElementSpec::new("div")
                        .id("sibling")
                        .heights(800.0, 200.0)
                        .overflow(Overflow::Auto),
                ),
        );
        assert_eq!(locate_label(&doc).as_deref(), Some("div#nested"));
    }

    #[test]
    fn root_itself_can_be_the_container() {
        let doc = Document::build(
            ElementSpec::new("html")
                .heights(4000.0, 800.0)
                .overflow(Overflow::Auto),
        );
        assert_eq!(locate_label(&doc).as_deref(), Some("html"));
    }

    #[test]
    fn style_failure_does_not_abort_search_and_descends_into_children() {
        let doc = Document::build(
            ElementSpec::new("body").child(
                ElementSpec::new("div")
                    .id("broken")
                    .heights(900.0, 300.0)
                    .broken_style()
                    .child(
                        ElementSpec::new("div")
                            .id("inner")
                            .heights(700.0, 300.0)
                            .overflow(Overflow::Auto),
                    ),
            ),
        );
        assert_eq!(locate_label(&doc).as_deref(), Some("div#inner"));
    }

    #[test]
    fn disposed_document_yields_none() {
        let doc = Document::build(
            ElementSpec::new("body")
                .heights(900.0, 300.0)
                .overflow(Overflow::Auto),
        );
        doc.dispose();
        assert_eq!(locate_label(&doc), None);
    }

    #[test]
    fn nothing_scrollable_yields_none() {
        let doc = Document::build(
            ElementSpec::new("body")
                .heights(600.0, 600.0)
                .child(ElementSpec::new("p").heights(20.0, 20.0)),
        );
        assert_eq!(locate_label(&doc), None);
    }

    #[test]
    fn fixed_locator_returns_preset_node() {
        let doc = Document::build(ElementSpec::new("body").child(ElementSpec::new("div").id("x")));
        let target = doc.get_element_by_id("x").unwrap();
        let locator = FixedLocator::new(Some(target.clone()));
        let found = locator.locate(&doc.root()).unwrap();
        assert!(found.same_node(&target));
        assert!(FixedLocator::<crate::dom::Element>::new(None)
            .locate(&doc.root())
            .is_none());
    }
}
