//! In-memory document.
//!
//! A small arena-backed element tree implementing [`DomNode`]. It models the
//! parts of a browser document the navigation core depends on: geometry,
//! computed overflow, scroll offsets, scroll listeners, and the failure modes
//! (broken style lookup, detached nodes, disposed document).

use super::{DomNode, ListenerId, ListenerOptions, Overflow};
use crate::model::DomError;
use std::cell::RefCell;
use std::rc::Rc;

/// Declarative description of an element subtree, used to build a [`Document`].
#[derive(Debug, Clone, Default)]
pub struct ElementSpec {
    tag: String,
    id: Option<String>,
    primary: bool,
    scroll_height: f64,
    client_height: f64,
    overflow: Overflow,
    broken_style: bool,
    children: Vec<ElementSpec>,
}

impl ElementSpec {
    pub fn new(tag: impl Into<String>) -> Self {
        Self {
            tag: tag.into(),
            ..Self::default()
        }
    }

    pub fn id(mut self, id: impl Into<String>) -> Self {
        self.id = Some(id.into());
        self
    }

    /// Tag as the page's primary content region.
    pub fn primary(mut self) -> Self {
        self.primary = true;
        self
    }

    /// Content height and visible height.
    pub fn heights(mut self, scroll_height: f64, client_height: f64) -> Self {
        self.scroll_height = scroll_height;
        self.client_height = client_height;
        self
    }

    pub fn overflow(mut self, overflow: Overflow) -> Self {
        self.overflow = overflow;
        self
    }

    /// Computed-style lookups on this element fail.
    pub fn broken_style(mut self) -> Self {
        self.broken_style = true;
        self
    }

    pub fn child(mut self, child: ElementSpec) -> Self {
        self.children.push(child);
        self
    }
}

#[derive(Debug)]
struct NodeData {
    tag: String,
    id: Option<String>,
    primary: bool,
    scroll_height: f64,
    client_height: f64,
    overflow: Overflow,
    broken_style: bool,
    detached: bool,
    scroll_top: f64,
    children: Vec<usize>,
}

#[derive(Debug, Default)]
struct DocState {
    nodes: Vec<NodeData>,
    listeners: Vec<(usize, ListenerId, ListenerOptions)>,
    next_listener: u64,
    disposed: bool,
}

impl DocState {
    fn push(&mut self, spec: ElementSpec) -> usize {
        let idx = self.nodes.len();
        self.nodes.push(NodeData {
            tag: spec.tag,
            id: spec.id,
            primary: spec.primary,
            scroll_height: spec.scroll_height,
            client_height: spec.client_height,
            overflow: spec.overflow,
            broken_style: spec.broken_style,
            detached: false,
            scroll_top: 0.0,
            children: Vec::new(),
        });
        let children: Vec<usize> = spec.children.into_iter().map(|c| self.push(c)).collect();
        self.nodes[idx].children = children;
        idx
    }

    fn label(&self, idx: usize) -> String {
        let node = &self.nodes[idx];
        match &node.id {
            Some(id) => format!("{}#{}", node.tag, id),
            None => node.tag.clone(),
        }
    }

    fn check_live(&self, idx: usize) -> Result<(), DomError> {
        if self.disposed || self.nodes[idx].detached {
            return Err(DomError::Detached {
                node: self.label(idx),
            });
        }
        Ok(())
    }
}

/// An in-memory document. Cloning shares the same tree.
#[derive(Debug, Clone)]
pub struct Document {
    state: Rc<RefCell<DocState>>,
}

impl Document {
    /// Build a document whose root element is described by `spec`.
    pub fn build(spec: ElementSpec) -> Self {
        let mut state = DocState::default();
        state.push(spec);
        Self {
            state: Rc::new(RefCell::new(state)),
        }
    }

    /// The root element.
    pub fn root(&self) -> Element {
        Element {
            state: Rc::clone(&self.state),
            idx: 0,
        }
    }

    /// First element with the given id, pre-order.
    pub fn get_element_by_id(&self, id: &str) -> Option<Element> {
        let state = self.state.borrow();
        state
            .nodes
            .iter()
            .position(|n| n.id.as_deref() == Some(id))
            .map(|idx| Element {
                state: Rc::clone(&self.state),
                idx,
            })
    }

    /// Number of scroll listeners attached anywhere in the document.
    pub fn listener_count(&self) -> usize {
        self.state.borrow().listeners.len()
    }

    /// Whether every attached listener is passive.
    pub fn all_listeners_passive(&self) -> bool {
        self.state.borrow().listeners.iter().all(|(_, _, o)| o.passive)
    }

    /// Tear the document down; every later style/scroll access fails.
    pub fn dispose(&self) {
        self.state.borrow_mut().disposed = true;
    }
}

/// Handle to one element of a [`Document`].
#[derive(Debug, Clone)]
pub struct Element {
    state: Rc<RefCell<DocState>>,
    idx: usize,
}

impl Element {
    /// Remove the element from its document. Later style/scroll access fails.
    pub fn detach(&self) {
        self.state.borrow_mut().nodes[self.idx].detached = true;
    }

    /// Change the content height, e.g. after more content rendered.
    pub fn set_scroll_height(&self, height: f64) {
        self.state.borrow_mut().nodes[self.idx].scroll_height = height;
    }

    /// Number of listeners attached to this element.
    pub fn listener_count(&self) -> usize {
        self.state
            .borrow()
            .listeners
            .iter()
            .filter(|(idx, _, _)| *idx == self.idx)
            .count()
    }
}

impl DomNode for Element {
    fn label(&self) -> String {
        self.state.borrow().label(self.idx)
    }

    fn is_primary_content(&self) -> bool {
        self.state.borrow().nodes[self.idx].primary
    }

    fn scroll_height(&self) -> f64 {
        self.state.borrow().nodes[self.idx].scroll_height
    }

    fn client_height(&self) -> f64 {
        self.state.borrow().nodes[self.idx].client_height
    }

    fn computed_overflow(&self) -> Result<Overflow, DomError> {
        let state = self.state.borrow();
        state.check_live(self.idx)?;
        let node = &state.nodes[self.idx];
        if node.broken_style {
            return Err(DomError::StyleUnavailable {
                node: state.label(self.idx),
                reason: "getComputedStyle threw".to_string(),
            });
        }
        Ok(node.overflow)
    }

    fn children(&self) -> Vec<Self> {
        let state = self.state.borrow();
        state.nodes[self.idx]
            .children
            .iter()
            .map(|&idx| Element {
                state: Rc::clone(&self.state),
                idx,
            })
            .collect()
    }

    fn scroll_top(&self) -> Result<f64, DomError> {
        let state = self.state.borrow();
        state.check_live(self.idx)?;
        Ok(state.nodes[self.idx].scroll_top)
    }

    fn scroll_to(&self, offset: f64) -> Result<(), DomError> {
        let mut state = self.state.borrow_mut();
        state.check_live(self.idx)?;
        if !offset.is_finite() {
            return Err(DomError::ScrollFailed {
                node: state.label(self.idx),
                offset,
                reason: "offset is not finite".to_string(),
            });
        }
        let node = &mut state.nodes[self.idx];
        let max = (node.scroll_height - node.client_height).max(0.0);
        node.scroll_top = offset.clamp(0.0, max);
        Ok(())
    }

    fn add_scroll_listener(&self, options: ListenerOptions) -> Result<ListenerId, DomError> {
        let mut state = self.state.borrow_mut();
        state.check_live(self.idx)?;
        let id = ListenerId(state.next_listener);
        state.next_listener += 1;
        state.listeners.push((self.idx, id, options));
        Ok(id)
    }

    fn remove_scroll_listener(&self, id: ListenerId) {
        self.state
            .borrow_mut()
            .listeners
            .retain(|(idx, lid, _)| !(*idx == self.idx && *lid == id));
    }

    fn same_node(&self, other: &Self) -> bool {
        Rc::ptr_eq(&self.state, &other.state) && self.idx == other.idx
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn page() -> Document {
        Document::build(
            ElementSpec::new("body").heights(600.0, 600.0).child(
                ElementSpec::new("main")
                    .id("content")
                    .primary()
                    .heights(3000.0, 600.0)
                    .overflow(Overflow::Auto),
            ),
        )
    }

    #[test]
    fn build_preserves_document_order() {
        let doc = page();
        let children = doc.root().children();
        assert_eq!(children.len(), 1);
        assert_eq!(children[0].label(), "main#content");
    }

    #[test]
    fn scroll_to_clamps_to_scrollable_range() {
        let doc = page();
        let main = doc.get_element_by_id("content").unwrap();
        main.scroll_to(5000.0).unwrap();
        assert_eq!(main.scroll_top().unwrap(), 2400.0);
        main.scroll_to(-10.0).unwrap();
        assert_eq!(main.scroll_top().unwrap(), 0.0);
    }

    #[test]
    fn scroll_to_rejects_non_finite_offset() {
        let doc = page();
        let main = doc.get_element_by_id("content").unwrap();
        assert!(matches!(
            main.scroll_to(f64::NAN),
            Err(DomError::ScrollFailed { .. })
        ));
    }

    #[test]
    fn broken_style_fails_lookup() {
        let doc = Document::build(ElementSpec::new("div").broken_style());
        assert!(matches!(
            doc.root().computed_overflow(),
            Err(DomError::StyleUnavailable { .. })
        ));
    }

    #[test]
    fn detached_node_fails_style_and_scroll() {
        let doc = page();
        let main = doc.get_element_by_id("content").unwrap();
        main.detach();
        assert!(matches!(main.computed_overflow(), Err(DomError::Detached { .. })));
        assert!(main.scroll_to(10.0).is_err());
    }

    #[test]
    fn disposed_document_fails_every_live_access() {
        let doc = page();
        let main = doc.get_element_by_id("content").unwrap();
        doc.dispose();
        assert!(main.scroll_top().is_err());
        assert!(main.add_scroll_listener(ListenerOptions::default()).is_err());
    }

    #[test]
    fn listeners_are_tracked_per_document() {
        let doc = page();
        let main = doc.get_element_by_id("content").unwrap();
        let id = main.add_scroll_listener(ListenerOptions::default()).unwrap();
        assert_eq!(doc.listener_count(), 1);
        assert_eq!(main.listener_count(), 1);
        main.remove_scroll_listener(id);
        assert_eq!(doc.listener_count(), 0);
    }

    #[test]
    fn removing_unknown_listener_is_ignored() {
        let doc = page();
        doc.root().remove_scroll_listener(ListenerId(99));
        assert_eq!(doc.listener_count(), 0);
    }

    #[test]
    fn same_node_compares_identity() {
        let doc = page();
        let a = doc.get_element_by_id("content").unwrap();
        let b = doc.root().children().remove(0);
        assert!(a.same_node(&b));
        assert!(!a.same_node(&doc.root()));
        let other = page();
        assert!(!a.same_node(&other.get_element_by_id("content").unwrap()));
    }
}
