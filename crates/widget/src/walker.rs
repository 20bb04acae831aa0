//! Depth-first traversal over widget trees.
//!
//! The walker hands out elements in document (pre-order) order. Before
//! moving on, the caller decides whether the element just handed out
//! should be descended into or skipped as a whole, which lets an
//! extractor claim a subtree once it has recognized it.

use goalsync_core::{WidgetElement, WidgetNode};

/// What to do with the children of the element just visited.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Visit {
    /// Descend into the children
    #[default]
    Descend,
    /// Skip the children and continue with the next sibling subtree
    Skip,
}

/// Explicit-stack pre-order walker over the elements of a widget tree.
///
/// Text leaves are never visited; they stay reachable through the
/// children of their parent. Components are passed through without
/// being visited.
#[derive(Debug, Clone)]
pub struct ElementWalker<'a> {
    /// Nodes still to visit, next on top
    stack: Vec<&'a WidgetNode>,
    /// Root handed out first when walking from an element
    root: Option<&'a WidgetElement>,
    /// Last visited element whose children have not been scheduled yet
    pending: Option<&'a WidgetElement>,
}

impl<'a> ElementWalker<'a> {
    /// Walk the tree rooted at `node`.
    pub fn new(node: &'a WidgetNode) -> Self {
        Self {
            stack: vec![node],
            root: None,
            pending: None,
        }
    }

    /// Walk the tree rooted at an element, starting with the element itself.
    pub fn from_element(element: &'a WidgetElement) -> Self {
        Self {
            stack: Vec::new(),
            root: Some(element),
            pending: None,
        }
    }

    /// Advance to the next element.
    ///
    /// `visit` applies to the element returned by the previous call.
    pub fn next_with(&mut self, visit: Visit) -> Option<&'a WidgetElement> {
        if let Some(element) = self.pending.take() {
            if visit == Visit::Descend {
                self.push_children(&element.children);
            }
        }

        if let Some(root) = self.root.take() {
            self.pending = Some(root);
            return Some(root);
        }

        while let Some(node) = self.stack.pop() {
            match node {
                WidgetNode::Text(_) => {}
                WidgetNode::Component(component) => self.push_children(&component.children),
                WidgetNode::Element(element) => {
                    self.pending = Some(element);
                    return Some(element);
                }
            }
        }

        None
    }

    fn push_children(&mut self, children: &'a [WidgetNode]) {
        self.stack.extend(children.iter().rev());
    }
}

impl<'a> Iterator for ElementWalker<'a> {
    type Item = &'a WidgetElement;

    /// Unrestricted traversal: every element is descended into.
    fn next(&mut self) -> Option<Self::Item> {
        self.next_with(Visit::Descend)
    }
}

/// Walk `node`, asking `visitor` after each element whether to descend.
pub fn walk<'a, F>(node: &'a WidgetNode, mut visitor: F)
where
    F: FnMut(&'a WidgetElement) -> Visit,
{
    let mut walker = ElementWalker::new(node);
    let mut visit = Visit::Descend;
    while let Some(element) = walker.next_with(visit) {
        visit = visitor(element);
    }
}
