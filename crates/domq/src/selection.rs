//! Selection - construction, re-scoping and iteration
//!
//! A selection is an ordered list of element ids plus the page they live
//! in. Operations that re-scope replace the list wholesale; operations that
//! mutate elements leave it alone. Nothing here fails on an empty list.

use std::fmt;

use domq_css::{SelectorList, query_children, query_selector_all};
use domq_dom::NodeId;

use crate::Page;

/// Chainable wrapper over matched elements
#[derive(Clone)]
pub struct Selection {
    pub(crate) page: Page,
    pub(crate) nodes: Vec<NodeId>,
}

impl Selection {
    /// Every element in `page` matching `selector`, in document order
    pub fn new(page: Page, selector: &str) -> Self {
        let nodes = match parse_selector(selector) {
            Some(selectors) => query_selector_all(page.document().tree(), NodeId::ROOT, &selectors),
            None => Vec::new(),
        };
        tracing::trace!(selector, count = nodes.len(), "select");
        Self { page, nodes }
    }

    /// Selection over explicit nodes
    pub fn from_nodes(page: Page, nodes: Vec<NodeId>) -> Self {
        Self { page, nodes }
    }

    pub fn page(&self) -> &Page {
        &self.page
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    /// Same as [`len`](Self::len)
    pub fn count(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    pub fn nodes(&self) -> &[NodeId] {
        &self.nodes
    }

    pub fn get(&self, index: usize) -> Option<NodeId> {
        self.nodes.get(index).copied()
    }

    pub(crate) fn first_node(&self) -> Option<NodeId> {
        self.nodes.first().copied()
    }

    fn replace(&mut self, op: &str, nodes: Vec<NodeId>) -> &mut Self {
        tracing::debug!(op, before = self.nodes.len(), after = nodes.len(), "re-scope");
        self.nodes = nodes;
        self
    }

    // ------------------------------------------------------------------
    // Re-scoping
    // ------------------------------------------------------------------

    /// Keep only the first element
    pub fn first(&mut self) -> &mut Self {
        match self.first_node() {
            Some(node) => self.replace("first", vec![node]),
            None => self,
        }
    }

    /// Keep only the last element
    pub fn last(&mut self) -> &mut Self {
        match self.nodes.last().copied() {
            Some(node) => self.replace("last", vec![node]),
            None => self,
        }
    }

    /// Direct children of the first element that match `selector`
    pub fn children(&mut self, selector: &str) -> &mut Self {
        let Some(first) = self.first_node() else {
            return self;
        };
        let nodes = match parse_selector(selector) {
            Some(selectors) => query_children(self.page.document().tree(), first, &selectors),
            None => Vec::new(),
        };
        self.replace("children", nodes)
    }

    /// Descendants of the first element that match `selector`
    pub fn find(&mut self, selector: &str) -> &mut Self {
        let Some(first) = self.first_node() else {
            return self;
        };
        let nodes = match parse_selector(selector) {
            Some(selectors) => query_selector_all(self.page.document().tree(), first, &selectors),
            None => Vec::new(),
        };
        self.replace("find", nodes)
    }

    /// Replace each element with its parent element. Elements without one
    /// stay where they are, so the length never changes.
    pub fn parent(&mut self) -> &mut Self {
        if self.nodes.is_empty() {
            return self;
        }
        let nodes = {
            let document = self.page.document();
            let tree = document.tree();
            self.nodes
                .iter()
                .map(|&node| tree.parent_element(node).unwrap_or(node))
                .collect()
        };
        self.replace("parent", nodes)
    }

    /// Keep elements matching `selector`
    pub fn filter(&mut self, selector: &str) -> &mut Self {
        if self.nodes.is_empty() {
            return self;
        }
        let nodes = match parse_selector(selector) {
            Some(selectors) => {
                let document = self.page.document();
                self.nodes
                    .iter()
                    .copied()
                    .filter(|&node| selectors.matches(document.tree(), node))
                    .collect()
            }
            None => Vec::new(),
        };
        self.replace("filter", nodes)
    }

    /// Keep elements whose text contains `needle`
    pub fn includes(&mut self, needle: &str) -> &mut Self {
        self.retain_text("includes", |text| text.contains(needle))
    }

    /// Keep elements whose text is exactly `expected`
    pub fn text_is(&mut self, expected: &str) -> &mut Self {
        self.retain_text("text_is", |text| text == expected)
    }

    fn retain_text<P: Fn(&str) -> bool>(&mut self, op: &str, predicate: P) -> &mut Self {
        if self.nodes.is_empty() {
            return self;
        }
        let nodes = {
            let document = self.page.document();
            self.nodes
                .iter()
                .copied()
                .filter(|&node| predicate(&document.tree().text_content(node)))
                .collect()
        };
        self.replace(op, nodes)
    }

    // ------------------------------------------------------------------
    // Iteration
    // ------------------------------------------------------------------

    /// Call `f` once per element, in order. No document borrow is held
    /// while `f` runs.
    pub fn each<F: FnMut(NodeId)>(&mut self, mut f: F) -> &mut Self {
        for &node in &self.nodes {
            f(node);
        }
        self
    }

    pub fn iter(&self) -> impl Iterator<Item = NodeId> + '_ {
        self.nodes.iter().copied()
    }
}

impl fmt::Debug for Selection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Selection").field("nodes", &self.nodes).finish()
    }
}

impl<'a> IntoIterator for &'a Selection {
    type Item = NodeId;
    type IntoIter = std::iter::Copied<std::slice::Iter<'a, NodeId>>;

    fn into_iter(self) -> Self::IntoIter {
        self.nodes.iter().copied()
    }
}

fn parse_selector(selector: &str) -> Option<SelectorList> {
    match SelectorList::parse(selector) {
        Ok(selectors) => Some(selectors),
        Err(e) => {
            tracing::warn!("Invalid selector {:?}: {}", selector, e);
            None
        }
    }
}
