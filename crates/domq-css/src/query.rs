//! Element queries
//!
//! querySelector / querySelectorAll scoped to a subtree, plus a
//! children-only variant.

use domq_dom::{DomTree, NodeId};

use crate::{SelectorError, SelectorList};

/// Matching element descendants of `scope`, in document order.
/// `scope` itself is never part of the result.
pub fn query_selector_all(tree: &DomTree, scope: NodeId, selectors: &SelectorList) -> Vec<NodeId> {
    let found: Vec<NodeId> = tree
        .descendants(scope)
        .filter(|(_, node)| node.is_element())
        .map(|(id, _)| id)
        .filter(|&id| selectors.matches(tree, id))
        .collect();
    tracing::trace!(?scope, matched = found.len(), "query_selector_all");
    found
}

/// First matching element descendant of `scope`
pub fn query_selector(tree: &DomTree, scope: NodeId, selectors: &SelectorList) -> Option<NodeId> {
    tree.descendants(scope)
        .filter(|(_, node)| node.is_element())
        .map(|(id, _)| id)
        .find(|&id| selectors.matches(tree, id))
}

/// Direct element children of `parent` that match
pub fn query_children(tree: &DomTree, parent: NodeId, selectors: &SelectorList) -> Vec<NodeId> {
    tree.element_children(parent)
        .filter(|&id| selectors.matches(tree, id))
        .collect()
}

/// Parse `selector` and run [`query_selector_all`]
pub fn select_all(tree: &DomTree, scope: NodeId, selector: &str) -> Result<Vec<NodeId>, SelectorError> {
    let selectors = SelectorList::parse(selector)?;
    Ok(query_selector_all(tree, scope, &selectors))
}
