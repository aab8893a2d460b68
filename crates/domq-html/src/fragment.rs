//! Fragment insertion (insertAdjacentHTML / innerHTML assignment)

use std::str::FromStr;

use domq_dom::{DomTree, NodeId};

use crate::{HtmlError, parse_fragment_into};

/// Where `insert_adjacent_html` places parsed nodes relative to the target
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AdjacentPosition {
    /// Before the target, as previous siblings
    BeforeBegin,
    /// Inside the target, before its first child
    AfterBegin,
    /// Inside the target, after its last child
    BeforeEnd,
    /// After the target, as next siblings
    AfterEnd,
}

impl AdjacentPosition {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::BeforeBegin => "beforebegin",
            Self::AfterBegin => "afterbegin",
            Self::BeforeEnd => "beforeend",
            Self::AfterEnd => "afterend",
        }
    }
}

impl FromStr for AdjacentPosition {
    type Err = ();

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "beforebegin" => Ok(Self::BeforeBegin),
            "afterbegin" => Ok(Self::AfterBegin),
            "beforeend" => Ok(Self::BeforeEnd),
            "afterend" => Ok(Self::AfterEnd),
            _ => Err(()),
        }
    }
}

/// Parse `markup` and insert the resulting nodes at `position` relative to
/// `target`, keeping source order.
///
/// Returns `Ok(false)` without touching the tree when a sibling position is
/// requested for a target that has no parent element.
pub fn insert_adjacent_html(
    tree: &mut DomTree,
    target: NodeId,
    position: AdjacentPosition,
    markup: &str,
) -> Result<bool, HtmlError> {
    let (parent, reference) = match position {
        AdjacentPosition::BeforeBegin => match tree.parent_element(target) {
            Some(parent) => (parent, target),
            None => return Ok(false),
        },
        AdjacentPosition::AfterEnd => match tree.parent_element(target) {
            Some(parent) => (parent, next_sibling(tree, target)),
            None => return Ok(false),
        },
        AdjacentPosition::AfterBegin => (target, first_child(tree, target)),
        AdjacentPosition::BeforeEnd => (target, NodeId::NONE),
    };

    let context = context_tag(tree, parent);
    let nodes = parse_fragment_into(tree, &context, markup)?;
    for node in &nodes {
        tree.insert_before(parent, *node, reference)?;
    }

    tracing::trace!(?target, position = position.as_str(), inserted = nodes.len(), "insert_adjacent_html");
    Ok(true)
}

/// Replace all children of `node` with the nodes parsed from `markup`
pub fn set_inner_html(tree: &mut DomTree, node: NodeId, markup: &str) -> Result<(), HtmlError> {
    let context = context_tag(tree, node);
    let nodes = parse_fragment_into(tree, &context, markup)?;
    tree.remove_children(node);
    for child in nodes {
        tree.append_child(node, child)?;
    }
    Ok(())
}

/// Tag the snippet is parsed under; non-elements parse as body content
fn context_tag(tree: &DomTree, node: NodeId) -> String {
    tree.tag_name(node).unwrap_or("body").to_string()
}

fn first_child(tree: &DomTree, node: NodeId) -> NodeId {
    tree.get(node).map_or(NodeId::NONE, |n| n.first_child)
}

fn next_sibling(tree: &DomTree, node: NodeId) -> NodeId {
    tree.get(node).map_or(NodeId::NONE, |n| n.next_sibling)
}
