//! domq DOM - Document Object Model
//!
//! Arena-backed host document for the domq selection facade: tree
//! structure, attributes, class lists, `data-*` access, event dispatch
//! and recorded layout geometry.

mod classlist;
mod dataset;
mod document;
mod events;
mod geometry;
mod interner;
mod node;
mod tree;

pub use classlist::ClassList;
pub use dataset::{to_attribute_name, to_camel_case, to_kebab_case};
pub use document::{ClickRollback, Document, PendingClick};
pub use events::{Event, EventPath, ListenerId};
pub use geometry::DomRect;
pub use interner::{InternedString, StringInterner};
pub use node::{Attribute, ElementData, Node, NodeData, TextData};
pub use tree::{ChildIter, Descendants, DomTree};

/// Node identifier (index into arena)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NodeId(pub u32);

impl NodeId {
    /// Document node ID
    pub const ROOT: NodeId = NodeId(0);
    /// Null link
    pub const NONE: NodeId = NodeId(u32::MAX);

    /// Whether this ID refers to a node at all
    #[inline]
    pub fn is_valid(self) -> bool {
        self != Self::NONE
    }
}

/// Result type for DOM operations
pub type DomResult<T> = Result<T, DomError>;

/// DOM operation errors
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum DomError {
    #[error("node not found")]
    NotFound,

    #[error("hierarchy request error")]
    HierarchyRequest,

    #[error("node is not a child of the given parent")]
    NotAChild,

    #[error("node is not an element")]
    NotAnElement,
}
