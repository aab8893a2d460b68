//! DOM Tree (arena-based allocation)
//!
//! All nodes live in one `Vec`. Detaching a node only unlinks it, the slot
//! stays allocated so stale `NodeId`s held by callers remain readable.

use crate::{DomError, DomResult, InternedString, Node, NodeData, NodeId, StringInterner};

/// Arena-based DOM tree
#[derive(Debug)]
pub struct DomTree {
    nodes: Vec<Node>,
    interner: StringInterner,
}

impl DomTree {
    /// Create a tree holding only the document node
    pub fn new() -> Self {
        Self {
            nodes: vec![Node::document()],
            interner: StringInterner::new(),
        }
    }

    /// The document node
    #[inline]
    pub fn root(&self) -> NodeId {
        NodeId::ROOT
    }

    /// Get a node by ID
    pub fn get(&self, id: NodeId) -> Option<&Node> {
        if !id.is_valid() {
            return None;
        }
        self.nodes.get(id.0 as usize)
    }

    /// Get a mutable node by ID
    pub fn get_mut(&mut self, id: NodeId) -> Option<&mut Node> {
        if !id.is_valid() {
            return None;
        }
        self.nodes.get_mut(id.0 as usize)
    }

    /// Number of nodes in the arena (attached or not)
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    /// Check if tree is empty
    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Access the name interner
    pub fn interner(&self) -> &StringInterner {
        &self.interner
    }

    /// Access the name interner mutably
    pub fn interner_mut(&mut self) -> &mut StringInterner {
        &mut self.interner
    }

    /// Intern a name, lowercasing ASCII
    pub fn intern(&mut self, name: &str) -> InternedString {
        if name.bytes().any(|b| b.is_ascii_uppercase()) {
            self.interner.intern(&name.to_ascii_lowercase())
        } else {
            self.interner.intern(name)
        }
    }

    /// Resolve an interned name
    #[inline]
    pub fn resolve(&self, id: InternedString) -> &str {
        self.interner.get(id)
    }

    fn lookup(&self, name: &str) -> Option<InternedString> {
        if name.bytes().any(|b| b.is_ascii_uppercase()) {
            self.interner.lookup(&name.to_ascii_lowercase())
        } else {
            self.interner.lookup(name)
        }
    }

    /// Push a detached node into the arena
    pub fn push(&mut self, node: Node) -> NodeId {
        let id = NodeId(self.nodes.len() as u32);
        self.nodes.push(node);
        id
    }

    /// Create a detached element
    pub fn create_element(&mut self, tag: &str) -> NodeId {
        let name = self.intern(tag);
        self.push(Node::element(name))
    }

    /// Create a detached text node
    pub fn create_text(&mut self, text: &str) -> NodeId {
        self.push(Node::text(text.to_string()))
    }

    /// Create a detached comment node
    pub fn create_comment(&mut self, text: &str) -> NodeId {
        self.push(Node::comment(text.to_string()))
    }

    // ------------------------------------------------------------------
    // Structure
    // ------------------------------------------------------------------

    /// Parent of a node, if attached
    pub fn parent(&self, id: NodeId) -> Option<NodeId> {
        self.get(id).map(|n| n.parent).filter(|p| p.is_valid())
    }

    /// Parent of a node if that parent is an element
    pub fn parent_element(&self, id: NodeId) -> Option<NodeId> {
        self.parent(id).filter(|&p| self.is_element(p))
    }

    /// Whether `id` refers to an element node
    pub fn is_element(&self, id: NodeId) -> bool {
        self.get(id).is_some_and(Node::is_element)
    }

    /// Iterate children of a node
    pub fn children(&self, parent: NodeId) -> ChildIter<'_> {
        let next = self.get(parent).map(|n| n.first_child).unwrap_or(NodeId::NONE);
        ChildIter { tree: self, next }
    }

    /// Element children of a node, in order
    pub fn element_children(&self, parent: NodeId) -> impl Iterator<Item = NodeId> + '_ {
        self.children(parent)
            .filter(|(_, node)| node.is_element())
            .map(|(id, _)| id)
    }

    /// Pre-order descendants of `root` (excluding `root` itself)
    pub fn descendants(&self, root: NodeId) -> Descendants<'_> {
        let next = self.get(root).map(|n| n.first_child).unwrap_or(NodeId::NONE);
        Descendants { tree: self, root, next }
    }

    /// Ancestors of a node, nearest first
    pub fn ancestors(&self, id: NodeId) -> impl Iterator<Item = NodeId> + '_ {
        std::iter::successors(self.parent(id), move |&p| self.parent(p))
    }

    /// Whether `ancestor` is a strict ancestor of `node`
    pub fn is_ancestor(&self, ancestor: NodeId, node: NodeId) -> bool {
        self.ancestors(node).any(|a| a == ancestor)
    }

    /// Whether the node is reachable from the document node
    pub fn is_connected(&self, id: NodeId) -> bool {
        id == NodeId::ROOT || self.ancestors(id).any(|a| a == NodeId::ROOT)
    }

    /// Previous sibling that is an element
    pub fn prev_element_sibling(&self, id: NodeId) -> Option<NodeId> {
        let mut cur = self.get(id)?.prev_sibling;
        while let Some(node) = self.get(cur) {
            if node.is_element() {
                return Some(cur);
            }
            cur = node.prev_sibling;
        }
        None
    }

    /// Next sibling that is an element
    pub fn next_element_sibling(&self, id: NodeId) -> Option<NodeId> {
        let mut cur = self.get(id)?.next_sibling;
        while let Some(node) = self.get(cur) {
            if node.is_element() {
                return Some(cur);
            }
            cur = node.next_sibling;
        }
        None
    }

    /// Append `child` as the last child of `parent`
    pub fn append_child(&mut self, parent: NodeId, child: NodeId) -> DomResult<()> {
        self.insert_before(parent, child, NodeId::NONE)
    }

    /// Insert `child` into `parent` before `reference`.
    /// A `NONE` reference appends.
    pub fn insert_before(&mut self, parent: NodeId, child: NodeId, reference: NodeId) -> DomResult<()> {
        if self.get(parent).is_none() || self.get(child).is_none() {
            return Err(DomError::NotFound);
        }
        if child == parent || child == NodeId::ROOT || self.is_ancestor(child, parent) {
            return Err(DomError::HierarchyRequest);
        }
        if reference.is_valid() && self.parent(reference) != Some(parent) {
            return Err(DomError::NotAChild);
        }
        if reference == child {
            return Ok(());
        }

        self.detach(child);

        let prev = if reference.is_valid() {
            self.nodes[reference.0 as usize].prev_sibling
        } else {
            self.nodes[parent.0 as usize].last_child
        };

        {
            let node = &mut self.nodes[child.0 as usize];
            node.parent = parent;
            node.prev_sibling = prev;
            node.next_sibling = reference;
        }

        if prev.is_valid() {
            self.nodes[prev.0 as usize].next_sibling = child;
        } else {
            self.nodes[parent.0 as usize].first_child = child;
        }

        if reference.is_valid() {
            self.nodes[reference.0 as usize].prev_sibling = child;
        } else {
            self.nodes[parent.0 as usize].last_child = child;
        }

        Ok(())
    }

    /// Unlink a node from its parent. The node keeps its own subtree.
    pub fn detach(&mut self, id: NodeId) {
        let Some(node) = self.get(id) else {
            return;
        };
        let (parent, prev, next) = (node.parent, node.prev_sibling, node.next_sibling);
        if !parent.is_valid() {
            return;
        }

        if prev.is_valid() {
            self.nodes[prev.0 as usize].next_sibling = next;
        } else {
            self.nodes[parent.0 as usize].first_child = next;
        }
        if next.is_valid() {
            self.nodes[next.0 as usize].prev_sibling = prev;
        } else {
            self.nodes[parent.0 as usize].last_child = prev;
        }

        let node = &mut self.nodes[id.0 as usize];
        node.parent = NodeId::NONE;
        node.prev_sibling = NodeId::NONE;
        node.next_sibling = NodeId::NONE;
    }

    /// Detach every child of a node
    pub fn remove_children(&mut self, id: NodeId) {
        let children: Vec<NodeId> = self.children(id).map(|(c, _)| c).collect();
        for child in children {
            self.detach(child);
        }
    }

    // ------------------------------------------------------------------
    // Element data
    // ------------------------------------------------------------------

    /// Lowercase tag name of an element
    pub fn tag_name(&self, id: NodeId) -> Option<&str> {
        self.get(id)?.as_element().map(|e| self.resolve(e.name))
    }

    /// Get an attribute value
    pub fn get_attribute(&self, id: NodeId, name: &str) -> Option<&str> {
        let name = self.lookup(name)?;
        self.get(id)?.as_element()?.get_attr(name)
    }

    /// Check attribute presence
    pub fn has_attribute(&self, id: NodeId, name: &str) -> bool {
        self.get_attribute(id, name).is_some()
    }

    /// Set an attribute on an element
    pub fn set_attribute(&mut self, id: NodeId, name: &str, value: &str) -> DomResult<()> {
        if !self.get(id).ok_or(DomError::NotFound)?.is_element() {
            return Err(DomError::NotAnElement);
        }
        let name = self.intern(name);
        if let Some(elem) = self.get_mut(id).and_then(Node::as_element_mut) {
            elem.set_attr(name, value.to_string());
        }
        Ok(())
    }

    /// Remove an attribute, returning the old value
    pub fn remove_attribute(&mut self, id: NodeId, name: &str) -> DomResult<Option<String>> {
        if !self.get(id).ok_or(DomError::NotFound)?.is_element() {
            return Err(DomError::NotAnElement);
        }
        let Some(name) = self.lookup(name) else {
            return Ok(None);
        };
        Ok(self
            .get_mut(id)
            .and_then(Node::as_element_mut)
            .and_then(|e| e.remove_attr(name)))
    }

    /// All attributes of an element as (name, value) pairs
    pub fn attributes(&self, id: NodeId) -> Vec<(&str, &str)> {
        self.get(id)
            .and_then(Node::as_element)
            .map(|e| {
                e.attrs
                    .iter()
                    .map(|a| (self.resolve(a.name), a.value.as_str()))
                    .collect()
            })
            .unwrap_or_default()
    }

    // ------------------------------------------------------------------
    // Text
    // ------------------------------------------------------------------

    /// Concatenated text of all descendant text nodes
    pub fn text_content(&self, id: NodeId) -> String {
        let Some(node) = self.get(id) else {
            return String::new();
        };
        match &node.data {
            NodeData::Text(t) => t.content.clone(),
            NodeData::Comment(c) => c.clone(),
            NodeData::Doctype { .. } => String::new(),
            NodeData::Document | NodeData::Element(_) => {
                let mut out = String::new();
                for (_, child) in self.descendants(id) {
                    if let Some(text) = child.as_text() {
                        out.push_str(text);
                    }
                }
                out
            }
        }
    }

    /// Replace all children with a single text node (none for empty text)
    pub fn set_text_content(&mut self, id: NodeId, text: &str) -> DomResult<()> {
        let node = self.get_mut(id).ok_or(DomError::NotFound)?;
        match &mut node.data {
            NodeData::Text(t) => {
                t.content = text.to_string();
                return Ok(());
            }
            NodeData::Comment(c) => {
                *c = text.to_string();
                return Ok(());
            }
            NodeData::Doctype { .. } => return Ok(()),
            NodeData::Document | NodeData::Element(_) => {}
        }

        self.remove_children(id);
        if !text.is_empty() {
            let text_node = self.create_text(text);
            self.append_child(id, text_node)?;
        }
        Ok(())
    }
}

impl Default for DomTree {
    fn default() -> Self {
        Self::new()
    }
}

/// Iterator over the children of a node
pub struct ChildIter<'a> {
    tree: &'a DomTree,
    next: NodeId,
}

impl<'a> Iterator for ChildIter<'a> {
    type Item = (NodeId, &'a Node);

    fn next(&mut self) -> Option<Self::Item> {
        let id = self.next;
        let node = self.tree.get(id)?;
        self.next = node.next_sibling;
        Some((id, node))
    }
}

/// Pre-order iterator over the descendants of a node
pub struct Descendants<'a> {
    tree: &'a DomTree,
    root: NodeId,
    next: NodeId,
}

impl<'a> Iterator for Descendants<'a> {
    type Item = (NodeId, &'a Node);

    fn next(&mut self) -> Option<Self::Item> {
        let id = self.next;
        let node = self.tree.get(id)?;

        self.next = if node.first_child.is_valid() {
            node.first_child
        } else {
            let mut cur = id;
            loop {
                if cur == self.root {
                    break NodeId::NONE;
                }
                let Some(n) = self.tree.get(cur) else {
                    break NodeId::NONE;
                };
                if n.next_sibling.is_valid() {
                    break n.next_sibling;
                }
                cur = n.parent;
                if !cur.is_valid() || cur == self.root {
                    break NodeId::NONE;
                }
            }
        };

        Some((id, node))
    }
}
