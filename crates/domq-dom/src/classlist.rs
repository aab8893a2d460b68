//! Class list (DOMTokenList)
//!
//! Space-separated token list backing `element.classList`. The element's
//! `class` attribute stays the single source of truth; a `ClassList` is a
//! parsed view that is written back after mutation.

use crate::{DomResult, DomTree, NodeId};

/// Token list for space-separated values such as `class`
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ClassList {
    tokens: Vec<String>,
}

impl ClassList {
    /// Create empty token list
    pub fn new() -> Self {
        Self::default()
    }

    /// Parse from space-separated string, dropping duplicates
    pub fn from_string(s: &str) -> Self {
        let mut list = Self::new();
        for token in s.split_whitespace() {
            list.add(&[token]);
        }
        list
    }

    /// Number of tokens
    pub fn len(&self) -> usize {
        self.tokens.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tokens.is_empty()
    }

    /// Check if token exists
    pub fn contains(&self, token: &str) -> bool {
        self.tokens.iter().any(|t| t == token)
    }

    /// Add token(s)
    pub fn add(&mut self, tokens: &[&str]) {
        for token in tokens {
            if !token.is_empty() && !self.contains(token) {
                self.tokens.push(token.to_string());
            }
        }
    }

    /// Remove token(s)
    pub fn remove(&mut self, tokens: &[&str]) {
        self.tokens.retain(|t| !tokens.contains(&t.as_str()));
    }

    /// Serialized value
    pub fn value(&self) -> String {
        self.tokens.join(" ")
    }
}

impl std::fmt::Display for ClassList {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.value())
    }
}

impl DomTree {
    /// Parsed class list of an element
    pub fn class_list(&self, id: NodeId) -> ClassList {
        self.get_attribute(id, "class")
            .map(ClassList::from_string)
            .unwrap_or_default()
    }

    /// Whether the element carries `class`
    pub fn has_class(&self, id: NodeId, class: &str) -> bool {
        self.get_attribute(id, "class")
            .is_some_and(|v| v.split_whitespace().any(|c| c == class))
    }

    /// Add classes to an element
    pub fn add_classes(&mut self, id: NodeId, classes: &[&str]) -> DomResult<()> {
        let mut list = self.class_list(id);
        list.add(classes);
        self.set_attribute(id, "class", &list.value())
    }

    /// Remove the named classes, leaving others intact.
    /// An element without a `class` attribute is left without one.
    pub fn remove_classes(&mut self, id: NodeId, classes: &[&str]) -> DomResult<()> {
        if !self.has_attribute(id, "class") {
            return Ok(());
        }
        let mut list = self.class_list(id);
        list.remove(classes);
        self.set_attribute(id, "class", &list.value())
    }

    /// Drop every class: the `class` attribute becomes empty
    pub fn clear_classes(&mut self, id: NodeId) -> DomResult<()> {
        self.set_attribute(id, "class", "")
    }
}
