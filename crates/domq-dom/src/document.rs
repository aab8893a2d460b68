//! Document - High-level document API

use std::cell::RefCell;
use std::collections::HashMap;
use std::rc::Rc;

use crate::events::ListenerRegistry;
use crate::{DomRect, DomTree, Event, EventPath, ListenerId, NodeId};

/// HTML Document
#[derive(Debug)]
pub struct Document {
    /// The DOM tree
    pub tree: DomTree,
    /// Document URL
    url: String,
    /// Cached reference to <html> element
    html_element: NodeId,
    /// Cached reference to <head> element
    head_element: NodeId,
    /// Cached reference to <body> element
    body_element: NodeId,
    listeners: ListenerRegistry,
    /// Boxes computed by an external layout pass
    layout: HashMap<NodeId, DomRect>,
}

impl Document {
    /// Create a new document with an html/head/body skeleton
    pub fn new(url: &str) -> Self {
        let mut doc = Self::empty(url);
        let tree = &mut doc.tree;

        let html = tree.create_element("html");
        let head = tree.create_element("head");
        let body = tree.create_element("body");

        // Freshly created nodes cannot violate the hierarchy
        let _ = tree.append_child(NodeId::ROOT, html);
        let _ = tree.append_child(html, head);
        let _ = tree.append_child(html, body);

        doc.finalize();
        doc
    }

    /// Create an empty document (no structure)
    pub fn empty(url: &str) -> Self {
        Self {
            tree: DomTree::new(),
            url: url.to_string(),
            html_element: NodeId::NONE,
            head_element: NodeId::NONE,
            body_element: NodeId::NONE,
            listeners: ListenerRegistry::default(),
            layout: HashMap::new(),
        }
    }

    /// Locate <html>, <head> and <body> after the tree was filled
    pub fn finalize(&mut self) {
        let tree = &self.tree;
        let find_child = |parent: NodeId, tag: &str| {
            tree.element_children(parent)
                .find(|&id| tree.tag_name(id) == Some(tag))
                .unwrap_or(NodeId::NONE)
        };

        self.html_element = find_child(NodeId::ROOT, "html");
        self.head_element = find_child(self.html_element, "head");
        self.body_element = find_child(self.html_element, "body");
    }

    /// Get document URL
    pub fn url(&self) -> &str {
        &self.url
    }

    /// Text of the first <title> in <head>
    pub fn title(&self) -> String {
        self.tree
            .element_children(self.head_element)
            .find(|&id| self.tree.tag_name(id) == Some("title"))
            .map(|id| self.tree.text_content(id).trim().to_string())
            .unwrap_or_default()
    }

    /// Get <html> element
    pub fn document_element(&self) -> NodeId {
        self.html_element
    }

    /// Get <head> element
    pub fn head(&self) -> NodeId {
        self.head_element
    }

    /// Get <body> element
    pub fn body(&self) -> NodeId {
        self.body_element
    }

    /// First connected element with the given id
    pub fn get_element_by_id(&self, id: &str) -> Option<NodeId> {
        self.tree
            .descendants(NodeId::ROOT)
            .filter(|(_, node)| node.is_element())
            .map(|(node_id, _)| node_id)
            .find(|&node_id| self.tree.get_attribute(node_id, "id") == Some(id))
    }

    /// Access the DOM tree
    pub fn tree(&self) -> &DomTree {
        &self.tree
    }

    /// Access the DOM tree mutably
    pub fn tree_mut(&mut self) -> &mut DomTree {
        &mut self.tree
    }

    // ------------------------------------------------------------------
    // Events
    // ------------------------------------------------------------------

    /// Register a listener for `event_type` on `node`
    pub fn add_event_listener<F>(&mut self, node: NodeId, event_type: &str, listener: F) -> ListenerId
    where
        F: FnMut(&Event) + 'static,
    {
        self.listeners.add(node, event_type, Rc::new(RefCell::new(listener)))
    }

    /// Unregister a listener. Returns whether it existed.
    pub fn remove_event_listener(&mut self, id: ListenerId) -> bool {
        self.listeners.remove(id)
    }

    /// Number of listeners registered on a node
    pub fn listener_count(&self, node: NodeId) -> usize {
        self.listeners.count(node)
    }

    /// Snapshot the listeners an event on `target` will reach:
    /// the target first, then its ancestors when `bubbles`.
    pub fn event_path(&self, target: NodeId, event_type: &str, bubbles: bool) -> EventPath {
        let mut entries = Vec::new();
        self.listeners.collect(target, event_type, &mut entries);
        if bubbles {
            for ancestor in self.tree.ancestors(target) {
                self.listeners.collect(ancestor, event_type, &mut entries);
            }
        }
        EventPath::new(entries)
    }

    /// Start a synthetic click: runs pre-activation behaviour and snapshots
    /// the propagation path. Returns `None` for disabled form controls.
    pub fn begin_click(&mut self, node: NodeId) -> Option<PendingClick> {
        let tag = self.tree.tag_name(node)?;
        if matches!(tag, "button" | "input" | "select" | "textarea")
            && self.tree.has_attribute(node, "disabled")
        {
            tracing::trace!(?node, "click on disabled control ignored");
            return None;
        }

        let rollback = if tag == "input" {
            self.toggle_checkable(node)
        } else {
            None
        };

        let event = Event::bubbling("click", node);
        let path = self.event_path(node, "click", true);
        Some(PendingClick { event, path, rollback })
    }

    /// Undo pre-activation behaviour after a cancelled click
    pub fn rollback_click(&mut self, rollback: ClickRollback) {
        let tree = &mut self.tree;
        let _ = if rollback.was_checked {
            tree.set_attribute(rollback.node, "checked", "")
        } else {
            tree.remove_attribute(rollback.node, "checked").map(|_| ())
        };
        if let Some(previous) = rollback.previously_checked {
            let _ = tree.set_attribute(previous, "checked", "");
        }
    }

    fn toggle_checkable(&mut self, node: NodeId) -> Option<ClickRollback> {
        let kind = self
            .tree
            .get_attribute(node, "type")
            .map(str::to_ascii_lowercase)?;
        let was_checked = self.tree.has_attribute(node, "checked");

        match kind.as_str() {
            "checkbox" => {
                let _ = if was_checked {
                    self.tree.remove_attribute(node, "checked").map(|_| ())
                } else {
                    self.tree.set_attribute(node, "checked", "")
                };
                Some(ClickRollback { node, was_checked, previously_checked: None })
            }
            "radio" if !was_checked => {
                let previously_checked = self.checked_radio_in_group(node);
                if let Some(previous) = previously_checked {
                    let _ = self.tree.remove_attribute(previous, "checked");
                }
                let _ = self.tree.set_attribute(node, "checked", "");
                Some(ClickRollback { node, was_checked, previously_checked })
            }
            _ => None,
        }
    }

    fn checked_radio_in_group(&self, node: NodeId) -> Option<NodeId> {
        let name = self.tree.get_attribute(node, "name")?;
        self.tree
            .descendants(NodeId::ROOT)
            .map(|(id, _)| id)
            .find(|&id| {
                id != node
                    && self.tree.tag_name(id) == Some("input")
                    && self.tree.get_attribute(id, "type").is_some_and(|t| t.eq_ignore_ascii_case("radio"))
                    && self.tree.get_attribute(id, "name") == Some(name)
                    && self.tree.has_attribute(id, "checked")
            })
    }

    // ------------------------------------------------------------------
    // Geometry
    // ------------------------------------------------------------------

    /// Record the rendered box of a node
    pub fn set_layout_box(&mut self, node: NodeId, rect: DomRect) {
        self.layout.insert(node, rect);
    }

    /// Rendered box of a node, if layout recorded one
    pub fn layout_box(&self, node: NodeId) -> Option<DomRect> {
        self.layout.get(&node).copied()
    }

    /// Forget all recorded boxes
    pub fn clear_layout(&mut self) {
        self.layout.clear();
    }
}

impl Default for Document {
    fn default() -> Self {
        Self::new("about:blank")
    }
}

/// A click whose listeners have not run yet
pub struct PendingClick {
    event: Event,
    path: EventPath,
    rollback: Option<ClickRollback>,
}

impl PendingClick {
    /// Run listeners. Returns the rollback to apply if the click was cancelled.
    pub fn dispatch(self) -> Option<ClickRollback> {
        let proceed = self.path.dispatch(&self.event);
        if proceed { None } else { self.rollback }
    }
}

/// State needed to undo checkbox/radio pre-activation
#[derive(Debug, Clone, Copy)]
pub struct ClickRollback {
    node: NodeId,
    was_checked: bool,
    previously_checked: Option<NodeId>,
}
