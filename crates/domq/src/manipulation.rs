//! Selection - element mutation and scalar access
//!
//! Bulk operations touch every element; scalar getters and setters and
//! markup insertion touch only the first. A host failure on one element is
//! logged and that element skipped.

use std::cell::RefCell;
use std::fmt::Display;
use std::rc::Rc;

use domq_css::{Axis, resolve_extent, set_style_property};
use domq_dom::{Event, NodeId};
use domq_html::{AdjacentPosition, HtmlSerializer, insert_adjacent_html, set_inner_html};

use crate::Selection;

fn log_failure<T, E: Display>(op: &str, node: NodeId, result: Result<T, E>) {
    if let Err(e) = result {
        tracing::debug!(?node, "{} failed: {}", op, e);
    }
}

impl Selection {
    // ------------------------------------------------------------------
    // Style and visibility
    // ------------------------------------------------------------------

    /// Set an inline style property on every element.
    /// Property names may be camelCase or kebab-case.
    pub fn css(&mut self, property: &str, value: &str) -> &mut Self {
        if self.nodes.is_empty() {
            return self;
        }
        let mut document = self.page.document_mut();
        for &node in &self.nodes {
            log_failure("css", node, set_style_property(document.tree_mut(), node, property, value));
        }
        drop(document);
        self
    }

    /// `display` to the page's default display value
    pub fn show(&mut self) -> &mut Self {
        let display = self.page.config().default_display.clone();
        self.css("display", &display)
    }

    /// `display` to `mode`
    pub fn show_as(&mut self, mode: &str) -> &mut Self {
        self.css("display", mode)
    }

    /// `display: none`. The previous value is not remembered.
    pub fn hide(&mut self) -> &mut Self {
        self.css("display", "none")
    }

    // ------------------------------------------------------------------
    // Structure
    // ------------------------------------------------------------------

    /// Detach every element from its parent. The selection keeps the
    /// detached ids.
    pub fn remove(&mut self) -> &mut Self {
        if self.nodes.is_empty() {
            return self;
        }
        let mut document = self.page.document_mut();
        for &node in &self.nodes {
            document.tree_mut().detach(node);
        }
        tracing::debug!(count = self.nodes.len(), "removed");
        drop(document);
        self
    }

    /// Markup inserted right before the first element
    pub fn before(&mut self, markup: &str) -> &mut Self {
        self.insert(AdjacentPosition::BeforeBegin, markup)
    }

    /// Markup inserted as the first element's first children
    pub fn prepend(&mut self, markup: &str) -> &mut Self {
        self.insert(AdjacentPosition::AfterBegin, markup)
    }

    /// Markup inserted as the first element's last children
    pub fn append(&mut self, markup: &str) -> &mut Self {
        self.insert(AdjacentPosition::BeforeEnd, markup)
    }

    /// Markup inserted right after the first element
    pub fn after(&mut self, markup: &str) -> &mut Self {
        self.insert(AdjacentPosition::AfterEnd, markup)
    }

    fn insert(&mut self, position: AdjacentPosition, markup: &str) -> &mut Self {
        let Some(first) = self.first_node() else {
            return self;
        };
        let result = insert_adjacent_html(self.page.document_mut().tree_mut(), first, position, markup);
        match result {
            Ok(true) => {}
            Ok(false) => tracing::debug!(?first, position = position.as_str(), "no parent to insert next to"),
            Err(e) => tracing::debug!(?first, "insert failed: {}", e),
        }
        self
    }

    // ------------------------------------------------------------------
    // Classes
    // ------------------------------------------------------------------

    /// Add classes to every element
    pub fn add_class(&mut self, classes: &[&str]) -> &mut Self {
        if self.nodes.is_empty() || classes.is_empty() {
            return self;
        }
        let mut document = self.page.document_mut();
        for &node in &self.nodes {
            log_failure("add_class", node, document.tree_mut().add_classes(node, classes));
        }
        drop(document);
        self
    }

    /// Remove the named classes from every element, or every class when
    /// `classes` is empty
    pub fn rm_class(&mut self, classes: &[&str]) -> &mut Self {
        if classes.is_empty() {
            return self.clear_class();
        }
        if self.nodes.is_empty() {
            return self;
        }
        let mut document = self.page.document_mut();
        for &node in &self.nodes {
            log_failure("rm_class", node, document.tree_mut().remove_classes(node, classes));
        }
        drop(document);
        self
    }

    /// Set every element's class attribute to the empty string
    pub fn clear_class(&mut self) -> &mut Self {
        if self.nodes.is_empty() {
            return self;
        }
        let mut document = self.page.document_mut();
        for &node in &self.nodes {
            log_failure("clear_class", node, document.tree_mut().clear_classes(node));
        }
        drop(document);
        self
    }

    /// Whether any element has `class`
    pub fn has_class(&self, class: &str) -> bool {
        let document = self.page.document();
        self.nodes.iter().any(|&node| document.tree().has_class(node, class))
    }

    // ------------------------------------------------------------------
    // Scalar access (first element)
    // ------------------------------------------------------------------

    /// Text content of the first element, `""` when empty
    pub fn text(&self) -> String {
        self.first_node()
            .map(|node| self.page.document().tree().text_content(node))
            .unwrap_or_default()
    }

    /// Replace the first element's children with a text node
    pub fn set_text(&mut self, text: &str) -> &mut Self {
        if let Some(first) = self.first_node() {
            let result = self.page.document_mut().tree_mut().set_text_content(first, text);
            log_failure("set_text", first, result);
        }
        self
    }

    /// Inner markup of the first element, `""` when empty
    pub fn html(&self) -> String {
        self.first_node()
            .map(|node| HtmlSerializer::new().serialize_inner(self.page.document().tree(), node))
            .unwrap_or_default()
    }

    /// Replace the first element's children with parsed markup
    pub fn set_html(&mut self, markup: &str) -> &mut Self {
        if let Some(first) = self.first_node() {
            let result = set_inner_html(self.page.document_mut().tree_mut(), first, markup);
            log_failure("set_html", first, result);
        }
        self
    }

    /// `dataset[key]` of the first element
    pub fn data(&self, key: &str) -> Option<String> {
        let first = self.first_node()?;
        self.page.document().tree().dataset_get(first, key).map(str::to_string)
    }

    pub fn set_data(&mut self, key: &str, value: &str) -> &mut Self {
        if let Some(first) = self.first_node() {
            let result = self.page.document_mut().tree_mut().dataset_set(first, key, value);
            log_failure("set_data", first, result);
        }
        self
    }

    pub fn remove_data(&mut self, key: &str) -> &mut Self {
        if let Some(first) = self.first_node() {
            let result = self.page.document_mut().tree_mut().dataset_remove(first, key);
            log_failure("remove_data", first, result);
        }
        self
    }

    /// Attribute of the first element
    pub fn attr(&self, name: &str) -> Option<String> {
        let first = self.first_node()?;
        self.page.document().tree().get_attribute(first, name).map(str::to_string)
    }

    pub fn set_attr(&mut self, name: &str, value: &str) -> &mut Self {
        if let Some(first) = self.first_node() {
            let result = self.page.document_mut().tree_mut().set_attribute(first, name, value);
            log_failure("set_attr", first, result);
        }
        self
    }

    pub fn remove_attr(&mut self, name: &str) -> &mut Self {
        if let Some(first) = self.first_node() {
            let result = self.page.document_mut().tree_mut().remove_attribute(first, name);
            log_failure("remove_attr", first, result);
        }
        self
    }

    // ------------------------------------------------------------------
    // Geometry
    // ------------------------------------------------------------------

    /// Rendered width of the first element, `-1.0` when empty
    pub fn width(&self) -> f64 {
        self.extent(Axis::Width)
    }

    /// Rendered height of the first element, `-1.0` when empty
    pub fn height(&self) -> f64 {
        self.extent(Axis::Height)
    }

    fn extent(&self, axis: Axis) -> f64 {
        let Some(first) = self.first_node() else {
            return -1.0;
        };
        let document = self.page.document();
        match document.layout_box(first) {
            Some(rect) => match axis {
                Axis::Width => rect.width,
                Axis::Height => rect.height,
            },
            None => resolve_extent(document.tree(), first, axis),
        }
    }

    // ------------------------------------------------------------------
    // Events
    // ------------------------------------------------------------------

    /// Synthesize a click on every element.
    ///
    /// Checkboxes and radios flip before listeners run and flip back if a
    /// listener calls `prevent_default`. Disabled controls get nothing.
    pub fn click(&mut self) -> &mut Self {
        for &node in &self.nodes {
            // Listeners may borrow the document themselves
            let pending = self.page.document_mut().begin_click(node);
            let Some(pending) = pending else {
                continue;
            };
            if let Some(rollback) = pending.dispatch() {
                tracing::trace!(?node, "click cancelled");
                self.page.document_mut().rollback_click(rollback);
            }
        }
        self
    }

    /// Listen for `event_type` directly on every element
    pub fn on<F>(&mut self, event_type: &str, handler: F) -> &mut Self
    where
        F: FnMut(&Event) + 'static,
    {
        if self.nodes.is_empty() {
            return self;
        }
        let shared = Rc::new(RefCell::new(handler));
        let mut document = self.page.document_mut();
        for &node in &self.nodes {
            let handler = Rc::clone(&shared);
            document.add_event_listener(node, event_type, move |event| {
                if let Ok(mut f) = handler.try_borrow_mut() {
                    (&mut *f)(event);
                }
            });
        }
        drop(document);
        self
    }
}
