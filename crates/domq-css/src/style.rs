//! Inline style declarations
//!
//! Read-modify-write access to the `style` attribute, plus the fallback
//! extent resolution used when no layout pass recorded a box.

use domq_dom::{DomResult, DomTree, NodeId};

/// One `property: value` pair
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Declaration {
    pub property: String,
    pub value: String,
    pub important: bool,
}

/// Ordered declarations of a `style` attribute
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct StyleDeclaration {
    declarations: Vec<Declaration>,
}

impl StyleDeclaration {
    pub fn new() -> Self {
        Self::default()
    }

    /// Parse `a: b; c: d !important`. Malformed entries are skipped.
    pub fn parse(css_text: &str) -> Self {
        let mut style = Self::new();
        for chunk in split_declarations(css_text) {
            let Some((property, value)) = chunk.split_once(':') else {
                continue;
            };
            let property = normalize_property(property.trim());
            let mut value = value.trim();
            let mut important = false;
            if let Some(stripped) = strip_important(value) {
                value = stripped;
                important = true;
            }
            if property.is_empty() || value.is_empty() {
                continue;
            }
            style.upsert(Declaration { property, value: value.to_string(), important });
        }
        style
    }

    fn upsert(&mut self, decl: Declaration) {
        match self.declarations.iter_mut().find(|d| d.property == decl.property) {
            Some(existing) => *existing = decl,
            None => self.declarations.push(decl),
        }
    }

    /// Value of a property (camelCase or kebab-case name)
    pub fn get(&self, property: &str) -> Option<&str> {
        let property = normalize_property(property);
        self.declarations
            .iter()
            .find(|d| d.property == property)
            .map(|d| d.value.as_str())
    }

    /// Set a property. An empty value removes it, as `el.style.x = ""` does.
    pub fn set(&mut self, property: &str, value: &str) {
        let value = value.trim();
        if value.is_empty() {
            self.remove(property);
            return;
        }
        let (value, important) = match strip_important(value) {
            Some(v) => (v, true),
            None => (value, false),
        };
        self.upsert(Declaration {
            property: normalize_property(property),
            value: value.to_string(),
            important,
        });
    }

    /// Remove a property, returning its old value
    pub fn remove(&mut self, property: &str) -> Option<String> {
        let property = normalize_property(property);
        let pos = self.declarations.iter().position(|d| d.property == property)?;
        Some(self.declarations.remove(pos).value)
    }

    pub fn len(&self) -> usize {
        self.declarations.len()
    }

    pub fn is_empty(&self) -> bool {
        self.declarations.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Declaration> {
        self.declarations.iter()
    }

    /// Serialize as `cssText`: `color: red; display: none;`
    pub fn to_css_text(&self) -> String {
        self.declarations
            .iter()
            .map(|d| {
                if d.important {
                    format!("{}: {} !important;", d.property, d.value)
                } else {
                    format!("{}: {};", d.property, d.value)
                }
            })
            .collect::<Vec<_>>()
            .join(" ")
    }
}

/// `backgroundColor` -> `background-color`; kebab-case passes through.
/// `cssFloat` is the scripting alias of `float`.
pub fn normalize_property(property: &str) -> String {
    if property == "cssFloat" {
        return "float".to_string();
    }
    if property.starts_with("--") {
        // Custom properties are case-sensitive
        return property.to_string();
    }
    let mut out = String::with_capacity(property.len() + 4);
    for c in property.chars() {
        if c.is_ascii_uppercase() {
            out.push('-');
            out.push(c.to_ascii_lowercase());
        } else {
            out.push(c);
        }
    }
    out
}

fn strip_important(value: &str) -> Option<&str> {
    let idx = value.rfind('!')?;
    value[idx + 1..]
        .trim()
        .eq_ignore_ascii_case("important")
        .then(|| value[..idx].trim_end())
}

/// Split on `;` outside quotes and parentheses
fn split_declarations(css_text: &str) -> Vec<&str> {
    let mut parts = Vec::new();
    let mut depth = 0u32;
    let mut quote: Option<char> = None;
    let mut start = 0;

    for (i, c) in css_text.char_indices() {
        match (quote, c) {
            (Some(q), c) if c == q => quote = None,
            (Some(_), _) => {}
            (None, '"' | '\'') => quote = Some(c),
            (None, '(') => depth += 1,
            (None, ')') => depth = depth.saturating_sub(1),
            (None, ';') if depth == 0 => {
                parts.push(&css_text[start..i]);
                start = i + 1;
            }
            _ => {}
        }
    }
    parts.push(&css_text[start..]);
    parts
}

/// Parsed inline style of an element
pub fn inline_style(tree: &DomTree, node: NodeId) -> StyleDeclaration {
    tree.get_attribute(node, "style")
        .map(StyleDeclaration::parse)
        .unwrap_or_default()
}

/// Inline value of a style property
pub fn style_property(tree: &DomTree, node: NodeId, property: &str) -> Option<String> {
    inline_style(tree, node).get(property).map(str::to_string)
}

/// `el.style[property] = value`
pub fn set_style_property(tree: &mut DomTree, node: NodeId, property: &str, value: &str) -> DomResult<()> {
    let mut style = inline_style(tree, node);
    style.set(property, value);
    tree.set_attribute(node, "style", &style.to_css_text())
}

/// Box dimension
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Axis {
    Width,
    Height,
}

/// Whether the node or an ancestor is inline `display: none`
pub fn is_display_none(tree: &DomTree, node: NodeId) -> bool {
    std::iter::once(node)
        .chain(tree.ancestors(node))
        .filter(|&id| tree.is_element(id))
        .any(|id| inline_style(tree, id).get("display") == Some("none"))
}

/// Rendered extent without a layout box: 0 for hidden or detached nodes,
/// otherwise the inline pixel size (bare numbers count as px) or 0.
pub fn resolve_extent(tree: &DomTree, node: NodeId, axis: Axis) -> f64 {
    if !tree.is_connected(node) || is_display_none(tree, node) {
        return 0.0;
    }
    let property = match axis {
        Axis::Width => "width",
        Axis::Height => "height",
    };
    inline_style(tree, node)
        .get(property)
        .and_then(parse_px)
        .unwrap_or(0.0)
}

fn parse_px(value: &str) -> Option<f64> {
    let value = value.trim();
    let number = value.strip_suffix("px").unwrap_or(value).trim();
    number.parse::<f64>().ok().filter(|n| n.is_finite() && *n >= 0.0)
}
