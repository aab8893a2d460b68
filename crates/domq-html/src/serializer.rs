//! HTML Serialization (innerHTML/outerHTML)
//!
//! Output follows the HTML fragment serialization algorithm: void elements
//! have no end tag, raw text elements are written verbatim, every attribute
//! is written with a quoted value.

use domq_dom::{DomTree, NodeData, NodeId};

/// HTML serializer
#[derive(Debug, Default, Clone, Copy)]
pub struct HtmlSerializer;

/// Void elements (no end tag)
const VOID_ELEMENTS: &[&str] = &[
    "area", "base", "br", "col", "embed", "hr", "img", "input", "link", "meta", "param", "source",
    "track", "wbr",
];

/// Raw text elements (no escaping for content)
const RAW_TEXT_ELEMENTS: &[&str] = &[
    "script", "style", "xmp", "iframe", "noembed", "noframes", "plaintext",
];

impl HtmlSerializer {
    pub fn new() -> Self {
        Self
    }

    /// Serialize innerHTML of a node (children only)
    pub fn serialize_inner(&self, tree: &DomTree, node_id: NodeId) -> String {
        let mut output = String::new();
        self.serialize_children(tree, node_id, &mut output);
        output
    }

    /// Serialize outerHTML of a node (including the node itself)
    pub fn serialize_outer(&self, tree: &DomTree, node_id: NodeId) -> String {
        let mut output = String::new();
        self.serialize_node(tree, node_id, &mut output);
        output
    }

    fn serialize_node(&self, tree: &DomTree, node_id: NodeId, output: &mut String) {
        let Some(node) = tree.get(node_id) else {
            return;
        };

        match &node.data {
            NodeData::Document => self.serialize_children(tree, node_id, output),
            NodeData::Element(elem) => {
                let tag = tree.resolve(elem.name);

                output.push('<');
                output.push_str(tag);
                for attr in &elem.attrs {
                    output.push(' ');
                    output.push_str(tree.resolve(attr.name));
                    output.push_str("=\"");
                    escape_attribute(&attr.value, output);
                    output.push('"');
                }
                output.push('>');

                if VOID_ELEMENTS.contains(&tag) {
                    return;
                }

                if RAW_TEXT_ELEMENTS.contains(&tag) {
                    self.serialize_children_raw(tree, node_id, output);
                } else {
                    self.serialize_children(tree, node_id, output);
                }

                output.push_str("</");
                output.push_str(tag);
                output.push('>');
            }
            NodeData::Text(text) => escape_text(&text.content, output),
            NodeData::Comment(text) => {
                output.push_str("<!--");
                output.push_str(text);
                output.push_str("-->");
            }
            NodeData::Doctype { name, .. } => {
                output.push_str("<!DOCTYPE ");
                output.push_str(name);
                output.push('>');
            }
        }
    }

    fn serialize_children(&self, tree: &DomTree, parent_id: NodeId, output: &mut String) {
        for (child_id, _) in tree.children(parent_id) {
            self.serialize_node(tree, child_id, output);
        }
    }

    fn serialize_children_raw(&self, tree: &DomTree, parent_id: NodeId, output: &mut String) {
        for (_, child) in tree.children(parent_id) {
            if let Some(text) = child.as_text() {
                output.push_str(text);
            }
        }
    }
}

/// Escape text content for HTML
fn escape_text(text: &str, output: &mut String) {
    for c in text.chars() {
        match c {
            '&' => output.push_str("&amp;"),
            '<' => output.push_str("&lt;"),
            '>' => output.push_str("&gt;"),
            '\u{a0}' => output.push_str("&nbsp;"),
            _ => output.push(c),
        }
    }
}

/// Escape attribute value
fn escape_attribute(text: &str, output: &mut String) {
    for c in text.chars() {
        match c {
            '&' => output.push_str("&amp;"),
            '"' => output.push_str("&quot;"),
            '\u{a0}' => output.push_str("&nbsp;"),
            _ => output.push(c),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_serialize_element() {
        let mut tree = DomTree::new();
        let div = tree.create_element("div");
        tree.set_attribute(div, "class", "a \"b\"").unwrap();
        let text = tree.create_text("1 < 2 & 3");
        tree.append_child(div, text).unwrap();

        let serializer = HtmlSerializer::new();
        assert_eq!(serializer.serialize_inner(&tree, div), "1 &lt; 2 &amp; 3");
        assert_eq!(
            serializer.serialize_outer(&tree, div),
            "<div class=\"a &quot;b&quot;\">1 &lt; 2 &amp; 3</div>"
        );
    }

    #[test]
    fn test_void_and_boolean_attributes() {
        let mut tree = DomTree::new();
        let p = tree.create_element("p");
        let br = tree.create_element("br");
        let input = tree.create_element("input");
        tree.set_attribute(input, "checked", "").unwrap();
        tree.append_child(p, br).unwrap();
        tree.append_child(p, input).unwrap();

        assert_eq!(
            HtmlSerializer::new().serialize_inner(&tree, p),
            "<br><input checked=\"\">"
        );
    }

    #[test]
    fn test_raw_text_not_escaped() {
        let mut tree = DomTree::new();
        let script = tree.create_element("script");
        let code = tree.create_text("if (a < b && c) {}");
        tree.append_child(script, code).unwrap();
        assert_eq!(
            HtmlSerializer::new().serialize_outer(&tree, script),
            "<script>if (a < b && c) {}</script>"
        );
    }

    #[test]
    fn test_comment() {
        let mut tree = DomTree::new();
        let div = tree.create_element("div");
        let comment = tree.create_comment(" note ");
        tree.append_child(div, comment).unwrap();
        assert_eq!(HtmlSerializer::new().serialize_inner(&tree, div), "<!-- note -->");
    }
}
