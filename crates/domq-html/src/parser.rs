//! HTML5 Parser implementation
//!
//! Uses html5ever's RcDom and converts it into the arena DOM. This is
//! simpler and more reliable than implementing TreeSink directly.

use std::io::Read;

use domq_dom::{Document, DomTree, Node, NodeId};
use html5ever::{LocalName, QualName, ns, parse_document, parse_fragment};
use html5ever::tendril::TendrilSink;
use markup5ever_rcdom::{Handle, NodeData as RcNodeData, RcDom};

use crate::HtmlError;

/// HTML5 parser
#[derive(Debug, Default, Clone, Copy)]
pub struct HtmlParser;

impl HtmlParser {
    /// Create a new HTML parser
    pub fn new() -> Self {
        Self
    }

    /// Parse HTML string into a Document
    pub fn parse(&self, html: &str) -> Result<Document, HtmlError> {
        self.parse_with_url(html, "about:blank")
    }

    /// Parse HTML with a base URL
    pub fn parse_with_url(&self, html: &str, url: &str) -> Result<Document, HtmlError> {
        tracing::debug!("Parsing HTML document: {}", url);
        let dom = parse_document(RcDom::default(), Default::default()).one(html);
        self.build_document(&dom, url)
    }

    /// Parse a byte stream (lossy UTF-8) into a Document
    pub fn parse_reader<R: Read>(&self, reader: &mut R, url: &str) -> Result<Document, HtmlError> {
        tracing::debug!("Parsing HTML stream: {}", url);
        let dom = parse_document(RcDom::default(), Default::default())
            .from_utf8()
            .read_from(reader)?;
        self.build_document(&dom, url)
    }

    fn build_document(&self, dom: &RcDom, url: &str) -> Result<Document, HtmlError> {
        let mut document = Document::empty(url);
        for child in dom.document.children.borrow().iter() {
            if let Some(id) = convert_node(child, document.tree_mut(), true)? {
                document.tree_mut().append_child(NodeId::ROOT, id)?;
            }
        }

        // Find html, head, body elements
        document.finalize();

        tracing::debug!("Parsed {} nodes", document.tree().len());
        Ok(document)
    }
}

/// Parse a markup snippet as the children of a `context` element and
/// materialize its top-level nodes, detached and in source order, inside
/// `tree`.
///
/// The context tag picks the insertion mode, so `<tr>` survives under a
/// `tbody` context while it would be dropped under `body`.
pub fn parse_fragment_into(tree: &mut DomTree, context: &str, markup: &str) -> Result<Vec<NodeId>, HtmlError> {
    let context_name = QualName::new(None, ns!(html), LocalName::from(context.to_ascii_lowercase()));
    let dom = parse_fragment(RcDom::default(), Default::default(), context_name, Vec::new(), false).one(markup);

    // Fragment parsing puts everything under a synthetic <html> root
    let mut nodes = Vec::new();
    let document_children = dom.document.children.borrow();
    let Some(root) = document_children.iter().find(|h| is_element_named(h, "html")) else {
        return Ok(nodes);
    };

    for child in root.children.borrow().iter() {
        if let Some(id) = convert_node(child, tree, false)? {
            nodes.push(id);
        }
    }

    tracing::trace!(context, count = nodes.len(), "parsed fragment");
    Ok(nodes)
}

fn is_element_named(handle: &Handle, tag: &str) -> bool {
    matches!(&handle.data, RcNodeData::Element { name, .. } if name.local.as_ref() == tag)
}

/// Convert an RcDom node (and its subtree) into a detached arena node.
/// `in_shell` marks positions directly inside document/html/head, where
/// whitespace-only text is not kept.
fn convert_node(handle: &Handle, tree: &mut DomTree, in_shell: bool) -> Result<Option<NodeId>, HtmlError> {
    let id = match &handle.data {
        RcNodeData::Document | RcNodeData::ProcessingInstruction { .. } => return Ok(None),
        RcNodeData::Doctype { name, public_id, system_id } => tree.push(Node::doctype(
            name.to_string(),
            public_id.to_string(),
            system_id.to_string(),
        )),
        RcNodeData::Text { contents } => {
            let text = contents.borrow();
            if in_shell && text.trim().is_empty() {
                return Ok(None);
            }
            tree.create_text(&text)
        }
        RcNodeData::Comment { contents } => tree.create_comment(contents),
        RcNodeData::Element { name, attrs, .. } => {
            let tag: &str = &name.local;
            let id = tree.create_element(tag);
            for attr in attrs.borrow().iter() {
                tree.set_attribute(id, attr.name.local.as_ref(), &attr.value)?;
            }

            let child_in_shell = matches!(tag, "html" | "head");
            for child in handle.children.borrow().iter() {
                if let Some(child_id) = convert_node(child, tree, child_in_shell)? {
                    tree.append_child(id, child_id)?;
                }
            }
            id
        }
    };

    Ok(Some(id))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_simple() {
        let html = "<html><head><title>Test</title></head><body><p>Hello</p></body></html>";
        let doc = HtmlParser::new().parse(html).unwrap();

        assert!(doc.tree().len() > 1, "Expected more than 1 node, got {}", doc.tree().len());
        assert_eq!(doc.title(), "Test");
        assert_eq!(doc.tree().text_content(doc.body()), "Hello");
    }

    #[test]
    fn test_parse_fragment_document() {
        // Even fragments get wrapped in html/head/body by html5ever
        let doc = HtmlParser::new().parse("<div><span>Text</span></div>").unwrap();
        assert!(doc.body().is_valid());
        assert_eq!(doc.tree().element_children(doc.body()).count(), 1);
    }

    #[test]
    fn test_parse_fragment_into() {
        let mut tree = DomTree::new();
        let nodes = parse_fragment_into(&mut tree, "ul", "<li>a</li>text<!--c--><li>b</li>").unwrap();
        assert_eq!(nodes.len(), 4);
        assert_eq!(tree.tag_name(nodes[0]), Some("li"));
        assert_eq!(tree.text_content(nodes[1]), "text");
        assert!(nodes.iter().all(|&n| tree.parent(n).is_none()));
    }

    #[test]
    fn test_parse_reader() {
        let mut bytes: &[u8] = b"<p id=x>hi</p>";
        let doc = HtmlParser::new().parse_reader(&mut bytes, "about:blank").unwrap();
        assert!(doc.get_element_by_id("x").is_some());
    }
}
