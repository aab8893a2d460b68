//! Edge case tests for domq-html
//!
//! Malformed documents, odd fragments and serialization corner cases.

use domq_dom::{DomTree, NodeId};
use domq_html::*;

// ============================================================================
// DOCUMENT PARSING
// ============================================================================

#[test]
fn test_parse_empty() {
    let doc = parse("").unwrap();
    assert!(doc.document_element().is_valid());
    assert!(doc.head().is_valid());
    assert!(doc.body().is_valid());
}

#[test]
fn test_parse_only_whitespace() {
    let doc = parse("   \t\n\r\n   ").unwrap();
    assert_eq!(doc.tree().children(doc.document_element()).count(), 2);
}

#[test]
fn test_parse_unclosed_tags() {
    let doc = parse("<div><p><span>text").unwrap();
    assert_eq!(doc.tree().text_content(doc.body()), "text");
}

#[test]
fn test_parse_mismatched_tags() {
    let doc = parse("<div><p></div></p>").unwrap();
    assert!(doc.tree().len() > 4);
}

#[test]
fn test_body_whitespace_is_kept() {
    let doc = parse("<body><b>a</b> <i>b</i></body>").unwrap();
    assert_eq!(doc.tree().text_content(doc.body()), "a b");
}

#[test]
fn test_uppercase_tags_and_attributes() {
    let doc = parse("<DIV ID=Main DATA-X=1></DIV>").unwrap();
    let div = doc.get_element_by_id("Main").unwrap();
    assert_eq!(doc.tree().tag_name(div), Some("div"));
    assert_eq!(doc.tree().get_attribute(div, "data-x"), Some("1"));
}

#[test]
fn test_doctype_serializes() {
    let doc = parse("<!DOCTYPE html><p>x</p>").unwrap();
    let out = HtmlSerializer::new().serialize_outer(doc.tree(), NodeId::ROOT);
    assert!(out.starts_with("<!DOCTYPE html><html>"));
}

// ============================================================================
// FRAGMENTS
// ============================================================================

#[test]
fn test_fragment_plain_text() {
    let mut tree = DomTree::new();
    let nodes = parse_fragment_into(&mut tree, "body", "just text").unwrap();
    assert_eq!(nodes.len(), 1);
    assert_eq!(tree.text_content(nodes[0]), "just text");
}

#[test]
fn test_fragment_empty() {
    let mut tree = DomTree::new();
    assert!(parse_fragment_into(&mut tree, "body", "").unwrap().is_empty());
}

#[test]
fn test_fragment_metadata_then_content() {
    let mut tree = DomTree::new();
    let nodes = parse_fragment_into(&mut tree, "body", "<style>p{}</style><p>a</p>").unwrap();
    let tags: Vec<_> = nodes.iter().filter_map(|&n| tree.tag_name(n)).collect();
    assert_eq!(tags, vec!["style", "p"]);
}

#[test]
fn test_fragment_unbalanced() {
    let mut tree = DomTree::new();
    let nodes = parse_fragment_into(&mut tree, "body", "<b>bold<i>both</b>italic").unwrap();
    assert!(!nodes.is_empty());
    assert_eq!(tree.tag_name(nodes[0]), Some("b"));
}

#[test]
fn test_table_rows_keep_their_context() {
    let mut doc = parse("<table><tbody id=t><tr><td>a</td></tr></tbody></table>").unwrap();
    let tbody = doc.get_element_by_id("t").unwrap();
    insert_adjacent_html(doc.tree_mut(), tbody, AdjacentPosition::BeforeEnd, "<tr><td>x</td></tr>").unwrap();

    let rows: Vec<_> = doc.tree().element_children(tbody).collect();
    assert_eq!(rows.len(), 2);
    assert_eq!(doc.tree().tag_name(rows[1]), Some("tr"));
    assert_eq!(
        HtmlSerializer::new().serialize_inner(doc.tree(), rows[1]),
        "<td>x</td>"
    );

    // Sibling positions parse under the parent, here the tbody
    let first = rows[0];
    insert_adjacent_html(doc.tree_mut(), first, AdjacentPosition::BeforeBegin, "<tr><td>0</td></tr>").unwrap();
    assert_eq!(doc.tree().element_children(tbody).count(), 3);

    set_inner_html(doc.tree_mut(), tbody, "<tr><td>only</td></tr>").unwrap();
    let rows: Vec<_> = doc.tree().element_children(tbody).collect();
    assert_eq!(rows.len(), 1);
    assert_eq!(doc.tree().tag_name(rows[0]), Some("tr"));
}

#[test]
fn test_fragment_leading_whitespace_kept() {
    let mut doc = parse("<p id=p>Hello</p>").unwrap();
    let p = doc.get_element_by_id("p").unwrap();
    insert_adjacent_html(doc.tree_mut(), p, AdjacentPosition::BeforeEnd, " world").unwrap();
    assert_eq!(doc.tree().text_content(p), "Hello world");
}

#[test]
fn test_fragment_leading_comment_kept() {
    let mut tree = DomTree::new();
    let nodes = parse_fragment_into(&mut tree, "div", "<!--note--><span>x</span>").unwrap();
    assert_eq!(nodes.len(), 2);
    assert_eq!(tree.text_content(nodes[0]), "note");
    assert_eq!(tree.tag_name(nodes[1]), Some("span"));
}

#[test]
fn test_insert_into_document_element_siblings_is_noop() {
    let mut doc = parse("<p>x</p>").unwrap();
    let html = doc.document_element();
    let before = doc.tree().len();
    let inserted =
        insert_adjacent_html(doc.tree_mut(), html, AdjacentPosition::BeforeBegin, "<p>y</p>").unwrap();
    assert!(!inserted);
    assert_eq!(doc.tree().len(), before);
}

#[test]
fn test_set_inner_html_escapes_roundtrip() {
    let mut doc = parse("<div id=d></div>").unwrap();
    let div = doc.get_element_by_id("d").unwrap();
    set_inner_html(doc.tree_mut(), div, "a &amp; b &lt;c&gt;").unwrap();
    assert_eq!(doc.tree().text_content(div), "a & b <c>");
    assert_eq!(HtmlSerializer::new().serialize_inner(doc.tree(), div), "a &amp; b &lt;c&gt;");
}

#[test]
fn test_nbsp_serialization() {
    let mut doc = parse("<div id=d>a&nbsp;b</div>").unwrap();
    let div = doc.get_element_by_id("d").unwrap();
    assert_eq!(doc.tree().text_content(div), "a\u{a0}b");
    assert_eq!(HtmlSerializer::new().serialize_inner(doc.tree(), div), "a&nbsp;b");
    set_inner_html(doc.tree_mut(), div, "").unwrap();
    assert_eq!(HtmlSerializer::new().serialize_inner(doc.tree(), div), "");
}
