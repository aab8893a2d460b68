//! Comprehensive tests for domq
//!
//! Selection behaviour end to end: construction, re-scoping, mutation,
//! scalar access, insertion, events and the request helper.

use std::cell::{Cell, RefCell};
use std::rc::Rc;

use domq::*;

const LIST: &str = r#"
<!DOCTYPE html>
<html>
<head><title>List</title></head>
<body>
  <ul id="list" class="menu wide">
    <li class="item a" data-user-id="1">a</li>
    <li class="item b">b</li>
    <li class="item c">c</li>
  </ul>
  <div id="panel"><p class="x">Hello</p><section><p>deep</p></section></div>
</body>
</html>
"#;

fn page() -> Page {
    Page::from_html(LIST).unwrap()
}

// ============================================================================
// EMPTY SELECTIONS
// ============================================================================

#[test]
fn test_empty_selection_is_inert() {
    let page = page();
    let before = page.select("body").html();

    let mut sel = select(&page, ".nothing");
    assert_eq!(sel.len(), 0);

    sel.css("color", "red")
        .show()
        .hide()
        .remove()
        .rm_class(&["a"])
        .rm_class(&[])
        .add_class(&["z"])
        .first()
        .last()
        .children("li")
        .find("li")
        .parent()
        .filter("li")
        .includes("a")
        .text_is("a")
        .click()
        .set_text("x")
        .set_html("<b>x</b>")
        .set_data("k", "v")
        .remove_data("k")
        .set_attr("id", "x")
        .remove_attr("id")
        .before("<p>x</p>")
        .prepend("<p>x</p>")
        .append("<p>x</p>")
        .after("<p>x</p>")
        .on("click", |_| {})
        .each(|_| panic!("no elements to visit"));

    assert_eq!(sel.count(), 0);
    assert_eq!(sel.text(), "");
    assert_eq!(sel.html(), "");
    assert_eq!(sel.data("k"), None);
    assert_eq!(sel.attr("id"), None);
    assert_eq!(sel.width(), -1.0);
    assert_eq!(sel.height(), -1.0);
    assert!(!sel.has_class("a"));
    assert_eq!(page.select("body").html(), before);
}

// ============================================================================
// CLASSES
// ============================================================================

#[test]
fn test_rm_class_named_keeps_others() {
    let page = page();
    page.select("li").rm_class(&["a", "item"]);

    let doc = page.document();
    let classes: Vec<_> = page
        .select("li")
        .nodes()
        .iter()
        .map(|&li| doc.tree().get_attribute(li, "class").unwrap_or_default().to_string())
        .collect();
    assert_eq!(classes, vec!["", "b", "c"]);
}

#[test]
fn test_rm_class_without_names_clears_all() {
    let page = page();
    page.select("li").rm_class(&[]);
    let doc = page.document();
    for li in page.select("li").nodes() {
        assert_eq!(doc.tree().get_attribute(*li, "class"), Some(""));
    }
}

#[test]
fn test_add_and_has_class() {
    let page = page();
    let mut sel = page.select("li");
    sel.add_class(&["active", "item"]);
    assert!(sel.has_class("active"));
    assert_eq!(page.select("li.active.item").len(), 3);
    assert_eq!(sel.attr("class").as_deref(), Some("item a active"));
}

// ============================================================================
// RE-SCOPING
// ============================================================================

#[test]
fn test_first_last_sizes() {
    let page = page();
    let li = page.select("li");
    assert_eq!(li.clone().first().len(), 1);
    assert_eq!(li.clone().last().len(), 1);
    assert_eq!(li.clone().first().last().len(), 1);

    let once = li.clone().first().nodes().to_vec();
    let twice = li.clone().first().first().nodes().to_vec();
    assert_eq!(once, twice);
}

#[test]
fn test_parent_width_preserving() {
    let page = page();
    let mut sel = page.select("html, li");
    assert_eq!(sel.len(), 4);
    sel.parent();
    assert_eq!(sel.len(), 4);

    let html = page.document().document_element();
    let list = page.document().get_element_by_id("list").unwrap();
    assert_eq!(sel.nodes(), &[html, list, list, list]);
}

#[test]
fn test_children_and_find_use_first_element_only() {
    let page = page();
    // #panel comes first; the nested section is never consulted
    let mut sel = page.select("#panel, section");
    assert_eq!(sel.len(), 2);
    let panel = sel.get(0).unwrap();
    assert_eq!(page.document().get_element_by_id("panel"), Some(panel));

    assert_eq!(sel.clone().children("p").len(), 1);
    assert_eq!(sel.clone().find("p").len(), 2);
    assert_eq!(sel.children("li").len(), 0);
}

#[test]
fn test_includes_keeps_order() {
    let page = page();
    let all = page.select("li");
    let mut sel = all.clone();
    sel.includes("b");
    assert_eq!(sel.nodes(), &[all.nodes()[1]]);

    let mut none = all.clone();
    none.includes("zzz");
    assert!(none.is_empty());
}

#[test]
fn test_text_is_exact_match() {
    let page = page();
    assert_eq!(page.select("li").text_is("b").len(), 1);
    assert_eq!(page.select("p").text_is("Hell").len(), 0);
    assert_eq!(page.select("p").text_is("Hello").len(), 1);
}

#[test]
fn test_filter() {
    let page = page();
    assert_eq!(page.select("li").filter(":not(.b)").len(), 2);
    assert_eq!(page.select("p").filter("section > p").text(), "deep");
}

// ============================================================================
// SCALAR ACCESS
// ============================================================================

#[test]
fn test_attr_modes() {
    let page = page();
    let mut empty = page.select("blink");
    assert_eq!(empty.attr("id"), None);
    empty.set_attr("id", "x");
    assert!(page.document().get_element_by_id("x").is_none());

    let mut sel = page.select("li");
    sel.set_attr("id", "x");
    assert_eq!(sel.attr("id").as_deref(), Some("x"));
    // Only the first element changed
    assert_eq!(page.select("[id=x]").len(), 1);

    sel.remove_attr("id");
    assert_eq!(sel.attr("id"), None);
}

#[test]
fn test_text_get_set() {
    let page = page();
    let mut sel = page.select("#panel p");
    assert_eq!(sel.text(), "Hello");
    sel.set_text("Bye");
    assert_eq!(sel.text(), "Bye");
    // The second <p> is untouched
    assert_eq!(sel.clone().last().text(), "deep");
}

#[test]
fn test_html_get_set() {
    let page = page();
    let mut sel = page.select("#panel");
    assert_eq!(sel.html(), r#"<p class="x">Hello</p><section><p>deep</p></section>"#);

    sel.set_html("<em>new</em> text");
    assert_eq!(sel.html(), "<em>new</em> text");
    assert_eq!(page.select("#panel em").len(), 1);
    assert_eq!(page.select("section").len(), 0);
}

#[test]
fn test_data_modes() {
    let page = page();
    let mut sel = page.select("li");
    assert_eq!(sel.data("userId").as_deref(), Some("1"));
    assert_eq!(sel.data("missing"), None);

    sel.set_data("lastSeen", "today");
    assert_eq!(sel.attr("data-last-seen").as_deref(), Some("today"));

    sel.remove_data("userId");
    assert_eq!(sel.data("userId"), None);
}

// ============================================================================
// STYLE, REMOVAL, INSERTION
// ============================================================================

#[test]
fn test_hide_then_show_is_lossy() {
    let page = page();
    let mut sel = page.select("ul");
    sel.css("display", "flex").hide().show();
    assert_eq!(sel.attr("style").as_deref(), Some("display: block;"));
}

#[test]
fn test_remove_leaves_stale_selection() {
    let page = page();
    let mut sel = page.select("li");
    sel.remove();
    assert_eq!(sel.len(), 3);
    assert_eq!(page.select("li").len(), 0);
    // Detached nodes still answer reads
    assert_eq!(sel.text(), "a");
    assert_eq!(sel.width(), 0.0);
    assert_eq!(sel.clone().parent().nodes(), sel.nodes());
}

#[test]
fn test_adjacent_insertion() {
    let page = page();
    page.select("li.b")
        .before("<li>before</li>")
        .after("<li>after</li>");
    page.select("ul").prepend("<li>first</li>").append("<li>last</li>");

    let texts: Vec<String> = page
        .select("li")
        .nodes()
        .iter()
        .map(|&li| page.document().tree().text_content(li))
        .collect();
    assert_eq!(texts, vec!["first", "a", "before", "b", "after", "c", "last"]);
}

#[test]
fn test_sibling_insertion_needs_parent() {
    let page = page();
    let mut sel = page.select("#panel");
    sel.remove();
    sel.before("<p>x</p>").after("<p>y</p>");
    assert_eq!(page.select("p").len(), 0);

    // Child insertion still works on the detached element
    sel.append("<p>z</p>");
    assert_eq!(sel.find("p").len(), 3);
}

// ============================================================================
// EVENTS
// ============================================================================

#[test]
fn test_click_runs_listeners_and_bubbles() {
    let page = page();
    let log = Rc::new(RefCell::new(Vec::new()));

    let sink = log.clone();
    page.select("ul").on("click", move |e| sink.borrow_mut().push(("ul", e.target)));
    let sink = log.clone();
    page.select("li").on("click", move |e| sink.borrow_mut().push(("li", e.target)));

    let items = page.select("li");
    page.select("li").first().click();

    let first = items.nodes()[0];
    assert_eq!(*log.borrow(), vec![("li", first), ("ul", first)]);
}

#[test]
fn test_click_handler_can_query_page() {
    let page = page();
    let inner = page.downgrade();
    page.select("li.a").on("click", move |_| {
        if let Some(page) = inner.upgrade() {
            page.select("li.c").set_text("clicked");
        }
    });
    page.select("li.a").click();
    assert_eq!(page.select("li.c").text(), "clicked");
}

#[test]
fn test_click_toggles_checkbox_and_respects_prevent_default() {
    let page = Page::from_html(
        r#"<input id="agree" type="checkbox">
           <input id="locked" type="checkbox" checked>
           <button id="off" disabled>x</button>"#,
    )
    .unwrap();

    page.select("#agree").click();
    assert_eq!(page.select("#agree").attr("checked").as_deref(), Some(""));

    page.select("#locked").on("click", |e| e.prevent_default()).click();
    assert_eq!(page.select("#locked").attr("checked").as_deref(), Some(""));

    let fired = Rc::new(Cell::new(false));
    let flag = fired.clone();
    page.select("#off").on("click", move |_| flag.set(true)).click();
    assert!(!fired.get());
}

#[test]
fn test_radio_group_click() {
    let page = Page::from_html(
        r#"<input type="radio" name="size" value="s" checked>
           <input type="radio" name="size" value="m">"#,
    )
    .unwrap();
    page.select("[value=m]").click();
    assert_eq!(page.select(":checked").attr("value").as_deref(), Some("m"));
    assert_eq!(page.select(":checked").len(), 1);
}

// ============================================================================
// GEOMETRY
// ============================================================================

#[test]
fn test_geometry() {
    let page = Page::from_html(r#"<div id="a" style="width: 120px; height: 30px"></div>"#).unwrap();
    let mut sel = page.select("#a");
    assert_eq!(sel.width(), 120.0);
    assert_eq!(sel.height(), 30.0);

    sel.hide();
    assert_eq!(sel.width(), 0.0);

    let node = sel.nodes()[0];
    page.document_mut().set_layout_box(node, DomRect::from_xywh(0.0, 0.0, 64.0, 16.0));
    assert_eq!(sel.width(), 64.0);
    assert_eq!(sel.height(), 16.0);
}

// ============================================================================
// REQUEST HELPER
// ============================================================================

struct Canned(Option<&'static str>);

impl Transport for Canned {
    async fn send(&self, _request: &Request) -> Result<TransportResponse, NetError> {
        Ok(match self.0 {
            Some(body) => TransportResponse::ok(body),
            None => TransportResponse::empty(),
        })
    }
}

#[test]
fn test_ajax_onload_once() {
    let loads = RefCell::new(Vec::new());
    let errors = Cell::new(0);
    smol::block_on(ajax(
        Canned(Some("body")),
        &Request::get("/ok"),
        |text| loads.borrow_mut().push(text),
        || errors.set(errors.get() + 1),
    ))
    .unwrap();
    assert_eq!(*loads.borrow(), vec!["body".to_string()]);
    assert_eq!(errors.get(), 0);
}

#[test]
fn test_ajax_onerror_once() {
    let loads = Cell::new(0);
    let errors = Cell::new(0);
    smol::block_on(ajax(
        Canned(None),
        &Request::get("/ok"),
        |_| loads.set(loads.get() + 1),
        || errors.set(errors.get() + 1),
    ))
    .unwrap();
    assert_eq!(loads.get(), 0);
    assert_eq!(errors.get(), 1);
}

#[test]
fn test_ajax_result_updates_page() {
    let page = page();
    let executor = smol::LocalExecutor::new();
    let target = page.clone();
    let task = spawn_ajax(
        &executor,
        Canned(Some("<li>loaded</li>")),
        Request::get("/items"),
        move |markup| {
            target.select("ul").append(&markup);
        },
        || {},
    );
    smol::block_on(executor.run(task)).unwrap();
    assert_eq!(page.select("li").last().text(), "loaded");
}
