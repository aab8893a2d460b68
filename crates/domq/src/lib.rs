//! domq
//!
//! A chainable selection facade over an HTML document, plus a callback-style
//! request helper.
//!
//! ```no_run
//! let page = domq::Page::from_html("<ul><li>a</li><li>b</li></ul>").unwrap();
//! domq::select(&page, "li").includes("b").set_attr("id", "second").hide();
//! ```

mod config;
mod manipulation;
mod page;
mod selection;

pub use config::Config;
pub use page::{Page, WeakPage};
pub use selection::Selection;

pub use domq_dom::{Document, DomRect, Event, NodeId};
pub use domq_html::HtmlError;
pub use domq_net::{
    ClientConfig, HttpTransport, Method, NetError, ReadyState, Request, Transport,
    TransportResponse, XmlHttpRequest, ajax, spawn_ajax,
};

/// Errors building a page
#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("HTML error: {0}")]
    Html(#[from] HtmlError),

    #[error("Network error: {0}")]
    Net(#[from] NetError),
}

/// Every element of `page` matching `selector`, in document order.
/// A selector that matches nothing (or cannot be parsed) gives an empty
/// selection.
pub fn select(page: &Page, selector: &str) -> Selection {
    page.select(selector)
}
