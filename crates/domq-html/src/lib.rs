//! domq HTML
//!
//! HTML5 parsing via html5ever, fragment insertion and serialization.

mod fragment;
mod parser;
mod serializer;

pub use domq_dom::{Document, DomError};
pub use fragment::{AdjacentPosition, insert_adjacent_html, set_inner_html};
pub use parser::{HtmlParser, parse_fragment_into};
pub use serializer::HtmlSerializer;

/// HTML parsing or insertion error
#[derive(Debug, thiserror::Error)]
pub enum HtmlError {
    #[error("failed to read HTML input: {0}")]
    Io(#[from] std::io::Error),

    #[error(transparent)]
    Dom(#[from] DomError),
}

/// Parse HTML string into a Document
pub fn parse(html: &str) -> Result<Document, HtmlError> {
    HtmlParser::new().parse(html)
}
