//! domq CSS
//!
//! Selector parsing and matching for element queries, and inline style
//! declarations for style mutation.

mod query;
mod selectors;
mod style;

pub use query::{query_children, query_selector, query_selector_all, select_all};
pub use selectors::{
    AttributeMatcher, AttributeSelector, Combinator, ComplexSelector, CompoundSelector,
    NthExpression, PseudoClass, SelectorComponent, SelectorList, match_component,
    match_pseudo_class,
};
pub use style::{
    Axis, Declaration, StyleDeclaration, inline_style, is_display_none, normalize_property,
    resolve_extent, set_style_property, style_property,
};

/// Selector parsing error
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum SelectorError {
    #[error("empty selector")]
    Empty,

    #[error("unexpected '{found}' at offset {pos}")]
    UnexpectedToken { pos: usize, found: char },

    #[error("unexpected end of selector")]
    UnexpectedEnd,

    #[error("unterminated attribute selector or string")]
    Unterminated,

    #[error("unsupported pseudo selector: {0}")]
    UnsupportedPseudo(String),
}
