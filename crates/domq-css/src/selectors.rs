//! CSS Selectors
//!
//! Parsing and right-to-left matching of selector lists against the DOM
//! tree: compound selectors (type, `#id`, `.class`, attributes,
//! pseudo-classes) joined by descendant, `>`, `+` and `~` combinators.

use domq_dom::{DomTree, NodeId};

use crate::SelectorError;

/// An+B expression for :nth-* selectors
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NthExpression {
    /// Coefficient (A in An+B)
    pub a: i32,
    /// Offset (B in An+B)
    pub b: i32,
}

impl NthExpression {
    /// "odd" (2n+1)
    pub fn odd() -> Self {
        Self { a: 2, b: 1 }
    }

    /// "even" (2n)
    pub fn even() -> Self {
        Self { a: 2, b: 0 }
    }

    /// A simple index (0n+b)
    pub fn index(n: i32) -> Self {
        Self { a: 0, b: n }
    }

    pub fn new(a: i32, b: i32) -> Self {
        Self { a, b }
    }

    /// Parse from string like "2n+1", "odd", "even", "3"
    pub fn parse(s: &str) -> Option<Self> {
        let s: String = s.trim().to_ascii_lowercase().split_whitespace().collect();

        match s.as_str() {
            "odd" => return Some(Self::odd()),
            "even" => return Some(Self::even()),
            _ => {}
        }

        if let Ok(n) = s.parse::<i32>() {
            return Some(Self::index(n));
        }

        let n_pos = s.find('n')?;
        let a = match &s[..n_pos] {
            "" | "+" => 1,
            "-" => -1,
            a_str => a_str.parse().ok()?,
        };
        let rest = &s[n_pos + 1..];
        let b = if rest.is_empty() {
            0
        } else {
            rest.strip_prefix('+').unwrap_or(rest).parse().ok()?
        };

        Some(Self::new(a, b))
    }

    /// Check if index n (1-based) matches this expression
    pub fn matches(&self, n: i32) -> bool {
        if self.a == 0 {
            return n == self.b;
        }

        // Widened so extreme a/b from user selectors cannot overflow
        let (a, diff) = (i64::from(self.a), i64::from(n) - i64::from(self.b));
        diff % a == 0 && diff / a >= 0
    }
}

/// Attribute selector
#[derive(Debug, Clone, PartialEq)]
pub struct AttributeSelector {
    pub name: String,
    pub matcher: Option<AttributeMatcher>,
    pub case_insensitive: bool,
}

#[derive(Debug, Clone, PartialEq)]
pub enum AttributeMatcher {
    /// [attr=value] - exact match
    Exact(String),
    /// [attr~=value] - whitespace-separated list contains
    Contains(String),
    /// [attr|=value] - exact or prefix with hyphen
    DashMatch(String),
    /// [attr^=value] - starts with
    Prefix(String),
    /// [attr$=value] - ends with
    Suffix(String),
    /// [attr*=value] - contains substring
    Substring(String),
}

impl AttributeSelector {
    /// Check if an attribute value matches
    pub fn matches(&self, value: Option<&str>) -> bool {
        let (matcher, value) = match (&self.matcher, value) {
            (_, None) => return false,
            (None, Some(_)) => return true,
            (Some(matcher), Some(value)) => (matcher, value),
        };

        let fold = |s: &str| {
            if self.case_insensitive {
                s.to_lowercase()
            } else {
                s.to_string()
            }
        };
        let val = fold(value);

        match matcher {
            AttributeMatcher::Exact(expected) => val == fold(expected),
            AttributeMatcher::Contains(expected) => {
                let expected = fold(expected);
                val.split_whitespace().any(|w| w == expected)
            }
            AttributeMatcher::DashMatch(expected) => {
                let expected = fold(expected);
                val == expected || val.starts_with(&format!("{expected}-"))
            }
            // Empty needles never match for the substring family
            AttributeMatcher::Prefix(expected) => !expected.is_empty() && val.starts_with(&fold(expected)),
            AttributeMatcher::Suffix(expected) => !expected.is_empty() && val.ends_with(&fold(expected)),
            AttributeMatcher::Substring(expected) => !expected.is_empty() && val.contains(&fold(expected)),
        }
    }
}

/// Supported pseudo-classes
#[derive(Debug, Clone, PartialEq)]
pub enum PseudoClass {
    Root,
    Empty,
    FirstChild,
    LastChild,
    OnlyChild,
    NthChild(NthExpression),
    NthLastChild(NthExpression),
    Checked,
    Disabled,
    Enabled,
    Not(Box<CompoundSelector>),
}

/// A component of a compound selector
#[derive(Debug, Clone, PartialEq)]
pub enum SelectorComponent {
    /// Universal selector *
    Universal,
    /// Type selector (lowercase tag name)
    Type(String),
    /// ID selector #id
    Id(String),
    /// Class selector .class
    Class(String),
    /// Attribute selector [attr], [attr=value], etc.
    Attribute(AttributeSelector),
    /// Pseudo-class :first-child, :nth-child(), etc.
    PseudoClass(PseudoClass),
}

/// Components that must all match one element
#[derive(Debug, Clone, PartialEq, Default)]
pub struct CompoundSelector {
    pub components: Vec<SelectorComponent>,
}

/// Relationship between two compound selectors
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Combinator {
    /// `a b`
    Descendant,
    /// `a > b`
    Child,
    /// `a + b`
    NextSibling,
    /// `a ~ b`
    SubsequentSibling,
}

/// Compound selectors joined by combinators, left to right.
/// `combinators[i]` sits between `compounds[i]` and `compounds[i + 1]`.
#[derive(Debug, Clone, PartialEq)]
pub struct ComplexSelector {
    pub compounds: Vec<CompoundSelector>,
    pub combinators: Vec<Combinator>,
}

/// Comma-separated selector list
#[derive(Debug, Clone, PartialEq)]
pub struct SelectorList {
    pub selectors: Vec<ComplexSelector>,
}

impl SelectorList {
    /// Parse a selector list
    pub fn parse(input: &str) -> Result<Self, SelectorError> {
        Parser::new(input).parse_list()
    }

    /// Does `node` match any selector of the list
    pub fn matches(&self, tree: &DomTree, node: NodeId) -> bool {
        tree.is_element(node) && self.selectors.iter().any(|s| s.matches(tree, node))
    }
}

impl std::str::FromStr for SelectorList {
    type Err = SelectorError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl ComplexSelector {
    pub fn matches(&self, tree: &DomTree, node: NodeId) -> bool {
        match self.compounds.len() {
            0 => false,
            n => self.matches_at(tree, node, n - 1),
        }
    }

    fn matches_at(&self, tree: &DomTree, node: NodeId, idx: usize) -> bool {
        if !self.compounds[idx].matches(tree, node) {
            return false;
        }
        if idx == 0 {
            return true;
        }

        match self.combinators[idx - 1] {
            Combinator::Descendant => tree
                .ancestors(node)
                .filter(|&a| tree.is_element(a))
                .any(|a| self.matches_at(tree, a, idx - 1)),
            Combinator::Child => tree
                .parent_element(node)
                .is_some_and(|p| self.matches_at(tree, p, idx - 1)),
            Combinator::NextSibling => tree
                .prev_element_sibling(node)
                .is_some_and(|s| self.matches_at(tree, s, idx - 1)),
            Combinator::SubsequentSibling => {
                std::iter::successors(tree.prev_element_sibling(node), |&s| tree.prev_element_sibling(s))
                    .any(|s| self.matches_at(tree, s, idx - 1))
            }
        }
    }
}

impl CompoundSelector {
    pub fn matches(&self, tree: &DomTree, node: NodeId) -> bool {
        self.components.iter().all(|c| match_component(c, tree, node))
    }
}

/// Match a selector component against an element
pub fn match_component(component: &SelectorComponent, tree: &DomTree, node: NodeId) -> bool {
    match component {
        SelectorComponent::Universal => tree.is_element(node),
        SelectorComponent::Type(tag) => tree.tag_name(node) == Some(tag.as_str()),
        SelectorComponent::Id(id) => tree.get_attribute(node, "id") == Some(id.as_str()),
        SelectorComponent::Class(class) => tree.has_class(node, class),
        SelectorComponent::Attribute(attr) => attr.matches(tree.get_attribute(node, &attr.name)),
        SelectorComponent::PseudoClass(pseudo) => match_pseudo_class(pseudo, tree, node),
    }
}

fn is_form_control(tree: &DomTree, node: NodeId) -> bool {
    matches!(
        tree.tag_name(node),
        Some("button" | "input" | "select" | "textarea" | "option" | "fieldset")
    )
}

/// (1-based index among element siblings, element sibling count)
fn sibling_position(tree: &DomTree, node: NodeId) -> (usize, usize) {
    let before = std::iter::successors(tree.prev_element_sibling(node), |&s| tree.prev_element_sibling(s)).count();
    let after = std::iter::successors(tree.next_element_sibling(node), |&s| tree.next_element_sibling(s)).count();
    (before + 1, before + after + 1)
}

/// Match a pseudo-class against an element
pub fn match_pseudo_class(pseudo: &PseudoClass, tree: &DomTree, node: NodeId) -> bool {
    match pseudo {
        PseudoClass::Root => tree.is_element(node) && tree.parent(node) == Some(NodeId::ROOT),
        PseudoClass::Empty => tree
            .children(node)
            .all(|(_, child)| !child.is_element() && child.as_text().is_none_or(str::is_empty)),
        PseudoClass::FirstChild => sibling_position(tree, node).0 == 1,
        PseudoClass::LastChild => {
            let (index, count) = sibling_position(tree, node);
            index == count
        }
        PseudoClass::OnlyChild => sibling_position(tree, node).1 == 1,
        PseudoClass::NthChild(expr) => expr.matches(sibling_position(tree, node).0 as i32),
        PseudoClass::NthLastChild(expr) => {
            let (index, count) = sibling_position(tree, node);
            expr.matches((count - index + 1) as i32)
        }
        PseudoClass::Checked => match tree.tag_name(node) {
            Some("input") => tree.has_attribute(node, "checked"),
            Some("option") => tree.has_attribute(node, "selected"),
            _ => false,
        },
        PseudoClass::Disabled => is_form_control(tree, node) && tree.has_attribute(node, "disabled"),
        PseudoClass::Enabled => is_form_control(tree, node) && !tree.has_attribute(node, "disabled"),
        PseudoClass::Not(inner) => !inner.matches(tree, node),
    }
}

// ----------------------------------------------------------------------
// Parser
// ----------------------------------------------------------------------

struct Parser<'a> {
    input: &'a str,
    pos: usize,
}

impl<'a> Parser<'a> {
    fn new(input: &'a str) -> Self {
        Self { input, pos: 0 }
    }

    fn peek(&self) -> Option<char> {
        self.input[self.pos..].chars().next()
    }

    fn bump(&mut self) -> Option<char> {
        let c = self.peek()?;
        self.pos += c.len_utf8();
        Some(c)
    }

    fn eat(&mut self, expected: char) -> bool {
        if self.peek() == Some(expected) {
            self.pos += expected.len_utf8();
            true
        } else {
            false
        }
    }

    /// Skip whitespace, returning whether any was skipped
    fn skip_ws(&mut self) -> bool {
        let start = self.pos;
        while self.peek().is_some_and(char::is_whitespace) {
            self.bump();
        }
        self.pos != start
    }

    fn unexpected(&self) -> SelectorError {
        match self.peek() {
            Some(found) => SelectorError::UnexpectedToken { pos: self.pos, found },
            None => SelectorError::UnexpectedEnd,
        }
    }

    fn parse_list(mut self) -> Result<SelectorList, SelectorError> {
        self.skip_ws();
        if self.peek().is_none() {
            return Err(SelectorError::Empty);
        }

        let mut selectors = Vec::new();
        loop {
            self.skip_ws();
            selectors.push(self.parse_complex()?);
            self.skip_ws();
            match self.peek() {
                Some(',') => {
                    self.bump();
                }
                None => break,
                Some(_) => return Err(self.unexpected()),
            }
        }

        Ok(SelectorList { selectors })
    }

    fn parse_complex(&mut self) -> Result<ComplexSelector, SelectorError> {
        let mut compounds = vec![self.parse_compound()?];
        let mut combinators = Vec::new();

        loop {
            let had_ws = self.skip_ws();
            let combinator = match self.peek() {
                Some('>') => Combinator::Child,
                Some('+') => Combinator::NextSibling,
                Some('~') => Combinator::SubsequentSibling,
                Some(',') | None => break,
                Some(_) if had_ws => {
                    combinators.push(Combinator::Descendant);
                    compounds.push(self.parse_compound()?);
                    continue;
                }
                Some(_) => return Err(self.unexpected()),
            };
            self.bump();
            self.skip_ws();
            combinators.push(combinator);
            compounds.push(self.parse_compound()?);
        }

        Ok(ComplexSelector { compounds, combinators })
    }

    fn parse_compound(&mut self) -> Result<CompoundSelector, SelectorError> {
        let mut components = Vec::new();

        if self.eat('*') {
            components.push(SelectorComponent::Universal);
        } else if self.peek().is_some_and(is_ident_start) {
            components.push(SelectorComponent::Type(self.parse_ident()?.to_ascii_lowercase()));
        }

        loop {
            match self.peek() {
                Some('#') => {
                    self.bump();
                    components.push(SelectorComponent::Id(self.parse_ident()?));
                }
                Some('.') => {
                    self.bump();
                    components.push(SelectorComponent::Class(self.parse_ident()?));
                }
                Some('[') => {
                    self.bump();
                    components.push(SelectorComponent::Attribute(self.parse_attribute()?));
                }
                Some(':') => {
                    self.bump();
                    components.push(SelectorComponent::PseudoClass(self.parse_pseudo()?));
                }
                _ => break,
            }
        }

        if components.is_empty() {
            return Err(self.unexpected());
        }
        Ok(CompoundSelector { components })
    }

    fn parse_ident(&mut self) -> Result<String, SelectorError> {
        let mut ident = String::new();
        while let Some(c) = self.peek() {
            if c == '\\' {
                self.bump();
                ident.push(self.bump().ok_or(SelectorError::UnexpectedEnd)?);
            } else if is_ident_char(c) {
                ident.push(c);
                self.bump();
            } else {
                break;
            }
        }
        if ident.is_empty() {
            return Err(self.unexpected());
        }
        Ok(ident)
    }

    fn parse_attribute(&mut self) -> Result<AttributeSelector, SelectorError> {
        self.skip_ws();
        let name = self.parse_ident()?.to_ascii_lowercase();
        self.skip_ws();

        if self.eat(']') {
            return Ok(AttributeSelector { name, matcher: None, case_insensitive: false });
        }

        let op = match self.bump() {
            Some('=') => '=',
            Some(c @ ('~' | '|' | '^' | '$' | '*')) if self.eat('=') => c,
            None => return Err(SelectorError::Unterminated),
            _ => return Err(self.unexpected()),
        };

        self.skip_ws();
        let value = match self.peek() {
            Some(quote @ ('"' | '\'')) => {
                self.bump();
                self.parse_quoted(quote)?
            }
            _ => self.parse_ident()?,
        };
        self.skip_ws();

        let case_insensitive = if self.peek().is_some_and(|c| c == 'i' || c == 'I') {
            self.bump();
            self.skip_ws();
            true
        } else {
            if self.peek().is_some_and(|c| c == 's' || c == 'S') {
                self.bump();
                self.skip_ws();
            }
            false
        };

        if !self.eat(']') {
            return Err(SelectorError::Unterminated);
        }

        let matcher = match op {
            '=' => AttributeMatcher::Exact(value),
            '~' => AttributeMatcher::Contains(value),
            '|' => AttributeMatcher::DashMatch(value),
            '^' => AttributeMatcher::Prefix(value),
            '$' => AttributeMatcher::Suffix(value),
            _ => AttributeMatcher::Substring(value),
        };

        Ok(AttributeSelector { name, matcher: Some(matcher), case_insensitive })
    }

    fn parse_quoted(&mut self, quote: char) -> Result<String, SelectorError> {
        let mut value = String::new();
        loop {
            match self.bump() {
                None => return Err(SelectorError::Unterminated),
                Some('\\') => value.push(self.bump().ok_or(SelectorError::Unterminated)?),
                Some(c) if c == quote => return Ok(value),
                Some(c) => value.push(c),
            }
        }
    }

    /// Raw text between parentheses, honouring nesting
    fn parse_parenthesized(&mut self) -> Result<&'a str, SelectorError> {
        let input = self.input;
        let start = self.pos;
        let mut depth = 1;
        while let Some(c) = self.bump() {
            match c {
                '(' => depth += 1,
                ')' => {
                    depth -= 1;
                    if depth == 0 {
                        return Ok(&input[start..self.pos - 1]);
                    }
                }
                _ => {}
            }
        }
        Err(SelectorError::Unterminated)
    }

    fn parse_pseudo(&mut self) -> Result<PseudoClass, SelectorError> {
        if self.peek() == Some(':') {
            let start = self.pos;
            self.bump();
            let name = self.parse_ident().unwrap_or_default();
            return Err(SelectorError::UnsupportedPseudo(format!(":{}", &self.input[start..start + 1 + name.len()])));
        }

        let name = self.parse_ident()?.to_ascii_lowercase();
        let arg = if self.eat('(') { Some(self.parse_parenthesized()?) } else { None };

        let pseudo = match (name.as_str(), arg) {
            ("root", None) => PseudoClass::Root,
            ("empty", None) => PseudoClass::Empty,
            ("first-child", None) => PseudoClass::FirstChild,
            ("last-child", None) => PseudoClass::LastChild,
            ("only-child", None) => PseudoClass::OnlyChild,
            ("checked", None) => PseudoClass::Checked,
            ("disabled", None) => PseudoClass::Disabled,
            ("enabled", None) => PseudoClass::Enabled,
            ("nth-child", Some(arg)) => PseudoClass::NthChild(
                NthExpression::parse(arg).ok_or_else(|| SelectorError::UnsupportedPseudo(format!(":nth-child({arg})")))?,
            ),
            ("nth-last-child", Some(arg)) => PseudoClass::NthLastChild(
                NthExpression::parse(arg).ok_or_else(|| SelectorError::UnsupportedPseudo(format!(":nth-last-child({arg})")))?,
            ),
            ("not", Some(arg)) => {
                let mut inner = Parser::new(arg.trim());
                let compound = inner.parse_compound()?;
                if inner.peek().is_some() {
                    return Err(SelectorError::UnsupportedPseudo(format!(":not({arg})")));
                }
                PseudoClass::Not(Box::new(compound))
            }
            (_, Some(arg)) => return Err(SelectorError::UnsupportedPseudo(format!(":{name}({arg})"))),
            (_, None) => return Err(SelectorError::UnsupportedPseudo(format!(":{name}"))),
        };

        Ok(pseudo)
    }
}

fn is_ident_start(c: char) -> bool {
    c.is_ascii_alphabetic() || c == '_' || c == '-' || c == '\\' || !c.is_ascii()
}

fn is_ident_char(c: char) -> bool {
    c.is_ascii_alphanumeric() || c == '_' || c == '-' || !c.is_ascii()
}
