//! HTML structure recovery
//!
//! Turns wiki-rendered HTML into an ordered tree of tagged nodes and text
//! runs. The tree is strict: every element that was opened is closed by its
//! own end tag, so the renderer never has to guess at structure.
//!
//! ```text
//! HTML text -> lexer::tokenize -> parser::StructuralParser -> normalize::normalize
//! ```

pub mod lexer;
pub mod normalize;
pub mod parser;

use indexmap::IndexMap;

pub use lexer::{tokenize, Token};
pub use normalize::normalize;
pub use parser::{parse_html, StructuralParser};

/// Attribute map of an element, in source order
pub type Attributes = IndexMap<String, String>;

/// A child of an element: either a nested element or a text run
#[derive(Debug, Clone, PartialEq)]
pub enum Child {
    Element(Node),
    Text(String),
}

/// An HTML element with its attributes and children
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Node {
    /// Lowercase tag name, empty for the synthetic document root
    pub tag: String,
    pub attributes: Attributes,
    pub children: Vec<Child>,
}

impl Node {
    /// Create an element without children
    pub fn new(tag: impl Into<String>, attributes: Attributes) -> Self {
        Node {
            tag: tag.into(),
            attributes,
            children: Vec::new(),
        }
    }

    /// Create the synthetic document root
    pub fn root() -> Self {
        Node::default()
    }

    /// Create an element with no attributes wrapping the given children
    pub fn synthetic(tag: &str, children: Vec<Child>) -> Self {
        Node {
            tag: tag.to_string(),
            attributes: Attributes::new(),
            children,
        }
    }

    pub fn is_root(&self) -> bool {
        self.tag.is_empty()
    }

    /// Get an attribute value
    pub fn attr(&self, name: &str) -> Option<&str> {
        self.attributes.get(name).map(String::as_str)
    }

    /// Whether the whitespace-separated `class` attribute contains `class`
    pub fn has_class(&self, class: &str) -> bool {
        self.attr("class")
            .map(|classes| classes.split_whitespace().any(|c| c == class))
            .unwrap_or(false)
    }

    /// The text of the only child, if the element has exactly one text child
    pub fn sole_text(&self) -> Option<&str> {
        match self.children.as_slice() {
            [Child::Text(text)] => Some(text),
            _ => None,
        }
    }

    /// Iterate over element children, skipping text runs
    pub fn elements(&self) -> impl Iterator<Item = &Node> {
        self.children.iter().filter_map(|child| match child {
            Child::Element(node) => Some(node),
            Child::Text(_) => None,
        })
    }
}
