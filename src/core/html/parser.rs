//! Structural parser: token stream → element tree
//!
//! Keeps an explicit stack of open elements. An element is attached to its
//! parent when it closes, so the stack always holds the path from the root
//! to the element currently receiving children. Closing anything other than
//! the top of the stack is an error; the parser does not repair markup.

use lazy_static::lazy_static;
use regex::Regex;
use tracing::warn;

use super::lexer::{tokenize, Token};
use super::{Attributes, Child, Node};
use crate::data::entities::lookup_entity;
use crate::data::html_tags::is_void_tag;
use crate::utils::error::{ConversionError, ConversionResult};

lazy_static! {
    /// ASCII whitespace runs; U+00A0 is deliberately not included
    static ref WHITESPACE_RUN: Regex = Regex::new(r"[ \t\n\r\x0B\x0C]+").unwrap();
}

/// Parse an HTML fragment into a tree rooted at a synthetic node
pub fn parse_html(input: &str) -> ConversionResult<Node> {
    let mut parser = StructuralParser::new();
    for token in tokenize(input)? {
        parser.feed(token)?;
    }
    Ok(parser.finish())
}

/// Tree builder over lexical events. Use one parser per document.
#[derive(Debug)]
pub struct StructuralParser {
    /// Open elements; index 0 is the document root
    stack: Vec<Node>,
    /// Number of open `pre` elements
    pre_depth: usize,
}

impl Default for StructuralParser {
    fn default() -> Self {
        Self::new()
    }
}

impl StructuralParser {
    pub fn new() -> Self {
        StructuralParser {
            stack: vec![Node::root()],
            pre_depth: 0,
        }
    }

    /// Feed one lexical event
    pub fn feed(&mut self, token: Token) -> ConversionResult<()> {
        match token {
            Token::StartTag {
                name,
                attributes,
                self_closing,
            } => self.handle_start_tag(name, attributes, self_closing),
            Token::EndTag { name } => self.handle_end_tag(&name),
            Token::Text(text) => {
                self.handle_data(&text);
                Ok(())
            }
            Token::CharRef(ch) => {
                self.handle_data(ch.encode_utf8(&mut [0u8; 4]));
                Ok(())
            }
            Token::EntityRef(name) => {
                match lookup_entity(&name) {
                    Some(ch) => self.handle_data(ch.encode_utf8(&mut [0u8; 4])),
                    None => self.handle_data(&format!("&{};", name)),
                }
                Ok(())
            }
        }
    }

    /// Number of currently open elements, not counting the root
    pub fn depth(&self) -> usize {
        self.stack.len() - 1
    }

    /// Close whatever is still open and return the root
    pub fn finish(mut self) -> Node {
        while self.stack.len() > 1 {
            if let Some(node) = self.stack.pop() {
                warn!(tag = %node.tag, "element left open at end of input, closing it");
                self.append(Child::Element(node));
            }
        }
        self.stack.pop().unwrap_or_default()
    }

    fn handle_start_tag(
        &mut self,
        name: String,
        attributes: Vec<(String, String)>,
        self_closing: bool,
    ) -> ConversionResult<()> {
        let attributes: Attributes = attributes.into_iter().collect();
        if name == "pre" {
            self.pre_depth += 1;
        }
        let closes_immediately = self_closing || is_void_tag(&name);
        self.stack.push(Node::new(name.clone(), attributes));
        if closes_immediately {
            self.close(&name)?;
        }
        Ok(())
    }

    fn handle_end_tag(&mut self, name: &str) -> ConversionResult<()> {
        if is_void_tag(name) {
            return Err(ConversionError::structural(format!(
                "Tag {} can't be closed using </{}>, use <{} /> instead",
                name, name, name
            )));
        }
        self.close(name)
    }

    fn close(&mut self, name: &str) -> ConversionResult<()> {
        let matches_top = self.stack.len() > 1
            && self.stack.last().map(|node| node.tag.as_str()) == Some(name);
        if !matches_top {
            return Err(ConversionError::structural(format!(
                "Tag <{}> cannot be closed because it is not open",
                name
            )));
        }
        if name == "pre" {
            self.pre_depth = self.pre_depth.saturating_sub(1);
        }
        if let Some(node) = self.stack.pop() {
            self.append(Child::Element(node));
        }
        Ok(())
    }

    fn handle_data(&mut self, data: &str) {
        if self.pre_depth > 0 {
            self.append_text(data);
        } else {
            let collapsed = WHITESPACE_RUN.replace_all(data, " ");
            self.append_text(&collapsed);
        }
    }

    fn append_text(&mut self, text: &str) {
        if text.is_empty() {
            return;
        }
        if let Some(top) = self.stack.last_mut() {
            if let Some(Child::Text(last)) = top.children.last_mut() {
                last.push_str(text);
            } else {
                top.children.push(Child::Text(text.to_string()));
            }
        }
    }

    fn append(&mut self, child: Child) {
        if let Some(top) = self.stack.last_mut() {
            top.children.push(child);
        }
    }
}
