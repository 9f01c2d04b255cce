//! HTML lexer producing a flat token stream
//!
//! Emits start/end tags, text and character references. It performs no
//! tree construction and no error recovery beyond treating stray `<` and
//! `&` as text. Comments, doctypes, CDATA sections and processing
//! instructions are dropped. The bodies of `script` and `style` are raw text.

use crate::data::entities::lookup_entity;
use crate::utils::error::{ConversionError, ConversionResult};

/// A lexical event
#[derive(Debug, Clone, PartialEq)]
pub enum Token {
    /// `<name attr=value ...>` or `<name ... />`
    StartTag {
        name: String,
        attributes: Vec<(String, String)>,
        self_closing: bool,
    },
    /// `</name>`
    EndTag { name: String },
    /// Character data between tags
    Text(String),
    /// `&#NNN;` or `&#xHHH;`
    CharRef(char),
    /// `&name;` (not yet resolved)
    EntityRef(String),
}

/// A character reference found in text
enum Reference<'a> {
    Numeric(char),
    Named(&'a str),
}

const RAWTEXT_ELEMENTS: &[&str] = &["script", "style"];

fn is_tag_name_byte(b: u8) -> bool {
    b.is_ascii_alphanumeric() || matches!(b, b':' | b'_' | b'-')
}

fn is_attr_name_end(b: u8) -> bool {
    b.is_ascii_whitespace() || matches!(b, b'=' | b'>' | b'/')
}

/// Parse a character reference at the start of `s` (which begins with `&`).
///
/// Returns the reference and the number of bytes it spans, including the
/// terminating semicolon. References without a semicolon are not recognized.
fn parse_reference(s: &str) -> Option<(Reference<'_>, usize)> {
    let bytes = s.as_bytes();
    debug_assert_eq!(bytes.first(), Some(&b'&'));

    if bytes.get(1) == Some(&b'#') {
        let (start, radix) = match bytes.get(2) {
            Some(b'x') | Some(b'X') => (3, 16),
            _ => (2, 10),
        };
        let digits = bytes[start..]
            .iter()
            .take_while(|b| {
                if radix == 16 {
                    b.is_ascii_hexdigit()
                } else {
                    b.is_ascii_digit()
                }
            })
            .count();
        let end = start + digits;
        if digits == 0 || bytes.get(end) != Some(&b';') {
            return None;
        }
        let ch = u32::from_str_radix(&s[start..end], radix)
            .ok()
            .and_then(char::from_u32)
            .unwrap_or(char::REPLACEMENT_CHARACTER);
        return Some((Reference::Numeric(ch), end + 1));
    }

    if !bytes.get(1).is_some_and(|b| b.is_ascii_alphabetic()) {
        return None;
    }
    let len = bytes[1..]
        .iter()
        .take_while(|b| b.is_ascii_alphanumeric())
        .count();
    let end = 1 + len;
    if bytes.get(end) != Some(&b';') {
        return None;
    }
    Some((Reference::Named(&s[1..end]), end + 1))
}

/// Decode character references inside an attribute value.
///
/// Unknown named references are kept literally.
pub fn decode_attribute_value(value: &str) -> String {
    let mut out = String::with_capacity(value.len());
    let mut rest = value;
    while let Some(amp) = rest.find('&') {
        out.push_str(&rest[..amp]);
        rest = &rest[amp..];
        match parse_reference(rest) {
            Some((Reference::Numeric(ch), len)) => {
                out.push(ch);
                rest = &rest[len..];
            }
            Some((Reference::Named(name), len)) => {
                match lookup_entity(name) {
                    Some(ch) => out.push(ch),
                    None => out.push_str(&rest[..len]),
                }
                rest = &rest[len..];
            }
            None => {
                out.push('&');
                rest = &rest[1..];
            }
        }
    }
    out.push_str(rest);
    out
}

/// Tokenize an HTML string
pub fn tokenize(input: &str) -> ConversionResult<Vec<Token>> {
    Lexer::new(input).run()
}

struct Lexer<'a> {
    src: &'a str,
    bytes: &'a [u8],
    pos: usize,
    tokens: Vec<Token>,
}

impl<'a> Lexer<'a> {
    fn new(src: &'a str) -> Self {
        Lexer {
            src,
            bytes: src.as_bytes(),
            pos: 0,
            tokens: Vec::new(),
        }
    }

    fn run(mut self) -> ConversionResult<Vec<Token>> {
        let src = self.src;
        while self.pos < self.bytes.len() {
            if self.bytes[self.pos] == b'<' {
                self.lex_markup()?;
            } else {
                let end = src[self.pos..]
                    .find('<')
                    .map_or(self.bytes.len(), |rel| self.pos + rel);
                self.lex_text(&src[self.pos..end]);
                self.pos = end;
            }
        }
        Ok(self.tokens)
    }

    fn starts_with(&self, pat: &str) -> bool {
        self.src[self.pos..].starts_with(pat)
    }

    /// Move past the first occurrence of `terminator`, or to the end of input
    fn skip_past(&mut self, from: usize, terminator: &str) {
        self.pos = self.src[from..]
            .find(terminator)
            .map_or(self.bytes.len(), |rel| from + rel + terminator.len());
    }

    fn push_text(&mut self, text: &str) {
        if text.is_empty() {
            return;
        }
        if let Some(Token::Text(last)) = self.tokens.last_mut() {
            last.push_str(text);
        } else {
            self.tokens.push(Token::Text(text.to_string()));
        }
    }

    fn lex_text(&mut self, text: &str) {
        let mut rest = text;
        while let Some(amp) = rest.find('&') {
            self.push_text(&rest[..amp]);
            rest = &rest[amp..];
            match parse_reference(rest) {
                Some((Reference::Numeric(ch), len)) => {
                    self.tokens.push(Token::CharRef(ch));
                    rest = &rest[len..];
                }
                Some((Reference::Named(name), len)) => {
                    self.tokens.push(Token::EntityRef(name.to_string()));
                    rest = &rest[len..];
                }
                None => {
                    self.push_text("&");
                    rest = &rest[1..];
                }
            }
        }
        self.push_text(rest);
    }

    fn lex_markup(&mut self) -> ConversionResult<()> {
        let next = self.bytes.get(self.pos + 1).copied();
        if self.starts_with("<!--") {
            self.skip_past(self.pos + 4, "-->");
        } else if self.starts_with("<![CDATA[") {
            self.skip_past(self.pos + 9, "]]>");
        } else if matches!(next, Some(b'!') | Some(b'?')) {
            self.skip_past(self.pos + 2, ">");
        } else if next == Some(b'/')
            && self
                .bytes
                .get(self.pos + 2)
                .is_some_and(|b| b.is_ascii_alphabetic())
        {
            self.lex_end_tag()?;
        } else if next.is_some_and(|b| b.is_ascii_alphabetic()) {
            self.lex_start_tag()?;
        } else {
            self.push_text("<");
            self.pos += 1;
        }
        Ok(())
    }

    fn read_tag_name(&mut self) -> String {
        let start = self.pos;
        while self.pos < self.bytes.len() && is_tag_name_byte(self.bytes[self.pos]) {
            self.pos += 1;
        }
        self.src[start..self.pos].to_ascii_lowercase()
    }

    fn skip_whitespace(&mut self) {
        while self.pos < self.bytes.len() && self.bytes[self.pos].is_ascii_whitespace() {
            self.pos += 1;
        }
    }

    fn lex_end_tag(&mut self) -> ConversionResult<()> {
        let tag_start = self.pos;
        self.pos += 2;
        let name = self.read_tag_name();
        match self.src[self.pos..].find('>') {
            Some(rel) => self.pos += rel + 1,
            None => {
                return Err(ConversionError::structural(format!(
                    "Unterminated end tag </{}> at byte {}",
                    name, tag_start
                )))
            }
        }
        self.tokens.push(Token::EndTag { name });
        Ok(())
    }

    fn lex_start_tag(&mut self) -> ConversionResult<()> {
        let tag_start = self.pos;
        self.pos += 1;
        let name = self.read_tag_name();
        let mut attributes: Vec<(String, String)> = Vec::new();
        let mut self_closing = false;

        loop {
            self.skip_whitespace();
            match self.bytes.get(self.pos).copied() {
                None => {
                    return Err(ConversionError::structural(format!(
                        "Unterminated start tag <{}> at byte {}",
                        name, tag_start
                    )))
                }
                Some(b'>') => {
                    self.pos += 1;
                    break;
                }
                Some(b'/') => {
                    if self.bytes.get(self.pos + 1) == Some(&b'>') {
                        self_closing = true;
                        self.pos += 2;
                        break;
                    }
                    self.pos += 1;
                }
                Some(_) => {
                    if let Some((key, value)) = self.lex_attribute()? {
                        if !attributes.iter().any(|(k, _)| *k == key) {
                            attributes.push((key, value));
                        }
                    }
                }
            }
        }

        let is_rawtext = RAWTEXT_ELEMENTS.contains(&name.as_str());
        self.tokens.push(Token::StartTag {
            name: name.clone(),
            attributes,
            self_closing,
        });
        if is_rawtext && !self_closing {
            self.lex_rawtext(&name);
        }
        Ok(())
    }

    fn lex_attribute(&mut self) -> ConversionResult<Option<(String, String)>> {
        let start = self.pos;
        while self.pos < self.bytes.len() && !is_attr_name_end(self.bytes[self.pos]) {
            self.pos += 1;
        }
        if self.pos == start {
            // A lone `=`; skip it
            self.pos += 1;
            return Ok(None);
        }
        let key = self.src[start..self.pos].to_ascii_lowercase();

        self.skip_whitespace();
        if self.bytes.get(self.pos) != Some(&b'=') {
            return Ok(Some((key, String::new())));
        }
        self.pos += 1;
        self.skip_whitespace();

        let raw = match self.bytes.get(self.pos).copied() {
            Some(quote @ (b'"' | b'\'')) => {
                let value_start = self.pos + 1;
                let rel = self.bytes[value_start..]
                    .iter()
                    .position(|&b| b == quote)
                    .ok_or_else(|| {
                        ConversionError::structural(format!(
                            "Unterminated value of attribute '{}' at byte {}",
                            key, start
                        ))
                    })?;
                self.pos = value_start + rel + 1;
                &self.src[value_start..value_start + rel]
            }
            _ => {
                let value_start = self.pos;
                while self.pos < self.bytes.len()
                    && !self.bytes[self.pos].is_ascii_whitespace()
                    && self.bytes[self.pos] != b'>'
                {
                    self.pos += 1;
                }
                &self.src[value_start..self.pos]
            }
        };
        Ok(Some((key, decode_attribute_value(raw))))
    }

    /// Emit everything up to `</name` as one text token
    fn lex_rawtext(&mut self, name: &str) {
        let close = format!("</{}", name);
        let end = self.src[self.pos..]
            .to_ascii_lowercase()
            .find(&close)
            .map_or(self.bytes.len(), |rel| self.pos + rel);
        if end > self.pos {
            self.tokens
                .push(Token::Text(self.src[self.pos..end].to_string()));
        }
        self.pos = end;
    }
}
