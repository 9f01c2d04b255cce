//! Utility functions for HTML to LaTeX conversion
//!
//! Helper functions for text escaping, link resolution and output padding.

use regex::Captures;
use url::Url;

use crate::data::escapes::{LATEX_ESCAPES, LATEX_ESCAPE_PATTERN, URL_ESCAPE_PATTERN};

/// Escape a text run for LaTeX
///
/// Single pass over the escape table, longest match first. Characters
/// without an entry pass through unchanged.
pub fn escape_latex_text(text: &str) -> String {
    LATEX_ESCAPE_PATTERN
        .replace_all(text, |caps: &Captures| {
            LATEX_ESCAPES
                .get(&caps[0])
                .copied()
                .unwrap_or_default()
                .to_string()
        })
        .into_owned()
}

/// Escape a URL for `\url{}` and `\href{}`
pub fn escape_latex_url(url: &str) -> String {
    URL_ESCAPE_PATTERN.replace_all(url, r"\${1}").into_owned()
}

/// Resolve `href` against the page URL
///
/// Without a usable base the href is returned unchanged.
pub fn resolve_url(base: Option<&Url>, href: &str) -> String {
    match base {
        Some(base) => base
            .join(href)
            .map(String::from)
            .unwrap_or_else(|_| href.to_string()),
        None => href.to_string(),
    }
}

/// Append newlines until the output ends in a blank line
pub fn pad_paragraph(out: &mut String) {
    while !out.ends_with("\n\n") {
        out.push('\n');
    }
}
