//! HTML tag → LaTeX handler table
//!
//! Every tag the renderer understands is listed here. A tag missing from
//! [`HTML_TAG_HANDLERS`] is unsupported and aborts the conversion.

use lazy_static::lazy_static;
use std::collections::{HashMap, HashSet};

/// Handler type for HTML elements
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TagHandler {
    /// Simple wrapper: prefix + content + suffix
    Wrap {
        prefix: &'static str,
        suffix: &'static str,
    },
    /// Environment: \begin{env} + content + \end{env}
    Environment { name: &'static str },
    /// Just output the content (pass-through)
    PassThrough,
    /// Special handling required
    Special(SpecialTag),
}

/// Elements whose rendering depends on attributes or context
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SpecialTag {
    /// Rendered as nothing, children skipped
    Suppress,
    Paragraph,
    LineBreak,
    Preformatted,
    Anchor,
    Superscript,
    OrderedList,
    ListItem,
    DefinitionList,
    DefinitionTerm,
    DefinitionDescription,
    HorizontalRule,
    Table,
    /// `tbody`, transparent inside a table
    TableBody,
    Caption,
    /// `tr`, `thead`, `tfoot`
    Row,
    /// `td`, `th`
    Cell,
}

lazy_static! {
    /// Mapping from HTML tag names to LaTeX handlers
    pub static ref HTML_TAG_HANDLERS: HashMap<&'static str, TagHandler> = {
        let mut m = HashMap::new();

        // Headings
        m.insert("h1", TagHandler::Wrap { prefix: "\\part{", suffix: "}\n" });
        m.insert("h2", TagHandler::Wrap { prefix: "\\section{", suffix: "}\n" });
        m.insert("h3", TagHandler::Wrap { prefix: "\\subsection{", suffix: "}\n" });
        m.insert("h4", TagHandler::Wrap { prefix: "\\subsubsection{", suffix: "}\n" });
        m.insert("h5", TagHandler::Wrap { prefix: "\\paragraph{", suffix: "}\n" });
        m.insert("h6", TagHandler::Wrap { prefix: "\\subparagraph{", suffix: "}\n" });

        // Text formatting
        m.insert("b", TagHandler::Wrap { prefix: "\\textbf{", suffix: "}" });
        m.insert("strong", TagHandler::Wrap { prefix: "\\textbf{", suffix: "}" });
        m.insert("i", TagHandler::Wrap { prefix: "\\textit{", suffix: "}" });
        m.insert("em", TagHandler::Wrap { prefix: "\\emph{", suffix: "}" });
        m.insert("u", TagHandler::Wrap { prefix: "\\underline{", suffix: "}" });
        // \textsubscript needs fixltx2e on old kernels
        m.insert("sub", TagHandler::Wrap { prefix: "\\textsubscript{", suffix: "}" });
        m.insert("sup", TagHandler::Special(SpecialTag::Superscript));

        // Block structure
        m.insert("p", TagHandler::Special(SpecialTag::Paragraph));
        m.insert("br", TagHandler::Special(SpecialTag::LineBreak));
        m.insert("pre", TagHandler::Special(SpecialTag::Preformatted));
        m.insert("hr", TagHandler::Special(SpecialTag::HorizontalRule));
        m.insert("blockquote", TagHandler::Environment { name: "quote" });

        // Pass-through
        m.insert("div", TagHandler::PassThrough);
        m.insert("span", TagHandler::PassThrough);

        // Links and citations
        m.insert("a", TagHandler::Special(SpecialTag::Anchor));

        // Lists
        m.insert("ul", TagHandler::Environment { name: "itemize" });
        m.insert("ol", TagHandler::Special(SpecialTag::OrderedList));
        m.insert("li", TagHandler::Special(SpecialTag::ListItem));
        m.insert("dl", TagHandler::Special(SpecialTag::DefinitionList));
        m.insert("dt", TagHandler::Special(SpecialTag::DefinitionTerm));
        m.insert("dd", TagHandler::Special(SpecialTag::DefinitionDescription));

        // Tables
        m.insert("table", TagHandler::Special(SpecialTag::Table));
        m.insert("tbody", TagHandler::Special(SpecialTag::TableBody));
        m.insert("caption", TagHandler::Special(SpecialTag::Caption));
        m.insert("tr", TagHandler::Special(SpecialTag::Row));
        m.insert("thead", TagHandler::Special(SpecialTag::Row));
        m.insert("tfoot", TagHandler::Special(SpecialTag::Row));
        m.insert("td", TagHandler::Special(SpecialTag::Cell));
        m.insert("th", TagHandler::Special(SpecialTag::Cell));

        // Never rendered
        m.insert("script", TagHandler::Special(SpecialTag::Suppress));
        m.insert("style", TagHandler::Special(SpecialTag::Suppress));
        m.insert("img", TagHandler::Special(SpecialTag::Suppress));

        m
    };

    /// Elements that never have children or a closing tag
    pub static ref VOID_TAGS: HashSet<&'static str> = [
        "area", "base", "basefont", "br", "col", "frame", "hr", "img", "input",
        "isindex", "link", "meta", "param",
    ]
    .into_iter()
    .collect();
}

/// Look up the handler for a tag
pub fn get_tag_handler(tag: &str) -> Option<TagHandler> {
    HTML_TAG_HANDLERS.get(tag).copied()
}

/// Check whether a tag is a void element
pub fn is_void_tag(tag: &str) -> bool {
    VOID_TAGS.contains(tag)
}
