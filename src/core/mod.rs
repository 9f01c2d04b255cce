//! Core conversion modules
//!
//! This module contains the conversion pipeline:
//! - `html`: HTML lexer, structural parser and tree normalizer
//! - `html2latex`: two-pass LaTeX renderer and table layout engine

pub mod html;
pub mod html2latex;

// Re-export main types and functions from html
pub use html::{normalize, parse_html, Attributes, Child, Node, StructuralParser, Token};

// Re-export main types and functions from html2latex
pub use html2latex::{
    escape_latex_text, escape_latex_url, html_to_latex, CitationStore, ConvertOptions,
    HtmlToLatex, RenderContext,
};
