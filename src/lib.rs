//! # wikitex
//!
//! Converter from rendered wiki articles (HTML) to LaTeX report sources.
//!
//! ## Features
//!
//! - **Strict structure**: explicit open-element stack, unbalanced markup is an error
//! - **Table layout**: `colspan`/`rowspan`, inline style hints and percentage column widths
//! - **Citations**: `<sup class="reference">` markers become `\footnote`s, even
//!   when the reference list comes later in the document
//! - **Escaping**: single-pass LaTeX escaping of text and link targets
//!
//! ## Usage Examples
//!
//! ### Converting a Fragment
//!
//! ```rust
//! use wikitex::{html_to_latex, ConvertOptions};
//!
//! let latex = html_to_latex("<h2>Intro</h2><p>Hello <b>world</b></p>", &ConvertOptions::default())?;
//! assert_eq!(latex, "\\section{Intro}\n\nHello \\textbf{world}\n\n");
//! # Ok::<(), wikitex::ConversionError>(())
//! ```
//!
//! ### Resolving Links
//!
//! ```rust
//! use wikitex::{html_to_latex, ConvertOptions};
//!
//! let options = ConvertOptions::with_base_url("https://wiki.example.org/wiki/Report");
//! let latex = html_to_latex(r#"<a href="/wiki/Data">data</a>"#, &options)?;
//! assert_eq!(latex, "\\href{https://wiki.example.org/wiki/Data}{data}");
//! # Ok::<(), wikitex::ConversionError>(())
//! ```
//!
//! The output is meant to be embedded in a document body; the preamble
//! (`multirow`, `colortbl`, `hyperref`, `url` and a `\hrulesep` macro) is
//! the caller's job.

/// Core conversion modules
pub mod core;

/// Data layer - static mappings and constants
pub mod data;

/// Utility modules
pub mod utils;

// Re-export core conversion functions
pub use core::html::{normalize, parse_html, Node, StructuralParser};
pub use core::html2latex;
pub use core::html2latex::table;
pub use core::html2latex::{
    escape_latex_text, escape_latex_url, html_to_latex, CitationStore, ConvertOptions,
    HtmlToLatex,
};

// Re-export utilities
pub use utils::error::{ConversionError, ConversionResult};
