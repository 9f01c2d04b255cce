//! HTML to LaTeX converter
//!
//! Parses an HTML fragment (a rendered wiki article), repairs its table
//! structure and renders it to LaTeX in two passes. The first pass only
//! collects citation texts from reference lists; the second emits the
//! document with every citation marker resolved to a `\footnote`, including
//! markers that come before their reference.

pub mod context;
mod markup;
pub mod table;
pub mod utils;

pub use context::{ConvertOptions, RenderContext};
pub use markup::{CitationStore, Renderer};
pub use utils::{escape_latex_text, escape_latex_url};

use tracing::{debug, warn};
use url::Url;

use crate::core::html::{normalize, parse_html, Node};
use crate::utils::error::ConversionResult;

/// Initial capacity for the output buffer
const INITIAL_BUFFER_CAPACITY: usize = 4096;

/// Converter state for one document
///
/// ```
/// use wikitex::{ConvertOptions, HtmlToLatex};
///
/// let mut converter = HtmlToLatex::new("<p>Hi</p>", ConvertOptions::default()).unwrap();
/// converter.process().unwrap();
/// converter.process().unwrap();
/// assert_eq!(converter.output(), "\n\nHi\n\n");
/// ```
#[derive(Debug)]
pub struct HtmlToLatex {
    tree: Node,
    options: ConvertOptions,
    base_url: Option<Url>,
    citations: CitationStore,
    output: String,
    passes: usize,
}

impl HtmlToLatex {
    /// Parse and normalize `html`. Fails on malformed markup or invalid
    /// options.
    pub fn new(html: &str, options: ConvertOptions) -> ConversionResult<Self> {
        options.validate()?;

        let mut tree = parse_html(html)?;
        normalize(&mut tree);
        if options.verbose {
            debug!(tree = ?tree, "parsed document tree");
        }

        let base_url = options
            .base_url
            .as_deref()
            .and_then(|base| match Url::parse(base) {
                Ok(url) => Some(url),
                Err(err) => {
                    warn!(base, %err, "unusable base URL, links are kept as written");
                    None
                }
            });

        Ok(HtmlToLatex {
            tree,
            options,
            base_url,
            citations: CitationStore::default(),
            output: String::new(),
            passes: 0,
        })
    }

    /// Run one render pass, replacing the output of the previous one.
    /// Citations found in earlier passes stay available.
    pub fn process(&mut self) -> ConversionResult<()> {
        let mut out = String::with_capacity(INITIAL_BUFFER_CAPACITY);
        let mut renderer = Renderer::new(&self.options, self.base_url.as_ref(), &mut self.citations);
        renderer.render_children(&self.tree, &mut RenderContext::new(), &mut out)?;

        self.output = out;
        self.passes += 1;
        debug!(
            pass = self.passes,
            citations = self.citations.len(),
            bytes = self.output.len(),
            "render pass finished"
        );
        Ok(())
    }

    /// Run both passes and return the document
    pub fn convert(mut self) -> ConversionResult<String> {
        self.process()?;
        self.process()?;
        Ok(self.output)
    }

    /// Output of the last pass
    pub fn output(&self) -> &str {
        &self.output
    }

    pub fn citations(&self) -> &CitationStore {
        &self.citations
    }

    /// The normalized document tree
    pub fn tree(&self) -> &Node {
        &self.tree
    }
}

/// Convert an HTML fragment to LaTeX
pub fn html_to_latex(html: &str, options: &ConvertOptions) -> ConversionResult<String> {
    HtmlToLatex::new(html, options.clone())?.convert()
}
