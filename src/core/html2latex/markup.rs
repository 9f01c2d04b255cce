//! Tag rendering for HTML to LaTeX
//!
//! Walks the normalized tree and dispatches every element through
//! [`HTML_TAG_HANDLERS`]. A tag without a handler aborts the conversion.

use std::cell::RefCell;

use fxhash::FxHashMap;
use lazy_static::lazy_static;
use regex::Regex;
use url::Url;

use super::context::{ConvertOptions, RenderContext};
use super::table::{CellKind, RowKind, TableLayout};
use super::utils::{escape_latex_text, escape_latex_url, pad_paragraph, resolve_url};
use crate::core::html::normalize::is_row_group;
use crate::core::html::{Attributes, Child, Node};
use crate::data::html_tags::{get_tag_handler, SpecialTag, TagHandler};
use crate::utils::error::{ConversionError, ConversionResult};

lazy_static! {
    static ref DISPLAY_NONE: Regex = Regex::new(r"(?i)display\s*:\s*none\b").unwrap();
}

/// Reference id → rendered footnote body
pub type CitationStore = FxHashMap<String, String>;

/// Why an element is skipped together with its children, if it is
fn suppression(node: &Node) -> Option<String> {
    let tag = node.tag.as_str();
    let reason = match tag {
        "span" if node.has_class("editsection") => Some("editsection span".to_string()),
        "table" if node.has_class("infobox") => Some("infobox table".to_string()),
        "table" if node.has_class("toc") => Some("toc table".to_string()),
        "img" => Some("image".to_string()),
        "a" if node.has_class("image") => Some("image".to_string()),
        _ if get_tag_handler(tag) == Some(TagHandler::Special(SpecialTag::Suppress)) => {
            Some(tag.to_string())
        }
        _ => None,
    };
    reason.or_else(|| {
        node.attr("style")
            .filter(|style| DISPLAY_NONE.is_match(style))
            .map(|_| format!("{} because of display: none", tag))
    })
}

/// `{name: "value", ...}` for debug comments and error messages
fn format_attributes(attributes: &Attributes) -> String {
    let pairs: Vec<String> = attributes
        .iter()
        .map(|(name, value)| format!("{}: {:?}", name, value))
        .collect();
    format!("{{{}}}", pairs.join(", "))
}

/// One render pass over a document tree
pub struct Renderer<'a> {
    options: &'a ConvertOptions,
    base_url: Option<&'a Url>,
    citations: &'a mut CitationStore,
}

impl<'a> Renderer<'a> {
    pub fn new(
        options: &'a ConvertOptions,
        base_url: Option<&'a Url>,
        citations: &'a mut CitationStore,
    ) -> Self {
        Renderer {
            options,
            base_url,
            citations,
        }
    }

    /// Render the children of `node` in order
    pub fn render_children(
        &mut self,
        node: &Node,
        ctx: &mut RenderContext<'_>,
        out: &mut String,
    ) -> ConversionResult<()> {
        for child in &node.children {
            match child {
                Child::Element(element) => self.render_node(element, ctx, out)?,
                Child::Text(text) => render_text(text, ctx, out),
            }
        }
        Ok(())
    }

    fn debug(&self, ctx: &RenderContext<'_>, out: &mut String, message: &str) {
        if self.options.verbose && ctx.writes_document() {
            out.push_str("% ");
            out.push_str(message);
            out.push('\n');
        }
    }

    fn unsupported(&self, node: &Node) -> ConversionError {
        if self.options.verbose && !node.attributes.is_empty() {
            ConversionError::unsupported_tag_with_attributes(
                &node.tag,
                format_attributes(&node.attributes),
            )
        } else {
            ConversionError::unsupported_tag(&node.tag)
        }
    }

    fn render_node(
        &mut self,
        node: &Node,
        ctx: &mut RenderContext<'_>,
        out: &mut String,
    ) -> ConversionResult<()> {
        if let Some(reason) = suppression(node) {
            self.debug(ctx, out, &format!("Ignoring {}", reason));
            return Ok(());
        }

        self.debug(ctx, out, &format!("Encountered a {} tag", node.tag));
        if !node.attributes.is_empty() {
            let attributes = format_attributes(&node.attributes);
            self.debug(ctx, out, &format!("  Attributes: {}", attributes));
        }

        let Some(handler) = get_tag_handler(&node.tag) else {
            return Err(self.unsupported(node));
        };

        match handler {
            TagHandler::Wrap { prefix, suffix } => {
                out.push_str(prefix);
                self.render_children(node, ctx, out)?;
                out.push_str(suffix);
                Ok(())
            }
            TagHandler::Environment { name } => {
                out.push_str(&format!("\\begin{{{}}}\n", name));
                self.render_children(node, ctx, out)?;
                out.push_str(&format!("\\end{{{}}}\n", name));
                Ok(())
            }
            TagHandler::PassThrough => self.render_children(node, ctx, out),
            TagHandler::Special(special) => self.render_special(special, node, ctx, out),
        }
    }

    fn render_special(
        &mut self,
        special: SpecialTag,
        node: &Node,
        ctx: &mut RenderContext<'_>,
        out: &mut String,
    ) -> ConversionResult<()> {
        match special {
            SpecialTag::Suppress => Ok(()),
            SpecialTag::Paragraph => {
                if !ctx.in_table() {
                    pad_paragraph(out);
                }
                self.render_children(node, ctx, out)?;
                if !ctx.in_table() {
                    pad_paragraph(out);
                }
                Ok(())
            }
            SpecialTag::LineBreak => {
                if ctx.in_table() {
                    out.push_str("\\newline\n");
                } else {
                    out.push_str("\\ifhmode\\\\\\fi\n");
                }
                Ok(())
            }
            SpecialTag::Preformatted => {
                out.push_str("\\begin{verbatim}\n");
                self.render_children(node, &mut ctx.verbatim(), out)?;
                out.push_str("\\end{verbatim}\n");
                Ok(())
            }
            SpecialTag::Anchor => self.render_anchor(node, ctx, out),
            SpecialTag::Superscript => {
                if node.has_class("reference") {
                    self.render_citation(node, ctx, out)
                } else {
                    out.push_str("\\textsuperscript{");
                    self.render_children(node, ctx, out)?;
                    out.push('}');
                    Ok(())
                }
            }
            SpecialTag::OrderedList => {
                if node.has_class("references") {
                    // Only fills the citation store; the list itself is not printed
                    let mut discarded = String::new();
                    self.render_children(node, &mut ctx.references(), &mut discarded)
                } else {
                    out.push_str("\\begin{enumerate}\n");
                    self.render_children(node, ctx, out)?;
                    out.push_str("\\end{enumerate}\n");
                    Ok(())
                }
            }
            SpecialTag::ListItem => match node.attr("id").filter(|_| ctx.in_references) {
                Some(id) => {
                    let mut body = String::new();
                    self.render_children(node, &mut ctx.clone(), &mut body)?;
                    self.citations.insert(id.to_string(), body.trim().to_string());
                    Ok(())
                }
                None => {
                    out.push_str("\\item ");
                    self.render_children(node, ctx, out)?;
                    out.push('\n');
                    Ok(())
                }
            },
            SpecialTag::DefinitionList => {
                let mut inner = ctx.clone();
                inner.definition_list_started = false;
                out.push_str("\\begin{description}\n");
                self.render_children(node, &mut inner, out)?;
                out.push_str("\\end{description}\n");
                Ok(())
            }
            SpecialTag::DefinitionTerm => {
                ctx.definition_list_started = true;
                out.push_str("\\item[");
                self.render_children(node, ctx, out)?;
                out.push(']');
                Ok(())
            }
            SpecialTag::DefinitionDescription => {
                if !ctx.definition_list_started {
                    out.push_str("\\item ");
                    ctx.definition_list_started = true;
                }
                self.render_children(node, ctx, out)
            }
            SpecialTag::HorizontalRule => {
                out.push_str("\\hrulesep{}");
                Ok(())
            }
            SpecialTag::Table => self.render_table(node, ctx, out),
            SpecialTag::TableBody => {
                if !ctx.in_table() {
                    return Err(outside_table(&node.tag));
                }
                self.render_children(node, ctx, out)
            }
            SpecialTag::Caption => {
                let Some(table) = ctx.table else {
                    return Err(outside_table(&node.tag));
                };
                let mut caption = String::new();
                self.render_children(node, ctx, &mut caption)?;
                table.borrow_mut().add_caption(&caption);
                Ok(())
            }
            SpecialTag::Row => self.render_row(node, ctx, out),
            SpecialTag::Cell => self.render_cell(node, ctx),
        }
    }

    fn render_anchor(
        &mut self,
        node: &Node,
        ctx: &mut RenderContext<'_>,
        out: &mut String,
    ) -> ConversionResult<()> {
        let Some(href) = node.attr("href") else {
            return Ok(());
        };
        let href = href.replace("&amp;", "&");

        if ctx.in_cite_ref {
            let id = href.strip_prefix('#').unwrap_or(&href);
            ctx.name_cite_ref = Some(id.to_string());
            return Ok(());
        }
        if ctx.in_references && href.starts_with('#') && node.sole_text() == Some("\u{2191}") {
            // Back link from a reference to its citation
            return Ok(());
        }

        let url = escape_latex_url(&resolve_url(self.base_url, &href));
        if node.sole_text() == Some(href.as_str()) {
            out.push_str(&format!("\\url{{{}}}", url));
        } else {
            out.push_str(&format!("\\href{{{}}}{{", url));
            self.render_children(node, ctx, out)?;
            out.push('}');
        }
        Ok(())
    }

    /// `sup.reference`: find the target id, then emit the stored footnote if
    /// the reference is already known
    fn render_citation(
        &mut self,
        node: &Node,
        ctx: &RenderContext<'_>,
        out: &mut String,
    ) -> ConversionResult<()> {
        let mut probe = ctx.citation_probe();
        let mut discarded = String::new();
        self.render_children(node, &mut probe, &mut discarded)?;

        let body = probe
            .name_cite_ref
            .as_ref()
            .and_then(|id| self.citations.get(id));
        if let Some(body) = body {
            out.push_str("\\footnote{");
            out.push_str(body);
            out.push('}');
        }
        Ok(())
    }

    fn render_table(
        &mut self,
        node: &Node,
        ctx: &RenderContext<'_>,
        out: &mut String,
    ) -> ConversionResult<()> {
        if ctx.in_table() {
            return Err(ConversionError::structural(
                "nested table: table encountered inside another table",
            ));
        }

        let layout = RefCell::new(TableLayout::new(self.options.min_column_width));
        let mut inner = ctx.with_table(&layout);
        // Text between rows and cells ends up here and is dropped
        let mut discarded = String::new();
        self.render_children(node, &mut inner, &mut discarded)?;
        drop(inner);

        out.push_str(&layout.into_inner().serialize(self.options.table_width));
        Ok(())
    }

    fn render_row(
        &mut self,
        node: &Node,
        ctx: &mut RenderContext<'_>,
        out: &mut String,
    ) -> ConversionResult<()> {
        let Some(table) = ctx.table else {
            return Err(outside_table(&node.tag));
        };
        let kind = RowKind::from_tag(&node.tag).unwrap_or(RowKind::Body);

        if kind != RowKind::Body && is_row_group(node) {
            return self.render_children(node, &mut ctx.in_row_group(kind), out);
        }

        let kind = match kind {
            RowKind::Body => ctx.row_group.unwrap_or(RowKind::Body),
            header => header,
        };
        table.borrow_mut().start_row(kind, &node.attributes);
        self.render_children(node, ctx, out)?;
        table.borrow_mut().end_row();
        Ok(())
    }

    fn render_cell(&mut self, node: &Node, ctx: &mut RenderContext<'_>) -> ConversionResult<()> {
        let Some(table) = ctx.table else {
            return Err(outside_table(&node.tag));
        };
        if !table.borrow().is_row_started() {
            return Err(ConversionError::structural(format!(
                "{} encountered outside table row",
                node.tag
            )));
        }

        let mut text = String::new();
        self.render_children(node, ctx, &mut text)?;
        let kind = CellKind::from_tag(&node.tag).unwrap_or(CellKind::Data);
        table.borrow_mut().add_cell(kind, &node.attributes, &text)
    }
}

fn render_text(text: &str, ctx: &RenderContext<'_>, out: &mut String) {
    if ctx.in_verbatim {
        out.push_str(text);
    } else {
        out.push_str(&escape_latex_text(text));
    }
}

fn outside_table(tag: &str) -> ConversionError {
    ConversionError::structural(format!("{} encountered outside table", tag))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::html::{normalize, parse_html};
    use pretty_assertions::assert_eq;

    /// One render pass with a fresh citation store
    fn render_once(html: &str, options: &ConvertOptions) -> ConversionResult<String> {
        let mut tree = parse_html(html)?;
        normalize(&mut tree);
        let mut citations = CitationStore::default();
        let mut renderer = Renderer::new(options, None, &mut citations);
        let mut out = String::new();
        renderer.render_children(&tree, &mut RenderContext::new(), &mut out)?;
        Ok(out)
    }

    fn render(html: &str) -> String {
        render_once(html, &ConvertOptions::default()).unwrap()
    }

    #[test]
    fn test_headings() {
        assert_eq!(render("<h1>A</h1>"), "\\part{A}\n");
        assert_eq!(render("<h3>A</h3>"), "\\subsection{A}\n");
        assert_eq!(render("<h6>A</h6>"), "\\subparagraph{A}\n");
    }

    #[test]
    fn test_paragraph_padding() {
        assert_eq!(render("<p>a</p><p>b</p>"), "\n\na\n\nb\n\n");
        assert_eq!(render("x<p>y</p>"), "x\n\ny\n\n");
    }

    #[test]
    fn test_inline_formatting() {
        assert_eq!(
            render("<i>i</i><em>e</em><u>u</u><strong>s</strong><sub>2</sub><sup>3</sup>"),
            "\\textit{i}\\emph{e}\\underline{u}\\textbf{s}\\textsubscript{2}\\textsuperscript{3}"
        );
    }

    #[test]
    fn test_line_break() {
        assert_eq!(render("a<br/>b"), "a\\ifhmode\\\\\\fi\nb");
    }

    #[test]
    fn test_preformatted_text_is_not_escaped() {
        assert_eq!(
            render("<pre>a_b  {c}</pre>"),
            "\\begin{verbatim}\na_b  {c}\\end{verbatim}\n"
        );
    }

    #[test]
    fn test_lists() {
        assert_eq!(
            render("<ul><li>a</li><li>b</li></ul>"),
            "\\begin{itemize}\n\\item a\n\\item b\n\\end{itemize}\n"
        );
        assert_eq!(
            render("<ol><li>a</li></ol>"),
            "\\begin{enumerate}\n\\item a\n\\end{enumerate}\n"
        );
    }

    #[test]
    fn test_description_lists() {
        assert_eq!(
            render("<dl><dt>T</dt><dd>D</dd></dl>"),
            "\\begin{description}\n\\item[T]D\\end{description}\n"
        );
        // A description without a term opens its own item
        assert_eq!(
            render("<dl><dd>D</dd><dd>E</dd></dl>"),
            "\\begin{description}\n\\item DE\\end{description}\n"
        );
    }

    #[test]
    fn test_description_list_state_stays_inside_list() {
        let options = ConvertOptions::default();
        let mut citations = CitationStore::default();
        let mut renderer = Renderer::new(&options, None, &mut citations);
        let tree = parse_html("<dl><dt>T</dt></dl>").unwrap();
        let mut ctx = RenderContext::new();
        let mut out = String::new();
        renderer.render_children(&tree, &mut ctx, &mut out).unwrap();
        assert!(!ctx.definition_list_started);

        // A description after the list opens a fresh item
        assert_eq!(
            render("<dl><dt>T</dt></dl><dd>X</dd>"),
            "\\begin{description}\n\\item[T]\\end{description}\n\\item X"
        );
    }

    #[test]
    fn test_blockquote_and_rule() {
        assert_eq!(
            render("<blockquote>q</blockquote><hr/>"),
            "\\begin{quote}\nq\\end{quote}\n\\hrulesep{}"
        );
    }

    #[test]
    fn test_links() {
        assert_eq!(
            render(r#"<a href="http://x.org/a_b">http://x.org/a_b</a>"#),
            "\\url{http://x.org/a_b}"
        );
        assert_eq!(
            render(r#"<a href="http://x.org/?a=1&amp;b=2">the <b>site</b></a>"#),
            "\\href{http://x.org/?a=1\\&b=2}{the \\textbf{site}}"
        );
        assert_eq!(render(r#"<a name="top">anchor</a>"#), "");
    }

    #[test]
    fn test_suppressed_elements() {
        let html = concat!(
            "<script>var x = 1;</script>",
            "<style>p { color: red }</style>",
            r#"<span class="editsection">[edit]</span>"#,
            r#"<table class="infobox"><tr><td>x</td></tr></table>"#,
            r#"<table class="wikitable toc"><tr><td>x</td></tr></table>"#,
            r#"<img src="a.png"/>"#,
            r#"<a class="image" href="/File:a.png">img</a>"#,
            r#"<div style="DISPLAY: none">hidden</div>"#,
            "kept",
        );
        assert_eq!(render(html), "kept");
    }

    #[test]
    fn test_verbose_comments() {
        let out = render_once(
            r#"<div class="x"><script>s</script>t</div>"#,
            &ConvertOptions::verbose(),
        )
        .unwrap();
        assert_eq!(
            out,
            "% Encountered a div tag\n%   Attributes: {class: \"x\"}\n% Ignoring script\nt"
        );
    }

    #[test]
    fn test_no_verbose_comments_in_verbatim_or_tables() {
        let out = render_once(
            "<pre><b>x</b></pre><table><tr><td><b>y</b></td></tr></table>",
            &ConvertOptions::verbose(),
        )
        .unwrap();
        assert!(out.starts_with("% Encountered a pre tag\n\\begin{verbatim}\n\\textbf{x}"));
        assert_eq!(out.matches("% Encountered").count(), 2);
        assert!(out.contains("% Encountered a table tag\n\\begin{table}"));
    }

    #[test]
    fn test_unsupported_tag() {
        let err = render_once("<marquee>x</marquee>", &ConvertOptions::default()).unwrap_err();
        assert_eq!(
            err,
            ConversionError::UnsupportedTag {
                tag: "marquee".to_string(),
                attributes: None
            }
        );

        let err = render_once(r#"<font color="red">x</font>"#, &ConvertOptions::verbose())
            .unwrap_err();
        assert!(err.to_string().contains("color: \"red\""));
    }

    #[test]
    fn test_table_markup_outside_table() {
        for (html, message) in [
            ("<tr><td>x</td></tr>", "tr encountered outside table"),
            ("<td>x</td>", "td encountered outside table"),
            ("<caption>x</caption>", "caption encountered outside table"),
            ("<thead>x</thead>", "thead encountered outside table"),
            ("<tbody>x</tbody>", "tbody encountered outside table"),
        ] {
            let err = render_once(html, &ConvertOptions::default()).unwrap_err();
            assert!(err.to_string().contains(message), "{}: {}", html, err);
        }
    }

    #[test]
    fn test_nested_table_is_an_error() {
        let err = render_once(
            "<table><tr><td><table><tr><td>x</td></tr></table></td></tr></table>",
            &ConvertOptions::default(),
        )
        .unwrap_err();
        assert!(matches!(err, ConversionError::Structural { .. }));
        assert!(err.to_string().contains("nested table"));
    }

    #[test]
    fn test_table_cell_content() {
        let out = render(
            "<table><tr><td><p>a</p><br/>b <i>c</i></td></tr> stray </table>",
        );
        assert!(out.contains("{\\raggedright a\\newline\nb \\textit{c}}"));
        assert!(!out.contains("stray"));
    }

    #[test]
    fn test_row_groups() {
        let out = render(concat!(
            "<table>",
            "<thead><tr><td>h</td></tr></thead>",
            "<tbody><tr><td>b</td></tr></tbody>",
            "<tfoot><td>f</td></tfoot>",
            "</table>",
        ));
        assert!(out.contains("\\textbf{h}"));
        assert!(out.contains("{\\raggedright b}"));
        assert!(out.contains("\\textbf{f}"));
    }

    #[test]
    fn test_citation_needs_known_reference() {
        // A single pass cannot see a reference defined later
        let out = render(concat!(
            r##"a<sup class="reference"><a href="#r1">[1]</a></sup>"##,
            r#"<ol class="references"><li id="r1">Note</li></ol>"#,
        ));
        assert_eq!(out, "a");
    }
}
