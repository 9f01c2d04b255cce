//! Conversion options and render context for HTML to LaTeX conversion
//!
//! [`ConvertOptions`] holds the caller's settings for one conversion.
//! [`RenderContext`] holds the rendering modes threaded through the tree
//! walk; rules that open a scope clone it, so a mode never leaks to
//! siblings.

use std::cell::RefCell;

#[cfg(feature = "config")]
use serde::Deserialize;

use super::table::{RowKind, TableLayout};
use crate::utils::error::{ConversionError, ConversionResult};

/// Options for HTML to LaTeX conversion
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "config", derive(Deserialize))]
#[cfg_attr(feature = "config", serde(default, deny_unknown_fields))]
pub struct ConvertOptions {
    /// URL of the page, used to resolve relative links
    pub base_url: Option<String>,
    /// Interleave `%` debug comments into the output
    pub verbose: bool,
    /// Width of tables as a fraction of `\linewidth`
    pub table_width: f64,
    /// Smallest share of the table width any column gets
    pub min_column_width: f64,
}

impl Default for ConvertOptions {
    fn default() -> Self {
        Self {
            base_url: None,
            verbose: false,
            table_width: 1.0,
            min_column_width: 0.02,
        }
    }
}

impl ConvertOptions {
    pub fn new() -> Self {
        Self::default()
    }

    /// Options resolving links against `base_url`
    pub fn with_base_url(base_url: impl Into<String>) -> Self {
        Self {
            base_url: Some(base_url.into()),
            ..Default::default()
        }
    }

    pub fn verbose() -> Self {
        Self {
            verbose: true,
            ..Default::default()
        }
    }

    /// Reject values the table engine cannot work with
    pub fn validate(&self) -> ConversionResult<()> {
        if !(self.table_width > 0.0 && self.table_width.is_finite()) {
            return Err(ConversionError::invalid(format!(
                "table width must be a positive number, got {}",
                self.table_width
            )));
        }
        if !(self.min_column_width > 0.0 && self.min_column_width < 1.0) {
            return Err(ConversionError::invalid(format!(
                "minimum column width must be in (0, 1), got {}",
                self.min_column_width
            )));
        }
        Ok(())
    }

    /// Parse options from TOML text
    #[cfg(feature = "config")]
    pub fn from_toml_str(text: &str) -> ConversionResult<Self> {
        let options: ConvertOptions =
            toml::from_str(text).map_err(|e| ConversionError::invalid(e.to_string()))?;
        options.validate()?;
        Ok(options)
    }

    /// Load options from a TOML file
    #[cfg(feature = "config")]
    pub fn from_file(path: impl AsRef<std::path::Path>) -> ConversionResult<Self> {
        let text = std::fs::read_to_string(path)?;
        Self::from_toml_str(&text)
    }
}

/// Rendering modes of the current scope
///
/// `table` borrows the layout of the innermost table being built; cells
/// and rows render into it instead of into the document.
#[derive(Debug, Clone, Default)]
pub struct RenderContext<'t> {
    /// Inside `pre`: text is emitted unescaped
    pub in_verbatim: bool,
    /// Inside `ol.references`: list items are captured as citations
    pub in_references: bool,
    /// Inside `sup.reference`: only the target anchor matters
    pub in_cite_ref: bool,
    /// Reference id discovered by the anchor inside a citation marker
    pub name_cite_ref: Option<String>,
    /// A `dt` or `dd` of the current description list already opened
    /// its item
    pub definition_list_started: bool,
    pub table: Option<&'t RefCell<TableLayout>>,
    /// Row kind of an enclosing `thead`/`tfoot` row group
    pub row_group: Option<RowKind>,
}

impl<'t> RenderContext<'t> {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn verbatim(&self) -> Self {
        Self {
            in_verbatim: true,
            ..self.clone()
        }
    }

    pub fn references(&self) -> Self {
        Self {
            in_references: true,
            ..self.clone()
        }
    }

    /// Scope used to discover the target of a citation marker
    pub fn citation_probe(&self) -> Self {
        Self {
            in_cite_ref: true,
            name_cite_ref: None,
            ..self.clone()
        }
    }

    /// Scope for the content of a new table
    pub fn with_table(&self, table: &'t RefCell<TableLayout>) -> Self {
        Self {
            table: Some(table),
            row_group: None,
            ..self.clone()
        }
    }

    /// Scope for the rows of a `thead`/`tfoot` group
    pub fn in_row_group(&self, kind: RowKind) -> Self {
        Self {
            row_group: Some(kind),
            ..self.clone()
        }
    }

    pub fn in_table(&self) -> bool {
        self.table.is_some()
    }

    /// Whether output of this scope reaches the document itself rather
    /// than a capture buffer
    pub fn writes_document(&self) -> bool {
        !(self.in_verbatim || self.in_references || self.in_cite_ref || self.in_table())
    }
}
