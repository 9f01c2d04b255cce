//! HTML to LaTeX Table Layout Engine
//!
//! Accumulates the cells of one HTML table into a sparse grid, honoring
//! `colspan`/`rowspan`, and serializes the grid to a `tabular` inside a
//! `table` float. Column widths come from `width: N%` style hints.
//!
//! # Architecture
//!
//! ```text
//! tr/td events -> Grid placement (spans, styles) -> Width resolution -> LaTeX
//! ```
//!
//! # Example
//!
//! ```ignore
//! use table::{TableLayout, RowKind, CellKind};
//!
//! let mut layout = TableLayout::new(0.02);
//! layout.start_row(RowKind::Body, &attributes);
//! layout.add_cell(CellKind::Header, &attributes, "Name")?;
//! layout.end_row();
//! let latex = layout.serialize(1.0);
//! ```

mod cell;
mod generator;
mod style;

#[cfg(test)]
mod tests;

// Re-export public API
pub use cell::{CellContent, CellKind, GridCell, Rgb, RowKind, TextAlign, VerticalAlign};
pub use generator::{ColumnWidthConstraint, TableLayout};
pub use style::{parse_percentage, CellStyle};
