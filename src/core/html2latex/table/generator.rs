//! Grid accumulator and LaTeX serializer for one HTML table

use std::num::IntErrorKind;

use fxhash::FxHashMap;
use tracing::debug;

use super::cell::{CellContent, CellKind, GridCell, Rgb, RowKind, TextAlign};
use super::style::CellStyle;
use crate::core::html::Attributes;
use crate::utils::error::{ConversionError, ConversionResult};

/// Columns `columns` should together take at least `fraction` of the table
#[derive(Debug, Clone, PartialEq)]
pub struct ColumnWidthConstraint {
    pub columns: Vec<usize>,
    pub fraction: f64,
}

/// Largest `colspan` honoured, as in HTML
pub const MAX_COLSPAN: usize = 1000;
/// Largest `rowspan` honoured, as in HTML
pub const MAX_ROWSPAN: usize = 65534;

/// Coordinate inside the bounding box that no cell claimed
static FILLER: GridCell = GridCell::filler();

/// Sparse table grid with a row/column cursor
///
/// Coordinates are `(column, row)` and 1-based. Only claimed coordinates are
/// stored; any other coordinate inside the bounding box reads as a filler
/// cell, which later cells may still claim.
#[derive(Debug)]
pub struct TableLayout {
    cells: FxHashMap<(usize, usize), GridCell>,
    constraints: Vec<ColumnWidthConstraint>,
    /// Kind and style of the row being filled, `None` between rows
    row: Option<(RowKind, CellStyle)>,
    caption: Option<String>,
    caption_below: bool,
    x: usize,
    y: usize,
    xmax: usize,
    ymax: usize,
    min_column_width: f64,
}

/// Parse a span attribute. Anything unparsable counts as 1, numbers are
/// clamped to `1..=max`.
fn span(attributes: &Attributes, name: &str, max: usize) -> usize {
    let Some(value) = attributes.get(name) else {
        return 1;
    };
    let n = match value.trim().parse::<usize>() {
        Ok(n) => n,
        Err(e) if *e.kind() == IntErrorKind::PosOverflow => max,
        Err(_) => 1,
    };
    n.clamp(1, max)
}

impl TableLayout {
    /// Create an empty layout. `min_column_width` is the smallest fraction
    /// of the table width any column is given.
    pub fn new(min_column_width: f64) -> Self {
        TableLayout {
            cells: FxHashMap::default(),
            constraints: Vec::new(),
            row: None,
            caption: None,
            caption_below: false,
            x: 0,
            y: 0,
            xmax: 0,
            ymax: 0,
            min_column_width,
        }
    }

    /// Begin the next row
    pub fn start_row(&mut self, kind: RowKind, attributes: &Attributes) {
        self.row = Some((kind, CellStyle::from_attributes(attributes)));
        self.x = 0;
        self.y += 1;
    }

    pub fn end_row(&mut self) {
        self.row = None;
    }

    pub fn is_row_started(&self) -> bool {
        self.row.is_some()
    }

    /// `(xmax, ymax)`: the largest column and row reached by any span
    pub fn dimensions(&self) -> (usize, usize) {
        (self.xmax, self.ymax)
    }

    /// Cell at a coordinate; `None` outside the bounding box
    pub fn cell(&self, x: usize, y: usize) -> Option<&GridCell> {
        if !(1..=self.xmax).contains(&x) || !(1..=self.ymax).contains(&y) {
            return None;
        }
        Some(self.cells.get(&(x, y)).unwrap_or(&FILLER))
    }

    pub fn caption(&self) -> Option<&str> {
        self.caption.as_deref()
    }

    pub fn constraints(&self) -> &[ColumnWidthConstraint] {
        &self.constraints
    }

    fn is_claimed(&self, x: usize, y: usize) -> bool {
        self.cells.contains_key(&(x, y))
    }

    /// Shrink a span anchored at the cursor to the unclaimed coordinates:
    /// columns up to the first claimed one in the cursor row, then rows up
    /// to the first one where any of those columns is claimed.
    fn clip_span(&self, colspan: usize, rowspan: usize) -> (usize, usize) {
        let (x, y) = (self.x, self.y);
        let colspan = 1 + (1..colspan)
            .take_while(|&dx| !self.is_claimed(x + dx, y))
            .count();
        let rowspan = 1 + (1..rowspan)
            .take_while(|&dy| (x..x + colspan).all(|cx| !self.is_claimed(cx, y + dy)))
            .count();
        (colspan, rowspan)
    }

    /// Set the caption. It goes below the tabular when cells were already
    /// placed, above otherwise.
    pub fn add_caption(&mut self, text: &str) {
        self.caption = Some(text.trim().to_string());
        self.caption_below = !self.cells.is_empty();
    }

    /// Place a cell at the next free coordinate of the current row
    pub fn add_cell(
        &mut self,
        kind: CellKind,
        attributes: &Attributes,
        text: &str,
    ) -> ConversionResult<()> {
        let Some((row_kind, row_style)) = self.row else {
            return Err(ConversionError::structural(format!(
                "{} encountered outside table row",
                kind.tag()
            )));
        };

        self.x += 1;
        while self.is_claimed(self.x, self.y) {
            self.x += 1;
        }

        // The first claim of a coordinate wins
        let (colspan, rowspan) = self.clip_span(
            span(attributes, "colspan", MAX_COLSPAN),
            span(attributes, "rowspan", MAX_ROWSPAN),
        );
        let style = row_style.overridden_by(&CellStyle::from_attributes(attributes));
        let is_header = kind == CellKind::Header || row_kind.is_header();

        let text = text.trim();
        let text = if is_header {
            format!("\\textbf{{{}}}", text)
        } else {
            text.to_string()
        };
        let background = style
            .background
            .or(if is_header { Some(Rgb::LIGHT_GRAY) } else { None });
        let text_align = style.text_align.unwrap_or(if is_header {
            TextAlign::Center
        } else {
            TextAlign::Left
        });
        let vertical_align = style.vertical_align.unwrap_or_default();

        if let Some(fraction) = style.width {
            self.constraints.push(ColumnWidthConstraint {
                columns: (self.x..self.x + colspan).collect(),
                fraction,
            });
        }

        let bottom = self.y + rowspan - 1;
        for x in self.x..self.x + colspan {
            for y in self.y..=bottom {
                let is_left_edge = x == self.x;
                let is_bottom_edge = y == bottom;
                let content = match (is_left_edge, is_bottom_edge) {
                    (true, true) => CellContent::Main(text.clone()),
                    (true, false) => CellContent::Spacer,
                    _ => CellContent::Placeholder,
                };
                self.cells.insert(
                    (x, y),
                    GridCell {
                        content,
                        is_left_edge,
                        is_bottom_edge,
                        colspan,
                        rowspan,
                        background,
                        text_align,
                        vertical_align,
                    },
                );
            }
        }

        self.xmax = self.xmax.max(self.x + colspan - 1);
        self.ymax = self.ymax.max(bottom);
        Ok(())
    }

    /// Width of every column as a fraction of `\linewidth`, summing to
    /// `total_width`
    pub fn resolve_column_widths(&self, total_width: f64) -> Vec<f64> {
        let n = self.xmax;
        if n == 0 {
            return Vec::new();
        }

        let mut assigned: Vec<Option<f64>> = vec![None; n];
        let mut constraints: Vec<&ColumnWidthConstraint> = self.constraints.iter().collect();
        constraints.sort_by_key(|c| c.columns.len());

        for constraint in constraints {
            let columns: Vec<usize> = constraint
                .columns
                .iter()
                .copied()
                .filter(|&x| (1..=n).contains(&x))
                .collect();
            if columns.is_empty() {
                continue;
            }
            let current: f64 = columns.iter().filter_map(|&x| assigned[x - 1]).sum();
            if current < constraint.fraction {
                let share = (constraint.fraction - current) / columns.len() as f64;
                for &x in &columns {
                    assigned[x - 1] = Some(assigned[x - 1].unwrap_or(0.0) + share);
                }
            }
        }

        let used: f64 = assigned.iter().flatten().sum();
        let unassigned = assigned.iter().filter(|w| w.is_none()).count();
        let remaining = (1.0 - used).max(0.0);
        let mut widths: Vec<f64> = assigned
            .iter()
            .map(|w| {
                w.unwrap_or(remaining / unassigned.max(1) as f64)
                    .max(self.min_column_width)
            })
            .collect();

        let sum: f64 = widths.iter().sum();
        if sum < 1.0 {
            let top_up = (1.0 - sum) / n as f64;
            widths.iter_mut().for_each(|w| *w += top_up);
        } else if sum > 1.0 {
            widths.iter_mut().for_each(|w| *w /= sum);
        }

        widths.iter().map(|w| w * total_width).collect()
    }

    /// Serialize to a `table` float. An empty table produces nothing.
    pub fn serialize(&self, total_width: f64) -> String {
        let (xmax, ymax) = self.dimensions();
        if xmax == 0 || ymax == 0 {
            return String::new();
        }
        debug!(columns = xmax, rows = ymax, "serializing table");

        let widths = self.resolve_column_widths(total_width);
        let mut out = String::new();
        out.push_str("\\begin{table}[htbp]\n\\centering\n");
        if let Some(caption) = self.caption.as_deref().filter(|_| !self.caption_below) {
            out.push_str(&format!("\\caption{{{}}}\n", caption));
        }

        out.push_str("\\begin{tabular}{|");
        out.push_str(&"l|".repeat(xmax));
        out.push_str("}\n\\hline\n");

        for y in 1..=ymax {
            let row: Vec<String> = (1..=xmax)
                .filter_map(|x| {
                    let cell = self.cell(x, y)?;
                    let last = (x + cell.colspan - 1).min(xmax);
                    let width: f64 = widths[x - 1..last].iter().sum();
                    cell.to_latex(width, x)
                })
                .collect();
            out.push_str(&row.join(" & "));
            out.push_str(" \\\\\n");
            out.push_str(&self.rule_after(y));
        }

        out.push_str("\\end{tabular}\n");
        if let Some(caption) = self.caption.as_deref().filter(|_| self.caption_below) {
            out.push_str(&format!("\\caption{{{}}}\n", caption));
        }
        out.push_str("\\end{table}\n");
        out
    }

    /// `\hline` under a row whose cells all end there, otherwise `\cline`
    /// over each run of columns that end there
    fn rule_after(&self, y: usize) -> String {
        let ends: Vec<bool> = (1..=self.xmax)
            .map(|x| self.cell(x, y).map_or(true, |cell| cell.is_bottom_edge))
            .collect();
        if ends.iter().all(|&end| end) {
            return "\\hline\n".to_string();
        }

        let mut rule = String::new();
        let mut start = None;
        for (i, &end) in ends.iter().chain(std::iter::once(&false)).enumerate() {
            match (end, start) {
                (true, None) => start = Some(i + 1),
                (false, Some(first)) => {
                    rule.push_str(&format!("\\cline{{{}-{}}}", first, i));
                    start = None;
                }
                _ => {}
            }
        }
        if !rule.is_empty() {
            rule.push('\n');
        }
        rule
    }
}
