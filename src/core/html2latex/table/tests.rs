//! Tests for the table grid layout and serializer

use super::cell::{CellContent, CellKind, Rgb, RowKind, TextAlign, VerticalAlign};
use super::generator::{TableLayout, MAX_COLSPAN, MAX_ROWSPAN};
use crate::core::html::Attributes;
use pretty_assertions::assert_eq;

fn attrs(pairs: &[(&str, &str)]) -> Attributes {
    pairs
        .iter()
        .map(|(k, v)| (k.to_string(), v.to_string()))
        .collect()
}

fn none() -> Attributes {
    Attributes::new()
}

fn assert_close(actual: &[f64], expected: &[f64]) {
    assert_eq!(actual.len(), expected.len(), "{:?} vs {:?}", actual, expected);
    for (a, e) in actual.iter().zip(expected) {
        assert!((a - e).abs() < 1e-9, "{:?} vs {:?}", actual, expected);
    }
}

#[test]
fn test_header_colspan_table() {
    let mut table = TableLayout::new(0.02);
    table.start_row(RowKind::Body, &none());
    table
        .add_cell(CellKind::Header, &attrs(&[("colspan", "2")]), "Head")
        .unwrap();
    table.end_row();
    table.start_row(RowKind::Body, &none());
    table.add_cell(CellKind::Data, &none(), "a").unwrap();
    table.add_cell(CellKind::Data, &none(), "b").unwrap();
    table.end_row();

    assert_eq!(table.dimensions(), (2, 2));
    let expected = concat!(
        "\\begin{table}[htbp]\n",
        "\\centering\n",
        "\\begin{tabular}{|l|l|}\n",
        "\\hline\n",
        "\\multicolumn{2}{|l|}{\\cellcolor[rgb]{0.900,0.900,0.900}",
        "\\parbox[t]{\\dimexpr 1.0000\\linewidth-2\\tabcolsep\\relax}{\\centering \\textbf{Head}}} \\\\\n",
        "\\hline\n",
        "\\parbox[t]{\\dimexpr 0.5000\\linewidth-2\\tabcolsep\\relax}{\\raggedright a} & ",
        "\\parbox[t]{\\dimexpr 0.5000\\linewidth-2\\tabcolsep\\relax}{\\raggedright b} \\\\\n",
        "\\hline\n",
        "\\end{tabular}\n",
        "\\end{table}\n",
    );
    assert_eq!(table.serialize(1.0), expected);
}

#[test]
fn test_rowspan_puts_text_in_bottom_row() {
    let mut table = TableLayout::new(0.02);
    table.start_row(RowKind::Body, &none());
    table
        .add_cell(CellKind::Data, &attrs(&[("rowspan", "2")]), "A")
        .unwrap();
    table.add_cell(CellKind::Data, &none(), "b").unwrap();
    table.end_row();
    table.start_row(RowKind::Body, &none());
    table.add_cell(CellKind::Data, &none(), "c").unwrap();
    table.end_row();

    assert_eq!(table.cell(1, 1).unwrap().content, CellContent::Spacer);
    assert_eq!(
        table.cell(1, 2).unwrap().content,
        CellContent::Main("A".to_string())
    );
    // The second row's cell flows around the span
    assert_eq!(
        table.cell(2, 2).unwrap().content,
        CellContent::Main("c".to_string())
    );

    let latex = table.serialize(1.0);
    assert!(latex.contains("{\\raggedright ~} & "));
    assert!(latex.contains(" \\\\\n\\cline{2-2}\n"));
    assert!(latex.contains("\\multirow{-2}{*}{\\parbox[t]"));
    assert!(latex.contains("{\\raggedright A}} & "));
}

#[test]
fn test_grid_has_no_holes() {
    let mut table = TableLayout::new(0.02);
    table.start_row(RowKind::Body, &none());
    table.add_cell(CellKind::Data, &none(), "1").unwrap();
    table.end_row();
    table.start_row(RowKind::Body, &none());
    table
        .add_cell(CellKind::Data, &attrs(&[("colspan", "2")]), "2")
        .unwrap();
    table
        .add_cell(CellKind::Data, &attrs(&[("rowspan", "3")]), "3")
        .unwrap();
    table.end_row();

    let (xmax, ymax) = table.dimensions();
    assert_eq!((xmax, ymax), (3, 4));
    for y in 1..=ymax {
        for x in 1..=xmax {
            assert!(table.cell(x, y).is_some(), "hole at ({}, {})", x, y);
        }
    }
}

#[test]
fn test_later_rows_can_claim_padding() {
    let mut table = TableLayout::new(0.02);
    table.start_row(RowKind::Body, &none());
    table.add_cell(CellKind::Data, &none(), "A").unwrap();
    table
        .add_cell(CellKind::Data, &attrs(&[("rowspan", "2")]), "B")
        .unwrap();
    table.end_row();
    assert!(table.cell(1, 2).unwrap().is_filler());

    table.start_row(RowKind::Body, &none());
    table.add_cell(CellKind::Data, &none(), "C").unwrap();
    assert_eq!(
        table.cell(1, 2).unwrap().content,
        CellContent::Main("C".to_string())
    );
}

/// Column slots taken by each row of a serialized tabular
fn row_slots(latex: &str) -> Vec<usize> {
    latex
        .lines()
        .filter_map(|line| line.strip_suffix(" \\\\"))
        .map(|row| {
            row.split(" & ")
                .map(|cell| {
                    cell.strip_prefix("\\multicolumn{")
                        .and_then(|rest| rest.split('}').next())
                        .and_then(|n| n.parse::<usize>().ok())
                        .unwrap_or(1)
                })
                .sum()
        })
        .collect()
}

#[test]
fn test_overlapping_spans_keep_first_claim() {
    let mut table = TableLayout::new(0.02);
    table.start_row(RowKind::Body, &none());
    table.add_cell(CellKind::Data, &none(), "a").unwrap();
    table
        .add_cell(CellKind::Data, &attrs(&[("rowspan", "2")]), "b")
        .unwrap();
    table.end_row();
    table.start_row(RowKind::Body, &none());
    table
        .add_cell(CellKind::Data, &attrs(&[("colspan", "3")]), "c")
        .unwrap();
    table.end_row();

    assert_eq!(
        table.cell(2, 2).unwrap().content,
        CellContent::Main("b".to_string())
    );
    // The later span stops at the first claimed column
    let c = table.cell(1, 2).unwrap();
    assert_eq!(c.content, CellContent::Main("c".to_string()));
    assert_eq!(c.colspan, 1);
    assert_eq!(table.dimensions(), (2, 2));
}

#[test]
fn test_overlapping_spans_serialize_to_full_rows() {
    let mut table = TableLayout::new(0.02);
    table.start_row(RowKind::Body, &none());
    table.add_cell(CellKind::Data, &none(), "a").unwrap();
    table
        .add_cell(CellKind::Data, &attrs(&[("rowspan", "2")]), "b")
        .unwrap();
    table.end_row();
    table.start_row(RowKind::Body, &none());
    table
        .add_cell(CellKind::Data, &attrs(&[("colspan", "2")]), "c")
        .unwrap();
    table.end_row();

    let latex = table.serialize(1.0);
    assert!(latex.contains("\\begin{tabular}{|l|l|}"));
    assert!(!latex.contains("\\multicolumn"));
    assert_eq!(row_slots(&latex), vec![2, 2]);
}

#[test]
fn test_spans_clipped_around_earlier_rowspans() {
    let mut table = TableLayout::new(0.02);
    table.start_row(RowKind::Body, &none());
    table.add_cell(CellKind::Data, &none(), "a").unwrap();
    table.add_cell(CellKind::Data, &none(), "b").unwrap();
    table
        .add_cell(CellKind::Data, &attrs(&[("rowspan", "3")]), "c")
        .unwrap();
    table.add_cell(CellKind::Data, &none(), "d").unwrap();
    table.end_row();
    table.start_row(RowKind::Body, &none());
    table
        .add_cell(
            CellKind::Data,
            &attrs(&[("colspan", "4"), ("rowspan", "2")]),
            "e",
        )
        .unwrap();
    table
        .add_cell(CellKind::Data, &attrs(&[("colspan", "2")]), "f")
        .unwrap();
    table.end_row();
    table.start_row(RowKind::Body, &none());
    table.add_cell(CellKind::Data, &none(), "g").unwrap();
    table.end_row();

    let e = table.cell(1, 3).unwrap();
    assert_eq!(e.content, CellContent::Main("e".to_string()));
    assert_eq!((e.colspan, e.rowspan), (2, 2));
    assert_eq!(table.cell(4, 2).unwrap().colspan, 2);
    assert_eq!(table.dimensions(), (5, 3));

    let latex = table.serialize(1.0);
    assert_eq!(row_slots(&latex), vec![5, 5, 5]);
}

#[test]
fn test_block_span_next_to_plain_cells() {
    let mut table = TableLayout::new(0.02);
    table.start_row(RowKind::Body, &none());
    table.add_cell(CellKind::Data, &none(), "a").unwrap();
    table
        .add_cell(
            CellKind::Data,
            &attrs(&[("colspan", "2"), ("rowspan", "2")]),
            "B",
        )
        .unwrap();
    table.end_row();
    table.start_row(RowKind::Body, &none());
    table.add_cell(CellKind::Data, &none(), "c").unwrap();
    table.end_row();

    let expected = concat!(
        "\\begin{table}[htbp]\n",
        "\\centering\n",
        "\\begin{tabular}{|l|l|l|}\n",
        "\\hline\n",
        "\\parbox[t]{\\dimexpr 0.3333\\linewidth-2\\tabcolsep\\relax}{\\raggedright a} & ",
        "\\multicolumn{2}{l|}{",
        "\\parbox[t]{\\dimexpr 0.6667\\linewidth-2\\tabcolsep\\relax}{\\raggedright ~}} \\\\\n",
        "\\cline{1-1}\n",
        "\\parbox[t]{\\dimexpr 0.3333\\linewidth-2\\tabcolsep\\relax}{\\raggedright c} & ",
        "\\multicolumn{2}{l|}{\\multirow{-2}{*}{",
        "\\parbox[t]{\\dimexpr 0.6667\\linewidth-2\\tabcolsep\\relax}{\\raggedright B}}} \\\\\n",
        "\\hline\n",
        "\\end{tabular}\n",
        "\\end{table}\n",
    );
    assert_eq!(table.serialize(1.0), expected);
}

#[test]
fn test_oversized_spans_are_clamped() {
    let mut table = TableLayout::new(0.02);
    table.start_row(RowKind::Body, &none());
    table
        .add_cell(
            CellKind::Data,
            &attrs(&[("colspan", "18446744073709551615")]),
            "wide",
        )
        .unwrap();
    table.end_row();
    assert_eq!(table.dimensions(), (MAX_COLSPAN, 1));
    assert_eq!(table.cell(1, 1).unwrap().colspan, MAX_COLSPAN);
    assert_eq!(row_slots(&table.serialize(1.0)), vec![MAX_COLSPAN]);

    let mut table = TableLayout::new(0.02);
    table.start_row(RowKind::Body, &none());
    table
        .add_cell(
            CellKind::Data,
            &attrs(&[("rowspan", "99999999999999999999999999")]),
            "tall",
        )
        .unwrap();
    table.add_cell(CellKind::Data, &none(), "x").unwrap();
    table.end_row();
    assert_eq!(table.dimensions(), (2, MAX_ROWSPAN));
    assert_eq!(
        table.cell(1, MAX_ROWSPAN).unwrap().content,
        CellContent::Main("tall".to_string())
    );
    assert!(table.cell(2, MAX_ROWSPAN).unwrap().is_filler());
    assert!(table.cell(3, 1).is_none());
}

#[test]
fn test_malformed_spans_default_to_one() {
    let mut table = TableLayout::new(0.02);
    table.start_row(RowKind::Body, &none());
    table
        .add_cell(
            CellKind::Data,
            &attrs(&[("colspan", "wide"), ("rowspan", "0")]),
            "x",
        )
        .unwrap();
    let cell = table.cell(1, 1).unwrap();
    assert_eq!((cell.colspan, cell.rowspan), (1, 1));
    assert_eq!(table.dimensions(), (1, 1));
}

#[test]
fn test_cell_outside_row_is_an_error() {
    let mut table = TableLayout::new(0.02);
    let err = table.add_cell(CellKind::Data, &none(), "x").unwrap_err();
    assert!(err.to_string().contains("td encountered outside table row"));
}

#[test]
fn test_header_rows_and_styles() {
    let mut table = TableLayout::new(0.02);
    table.start_row(
        RowKind::Head,
        &attrs(&[("style", "background-color:#000000; vertical-align: middle")]),
    );
    table
        .add_cell(
            CellKind::Data,
            &attrs(&[("style", "background-color:#ffffff; text-align: right")]),
            " h1 ",
        )
        .unwrap();
    table.add_cell(CellKind::Data, &none(), "h2").unwrap();
    table.end_row();

    let first = table.cell(1, 1).unwrap();
    assert_eq!(first.content, CellContent::Main("\\textbf{h1}".to_string()));
    assert_eq!(first.background, Some(Rgb::new(1.0, 1.0, 1.0)));
    assert_eq!(first.text_align, TextAlign::Right);
    assert_eq!(first.vertical_align, VerticalAlign::Middle);

    let second = table.cell(2, 1).unwrap();
    assert_eq!(second.background, Some(Rgb::new(0.0, 0.0, 0.0)));
    assert_eq!(second.text_align, TextAlign::Center);
}

#[test]
fn test_data_cells_have_no_default_background() {
    let mut table = TableLayout::new(0.02);
    table.start_row(RowKind::Body, &none());
    table.add_cell(CellKind::Data, &none(), "x").unwrap();
    let cell = table.cell(1, 1).unwrap();
    assert_eq!(cell.background, None);
    assert_eq!(cell.text_align, TextAlign::Left);
    assert!(!table.serialize(1.0).contains("cellcolor"));
}

#[test]
fn test_equal_widths_without_hints() {
    for columns in 1..=7 {
        let mut table = TableLayout::new(0.02);
        table.start_row(RowKind::Body, &none());
        for _ in 0..columns {
            table.add_cell(CellKind::Data, &none(), "x").unwrap();
        }
        let widths = table.resolve_column_widths(0.8);
        assert_close(&widths, &vec![0.8 / columns as f64; columns]);
        let total: f64 = widths.iter().sum();
        assert!((total - 0.8).abs() < 1e-9);
    }
}

#[test]
fn test_single_column_constraint() {
    let mut table = TableLayout::new(0.02);
    table.start_row(RowKind::Body, &none());
    table
        .add_cell(CellKind::Data, &attrs(&[("style", "width: 30%")]), "a")
        .unwrap();
    table.add_cell(CellKind::Data, &none(), "b").unwrap();
    assert_close(&table.resolve_column_widths(1.0), &[0.3, 0.7]);
}

#[test]
fn test_narrow_constraints_apply_first() {
    let mut table = TableLayout::new(0.02);
    table.start_row(RowKind::Body, &none());
    table
        .add_cell(
            CellKind::Data,
            &attrs(&[("colspan", "2"), ("style", "width:50%")]),
            "wide",
        )
        .unwrap();
    table.add_cell(CellKind::Data, &none(), "c").unwrap();
    table.end_row();
    table.start_row(RowKind::Body, &none());
    table
        .add_cell(CellKind::Data, &attrs(&[("style", "width:40%")]), "a")
        .unwrap();
    table.end_row();

    assert_eq!(table.constraints().len(), 2);
    assert_close(&table.resolve_column_widths(1.0), &[0.45, 0.05, 0.5]);
}

#[test]
fn test_over_constrained_table_is_scaled_down() {
    let mut table = TableLayout::new(0.02);
    table.start_row(RowKind::Body, &none());
    table
        .add_cell(CellKind::Data, &attrs(&[("style", "width:80%")]), "a")
        .unwrap();
    table
        .add_cell(CellKind::Data, &attrs(&[("style", "width:80%")]), "b")
        .unwrap();
    assert_close(&table.resolve_column_widths(1.0), &[0.5, 0.5]);
}

#[test]
fn test_columns_never_collapse_to_zero() {
    let mut table = TableLayout::new(0.02);
    table.start_row(RowKind::Body, &none());
    table
        .add_cell(CellKind::Data, &attrs(&[("style", "width:100%")]), "a")
        .unwrap();
    table.add_cell(CellKind::Data, &none(), "b").unwrap();
    let widths = table.resolve_column_widths(1.0);
    assert!(widths[1] > 0.0);
    assert!((widths.iter().sum::<f64>() - 1.0).abs() < 1e-9);
}

#[test]
fn test_caption_placement() {
    let mut above = TableLayout::new(0.02);
    above.add_caption(" Results ");
    above.start_row(RowKind::Body, &none());
    above.add_cell(CellKind::Data, &none(), "x").unwrap();
    let latex = above.serialize(1.0);
    assert!(latex.starts_with("\\begin{table}[htbp]\n\\centering\n\\caption{Results}\n\\begin{tabular}"));

    let mut below = TableLayout::new(0.02);
    below.start_row(RowKind::Body, &none());
    below.add_cell(CellKind::Data, &none(), "x").unwrap();
    below.end_row();
    below.add_caption("Results");
    let latex = below.serialize(1.0);
    assert!(latex.ends_with("\\end{tabular}\n\\caption{Results}\n\\end{table}\n"));
}

#[test]
fn test_empty_table_serializes_to_nothing() {
    let mut table = TableLayout::new(0.02);
    table.add_caption("Nothing here");
    table.start_row(RowKind::Body, &none());
    table.end_row();
    assert_eq!(table.dimensions(), (0, 0));
    assert_eq!(table.serialize(1.0), "");
    assert!(table.resolve_column_widths(1.0).is_empty());
}
