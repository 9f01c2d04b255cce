//! Table structure repair
//!
//! Wiki markup regularly puts elements straight under `<table>` or `<tr>`.
//! Those are wrapped into synthetic rows and cells so the renderer can rely
//! on strict `table > tr > td` nesting. Text runs are left where they are;
//! the renderer discards text that ends up between rows or cells.

use super::{Child, Node};

/// What kind of children a parent element accepts
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Container {
    /// `table`: rows, row groups and captions
    Table,
    /// `tbody`, and `thead`/`tfoot` that contain rows: only rows
    RowGroup,
    /// `tr`, and `thead`/`tfoot` used directly as a row: only cells
    Row,
    /// Anything else
    Other,
}

impl Container {
    fn of(node: &Node) -> Self {
        match node.tag.as_str() {
            "table" => Container::Table,
            "tbody" => Container::RowGroup,
            "thead" | "tfoot" if is_row_group(node) => Container::RowGroup,
            "tr" | "thead" | "tfoot" => Container::Row,
            _ => Container::Other,
        }
    }

    /// Synthetic wrappers needed around a child with the given tag
    fn wrappers_for(self, tag: &str) -> &'static [&'static str] {
        match self {
            Container::Table => match tag {
                "tr" | "thead" | "tfoot" | "tbody" | "caption" => &[],
                _ => &["tr", "td"],
            },
            Container::RowGroup => match tag {
                "tr" => &[],
                _ => &["tr", "td"],
            },
            Container::Row => match tag {
                "td" | "th" => &[],
                _ => &["td"],
            },
            Container::Other => &[],
        }
    }
}

/// A `thead`/`tfoot` holding `tr` children is a row group rather than a row
pub fn is_row_group(node: &Node) -> bool {
    node.elements().any(|child| child.tag == "tr")
}

/// Normalize the tree below `root` in place
pub fn normalize(root: &mut Node) {
    let container = Container::of(root);
    for child in root.children.iter_mut() {
        let Child::Element(node) = child else {
            continue;
        };
        let wrappers = container.wrappers_for(&node.tag);
        if !wrappers.is_empty() {
            let inner = std::mem::take(node);
            *node = wrappers
                .iter()
                .rev()
                .fold(inner, |wrapped, tag| {
                    Node::synthetic(tag, vec![Child::Element(wrapped)])
                });
        }
        normalize(node);
    }
}
