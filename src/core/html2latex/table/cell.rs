//! Cell types, alignment and colors for the LaTeX table grid

/// Kind of row a cell was placed in
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RowKind {
    /// `tr`
    Body,
    /// `thead`
    Head,
    /// `tfoot`
    Foot,
}

impl RowKind {
    /// Parse from an HTML tag name
    pub fn from_tag(tag: &str) -> Option<Self> {
        match tag {
            "tr" => Some(RowKind::Body),
            "thead" => Some(RowKind::Head),
            "tfoot" => Some(RowKind::Foot),
            _ => None,
        }
    }

    pub fn is_header(self) -> bool {
        matches!(self, RowKind::Head | RowKind::Foot)
    }
}

/// Kind of cell
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CellKind {
    /// `td`
    Data,
    /// `th`
    Header,
}

impl CellKind {
    /// Parse from an HTML tag name
    pub fn from_tag(tag: &str) -> Option<Self> {
        match tag {
            "td" => Some(CellKind::Data),
            "th" => Some(CellKind::Header),
            _ => None,
        }
    }

    pub fn tag(self) -> &'static str {
        match self {
            CellKind::Data => "td",
            CellKind::Header => "th",
        }
    }
}

/// Horizontal text alignment inside a cell
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum TextAlign {
    #[default]
    Left,
    Center,
    Right,
}

impl TextAlign {
    /// Parse a CSS `text-align` value
    pub fn from_css(s: &str) -> Option<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "left" => Some(TextAlign::Left),
            "center" => Some(TextAlign::Center),
            "right" => Some(TextAlign::Right),
            _ => None,
        }
    }

    /// Paragraph alignment command placed at the start of the cell box
    pub fn to_latex(self) -> &'static str {
        match self {
            TextAlign::Left => "\\raggedright ",
            TextAlign::Center => "\\centering ",
            TextAlign::Right => "\\raggedleft ",
        }
    }
}

/// Vertical alignment of a cell box
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum VerticalAlign {
    #[default]
    Top,
    Middle,
    Bottom,
}

impl VerticalAlign {
    /// Parse a CSS `vertical-align` value
    pub fn from_css(s: &str) -> Option<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "top" => Some(VerticalAlign::Top),
            "middle" => Some(VerticalAlign::Middle),
            "bottom" => Some(VerticalAlign::Bottom),
            _ => None,
        }
    }

    /// `\parbox` position argument
    pub fn to_char(self) -> char {
        match self {
            VerticalAlign::Top => 't',
            VerticalAlign::Middle => 'c',
            VerticalAlign::Bottom => 'b',
        }
    }
}

/// RGB color with components in 0.0..=1.0
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Rgb {
    pub r: f64,
    pub g: f64,
    pub b: f64,
}

impl Rgb {
    pub const fn new(r: f64, g: f64, b: f64) -> Self {
        Rgb { r, g, b }
    }

    /// Default background of header cells
    pub const LIGHT_GRAY: Rgb = Rgb::new(0.9, 0.9, 0.9);

    /// Parse `#rgb` or `#rrggbb`. Named colors are not supported.
    pub fn from_hex(s: &str) -> Option<Self> {
        let hex = s.trim().strip_prefix('#')?;
        if !hex.bytes().all(|b| b.is_ascii_hexdigit()) {
            return None;
        }
        let channel = |digits: &str| u8::from_str_radix(digits, 16).ok();
        let (r, g, b) = match hex.len() {
            3 => {
                let expand = |i: usize| channel(&hex[i..i + 1]).map(|v| v * 17);
                (expand(0)?, expand(1)?, expand(2)?)
            }
            6 => (channel(&hex[0..2])?, channel(&hex[2..4])?, channel(&hex[4..6])?),
            _ => return None,
        };
        Some(Rgb::new(
            f64::from(r) / 255.0,
            f64::from(g) / 255.0,
            f64::from(b) / 255.0,
        ))
    }

    /// `\cellcolor[rgb]{...}` argument
    pub fn to_latex(self) -> String {
        format!("{:.3},{:.3},{:.3}", self.r, self.g, self.b)
    }
}

/// What a grid coordinate shows
#[derive(Debug, Clone, PartialEq)]
pub enum CellContent {
    /// The authoritative copy carrying the rendered text
    Main(String),
    /// Left column of a row span above the main cell; printed as `~`
    Spacer,
    /// Covered by a column span; not printed
    Placeholder,
    /// Hole left by a short row; printed empty and may still be claimed
    Filler,
}

/// One coordinate of the table grid
#[derive(Debug, Clone, PartialEq)]
pub struct GridCell {
    pub content: CellContent,
    /// Coordinate lies in the first column of its span
    pub is_left_edge: bool,
    /// Coordinate lies in the last row of its span
    pub is_bottom_edge: bool,
    pub colspan: usize,
    pub rowspan: usize,
    pub background: Option<Rgb>,
    pub text_align: TextAlign,
    pub vertical_align: VerticalAlign,
}

impl GridCell {
    /// The single coordinate of a span that carries the text
    pub fn is_main(&self) -> bool {
        self.is_left_edge && self.is_bottom_edge
    }

    /// An empty coordinate that has not been claimed by any cell
    pub const fn filler() -> Self {
        GridCell {
            content: CellContent::Filler,
            is_left_edge: true,
            is_bottom_edge: true,
            colspan: 1,
            rowspan: 1,
            background: None,
            text_align: TextAlign::Left,
            vertical_align: VerticalAlign::Top,
        }
    }

    pub fn is_filler(&self) -> bool {
        self.content == CellContent::Filler
    }

    /// Text to print at this coordinate, `None` if nothing is printed
    pub fn text(&self) -> Option<&str> {
        match &self.content {
            CellContent::Main(text) => Some(text),
            CellContent::Spacer => Some("~"),
            CellContent::Placeholder => None,
            CellContent::Filler => Some(""),
        }
    }

    /// Generate LaTeX for this coordinate given the width of its span
    /// (a fraction of `\linewidth`) and its column index.
    ///
    /// Returns `None` for coordinates the row must skip entirely.
    pub fn to_latex(&self, width: f64, column: usize) -> Option<String> {
        let text = self.text()?;
        if self.is_filler() {
            return Some(String::new());
        }

        let mut inner = format!(
            "\\parbox[{}]{{\\dimexpr {:.4}\\linewidth-2\\tabcolsep\\relax}}{{{}{}}}",
            self.vertical_align.to_char(),
            width,
            self.text_align.to_latex(),
            text
        );

        if self.is_main() && self.rowspan > 1 {
            // Negative count: the text sits in the last row and extends upwards
            inner = format!("\\multirow{{-{}}}{{*}}{{{}}}", self.rowspan, inner);
        }

        if let Some(color) = self.background {
            inner = format!("\\cellcolor[rgb]{{{}}}{}", color.to_latex(), inner);
        }

        if self.colspan > 1 {
            let spec = if column == 1 { "|l|" } else { "l|" };
            inner = format!("\\multicolumn{{{}}}{{{}}}{{{}}}", self.colspan, spec, inner);
        }

        Some(inner)
    }
}
