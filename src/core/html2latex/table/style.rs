//! Inline `style` attribute extraction for rows and cells
//!
//! Only four properties matter for table layout. Unknown properties and
//! values that do not parse are ignored.

use lazy_static::lazy_static;
use regex::Regex;

use super::cell::{Rgb, TextAlign, VerticalAlign};
use crate::core::html::Attributes;

lazy_static! {
    static ref BACKGROUND_COLOR: Regex =
        Regex::new(r"(?i)(?:^|;)\s*background-color\s*:\s*([^;]*)").unwrap();
    static ref TEXT_ALIGN: Regex = Regex::new(r"(?i)(?:^|;)\s*text-align\s*:\s*([^;]*)").unwrap();
    static ref VERTICAL_ALIGN: Regex =
        Regex::new(r"(?i)(?:^|;)\s*vertical-align\s*:\s*([^;]*)").unwrap();
    static ref WIDTH: Regex = Regex::new(r"(?i)(?:^|;)\s*width\s*:\s*([^;]*)").unwrap();
    static ref PERCENTAGE: Regex = Regex::new(r"^(\d+(?:\.\d+)?)\s*%$").unwrap();
}

/// Style hints of a row or cell
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct CellStyle {
    pub background: Option<Rgb>,
    pub text_align: Option<TextAlign>,
    pub vertical_align: Option<VerticalAlign>,
    /// Fraction of the table width, from a `width: N%` declaration
    pub width: Option<f64>,
}

/// Last declared value of a property; later declarations win as in CSS
fn property<'a>(pattern: &Regex, style: &'a str) -> Option<&'a str> {
    pattern
        .captures_iter(style)
        .filter_map(|caps| caps.get(1))
        .last()
        .map(|m| {
            let value = m.as_str().trim();
            value
                .strip_suffix("!important")
                .map(str::trim_end)
                .unwrap_or(value)
        })
}

/// Parse `N%` into a fraction in (0, 1]
pub fn parse_percentage(value: &str) -> Option<f64> {
    let caps = PERCENTAGE.captures(value.trim())?;
    let percent: f64 = caps[1].parse().ok()?;
    (percent > 0.0).then(|| (percent / 100.0).min(1.0))
}

impl CellStyle {
    /// Parse the text of a `style` attribute
    pub fn parse(style: &str) -> Self {
        CellStyle {
            background: property(&BACKGROUND_COLOR, style).and_then(Rgb::from_hex),
            text_align: property(&TEXT_ALIGN, style).and_then(TextAlign::from_css),
            vertical_align: property(&VERTICAL_ALIGN, style).and_then(VerticalAlign::from_css),
            width: property(&WIDTH, style).and_then(parse_percentage),
        }
    }

    /// Style of an element, empty when it has no `style` attribute
    pub fn from_attributes(attributes: &Attributes) -> Self {
        attributes
            .get("style")
            .map(|style| CellStyle::parse(style))
            .unwrap_or_default()
    }

    /// Combine with a more specific style; values set in `other` win
    pub fn overridden_by(&self, other: &CellStyle) -> CellStyle {
        CellStyle {
            background: other.background.or(self.background),
            text_align: other.text_align.or(self.text_align),
            vertical_align: other.vertical_align.or(self.vertical_align),
            width: other.width.or(self.width),
        }
    }
}
