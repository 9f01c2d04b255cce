//! LaTeX escape table for text runs
//!
//! TeX control characters, the textcomp glyphs that show up in wiki
//! articles, ligatures and dash heuristics. The table is applied in a single
//! pass, longest key first, so replacements are never re-escaped.

use lazy_static::lazy_static;
use phf::phf_map;
use regex::Regex;

/// Literal text → LaTeX replacement
pub static LATEX_ESCAPES: phf::Map<&'static str, &'static str> = phf_map! {
    // TeX control characters
    "\\" => "\\textbackslash{}",
    "{" => "\\{",
    "}" => "\\}",
    "\"" => "\\textquotedbl{}",
    "&" => "\\&",
    "#" => "\\#",
    "%" => "\\%",
    "_" => "\\_",
    "^" => "\\^{}",
    "$" => "\\$",
    "[" => "$[$",
    "]" => "$]$",
    "~" => "\\~{}",

    // Latin-1
    "\u{a0}" => "~",
    "\u{ac}" => "\\textlnot{}",
    "\u{b0}" => "\\textdegree{}",
    "\u{b1}" => "\\textpm{}",
    "\u{b2}" => "\\texttwosuperior{}",
    "\u{b3}" => "\\textthreesuperior{}",
    "\u{b4}" => "\\'{}",
    "\u{b9}" => "\\textonesuperior{}",
    "\u{bc}" => "\\textonequarter{}",
    "\u{bd}" => "\\textonehalf{}",
    "\u{be}" => "\\textthreequarters{}",
    "\u{d7}" => "\\texttimes{}",
    "\u{f7}" => "\\textdiv{}",

    // Punctuation, arrows, math
    "\u{2044}" => "\\textfractionsolidus{}",
    "\u{2190}" => "\\textleftarrow{}",
    "\u{2191}" => "\\textuparrow{}",
    "\u{2192}" => "\\textrightarrow{}",
    "\u{2193}" => "\\textdownarrow{}",
    "\u{2212}" => "\\textminus{}",
    "\u{221a}" => "\\textsurd{}",

    // Ligatures
    "\u{fb01}" => "fi",
    "\u{fb02}" => "fl",

    // Dashes (an ASCII hyphen between spaces is a misused dash)
    " - " => " --- ",
    "\u{2010}" => "---",
    "\u{2011}" => "---",
    "\u{2012}" => "---",
    "\u{2013}" => "---",
    "\u{2014}" => "---",
    "\u{2015}" => "---",
};

lazy_static! {
    /// Alternation over every key of [`LATEX_ESCAPES`], longest key first
    pub static ref LATEX_ESCAPE_PATTERN: Regex = {
        let mut keys: Vec<&'static str> = LATEX_ESCAPES.keys().copied().collect();
        keys.sort_by(|a, b| b.chars().count().cmp(&a.chars().count()).then(a.cmp(b)));
        let alternation = keys
            .iter()
            .map(|k| regex::escape(k))
            .collect::<Vec<_>>()
            .join("|");
        Regex::new(&alternation).unwrap()
    };

    /// Characters that need a backslash inside `\url{}` / `\href{}`
    pub static ref URL_ESCAPE_PATTERN: Regex = Regex::new(r"([%#&])").unwrap();
}
