//! Data layer - Static mappings and constants
//!
//! This module contains all static data used for HTML → LaTeX conversion:
//! - HTML 4 named entities
//! - LaTeX escape table
//! - Tag handler table and void elements

pub mod entities;
pub mod escapes;
pub mod html_tags;

// Re-export commonly used items
pub use entities::{lookup_entity, HTML_ENTITIES};
pub use escapes::{LATEX_ESCAPES, LATEX_ESCAPE_PATTERN, URL_ESCAPE_PATTERN};
pub use html_tags::{get_tag_handler, is_void_tag, SpecialTag, TagHandler, HTML_TAG_HANDLERS};
