//! Utility modules
//!
//! Error types and result types shared by every stage of the conversion.

pub mod error;

// Re-export commonly used items
pub use error::{ConversionError, ConversionResult};
