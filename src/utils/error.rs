//! Error handling for wikitex conversions
//!
//! Every structural problem in the input is fatal for the whole document:
//! there is no partial output. Malformed attribute values (spans, styles)
//! never surface here, they are defaulted where they are read.

use std::fmt;

/// Conversion error type
#[derive(Debug, Clone, PartialEq)]
pub enum ConversionError {
    /// Unbalanced or misplaced markup
    Structural { message: String },
    /// A tag without a rendering rule
    UnsupportedTag {
        tag: String,
        /// Attribute dump, only filled in verbose mode
        attributes: Option<String>,
    },
    /// Invalid input (bad options, unreadable configuration)
    InvalidInput { message: String },
    /// IO error (for file operations)
    IoError { message: String },
}

impl fmt::Display for ConversionError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConversionError::Structural { message } => {
                write!(f, "Structural error: {}", message)
            }
            ConversionError::UnsupportedTag { tag, attributes } => {
                if let Some(attrs) = attributes {
                    write!(f, "Tag not supported: {} (attributes: {})", tag, attrs)
                } else {
                    write!(f, "Tag not supported: {}", tag)
                }
            }
            ConversionError::InvalidInput { message } => {
                write!(f, "Invalid input: {}", message)
            }
            ConversionError::IoError { message } => {
                write!(f, "IO error: {}", message)
            }
        }
    }
}

impl std::error::Error for ConversionError {}

impl From<std::io::Error> for ConversionError {
    fn from(err: std::io::Error) -> Self {
        ConversionError::IoError {
            message: err.to_string(),
        }
    }
}

/// Result type for conversion operations
pub type ConversionResult<T> = Result<T, ConversionError>;

// Convenience constructors for errors
impl ConversionError {
    pub fn structural(message: impl Into<String>) -> Self {
        ConversionError::Structural {
            message: message.into(),
        }
    }

    pub fn unsupported_tag(tag: impl Into<String>) -> Self {
        ConversionError::UnsupportedTag {
            tag: tag.into(),
            attributes: None,
        }
    }

    pub fn unsupported_tag_with_attributes(
        tag: impl Into<String>,
        attributes: impl Into<String>,
    ) -> Self {
        ConversionError::UnsupportedTag {
            tag: tag.into(),
            attributes: Some(attributes.into()),
        }
    }

    pub fn invalid(message: impl Into<String>) -> Self {
        ConversionError::InvalidInput {
            message: message.into(),
        }
    }

    /// Whether this error comes from the document itself (as opposed to
    /// options or IO).
    pub fn is_document_error(&self) -> bool {
        matches!(
            self,
            ConversionError::Structural { .. } | ConversionError::UnsupportedTag { .. }
        )
    }
}
