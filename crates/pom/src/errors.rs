//! Error types for the pom crate

use std::path::PathBuf;
use thiserror::Error;

/// Result type alias for document operations
pub type Result<T> = std::result::Result<T, PomError>;

#[derive(Error, Debug)]
pub enum PomError {
    /// IO operations failed
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// The XML reader rejected the input
    #[error("XML parse error at byte {position}: {message}")]
    Parse { position: u64, message: String },

    /// An attribute could not be decoded
    #[error("invalid attribute in element <{element}>: {message}")]
    Attribute { element: String, message: String },

    /// The XML writer failed while re-emitting the tree
    #[error("XML write error: {0}")]
    Write(String),

    /// Documents must be UTF-8 encoded text
    #[error("document is not valid UTF-8: {path:?}")]
    NotUtf8 { path: Option<PathBuf> },

    /// Parsed input contained no root element
    #[error("document has no root element")]
    NoRootElement,

    /// A close tag did not match any open element
    #[error("unbalanced close tag at byte {position}")]
    UnbalancedClose { position: u64 },

    /// The document was created in memory and cannot be saved in place
    #[error("document has no backing file")]
    NoBackingFile,
}
