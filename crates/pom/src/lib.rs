//! # pom
//!
//! Formatting-preserving model of Maven project descriptors.
//!
//! This crate provides:
//! - A mutable XML tree that round-trips whitespace, comments and
//!   self-closing elements byte for byte
//! - `PomDocument`, one descriptor file plus the indent unit, line
//!   terminator and dirty flag captured at load time
//! - Indentation-aware element insertion for edits that must blend into the
//!   surrounding document

pub mod document;
pub mod dom;
pub mod errors;

pub use document::PomDocument;
pub use dom::{XmlDeclaration, XmlDocument, XmlElement, XmlNode, add_indented_element};
pub use errors::{PomError, Result};
