//! One descriptor document plus the formatting metadata captured at load time.

use std::fs;
use std::path::{Path, PathBuf};

use crate::dom::{self, XmlDocument, XmlElement};
use crate::errors::{PomError, Result};

/// A parsed descriptor document. Holds the tree, the originating location,
/// the indent unit and line terminator detected at load time, and a dirty
/// flag that is set whenever a mutation actually changed a value.
#[derive(Debug, Clone)]
pub struct PomDocument {
    document: XmlDocument,
    path: Option<PathBuf>,
    original_bytes: Vec<u8>,
    indent: String,
    endl: String,
    dirty: bool,
}

impl PomDocument {
    pub fn load(path: &Path) -> Result<Self> {
        let bytes = fs::read(path)?;
        Self::from_bytes(bytes, Some(path.to_path_buf()))
    }

    pub fn from_bytes(bytes: Vec<u8>, path: Option<PathBuf>) -> Result<Self> {
        let text = std::str::from_utf8(&bytes)
            .map_err(|_| PomError::NotUtf8 { path: path.clone() })?;
        let endl = detect_endl(text);
        let indent = detect_indent(text);
        let document = dom::parse(text)?;
        Ok(Self {
            document,
            path,
            original_bytes: bytes,
            indent,
            endl,
            dirty: false,
        })
    }

    pub fn from_str(text: &str) -> Result<Self> {
        Self::from_bytes(text.as_bytes().to_vec(), None)
    }

    pub fn path(&self) -> Option<&Path> {
        self.path.as_deref()
    }

    pub fn root(&self) -> &XmlElement {
        &self.document.root
    }

    /// Mutable access to the tree. Callers are responsible for marking the
    /// document dirty when a value actually changed.
    pub fn root_mut(&mut self) -> &mut XmlElement {
        &mut self.document.root
    }

    pub fn indent(&self) -> &str {
        &self.indent
    }

    pub fn endl(&self) -> &str {
        &self.endl
    }

    pub fn dirty(&self) -> bool {
        self.dirty
    }

    pub fn set_dirty(&mut self, dirty: bool) {
        self.dirty = dirty;
    }

    pub fn original_bytes(&self) -> &[u8] {
        &self.original_bytes
    }

    /// Declared artifact identifier of this document, if any.
    pub fn artifact_id(&self) -> Option<String> {
        self.root()
            .child_element("artifactId")
            .map(|el| el.text_trim())
    }

    pub fn serialize(&self) -> Result<Vec<u8>> {
        dom::serialize(&self.document)
    }

    pub fn serialize_to_string(&self) -> Result<String> {
        Ok(String::from_utf8_lossy(&self.serialize()?).into_owned())
    }

    /// Write the current tree back to the originating file.
    pub fn save(&self) -> Result<()> {
        let path = self.path.as_deref().ok_or(PomError::NoBackingFile)?;
        fs::write(path, self.serialize()?)?;
        Ok(())
    }
}

fn detect_endl(text: &str) -> String {
    if text.contains("\r\n") {
        "\r\n".to_string()
    } else {
        "\n".to_string()
    }
}

fn detect_indent(text: &str) -> String {
    for line in text.lines().skip(1) {
        let trimmed = line.trim_start();
        if trimmed.starts_with('<') && trimmed.len() < line.len() {
            return line[..line.len() - trimmed.len()].to_string();
        }
    }
    "  ".to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    const SAMPLE: &str = "<?xml version=\"1.0\" encoding=\"UTF-8\"?>\n\
<project>\n    <artifactId>sample</artifactId>\n</project>\n";

    #[test]
    fn test_detects_four_space_indent() {
        let document = PomDocument::from_str(SAMPLE).unwrap();
        assert_eq!(document.indent(), "    ");
        assert_eq!(document.endl(), "\n");
    }

    #[test]
    fn test_detects_tab_indent_and_crlf() {
        let text = "<project>\r\n\t<artifactId>sample</artifactId>\r\n</project>\r\n";
        let document = PomDocument::from_str(text).unwrap();
        assert_eq!(document.indent(), "\t");
        assert_eq!(document.endl(), "\r\n");
        assert_eq!(document.serialize_to_string().unwrap(), text);
    }

    #[test]
    fn test_defaults_when_document_is_flat() {
        let document = PomDocument::from_str("<project><a>1</a></project>").unwrap();
        assert_eq!(document.indent(), "  ");
        assert_eq!(document.endl(), "\n");
    }

    #[test]
    fn test_loads_clean() {
        let document = PomDocument::from_str(SAMPLE).unwrap();
        assert!(!document.dirty());
        assert_eq!(document.artifact_id().as_deref(), Some("sample"));
        assert!(document.path().is_none());
    }

    #[test]
    fn test_save_round_trip() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("pom.xml");
        std::fs::write(&path, SAMPLE).unwrap();

        let mut document = PomDocument::load(&path).unwrap();
        document
            .root_mut()
            .child_element_mut("artifactId")
            .unwrap()
            .set_text("renamed");
        document.set_dirty(true);
        document.save().unwrap();

        let written = std::fs::read_to_string(&path).unwrap();
        assert!(written.contains("<artifactId>renamed</artifactId>"));
    }

    #[test]
    fn test_non_utf8_is_rejected() {
        let result = PomDocument::from_bytes(vec![0xff, 0xfe, 0x00], None);
        assert!(matches!(result, Err(PomError::NotUtf8 { .. })));
    }
}
