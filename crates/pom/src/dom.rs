//! A small mutable XML tree that keeps every byte of the original document:
//! whitespace text nodes, comments, CDATA sections, self-closing elements and
//! the XML declaration all round-trip through parse/serialize, so an edited
//! descriptor only differs where it was actually changed.

use quick_xml::Reader;
use quick_xml::Writer;
use quick_xml::events::{BytesCData, BytesDecl, BytesEnd, BytesPI, BytesStart, BytesText, Event};

use crate::errors::{PomError, Result};

/// One node of the document tree. Text is stored unescaped.
#[derive(Debug, Clone, PartialEq)]
pub enum XmlNode {
    Element(XmlElement),
    Text(String),
    CData(String),
    Comment(String),
    ProcessingInstruction(String),
    DocType(String),
}

/// An element with its attributes and children in document order.
#[derive(Debug, Clone, PartialEq)]
pub struct XmlElement {
    pub name: String,
    pub attributes: Vec<(String, String)>,
    pub children: Vec<XmlNode>,
    /// Whether the element was written as `<name/>` in the source.
    pub self_closing: bool,
}

/// The `<?xml ...?>` declaration, reconstructed on write.
#[derive(Debug, Clone, PartialEq)]
pub struct XmlDeclaration {
    pub version: String,
    pub encoding: Option<String>,
    pub standalone: Option<String>,
}

/// A parsed document: declaration, leading misc nodes, the root element and
/// trailing misc nodes.
#[derive(Debug, Clone, PartialEq)]
pub struct XmlDocument {
    pub declaration: Option<XmlDeclaration>,
    pub prolog: Vec<XmlNode>,
    pub root: XmlElement,
    pub epilog: Vec<XmlNode>,
}

impl XmlElement {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            attributes: Vec::new(),
            children: Vec::new(),
            self_closing: false,
        }
    }

    /// First child element with the given name.
    pub fn child_element(&self, name: &str) -> Option<&XmlElement> {
        self.child_elements(name).next()
    }

    pub fn child_element_mut(&mut self, name: &str) -> Option<&mut XmlElement> {
        self.children.iter_mut().find_map(|node| match node {
            XmlNode::Element(el) if el.name == name => Some(el),
            _ => None,
        })
    }

    /// All child elements with the given name, in document order.
    pub fn child_elements<'s>(&'s self, name: &str) -> impl Iterator<Item = &'s XmlElement> {
        self.children.iter().filter_map(move |node| match node {
            XmlNode::Element(el) if el.name == name => Some(el),
            _ => None,
        })
    }

    /// All child elements regardless of name.
    pub fn elements(&self) -> impl Iterator<Item = &XmlElement> {
        self.children.iter().filter_map(|node| match node {
            XmlNode::Element(el) => Some(el),
            _ => None,
        })
    }

    pub fn attribute(&self, name: &str) -> Option<&str> {
        self.attributes
            .iter()
            .find(|(key, _)| key == name)
            .map(|(_, value)| value.as_str())
    }

    /// Concatenated character content of direct text and CDATA children.
    pub fn text(&self) -> String {
        let mut out = String::new();
        for child in &self.children {
            match child {
                XmlNode::Text(t) | XmlNode::CData(t) => out.push_str(t),
                _ => {}
            }
        }
        out
    }

    pub fn text_trim(&self) -> String {
        self.text().trim().to_string()
    }

    /// Replace the element's content with a single text node.
    pub fn set_text(&mut self, text: impl Into<String>) {
        self.children.clear();
        self.children.push(XmlNode::Text(text.into()));
        self.self_closing = false;
    }

    pub fn add_child(&mut self, node: XmlNode) {
        self.children.push(node);
        self.self_closing = false;
    }

    /// Append a new child element without any whitespace handling.
    pub fn add_element(&mut self, name: impl Into<String>) -> &mut XmlElement {
        self.children.push(XmlNode::Element(XmlElement::new(name)));
        self.self_closing = false;
        match self.children.last_mut() {
            Some(XmlNode::Element(el)) => el,
            _ => unreachable!("element was just appended"),
        }
    }
}

/// Append a child element surrounded by whitespace text nodes matching the
/// document's indent unit and line terminator. `depth` is the nesting depth of
/// `parent` (the root element is depth 0). A single trailing whitespace-only
/// text node of `parent` is removed first so repeated insertions do not
/// accumulate blank lines.
pub fn add_indented_element<'a>(
    parent: &'a mut XmlElement,
    depth: usize,
    indent: &str,
    endl: &str,
    name: &str,
) -> &'a mut XmlElement {
    let prefix = format!("{endl}{}", indent.repeat(depth + 1));
    let suffix = format!("{endl}{}", indent.repeat(depth));

    if let Some(XmlNode::Text(last)) = parent.children.last() {
        if last.trim().is_empty() {
            parent.children.pop();
        }
    }

    parent.children.push(XmlNode::Text(prefix));
    parent.children.push(XmlNode::Element(XmlElement::new(name)));
    let index = parent.children.len() - 1;
    parent.children.push(XmlNode::Text(suffix));
    parent.self_closing = false;

    match &mut parent.children[index] {
        XmlNode::Element(el) => el,
        _ => unreachable!("element was just appended"),
    }
}

/// Parse a complete document.
pub fn parse(input: &str) -> Result<XmlDocument> {
    let mut reader = Reader::from_str(input);

    let mut declaration: Option<XmlDeclaration> = None;
    let mut prolog: Vec<XmlNode> = Vec::new();
    let mut root: Option<XmlElement> = None;
    let mut epilog: Vec<XmlNode> = Vec::new();
    let mut stack: Vec<XmlElement> = Vec::new();

    loop {
        let position = reader.buffer_position() as u64;
        let event = reader.read_event().map_err(|e| PomError::Parse {
            position,
            message: e.to_string(),
        })?;

        match event {
            Event::Decl(decl) => {
                let version = decl
                    .version()
                    .map(|v| String::from_utf8_lossy(&v).into_owned())
                    .unwrap_or_else(|_| "1.0".to_string());
                let encoding = match decl.encoding() {
                    Some(Ok(e)) => Some(String::from_utf8_lossy(&e).into_owned()),
                    _ => None,
                };
                let standalone = match decl.standalone() {
                    Some(Ok(s)) => Some(String::from_utf8_lossy(&s).into_owned()),
                    _ => None,
                };
                declaration = Some(XmlDeclaration {
                    version,
                    encoding,
                    standalone,
                });
            }
            Event::Start(start) => {
                stack.push(element_from_start(&start)?);
            }
            Event::Empty(start) => {
                let mut element = element_from_start(&start)?;
                element.self_closing = true;
                place_node(
                    XmlNode::Element(element),
                    &mut stack,
                    &mut prolog,
                    &mut root,
                    &mut epilog,
                );
            }
            Event::End(_) => {
                let element = stack
                    .pop()
                    .ok_or(PomError::UnbalancedClose { position })?;
                place_node(
                    XmlNode::Element(element),
                    &mut stack,
                    &mut prolog,
                    &mut root,
                    &mut epilog,
                );
            }
            Event::Text(text) => {
                let content = String::from_utf8_lossy(&text).into_owned();
                place_text(content, &mut stack, &mut prolog, &mut root, &mut epilog);
            }
            Event::GeneralRef(reference) => {
                let raw = String::from_utf8_lossy(&reference).into_owned();
                place_text(
                    resolve_general_ref(&raw),
                    &mut stack,
                    &mut prolog,
                    &mut root,
                    &mut epilog,
                );
            }
            Event::CData(cdata) => {
                let content = String::from_utf8_lossy(&cdata).into_owned();
                place_node(
                    XmlNode::CData(content),
                    &mut stack,
                    &mut prolog,
                    &mut root,
                    &mut epilog,
                );
            }
            Event::Comment(comment) => {
                let content = String::from_utf8_lossy(&comment).into_owned();
                place_node(
                    XmlNode::Comment(content),
                    &mut stack,
                    &mut prolog,
                    &mut root,
                    &mut epilog,
                );
            }
            Event::PI(pi) => {
                let target = String::from_utf8_lossy(pi.target()).into_owned();
                let content = String::from_utf8_lossy(pi.content()).into_owned();
                let combined = if content.is_empty() {
                    target
                } else {
                    format!("{target} {content}")
                };
                place_node(
                    XmlNode::ProcessingInstruction(combined),
                    &mut stack,
                    &mut prolog,
                    &mut root,
                    &mut epilog,
                );
            }
            Event::DocType(doctype) => {
                let content = String::from_utf8_lossy(&doctype).into_owned();
                place_node(
                    XmlNode::DocType(content),
                    &mut stack,
                    &mut prolog,
                    &mut root,
                    &mut epilog,
                );
            }
            Event::Eof => break,
        }
    }

    let root = root.ok_or(PomError::NoRootElement)?;
    Ok(XmlDocument {
        declaration,
        prolog,
        root,
        epilog,
    })
}

/// Re-emit a document as bytes.
pub fn serialize(document: &XmlDocument) -> Result<Vec<u8>> {
    let mut writer = Writer::new(Vec::new());

    if let Some(decl) = &document.declaration {
        writer
            .write_event(Event::Decl(BytesDecl::new(
                &decl.version,
                decl.encoding.as_deref(),
                decl.standalone.as_deref(),
            )))
            .map_err(write_error)?;
    }
    for node in &document.prolog {
        write_node(&mut writer, node)?;
    }
    write_element(&mut writer, &document.root)?;
    for node in &document.epilog {
        write_node(&mut writer, node)?;
    }

    Ok(writer.into_inner())
}

fn element_from_start(start: &BytesStart<'_>) -> Result<XmlElement> {
    let name = String::from_utf8_lossy(start.name().as_ref()).into_owned();
    let mut attributes = Vec::new();
    for attribute in start.attributes() {
        let attribute = attribute.map_err(|e| PomError::Attribute {
            element: name.clone(),
            message: e.to_string(),
        })?;
        let key = String::from_utf8_lossy(attribute.key.as_ref()).into_owned();
        let value = attribute
            .unescape_value()
            .map_err(|e| PomError::Attribute {
                element: name.clone(),
                message: e.to_string(),
            })?
            .into_owned();
        attributes.push((key, value));
    }
    Ok(XmlElement {
        name,
        attributes,
        children: Vec::new(),
        self_closing: false,
    })
}

fn place_node(
    node: XmlNode,
    stack: &mut Vec<XmlElement>,
    prolog: &mut Vec<XmlNode>,
    root: &mut Option<XmlElement>,
    epilog: &mut Vec<XmlNode>,
) {
    if let Some(parent) = stack.last_mut() {
        parent.children.push(node);
        return;
    }
    if root.is_none() {
        if let XmlNode::Element(element) = node {
            *root = Some(element);
        } else {
            prolog.push(node);
        }
    } else {
        epilog.push(node);
    }
}

fn place_text(
    text: String,
    stack: &mut Vec<XmlElement>,
    prolog: &mut Vec<XmlNode>,
    root: &mut Option<XmlElement>,
    epilog: &mut Vec<XmlNode>,
) {
    if let Some(parent) = stack.last_mut() {
        if let Some(XmlNode::Text(last)) = parent.children.last_mut() {
            last.push_str(&text);
        } else {
            parent.children.push(XmlNode::Text(text));
        }
        return;
    }
    if root.is_none() {
        prolog.push(XmlNode::Text(text));
    } else {
        epilog.push(XmlNode::Text(text));
    }
}

fn resolve_general_ref(raw: &str) -> String {
    match raw {
        "amp" => "&".to_string(),
        "lt" => "<".to_string(),
        "gt" => ">".to_string(),
        "apos" => "'".to_string(),
        "quot" => "\"".to_string(),
        _ => {
            let code = if let Some(hex) = raw.strip_prefix("#x").or_else(|| raw.strip_prefix("#X"))
            {
                u32::from_str_radix(hex, 16).ok()
            } else if let Some(dec) = raw.strip_prefix('#') {
                dec.parse::<u32>().ok()
            } else {
                None
            };
            match code.and_then(char::from_u32) {
                Some(ch) => ch.to_string(),
                None => format!("&{raw};"),
            }
        }
    }
}

fn write_element(writer: &mut Writer<Vec<u8>>, element: &XmlElement) -> Result<()> {
    let mut start = BytesStart::new(element.name.as_str());
    for (key, value) in &element.attributes {
        start.push_attribute((key.as_str(), value.as_str()));
    }

    if element.children.is_empty() && element.self_closing {
        writer.write_event(Event::Empty(start)).map_err(write_error)?;
        return Ok(());
    }

    writer.write_event(Event::Start(start)).map_err(write_error)?;
    for child in &element.children {
        write_node(writer, child)?;
    }
    writer
        .write_event(Event::End(BytesEnd::new(element.name.as_str())))
        .map_err(write_error)?;
    Ok(())
}

fn write_node(writer: &mut Writer<Vec<u8>>, node: &XmlNode) -> Result<()> {
    match node {
        XmlNode::Element(element) => write_element(writer, element)?,
        XmlNode::Text(text) => writer
            .write_event(Event::Text(BytesText::new(text)))
            .map_err(write_error)?,
        XmlNode::CData(text) => writer
            .write_event(Event::CData(BytesCData::new(text.as_str())))
            .map_err(write_error)?,
        XmlNode::Comment(text) => writer
            .write_event(Event::Comment(BytesText::from_escaped(text.as_str())))
            .map_err(write_error)?,
        XmlNode::ProcessingInstruction(content) => writer
            .write_event(Event::PI(BytesPI::new(content.as_str())))
            .map_err(write_error)?,
        XmlNode::DocType(content) => writer
            .write_event(Event::DocType(BytesText::from_escaped(content.as_str())))
            .map_err(write_error)?,
    }
    Ok(())
}

fn write_error<E: std::fmt::Display>(error: E) -> PomError {
    PomError::Write(error.to_string())
}
