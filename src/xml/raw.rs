//! Order-preserving XML tree used as the text <-> tree codec for every part

use quick_xml::events::{BytesCData, BytesDecl, BytesEnd, BytesStart, BytesText, Event};
use quick_xml::{Reader, Writer};
use std::io::BufRead;

use crate::error::{Error, Result};

/// A node of a parsed XML part
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum RawXmlNode {
    /// Element node
    Element(RawXmlElement),
    /// Text node (unescaped)
    Text(String),
    /// CDATA section
    CData(String),
    /// Comment node
    Comment(String),
}

/// XML element with attributes and children, kept in document order
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct RawXmlElement {
    /// Full element name (with prefix, e.g., "w:sectPr")
    pub name: String,
    /// Attributes as (name, value) pairs, unescaped
    pub attributes: Vec<(String, String)>,
    /// Child nodes
    pub children: Vec<RawXmlNode>,
    /// Whether this was a self-closing element
    pub self_closing: bool,
}

impl RawXmlElement {
    /// Create a new empty element
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            attributes: Vec::new(),
            children: Vec::new(),
            self_closing: true,
        }
    }

    /// Parse the root element of an XML text.
    ///
    /// Declarations, processing instructions and comments before the root are
    /// skipped. Text without any element is reported as [`Error::MalformedXml`].
    pub fn parse(xml: &str) -> Result<Self> {
        let mut reader = Reader::from_str(xml);
        reader.config_mut().trim_text(false);

        let mut buf = Vec::new();
        loop {
            match reader.read_event_into(&mut buf)? {
                Event::Start(e) => return Self::from_reader(&mut reader, &e),
                Event::Empty(e) => return Self::from_empty(&e),
                Event::Eof => {
                    return Err(Error::MalformedXml("no root element found".into()));
                }
                _ => {}
            }
            buf.clear();
        }
    }

    /// Read a complete element from XML reader (starting after the start tag was read)
    pub fn from_reader<R: BufRead>(reader: &mut Reader<R>, start: &BytesStart) -> Result<Self> {
        let name = String::from_utf8_lossy(start.name().as_ref()).to_string();
        let attributes = read_attributes(start)?;
        let keep_whitespace = is_text_bearing(&name);

        let mut children = Vec::new();
        let mut buf = Vec::new();

        loop {
            match reader.read_event_into(&mut buf)? {
                Event::Start(e) => {
                    let child = Self::from_reader(reader, &e)?;
                    children.push(RawXmlNode::Element(child));
                }
                Event::Empty(e) => {
                    children.push(RawXmlNode::Element(Self::from_empty(&e)?));
                }
                Event::Text(t) => {
                    let text = t.unescape()?.to_string();
                    // Indentation between elements is layout, not content
                    if !text.is_empty() && (keep_whitespace || !text.trim().is_empty()) {
                        children.push(RawXmlNode::Text(text));
                    }
                }
                Event::CData(c) => {
                    let text = String::from_utf8_lossy(&c.into_inner()).to_string();
                    children.push(RawXmlNode::CData(text));
                }
                Event::Comment(c) => {
                    children.push(RawXmlNode::Comment(String::from_utf8_lossy(&c).to_string()));
                }
                Event::End(e) => {
                    let end_name = String::from_utf8_lossy(e.name().as_ref()).to_string();
                    if end_name == name {
                        break;
                    }
                }
                Event::Eof => {
                    return Err(Error::MalformedXml(format!(
                        "unexpected end of input inside <{}>",
                        name
                    )))
                }
                _ => {}
            }
            buf.clear();
        }

        Ok(Self {
            name,
            attributes,
            children,
            self_closing: false,
        })
    }

    /// Create from empty element tag
    pub fn from_empty(e: &BytesStart) -> Result<Self> {
        Ok(Self {
            name: String::from_utf8_lossy(e.name().as_ref()).to_string(),
            attributes: read_attributes(e)?,
            children: Vec::new(),
            self_closing: true,
        })
    }

    /// Write element to XML writer
    pub fn write_to<W: std::io::Write>(&self, writer: &mut Writer<W>) -> Result<()> {
        let mut start = BytesStart::new(self.name.as_str());
        for (key, value) in &self.attributes {
            start.push_attribute((key.as_str(), value.as_str()));
        }

        if self.children.is_empty() && self.self_closing {
            writer.write_event(Event::Empty(start))?;
        } else {
            writer.write_event(Event::Start(start))?;
            for child in &self.children {
                child.write_to(writer)?;
            }
            writer.write_event(Event::End(BytesEnd::new(self.name.as_str())))?;
        }

        Ok(())
    }

    /// Serialize as a fragment (no XML declaration)
    pub fn to_xml(&self) -> Result<String> {
        let mut writer = Writer::new(Vec::new());
        self.write_to(&mut writer)?;
        into_string(writer.into_inner())
    }

    /// Serialize as a standalone part with the standard OOXML declaration
    pub fn to_document_xml(&self) -> Result<String> {
        let mut writer = Writer::new(Vec::new());
        writer.write_event(Event::Decl(BytesDecl::new("1.0", Some("UTF-8"), Some("yes"))))?;
        writer.write_event(Event::Text(BytesText::from_escaped("\n")))?;
        self.write_to(&mut writer)?;
        into_string(writer.into_inner())
    }

    /// Name without namespace prefix
    pub fn local_name(&self) -> &str {
        local_name(&self.name)
    }

    /// Get an attribute value by its qualified name
    pub fn attr(&self, name: &str) -> Option<&str> {
        self.attributes
            .iter()
            .find(|(k, _)| k == name)
            .map(|(_, v)| v.as_str())
    }

    /// Set an attribute, replacing an existing value in place
    pub fn set_attr(&mut self, name: impl Into<String>, value: impl Into<String>) {
        let name = name.into();
        let value = value.into();
        match self.attributes.iter_mut().find(|(k, _)| *k == name) {
            Some(slot) => slot.1 = value,
            None => self.attributes.push((name, value)),
        }
    }

    /// Remove an attribute, returning its previous value
    pub fn remove_attr(&mut self, name: &str) -> Option<String> {
        let pos = self.attributes.iter().position(|(k, _)| k == name)?;
        Some(self.attributes.remove(pos).1)
    }

    /// Iterate over child elements
    pub fn elements(&self) -> impl Iterator<Item = &RawXmlElement> {
        self.children.iter().filter_map(RawXmlNode::as_element)
    }

    /// Iterate over child elements mutably
    pub fn elements_mut(&mut self) -> impl Iterator<Item = &mut RawXmlElement> {
        self.children.iter_mut().filter_map(|c| match c {
            RawXmlNode::Element(e) => Some(e),
            _ => None,
        })
    }

    /// First child element with the given qualified name
    pub fn child(&self, name: &str) -> Option<&RawXmlElement> {
        self.elements().find(|e| e.name == name)
    }

    /// First child element with the given qualified name, mutably
    pub fn child_mut(&mut self, name: &str) -> Option<&mut RawXmlElement> {
        self.elements_mut().find(|e| e.name == name)
    }

    /// All child elements with the given qualified name
    pub fn children_named<'a>(&'a self, name: &'a str) -> impl Iterator<Item = &'a RawXmlElement> {
        self.elements().filter(move |e| e.name == name)
    }

    /// Index in `children` of the first element with the given name
    pub fn position_of(&self, name: &str) -> Option<usize> {
        self.children
            .iter()
            .position(|c| c.as_element().is_some_and(|e| e.name == name))
    }

    /// Append a child element
    pub fn push_element(&mut self, child: RawXmlElement) {
        self.self_closing = false;
        self.children.push(RawXmlNode::Element(child));
    }

    /// Insert a child node at `index` in `children`
    pub fn insert_node(&mut self, index: usize, node: RawXmlNode) {
        self.self_closing = false;
        self.children.insert(index, node);
    }

    /// Concatenation of every text node found under elements with the given
    /// local name, depth-first in document order
    pub fn collect_text(&self, leaf_local_name: &str, out: &mut String) {
        for child in &self.children {
            if let RawXmlNode::Element(e) = child {
                if e.local_name() == leaf_local_name {
                    e.push_own_text(out);
                } else {
                    e.collect_text(leaf_local_name, out);
                }
            }
        }
    }

    fn push_own_text(&self, out: &mut String) {
        for child in &self.children {
            match child {
                RawXmlNode::Text(t) | RawXmlNode::CData(t) => out.push_str(t),
                _ => {}
            }
        }
    }

    /// Add an attribute
    pub fn with_attr(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.attributes.push((name.into(), value.into()));
        self
    }

    /// Add a child element
    pub fn with_child(mut self, child: RawXmlElement) -> Self {
        self.push_element(child);
        self
    }

    /// Add a text child
    pub fn with_text(mut self, text: impl Into<String>) -> Self {
        self.self_closing = false;
        self.children.push(RawXmlNode::Text(text.into()));
        self
    }
}

impl RawXmlNode {
    /// The element inside this node, if it is one
    pub fn as_element(&self) -> Option<&RawXmlElement> {
        match self {
            RawXmlNode::Element(e) => Some(e),
            _ => None,
        }
    }

    /// Write node to XML writer
    pub fn write_to<W: std::io::Write>(&self, writer: &mut Writer<W>) -> Result<()> {
        match self {
            RawXmlNode::Element(e) => e.write_to(writer),
            RawXmlNode::Text(t) => {
                writer.write_event(Event::Text(BytesText::new(t)))?;
                Ok(())
            }
            RawXmlNode::CData(t) => {
                writer.write_event(Event::CData(BytesCData::new(t.as_str())))?;
                Ok(())
            }
            RawXmlNode::Comment(c) => {
                writer.write_event(Event::Comment(BytesText::from_escaped(c.as_str())))?;
                Ok(())
            }
        }
    }
}

/// Strip the namespace prefix from a qualified name
pub fn local_name(name: &str) -> &str {
    name.rsplit_once(':').map(|(_, local)| local).unwrap_or(name)
}

fn is_text_bearing(name: &str) -> bool {
    matches!(local_name(name), "t" | "delText" | "instrText" | "delInstrText")
}

fn read_attributes(element: &BytesStart) -> Result<Vec<(String, String)>> {
    let mut attributes = Vec::new();
    for attr in element.attributes() {
        let attr = attr?;
        attributes.push((
            String::from_utf8_lossy(attr.key.as_ref()).to_string(),
            attr.unescape_value()?.to_string(),
        ));
    }
    Ok(attributes)
}

fn into_string(bytes: Vec<u8>) -> Result<String> {
    String::from_utf8(bytes).map_err(|e| Error::MalformedXml(e.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_skips_declaration() {
        let xml = r#"<?xml version="1.0" encoding="UTF-8"?>
<w:custom foo="bar"><w:child>text</w:child></w:custom>"#;
        let elem = RawXmlElement::parse(xml).unwrap();

        assert_eq!(elem.name, "w:custom");
        assert_eq!(elem.local_name(), "custom");
        assert_eq!(elem.attr("foo"), Some("bar"));
        assert_eq!(elem.children.len(), 1);
    }

    #[test]
    fn test_parse_without_root() {
        let err = RawXmlElement::parse("<?xml version=\"1.0\"?>").unwrap_err();
        assert!(matches!(err, Error::MalformedXml(_)));
    }

    #[test]
    fn test_whitespace_kept_only_in_text_leaves() {
        let xml = "<w:r>\n  <w:t xml:space=\"preserve\"> World</w:t>\n</w:r>";
        let elem = RawXmlElement::parse(xml).unwrap();

        assert_eq!(elem.children.len(), 1);
        let mut text = String::new();
        elem.collect_text("t", &mut text);
        assert_eq!(text, " World");
    }

    #[test]
    fn test_escaped_content_roundtrip() {
        let xml = r#"<w:t a="x &amp; y">1 &lt; 2</w:t>"#;
        let elem = RawXmlElement::parse(xml).unwrap();
        assert_eq!(elem.attr("a"), Some("x & y"));
        assert_eq!(elem.children, vec![RawXmlNode::Text("1 < 2".into())]);

        let out = elem.to_xml().unwrap();
        assert_eq!(RawXmlElement::parse(&out).unwrap(), elem);
    }

    #[test]
    fn test_set_attr_replaces_in_place() {
        let mut elem = RawXmlElement::new("w:p").with_attr("a", "1").with_attr("b", "2");
        elem.set_attr("a", "3");
        elem.set_attr("c", "4");

        assert_eq!(
            elem.attributes,
            vec![
                ("a".to_string(), "3".to_string()),
                ("b".to_string(), "2".to_string()),
                ("c".to_string(), "4".to_string()),
            ]
        );
        assert_eq!(elem.remove_attr("b"), Some("2".into()));
        assert_eq!(elem.attr("b"), None);
    }

    #[test]
    fn test_document_xml_has_declaration() {
        let elem = RawXmlElement::new("Types");
        let xml = elem.to_document_xml().unwrap();
        assert!(xml.starts_with("<?xml version=\"1.0\" encoding=\"UTF-8\" standalone=\"yes\"?>"));
        assert!(xml.ends_with("<Types/>"));
    }
}
