//! Paragraph element (w:p)

use crate::document::Run;
use crate::error::{Error, Result};
use crate::xml::{RawXmlElement, RawXmlNode};
use regex::Regex;
use std::collections::HashSet;
use std::sync::OnceLock;

/// Paragraph element (w:p)
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Paragraph {
    /// Attributes of `w:p` (paraId, textId, rsids), in document order
    pub attributes: Vec<(String, String)>,
    /// Paragraph properties (`w:pPr`), kept verbatim
    pub properties: Option<RawXmlElement>,
    /// Paragraph content (runs, hyperlinks, etc.)
    pub content: Vec<ParagraphContent>,
}

/// Content within a paragraph
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum ParagraphContent {
    /// Text run
    Run(Run),
    /// Hyperlink (w:hyperlink)
    Hyperlink(Hyperlink),
    /// Simple field (w:fldSimple)
    Field(SimpleField),
    /// Unknown node (preserved)
    Unknown(RawXmlNode),
}

/// Hyperlink element
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Hyperlink {
    /// Attributes (`r:id`, `w:anchor`, `w:history`, ...)
    pub attributes: Vec<(String, String)>,
    /// Content, usually runs
    pub content: Vec<ParagraphContent>,
}

/// Simple field element
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct SimpleField {
    /// Attributes, `w:instr` among them
    pub attributes: Vec<(String, String)>,
    /// Cached field result
    pub content: Vec<ParagraphContent>,
}

impl Paragraph {
    /// Create a new paragraph with a single run of text
    pub fn new(text: impl Into<String>) -> Self {
        Paragraph {
            content: vec![ParagraphContent::Run(Run::new(text))],
            ..Default::default()
        }
    }

    /// Parse a serialized `w:p` fragment
    pub fn from_xml(xml: &str) -> Result<Self> {
        let elem = RawXmlElement::parse(xml).map_err(|e| match e {
            Error::MalformedXml(msg) => Error::Validation(msg),
            other => other,
        })?;
        if elem.local_name() != "p" {
            return Err(Error::Validation(format!(
                "expected a w:p paragraph, found <{}>",
                elem.name
            )));
        }
        Ok(Self::from_element(&elem))
    }

    /// Build from a `w:p` element
    pub fn from_element(elem: &RawXmlElement) -> Self {
        let mut para = Paragraph {
            attributes: elem.attributes.clone(),
            ..Default::default()
        };

        for child in &elem.children {
            match child {
                RawXmlNode::Element(e) if e.local_name() == "pPr" => {
                    para.properties = Some(e.clone());
                }
                _ => para.content.push(ParagraphContent::from_node(child)),
            }
        }

        para
    }

    /// Convert back to a `w:p` element
    pub fn to_element(&self) -> RawXmlElement {
        let mut elem = RawXmlElement::new("w:p");
        elem.attributes = self.attributes.clone();

        if let Some(props) = &self.properties {
            elem.push_element(props.clone());
        }
        for content in &self.content {
            elem.insert_node(elem.children.len(), content.to_node());
        }

        elem
    }

    /// Serialize as a `w:p` fragment
    pub fn to_xml(&self) -> Result<String> {
        self.to_element().to_xml()
    }

    /// Get all text in this paragraph.
    ///
    /// Every `w:t` leaf is visited depth-first in document order, whatever
    /// wraps it, and the pieces are joined without separators.
    pub fn text(&self) -> String {
        let mut result = String::new();
        push_text(&self.content, &mut result);
        result
    }

    /// Replace the visible text.
    ///
    /// When the paragraph holds a hyperlink, the new content is a single
    /// hyperlink (same attributes) wrapping a single run styled like the
    /// hyperlink's first run. Otherwise it is a single run styled like the
    /// paragraph's first run. Paragraph attributes and properties stay.
    pub fn modify_text(&mut self, text: impl Into<String>) {
        let hyperlink = self.content.iter().find_map(|c| match c {
            ParagraphContent::Hyperlink(link) => Some(link),
            _ => None,
        });

        let replacement = match hyperlink {
            Some(link) => ParagraphContent::Hyperlink(Hyperlink {
                attributes: link.attributes.clone(),
                content: vec![ParagraphContent::Run(Run::styled_like(
                    link.runs().next(),
                    text,
                ))],
            }),
            None => ParagraphContent::Run(Run::styled_like(self.runs().next(), text)),
        };

        self.content = vec![replacement];
    }

    /// Direct runs of this paragraph
    pub fn runs(&self) -> impl Iterator<Item = &Run> {
        self.content.iter().filter_map(|c| match c {
            ParagraphContent::Run(r) => Some(r),
            _ => None,
        })
    }

    /// Hyperlinks of this paragraph
    pub fn hyperlinks(&self) -> impl Iterator<Item = &Hyperlink> {
        self.content.iter().filter_map(|c| match c {
            ParagraphContent::Hyperlink(h) => Some(h),
            _ => None,
        })
    }

    /// Add a run
    pub fn add_run(&mut self, run: Run) {
        self.content.push(ParagraphContent::Run(run));
    }

    /// Get attribute by qualified name
    pub fn attr(&self, name: &str) -> Option<&str> {
        self.attributes
            .iter()
            .find(|(k, _)| k == name)
            .map(|(_, v)| v.as_str())
    }

    /// Set attribute, replacing in place
    pub fn set_attr(&mut self, name: impl Into<String>, value: impl Into<String>) {
        let name = name.into();
        let value = value.into();
        match self.attributes.iter_mut().find(|(k, _)| *k == name) {
            Some(slot) => slot.1 = value,
            None => self.attributes.push((name, value)),
        }
    }

    /// Word 2010 paragraph id (`w14:paraId`)
    pub fn para_id(&self) -> Option<&str> {
        self.attr("w14:paraId")
    }

    /// Set the `w14:paraId`
    pub fn set_para_id(&mut self, id: impl Into<String>) {
        self.set_attr("w14:paraId", id);
    }

    /// Get style ID
    pub fn style(&self) -> Option<&str> {
        self.properties.as_ref()?.child("w:pStyle")?.attr("w:val")
    }

    /// Set paragraph style
    pub fn set_style(&mut self, style: impl Into<String>) {
        let props = self
            .properties
            .get_or_insert_with(|| RawXmlElement::new("w:pPr"));
        match props.child_mut("w:pStyle") {
            Some(p_style) => p_style.set_attr("w:val", style),
            // pStyle is the first child of pPr
            None => props.insert_node(
                0,
                RawXmlNode::Element(RawXmlElement::new("w:pStyle").with_attr("w:val", style)),
            ),
        }
    }

    /// Check if this is a heading paragraph
    pub fn is_heading(&self) -> bool {
        self.style().is_some_and(|s| s.starts_with("Heading"))
    }
}

impl Hyperlink {
    /// Relationship id of an external target
    pub fn r_id(&self) -> Option<&str> {
        find_attr(&self.attributes, "r:id")
    }

    /// Bookmark name of an internal target
    pub fn anchor(&self) -> Option<&str> {
        find_attr(&self.attributes, "w:anchor")
    }

    /// Runs inside the hyperlink
    pub fn runs(&self) -> impl Iterator<Item = &Run> {
        self.content.iter().filter_map(|c| match c {
            ParagraphContent::Run(r) => Some(r),
            _ => None,
        })
    }

    /// Get hyperlink text
    pub fn text(&self) -> String {
        let mut result = String::new();
        push_text(&self.content, &mut result);
        result
    }
}

impl SimpleField {
    /// Field instruction, e.g. ` PAGE `
    pub fn instruction(&self) -> Option<&str> {
        find_attr(&self.attributes, "w:instr")
    }
}

impl ParagraphContent {
    fn from_node(node: &RawXmlNode) -> Self {
        let RawXmlNode::Element(e) = node else {
            return ParagraphContent::Unknown(node.clone());
        };

        match e.local_name() {
            "r" => ParagraphContent::Run(Run::from_element(e)),
            "hyperlink" => ParagraphContent::Hyperlink(Hyperlink {
                attributes: e.attributes.clone(),
                content: e.children.iter().map(Self::from_node).collect(),
            }),
            "fldSimple" => ParagraphContent::Field(SimpleField {
                attributes: e.attributes.clone(),
                content: e.children.iter().map(Self::from_node).collect(),
            }),
            _ => ParagraphContent::Unknown(node.clone()),
        }
    }

    fn to_node(&self) -> RawXmlNode {
        match self {
            ParagraphContent::Run(run) => RawXmlNode::Element(run.to_element()),
            ParagraphContent::Hyperlink(link) => {
                RawXmlNode::Element(container("w:hyperlink", &link.attributes, &link.content))
            }
            ParagraphContent::Field(field) => {
                RawXmlNode::Element(container("w:fldSimple", &field.attributes, &field.content))
            }
            ParagraphContent::Unknown(node) => node.clone(),
        }
    }
}

fn container(
    name: &str,
    attributes: &[(String, String)],
    content: &[ParagraphContent],
) -> RawXmlElement {
    let mut elem = RawXmlElement::new(name);
    elem.attributes = attributes.to_vec();
    for item in content {
        elem.insert_node(elem.children.len(), item.to_node());
    }
    elem
}

fn push_text(content: &[ParagraphContent], out: &mut String) {
    for item in content {
        match item {
            ParagraphContent::Run(run) => run.push_text(out),
            ParagraphContent::Hyperlink(link) => push_text(&link.content, out),
            ParagraphContent::Field(field) => push_text(&field.content, out),
            ParagraphContent::Unknown(RawXmlNode::Element(e)) => e.collect_text("t", out),
            ParagraphContent::Unknown(_) => {}
        }
    }
}

fn find_attr<'a>(attributes: &'a [(String, String)], name: &str) -> Option<&'a str> {
    attributes
        .iter()
        .find(|(k, _)| k == name)
        .map(|(_, v)| v.as_str())
}

fn para_id_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| Regex::new(r#"w14:paraId="([^"]+)""#).expect("valid paraId pattern"))
}

/// Every `w14:paraId` value in a serialized fragment, in document order
pub fn extract_paragraph_ids(xml: &str) -> Vec<String> {
    para_id_pattern()
        .captures_iter(xml)
        .map(|caps| caps[1].to_string())
        .collect()
}

/// Next free paragraph id for a serialized body.
///
/// Ids are read as hexadecimal of at most eight digits; other values are
/// ignored. The result is one more than the largest id, as eight uppercase
/// hex digits, or `00000001` when the body carries none. Once `FFFFFFFF` is
/// taken the lowest unused id is returned instead.
pub fn generate_unique_paragraph_id(xml: &str) -> String {
    let ids: HashSet<u32> = extract_paragraph_ids(xml)
        .iter()
        .filter(|id| id.len() <= 8)
        .filter_map(|id| u32::from_str_radix(id, 16).ok())
        .collect();

    let next = match ids.iter().max() {
        None => 1,
        Some(max) => match max.checked_add(1) {
            Some(next) => next,
            None => (1..=u32::MAX).find(|id| !ids.contains(id)).unwrap_or(0),
        },
    };
    format!("{:08X}", next)
}
