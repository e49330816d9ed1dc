//! Run element (w:r) - a contiguous run of text with uniform formatting

use crate::xml::{RawXmlElement, RawXmlNode};

/// Run element (w:r)
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Run {
    /// Attributes of `w:r` (rsid values and the like), in document order
    pub attributes: Vec<(String, String)>,
    /// Run properties (`w:rPr`), kept verbatim
    pub properties: Option<RawXmlElement>,
    /// Run content
    pub content: Vec<RunContent>,
}

/// Content within a run
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum RunContent {
    /// Text (w:t)
    Text(String),
    /// Tab (w:tab)
    Tab,
    /// Break (w:br)
    Break(BreakType),
    /// Carriage return (w:cr)
    CarriageReturn,
    /// Complex field character (w:fldChar)
    FieldChar(String),
    /// Field instruction (w:instrText)
    InstrText(String),
    /// Drawing (w:drawing), preserved
    Drawing(RawXmlElement),
    /// Anything else, preserved
    Unknown(RawXmlNode),
}

/// Break type
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub enum BreakType {
    #[default]
    TextWrapping,
    Page,
    Column,
}

impl Run {
    /// Create a new run with text
    pub fn new(text: impl Into<String>) -> Self {
        Run {
            content: vec![RunContent::Text(text.into())],
            ..Default::default()
        }
    }

    /// New run with `text`, copying attributes and properties from `template`
    pub fn styled_like(template: Option<&Run>, text: impl Into<String>) -> Self {
        let mut run = Run::new(text);
        if let Some(template) = template {
            run.attributes = template.attributes.clone();
            run.properties = template.properties.clone();
        }
        run
    }

    /// Build from a `w:r` element
    pub fn from_element(elem: &RawXmlElement) -> Self {
        let mut run = Run {
            attributes: elem.attributes.clone(),
            ..Default::default()
        };

        for child in &elem.children {
            let RawXmlNode::Element(e) = child else {
                run.content.push(RunContent::Unknown(child.clone()));
                continue;
            };

            match e.local_name() {
                "rPr" => run.properties = Some(e.clone()),
                "t" => run.content.push(RunContent::Text(own_text(e))),
                "tab" => run.content.push(RunContent::Tab),
                "br" => {
                    let break_type = match e.attr("w:type") {
                        Some("page") => BreakType::Page,
                        Some("column") => BreakType::Column,
                        _ => BreakType::TextWrapping,
                    };
                    run.content.push(RunContent::Break(break_type));
                }
                "cr" => run.content.push(RunContent::CarriageReturn),
                "fldChar" => run.content.push(RunContent::FieldChar(
                    e.attr("w:fldCharType").unwrap_or_default().to_string(),
                )),
                "instrText" => run.content.push(RunContent::InstrText(own_text(e))),
                "drawing" => run.content.push(RunContent::Drawing(e.clone())),
                _ => run.content.push(RunContent::Unknown(child.clone())),
            }
        }

        run
    }

    /// Convert back to a `w:r` element
    pub fn to_element(&self) -> RawXmlElement {
        let mut elem = RawXmlElement::new("w:r");
        elem.attributes = self.attributes.clone();

        if let Some(props) = &self.properties {
            elem.push_element(props.clone());
        }

        for content in &self.content {
            match content {
                RunContent::Text(text) => {
                    let mut t = RawXmlElement::new("w:t");
                    // Preserve space if text has leading/trailing whitespace
                    if text.starts_with(char::is_whitespace)
                        || text.ends_with(char::is_whitespace)
                        || text.contains("  ")
                    {
                        t.set_attr("xml:space", "preserve");
                    }
                    elem.push_element(t.with_text(text.as_str()));
                }
                RunContent::Tab => elem.push_element(RawXmlElement::new("w:tab")),
                RunContent::Break(break_type) => {
                    let br = RawXmlElement::new("w:br");
                    let br = match break_type {
                        BreakType::Page => br.with_attr("w:type", "page"),
                        BreakType::Column => br.with_attr("w:type", "column"),
                        BreakType::TextWrapping => br,
                    };
                    elem.push_element(br);
                }
                RunContent::CarriageReturn => elem.push_element(RawXmlElement::new("w:cr")),
                RunContent::FieldChar(kind) => elem.push_element(
                    RawXmlElement::new("w:fldChar").with_attr("w:fldCharType", kind.as_str()),
                ),
                RunContent::InstrText(instr) => elem.push_element(
                    RawXmlElement::new("w:instrText")
                        .with_attr("xml:space", "preserve")
                        .with_text(instr.as_str()),
                ),
                RunContent::Drawing(drawing) => elem.push_element(drawing.clone()),
                RunContent::Unknown(node) => {
                    elem.self_closing = false;
                    elem.children.push(node.clone());
                }
            }
        }

        elem
    }

    /// Concatenated `w:t` text of this run
    pub fn text(&self) -> String {
        let mut result = String::new();
        self.push_text(&mut result);
        result
    }

    pub(crate) fn push_text(&self, out: &mut String) {
        for content in &self.content {
            match content {
                RunContent::Text(t) => out.push_str(t),
                RunContent::Drawing(e) => e.collect_text("t", out),
                RunContent::Unknown(RawXmlNode::Element(e)) => e.collect_text("t", out),
                _ => {}
            }
        }
    }

    /// Whether the run carries a drawing
    pub fn has_drawing(&self) -> bool {
        self.content
            .iter()
            .any(|c| matches!(c, RunContent::Drawing(_)))
    }

    /// Check if bold
    pub fn bold(&self) -> bool {
        self.toggle_property("w:b")
    }

    /// Check if italic
    pub fn italic(&self) -> bool {
        self.toggle_property("w:i")
    }

    /// Character style id (`w:rStyle`)
    pub fn style(&self) -> Option<&str> {
        self.properties.as_ref()?.child("w:rStyle")?.attr("w:val")
    }

    /// Toggle properties are on when present, unless `w:val` says otherwise
    fn toggle_property(&self, name: &str) -> bool {
        let Some(prop) = self.properties.as_ref().and_then(|p| p.child(name)) else {
            return false;
        };
        !matches!(prop.attr("w:val"), Some("0" | "false" | "off"))
    }
}

fn own_text(elem: &RawXmlElement) -> String {
    elem.children
        .iter()
        .filter_map(|c| match c {
            RawXmlNode::Text(t) | RawXmlNode::CData(t) => Some(t.as_str()),
            _ => None,
        })
        .collect()
}
