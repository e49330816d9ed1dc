//! Section properties (w:sectPr) and their header/footer references

use std::fmt;
use std::str::FromStr;

use crate::error::{Error, Result};
use crate::xml::{RawXmlElement, RawXmlNode};

/// Which pages a header or footer reference applies to (`w:type`)
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum ReferenceKind {
    #[default]
    Default,
    Even,
    First,
}

impl ReferenceKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            ReferenceKind::Default => "default",
            ReferenceKind::Even => "even",
            ReferenceKind::First => "first",
        }
    }
}

impl fmt::Display for ReferenceKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ReferenceKind {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "default" => Ok(ReferenceKind::Default),
            "even" => Ok(ReferenceKind::Even),
            "first" => Ok(ReferenceKind::First),
            other => Err(Error::Validation(format!(
                "unknown header/footer reference type: {}",
                other
            ))),
        }
    }
}

/// A `w:headerReference` or `w:footerReference`
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SectionReference {
    /// Relationship id (`r:id`)
    pub rel_id: String,
    /// Page selector; a missing `w:type` reads as default
    pub kind: ReferenceKind,
}

/// Final section properties of `body`, created as its last child if absent
pub fn ensure_section_properties(body: &mut RawXmlElement) -> Result<&mut RawXmlElement> {
    if body.position_of("w:sectPr").is_none() {
        body.push_element(RawXmlElement::new("w:sectPr"));
    }
    body.child_mut("w:sectPr")
        .ok_or_else(|| Error::MalformedXml("w:sectPr could not be created".into()))
}

/// Add a reference element (`w:headerReference`/`w:footerReference`).
///
/// References lead the section properties, so the new one goes right after
/// the last existing header or footer reference.
pub fn add_reference(
    sect_pr: &mut RawXmlElement,
    element_name: &str,
    rel_id: &str,
    kind: ReferenceKind,
) {
    let slot = sect_pr
        .children
        .iter()
        .rposition(|c| c.as_element().is_some_and(is_reference))
        .map(|i| i + 1)
        .unwrap_or(0);

    let reference = RawXmlElement::new(element_name)
        .with_attr("w:type", kind.as_str())
        .with_attr("r:id", rel_id);
    sect_pr.insert_node(slot, RawXmlNode::Element(reference));
}

/// Every section-properties element under `body`: paragraph-level ones
/// first, then the final body-level one
pub fn all_section_properties(body: &RawXmlElement) -> Vec<&RawXmlElement> {
    let mut found: Vec<&RawXmlElement> = body
        .children_named("w:p")
        .filter_map(|p| p.child("w:pPr")?.child("w:sectPr"))
        .collect();
    found.extend(body.child("w:sectPr"));
    found
}

/// References named `element_name` across all sections, in document order
pub fn references(body: &RawXmlElement, element_name: &str) -> Vec<SectionReference> {
    all_section_properties(body)
        .into_iter()
        .flat_map(|sect| sect.children_named(element_name))
        .filter_map(|r| {
            Some(SectionReference {
                rel_id: r.attr("r:id")?.to_string(),
                kind: r
                    .attr("w:type")
                    .and_then(|t| t.parse().ok())
                    .unwrap_or_default(),
            })
        })
        .collect()
}

/// Drop every header/footer reference to `rel_id` from all sections.
/// Returns how many were removed.
pub fn remove_references(body: &mut RawXmlElement, rel_id: &str) -> usize {
    let mut removed = 0;
    for child in body.elements_mut() {
        match child.name.as_str() {
            "w:sectPr" => removed += remove_from_section(child, rel_id),
            "w:p" => {
                if let Some(sect) = child
                    .child_mut("w:pPr")
                    .and_then(|p| p.child_mut("w:sectPr"))
                {
                    removed += remove_from_section(sect, rel_id);
                }
            }
            _ => {}
        }
    }
    removed
}

fn remove_from_section(sect_pr: &mut RawXmlElement, rel_id: &str) -> usize {
    let before = sect_pr.children.len();
    sect_pr.children.retain(|c| {
        !c.as_element()
            .is_some_and(|e| is_reference(e) && e.attr("r:id") == Some(rel_id))
    });
    let removed = before - sect_pr.children.len();
    if removed > 0 && sect_pr.children.is_empty() {
        sect_pr.self_closing = true;
    }
    removed
}

fn is_reference(elem: &RawXmlElement) -> bool {
    matches!(elem.local_name(), "headerReference" | "footerReference")
}
