//! Document body (w:body) and block-level paragraph placement

use crate::document::Paragraph;
use crate::error::{Error, Result};
use crate::xml::{RawXmlElement, RawXmlNode};

/// Locate `w:body`, given either a `w:document` root or the body itself
pub fn body(root: &RawXmlElement) -> Result<&RawXmlElement> {
    if root.local_name() == "body" {
        return Ok(root);
    }
    root.child("w:body")
        .ok_or_else(|| Error::MalformedXml(format!("<{}> has no w:body", root.name)))
}

/// Locate `w:body` mutably
pub fn body_mut(root: &mut RawXmlElement) -> Result<&mut RawXmlElement> {
    if root.local_name() == "body" {
        return Ok(root);
    }
    let name = root.name.clone();
    root.child_mut("w:body")
        .ok_or_else(|| Error::MalformedXml(format!("<{}> has no w:body", name)))
}

/// Top-level paragraphs of a body, in document order
pub fn paragraphs(body: &RawXmlElement) -> Vec<Paragraph> {
    body.children_named("w:p")
        .map(Paragraph::from_element)
        .collect()
}

/// Index in `body.children` of the `index`-th top-level paragraph
fn paragraph_slot(body: &RawXmlElement, index: usize) -> Option<usize> {
    body.children
        .iter()
        .enumerate()
        .filter(|(_, c)| c.as_element().is_some_and(|e| e.name == "w:p"))
        .nth(index)
        .map(|(slot, _)| slot)
}

/// Insert `paragraph` before the `position`-th top-level paragraph.
///
/// A position past the last paragraph appends, keeping a trailing body-level
/// `w:sectPr` last.
pub fn insert_paragraph_element(body: &mut RawXmlElement, paragraph: RawXmlElement, position: usize) {
    let slot = paragraph_slot(body, position)
        .or_else(|| body.position_of("w:sectPr"))
        .unwrap_or(body.children.len());
    body.insert_node(slot, RawXmlNode::Element(paragraph));
}

/// Replace the `index`-th top-level paragraph
pub fn replace_paragraph_element(
    body: &mut RawXmlElement,
    index: usize,
    paragraph: RawXmlElement,
) -> Result<()> {
    let slot = paragraph_slot(body, index).ok_or_else(|| {
        Error::Validation(format!("paragraph index {} is out of range", index))
    })?;
    body.children[slot] = RawXmlNode::Element(paragraph);
    Ok(())
}

/// Insert a serialized paragraph into a serialized document or body.
///
/// Fails with [`Error::MalformedXml`] when no body is present and with
/// [`Error::Validation`] when `fragment` is not a `w:p`.
pub fn insert_paragraph(xml: &str, fragment: &str, position: usize) -> Result<String> {
    let mut root = RawXmlElement::parse(xml)?;
    let paragraph = Paragraph::from_xml(fragment)?.to_element();

    insert_paragraph_element(body_mut(&mut root)?, paragraph, position);

    if root.local_name() == "body" {
        root.to_xml()
    } else {
        root.to_document_xml()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    const THREE: &str = r#"<w:document><w:body><w:p><w:r><w:t>A</w:t></w:r></w:p><w:p><w:r><w:t>B</w:t></w:r></w:p><w:p><w:r><w:t>C</w:t></w:r></w:p><w:sectPr/></w:body></w:document>"#;

    fn texts(xml: &str) -> Vec<String> {
        let root = RawXmlElement::parse(xml).unwrap();
        paragraphs(body(&root).unwrap())
            .iter()
            .map(Paragraph::text)
            .collect()
    }

    #[test]
    fn test_insert_at_front() {
        let out = insert_paragraph(THREE, "<w:p><w:r><w:t>New</w:t></w:r></w:p>", 0).unwrap();
        assert_eq!(texts(&out), vec!["New", "A", "B", "C"]);
        assert!(out.starts_with("<?xml"));
    }

    #[test]
    fn test_insert_past_end_keeps_section_last() {
        let out = insert_paragraph(THREE, "<w:p><w:r><w:t>Z</w:t></w:r></w:p>", 10).unwrap();
        assert_eq!(texts(&out), vec!["A", "B", "C", "Z"]);
        assert!(out.ends_with("<w:sectPr/></w:body></w:document>"));
    }

    #[test]
    fn test_insert_into_bare_body() {
        let out = insert_paragraph("<w:body/>", "<w:p/>", 0).unwrap();
        assert_eq!(out, "<w:body><w:p/></w:body>");
    }

    #[test]
    fn test_insert_without_body() {
        let err = insert_paragraph("<w:document/>", "<w:p/>", 0).unwrap_err();
        assert!(matches!(err, Error::MalformedXml(_)));
    }

    #[test]
    fn test_insert_rejects_non_paragraph() {
        let err = insert_paragraph(THREE, "<w:tbl/>", 0).unwrap_err();
        assert!(matches!(err, Error::Validation(_)));
    }

    #[test]
    fn test_replace_out_of_range() {
        let mut root = RawXmlElement::parse(THREE).unwrap();
        let body = body_mut(&mut root).unwrap();

        replace_paragraph_element(body, 1, Paragraph::new("b").to_element()).unwrap();
        assert_eq!(
            paragraphs(body).iter().map(Paragraph::text).collect::<Vec<_>>(),
            vec!["A", "b", "C"]
        );
        assert!(replace_paragraph_element(body, 3, RawXmlElement::new("w:p")).is_err());
    }
}
