//! Main document part (`/word/document.xml`)

use crate::document::{
    self, ensure_section_properties, generate_unique_paragraph_id, Paragraph, ReferenceKind,
    SectionReference,
};
use crate::error::{Error, Result};
use crate::opc::{well_known, Package, PartUri};
use crate::parts::HeaderFooterKind;
use crate::xml::RawXmlElement;

/// Reads and edits the main document part.
///
/// Every edit parses the part, changes the tree and writes the whole part
/// back, so nothing is cached between calls.
pub struct DocumentManager<'a> {
    package: &'a mut Package,
    uri: PartUri,
}

impl<'a> DocumentManager<'a> {
    pub fn new(package: &'a mut Package) -> Self {
        Self {
            package,
            uri: well_known::document(),
        }
    }

    /// Location of the main document part
    pub fn uri(&self) -> &PartUri {
        &self.uri
    }

    /// Parsed document; [`Error::MissingPart`]
    /// when the part is absent
    pub fn read(&self) -> Result<RawXmlElement> {
        self.package.require_xml(&self.uri)
    }

    fn write(&mut self, root: &RawXmlElement) -> Result<()> {
        self.package.write_xml(&self.uri, root)?;
        Ok(())
    }

    /// Top-level paragraphs in document order
    pub fn paragraphs(&self) -> Result<Vec<Paragraph>> {
        let root = self.read()?;
        Ok(document::paragraphs(document::body(&root)?))
    }

    /// Text of each top-level paragraph
    pub fn paragraph_texts(&self) -> Result<Vec<String>> {
        Ok(self.paragraphs()?.iter().map(Paragraph::text).collect())
    }

    /// Document text, one line per paragraph
    pub fn text(&self) -> Result<String> {
        Ok(self.paragraph_texts()?.join("\n"))
    }

    /// Insert a serialized `w:p` before the `position`-th paragraph
    pub fn insert_paragraph(&mut self, fragment: &str, position: usize) -> Result<()> {
        let paragraph = Paragraph::from_xml(fragment)?;
        self.insert(paragraph, position)
    }

    /// Append a paragraph of plain text, tagged with a fresh paragraph id.
    /// Returns the inserted paragraph.
    pub fn add_paragraph(&mut self, text: &str) -> Result<Paragraph> {
        let mut paragraph = Paragraph::new(text);
        paragraph.set_para_id(self.generate_unique_paragraph_id()?);
        self.insert(paragraph.clone(), usize::MAX)?;
        Ok(paragraph)
    }

    fn insert(&mut self, paragraph: Paragraph, position: usize) -> Result<()> {
        let mut root = self.read()?;
        document::insert_paragraph_element(
            document::body_mut(&mut root)?,
            paragraph.to_element(),
            position,
        );
        self.write(&root)?;
        self.package
            .logger()
            .debug(format_args!("Inserted paragraph at position {}", position));
        Ok(())
    }

    /// Replace the visible text of the `index`-th paragraph, keeping its
    /// properties and the formatting of its first run
    pub fn replace_paragraph_text(&mut self, index: usize, text: &str) -> Result<()> {
        let mut root = self.read()?;
        let body = document::body_mut(&mut root)?;

        let mut paragraphs = document::paragraphs(body);
        let count = paragraphs.len();
        let Some(paragraph) = paragraphs.get_mut(index) else {
            return Err(Error::Validation(format!(
                "paragraph index {} is out of range ({} paragraphs)",
                index, count
            )));
        };
        paragraph.modify_text(text);
        document::replace_paragraph_element(body, index, paragraph.to_element())?;

        self.write(&root)
    }

    /// One more than the largest `w14:paraId` in the document and its
    /// header and footer parts
    pub fn generate_unique_paragraph_id(&self) -> Result<String> {
        let archive = self.package.archive();
        let mut xml = archive
            .read_text(self.uri.entry_name())?
            .ok_or_else(|| Error::MissingPart(self.uri.to_string()))?
            .to_string();

        for name in archive.list() {
            let Some(file) = name.strip_prefix("word/") else {
                continue;
            };
            let related = file.starts_with("header") || file.starts_with("footer");
            if related && file.ends_with(".xml") && !file.contains('/') {
                if let Some(text) = archive.read_text(name)? {
                    xml.push_str(text);
                }
            }
        }
        Ok(generate_unique_paragraph_id(&xml))
    }

    /// Wire a header relationship into the final section
    pub fn add_header_reference(&mut self, rel_id: &str, kind: ReferenceKind) -> Result<()> {
        self.add_reference(HeaderFooterKind::Header, rel_id, kind)
    }

    /// Wire a footer relationship into the final section
    pub fn add_footer_reference(&mut self, rel_id: &str, kind: ReferenceKind) -> Result<()> {
        self.add_reference(HeaderFooterKind::Footer, rel_id, kind)
    }

    /// Add a reference to the final `w:sectPr`, creating it when the body
    /// has none
    pub fn add_reference(
        &mut self,
        part_kind: HeaderFooterKind,
        rel_id: &str,
        kind: ReferenceKind,
    ) -> Result<()> {
        let mut root = self.read()?;
        let sect_pr = ensure_section_properties(document::body_mut(&mut root)?)?;
        document::add_reference(sect_pr, part_kind.reference_element(), rel_id, kind);
        self.write(&root)?;

        self.package.logger().info(format_args!(
            "Added {} reference {} ({})",
            part_kind, rel_id, kind
        ));
        Ok(())
    }

    /// Drop every section reference to `rel_id`; returns how many went away
    pub fn remove_references(&mut self, rel_id: &str) -> Result<usize> {
        let mut root = self.read()?;
        let removed = document::remove_references(document::body_mut(&mut root)?, rel_id);
        if removed > 0 {
            self.write(&root)?;
            self.package.logger().info(format_args!(
                "Removed {} section reference(s) to {}",
                removed, rel_id
            ));
        }
        Ok(removed)
    }

    /// Header or footer references across all sections
    pub fn section_references(&self, part_kind: HeaderFooterKind) -> Result<Vec<SectionReference>> {
        let root = self.read()?;
        Ok(document::references(
            document::body(&root)?,
            part_kind.reference_element(),
        ))
    }

    /// Relationship ids referenced by header or footer references
    pub fn section_reference_ids(&self, part_kind: HeaderFooterKind) -> Result<Vec<String>> {
        Ok(self
            .section_references(part_kind)?
            .into_iter()
            .map(|r| r.rel_id)
            .collect())
    }
}
