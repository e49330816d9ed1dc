//! Header and footer parts (`/word/headerN.xml`, `/word/footerN.xml`)

use std::fmt;

use crate::document::{Paragraph, ReferenceKind};
use crate::error::{Error, Result};
use crate::opc::{self, rel_types, well_known, Package, PartUri, RelationshipScope, TargetMode};
use crate::parts::DocumentManager;
use crate::xml::{header_footer_namespaces, RawXmlElement, HEADER_FOOTER_IGNORABLE};

/// Header or footer
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum HeaderFooterKind {
    Header,
    Footer,
}

impl HeaderFooterKind {
    /// Root element of the part
    pub fn root_element(&self) -> &'static str {
        match self {
            HeaderFooterKind::Header => "w:hdr",
            HeaderFooterKind::Footer => "w:ftr",
        }
    }

    /// Element wiring the part into a section
    pub fn reference_element(&self) -> &'static str {
        match self {
            HeaderFooterKind::Header => "w:headerReference",
            HeaderFooterKind::Footer => "w:footerReference",
        }
    }

    pub fn relationship_type(&self) -> &'static str {
        match self {
            HeaderFooterKind::Header => rel_types::HEADER,
            HeaderFooterKind::Footer => rel_types::FOOTER,
        }
    }

    pub fn content_type(&self) -> &'static str {
        match self {
            HeaderFooterKind::Header => opc::HEADER,
            HeaderFooterKind::Footer => opc::FOOTER,
        }
    }

    /// Paragraph style Word uses for this kind of part
    pub fn default_style(&self) -> &'static str {
        match self {
            HeaderFooterKind::Header => "Header",
            HeaderFooterKind::Footer => "Footer",
        }
    }

    fn file_stem(&self) -> &'static str {
        match self {
            HeaderFooterKind::Header => "header",
            HeaderFooterKind::Footer => "footer",
        }
    }
}

impl fmt::Display for HeaderFooterKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.file_stem())
    }
}

/// Outcome of adding a header or footer
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct AddedPart {
    /// Location of the new part
    pub part: PartUri,
    /// Relationship id in the document's manifest
    pub rel_id: String,
    /// Serialized part as written
    pub xml: String,
}

/// Creates, lists and removes header or footer parts.
///
/// Adding a part touches four places in order: the part itself, the
/// document relationship manifest, the content-type manifest and the
/// document's final section properties.
pub struct HeaderFooterManager<'a> {
    package: &'a mut Package,
    kind: HeaderFooterKind,
    style: String,
}

impl<'a> HeaderFooterManager<'a> {
    pub fn new(package: &'a mut Package, kind: HeaderFooterKind) -> Self {
        Self {
            package,
            kind,
            style: kind.default_style().to_string(),
        }
    }

    /// Paragraph style applied to new parts
    pub fn with_style(mut self, style: impl Into<String>) -> Self {
        self.style = style.into();
        self
    }

    pub fn kind(&self) -> HeaderFooterKind {
        self.kind
    }

    /// Add a part holding `text`, shown on every page of the final section
    pub fn add(&mut self, text: &str) -> Result<AddedPart> {
        self.add_with(text, ReferenceKind::Default)
    }

    /// Add a part holding `text` and reference it as `reference`.
    ///
    /// The document and both manifests are parsed, and the relationship id
    /// allocated, before anything is written, so a missing or malformed
    /// input leaves the package untouched.
    pub fn add_with(&mut self, text: &str, reference: ReferenceKind) -> Result<AddedPart> {
        let doc_uri = well_known::document();
        let document = DocumentManager::new(&mut *self.package).read()?;
        crate::document::body(&document)?;
        let rel_id = self
            .package
            .relationships(RelationshipScope::document())
            .gen_id("rId")?;
        self.package.content_types().read()?;

        let part = self.next_part_uri()?;
        let para_id = DocumentManager::new(&mut *self.package).generate_unique_paragraph_id()?;
        let root = self.build_part(text, &para_id);
        let xml = self.package.write_xml(&part, &root)?;

        self.package
            .relationships(RelationshipScope::document())
            .add_relationship(
                &rel_id,
                self.kind.relationship_type(),
                &doc_uri.relative_target(&part),
            )?;

        self.package
            .content_types()
            .add_override(part.as_str(), self.kind.content_type())?;

        DocumentManager::new(&mut *self.package).add_reference(self.kind, &rel_id, reference)?;

        self.package.logger().info(format_args!(
            "Added {} {} as {}",
            self.kind, part, rel_id
        ));
        Ok(AddedPart { part, rel_id, xml })
    }

    /// Lowest free `/word/{stem}{N}.xml`
    fn next_part_uri(&self) -> Result<PartUri> {
        let archive = self.package.archive();
        let mut n = 1;
        loop {
            let name = format!("word/{}{}.xml", self.kind.file_stem(), n);
            if !archive.exists(&name) {
                return PartUri::new(&name);
            }
            n += 1;
        }
    }

    fn build_part(&self, text: &str, para_id: &str) -> RawXmlElement {
        let mut root = RawXmlElement::new(self.kind.root_element());
        for (name, uri) in header_footer_namespaces() {
            root.set_attr(name, uri);
        }
        root.set_attr("mc:Ignorable", HEADER_FOOTER_IGNORABLE);

        let mut paragraph = Paragraph::new(text);
        paragraph.set_para_id(para_id);
        paragraph.set_attr("w14:textId", "77777777");
        paragraph.set_style(self.style.as_str());

        root.with_child(paragraph.to_element())
    }

    /// Parts of this kind the document relates to, in manifest order
    pub fn list(&mut self) -> Result<Vec<PartUri>> {
        let scope = RelationshipScope::document();
        let rels = self
            .package
            .relationships(scope.clone())
            .by_type(self.kind.relationship_type())?;

        rels.iter()
            .filter(|r| r.target_mode == TargetMode::Internal)
            .map(|r| scope.resolve_target(&r.target))
            .collect()
    }

    /// Text of a part, one line per paragraph
    pub fn text(&self, part: &str) -> Result<String> {
        let uri = PartUri::new(part)?;
        let root = self.package.require_xml(&uri)?;
        let lines: Vec<String> = root
            .children_named("w:p")
            .map(|p| Paragraph::from_element(p).text())
            .collect();
        Ok(lines.join("\n"))
    }

    /// Remove a part with everything that points at it: relationships,
    /// content-type override, section references and the part's own
    /// relationship manifest
    pub fn remove(&mut self, part: &str) -> Result<()> {
        let uri = PartUri::new(part)?;
        if !self.package.archive().exists(uri.entry_name()) {
            return Err(Error::MissingPart(uri.to_string()));
        }

        let scope = RelationshipScope::document();
        let rel_ids: Vec<String> = self
            .package
            .relationships(scope.clone())
            .all()?
            .into_iter()
            .filter(|r| r.target_mode == TargetMode::Internal)
            .filter(|r| scope.resolve_target(&r.target).is_ok_and(|t| t == uri))
            .map(|r| r.id)
            .collect();

        for id in &rel_ids {
            self.package
                .relationships(scope.clone())
                .remove_relationship(id)?;
            if self.package.archive().exists(well_known::document().entry_name()) {
                DocumentManager::new(self.package).remove_references(id)?;
            }
        }

        self.package.content_types().remove_override(uri.as_str())?;
        let archive = self.package.archive_mut();
        archive.remove(uri.relationships_uri().entry_name());
        archive.remove(uri.entry_name());

        self.package.logger().info(format_args!(
            "Removed {} {} ({} relationship(s))",
            self.kind,
            uri,
            rel_ids.len()
        ));
        Ok(())
    }
}
