//! OPC Package: one archive plus the logger every manager reports through

use crate::error::{Error, Result};
use crate::logging::Logger;
use crate::opc::{
    Archive, ContentTypeRegistry, PartUri, RelationshipGraph, RelationshipScope,
};
use crate::xml::RawXmlElement;
use std::path::Path;

/// An OPC package (ZIP-based container for DOCX, XLSX, PPTX, etc.)
///
/// Exclusively owns its [`Archive`]. Managers borrow the package mutably, so
/// at most one of them can edit it at any time.
#[derive(Debug)]
pub struct Package {
    archive: Archive,
    logger: Logger,
}

impl Package {
    /// Wrap an archive
    pub fn new(archive: Archive, logger: Logger) -> Self {
        Self { archive, logger }
    }

    /// Open a package from a file path
    pub fn open<P: AsRef<Path>>(path: P, logger: Logger) -> Result<Self> {
        let path = path.as_ref();
        let archive = Archive::open(path)?;
        logger.info(format_args!(
            "Loaded package {} ({} entries)",
            path.display(),
            archive.len()
        ));
        Ok(Self::new(archive, logger))
    }

    /// Open a package from bytes
    pub fn from_bytes(bytes: &[u8], logger: Logger) -> Result<Self> {
        Ok(Self::new(Archive::from_bytes(bytes)?, logger))
    }

    /// Save the package to a file
    pub fn save<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        let path = path.as_ref();
        self.archive.save(path)?;
        self.logger
            .info(format_args!("Saved package to {}", path.display()));
        Ok(())
    }

    /// Save the package to bytes
    pub fn to_bytes(&self) -> Result<Vec<u8>> {
        self.archive.to_bytes()
    }

    /// Underlying archive
    pub fn archive(&self) -> &Archive {
        &self.archive
    }

    /// Underlying archive, mutably
    pub fn archive_mut(&mut self) -> &mut Archive {
        &mut self.archive
    }

    /// Logger bound to this package
    pub fn logger(&self) -> &Logger {
        &self.logger
    }

    /// Give up the package, keeping its archive
    pub fn into_archive(self) -> Archive {
        self.archive
    }

    /// Parse an XML part; `None` if the part does not exist
    pub fn read_xml(&self, uri: &PartUri) -> Result<Option<RawXmlElement>> {
        match self.archive.read_text(uri.entry_name())? {
            Some(xml) => {
                self.logger.debug(format_args!("Parsing {}", uri));
                RawXmlElement::parse(xml).map(Some)
            }
            None => Ok(None),
        }
    }

    /// Parse an XML part that must exist
    pub fn require_xml(&self, uri: &PartUri) -> Result<RawXmlElement> {
        self.read_xml(uri)?
            .ok_or_else(|| Error::MissingPart(uri.to_string()))
    }

    /// Serialize `root` with the standard declaration and store it at `uri`.
    /// Returns the written text.
    pub fn write_xml(&mut self, uri: &PartUri, root: &RawXmlElement) -> Result<String> {
        let xml = root.to_document_xml()?;
        self.archive.write(uri.entry_name(), xml.as_bytes());
        self.logger.debug(format_args!("Wrote {}", uri));
        Ok(xml)
    }

    /// Content-type registry over this package
    pub fn content_types(&mut self) -> ContentTypeRegistry<'_> {
        ContentTypeRegistry::new(self)
    }

    /// Relationship graph for `scope`
    pub fn relationships(&mut self, scope: RelationshipScope) -> RelationshipGraph<'_> {
        RelationshipGraph::new(self, scope)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::opc::well_known;

    #[test]
    fn test_xml_roundtrip_through_archive() {
        let mut pkg = Package::new(Archive::new(), Logger::silent());
        let uri = well_known::document();
        let root = RawXmlElement::new("w:document").with_child(RawXmlElement::new("w:body"));

        let text = pkg.write_xml(&uri, &root).unwrap();
        assert!(text.contains("<w:body/>"));
        assert_eq!(pkg.require_xml(&uri).unwrap(), root);
    }

    #[test]
    fn test_require_missing_part() {
        let pkg = Package::new(Archive::new(), Logger::silent());
        let err = pkg.require_xml(&well_known::document()).unwrap_err();
        assert!(matches!(err, Error::MissingPart(ref p) if p == "/word/document.xml"));
    }

    #[test]
    fn test_roundtrip_bytes() {
        let mut pkg = Package::new(Archive::new(), Logger::silent());
        pkg.archive_mut().write("word/document.xml", "<w:document/>");

        let bytes = pkg.to_bytes().unwrap();
        let pkg2 = Package::from_bytes(&bytes, Logger::silent()).unwrap();
        assert!(pkg2.archive().exists("word/document.xml"));
    }
}
