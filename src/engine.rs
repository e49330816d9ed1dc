//! Engine - entry point tying a package to its part managers

use std::fmt;
use std::path::Path;

use zip::CompressionMethod;

use crate::document::{self, ReferenceKind};
use crate::error::Result;
use crate::logging::Logger;
use crate::opc::{
    self, rel_types, well_known, Archive, ContentTypeRegistry, ContentTypes, Package, PartUri,
    RelationshipGraph, RelationshipScope, Relationships, TargetMode,
};
use crate::parts::{DocumentManager, HeaderFooterKind, HeaderFooterManager};
use crate::xml::{self, RawXmlElement};

/// Engine configuration
#[derive(Clone, Debug)]
pub struct EngineOptions {
    /// Where diagnostics go
    pub logger: Logger,
    /// Compression used when the archive is written
    pub compression: CompressionMethod,
    /// Paragraph style of new headers
    pub header_style: String,
    /// Paragraph style of new footers
    pub footer_style: String,
}

impl Default for EngineOptions {
    fn default() -> Self {
        Self {
            logger: Logger::global(),
            compression: CompressionMethod::Deflated,
            header_style: HeaderFooterKind::Header.default_style().to_string(),
            footer_style: HeaderFooterKind::Footer.default_style().to_string(),
        }
    }
}

impl EngineOptions {
    pub fn with_logger(mut self, logger: Logger) -> Self {
        self.logger = logger;
        self
    }

    pub fn with_compression(mut self, compression: CompressionMethod) -> Self {
        self.compression = compression;
        self
    }

    pub fn with_header_style(mut self, style: impl Into<String>) -> Self {
        self.header_style = style.into();
        self
    }

    pub fn with_footer_style(mut self, style: impl Into<String>) -> Self {
        self.footer_style = style.into();
        self
    }
}

/// A broken link between parts and manifests, as left behind by an
/// interrupted multi-entry edit
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum ConsistencyIssue {
    /// Internal relationship whose target part does not exist
    DanglingRelationship {
        manifest: PartUri,
        id: String,
        target: String,
    },
    /// Part without an override or extension default
    MissingContentType { part: PartUri },
    /// Section reference to an id absent from the document's manifest
    UnknownSectionReference { rel_id: String },
}

impl fmt::Display for ConsistencyIssue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConsistencyIssue::DanglingRelationship {
                manifest,
                id,
                target,
            } => write!(f, "{}: {} points at missing part {}", manifest, id, target),
            ConsistencyIssue::MissingContentType { part } => {
                write!(f, "{} has no content type", part)
            }
            ConsistencyIssue::UnknownSectionReference { rel_id } => {
                write!(f, "section references unknown relationship {}", rel_id)
            }
        }
    }
}

/// A DOCX package opened for editing
#[derive(Debug)]
pub struct Engine {
    package: Package,
    options: EngineOptions,
}

impl Engine {
    /// Open a document from a file path
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self> {
        Self::open_with(path, EngineOptions::default())
    }

    /// Open a document from a file path with explicit options
    pub fn open_with<P: AsRef<Path>>(path: P, options: EngineOptions) -> Result<Self> {
        let package = Package::open(path, options.logger.clone())?;
        Ok(Self::from_package(package, options))
    }

    /// Open a document from bytes
    pub fn from_bytes(bytes: &[u8], options: EngineOptions) -> Result<Self> {
        let package = Package::from_bytes(bytes, options.logger.clone())?;
        Ok(Self::from_package(package, options))
    }

    /// Create a minimal document: content types, package relationships and
    /// a body holding only its section properties
    pub fn blank(options: EngineOptions) -> Result<Self> {
        let mut archive = Archive::new();

        let mut content_types = ContentTypes::with_standard_defaults();
        content_types.add_override(&well_known::document(), opc::MAIN_DOCUMENT);
        archive.write(
            well_known::content_types().entry_name(),
            content_types.to_xml()?,
        );

        let mut root_rels = Relationships::new();
        root_rels.push(opc::Relationship {
            id: "rId1".into(),
            rel_type: rel_types::OFFICE_DOCUMENT.into(),
            target: well_known::document().entry_name().into(),
            target_mode: TargetMode::Internal,
        });
        archive.write(well_known::package_rels().entry_name(), root_rels.to_xml()?);

        let document = RawXmlElement::new("w:document")
            .with_attr("xmlns:w", xml::W)
            .with_attr("xmlns:r", xml::R)
            .with_attr("xmlns:w14", xml::W14)
            .with_attr("xmlns:mc", xml::MC)
            .with_attr("mc:Ignorable", "w14")
            .with_child(RawXmlElement::new("w:body").with_child(RawXmlElement::new("w:sectPr")));
        archive.write(
            well_known::document().entry_name(),
            document.to_document_xml()?,
        );

        options.logger.debug(format_args!("Created blank document"));
        Ok(Self::from_package(
            Package::new(archive, options.logger.clone()),
            options,
        ))
    }

    fn from_package(mut package: Package, options: EngineOptions) -> Self {
        package.archive_mut().set_compression(options.compression);
        Self { package, options }
    }

    /// Save the document to a file
    pub fn save<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        self.package.save(path)
    }

    /// Save the document to bytes
    pub fn to_bytes(&self) -> Result<Vec<u8>> {
        self.package.to_bytes()
    }

    pub fn options(&self) -> &EngineOptions {
        &self.options
    }

    pub fn archive(&self) -> &Archive {
        self.package.archive()
    }

    pub fn package(&self) -> &Package {
        &self.package
    }

    pub fn package_mut(&mut self) -> &mut Package {
        &mut self.package
    }

    /// Give up the engine, keeping the package
    pub fn into_package(self) -> Package {
        self.package
    }

    /// `[Content_Types].xml` editor
    pub fn content_types(&mut self) -> ContentTypeRegistry<'_> {
        self.package.content_types()
    }

    /// Relationships of the main document part
    pub fn relationships(&mut self) -> RelationshipGraph<'_> {
        self.package.relationships(RelationshipScope::document())
    }

    /// Package-level relationships (`_rels/.rels`)
    pub fn root_relationships(&mut self) -> RelationshipGraph<'_> {
        self.package.relationships(RelationshipScope::Package)
    }

    /// Relationships owned by `part`
    pub fn relationships_for(&mut self, part: &str) -> Result<RelationshipGraph<'_>> {
        let uri = PartUri::new(part)?;
        Ok(self.package.relationships(RelationshipScope::Part(uri)))
    }

    /// Header parts
    pub fn header(&mut self) -> HeaderFooterManager<'_> {
        HeaderFooterManager::new(&mut self.package, HeaderFooterKind::Header)
            .with_style(self.options.header_style.as_str())
    }

    /// Footer parts
    pub fn footer(&mut self) -> HeaderFooterManager<'_> {
        HeaderFooterManager::new(&mut self.package, HeaderFooterKind::Footer)
            .with_style(self.options.footer_style.as_str())
    }

    /// Main document part
    pub fn document(&mut self) -> DocumentManager<'_> {
        DocumentManager::new(&mut self.package)
    }

    /// Find links left broken between parts and manifests.
    ///
    /// Reads every relationship manifest, the content-type manifest and the
    /// document's section properties; nothing is written.
    pub fn check_consistency(&mut self) -> Result<Vec<ConsistencyIssue>> {
        let mut issues = Vec::new();
        let archive = self.package.archive();
        let content_types = match archive.read_text(well_known::content_types().entry_name())? {
            Some(xml) => ContentTypes::from_xml(xml)?,
            None => ContentTypes::new(),
        };

        for name in archive.list() {
            let uri = PartUri::new(name)?;
            if uri == well_known::content_types() {
                continue;
            }
            if content_types.get(&uri).is_none() {
                issues.push(ConsistencyIssue::MissingContentType { part: uri.clone() });
            }
            if !uri.is_relationships() {
                continue;
            }

            let scope = match uri.source_part() {
                Some(owner) => RelationshipScope::Part(owner),
                None => RelationshipScope::Package,
            };
            let Some(xml) = archive.read_text(name)? else {
                continue;
            };
            for rel in Relationships::from_xml(xml)?.iter() {
                if rel.target_mode == TargetMode::External {
                    continue;
                }
                let exists = scope
                    .resolve_target(&rel.target)
                    .is_ok_and(|target| archive.exists(target.entry_name()));
                if !exists {
                    issues.push(ConsistencyIssue::DanglingRelationship {
                        manifest: uri.clone(),
                        id: rel.id.clone(),
                        target: rel.target.clone(),
                    });
                }
            }
        }

        if let Some(root) = self.package.read_xml(&well_known::document())? {
            let known = self.relationships().all()?;
            let body = document::body(&root)?;
            for kind in [HeaderFooterKind::Header, HeaderFooterKind::Footer] {
                for reference in document::references(body, kind.reference_element()) {
                    if !known.iter().any(|r| r.id == reference.rel_id) {
                        issues.push(ConsistencyIssue::UnknownSectionReference {
                            rel_id: reference.rel_id,
                        });
                    }
                }
            }
        }

        for issue in &issues {
            self.package
                .logger()
                .warn(format_args!("Consistency: {}", issue));
        }
        Ok(issues)
    }

    /// Add a header holding `text` to every page of the final section
    pub fn add_header(&mut self, text: &str) -> Result<PartUri> {
        Ok(self.header().add_with(text, ReferenceKind::Default)?.part)
    }

    /// Add a footer holding `text` to every page of the final section
    pub fn add_footer(&mut self, text: &str) -> Result<PartUri> {
        Ok(self.footer().add_with(text, ReferenceKind::Default)?.part)
    }
}
