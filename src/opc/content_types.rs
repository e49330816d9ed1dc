//! Content Types handling for OPC packages
//!
//! Parses and generates `[Content_Types].xml`, and exposes the registry that
//! edits it inside a [`Package`].

use crate::error::{Error, Result};
use crate::opc::{well_known, Package, PartUri};
use crate::xml::CT as NS_CONTENT_TYPES;
use quick_xml::events::{BytesDecl, BytesEnd, BytesStart, Event};
use quick_xml::{Reader, Writer};
use std::io::Write;

/// Extension default (`<Default Extension=".." ContentType=".."/>`)
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ContentTypeDefault {
    pub extension: String,
    pub content_type: String,
}

/// Part override (`<Override PartName=".." ContentType=".."/>`)
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ContentTypeOverride {
    pub part_name: PartUri,
    pub content_type: String,
}

/// Content types manifest, in document order
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct ContentTypes {
    defaults: Vec<ContentTypeDefault>,
    overrides: Vec<ContentTypeOverride>,
}

impl ContentTypes {
    /// Empty manifest (no defaults, no overrides)
    pub fn new() -> Self {
        Self::default()
    }

    /// Manifest with the defaults every package needs
    pub fn with_standard_defaults() -> Self {
        let mut ct = Self::default();
        ct.add_default("rels", RELATIONSHIPS);
        ct.add_default("xml", XML);
        ct.add_default("png", "image/png");
        ct.add_default("jpeg", "image/jpeg");
        ct
    }

    /// Parse from XML string
    pub fn from_xml(xml: &str) -> Result<Self> {
        let mut reader = Reader::from_str(xml);
        reader.config_mut().trim_text(true);

        let mut ct = Self::default();
        let mut saw_root = false;
        let mut buf = Vec::new();

        loop {
            match reader.read_event_into(&mut buf)? {
                Event::Empty(e) | Event::Start(e) => match e.name().local_name().as_ref() {
                    b"Types" => saw_root = true,
                    b"Default" => {
                        let extension = get_attr(&e, "Extension")?;
                        let content_type = get_attr(&e, "ContentType")?;
                        ct.add_default(&extension, &content_type);
                    }
                    b"Override" => {
                        let part_name = PartUri::new(&get_attr(&e, "PartName")?)?;
                        let content_type = get_attr(&e, "ContentType")?;
                        ct.add_override(&part_name, &content_type);
                    }
                    _ => {}
                },
                Event::Eof => break,
                _ => {}
            }
            buf.clear();
        }

        if !saw_root {
            return Err(Error::MalformedXml(
                "[Content_Types].xml has no Types element".into(),
            ));
        }

        Ok(ct)
    }

    /// Serialize to XML string
    pub fn to_xml(&self) -> Result<String> {
        let mut buf = Vec::new();
        self.write_to(&mut buf)?;
        String::from_utf8(buf).map_err(|e| Error::MalformedXml(e.to_string()))
    }

    /// Write to a writer
    pub fn write_to<W: Write>(&self, writer: W) -> Result<()> {
        let mut xml = Writer::new(writer);

        xml.write_event(Event::Decl(BytesDecl::new(
            "1.0",
            Some("UTF-8"),
            Some("yes"),
        )))?;

        let mut types = BytesStart::new("Types");
        types.push_attribute(("xmlns", NS_CONTENT_TYPES));
        xml.write_event(Event::Start(types))?;

        for default in &self.defaults {
            let mut elem = BytesStart::new("Default");
            elem.push_attribute(("Extension", default.extension.as_str()));
            elem.push_attribute(("ContentType", default.content_type.as_str()));
            xml.write_event(Event::Empty(elem))?;
        }

        for over in &self.overrides {
            let mut elem = BytesStart::new("Override");
            elem.push_attribute(("PartName", over.part_name.as_str()));
            elem.push_attribute(("ContentType", over.content_type.as_str()));
            xml.write_event(Event::Empty(elem))?;
        }

        xml.write_event(Event::End(BytesEnd::new("Types")))?;

        Ok(())
    }

    /// Add a default extension mapping unless the extension is already mapped.
    /// Returns whether the manifest changed.
    pub fn add_default(&mut self, extension: &str, content_type: &str) -> bool {
        let extension = extension.trim_start_matches('.').to_lowercase();
        if self.defaults.iter().any(|d| d.extension == extension) {
            return false;
        }
        self.defaults.push(ContentTypeDefault {
            extension,
            content_type: content_type.to_string(),
        });
        true
    }

    /// Add an override unless the part already has one.
    /// Returns whether the manifest changed.
    pub fn add_override(&mut self, uri: &PartUri, content_type: &str) -> bool {
        if self.has_override(uri) {
            return false;
        }
        self.overrides.push(ContentTypeOverride {
            part_name: uri.clone(),
            content_type: content_type.to_string(),
        });
        true
    }

    /// Remove an override; returns whether one was removed
    pub fn remove_override(&mut self, uri: &PartUri) -> bool {
        let before = self.overrides.len();
        self.overrides.retain(|o| &o.part_name != uri);
        self.overrides.len() != before
    }

    /// Check whether the part has an override
    pub fn has_override(&self, uri: &PartUri) -> bool {
        self.overrides.iter().any(|o| &o.part_name == uri)
    }

    /// Get the content type for a part: override first, then extension default
    pub fn get(&self, uri: &PartUri) -> Option<&str> {
        if let Some(o) = self.overrides.iter().find(|o| &o.part_name == uri) {
            return Some(&o.content_type);
        }

        let ext = uri.extension()?.to_lowercase();
        self.defaults
            .iter()
            .find(|d| d.extension == ext)
            .map(|d| d.content_type.as_str())
    }

    /// Extension defaults
    pub fn defaults(&self) -> &[ContentTypeDefault] {
        &self.defaults
    }

    /// Part overrides
    pub fn overrides(&self) -> &[ContentTypeOverride] {
        &self.overrides
    }
}

/// Edits `[Content_Types].xml` inside a package.
///
/// Each call reads the whole manifest, changes it in memory and writes the
/// whole entry back. A missing manifest reads as an empty one.
pub struct ContentTypeRegistry<'a> {
    package: &'a mut Package,
}

impl<'a> ContentTypeRegistry<'a> {
    pub fn new(package: &'a mut Package) -> Self {
        Self { package }
    }

    /// Current manifest
    pub fn read(&self) -> Result<ContentTypes> {
        match self
            .package
            .archive()
            .read_text(well_known::content_types().entry_name())?
        {
            Some(xml) => ContentTypes::from_xml(xml),
            None => Ok(ContentTypes::new()),
        }
    }

    fn write(&mut self, ct: &ContentTypes) -> Result<()> {
        let xml = ct.to_xml()?;
        self.package
            .archive_mut()
            .write(well_known::content_types().entry_name(), xml);
        Ok(())
    }

    /// Add a default for `extension` if none exists
    pub fn add_default(&mut self, extension: &str, content_type: &str) -> Result<()> {
        let mut ct = self.read()?;
        if ct.add_default(extension, content_type) {
            self.write(&ct)?;
            self.package
                .logger()
                .info(format_args!("Added Default content type for extension: {}", extension));
        }
        Ok(())
    }

    /// Add an override for `part_name` if none exists
    pub fn add_override(&mut self, part_name: &str, content_type: &str) -> Result<()> {
        let uri = PartUri::new(part_name)?;
        let mut ct = self.read()?;
        if ct.add_override(&uri, content_type) {
            self.write(&ct)?;
            self.package
                .logger()
                .info(format_args!("Added Override for part: {}", uri));
        } else {
            self.package
                .logger()
                .debug(format_args!("Override for {} already present", uri));
        }
        Ok(())
    }

    /// Remove the override for `part_name`; absent overrides are not an error
    pub fn remove_override(&mut self, part_name: &str) -> Result<bool> {
        let uri = PartUri::new(part_name)?;
        let mut ct = self.read()?;
        let removed = ct.remove_override(&uri);
        if removed {
            self.write(&ct)?;
            self.package
                .logger()
                .info(format_args!("Removed Override for part: {}", uri));
        }
        Ok(removed)
    }

    /// Check whether `part_name` has an override
    pub fn has_override(&self, part_name: &str) -> Result<bool> {
        let uri = PartUri::new(part_name)?;
        Ok(self.read()?.has_override(&uri))
    }

    /// Effective content type of a part
    pub fn content_type_of(&self, part_name: &str) -> Result<Option<String>> {
        let uri = PartUri::new(part_name)?;
        Ok(self.read()?.get(&uri).map(str::to_string))
    }

    /// Random part name `/{prefix}/{uuid}.{extension}`.
    ///
    /// Uniqueness is probabilistic; the name is not checked against the archive.
    pub fn generate_unique_part_name(&self, prefix: &str, extension: &str) -> String {
        generate_unique_part_name(prefix, extension)
    }
}

/// Random part name `/{prefix}/{uuid}.{extension}`
pub fn generate_unique_part_name(prefix: &str, extension: &str) -> String {
    let prefix = prefix.trim_matches('/');
    let extension = extension.trim_start_matches('.');
    let id = uuid::Uuid::new_v4();
    if prefix.is_empty() {
        format!("/{}.{}", id, extension)
    } else {
        format!("/{}/{}.{}", prefix, id, extension)
    }
}

/// Get an attribute value from an XML element
fn get_attr(element: &BytesStart, name: &str) -> Result<String> {
    for attr in element.attributes() {
        let attr = attr?;
        if attr.key.local_name().as_ref() == name.as_bytes() {
            return Ok(attr.unescape_value()?.to_string());
        }
    }
    Err(Error::MissingAttribute {
        element: String::from_utf8_lossy(element.name().as_ref()).to_string(),
        attr: name.to_string(),
    })
}

// Well-known content types
pub const RELATIONSHIPS: &str = "application/vnd.openxmlformats-package.relationships+xml";
pub const XML: &str = "application/xml";
pub const MAIN_DOCUMENT: &str =
    "application/vnd.openxmlformats-officedocument.wordprocessingml.document.main+xml";
pub const HEADER: &str = "application/vnd.openxmlformats-officedocument.wordprocessingml.header+xml";
pub const FOOTER: &str = "application/vnd.openxmlformats-officedocument.wordprocessingml.footer+xml";
pub const STYLES: &str = "application/vnd.openxmlformats-officedocument.wordprocessingml.styles+xml";

#[cfg(test)]
mod tests {
    use super::*;
    use crate::logging::Logger;
    use crate::opc::Archive;

    const SAMPLE: &str = r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>
<Types xmlns="http://schemas.openxmlformats.org/package/2006/content-types">
  <Default Extension="rels" ContentType="application/vnd.openxmlformats-package.relationships+xml"/>
  <Default Extension="xml" ContentType="application/xml"/>
  <Override PartName="/word/document.xml" ContentType="application/vnd.openxmlformats-officedocument.wordprocessingml.document.main+xml"/>
</Types>"#;

    fn package_with(ct: Option<&str>) -> Package {
        let mut archive = Archive::new();
        if let Some(xml) = ct {
            archive.write("[Content_Types].xml", xml);
        }
        Package::new(archive, Logger::silent())
    }

    #[test]
    fn test_parse_content_types() {
        let ct = ContentTypes::from_xml(SAMPLE).unwrap();

        assert_eq!(ct.defaults().len(), 2);
        assert_eq!(ct.defaults()[0].extension, "rels");
        assert_eq!(ct.get(&well_known::document()), Some(MAIN_DOCUMENT));
    }

    #[test]
    fn test_missing_types_root() {
        let err = ContentTypes::from_xml("<Other/>").unwrap_err();
        assert!(matches!(err, Error::MalformedXml(_)));
    }

    #[test]
    fn test_missing_attribute() {
        let xml = r#"<Types xmlns="x"><Default Extension="xml"/></Types>"#;
        let err = ContentTypes::from_xml(xml).unwrap_err();
        assert!(matches!(err, Error::MissingAttribute { .. }));
    }

    #[test]
    fn test_roundtrip_keeps_order() {
        let mut ct = ContentTypes::with_standard_defaults();
        ct.add_override(&PartUri::new("/word/header1.xml").unwrap(), HEADER);
        ct.add_override(&well_known::document(), MAIN_DOCUMENT);

        let ct2 = ContentTypes::from_xml(&ct.to_xml().unwrap()).unwrap();
        assert_eq!(ct2, ct);
    }

    #[test]
    fn test_get_by_extension() {
        let ct = ContentTypes::with_standard_defaults();
        let uri = PartUri::new("/word/media/image1.PNG").unwrap();
        assert_eq!(ct.get(&uri), Some("image/png"));
    }

    #[test]
    fn test_registry_add_override_twice() {
        let mut package = package_with(Some(SAMPLE));
        let mut registry = ContentTypeRegistry::new(&mut package);

        registry.add_override("/word/header1.xml", HEADER).unwrap();
        registry.add_override("word/header1.xml", HEADER).unwrap();

        let ct = registry.read().unwrap();
        let count = ct
            .overrides()
            .iter()
            .filter(|o| o.part_name.as_str() == "/word/header1.xml")
            .count();
        assert_eq!(count, 1);
    }

    #[test]
    fn test_registry_has_override_tracks_latest_call() {
        let mut package = package_with(Some(SAMPLE));
        let mut registry = ContentTypeRegistry::new(&mut package);

        assert!(!registry.has_override("/word/footer1.xml").unwrap());
        registry.add_override("/word/footer1.xml", FOOTER).unwrap();
        assert!(registry.has_override("/word/footer1.xml").unwrap());
        assert!(registry.remove_override("/word/footer1.xml").unwrap());
        assert!(!registry.has_override("/word/footer1.xml").unwrap());
        assert!(!registry.remove_override("/word/footer1.xml").unwrap());
    }

    #[test]
    fn test_registry_synthesizes_missing_manifest() {
        let mut package = package_with(None);
        let mut registry = ContentTypeRegistry::new(&mut package);

        assert!(registry.read().unwrap().overrides().is_empty());
        registry.add_default("xml", XML).unwrap();
        registry.add_default("XML", "text/plain").unwrap();

        let xml = package
            .archive()
            .read_text("[Content_Types].xml")
            .unwrap()
            .unwrap()
            .to_string();
        assert!(xml.contains(NS_CONTENT_TYPES));
        let ct = ContentTypes::from_xml(&xml).unwrap();
        assert_eq!(ct.defaults().len(), 1);
        assert_eq!(ct.defaults()[0].content_type, XML);
    }

    #[test]
    fn test_content_type_of() {
        let mut package = package_with(Some(SAMPLE));
        let registry = ContentTypeRegistry::new(&mut package);

        assert_eq!(
            registry.content_type_of("/word/document.xml").unwrap().as_deref(),
            Some(MAIN_DOCUMENT)
        );
        assert_eq!(
            registry.content_type_of("/word/styles.xml").unwrap().as_deref(),
            Some(XML)
        );
        assert_eq!(registry.content_type_of("/word/media/a.bin").unwrap(), None);
    }

    #[test]
    fn test_generate_unique_part_name() {
        let name = generate_unique_part_name("word/media", "png");
        let token = name
            .strip_prefix("/word/media/")
            .and_then(|rest| rest.strip_suffix(".png"))
            .unwrap();

        assert_eq!(token.len(), 36);
        assert_eq!(token.as_bytes()[14], b'4');
        assert!(matches!(token.as_bytes()[19], b'8' | b'9' | b'a' | b'b'));
        assert_ne!(name, generate_unique_part_name("word/media", "png"));
    }
}
