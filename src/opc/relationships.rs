//! Relationships handling for OPC packages
//!
//! Parses and generates `.rels` files, and exposes [`RelationshipGraph`], the
//! editor for one manifest inside a [`Package`].

use crate::error::{Error, Result};
use crate::opc::{well_known, Package, PartUri};
use crate::xml::PR as NS_RELATIONSHIPS;
use quick_xml::events::{BytesDecl, BytesEnd, BytesStart, Event};
use quick_xml::{Reader, Writer};
use std::io::Write;

/// Ordered collection of relationships from one manifest
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Relationships {
    items: Vec<Relationship>,
}

/// A single relationship
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Relationship {
    /// Relationship ID (e.g., "rId1")
    pub id: String,
    /// Relationship type URI
    pub rel_type: String,
    /// Target path (relative or absolute)
    pub target: String,
    /// Target mode
    pub target_mode: TargetMode,
}

/// Target mode for relationships
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum TargetMode {
    /// Internal target (part within the package)
    #[default]
    Internal,
    /// External target (hyperlink, etc.)
    External,
}

impl Relationships {
    /// Create empty relationships
    pub fn new() -> Self {
        Self::default()
    }

    /// Parse from XML string
    pub fn from_xml(xml: &str) -> Result<Self> {
        let mut reader = Reader::from_str(xml);
        reader.config_mut().trim_text(true);

        let mut rels = Self::new();
        let mut saw_root = false;
        let mut buf = Vec::new();

        loop {
            match reader.read_event_into(&mut buf)? {
                Event::Empty(e) | Event::Start(e) => match e.name().local_name().as_ref() {
                    b"Relationships" => saw_root = true,
                    b"Relationship" => rels.items.push(parse_relationship(&e)?),
                    _ => {}
                },
                Event::Eof => break,
                _ => {}
            }
            buf.clear();
        }

        if !saw_root {
            return Err(Error::MalformedXml(
                "relationship manifest has no Relationships element".into(),
            ));
        }

        Ok(rels)
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

        xml.write_event(Event::Decl(BytesDecl::new("1.0", Some("UTF-8"), Some("yes"))))?;

        let mut rels_elem = BytesStart::new("Relationships");
        rels_elem.push_attribute(("xmlns", NS_RELATIONSHIPS));
        xml.write_event(Event::Start(rels_elem))?;

        for rel in &self.items {
            let mut rel_elem = BytesStart::new("Relationship");
            rel_elem.push_attribute(("Id", rel.id.as_str()));
            rel_elem.push_attribute(("Type", rel.rel_type.as_str()));
            rel_elem.push_attribute(("Target", rel.target.as_str()));

            if rel.target_mode == TargetMode::External {
                rel_elem.push_attribute(("TargetMode", "External"));
            }

            xml.write_event(Event::Empty(rel_elem))?;
        }

        xml.write_event(Event::End(BytesEnd::new("Relationships")))?;

        Ok(())
    }

    /// Get a relationship by ID
    pub fn get(&self, id: &str) -> Option<&Relationship> {
        self.items.iter().find(|r| r.id == id)
    }

    /// Get a relationship by type (returns first match)
    pub fn by_type(&self, rel_type: &str) -> Option<&Relationship> {
        self.items.iter().find(|r| r.rel_type == rel_type)
    }

    /// Get all relationships of a given type
    pub fn all_by_type(&self, rel_type: &str) -> Vec<&Relationship> {
        self.items
            .iter()
            .filter(|r| r.rel_type == rel_type)
            .collect()
    }

    /// Append a relationship unless its id is already in use.
    /// Returns whether it was added.
    pub fn push(&mut self, rel: Relationship) -> bool {
        if self.get(&rel.id).is_some() {
            return false;
        }
        self.items.push(rel);
        true
    }

    /// Remove a relationship by ID
    pub fn remove(&mut self, id: &str) -> Option<Relationship> {
        let pos = self.items.iter().position(|r| r.id == id)?;
        Some(self.items.remove(pos))
    }

    /// Iterate over all relationships
    pub fn iter(&self) -> impl Iterator<Item = &Relationship> {
        self.items.iter()
    }

    /// Number of relationships
    pub fn len(&self) -> usize {
        self.items.len()
    }

    /// Check if empty
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Next id: `prefix` + (largest trailing number among all ids + 1).
    ///
    /// `None` when the largest number cannot be incremented.
    pub fn next_id(&self, prefix: &str) -> Option<String> {
        let max_id = self
            .items
            .iter()
            .filter_map(|r| trailing_number(&r.id))
            .max()
            .unwrap_or(0);

        max_id
            .checked_add(1)
            .map(|next| format!("{}{}", prefix, next))
    }
}

/// Which manifest a [`RelationshipGraph`] edits
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum RelationshipScope {
    /// Package-level relationships (`_rels/.rels`)
    Package,
    /// Relationships owned by one part (`<dir>/_rels/<file>.rels`)
    Part(PartUri),
}

impl RelationshipScope {
    /// Scope of the main document part
    pub fn document() -> Self {
        RelationshipScope::Part(well_known::document())
    }

    /// Manifest location for this scope
    pub fn manifest_uri(&self) -> PartUri {
        match self {
            RelationshipScope::Package => well_known::package_rels(),
            RelationshipScope::Part(owner) => owner.relationships_uri(),
        }
    }

    /// Resolve a relationship target of this scope to a part
    pub fn resolve_target(&self, target: &str) -> Result<PartUri> {
        match self {
            RelationshipScope::Package => PartUri::new(target),
            RelationshipScope::Part(owner) => owner.resolve(target),
        }
    }
}

/// Edits one relationship manifest inside a package.
///
/// Root and part scopes share this type; they differ only by
/// [`RelationshipScope::manifest_uri`]. Every call reads and rewrites the
/// whole manifest.
pub struct RelationshipGraph<'a> {
    package: &'a mut Package,
    scope: RelationshipScope,
}

impl<'a> RelationshipGraph<'a> {
    pub fn new(package: &'a mut Package, scope: RelationshipScope) -> Self {
        Self { package, scope }
    }

    /// Scope this graph is bound to
    pub fn scope(&self) -> &RelationshipScope {
        &self.scope
    }

    /// Current manifest; `None` when the manifest entry does not exist
    pub fn read(&self) -> Result<Option<Relationships>> {
        let uri = self.scope.manifest_uri();
        match self.package.archive().read_text(uri.entry_name())? {
            Some(xml) => Relationships::from_xml(xml).map(Some),
            None => Ok(None),
        }
    }

    fn write(&mut self, rels: &Relationships) -> Result<()> {
        let uri = self.scope.manifest_uri();
        let xml = rels.to_xml()?;
        self.package.archive_mut().write(uri.entry_name(), xml);
        Ok(())
    }

    /// Append an internal relationship.
    ///
    /// Fails with [`Error::DuplicateRelationshipId`] when `id` is already used
    /// in this manifest; nothing is written in that case.
    pub fn add_relationship(&mut self, id: &str, rel_type: &str, target: &str) -> Result<()> {
        self.add(id, rel_type, target, TargetMode::Internal)
    }

    /// Append an external relationship (hyperlinks and the like)
    pub fn add_external_relationship(
        &mut self,
        id: &str,
        rel_type: &str,
        target: &str,
    ) -> Result<()> {
        self.add(id, rel_type, target, TargetMode::External)
    }

    fn add(&mut self, id: &str, rel_type: &str, target: &str, mode: TargetMode) -> Result<()> {
        let manifest = self.scope.manifest_uri();
        let mut rels = self.read()?.unwrap_or_default();

        let added = rels.push(Relationship {
            id: id.to_string(),
            rel_type: rel_type.to_string(),
            target: target.to_string(),
            target_mode: mode,
        });
        if !added {
            return Err(Error::DuplicateRelationshipId {
                manifest: manifest.to_string(),
                id: id.to_string(),
            });
        }

        self.write(&rels)?;
        self.package.logger().info(format_args!(
            "Added relationship {} -> {} in {}",
            id, target, manifest
        ));
        Ok(())
    }

    /// Generate an unused id: `prefix` followed by one more than the largest
    /// trailing number among existing ids (`prefix1` for a missing manifest).
    pub fn gen_id(&self, prefix: &str) -> Result<String> {
        let id = match self.read()? {
            Some(rels) => rels.next_id(prefix).ok_or_else(|| {
                Error::Validation(format!(
                    "no relationship id left after the largest in {}",
                    self.scope.manifest_uri()
                ))
            })?,
            None => format!("{}1", prefix),
        };
        self.package.logger().debug(format_args!(
            "Allocated relationship id {} in {}",
            id,
            self.scope.manifest_uri()
        ));
        Ok(id)
    }

    /// Remove a relationship; absent ids are not an error
    pub fn remove_relationship(&mut self, id: &str) -> Result<bool> {
        let Some(mut rels) = self.read()? else {
            return Ok(false);
        };
        if rels.remove(id).is_none() {
            return Ok(false);
        }
        self.write(&rels)?;
        self.package.logger().info(format_args!(
            "Removed relationship {} from {}",
            id,
            self.scope.manifest_uri()
        ));
        Ok(true)
    }

    /// Get a relationship by id
    pub fn get(&self, id: &str) -> Result<Option<Relationship>> {
        Ok(self.read()?.and_then(|rels| rels.get(id).cloned()))
    }

    /// All relationships of a given type
    pub fn by_type(&self, rel_type: &str) -> Result<Vec<Relationship>> {
        Ok(self
            .read()?
            .map(|rels| rels.all_by_type(rel_type).into_iter().cloned().collect())
            .unwrap_or_default())
    }

    /// All relationships in manifest order
    pub fn all(&self) -> Result<Vec<Relationship>> {
        Ok(self
            .read()?
            .map(|rels| rels.iter().cloned().collect())
            .unwrap_or_default())
    }
}

fn trailing_number(id: &str) -> Option<u64> {
    let digits = id.len() - id.trim_end_matches(|c: char| c.is_ascii_digit()).len();
    id[id.len() - digits..].parse().ok()
}

/// Parse a single Relationship element
fn parse_relationship(element: &BytesStart) -> Result<Relationship> {
    let mut id = None;
    let mut rel_type = None;
    let mut target = None;
    let mut target_mode = TargetMode::Internal;

    for attr in element.attributes() {
        let attr = attr?;
        let key = attr.key.local_name();
        let value = attr.unescape_value()?.to_string();

        match key.as_ref() {
            b"Id" => id = Some(value),
            b"Type" => rel_type = Some(value),
            b"Target" => target = Some(value),
            b"TargetMode" => {
                if value == "External" {
                    target_mode = TargetMode::External;
                }
            }
            _ => {}
        }
    }

    let missing = |attr: &str| Error::MissingAttribute {
        element: "Relationship".into(),
        attr: attr.into(),
    };

    Ok(Relationship {
        id: id.ok_or_else(|| missing("Id"))?,
        rel_type: rel_type.ok_or_else(|| missing("Type"))?,
        target: target.ok_or_else(|| missing("Target"))?,
        target_mode,
    })
}

// Well-known relationship types
pub mod rel_types {
    pub const OFFICE_DOCUMENT: &str =
        "http://schemas.openxmlformats.org/officeDocument/2006/relationships/officeDocument";
    pub const STYLES: &str =
        "http://schemas.openxmlformats.org/officeDocument/2006/relationships/styles";
    pub const HEADER: &str =
        "http://schemas.openxmlformats.org/officeDocument/2006/relationships/header";
    pub const FOOTER: &str =
        "http://schemas.openxmlformats.org/officeDocument/2006/relationships/footer";
    pub const IMAGE: &str =
        "http://schemas.openxmlformats.org/officeDocument/2006/relationships/image";
    pub const HYPERLINK: &str =
        "http://schemas.openxmlformats.org/officeDocument/2006/relationships/hyperlink";
}
