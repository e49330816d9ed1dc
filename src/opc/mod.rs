//! Open Packaging Convention (OPC) implementation
//!
//! This module handles the ZIP-based package format used by DOCX files and
//! the two manifests that keep its parts consistent.

mod archive;
mod content_types;
mod package;
mod part_uri;
mod relationships;

pub use archive::Archive;
pub use content_types::{
    generate_unique_part_name, ContentTypeDefault, ContentTypeOverride, ContentTypeRegistry,
    ContentTypes, FOOTER, HEADER, MAIN_DOCUMENT, RELATIONSHIPS, STYLES, XML,
};
pub use package::Package;
pub use part_uri::{well_known, PartUri};
pub use relationships::{
    rel_types, Relationship, RelationshipGraph, RelationshipScope, Relationships, TargetMode,
};
