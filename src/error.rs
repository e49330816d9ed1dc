//! Error types for docx-parts-engine

use thiserror::Error;

/// Main error type
#[derive(Debug, Error)]
pub enum Error {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("ZIP error: {0}")]
    Zip(#[from] zip::result::ZipError),

    #[error("XML error: {0}")]
    Xml(#[from] quick_xml::Error),

    #[error("XML escape error: {0}")]
    XmlEscape(#[from] quick_xml::escape::EscapeError),

    #[error("XML attribute error: {0}")]
    XmlAttr(#[from] quick_xml::events::attributes::AttrError),

    #[error("UTF-8 error: {0}")]
    Utf8(#[from] std::str::Utf8Error),

    #[error("Package not found: {0}")]
    NotFound(String),

    #[error("Corrupt archive: {0}")]
    CorruptArchive(String),

    #[error("Missing required part: {0}")]
    MissingPart(String),

    #[error("Malformed XML: {0}")]
    MalformedXml(String),

    #[error("Validation failed: {0}")]
    Validation(String),

    #[error("Invalid part URI: {0}")]
    InvalidPartUri(String),

    #[error("Relationship id '{id}' already exists in {manifest}")]
    DuplicateRelationshipId { manifest: String, id: String },

    #[error("Missing attribute '{attr}' on element '{element}'")]
    MissingAttribute { element: String, attr: String },
}

/// Result type alias
pub type Result<T> = std::result::Result<T, Error>;
