//! Part names inside an OPC package

use crate::error::{Error, Result};
use std::fmt;

/// Represents a URI to a part within an OPC package.
///
/// Part URIs are always absolute paths starting with '/'.
/// Example: `/word/document.xml`. The matching archive entry name is the same
/// path without the leading slash (see [`PartUri::entry_name`]).
#[derive(Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct PartUri {
    path: String,
}

impl PartUri {
    /// Create a new PartUri from a string.
    ///
    /// The path will be normalized (leading '/' ensured, no trailing '/').
    pub fn new(path: &str) -> Result<Self> {
        let path = path.trim();

        if path.is_empty() || path == "/" {
            return Err(Error::InvalidPartUri("empty path".into()));
        }

        let normalized = if path.starts_with('/') {
            path.to_string()
        } else {
            format!("/{}", path)
        };

        let normalized = normalized.trim_end_matches('/').to_string();

        if normalized.contains("//") {
            return Err(Error::InvalidPartUri(format!(
                "invalid path '{}': contains double slashes",
                path
            )));
        }

        Ok(Self { path: normalized })
    }

    /// Create PartUri without validation (for internal use)
    pub(crate) fn from_string_unchecked(path: String) -> Self {
        Self { path }
    }

    /// Get the path as a string slice
    pub fn as_str(&self) -> &str {
        &self.path
    }

    /// Archive entry name (path without the leading '/')
    pub fn entry_name(&self) -> &str {
        &self.path[1..]
    }

    /// Get the file name portion
    pub fn file_name(&self) -> &str {
        self.path.rsplit('/').next().unwrap_or_default()
    }

    /// Get the file extension
    pub fn extension(&self) -> Option<&str> {
        self.file_name()
            .rsplit_once('.')
            .map(|(_, ext)| ext)
            .filter(|ext| !ext.is_empty())
    }

    /// Get the parent directory URI
    pub fn parent(&self) -> Option<PartUri> {
        let pos = self.path.rfind('/')?;
        if pos == 0 {
            None
        } else {
            Some(PartUri {
                path: self.path[..pos].to_string(),
            })
        }
    }

    /// Get the relationships URI for this part.
    ///
    /// For `/word/document.xml`, returns `/word/_rels/document.xml.rels`
    pub fn relationships_uri(&self) -> PartUri {
        let parent = self.parent().map(|p| p.path).unwrap_or_default();
        PartUri {
            path: format!("{}/_rels/{}.rels", parent, self.file_name()),
        }
    }

    /// Resolve a relationship target against this part.
    ///
    /// For `/word/document.xml` and `../media/image1.png`, returns `/media/image1.png`
    pub fn resolve(&self, relative: &str) -> Result<PartUri> {
        if relative.starts_with('/') {
            return PartUri::new(relative);
        }

        let base_dir = self.parent().map(|p| p.path).unwrap_or_default();
        let mut parts: Vec<&str> = base_dir.split('/').filter(|s| !s.is_empty()).collect();

        for segment in relative.split('/') {
            match segment {
                "" | "." => continue,
                ".." => {
                    parts.pop();
                }
                s => parts.push(s),
            }
        }

        PartUri::new(&format!("/{}", parts.join("/")))
    }

    /// Path of `target` relative to this part's folder, as written into a
    /// relationship's `Target` attribute.
    ///
    /// For `/word/document.xml` and `/word/header1.xml`, returns `header1.xml`
    pub fn relative_target(&self, target: &PartUri) -> String {
        let base = self.parent().map(|p| p.path).unwrap_or_default();
        match target.path.strip_prefix(&format!("{}/", base)) {
            Some(rest) if !base.is_empty() => rest.to_string(),
            _ => target.path.clone(),
        }
    }

    /// Check if this URI points to a relationships file
    pub fn is_relationships(&self) -> bool {
        self.path.contains("/_rels/") && self.path.ends_with(".rels")
    }

    /// Part owning this relationships file.
    ///
    /// For `/word/_rels/document.xml.rels`, returns `/word/document.xml`.
    /// The package-level `/_rels/.rels` has no owning part.
    pub fn source_part(&self) -> Option<PartUri> {
        let rels_dir = self.parent()?;
        if rels_dir.file_name() != "_rels" {
            return None;
        }
        let file = self.file_name().strip_suffix(".rels")?;
        if file.is_empty() {
            return None;
        }
        let dir = rels_dir.parent().map(|p| p.path).unwrap_or_default();
        Some(PartUri {
            path: format!("{}/{}", dir, file),
        })
    }
}

impl fmt::Display for PartUri {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.path)
    }
}

impl std::str::FromStr for PartUri {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        PartUri::new(s)
    }
}

/// Well-known part URIs
pub mod well_known {
    use super::PartUri;

    pub fn content_types() -> PartUri {
        PartUri::from_string_unchecked("/[Content_Types].xml".into())
    }

    pub fn package_rels() -> PartUri {
        PartUri::from_string_unchecked("/_rels/.rels".into())
    }

    pub fn document() -> PartUri {
        PartUri::from_string_unchecked("/word/document.xml".into())
    }

    pub fn document_rels() -> PartUri {
        PartUri::from_string_unchecked("/word/_rels/document.xml.rels".into())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_with_leading_slash() {
        let uri = PartUri::new("/word/document.xml").unwrap();
        assert_eq!(uri.as_str(), "/word/document.xml");
        assert_eq!(uri.entry_name(), "word/document.xml");
    }

    #[test]
    fn test_new_without_leading_slash() {
        let uri = PartUri::new("word/document.xml").unwrap();
        assert_eq!(uri.as_str(), "/word/document.xml");
    }

    #[test]
    fn test_rejects_empty() {
        assert!(PartUri::new("  ").is_err());
        assert!(PartUri::new("/").is_err());
        assert!(PartUri::new("word//a.xml").is_err());
    }

    #[test]
    fn test_file_name_and_extension() {
        let uri = PartUri::new("/word/document.xml").unwrap();
        assert_eq!(uri.file_name(), "document.xml");
        assert_eq!(uri.extension(), Some("xml"));

        let rels = well_known::package_rels();
        assert_eq!(rels.file_name(), ".rels");
        assert_eq!(rels.extension(), Some("rels"));
    }

    #[test]
    fn test_relationships_uri() {
        let uri = PartUri::new("/word/document.xml").unwrap();
        assert_eq!(uri.relationships_uri(), well_known::document_rels());
    }

    #[test]
    fn test_resolve_relative() {
        let uri = well_known::document();
        assert_eq!(uri.resolve("../media/image1.png").unwrap().as_str(), "/media/image1.png");
        assert_eq!(uri.resolve("header1.xml").unwrap().as_str(), "/word/header1.xml");
    }

    #[test]
    fn test_relative_target() {
        let doc = well_known::document();
        let header = PartUri::new("word/header3.xml").unwrap();
        assert_eq!(doc.relative_target(&header), "header3.xml");

        let core = PartUri::new("docProps/core.xml").unwrap();
        assert_eq!(doc.relative_target(&core), "/docProps/core.xml");
    }

    #[test]
    fn test_is_relationships() {
        assert!(well_known::document_rels().is_relationships());
        assert!(!well_known::document().is_relationships());
    }

    #[test]
    fn test_source_part() {
        let rels = PartUri::new("/word/_rels/document.xml.rels").unwrap();
        assert_eq!(rels.source_part().unwrap().as_str(), "/word/document.xml");

        let root_part = PartUri::new("/_rels/foo.xml.rels").unwrap();
        assert_eq!(root_part.source_part().unwrap().as_str(), "/foo.xml");

        assert_eq!(well_known::package_rels().source_part(), None);
        assert_eq!(well_known::document().source_part(), None);
    }
}
