//! XML codec: order-preserving text <-> tree conversion for package parts

mod namespace;
mod raw;

pub use namespace::*;
pub use raw::{local_name, RawXmlElement, RawXmlNode};

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_local_name() {
        assert_eq!(local_name("w:sectPr"), "sectPr");
        assert_eq!(local_name("Relationship"), "Relationship");
    }

    #[test]
    fn test_namespace_constants() {
        assert!(W.contains("wordprocessingml"));
        assert!(R.contains("relationships"));
        assert!(header_footer_namespaces()
            .iter()
            .any(|(prefix, uri)| *prefix == "xmlns:w14" && *uri == W14));
    }
}
