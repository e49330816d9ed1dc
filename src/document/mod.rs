//! Document model - typed views over the WordprocessingML tree
//!
//! Paragraphs and runs are built from [`RawXmlElement`](crate::xml::RawXmlElement)
//! nodes and converted back, so anything the model does not understand
//! survives a round-trip untouched.

mod body;
mod paragraph;
mod run;
mod section;

pub use body::{
    body, body_mut, insert_paragraph, insert_paragraph_element, paragraphs,
    replace_paragraph_element,
};
pub use paragraph::{
    extract_paragraph_ids, generate_unique_paragraph_id, Hyperlink, Paragraph, ParagraphContent,
    SimpleField,
};
pub use run::{BreakType, Run, RunContent};
pub use section::{
    add_reference, all_section_properties, ensure_section_properties, references,
    remove_references, ReferenceKind, SectionReference,
};
