//! # docx-parts-engine
//!
//! Edit DOCX packages part by part while keeping their manifests consistent.
//!
//! ## Features
//!
//! - Add, list and remove headers and footers, wired through relationships,
//!   content types and section properties
//! - Paragraph text extraction, replacement and insertion
//! - Round-trip preservation (unknown elements are kept intact)
//! - Consistency check for broken part/manifest links
//! - Injectable logging through any [`log::Log`] implementation
//!
//! ## Quick Start
//!
//! ```rust,ignore
//! use docx_parts_engine::Engine;
//!
//! let mut engine = Engine::open("example.docx")?;
//!
//! // Add a header shown on every page
//! let added = engine.header().add("Conclusion")?;
//! println!("{} wired as {}", added.part, added.rel_id);
//!
//! // Read paragraphs
//! for text in engine.document().paragraph_texts()? {
//!     println!("{}", text);
//! }
//!
//! engine.save("output.docx")?;
//! ```

pub mod document;
pub mod engine;
pub mod error;
pub mod logging;
pub mod opc;
pub mod parts;
pub mod xml;

pub use document::{Paragraph, ReferenceKind, Run};
pub use engine::{ConsistencyIssue, Engine, EngineOptions};
pub use error::{Error, Result};
pub use logging::Logger;
pub use opc::{Archive, Package, PartUri};
pub use parts::{AddedPart, DocumentManager, HeaderFooterKind, HeaderFooterManager};
