//! Part managers
//!
//! Each manager borrows the [`Package`](crate::opc::Package) mutably for as
//! long as it lives and keeps every manifest it touches consistent.

mod document;
mod header_footer;

pub use document::DocumentManager;
pub use header_footer::{AddedPart, HeaderFooterKind, HeaderFooterManager};
