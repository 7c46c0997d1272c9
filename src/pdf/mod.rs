//! PDF/A-3 assembly with embedded Factur-X XML.
//!
//! Takes the generated CII XML and produces the final hybrid document:
//! a visual rendition (the caller's original PDF, or a synthesized
//! one-page layout) dressed up as PDF/A-3 with the XML attached as
//! `factur-x.xml`, XMP metadata declaring the conformance level, and a
//! self-check report over the serialized bytes.

mod assemble;
mod attach;
mod extract;
mod layout;
mod xmp;

pub use assemble::{
    AssembleOptions, DocumentCompliance, DocumentInfo, DocumentMetadata, GeneratedDocument,
    assemble,
};
pub use attach::AttachmentBuilder;
pub use extract::extract_xml;

/// The embedded XML filename per Factur-X 1.0+ specification.
pub const FACTURX_FILENAME: &str = "factur-x.xml";
