//! Core invoice record types and French identifier helpers.
//!
//! The [`InvoiceRecord`] is the canonical unit processed by the whole
//! pipeline: produced once per document run by upstream extraction or
//! manual entry, then treated as immutable input. Corrections produce a
//! new record, never in-place mutation of a record already scored.

mod builder;
mod error;
mod format;
mod identifiers;
mod types;

pub use builder::*;
pub use error::*;
pub use format::*;
pub use identifiers::*;
pub use types::*;
