//! # facturx
//!
//! French e-invoicing compliance and generation pipeline: rule-based
//! compliance scoring, Factur-X / Cross Industry Invoice XML generation,
//! PDF/A-3 assembly with embedded XML, and transmission tracking.
//!
//! All monetary values use [`rust_decimal::Decimal`] — never floating point.
//! The XML payload follows the UN/CEFACT CII data model as profiled by
//! Factur-X 1.0 and EN 16931.
//!
//! ## Pipeline
//!
//! ```rust
//! use chrono::NaiveDate;
//! use facturx::core::*;
//! use facturx::compliance;
//! use facturx::cii::{self, FacturXProfile};
//! use rust_decimal_macros::dec;
//!
//! let record = InvoiceRecordBuilder::new("2024-001")
//!     .issue_date(NaiveDate::from_ymd_opt(2024, 6, 15).unwrap())
//!     .supplier(
//!         TradePartyBuilder::new()
//!             .name("ACME SARL")
//!             .address("12 rue de la Paix")
//!             .city("Paris")
//!             .postal_code("75002")
//!             .siret("73282932000074")
//!             .build(),
//!     )
//!     .add_line(InvoiceLine::new("Prestation de conseil", dec!(2), dec!(50), Some(dec!(20))))
//!     .totals(dec!(100), dec!(20), dec!(120))
//!     .build();
//!
//! let report = compliance::evaluate(&record);
//! assert!(report.blockers.is_empty());
//!
//! let xml = cii::generate_xml(&record, FacturXProfile::En16931).unwrap();
//! assert!(cii::validate_xml(&xml).is_valid);
//! ```
//!
//! ## Feature Flags
//!
//! | Feature | Description |
//! |---------|-------------|
//! | `core` | Invoice record types, French identifier helpers |
//! | `compliance` | Rule-based compliance scoring engine |
//! | `cii` | Factur-X CII XML generation & structural validation |
//! | `pdf` | PDF/A-3 assembly with embedded XML |
//! | `transmission` | Delivery tracking state machine & retry scheduling |
//! | `all` (default) | Everything |

#[cfg(feature = "core")]
pub mod core;

#[cfg(feature = "compliance")]
pub mod compliance;

#[cfg(feature = "cii")]
pub mod cii;

#[cfg(feature = "pdf")]
pub mod pdf;

#[cfg(feature = "transmission")]
pub mod transmission;

// Re-export core types at crate root for convenience
#[cfg(feature = "core")]
pub use crate::core::*;
