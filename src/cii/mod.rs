//! Factur-X Cross Industry Invoice XML generation and structural validation.
//!
//! Maps an [`InvoiceRecord`](crate::core::InvoiceRecord) onto the UN/CEFACT
//! CII tree under a selected Factur-X conformance profile. Missing legal
//! prerequisites abort generation with
//! [`FacturError::MissingMandatoryField`](crate::core::FacturError) — this
//! is the hard-failure channel, distinct from the advisory compliance
//! engine.

mod generate;
mod profile;
mod validate;
pub(crate) mod xml_utils;

pub use generate::generate_xml;
pub use profile::FacturXProfile;
pub use validate::{XmlCheck, validate_xml};

/// Legally mandated late-payment note on French B2B invoices
/// (art. L441-10 C. com.): 40 € recovery indemnity.
pub const LEGAL_PAYMENT_NOTE: &str =
    "En cas de retard de paiement, indemnité forfaitaire pour frais de recouvrement : 40 EUR";

/// CII namespace URIs.
pub mod cii_ns {
    pub const RSM: &str = "urn:un:unece:uncefact:data:standard:CrossIndustryInvoice:100";
    pub const RAM: &str =
        "urn:un:unece:uncefact:data:standard:ReusableAggregateBusinessInformationEntity:100";
    pub const QDT: &str = "urn:un:unece:uncefact:data:standard:QualifiedDataType:100";
    pub const UDT: &str = "urn:un:unece:uncefact:data:standard:UnqualifiedDataType:100";
}
