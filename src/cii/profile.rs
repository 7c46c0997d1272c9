use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::core::FacturError;

/// Factur-X conformance profile selecting which CII fields are mandatory
/// and which guideline URN is declared.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum FacturXProfile {
    /// Basic with line items.
    Basic,
    /// Full EN 16931 European norm (recommended).
    En16931,
    /// Extended profile (beyond EN 16931).
    Extended,
}

impl FacturXProfile {
    /// The URN declared in `GuidelineSpecifiedDocumentContextParameter`.
    /// Part of the wire contract — must match the published identifiers
    /// byte-for-byte.
    pub fn urn(&self) -> &'static str {
        match self {
            Self::Basic => "urn:cen.eu:en16931:2017#compliant#urn:factur-x.eu:1p0:basic",
            Self::En16931 => "urn:cen.eu:en16931:2017",
            Self::Extended => "urn:cen.eu:en16931:2017#conformant#urn:factur-x.eu:1p0:extended",
        }
    }

    /// The XMP `fx:ConformanceLevel` value.
    pub fn conformance_level(&self) -> &'static str {
        match self {
            Self::Basic => "BASIC",
            Self::En16931 => "EN 16931",
            Self::Extended => "EXTENDED",
        }
    }

    /// The `AFRelationship` value for the PDF filespec.
    ///
    /// `Data` applies only to the line-less Minimum/BasicWL profiles,
    /// which this pipeline does not emit.
    pub fn af_relationship(&self) -> &'static str {
        "Alternative"
    }

    /// The external selector literal.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Basic => "BASIC",
            Self::En16931 => "EN16931",
            Self::Extended => "EXTENDED",
        }
    }
}

impl FromStr for FacturXProfile {
    type Err = FacturError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "BASIC" => Ok(Self::Basic),
            "EN16931" => Ok(Self::En16931),
            "EXTENDED" => Ok(Self::Extended),
            other => Err(FacturError::Xml(format!(
                "unknown conformance profile '{other}' (expected BASIC, EN16931 or EXTENDED)"
            ))),
        }
    }
}
