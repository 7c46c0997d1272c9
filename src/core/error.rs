use thiserror::Error;

/// Errors that can occur during document generation or tracking.
///
/// Compliance findings are never represented here — a non-compliant
/// report is a successful call. Only generation preconditions and
/// structural failures surface as errors.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum FacturError {
    /// A legally mandated field is absent; no document may be emitted.
    #[error("missing mandatory field: {field}")]
    MissingMandatoryField { field: &'static str },

    /// XML generation or parsing error.
    #[error("XML error: {0}")]
    Xml(String),

    /// PDF loading, mutation, or serialization error.
    #[error("PDF error: {0}")]
    Pdf(String),

    /// Transmission status transition not permitted by the state machine.
    #[error("invalid status transition: {from} -> {to}")]
    InvalidTransition { from: &'static str, to: &'static str },

    /// Transmission record lookup failure.
    #[error("unknown transmission record: {0}")]
    UnknownRecord(String),
}

impl FacturError {
    pub(crate) fn missing(field: &'static str) -> Self {
        Self::MissingMandatoryField { field }
    }
}
