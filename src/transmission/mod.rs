//! Transmission tracking with retry scheduling.
//!
//! Records the delivery lifecycle of each assembled document towards
//! its counterparty channel: status state machine, append-only status
//! history, transport error log, exponential-backoff retry scheduling,
//! filtering, aggregate statistics and CSV export.
//!
//! The tracker never performs network I/O; actually sending and
//! resending is an external transport's job, reporting outcomes back
//! through [`TransmissionTracker`] mutations.

mod csv_export;
mod record;
mod retry;
mod status;
mod tracker;

pub use record::{
    DeliveryError, ErrorSeverity, NewTransmission, StatusChange, TransmissionRecord,
};
pub use retry::RetryPolicy;
pub use status::TransmissionStatus;
pub use tracker::{TransmissionFilter, TransmissionStatistics, TransmissionTracker};
