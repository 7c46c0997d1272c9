use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use super::status::TransmissionStatus;

/// One appended entry in a record's status history.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StatusChange {
    /// `None` for the seeding entry.
    pub from: Option<TransmissionStatus>,
    pub to: TransmissionStatus,
    pub at: DateTime<Utc>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
pub enum ErrorSeverity {
    Warning,
    Error,
    Fatal,
}

/// A delivery failure reported by the external transport.
///
/// Recorded, never thrown; retry decisions are derived from this log.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DeliveryError {
    pub code: String,
    pub message: String,
    pub severity: ErrorSeverity,
    pub occurred_at: DateTime<Utc>,
}

/// Delivery-attempt lineage of one invoice towards one counterparty.
///
/// Mutated only through [`TransmissionTracker`](super::TransmissionTracker)
/// transitions; never deleted while retries remain possible.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TransmissionRecord {
    pub id: String,
    pub invoice_id: String,
    pub invoice_number: String,
    /// Counterparty channel, e.g. `chorus-pro`, `peppol`, `email`.
    pub channel: String,
    pub sender_id: String,
    pub recipient_id: String,
    pub status: TransmissionStatus,
    pub history: Vec<StatusChange>,
    pub errors: Vec<DeliveryError>,
    pub retry_count: u32,
    pub next_retry_at: Option<DateTime<Utc>>,
    pub submitted_at: Option<DateTime<Utc>>,
    pub delivered_at: Option<DateTime<Utc>>,
    pub acknowledged_at: Option<DateTime<Utc>>,
    pub amount: Option<Decimal>,
    pub currency: String,
}

impl TransmissionRecord {
    /// Timestamp of the seeding history entry.
    pub fn created_at(&self) -> Option<DateTime<Utc>> {
        self.history.first().map(|c| c.at)
    }

    /// Delivery latency in hours, when both endpoints are known.
    pub fn delivery_latency_hours(&self) -> Option<f64> {
        let submitted = self.submitted_at?;
        let delivered = self.delivered_at?;
        Some((delivered - submitted).num_seconds() as f64 / 3600.0)
    }
}

/// Input to [`record_transmission`](super::TransmissionTracker::record_transmission).
#[derive(Debug, Clone)]
pub struct NewTransmission {
    pub invoice_id: String,
    pub invoice_number: String,
    pub channel: String,
    pub sender_id: String,
    pub recipient_id: String,
    pub amount: Option<Decimal>,
    pub currency: String,
}
