use std::collections::{BTreeMap, HashMap};

use chrono::{DateTime, Utc};

use super::record::{DeliveryError, ErrorSeverity, NewTransmission, StatusChange, TransmissionRecord};
use super::retry::RetryPolicy;
use super::status::TransmissionStatus;
use crate::core::FacturError;

/// In-memory transmission store keyed by record id.
///
/// All mutation goes through `&mut self`, which gives the
/// single-writer-per-key discipline the status history and retry
/// counters rely on. Reads hand out snapshots or borrows, never locks.
#[derive(Debug, Default)]
pub struct TransmissionTracker {
    records: HashMap<String, TransmissionRecord>,
    policy: RetryPolicy,
    next_seq: u64,
}

impl TransmissionTracker {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_policy(policy: RetryPolicy) -> Self {
        Self {
            policy,
            ..Self::default()
        }
    }

    pub fn policy(&self) -> &RetryPolicy {
        &self.policy
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn get(&self, id: &str) -> Option<&TransmissionRecord> {
        self.records.get(id)
    }

    /// Create a record for a fresh delivery attempt, seeding its
    /// single-entry status history. Returns the assigned id.
    pub fn record_transmission(&mut self, new: NewTransmission, now: DateTime<Utc>) -> String {
        self.next_seq += 1;
        let id = format!("TX-{:06}", self.next_seq);
        let record = TransmissionRecord {
            id: id.clone(),
            invoice_id: new.invoice_id,
            invoice_number: new.invoice_number,
            channel: new.channel,
            sender_id: new.sender_id,
            recipient_id: new.recipient_id,
            status: TransmissionStatus::Pending,
            history: vec![StatusChange {
                from: None,
                to: TransmissionStatus::Pending,
                at: now,
            }],
            errors: Vec::new(),
            retry_count: 0,
            next_retry_at: None,
            submitted_at: None,
            delivered_at: None,
            acknowledged_at: None,
            amount: new.amount,
            currency: new.currency,
        };
        self.records.insert(id.clone(), record);
        id
    }

    /// Move a record to `status`.
    ///
    /// A same-status update is a silent no-op. Otherwise the transition
    /// must be allowed by the state machine; terminal states reject
    /// everything. The submitted/delivered/acknowledged timestamps are
    /// set the first time each status is reached and never overwritten.
    pub fn update_status(
        &mut self,
        id: &str,
        status: TransmissionStatus,
        now: DateTime<Utc>,
    ) -> Result<(), FacturError> {
        let record = self.get_mut(id)?;
        if record.status == status {
            return Ok(());
        }
        if !record.status.can_transition_to(status) {
            return Err(FacturError::InvalidTransition {
                from: record.status.as_str(),
                to: status.as_str(),
            });
        }

        record.history.push(StatusChange {
            from: Some(record.status),
            to: status,
            at: now,
        });
        record.status = status;

        match status {
            TransmissionStatus::Submitted if record.submitted_at.is_none() => {
                record.submitted_at = Some(now);
            }
            TransmissionStatus::Delivered if record.delivered_at.is_none() => {
                record.delivered_at = Some(now);
            }
            TransmissionStatus::Acknowledged if record.acknowledged_at.is_none() => {
                record.acknowledged_at = Some(now);
            }
            _ => {}
        }
        Ok(())
    }

    /// Append a transport-reported failure to the record's error log.
    pub fn record_error(
        &mut self,
        id: &str,
        code: impl Into<String>,
        message: impl Into<String>,
        severity: ErrorSeverity,
        occurred_at: DateTime<Utc>,
    ) -> Result<(), FacturError> {
        let record = self.get_mut(id)?;
        record.errors.push(DeliveryError {
            code: code.into(),
            message: message.into(),
            severity,
            occurred_at,
        });
        Ok(())
    }

    /// Count a retry attempt against the record.
    ///
    /// At the attempt cap the record is forced to terminal `failed` with
    /// the retry schedule cleared; below it, the next retry timestamp is
    /// scheduled from the policy's backoff.
    pub fn mark_retried(&mut self, id: &str, now: DateTime<Utc>) -> Result<(), FacturError> {
        let policy = self.policy.clone();
        let record = self
            .records
            .get_mut(id)
            .ok_or_else(|| FacturError::UnknownRecord(id.to_string()))?;

        record.retry_count += 1;
        if record.retry_count >= policy.max_attempts {
            if record.status != TransmissionStatus::Failed {
                record.history.push(StatusChange {
                    from: Some(record.status),
                    to: TransmissionStatus::Failed,
                    at: now,
                });
                record.status = TransmissionStatus::Failed;
            }
            record.next_retry_at = None;
        } else {
            record.next_retry_at = Some(now + policy.delay_for(record.retry_count));
        }
        Ok(())
    }

    /// Snapshot of the records whose scheduled retry is due.
    ///
    /// A polling read for an external scheduler; holds no claim on the
    /// returned records.
    pub fn records_needing_retry(&self, now: DateTime<Utc>) -> Vec<&TransmissionRecord> {
        self.records
            .values()
            .filter(|r| r.next_retry_at.is_some_and(|at| at <= now))
            .filter(|r| self.policy.is_retry_eligible(r))
            .collect()
    }

    pub fn filter(&self, filter: &TransmissionFilter) -> Vec<&TransmissionRecord> {
        let mut out: Vec<&TransmissionRecord> = self
            .records
            .values()
            .filter(|r| filter.matches(r))
            .collect();
        out.sort_by(|a, b| a.id.cmp(&b.id));
        out
    }

    /// Aggregate statistics, computed on demand from the record set.
    pub fn statistics(&self) -> TransmissionStatistics {
        let total = self.records.len();

        let mut by_status: BTreeMap<&'static str, usize> = BTreeMap::new();
        let mut by_channel: BTreeMap<String, usize> = BTreeMap::new();
        let mut successes = 0usize;
        let mut latencies = Vec::new();
        let mut reasons: HashMap<&str, usize> = HashMap::new();

        for r in self.records.values() {
            *by_status.entry(r.status.as_str()).or_default() += 1;
            *by_channel.entry(r.channel.clone()).or_default() += 1;
            if r.status.is_success() {
                successes += 1;
            }
            if let Some(h) = r.delivery_latency_hours() {
                latencies.push(h);
            }
            for e in &r.errors {
                *reasons.entry(e.message.as_str()).or_default() += 1;
            }
        }

        let mut failure_reasons: Vec<(String, usize)> = reasons
            .into_iter()
            .map(|(m, n)| (m.to_string(), n))
            .collect();
        failure_reasons.sort_by(|a, b| b.1.cmp(&a.1).then_with(|| a.0.cmp(&b.0)));

        TransmissionStatistics {
            total,
            by_status,
            by_channel,
            success_rate: if total == 0 {
                0.0
            } else {
                successes as f64 / total as f64
            },
            mean_delivery_latency_hours: if latencies.is_empty() {
                None
            } else {
                Some(latencies.iter().sum::<f64>() / latencies.len() as f64)
            },
            failure_reasons,
        }
    }

    /// CSV export of all records, ordered by id.
    pub fn export_csv(&self) -> String {
        let mut records: Vec<&TransmissionRecord> = self.records.values().collect();
        records.sort_by(|a, b| a.id.cmp(&b.id));
        super::csv_export::export(&records)
    }

    fn get_mut(&mut self, id: &str) -> Result<&mut TransmissionRecord, FacturError> {
        self.records
            .get_mut(id)
            .ok_or_else(|| FacturError::UnknownRecord(id.to_string()))
    }
}

/// Predicate set for [`TransmissionTracker::filter`]; unset fields match
/// everything.
#[derive(Debug, Clone, Default)]
pub struct TransmissionFilter {
    pub statuses: Option<Vec<TransmissionStatus>>,
    pub channel: Option<String>,
    /// Inclusive range over the record creation timestamp.
    pub from: Option<DateTime<Utc>>,
    pub to: Option<DateTime<Utc>>,
    pub invoice_number_contains: Option<String>,
}

impl TransmissionFilter {
    fn matches(&self, record: &TransmissionRecord) -> bool {
        if let Some(statuses) = &self.statuses {
            if !statuses.contains(&record.status) {
                return false;
            }
        }
        if let Some(channel) = &self.channel {
            if &record.channel != channel {
                return false;
            }
        }
        if self.from.is_some() || self.to.is_some() {
            let Some(created) = record.created_at() else {
                return false;
            };
            if self.from.is_some_and(|f| created < f) {
                return false;
            }
            if self.to.is_some_and(|t| created > t) {
                return false;
            }
        }
        if let Some(needle) = &self.invoice_number_contains {
            if !record.invoice_number.contains(needle.as_str()) {
                return false;
            }
        }
        true
    }
}

/// On-demand aggregate over the whole store.
#[derive(Debug, Clone)]
pub struct TransmissionStatistics {
    pub total: usize,
    pub by_status: BTreeMap<&'static str, usize>,
    pub by_channel: BTreeMap<String, usize>,
    /// (delivered + acknowledged) ÷ total, 0.0 on an empty store.
    pub success_rate: f64,
    pub mean_delivery_latency_hours: Option<f64>,
    /// Error messages ranked by frequency, most frequent first.
    pub failure_reasons: Vec<(String, usize)>,
}
