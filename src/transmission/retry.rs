use chrono::Duration;

use super::record::TransmissionRecord;
use super::status::TransmissionStatus;

/// Exponential-backoff retry policy.
///
/// A pure evaluator over a record's immutable history; scheduling
/// fields (`retry_count`, `next_retry_at`) are only ever written by
/// tracker mutations.
#[derive(Debug, Clone)]
pub struct RetryPolicy {
    pub max_attempts: u32,
    pub initial_delay_secs: u64,
    pub backoff_multiplier: f64,
    pub max_delay_secs: u64,
    /// Error codes that make a record retryable even outside `failed`.
    pub retryable_codes: Vec<String>,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            max_attempts: 3,
            initial_delay_secs: 300,
            backoff_multiplier: 2.0,
            max_delay_secs: 7200,
            retryable_codes: vec![
                "TIMEOUT".to_string(),
                "NETWORK_ERROR".to_string(),
                "SERVICE_UNAVAILABLE".to_string(),
            ],
        }
    }
}

impl RetryPolicy {
    /// Delay before the next attempt after `retry_count` retries:
    /// `min(initial × multiplier^count, max)`.
    pub fn delay_for(&self, retry_count: u32) -> Duration {
        let raw = self.initial_delay_secs as f64 * self.backoff_multiplier.powi(retry_count as i32);
        let capped = raw.min(self.max_delay_secs as f64);
        Duration::seconds(capped as i64)
    }

    /// Whether the record may still be retried: it failed or logged a
    /// retryable error code, and attempts remain.
    pub fn is_retry_eligible(&self, record: &TransmissionRecord) -> bool {
        if record.retry_count >= self.max_attempts {
            return false;
        }
        record.status == TransmissionStatus::Failed
            || record
                .errors
                .iter()
                .any(|e| self.retryable_codes.iter().any(|c| c == &e.code))
    }
}
