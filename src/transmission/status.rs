use serde::{Deserialize, Serialize};

/// Lifecycle state of one transmission.
///
/// `pending → submitted → {delivered, acknowledged, rejected, failed,
/// cancelled}`. Delivered and acknowledged are terminal-success;
/// rejected and cancelled are terminal; failed is retryable.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum TransmissionStatus {
    Pending,
    Submitted,
    Delivered,
    Acknowledged,
    Rejected,
    Failed,
    Cancelled,
}

impl TransmissionStatus {
    pub fn is_terminal(&self) -> bool {
        matches!(
            self,
            Self::Delivered | Self::Acknowledged | Self::Rejected | Self::Cancelled
        )
    }

    pub fn is_success(&self) -> bool {
        matches!(self, Self::Delivered | Self::Acknowledged)
    }

    /// Whether the state machine allows moving to `target`.
    ///
    /// Self-transitions are not allowed; the tracker treats a
    /// same-status update as a no-op before asking.
    pub fn can_transition_to(&self, target: TransmissionStatus) -> bool {
        use TransmissionStatus::*;
        match self {
            Pending => matches!(target, Submitted | Failed | Cancelled),
            Submitted => matches!(target, Delivered | Acknowledged | Rejected | Failed | Cancelled),
            // Retryable: a retry resubmits.
            Failed => matches!(target, Submitted | Cancelled),
            Delivered | Acknowledged | Rejected | Cancelled => false,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Pending => "pending",
            Self::Submitted => "submitted",
            Self::Delivered => "delivered",
            Self::Acknowledged => "acknowledged",
            Self::Rejected => "rejected",
            Self::Failed => "failed",
            Self::Cancelled => "cancelled",
        }
    }
}

impl std::fmt::Display for TransmissionStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}
