//! Delivery outcomes and per-event dispositions.

use serde::{Deserialize, Serialize};

use crate::constants::TRANSPORT_FAILURE_STATUS;
use crate::impl_label_conversions;

/// Status of a single delivery attempt.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", content = "code", rename_all = "snake_case")]
pub enum DeliveryStatus {
    /// The endpoint answered; carries the HTTP status code.
    Http(u16),
    /// No HTTP response was obtained (connect error, timeout, broken body).
    TransportFailure,
}

impl DeliveryStatus {
    /// HTTP code, or the failure sentinel for transport errors.
    pub fn code(self) -> u16 {
        match self {
            Self::Http(code) => code,
            Self::TransportFailure => TRANSPORT_FAILURE_STATUS,
        }
    }

    pub fn is_success(self) -> bool {
        matches!(self, Self::Http(code) if (200..300).contains(&code))
    }
}

/// Outcome of one delivery attempt. Consumed only for logging.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DeliveryResult {
    pub status: DeliveryStatus,
    pub body: String,
}

impl DeliveryResult {
    pub fn http(code: u16, body: impl Into<String>) -> Self {
        Self { status: DeliveryStatus::Http(code), body: body.into() }
    }

    pub fn transport_failure(message: impl Into<String>) -> Self {
        Self { status: DeliveryStatus::TransportFailure, body: message.into() }
    }

    pub fn is_transport_failure(&self) -> bool {
        self.status == DeliveryStatus::TransportFailure
    }
}

/// Label of a disposition, as written to the log sink.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DispositionKind {
    SkippedWindow,
    SkippedMissingField,
    SkippedDuplicate,
    Delivered,
    DeliveryFailed,
}

impl_label_conversions!(DispositionKind {
    SkippedWindow => "skipped-window",
    SkippedMissingField => "skipped-missing-field",
    SkippedDuplicate => "skipped-duplicate",
    Delivered => "delivered",
    DeliveryFailed => "delivery-failed",
});

/// What happened to one event during a pipeline run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Disposition {
    /// No start time, or start outside the lead window.
    SkippedWindow,
    /// Eligible, but `Name:` or `Phone:` missing from the description.
    SkippedMissingField,
    /// Already delivered in an earlier run (only with the delivery ledger).
    SkippedDuplicate,
    /// The endpoint answered with `status`.
    Delivered { status: u16 },
    /// Transport failure; `error` is the client's message.
    DeliveryFailed { error: String },
}

impl Disposition {
    pub fn kind(&self) -> DispositionKind {
        match self {
            Self::SkippedWindow => DispositionKind::SkippedWindow,
            Self::SkippedMissingField => DispositionKind::SkippedMissingField,
            Self::SkippedDuplicate => DispositionKind::SkippedDuplicate,
            Self::Delivered { .. } => DispositionKind::Delivered,
            Self::DeliveryFailed { .. } => DispositionKind::DeliveryFailed,
        }
    }

    pub fn from_delivery(result: &DeliveryResult) -> Self {
        match result.status {
            DeliveryStatus::Http(status) => Self::Delivered { status },
            DeliveryStatus::TransportFailure => Self::DeliveryFailed { error: result.body.clone() },
        }
    }

    /// Status code for delivery dispositions; the sentinel for failures.
    pub fn status_code(&self) -> Option<u16> {
        match self {
            Self::Delivered { status } => Some(*status),
            Self::DeliveryFailed { .. } => Some(TRANSPORT_FAILURE_STATUS),
            _ => None,
        }
    }
}

/// One log line worth of information about a processed event.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DispositionRecord {
    pub event_id: String,
    pub summary: String,
    pub disposition: Disposition,
}

/// Dispositions of a single pipeline run, in input order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RunReport {
    pub records: Vec<DispositionRecord>,
}

impl RunReport {
    pub fn count(&self, kind: DispositionKind) -> usize {
        self.records.iter().filter(|record| record.disposition.kind() == kind).count()
    }

    pub fn delivered(&self) -> usize {
        self.count(DispositionKind::Delivered)
    }

    pub fn failed(&self) -> usize {
        self.count(DispositionKind::DeliveryFailed)
    }

    pub fn skipped(&self) -> usize {
        self.records.len() - self.delivered() - self.failed()
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}
