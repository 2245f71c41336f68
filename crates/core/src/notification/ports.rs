//! Port interfaces for the notification pipeline
//!
//! These traits define the boundaries between the pipeline and the
//! infrastructure that delivers, records and remembers.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use eventrelay_domain::{Contact, DeliveryResult, DispositionRecord};

/// Sends one contact record to the remote endpoint.
#[async_trait]
pub trait ContactDelivery: Send + Sync {
    /// Attempt delivery exactly once.
    ///
    /// Transport failures are folded into the returned [`DeliveryResult`];
    /// implementations never fail past this boundary.
    async fn deliver(&self, contact: &Contact) -> DeliveryResult;
}

/// Receives one record per processed event.
pub trait DispositionSink: Send + Sync {
    fn record(&self, record: &DispositionRecord);
}

/// Remembers which events were already delivered.
///
/// Optional: without a ledger every run is independent and an event that
/// stays inside the lead window across two polls is delivered twice.
#[async_trait]
pub trait DeliveryLedger: Send + Sync {
    async fn is_delivered(&self, event_id: &str) -> bool;

    async fn mark_delivered(&self, event_id: &str);
}

/// Source of "now" for the lead-window check.
pub trait Clock: Send + Sync {
    fn now(&self) -> DateTime<Utc>;
}

/// Wall clock
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> DateTime<Utc> {
        Utc::now()
    }
}
