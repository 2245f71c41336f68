use std::collections::HashSet;
use std::sync::{Arc, Mutex};
use std::time::Duration;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use eventrelay_core::{Clock, ContactDelivery, DeliveryLedger, DispositionSink};
use eventrelay_domain::{Contact, DeliveryResult, DispositionRecord};

/// Clock pinned to a single instant.
pub struct FixedClock(pub DateTime<Utc>);

impl FixedClock {
    pub fn at(rfc3339: &str) -> Arc<Self> {
        let instant = DateTime::parse_from_rfc3339(rfc3339).unwrap().with_timezone(&Utc);
        Arc::new(Self(instant))
    }
}

impl Clock for FixedClock {
    fn now(&self) -> DateTime<Utc> {
        self.0
    }
}

/// Delivery double that records every contact and answers with a scripted
/// result.
#[derive(Clone)]
pub struct RecordingDelivery {
    calls: Arc<Mutex<Vec<Contact>>>,
    response: DeliveryResult,
    delay: Option<Duration>,
}

impl RecordingDelivery {
    pub fn responding(response: DeliveryResult) -> Arc<Self> {
        Arc::new(Self { calls: Arc::default(), response, delay: None })
    }

    pub fn ok() -> Arc<Self> {
        Self::responding(DeliveryResult::http(200, "{\"ok\":true}"))
    }

    /// Each delivery sleeps for `delay` before answering.
    pub fn slow(delay: Duration) -> Arc<Self> {
        Arc::new(Self {
            calls: Arc::default(),
            response: DeliveryResult::http(200, "ok"),
            delay: Some(delay),
        })
    }

    pub fn calls(&self) -> Vec<Contact> {
        self.calls.lock().unwrap().clone()
    }
}

#[async_trait]
impl ContactDelivery for RecordingDelivery {
    async fn deliver(&self, contact: &Contact) -> DeliveryResult {
        self.calls.lock().unwrap().push(contact.clone());
        if let Some(delay) = self.delay {
            tokio::time::sleep(delay).await;
        }
        self.response.clone()
    }
}

/// Sink that keeps every record in memory.
#[derive(Default)]
pub struct RecordingSink {
    records: Mutex<Vec<DispositionRecord>>,
}

impl RecordingSink {
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    pub fn records(&self) -> Vec<DispositionRecord> {
        self.records.lock().unwrap().clone()
    }
}

impl DispositionSink for RecordingSink {
    fn record(&self, record: &DispositionRecord) {
        self.records.lock().unwrap().push(record.clone());
    }
}

/// Ledger backed by a plain set.
#[derive(Default)]
pub struct InMemoryLedger {
    delivered: Mutex<HashSet<String>>,
}

impl InMemoryLedger {
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    pub fn contains(&self, event_id: &str) -> bool {
        self.delivered.lock().unwrap().contains(event_id)
    }
}

#[async_trait]
impl DeliveryLedger for InMemoryLedger {
    async fn is_delivered(&self, event_id: &str) -> bool {
        self.contains(event_id)
    }

    async fn mark_delivered(&self, event_id: &str) {
        self.delivered.lock().unwrap().insert(event_id.to_string());
    }
}
