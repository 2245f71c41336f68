//! Delivery ledger with moka
//!
//! Remembers event ids that were delivered successfully so later polls skip
//! them. Entries expire after a TTL measured from insertion; with the
//! default 25 h an event cannot leave and re-enter the lead window while
//! still remembered.
//!
//! The ledger is in-memory only. A restart forgets everything.

use std::time::Duration;

use async_trait::async_trait;
use eventrelay_core::DeliveryLedger;
use eventrelay_domain::constants::{DEFAULT_DEDUPE_MAX_CAPACITY, DEFAULT_DEDUPE_TTL_HOURS};
use eventrelay_domain::DedupeConfig;
use moka::future::Cache;

/// Ledger configuration
#[derive(Debug, Clone)]
pub struct LedgerConfig {
    /// Time-to-live for ledger entries
    pub ttl: Duration,

    /// Maximum number of remembered events
    pub max_capacity: u64,
}

impl Default for LedgerConfig {
    fn default() -> Self {
        Self {
            ttl: Duration::from_secs(DEFAULT_DEDUPE_TTL_HOURS * 3600),
            max_capacity: DEFAULT_DEDUPE_MAX_CAPACITY,
        }
    }
}

impl From<&DedupeConfig> for LedgerConfig {
    fn from(config: &DedupeConfig) -> Self {
        Self { ttl: config.ttl(), max_capacity: config.max_capacity }
    }
}

impl LedgerConfig {
    /// Create config with custom TTL (useful for testing)
    pub fn with_ttl(ttl: Duration) -> Self {
        Self { ttl, max_capacity: DEFAULT_DEDUPE_MAX_CAPACITY }
    }

    /// Log configuration at startup
    pub fn log_config(&self) {
        tracing::info!(
            ttl_seconds = self.ttl.as_secs(),
            max_capacity = self.max_capacity,
            "Delivery ledger enabled"
        );
    }
}

/// [`DeliveryLedger`] backed by a TTL cache keyed by event id.
#[derive(Clone)]
pub struct MokaDeliveryLedger {
    delivered: Cache<String, ()>,
}

impl MokaDeliveryLedger {
    pub fn new(config: LedgerConfig) -> Self {
        let delivered =
            Cache::builder().max_capacity(config.max_capacity).time_to_live(config.ttl).build();
        Self { delivered }
    }
}

impl Default for MokaDeliveryLedger {
    fn default() -> Self {
        Self::new(LedgerConfig::default())
    }
}

#[async_trait]
impl DeliveryLedger for MokaDeliveryLedger {
    async fn is_delivered(&self, event_id: &str) -> bool {
        self.delivered.contains_key(event_id)
    }

    async fn mark_delivered(&self, event_id: &str) {
        self.delivered.insert(event_id.to_string(), ()).await;
    }
}
