//! # EventRelay Infrastructure
//!
//! Infrastructure implementations of core ports.
//!
//! This crate contains:
//! - Google Calendar event source
//! - Webhook delivery client
//! - Optional in-memory delivery ledger (moka)
//! - Cron-based poll scheduler
//! - Configuration loading and logging initialization
//!
//! ## Architecture
//! - Implements traits defined in `eventrelay-core`
//! - Contains all "impure" code (HTTP, timers, filesystem, environment)

pub mod config;
pub mod dedupe;
pub mod errors;
pub mod http;
pub mod integrations;
pub mod observability;
pub mod scheduling;

// Re-export commonly used items
pub use dedupe::{LedgerConfig, MokaDeliveryLedger};
pub use errors::InfraError;
pub use http::HttpClient;
pub use integrations::{GoogleCalendarSource, WebhookDeliveryClient};
pub use observability::init_logging;
pub use scheduling::{PollJob, PollScheduler, PollSchedulerConfig, RelayPollJob};
