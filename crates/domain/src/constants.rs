//! Application constants
//!
//! Centralized location for all domain-level constants used throughout the
//! application.

// Lead window (hours between "now" and the event start)
pub const DEFAULT_WINDOW_MIN_HOURS: f64 = 23.0;
pub const DEFAULT_WINDOW_MAX_HOURS: f64 = 25.0;

// Delivery
pub const TRANSPORT_FAILURE_STATUS: u16 = 500;
pub const DEFAULT_WEBHOOK_TIMEOUT_SECS: u64 = 10;
pub const DEFAULT_DELIVERY_CONCURRENCY: usize = 1;

// Calendar polling
pub const DEFAULT_CALENDAR_ID: &str = "primary";
pub const DEFAULT_MAX_RESULTS: u32 = 20;
pub const DEFAULT_CALENDAR_TIMEZONE: &str = "UTC";
pub const DEFAULT_CALENDAR_TIMEOUT_SECS: u64 = 15;
pub const DEFAULT_POLL_CRON: &str = "0 */5 * * * *"; // every 5 minutes
pub const DEFAULT_JOB_TIMEOUT_SECS: u64 = 240;

// Optional delivery de-duplication
pub const DEFAULT_DEDUPE_TTL_HOURS: u64 = 25;
pub const DEFAULT_DEDUPE_MAX_CAPACITY: u64 = 10_000;

/// Summary shown for events without a title.
pub const UNTITLED_EVENT_SUMMARY: &str = "No Title";

// Logging
pub const DEFAULT_LOG_LEVEL: &str = "info";
pub const LOG_FILE_PREFIX: &str = "eventrelay.log";
