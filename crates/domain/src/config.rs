//! Configuration structures
//!
//! Every section has defaults so a config file only needs to name what it
//! changes. The webhook URL is the one value without a usable default;
//! [`Config::validate`] rejects a config that leaves it empty.

use std::fmt;
use std::path::PathBuf;
use std::time::Duration;

use chrono_tz::Tz;
use serde::{Deserialize, Serialize};

use crate::constants::{
    DEFAULT_CALENDAR_ID, DEFAULT_CALENDAR_TIMEOUT_SECS, DEFAULT_CALENDAR_TIMEZONE,
    DEFAULT_DEDUPE_MAX_CAPACITY, DEFAULT_DEDUPE_TTL_HOURS, DEFAULT_DELIVERY_CONCURRENCY,
    DEFAULT_JOB_TIMEOUT_SECS, DEFAULT_LOG_LEVEL, DEFAULT_MAX_RESULTS, DEFAULT_POLL_CRON,
    DEFAULT_WEBHOOK_TIMEOUT_SECS, DEFAULT_WINDOW_MAX_HOURS, DEFAULT_WINDOW_MIN_HOURS,
};
use crate::errors::{EventRelayError, Result};
use crate::impl_label_conversions;
use crate::utils::lead_window::LeadWindow;

/// Google Calendar v3 API base URL.
pub const GOOGLE_CALENDAR_API_BASE: &str = "https://www.googleapis.com/calendar/v3";

/// Top-level application configuration
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub calendar: CalendarConfig,
    pub webhook: WebhookConfig,
    pub window: WindowConfig,
    pub schedule: ScheduleConfig,
    pub dedupe: DedupeConfig,
    pub logging: LoggingConfig,
}

impl Config {
    /// Check cross-field constraints that serde cannot express.
    pub fn validate(&self) -> Result<()> {
        self.webhook.validate()?;
        self.window.lead_window()?;
        self.calendar.tz()?;
        if self.calendar.max_results == 0 {
            return Err(EventRelayError::Config("calendar.max_results must be at least 1".into()));
        }
        if self.schedule.cron.trim().is_empty() {
            return Err(EventRelayError::Config("schedule.cron must not be empty".into()));
        }
        Ok(())
    }
}

/// Calendar source settings
#[derive(Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct CalendarConfig {
    pub calendar_id: String,
    /// Bearer token used as-is.
    pub access_token: Option<String>,
    /// JSON file holding the token, re-read on every fetch so an external
    /// process can refresh it.
    pub token_file: Option<PathBuf>,
    pub max_results: u32,
    /// IANA zone used for all-day and offset-less start values.
    pub timezone: String,
    pub api_base: String,
    pub request_timeout_secs: u64,
}

impl Default for CalendarConfig {
    fn default() -> Self {
        Self {
            calendar_id: DEFAULT_CALENDAR_ID.into(),
            access_token: None,
            token_file: None,
            max_results: DEFAULT_MAX_RESULTS,
            timezone: DEFAULT_CALENDAR_TIMEZONE.into(),
            api_base: GOOGLE_CALENDAR_API_BASE.into(),
            request_timeout_secs: DEFAULT_CALENDAR_TIMEOUT_SECS,
        }
    }
}

impl CalendarConfig {
    pub fn tz(&self) -> Result<Tz> {
        self.timezone.parse::<Tz>().map_err(|e| {
            EventRelayError::Config(format!("Invalid calendar timezone {:?}: {}", self.timezone, e))
        })
    }

    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs)
    }
}

impl fmt::Debug for CalendarConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CalendarConfig")
            .field("calendar_id", &self.calendar_id)
            .field("access_token", &self.access_token.as_ref().map(|_| "<redacted>"))
            .field("token_file", &self.token_file)
            .field("max_results", &self.max_results)
            .field("timezone", &self.timezone)
            .field("api_base", &self.api_base)
            .field("request_timeout_secs", &self.request_timeout_secs)
            .finish()
    }
}

/// Outbound webhook settings
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct WebhookConfig {
    pub url: String,
    pub timeout_secs: u64,
    /// Deliveries awaited at once within one run. 1 means sequential.
    pub delivery_concurrency: usize,
}

impl Default for WebhookConfig {
    fn default() -> Self {
        Self {
            url: String::new(),
            timeout_secs: DEFAULT_WEBHOOK_TIMEOUT_SECS,
            delivery_concurrency: DEFAULT_DELIVERY_CONCURRENCY,
        }
    }
}

impl WebhookConfig {
    pub fn validate(&self) -> Result<()> {
        if self.url.trim().is_empty() {
            return Err(EventRelayError::Config("webhook.url is required".into()));
        }
        let parsed = url::Url::parse(&self.url)
            .map_err(|e| EventRelayError::Config(format!("Invalid webhook url: {}", e)))?;
        if !matches!(parsed.scheme(), "http" | "https") {
            return Err(EventRelayError::Config(format!(
                "Unsupported webhook url scheme: {}",
                parsed.scheme()
            )));
        }
        if self.timeout_secs == 0 {
            return Err(EventRelayError::Config("webhook.timeout_secs must be at least 1".into()));
        }
        if self.delivery_concurrency == 0 {
            return Err(EventRelayError::Config(
                "webhook.delivery_concurrency must be at least 1".into(),
            ));
        }
        Ok(())
    }

    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }
}

/// Lead window bounds in hours
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct WindowConfig {
    pub min_hours: f64,
    pub max_hours: f64,
}

impl Default for WindowConfig {
    fn default() -> Self {
        Self { min_hours: DEFAULT_WINDOW_MIN_HOURS, max_hours: DEFAULT_WINDOW_MAX_HOURS }
    }
}

impl WindowConfig {
    pub fn lead_window(&self) -> Result<LeadWindow> {
        LeadWindow::new(self.min_hours, self.max_hours)
    }
}

/// Background poll settings
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ScheduleConfig {
    /// Six-field cron expression (seconds first).
    pub cron: String,
    pub job_timeout_secs: u64,
    /// Run one pass immediately when `watch` starts.
    pub run_on_start: bool,
}

impl Default for ScheduleConfig {
    fn default() -> Self {
        Self {
            cron: DEFAULT_POLL_CRON.into(),
            job_timeout_secs: DEFAULT_JOB_TIMEOUT_SECS,
            run_on_start: true,
        }
    }
}

/// Opt-in suppression of repeat deliveries for the same event id.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct DedupeConfig {
    pub enabled: bool,
    pub ttl_hours: u64,
    pub max_capacity: u64,
}

impl Default for DedupeConfig {
    fn default() -> Self {
        Self {
            enabled: false,
            ttl_hours: DEFAULT_DEDUPE_TTL_HOURS,
            max_capacity: DEFAULT_DEDUPE_MAX_CAPACITY,
        }
    }
}

impl DedupeConfig {
    pub fn ttl(&self) -> Duration {
        Duration::from_secs(self.ttl_hours.saturating_mul(3600))
    }
}

/// Output format of the stdout log layer
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    #[default]
    Text,
    Json,
}

impl_label_conversions!(LogFormat {
    Text => "text",
    Json => "json",
});

/// Logging settings
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// Default filter directive; `RUST_LOG` takes precedence.
    pub level: String,
    pub format: LogFormat,
    /// When set, logs are also written to a daily rolling file here.
    pub directory: Option<PathBuf>,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self { level: DEFAULT_LOG_LEVEL.into(), format: LogFormat::Text, directory: None }
    }
}
