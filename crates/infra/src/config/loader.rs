//! Configuration loader
//!
//! Loads application configuration from environment variables or files.
//!
//! ## Loading Strategy
//! 1. First, attempts to load from environment variables
//! 2. Only if `EVENTRELAY_WEBHOOK_URL` is not set, falls back to loading
//!    from file; any other environment error is returned as-is
//! 3. Searches multiple paths for config files
//! 4. Supports JSON and TOML formats
//!
//! ## Environment Variables
//! - `EVENTRELAY_WEBHOOK_URL`: Webhook endpoint (required)
//! - `EVENTRELAY_WEBHOOK_TIMEOUT_SECS`: Webhook request timeout in seconds
//! - `EVENTRELAY_DELIVERY_CONCURRENCY`: Deliveries awaited at once per run
//! - `EVENTRELAY_CALENDAR_ID`: Calendar to poll (default `primary`)
//! - `EVENTRELAY_CALENDAR_ACCESS_TOKEN`: Bearer token
//! - `EVENTRELAY_CALENDAR_TOKEN_FILE`: JSON file holding the bearer token
//! - `EVENTRELAY_CALENDAR_MAX_RESULTS`: Events fetched per poll
//! - `EVENTRELAY_CALENDAR_TIMEZONE`: IANA zone for all-day events
//! - `EVENTRELAY_WINDOW_MIN_HOURS` / `EVENTRELAY_WINDOW_MAX_HOURS`: Lead window
//! - `EVENTRELAY_POLL_CRON`: Poll schedule (six-field cron)
//! - `EVENTRELAY_DEDUPE_ENABLED`: Skip events already delivered (true/false)
//! - `EVENTRELAY_DEDUPE_TTL_HOURS`: How long a delivery is remembered
//! - `EVENTRELAY_LOG_LEVEL`: Default log filter
//! - `EVENTRELAY_LOG_JSON`: JSON log output (true/false)
//! - `EVENTRELAY_LOG_DIR`: Directory for daily rolling log files
//!
//! ## File Locations
//! The loader checks the following paths (in order):
//! 1. `./config.json` or `./config.toml` (current working directory)
//! 2. `./eventrelay.json` or `./eventrelay.toml` (current working directory)
//! 3. `../config.json` or `../config.toml` (parent directory)
//! 4. Relative to executable location

use std::fmt;
use std::path::{Path, PathBuf};
use std::str::FromStr;

use eventrelay_domain::{Config, EventRelayError, LogFormat, Result};

const WEBHOOK_URL_VAR: &str = "EVENTRELAY_WEBHOOK_URL";

/// Where a loaded configuration came from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConfigSource {
    Environment,
    File(PathBuf),
    /// Nothing was configured; built-in defaults are in use.
    Defaults,
}

impl fmt::Display for ConfigSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Environment => f.write_str("environment"),
            Self::File(path) => write!(f, "file {}", path.display()),
            Self::Defaults => f.write_str("defaults"),
        }
    }
}

/// Load configuration with automatic fallback strategy
///
/// Loads from environment variables when `EVENTRELAY_WEBHOOK_URL` is set;
/// otherwise falls back to a config file.
///
/// # Errors
/// Returns `EventRelayError::Config` if:
/// - An environment variable has an invalid value
/// - No config file is found when the environment is not configured
/// - File format is invalid
pub fn load() -> Result<Config> {
    load_with_source().map(|(config, _)| config)
}

/// Like [`load`], also reporting which source was used.
///
/// Callers that load configuration before logging is set up can log the
/// source afterwards.
pub fn load_with_source() -> Result<(Config, ConfigSource)> {
    if env_configured() {
        return load_from_env().map(|config| (config, ConfigSource::Environment));
    }
    tracing::debug!("{} not set, trying file", WEBHOOK_URL_VAR);
    load_file_with_source(None)
}

/// Whether the environment selects env-based configuration.
pub fn env_configured() -> bool {
    env_opt(WEBHOOK_URL_VAR).is_some()
}

/// Load configuration from environment variables
///
/// Only `EVENTRELAY_WEBHOOK_URL` is required; every other setting keeps its
/// default when unset.
///
/// # Errors
/// Returns `EventRelayError::Config` if the webhook URL is missing or a
/// variable has an invalid value.
pub fn load_from_env() -> Result<Config> {
    let mut config = Config::default();

    config.webhook.url = env_var(WEBHOOK_URL_VAR)?;
    if let Some(timeout) = env_parse("EVENTRELAY_WEBHOOK_TIMEOUT_SECS")? {
        config.webhook.timeout_secs = timeout;
    }
    if let Some(concurrency) = env_parse("EVENTRELAY_DELIVERY_CONCURRENCY")? {
        config.webhook.delivery_concurrency = concurrency;
    }

    if let Some(calendar_id) = env_opt("EVENTRELAY_CALENDAR_ID") {
        config.calendar.calendar_id = calendar_id;
    }
    config.calendar.access_token = env_opt("EVENTRELAY_CALENDAR_ACCESS_TOKEN");
    config.calendar.token_file = env_opt("EVENTRELAY_CALENDAR_TOKEN_FILE").map(PathBuf::from);
    if let Some(max_results) = env_parse("EVENTRELAY_CALENDAR_MAX_RESULTS")? {
        config.calendar.max_results = max_results;
    }
    if let Some(timezone) = env_opt("EVENTRELAY_CALENDAR_TIMEZONE") {
        config.calendar.timezone = timezone;
    }

    if let Some(min_hours) = env_parse("EVENTRELAY_WINDOW_MIN_HOURS")? {
        config.window.min_hours = min_hours;
    }
    if let Some(max_hours) = env_parse("EVENTRELAY_WINDOW_MAX_HOURS")? {
        config.window.max_hours = max_hours;
    }

    if let Some(cron) = env_opt("EVENTRELAY_POLL_CRON") {
        config.schedule.cron = cron;
    }

    config.dedupe.enabled = env_bool("EVENTRELAY_DEDUPE_ENABLED", config.dedupe.enabled);
    if let Some(ttl_hours) = env_parse("EVENTRELAY_DEDUPE_TTL_HOURS")? {
        config.dedupe.ttl_hours = ttl_hours;
    }

    if let Some(level) = env_opt("EVENTRELAY_LOG_LEVEL") {
        config.logging.level = level;
    }
    if env_bool("EVENTRELAY_LOG_JSON", false) {
        config.logging.format = LogFormat::Json;
    }
    config.logging.directory = env_opt("EVENTRELAY_LOG_DIR").map(PathBuf::from);

    Ok(config)
}

/// Load configuration from a file
///
/// If `path` is `None`, searches multiple locations for config files.
/// Supports both JSON and TOML formats (detected by file extension).
///
/// # Errors
/// Returns `EventRelayError::Config` if:
/// - File not found (when path is specified)
/// - No config file found (when path is `None`)
/// - File format is invalid
pub fn load_from_file(path: Option<PathBuf>) -> Result<Config> {
    load_file_with_source(path).map(|(config, _)| config)
}

/// Like [`load_from_file`], also returning the path that was read.
pub fn load_file_with_source(path: Option<PathBuf>) -> Result<(Config, ConfigSource)> {
    let config_path = match path {
        Some(p) => {
            if !p.exists() {
                return Err(EventRelayError::Config(format!(
                    "Config file not found: {}",
                    p.display()
                )));
            }
            p
        }
        None => find_config_file().ok_or_else(|| {
            EventRelayError::Config(
                "No config file found in any of the standard locations".to_string(),
            )
        })?,
    };

    tracing::info!(path = %config_path.display(), "Loading configuration from file");

    let contents = std::fs::read_to_string(&config_path)
        .map_err(|e| EventRelayError::Config(format!("Failed to read config file: {}", e)))?;

    let config = parse_config(&contents, &config_path)?;
    Ok((config, ConfigSource::File(config_path)))
}

/// Parse configuration from string content
///
/// Format is detected by file extension (`.json` or `.toml`).
fn parse_config(contents: &str, path: &Path) -> Result<Config> {
    let extension = path.extension().and_then(|e| e.to_str()).unwrap_or("json");

    match extension {
        "toml" => toml::from_str(contents)
            .map_err(|e| EventRelayError::Config(format!("Invalid TOML format: {}", e))),
        "json" => serde_json::from_str(contents)
            .map_err(|e| EventRelayError::Config(format!("Invalid JSON format: {}", e))),
        _ => Err(EventRelayError::Config(format!("Unsupported config format: {}", extension))),
    }
}

/// Search multiple paths for configuration files
///
/// # Returns
/// The first config file found, or `None` if no file exists.
pub fn find_config_file() -> Option<PathBuf> {
    const NAMES: [&str; 4] = ["config.json", "config.toml", "eventrelay.json", "eventrelay.toml"];

    let mut candidates = Vec::new();

    if let Ok(cwd) = std::env::current_dir() {
        candidates.extend(NAMES.iter().map(|name| cwd.join(name)));
        candidates.push(cwd.join("../config.json"));
        candidates.push(cwd.join("../config.toml"));
    }

    if let Ok(exe_path) = std::env::current_exe() {
        if let Some(exe_dir) = exe_path.parent() {
            candidates.extend(NAMES.iter().map(|name| exe_dir.join(name)));
        }
    }

    candidates.into_iter().find(|path| path.exists())
}

/// Get required environment variable
///
/// # Errors
/// Returns `EventRelayError::Config` if the variable is not set or empty.
fn env_var(key: &str) -> Result<String> {
    env_opt(key).ok_or_else(|| {
        EventRelayError::Config(format!("Missing required environment variable: {}", key))
    })
}

/// Non-empty environment variable, trimmed.
fn env_opt(key: &str) -> Option<String> {
    std::env::var(key).ok().map(|s| s.trim().to_string()).filter(|s| !s.is_empty())
}

/// Parse an optional environment variable.
fn env_parse<T>(key: &str) -> Result<Option<T>>
where
    T: FromStr,
    T::Err: std::fmt::Display,
{
    env_opt(key)
        .map(|raw| {
            raw.parse::<T>().map_err(|e| {
                EventRelayError::Config(format!("Invalid value for {}: {:?} ({})", key, raw, e))
            })
        })
        .transpose()
}

/// Parse boolean from environment variable
///
/// Accepts: `1`/`0`, `true`/`false`, `yes`/`no`, `on`/`off` (case-insensitive)
fn env_bool(key: &str, default: bool) -> bool {
    std::env::var(key)
        .ok()
        .map(|s| matches!(s.trim().to_ascii_lowercase().as_str(), "1" | "true" | "yes" | "on"))
        .unwrap_or(default)
}
