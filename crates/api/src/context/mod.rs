//! Application context - dependency injection container

use std::path::Path;
use std::sync::Arc;

use eventrelay_core::NotificationPipeline;
use eventrelay_domain::{Config, Result, RunReport};
use eventrelay_infra::config::ConfigSource;
use eventrelay_infra::scheduling::PollJob;
use eventrelay_infra::{
    config, GoogleCalendarSource, LedgerConfig, MokaDeliveryLedger, PollScheduler,
    PollSchedulerConfig, RelayPollJob, WebhookDeliveryClient,
};
use tracing::{debug, info};

/// Application context - holds the wired poll job and its settings
pub struct AppContext {
    pub config: Config,
    pub job: Arc<RelayPollJob>,

    /// Present only when `dedupe.enabled` is set
    pub ledger: Option<Arc<MokaDeliveryLedger>>,
}

impl AppContext {
    /// Validate `config` and wire the calendar source, webhook client and
    /// pipeline.
    ///
    /// # Errors
    /// Returns `EventRelayError::Config` for invalid settings or when no
    /// calendar credential is configured.
    pub fn new(config: Config) -> Result<Self> {
        config.validate()?;

        let delivery = Arc::new(WebhookDeliveryClient::from_config(&config.webhook)?);
        let mut pipeline = NotificationPipeline::new(delivery)
            .with_window(config.window.lead_window()?)
            .with_timezone(config.calendar.tz()?)
            .with_concurrency(config.webhook.delivery_concurrency);

        let ledger = if config.dedupe.enabled {
            let ledger_config = LedgerConfig::from(&config.dedupe);
            ledger_config.log_config();
            let ledger = Arc::new(MokaDeliveryLedger::new(ledger_config));
            pipeline = pipeline.with_ledger(ledger.clone());
            Some(ledger)
        } else {
            None
        };

        let source = Arc::new(GoogleCalendarSource::new(&config.calendar)?);
        debug!(events_url = %source.events_url(), "Calendar source ready");

        let job = Arc::new(RelayPollJob::new(source, Arc::new(pipeline)));

        info!(
            calendar_id = %config.calendar.calendar_id,
            timezone = %config.calendar.timezone,
            min_hours = config.window.min_hours,
            max_hours = config.window.max_hours,
            dedupe = config.dedupe.enabled,
            "Application context initialized"
        );

        Ok(Self { config, job, ledger })
    }

    /// Manual trigger: one fetch and one pipeline pass.
    pub async fn run_once(&self) -> Result<RunReport> {
        self.job.run_once().await
    }

    /// Scheduler for the configured cron expression, not yet started.
    pub fn scheduler(&self) -> PollScheduler {
        let job: Arc<dyn PollJob> = self.job.clone();
        PollScheduler::with_config(PollSchedulerConfig::from(&self.config.schedule), job)
    }
}

/// Load configuration from `path`, or from the environment and standard
/// file locations when no path is given.
pub fn load_config(path: Option<&Path>) -> Result<(Config, ConfigSource)> {
    match path {
        Some(path) => config::load_file_with_source(Some(path.to_path_buf())),
        None => config::load_with_source(),
    }
}

/// Like [`load_config`], but falls back to the defaults when nothing is
/// configured at all. A configuration that exists but is invalid is still
/// an error.
pub fn load_config_or_default(path: Option<&Path>) -> Result<(Config, ConfigSource)> {
    if path.is_none() && !config::env_configured() && config::find_config_file().is_none() {
        return Ok((Config::default(), ConfigSource::Defaults));
    }
    load_config(path)
}

#[cfg(test)]
mod tests {
    use eventrelay_domain::EventRelayError;

    use super::*;

    fn valid_config() -> Config {
        let mut config = Config::default();
        config.webhook.url = "http://127.0.0.1:9/add_client".into();
        config.calendar.access_token = Some("token".into());
        config
    }

    #[tokio::test]
    async fn builds_without_ledger_by_default() {
        let ctx = AppContext::new(valid_config()).expect("context");
        assert!(ctx.ledger.is_none());
        assert!(!ctx.scheduler().is_running());
    }

    #[tokio::test]
    async fn builds_ledger_when_enabled() {
        let mut config = valid_config();
        config.dedupe.enabled = true;

        let ctx = AppContext::new(config).expect("context");
        assert!(ctx.ledger.is_some());
    }

    #[test]
    fn missing_calendar_credential_is_config_error() {
        let mut config = valid_config();
        config.calendar.access_token = None;

        assert!(matches!(AppContext::new(config), Err(EventRelayError::Config(_))));
    }

    #[test]
    fn invalid_window_is_rejected() {
        let mut config = valid_config();
        config.window.min_hours = 30.0;

        assert!(matches!(AppContext::new(config), Err(EventRelayError::Config(_))));
    }

    #[test]
    fn loads_explicit_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("eventrelay.toml");
        std::fs::write(&path, "[webhook]\nurl = \"http://localhost:9000/hook\"\n").unwrap();

        let (config, source) = load_config(Some(&path)).expect("config");
        assert_eq!(config.webhook.url, "http://localhost:9000/hook");
        assert_eq!(source, ConfigSource::File(path.clone()));
    }

    #[test]
    fn explicit_missing_file_is_error() {
        let result = load_config_or_default(Some(Path::new("/nonexistent/eventrelay.toml")));
        assert!(matches!(result, Err(EventRelayError::Config(_))));
    }
}
