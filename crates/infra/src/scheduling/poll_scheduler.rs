//! Background calendar poll scheduler.
//!
//! Fires a [`PollJob`] on a cron schedule (every five minutes by default).
//! Start and stop are explicit and wrapped in timeouts. Stopping or
//! dropping the scheduler cancels its token; ticks that fire after that do
//! nothing.
//!
//! Ticks never overlap: if a run is still in flight when the next tick
//! fires, that tick is skipped with a warning.
//!
//! # Example
//!
//! ```no_run
//! use std::sync::Arc;
//!
//! use async_trait::async_trait;
//! use eventrelay_infra::errors::InfraError;
//! use eventrelay_infra::scheduling::{PollJob, PollScheduler, PollSchedulerConfig, SchedulerResult};
//!
//! struct NoopJob;
//!
//! #[async_trait]
//! impl PollJob for NoopJob {
//!     async fn run(&self) -> Result<(), InfraError> {
//!         Ok(())
//!     }
//! }
//!
//! # async fn example() -> SchedulerResult<()> {
//! let mut scheduler = PollScheduler::with_config(
//!     PollSchedulerConfig { cron_expression: "0 */5 * * * *".into(), ..Default::default() },
//!     Arc::new(NoopJob),
//! );
//!
//! scheduler.start().await?;
//! // ... application runs ...
//! scheduler.stop().await?;
//! # Ok(())
//! # }
//! ```

use std::sync::Arc;
use std::time::{Duration, Instant};

use async_trait::async_trait;
use eventrelay_domain::constants::{DEFAULT_JOB_TIMEOUT_SECS, DEFAULT_POLL_CRON};
use eventrelay_domain::ScheduleConfig;
use tokio::sync::Mutex;
use tokio_cron_scheduler::{Job, JobScheduler};
use tokio_util::sync::CancellationToken;
use tracing::{debug, error, info, instrument, warn};

use crate::errors::InfraError;
use crate::scheduling::error::{SchedulerError, SchedulerResult};

/// Work performed on every tick.
#[async_trait]
pub trait PollJob: Send + Sync {
    /// Execute the job once.
    async fn run(&self) -> Result<(), InfraError>;
}

/// What happened to a single tick.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TickOutcome {
    Completed,
    Failed,
    TimedOut,
    /// A previous run was still in flight.
    Skipped,
}

/// Configuration for the poll scheduler.
#[derive(Debug, Clone)]
pub struct PollSchedulerConfig {
    /// Six-field cron expression (seconds first).
    pub cron_expression: String,
    /// Timeout applied to a single job execution.
    pub job_timeout: Duration,
    /// Timeout for starting the underlying scheduler.
    pub start_timeout: Duration,
    /// Timeout for stopping the scheduler.
    pub stop_timeout: Duration,
}

impl Default for PollSchedulerConfig {
    fn default() -> Self {
        Self {
            cron_expression: DEFAULT_POLL_CRON.into(),
            job_timeout: Duration::from_secs(DEFAULT_JOB_TIMEOUT_SECS),
            start_timeout: Duration::from_secs(5),
            stop_timeout: Duration::from_secs(5),
        }
    }
}

impl From<&ScheduleConfig> for PollSchedulerConfig {
    fn from(config: &ScheduleConfig) -> Self {
        Self {
            cron_expression: config.cron.clone(),
            job_timeout: Duration::from_secs(config.job_timeout_secs.max(1)),
            ..Default::default()
        }
    }
}

/// Poll scheduler with explicit lifecycle management.
pub struct PollScheduler {
    scheduler: Option<JobScheduler>,
    config: PollSchedulerConfig,
    cancellation: CancellationToken,
    job: Arc<dyn PollJob>,
    in_flight: Arc<Mutex<()>>,
}

impl PollScheduler {
    /// Create a scheduler with the default configuration.
    pub fn new(cron_expression: String, job: Arc<dyn PollJob>) -> Self {
        let config = PollSchedulerConfig { cron_expression, ..Default::default() };
        Self::with_config(config, job)
    }

    /// Create a scheduler with a custom configuration.
    pub fn with_config(config: PollSchedulerConfig, job: Arc<dyn PollJob>) -> Self {
        Self {
            scheduler: None,
            config,
            cancellation: CancellationToken::new(),
            job,
            in_flight: Arc::new(Mutex::new(())),
        }
    }

    /// Register the poll job and start the cron runner.
    #[instrument(skip(self), fields(cron = %self.config.cron_expression))]
    pub async fn start(&mut self) -> SchedulerResult<()> {
        if self.is_running() {
            return Err(SchedulerError::AlreadyRunning);
        }

        self.cancellation = CancellationToken::new();

        let scheduler_instance = self.build_scheduler().await?;
        let start_timeout = self.config.start_timeout;

        let start_result = tokio::time::timeout(start_timeout, scheduler_instance.start())
            .await
            .map_err(|source| SchedulerError::Timeout { duration: start_timeout, source })?;

        start_result.map_err(|source| SchedulerError::StartFailed { source })?;

        self.scheduler = Some(scheduler_instance);
        info!("Poll scheduler started");
        Ok(())
    }

    /// Cancel pending ticks and shut the cron runner down.
    ///
    /// A run already in flight is not interrupted.
    #[instrument(skip(self))]
    pub async fn stop(&mut self) -> SchedulerResult<()> {
        if !self.is_running() {
            return Err(SchedulerError::NotRunning);
        }

        self.cancellation.cancel();

        let mut scheduler = match self.scheduler.take() {
            Some(scheduler) => scheduler,
            None => return Err(SchedulerError::NotRunning),
        };

        let stop_timeout = self.config.stop_timeout;
        let stop_result =
            tokio::time::timeout(stop_timeout, async move { scheduler.shutdown().await })
                .await
                .map_err(|source| SchedulerError::Timeout { duration: stop_timeout, source })?;

        stop_result.map_err(|source| SchedulerError::StopFailed { source })?;

        info!("Poll scheduler stopped");
        self.cancellation = CancellationToken::new();
        Ok(())
    }

    /// Returns true when a scheduler instance is active.
    pub fn is_running(&self) -> bool {
        self.scheduler.is_some()
    }

    /// Run the job immediately, outside the cron schedule.
    ///
    /// Shares the in-flight guard with scheduled ticks.
    pub async fn run_now(&self) -> TickOutcome {
        Self::execute_tick(self.job.clone(), self.in_flight.clone(), self.config.job_timeout).await
    }

    async fn build_scheduler(&self) -> SchedulerResult<JobScheduler> {
        let scheduler = JobScheduler::new()
            .await
            .map_err(|source| SchedulerError::CreationFailed { source })?;
        let job = self.job.clone();
        let in_flight = self.in_flight.clone();
        let job_timeout = self.config.job_timeout;
        let cancel = self.cancellation.clone();

        let job_definition =
            Job::new_async(self.config.cron_expression.as_str(), move |_id, _lock| {
                let job = job.clone();
                let in_flight = in_flight.clone();
                let cancel = cancel.clone();

                Box::pin(async move {
                    if cancel.is_cancelled() {
                        debug!("Poll scheduler cancelled; ignoring tick");
                        return;
                    }
                    Self::execute_tick(job, in_flight, job_timeout).await;
                })
            })
            .map_err(|source| SchedulerError::JobRegistrationFailed { source })?;

        let job_id = job_definition.guid();
        scheduler
            .add(job_definition)
            .await
            .map_err(|source| SchedulerError::JobRegistrationFailed { source })?;

        debug!(cron = %self.config.cron_expression, job_id = %job_id, "Registered poll job");
        Ok(scheduler)
    }

    async fn execute_tick(
        job: Arc<dyn PollJob>,
        in_flight: Arc<Mutex<()>>,
        job_timeout: Duration,
    ) -> TickOutcome {
        let Ok(_guard) = in_flight.try_lock() else {
            warn!("Previous poll still running; skipping tick");
            return TickOutcome::Skipped;
        };

        let started = Instant::now();
        match tokio::time::timeout(job_timeout, job.run()).await {
            Ok(Ok(())) => {
                debug!(elapsed_ms = started.elapsed().as_millis() as u64, "Poll finished");
                TickOutcome::Completed
            }
            Ok(Err(err)) => {
                error!(error = %err, "Poll failed; waiting for next tick");
                TickOutcome::Failed
            }
            Err(elapsed) => {
                warn!(timeout_secs = job_timeout.as_secs(), "Poll timed out");
                debug!(elapsed = ?elapsed, "Timeout details");
                TickOutcome::TimedOut
            }
        }
    }
}

impl Drop for PollScheduler {
    fn drop(&mut self) {
        let Some(mut scheduler) = self.scheduler.take() else {
            return;
        };

        warn!("PollScheduler dropped while running; shutting down");
        self.cancellation.cancel();

        // Without a runtime the cron runner is already gone with it.
        if let Ok(handle) = tokio::runtime::Handle::try_current() {
            handle.spawn(async move {
                if let Err(err) = scheduler.shutdown().await {
                    warn!(error = %err, "Cron runner shutdown failed after drop");
                }
            });
        }
    }
}
