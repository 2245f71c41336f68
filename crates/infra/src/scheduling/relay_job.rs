//! Fetch-then-notify job shared by the manual and scheduled triggers.

use std::sync::Arc;

use async_trait::async_trait;
use eventrelay_core::{CalendarSource, NotificationPipeline};
use eventrelay_domain::{Result, RunReport};
use tracing::{info, instrument, warn};

use crate::errors::InfraError;
use crate::scheduling::poll_scheduler::PollJob;

/// One poll: fetch upcoming events, then run the pipeline over them.
pub struct RelayPollJob {
    source: Arc<dyn CalendarSource>,
    pipeline: Arc<NotificationPipeline>,
}

impl RelayPollJob {
    pub fn new(source: Arc<dyn CalendarSource>, pipeline: Arc<NotificationPipeline>) -> Self {
        Self { source, pipeline }
    }

    /// Fetch and process once.
    ///
    /// Fails only when the fetch fails; per-event problems end up in the
    /// report.
    #[instrument(skip(self))]
    pub async fn run_once(&self) -> Result<RunReport> {
        let events = self.source.fetch_upcoming().await.map_err(|err| {
            warn!(error = %err, "Calendar fetch failed; skipping this pass");
            err
        })?;

        let report = self.pipeline.run(&events).await;
        info!(
            events = report.len(),
            delivered = report.delivered(),
            failed = report.failed(),
            skipped = report.skipped(),
            "Poll complete"
        );
        Ok(report)
    }
}

#[async_trait]
impl PollJob for RelayPollJob {
    async fn run(&self) -> std::result::Result<(), InfraError> {
        self.run_once().await.map(|_| ()).map_err(InfraError)
    }
}
