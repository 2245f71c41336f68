//! Interval trigger

use std::future::Future;

use anyhow::Context;
use eventrelay_infra::scheduling::TickOutcome;
use tracing::{info, warn};

use crate::AppContext;

/// Run the poll scheduler until `shutdown` resolves.
///
/// With `initial_run`, one pass runs before the first scheduled tick. Its
/// outcome is logged and never aborts the watch.
pub async fn watch_until<F>(ctx: &AppContext, initial_run: bool, shutdown: F) -> anyhow::Result<()>
where
    F: Future<Output = ()>,
{
    let mut scheduler = ctx.scheduler();

    if initial_run {
        match scheduler.run_now().await {
            TickOutcome::Completed => info!("Initial poll completed"),
            outcome => warn!(?outcome, "Initial poll did not complete"),
        }
    }

    scheduler.start().await.context("failed to start poll scheduler")?;
    info!(cron = %ctx.config.schedule.cron, "Watching calendar");

    shutdown.await;
    info!("Shutdown requested");

    scheduler.stop().await.context("failed to stop poll scheduler")?;
    Ok(())
}
