//! EventRelay - calendar booking to webhook relay
//!
//! Main entry point for the `eventrelay` CLI.

#![allow(clippy::print_stdout)]

use std::io::Read;
use std::time::Instant;

use anyhow::Context;
use chrono::{DateTime, Utc};
use chrono_tz::Tz;
use clap::Parser;
use eventrelay_infra::init_logging;
use eventrelay_lib::cli::{log_level_from_verbosity, Cli, Commands};
use eventrelay_lib::context::{load_config, load_config_or_default};
use eventrelay_lib::utils::logging::{error_label, log_command_execution};
use eventrelay_lib::{commands, AppContext};
use tracing::error;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load .env before clap so `EVENTRELAY_CONFIG` can come from it
    let dotenv = dotenvy::dotenv();

    let cli = Cli::parse();

    let (config, config_source) = if cli.command.needs_delivery() {
        load_config(cli.config.as_deref())?
    } else {
        load_config_or_default(cli.config.as_deref())?
    };

    let mut logging = config.logging.clone();
    if let Some(level) = log_level_from_verbosity(cli.verbose) {
        logging.level = level.into();
    }
    // Keep the guard alive until exit so buffered file output is flushed
    let _log_guard = init_logging(&logging)?;

    if let Ok(path) = dotenv {
        tracing::debug!(path = %path.display(), "Loaded .env");
    }
    tracing::info!(source = %config_source, "Configuration loaded");

    match cli.command {
        Commands::Run => {
            let started = Instant::now();
            let ctx = AppContext::new(config)?;
            let result = commands::run(&ctx).await;
            log_command_execution("run", started.elapsed(), result.is_ok());

            let report = result.map_err(|err| {
                error!(error = %err, kind = error_label(&err), "Poll failed");
                err
            })?;
            println!("{}", commands::render_report(&report));
        }

        Commands::Watch { no_initial_run } => {
            let ctx = AppContext::new(config)?;
            let initial_run = ctx.config.schedule.run_on_start && !no_initial_run;

            commands::watch_until(&ctx, initial_run, async {
                if let Err(err) = tokio::signal::ctrl_c().await {
                    error!(error = %err, "Cannot listen for Ctrl-C; stopping");
                }
            })
            .await?;
        }

        Commands::Extract { text } => {
            let text = match text {
                Some(text) => text,
                None => {
                    let mut buffer = String::new();
                    std::io::stdin()
                        .read_to_string(&mut buffer)
                        .context("failed to read description from stdin")?;
                    buffer
                }
            };
            println!("{}", commands::extract(&text));
        }

        Commands::CheckWindow { timestamp, now, timezone } => {
            let now = match now {
                Some(value) => DateTime::parse_from_rfc3339(&value)
                    .with_context(|| format!("--now is not RFC 3339: {value}"))?
                    .with_timezone(&Utc),
                None => Utc::now(),
            };
            let tz: Tz = match timezone {
                Some(name) => {
                    name.parse().map_err(|e| anyhow::anyhow!("unknown time zone {name:?}: {e}"))?
                }
                None => config.calendar.tz()?,
            };

            let check =
                commands::check_window(&timestamp, now, config.window.lead_window()?, tz)?;
            println!("{check}");
        }
    }

    Ok(())
}
