//! Logging initialization
//!
//! Installs the global `tracing` subscriber:
//!
//! - `EnvFilter` built from `RUST_LOG`, falling back to the configured level
//! - stdout `fmt` layer, human-readable or JSON
//! - optional daily rolling file under `logging.directory`
//!
//! The file layer writes through a non-blocking worker. Keep the returned
//! [`WorkerGuard`] alive for the lifetime of the process or buffered lines
//! are lost on exit.

use eventrelay_domain::constants::LOG_FILE_PREFIX;
use eventrelay_domain::{EventRelayError, LogFormat, LoggingConfig, Result};
use tracing_appender::non_blocking::WorkerGuard;
use tracing_appender::rolling::{RollingFileAppender, Rotation};
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::{fmt, EnvFilter, Layer, Registry};

type BoxedLayer = Box<dyn Layer<Registry> + Send + Sync>;

/// Install the global subscriber.
///
/// # Errors
/// Returns `EventRelayError::Config` for an invalid filter directive, an
/// unusable log directory, or when a global subscriber is already set.
pub fn init_logging(config: &LoggingConfig) -> Result<Option<WorkerGuard>> {
    let filter = build_filter(&config.level)?;

    let mut layers: Vec<BoxedLayer> = vec![stdout_layer(config.format)];

    let guard = match &config.directory {
        Some(directory) => {
            std::fs::create_dir_all(directory).map_err(|e| {
                EventRelayError::Config(format!(
                    "Cannot create log directory {}: {}",
                    directory.display(),
                    e
                ))
            })?;

            let appender = RollingFileAppender::builder()
                .rotation(Rotation::DAILY)
                .filename_prefix(LOG_FILE_PREFIX)
                .build(directory)
                .map_err(|e| EventRelayError::Config(format!("Cannot open log file: {}", e)))?;

            let (writer, guard) = tracing_appender::non_blocking(appender);
            layers.push(file_layer(config.format, writer));
            Some(guard)
        }
        None => None,
    };

    tracing_subscriber::registry()
        .with(layers)
        .with(filter)
        .try_init()
        .map_err(|e| EventRelayError::Config(format!("Logging already initialised: {}", e)))?;

    Ok(guard)
}

/// `RUST_LOG` wins over the configured level.
pub fn build_filter(level: &str) -> Result<EnvFilter> {
    if let Ok(filter) = EnvFilter::try_from_default_env() {
        return Ok(filter);
    }
    EnvFilter::try_new(level)
        .map_err(|e| EventRelayError::Config(format!("Invalid log level {:?}: {}", level, e)))
}

fn stdout_layer(format: LogFormat) -> BoxedLayer {
    match format {
        LogFormat::Json => fmt::layer().json().with_current_span(true).boxed(),
        LogFormat::Text => fmt::layer().with_target(true).boxed(),
    }
}

fn file_layer(format: LogFormat, writer: tracing_appender::non_blocking::NonBlocking) -> BoxedLayer {
    match format {
        LogFormat::Json => fmt::layer().json().with_writer(writer).boxed(),
        LogFormat::Text => fmt::layer().with_ansi(false).with_writer(writer).boxed(),
    }
}
