use std::time::Duration;

use eventrelay_domain::EventRelayError;
use tracing::{info, warn};

/// Log the outcome of a command execution with structured fields.
///
/// `command` should be a stable identifier such as `"run"` or `"watch"`.
#[inline]
pub fn log_command_execution(command: &str, elapsed: Duration, success: bool) {
    let duration_ms = elapsed.as_millis() as u64;

    if success {
        info!(command, duration_ms, "command_execution_success");
    } else {
        warn!(command, duration_ms, "command_execution_failure");
    }
}

/// Stable label for an error, suitable for log fields.
#[inline]
pub fn error_label(error: &EventRelayError) -> &'static str {
    match error {
        EventRelayError::Config(_) => "config",
        EventRelayError::Network(_) => "network",
        EventRelayError::Auth(_) => "auth",
        EventRelayError::NotFound(_) => "not_found",
        EventRelayError::InvalidInput(_) => "invalid_input",
        EventRelayError::Internal(_) => "internal",
    }
}
