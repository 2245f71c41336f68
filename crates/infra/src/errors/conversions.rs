//! Conversions from external infrastructure errors into domain errors.

use eventrelay_domain::EventRelayError;
use reqwest::Error as HttpError;

/// Error newtype that keeps conversions on the infrastructure side and can be
/// converted back into the domain error.
#[derive(Debug)]
pub struct InfraError(pub EventRelayError);

impl From<InfraError> for EventRelayError {
    fn from(value: InfraError) -> Self {
        value.0
    }
}

impl From<EventRelayError> for InfraError {
    fn from(value: EventRelayError) -> Self {
        InfraError(value)
    }
}

impl std::fmt::Display for InfraError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        self.0.fmt(f)
    }
}

impl std::error::Error for InfraError {}

trait IntoEventRelayError {
    fn into_eventrelay(self) -> EventRelayError;
}

/* -------------------------------------------------------------------------- */
/* reqwest::Error → EventRelayError */
/* -------------------------------------------------------------------------- */

impl IntoEventRelayError for HttpError {
    fn into_eventrelay(self) -> EventRelayError {
        if self.is_timeout() {
            return EventRelayError::Network("HTTP request timed out".into());
        }

        if self.is_connect() {
            return EventRelayError::Network("HTTP connection failure".into());
        }

        if let Some(status) = self.status() {
            return status_error(status.as_u16(), status.canonical_reason());
        }

        if self.is_decode() {
            return EventRelayError::InvalidInput(format!("failed to decode response: {self}"));
        }

        if self.is_builder() {
            return EventRelayError::Config(format!("invalid HTTP request: {self}"));
        }

        EventRelayError::Network(self.to_string())
    }
}

impl From<HttpError> for InfraError {
    fn from(value: HttpError) -> Self {
        InfraError(value.into_eventrelay())
    }
}

/// Map an unsuccessful HTTP status to the matching domain error.
pub(crate) fn status_error(code: u16, reason: Option<&str>) -> EventRelayError {
    let message = format!("HTTP {} {}", code, reason.unwrap_or("unknown status"));

    match code {
        401 | 403 => EventRelayError::Auth(message),
        404 => EventRelayError::NotFound(message),
        429 => EventRelayError::Network(message),
        400..=499 => EventRelayError::InvalidInput(message),
        _ => EventRelayError::Network(message),
    }
}

/* -------------------------------------------------------------------------- */
/* Tests */
/* -------------------------------------------------------------------------- */
