//! Lead-window eligibility filter.
//!
//! An event is eligible for notification when its start lies between
//! `min_hours` and `max_hours` (inclusive) after "now". Start values come
//! straight from the calendar source and take one of three shapes:
//!
//! - RFC 3339 with an offset or `Z` (`2024-01-02T00:30:00Z`)
//! - an offset-less ISO datetime (`2024-01-02T00:30:00`)
//! - a date for all-day events (`2024-01-02`)
//!
//! Offset-less values are read as wall-clock time in the calendar's zone; a
//! date means local midnight. Anything else fails closed: the event is
//! treated as ineligible and a warning is logged.

use chrono::{DateTime, NaiveDate, NaiveDateTime, TimeZone, Utc};
use chrono_tz::Tz;
use tracing::warn;

use crate::constants::{DEFAULT_WINDOW_MAX_HOURS, DEFAULT_WINDOW_MIN_HOURS};
use crate::errors::{EventRelayError, Result, StartTimeError};

const NAIVE_DATETIME_FORMATS: &[&str] = &[
    "%Y-%m-%dT%H:%M:%S%.f",
    "%Y-%m-%dT%H:%M:%S",
    "%Y-%m-%dT%H:%M",
    "%Y-%m-%d %H:%M:%S",
    "%Y-%m-%d %H:%M",
];
const DATE_FORMAT: &str = "%Y-%m-%d";
const MILLIS_PER_HOUR: f64 = 3_600_000.0;

/// Inclusive range of hours-until-start that qualifies for notification.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LeadWindow {
    min_hours: f64,
    max_hours: f64,
}

impl Default for LeadWindow {
    fn default() -> Self {
        Self { min_hours: DEFAULT_WINDOW_MIN_HOURS, max_hours: DEFAULT_WINDOW_MAX_HOURS }
    }
}

impl LeadWindow {
    pub fn new(min_hours: f64, max_hours: f64) -> Result<Self> {
        if !min_hours.is_finite() || !max_hours.is_finite() {
            return Err(EventRelayError::Config("lead window bounds must be finite".into()));
        }
        if min_hours > max_hours {
            return Err(EventRelayError::Config(format!(
                "lead window min_hours ({}) exceeds max_hours ({})",
                min_hours, max_hours
            )));
        }
        Ok(Self { min_hours, max_hours })
    }

    pub fn min_hours(&self) -> f64 {
        self.min_hours
    }

    pub fn max_hours(&self) -> f64 {
        self.max_hours
    }

    pub fn contains_hours(&self, hours: f64) -> bool {
        self.min_hours <= hours && hours <= self.max_hours
    }

    pub fn contains(&self, start: DateTime<Utc>, now: DateTime<Utc>) -> bool {
        self.contains_hours(hours_until(start, now))
    }
}

/// Signed hours from `now` until `start`.
pub fn hours_until(start: DateTime<Utc>, now: DateTime<Utc>) -> f64 {
    (start - now).num_milliseconds() as f64 / MILLIS_PER_HOUR
}

/// Resolve a calendar start value to an instant.
pub fn parse_event_start(value: &str, tz: Tz) -> std::result::Result<DateTime<Utc>, StartTimeError> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return Err(StartTimeError::Empty);
    }

    if let Ok(instant) = DateTime::parse_from_rfc3339(trimmed) {
        return Ok(instant.with_timezone(&Utc));
    }

    let naive = NAIVE_DATETIME_FORMATS
        .iter()
        .find_map(|format| NaiveDateTime::parse_from_str(trimmed, format).ok())
        .or_else(|| {
            NaiveDate::parse_from_str(trimmed, DATE_FORMAT)
                .ok()
                .and_then(|date| date.and_hms_opt(0, 0, 0))
        })
        .ok_or_else(|| StartTimeError::Unparseable(trimmed.to_string()))?;

    // `earliest` picks the first instant of an ambiguous (DST fold) time.
    tz.from_local_datetime(&naive)
        .earliest()
        .map(|local| local.with_timezone(&Utc))
        .ok_or_else(|| StartTimeError::NonexistentLocalTime(trimmed.to_string(), tz.to_string()))
}

/// Deterministic eligibility check.
///
/// Never fails: unparseable input is logged and reported as ineligible.
pub fn is_eligible_at(start_time: &str, now: DateTime<Utc>, window: &LeadWindow, tz: Tz) -> bool {
    match parse_event_start(start_time, tz) {
        Ok(start) => window.contains(start, now),
        Err(err) => {
            warn!(start_time, error = %err, "Cannot resolve event start; treating as outside lead window");
            false
        }
    }
}

/// Eligibility against the wall clock with the default 23–25 h window, UTC
/// for offset-less values.
pub fn is_eligible(start_time: &str) -> bool {
    is_eligible_at(start_time, Utc::now(), &LeadWindow::default(), Tz::UTC)
}

#[cfg(test)]
mod tests {
    use std::sync::{Arc, Mutex};

    use chrono::Duration;

    use super::*;

    fn now() -> DateTime<Utc> {
        DateTime::parse_from_rfc3339("2024-01-01T00:00:00Z").unwrap().with_timezone(&Utc)
    }

    fn eligible(start: &str) -> bool {
        is_eligible_at(start, now(), &LeadWindow::default(), Tz::UTC)
    }

    #[test]
    fn inside_window_is_eligible() {
        assert!(eligible("2024-01-02T00:30:00Z"));
    }

    #[test]
    fn beyond_window_is_not_eligible() {
        assert!(!eligible("2024-01-02T02:00:00Z"));
    }

    #[test]
    fn before_window_is_not_eligible() {
        assert!(!eligible("2024-01-01T22:59:00Z"));
    }

    #[test]
    fn bounds_are_inclusive() {
        assert!(eligible("2024-01-01T23:00:00Z"));
        assert!(eligible("2024-01-02T01:00:00Z"));
        assert!(!eligible("2024-01-02T01:00:01Z"));
    }

    #[test]
    fn past_events_are_not_eligible() {
        assert!(!eligible("2023-12-31T00:00:00Z"));
    }

    #[test]
    fn offsets_are_normalised() {
        // 02:30+02:00 is 00:30Z the next day
        assert!(eligible("2024-01-02T02:30:00+02:00"));
    }

    #[test]
    fn unparseable_input_fails_closed() {
        assert!(!eligible("next tuesday"));
        assert!(!eligible(""));
        assert!(!eligible("2024-13-45T99:00:00Z"));
    }

    #[derive(Clone, Default)]
    struct CapturedLogs(Arc<Mutex<Vec<u8>>>);

    impl std::io::Write for CapturedLogs {
        fn write(&mut self, buf: &[u8]) -> std::io::Result<usize> {
            self.0.lock().unwrap().extend_from_slice(buf);
            Ok(buf.len())
        }

        fn flush(&mut self) -> std::io::Result<()> {
            Ok(())
        }
    }

    #[test]
    fn rejected_start_is_logged_with_its_value() {
        let logs = CapturedLogs::default();
        let writer = logs.clone();
        let subscriber = tracing_subscriber::fmt()
            .with_ansi(false)
            .with_writer(move || writer.clone())
            .finish();

        let accepted = tracing::subscriber::with_default(subscriber, || eligible("next tuesday"));

        assert!(!accepted);
        let output = String::from_utf8(logs.0.lock().unwrap().clone()).unwrap();
        assert!(output.contains("WARN"), "{output}");
        assert!(output.contains("next tuesday"), "{output}");
        assert!(output.contains("Cannot resolve event start"), "{output}");
    }

    #[test]
    fn parse_reports_reason() {
        assert_eq!(parse_event_start("   ", Tz::UTC), Err(StartTimeError::Empty));
        assert!(matches!(
            parse_event_start("soon", Tz::UTC),
            Err(StartTimeError::Unparseable(value)) if value == "soon"
        ));
    }

    #[test]
    fn date_only_resolves_to_local_midnight() {
        let start = parse_event_start("2024-01-02", Tz::UTC).unwrap();
        assert_eq!(start, now() + Duration::hours(24));
        assert!(eligible("2024-01-02"));
    }

    #[test]
    fn date_only_honours_calendar_zone() {
        // Midnight in New York is 05:00Z, 29h after now: outside the window.
        let start = parse_event_start("2024-01-02", chrono_tz::America::New_York).unwrap();
        assert_eq!(hours_until(start, now()), 29.0);
        assert!(!is_eligible_at(
            "2024-01-02",
            now(),
            &LeadWindow::default(),
            chrono_tz::America::New_York
        ));
    }

    #[test]
    fn naive_datetime_uses_calendar_zone() {
        let start = parse_event_start("2024-01-02T00:30:00", Tz::UTC).unwrap();
        assert_eq!(hours_until(start, now()), 24.5);
        let berlin = parse_event_start("2024-01-02T01:30:00", chrono_tz::Europe::Berlin).unwrap();
        assert_eq!(berlin, start);
    }

    #[test]
    fn nonexistent_local_time_fails_closed() {
        // Clocks jump from 02:00 to 03:00 in Berlin on 2024-03-31.
        let result = parse_event_start("2024-03-31T02:30:00", chrono_tz::Europe::Berlin);
        assert!(matches!(result, Err(StartTimeError::NonexistentLocalTime(_, _))));
    }

    #[test]
    fn custom_window() {
        let window = LeadWindow::new(1.0, 2.0).unwrap();
        assert!(is_eligible_at("2024-01-01T01:30:00Z", now(), &window, Tz::UTC));
        assert!(!is_eligible_at("2024-01-02T00:30:00Z", now(), &window, Tz::UTC));
    }

    #[test]
    fn window_rejects_inverted_or_nan_bounds() {
        assert!(LeadWindow::new(25.0, 23.0).is_err());
        assert!(LeadWindow::new(f64::NAN, 23.0).is_err());
    }

    #[test]
    fn wall_clock_variant_rejects_far_future() {
        assert!(!is_eligible("2999-01-01T00:00:00Z"));
    }
}
