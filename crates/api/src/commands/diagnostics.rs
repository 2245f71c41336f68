//! Offline diagnostics: field extraction and lead-window checks
//!
//! Neither command touches the network, so both work without webhook or
//! calendar credentials.

use std::fmt;

use chrono::{DateTime, Utc};
use chrono_tz::Tz;
use eventrelay_domain::utils::lead_window::hours_until;
use eventrelay_domain::{extract_contact_fields, parse_event_start, LeadWindow, StartTimeError};

/// Render what the extractor finds in `text`.
pub fn extract(text: &str) -> String {
    let fields = extract_contact_fields(Some(text));
    let show = |field: &Option<String>| field.clone().unwrap_or_else(|| "<missing>".into());

    format!(
        "name:     {}\nphone:    {}\ncomplete: {}",
        show(&fields.name),
        show(&fields.phone),
        if fields.is_complete() { "yes" } else { "no" }
    )
}

/// Result of checking one start value against the lead window.
#[derive(Debug, Clone, PartialEq)]
pub struct WindowCheck {
    pub start: DateTime<Utc>,
    pub hours_until: f64,
    pub eligible: bool,
    pub window: LeadWindow,
}

impl fmt::Display for WindowCheck {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "start:       {}", self.start.to_rfc3339())?;
        writeln!(f, "hours until: {:.2}", self.hours_until)?;
        write!(
            f,
            "eligible:    {} (window {}-{} h)",
            if self.eligible { "yes" } else { "no" },
            self.window.min_hours(),
            self.window.max_hours()
        )
    }
}

/// Resolve `timestamp` in `tz` and test it against `window` at `now`.
pub fn check_window(
    timestamp: &str,
    now: DateTime<Utc>,
    window: LeadWindow,
    tz: Tz,
) -> Result<WindowCheck, StartTimeError> {
    let start = parse_event_start(timestamp, tz)?;
    let hours_until = hours_until(start, now);

    Ok(WindowCheck { start, hours_until, eligible: window.contains_hours(hours_until), window })
}
