//! Calendar event as supplied by the calendar source.

use serde::{Deserialize, Serialize};

use crate::constants::UNTITLED_EVENT_SUMMARY;

/// Start of a calendar event.
///
/// Timed events carry `date_time`; all-day events carry only `date`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EventStart {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub date_time: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub date: Option<String>,
}

impl EventStart {
    /// Timed start, e.g. `2024-01-02T00:30:00Z`.
    pub fn timed(value: impl Into<String>) -> Self {
        Self { date_time: Some(value.into()), date: None }
    }

    /// All-day start, e.g. `2024-01-02`.
    pub fn all_day(value: impl Into<String>) -> Self {
        Self { date_time: None, date: Some(value.into()) }
    }
}

/// Calendar event, immutable once fetched.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CalendarEvent {
    #[serde(default)]
    pub id: String,
    #[serde(default)]
    pub summary: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub start: EventStart,
}

impl CalendarEvent {
    /// Resolved start value: the timed value when present, else the date.
    /// Blank values count as missing.
    pub fn start_time(&self) -> Option<&str> {
        self.start
            .date_time
            .as_deref()
            .filter(|value| !value.trim().is_empty())
            .or_else(|| self.start.date.as_deref().filter(|value| !value.trim().is_empty()))
    }

    /// Summary for log lines; `"No Title"` when the event has none.
    pub fn display_summary(&self) -> &str {
        self.summary.as_deref().unwrap_or(UNTITLED_EVENT_SUMMARY)
    }

    pub fn is_all_day(&self) -> bool {
        self.start.date_time.is_none() && self.start.date.is_some()
    }
}
