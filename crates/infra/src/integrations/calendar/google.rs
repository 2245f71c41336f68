//! Google Calendar v3 event source
//!
//! Lists upcoming events with `events.list`, expanded to single instances
//! and ordered by start time. Only the fields the notification pipeline
//! reads are deserialized.

use std::path::{Path, PathBuf};
use std::sync::Arc;

use async_trait::async_trait;
use chrono::SecondsFormat;
use eventrelay_core::{CalendarSource, Clock, SystemClock};
use eventrelay_domain::{CalendarConfig, CalendarEvent, EventRelayError, EventStart, Result};
use reqwest::Method;
use serde::Deserialize;
use tracing::{debug, instrument, warn};
use url::Url;

use crate::errors::conversions::status_error;
use crate::http::HttpClient;

/// Where the bearer token comes from.
#[derive(Clone)]
pub enum TokenSource {
    Static(String),
    /// JSON file with a `token` or `access_token` field, read on every fetch.
    File(PathBuf),
}

impl std::fmt::Debug for TokenSource {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Static(_) => f.write_str("Static(<redacted>)"),
            Self::File(path) => f.debug_tuple("File").field(path).finish(),
        }
    }
}

impl TokenSource {
    /// Static token wins over the token file.
    pub fn from_config(config: &CalendarConfig) -> Result<Self> {
        if let Some(token) = config.access_token.as_deref().filter(|t| !t.trim().is_empty()) {
            return Ok(Self::Static(token.trim().to_string()));
        }
        if let Some(path) = &config.token_file {
            return Ok(Self::File(path.clone()));
        }
        Err(EventRelayError::Config(
            "calendar.access_token or calendar.token_file is required".into(),
        ))
    }

    pub async fn resolve(&self) -> Result<String> {
        match self {
            Self::Static(token) => Ok(token.clone()),
            Self::File(path) => read_token_file(path).await,
        }
    }
}

#[derive(Debug, Deserialize)]
struct StoredToken {
    token: Option<String>,
    access_token: Option<String>,
}

async fn read_token_file(path: &Path) -> Result<String> {
    let contents = tokio::fs::read_to_string(path).await.map_err(|e| {
        EventRelayError::Auth(format!("Failed to read token file {}: {}", path.display(), e))
    })?;

    let stored: StoredToken = serde_json::from_str(&contents).map_err(|e| {
        EventRelayError::Auth(format!("Invalid token file {}: {}", path.display(), e))
    })?;

    stored
        .token
        .or(stored.access_token)
        .map(|t| t.trim().to_string())
        .filter(|t| !t.is_empty())
        .ok_or_else(|| {
            EventRelayError::Auth(format!("Token file {} has no token", path.display()))
        })
}

/// [`CalendarSource`] for one Google calendar.
pub struct GoogleCalendarSource {
    http: HttpClient,
    events_url: Url,
    max_results: u32,
    token: TokenSource,
    clock: Arc<dyn Clock>,
}

impl GoogleCalendarSource {
    pub fn new(config: &CalendarConfig) -> Result<Self> {
        let http = HttpClient::builder().timeout(config.request_timeout()).build()?;
        Ok(Self {
            http,
            events_url: events_url(&config.api_base, &config.calendar_id)?,
            max_results: config.max_results.max(1),
            token: TokenSource::from_config(config)?,
            clock: Arc::new(SystemClock),
        })
    }

    /// Clock used for `timeMin`.
    pub fn with_clock(mut self, clock: Arc<dyn Clock>) -> Self {
        self.clock = clock;
        self
    }

    pub fn events_url(&self) -> &Url {
        &self.events_url
    }
}

fn events_url(api_base: &str, calendar_id: &str) -> Result<Url> {
    let mut url = Url::parse(api_base)
        .map_err(|e| EventRelayError::Config(format!("Invalid calendar api_base: {}", e)))?;
    url.path_segments_mut()
        .map_err(|_| EventRelayError::Config(format!("Invalid calendar api_base: {api_base}")))?
        .pop_if_empty()
        .extend(["calendars", calendar_id, "events"]);
    Ok(url)
}

#[async_trait]
impl CalendarSource for GoogleCalendarSource {
    #[instrument(skip(self), fields(url = %self.events_url))]
    async fn fetch_upcoming(&self) -> Result<Vec<CalendarEvent>> {
        let access_token = self.token.resolve().await?;
        let time_min = self.clock.now().to_rfc3339_opts(SecondsFormat::Secs, true);

        let request = self
            .http
            .request(Method::GET, self.events_url.clone())
            .bearer_auth(access_token)
            .query(&[
                ("timeMin", time_min),
                ("maxResults", self.max_results.to_string()),
                ("singleEvents", "true".to_string()),
                ("orderBy", "startTime".to_string()),
            ]);

        let response = self.http.send(request).await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            warn!(status = status.as_u16(), body = %body, "Google Calendar API error");
            return Err(status_error(status.as_u16(), status.canonical_reason()));
        }

        let payload: GoogleEventsResponse = response.json().await.map_err(|e| {
            EventRelayError::InvalidInput(format!("Failed to parse Google response: {}", e))
        })?;

        let events: Vec<CalendarEvent> =
            payload.items.into_iter().map(CalendarEvent::from).collect();
        debug!(count = events.len(), "Fetched upcoming events");
        Ok(events)
    }
}

#[derive(Debug, Deserialize)]
struct GoogleEventsResponse {
    #[serde(default)]
    items: Vec<GoogleCalendarEvent>,
}

#[derive(Debug, Deserialize)]
struct GoogleCalendarEvent {
    #[serde(default)]
    id: String,
    summary: Option<String>,
    description: Option<String>,
    #[serde(default)]
    start: EventDateTime,
}

#[derive(Debug, Default, Deserialize)]
struct EventDateTime {
    #[serde(rename = "dateTime")]
    date_time: Option<String>,
    date: Option<String>,
}

impl From<GoogleCalendarEvent> for CalendarEvent {
    fn from(event: GoogleCalendarEvent) -> Self {
        let GoogleCalendarEvent { id, summary, description, start } = event;
        CalendarEvent {
            id,
            summary,
            description,
            start: EventStart { date_time: start.date_time, date: start.date },
        }
    }
}
