//! Calendar integration port interfaces

use async_trait::async_trait;
use eventrelay_domain::{CalendarEvent, Result};

/// Supplies the upcoming events for one poll.
///
/// Implementations own authentication and paging; the pipeline only sees
/// the resulting ordered sequence.
#[async_trait]
pub trait CalendarSource: Send + Sync {
    /// Fetch upcoming events, ordered by start time.
    async fn fetch_upcoming(&self) -> Result<Vec<CalendarEvent>>;
}
