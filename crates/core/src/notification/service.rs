//! Notification pipeline - core business logic

use std::sync::Arc;

use chrono::{DateTime, Utc};
use chrono_tz::Tz;
use eventrelay_domain::{
    extract_contact_fields, is_eligible_at, CalendarEvent, Disposition, DispositionRecord,
    LeadWindow, RunReport,
};
use futures::stream::{self, StreamExt};
use tracing::debug;

use super::ports::{Clock, ContactDelivery, DeliveryLedger, DispositionSink, SystemClock};
use super::sink::TracingDispositionSink;

/// Turns a fetched event list into deliveries.
///
/// Every event yields exactly one [`DispositionRecord`]; nothing that goes
/// wrong for one event affects the others, and `run` itself cannot fail.
pub struct NotificationPipeline {
    delivery: Arc<dyn ContactDelivery>,
    sink: Arc<dyn DispositionSink>,
    clock: Arc<dyn Clock>,
    ledger: Option<Arc<dyn DeliveryLedger>>,
    window: LeadWindow,
    timezone: Tz,
    concurrency: usize,
}

impl NotificationPipeline {
    /// Create a pipeline with the default 23–25 h window, UTC, the wall
    /// clock, tracing output and sequential delivery.
    pub fn new(delivery: Arc<dyn ContactDelivery>) -> Self {
        Self {
            delivery,
            sink: Arc::new(TracingDispositionSink),
            clock: Arc::new(SystemClock),
            ledger: None,
            window: LeadWindow::default(),
            timezone: Tz::UTC,
            concurrency: 1,
        }
    }

    pub fn with_sink(mut self, sink: Arc<dyn DispositionSink>) -> Self {
        self.sink = sink;
        self
    }

    pub fn with_clock(mut self, clock: Arc<dyn Clock>) -> Self {
        self.clock = clock;
        self
    }

    /// Suppress repeat deliveries for events already in the ledger.
    pub fn with_ledger(mut self, ledger: Arc<dyn DeliveryLedger>) -> Self {
        self.ledger = Some(ledger);
        self
    }

    pub fn with_window(mut self, window: LeadWindow) -> Self {
        self.window = window;
        self
    }

    /// Zone for all-day and offset-less start values.
    pub fn with_timezone(mut self, timezone: Tz) -> Self {
        self.timezone = timezone;
        self
    }

    /// Maximum number of deliveries awaited at once. Clamped to at least 1.
    pub fn with_concurrency(mut self, concurrency: usize) -> Self {
        self.concurrency = concurrency.max(1);
        self
    }

    /// Process `events` once, in order.
    ///
    /// Records reach the sink and the report in input order even when
    /// deliveries overlap.
    pub async fn run(&self, events: &[CalendarEvent]) -> RunReport {
        let now = self.clock.now();
        debug!(event_count = events.len(), %now, "Starting notification run");

        let pending: Vec<_> = events.iter().map(|event| self.process(event, now)).collect();
        let mut outcomes = stream::iter(pending).buffered(self.concurrency);

        let mut report = RunReport { records: Vec::with_capacity(events.len()) };
        while let Some(record) = outcomes.next().await {
            self.sink.record(&record);
            report.records.push(record);
        }

        debug!(
            delivered = report.delivered(),
            failed = report.failed(),
            skipped = report.skipped(),
            "Notification run finished"
        );
        report
    }

    async fn process(&self, event: &CalendarEvent, now: DateTime<Utc>) -> DispositionRecord {
        let disposition = self.decide(event, now).await;
        DispositionRecord {
            event_id: event.id.clone(),
            summary: event.display_summary().to_string(),
            disposition,
        }
    }

    async fn decide(&self, event: &CalendarEvent, now: DateTime<Utc>) -> Disposition {
        let Some(start_time) = event.start_time() else {
            debug!(event_id = %event.id, "Event has no start time");
            return Disposition::SkippedWindow;
        };

        if !is_eligible_at(start_time, now, &self.window, self.timezone) {
            return Disposition::SkippedWindow;
        }

        let Some(contact) = extract_contact_fields(event.description.as_deref()).into_contact()
        else {
            return Disposition::SkippedMissingField;
        };

        // An empty id cannot tell events apart, so it never enters the ledger
        let ledger = self.ledger.as_ref().filter(|_| !event.id.is_empty());
        if event.id.is_empty() && self.ledger.is_some() {
            debug!("Event has no id; delivering without dedupe");
        }

        if let Some(ledger) = ledger {
            if ledger.is_delivered(&event.id).await {
                return Disposition::SkippedDuplicate;
            }
        }

        let result = self.delivery.deliver(&contact).await;

        if let Some(ledger) = ledger {
            if result.status.is_success() {
                ledger.mark_delivered(&event.id).await;
            }
        }

        Disposition::from_delivery(&result)
    }
}
