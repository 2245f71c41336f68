//! End-to-end poll: mock Calendar API → pipeline → mock webhook.

use std::sync::Arc;

use chrono::{DateTime, Utc};
use eventrelay_core::{Clock, NotificationPipeline};
use eventrelay_domain::{CalendarConfig, Disposition};
use eventrelay_infra::{
    GoogleCalendarSource, LedgerConfig, MokaDeliveryLedger, RelayPollJob, WebhookDeliveryClient,
};
use serde_json::json;
use url::Url;
use wiremock::matchers::{body_json, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

struct FixedClock(DateTime<Utc>);

impl Clock for FixedClock {
    fn now(&self) -> DateTime<Utc> {
        self.0
    }
}

async fn calendar_with_bookings() -> MockServer {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/calendars/primary/events"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "items": [
                {
                    "id": "tomorrow",
                    "summary": "Consultation",
                    "description": "Booked online\nName: Jane Doe\nPhone: 555-1234",
                    "start": { "dateTime": "2024-01-02T00:30:00Z" }
                },
                {
                    "id": "no-phone",
                    "summary": "Walk-in",
                    "description": "Name: John Roe",
                    "start": { "dateTime": "2024-01-02T00:45:00Z" }
                },
                {
                    "id": "next-week",
                    "summary": "Follow-up",
                    "description": "Name: Jane Doe\nPhone: 555-1234",
                    "start": { "dateTime": "2024-01-08T00:30:00Z" }
                }
            ]
        })))
        .mount(&server)
        .await;
    server
}

async fn accepting_webhook() -> MockServer {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/add_client"))
        .and(body_json(json!({ "name": "Jane Doe", "phone": "555-1234" })))
        .respond_with(ResponseTemplate::new(200))
        .mount(&server)
        .await;
    server
}

fn relay_job(
    calendar: &MockServer,
    webhook: &MockServer,
    ledger: Option<Arc<MokaDeliveryLedger>>,
) -> RelayPollJob {
    let now = DateTime::parse_from_rfc3339("2024-01-01T00:00:00Z").unwrap().with_timezone(&Utc);
    let clock: Arc<dyn Clock> = Arc::new(FixedClock(now));

    let config = CalendarConfig {
        api_base: calendar.uri(),
        access_token: Some("token".into()),
        ..Default::default()
    };
    let source = GoogleCalendarSource::new(&config).unwrap().with_clock(clock.clone());

    let endpoint = Url::parse(&format!("{}/add_client", webhook.uri())).unwrap();
    let delivery =
        WebhookDeliveryClient::new(endpoint, std::time::Duration::from_secs(5)).unwrap();

    let mut pipeline = NotificationPipeline::new(Arc::new(delivery)).with_clock(clock);
    if let Some(ledger) = ledger {
        pipeline = pipeline.with_ledger(ledger);
    }

    RelayPollJob::new(Arc::new(source), Arc::new(pipeline))
}

#[tokio::test]
async fn single_poll_delivers_only_the_eligible_complete_event() {
    let calendar = calendar_with_bookings().await;
    let webhook = accepting_webhook().await;

    let report = relay_job(&calendar, &webhook, None).run_once().await.expect("poll");

    let dispositions: Vec<_> =
        report.records.iter().map(|r| (r.event_id.as_str(), r.disposition.clone())).collect();
    assert_eq!(
        dispositions,
        vec![
            ("tomorrow", Disposition::Delivered { status: 200 }),
            ("no-phone", Disposition::SkippedMissingField),
            ("next-week", Disposition::SkippedWindow),
        ]
    );
    assert_eq!(webhook.received_requests().await.unwrap().len(), 1);
}

#[tokio::test]
async fn consecutive_polls_repeat_delivery_without_ledger() {
    let calendar = calendar_with_bookings().await;
    let webhook = accepting_webhook().await;
    let job = relay_job(&calendar, &webhook, None);

    job.run_once().await.unwrap();
    job.run_once().await.unwrap();

    assert_eq!(webhook.received_requests().await.unwrap().len(), 2);
}

#[tokio::test]
async fn ledger_suppresses_second_delivery() {
    let calendar = calendar_with_bookings().await;
    let webhook = accepting_webhook().await;
    let ledger = Arc::new(MokaDeliveryLedger::new(LedgerConfig::default()));
    let job = relay_job(&calendar, &webhook, Some(ledger));

    job.run_once().await.unwrap();
    let second = job.run_once().await.unwrap();

    assert_eq!(webhook.received_requests().await.unwrap().len(), 1);
    assert_eq!(second.records[0].disposition, Disposition::SkippedDuplicate);
}
