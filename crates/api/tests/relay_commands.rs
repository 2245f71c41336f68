//! Integration tests for the run and watch commands
//!
//! The context is built from a plain `Config` pointing at mock Calendar and
//! webhook servers, so these exercise the same wiring as the binary.

use chrono::{Duration, SecondsFormat, Utc};
use eventrelay_domain::{Config, Disposition};
use eventrelay_lib::{commands, AppContext};
use serde_json::json;
use wiremock::matchers::{body_json, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn starts_in(hours: i64) -> String {
    (Utc::now() + Duration::hours(hours)).to_rfc3339_opts(SecondsFormat::Secs, true)
}

async fn calendar() -> MockServer {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/calendars/primary/events"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "items": [
                {
                    "id": "tomorrow",
                    "summary": "Consultation",
                    "description": "Name: Jane Doe\nPhone: 555-1234",
                    "start": { "dateTime": starts_in(24) }
                },
                {
                    "id": "later",
                    "summary": "Follow-up",
                    "description": "Name: John Roe\nPhone: 555-9876",
                    "start": { "dateTime": starts_in(72) }
                }
            ]
        })))
        .mount(&server)
        .await;
    server
}

async fn webhook() -> MockServer {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/add_client"))
        .and(body_json(json!({ "name": "Jane Doe", "phone": "555-1234" })))
        .respond_with(ResponseTemplate::new(200))
        .mount(&server)
        .await;
    server
}

fn config_for(calendar: &MockServer, webhook: &MockServer) -> Config {
    let mut config = Config::default();
    config.calendar.api_base = calendar.uri();
    config.calendar.access_token = Some("test-token".into());
    config.webhook.url = format!("{}/add_client", webhook.uri());
    config
}

#[tokio::test]
async fn run_delivers_eligible_booking_and_renders_summary() {
    let calendar = calendar().await;
    let webhook = webhook().await;
    let ctx = AppContext::new(config_for(&calendar, &webhook)).expect("context");

    let report = commands::run(&ctx).await.expect("run");

    assert_eq!(report.records[0].disposition, Disposition::Delivered { status: 200 });
    assert_eq!(report.records[1].disposition, Disposition::SkippedWindow);
    assert!(commands::render_report(&report).ends_with("2 events: 1 delivered, 0 failed, 1 skipped"));
    assert_eq!(webhook.received_requests().await.unwrap().len(), 1);
}

#[tokio::test]
async fn dedupe_enabled_suppresses_second_run() {
    let calendar = calendar().await;
    let webhook = webhook().await;
    let mut config = config_for(&calendar, &webhook);
    config.dedupe.enabled = true;
    let ctx = AppContext::new(config).expect("context");

    commands::run(&ctx).await.expect("first run");
    let second = commands::run(&ctx).await.expect("second run");

    assert_eq!(second.records[0].disposition, Disposition::SkippedDuplicate);
    assert_eq!(webhook.received_requests().await.unwrap().len(), 1);
}

#[tokio::test]
async fn calendar_failure_fails_run_without_delivery() {
    let calendar = MockServer::start().await;
    Mock::given(method("GET")).respond_with(ResponseTemplate::new(401)).mount(&calendar).await;
    let webhook = webhook().await;
    let ctx = AppContext::new(config_for(&calendar, &webhook)).expect("context");

    assert!(commands::run(&ctx).await.is_err());
    assert!(webhook.received_requests().await.unwrap().is_empty());
}

#[tokio::test(flavor = "multi_thread")]
async fn watch_runs_initial_poll_then_stops_on_shutdown() {
    let calendar = calendar().await;
    let webhook = webhook().await;
    let ctx = AppContext::new(config_for(&calendar, &webhook)).expect("context");

    commands::watch_until(&ctx, true, async {}).await.expect("watch");

    assert_eq!(calendar.received_requests().await.unwrap().len(), 1);
    assert_eq!(webhook.received_requests().await.unwrap().len(), 1);
}

#[tokio::test(flavor = "multi_thread")]
async fn watch_without_initial_run_makes_no_requests() {
    let calendar = calendar().await;
    let webhook = webhook().await;
    let ctx = AppContext::new(config_for(&calendar, &webhook)).expect("context");

    commands::watch_until(&ctx, false, async {}).await.expect("watch");

    assert!(calendar.received_requests().await.unwrap().is_empty());
}
