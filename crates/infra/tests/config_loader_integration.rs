//! Integration tests for configuration loader
//!
//! Tests the end-to-end behavior of loading configuration from files.

use std::io::Write;
use std::path::PathBuf;

use eventrelay_domain::{EventRelayError, LogFormat};
use eventrelay_infra::config;
use tempfile::NamedTempFile;

fn write_config(contents: &str, extension: &str) -> PathBuf {
    let mut temp_file = NamedTempFile::new().expect("Failed to create temp file");
    temp_file.write_all(contents.as_bytes()).expect("Failed to write to temp file");

    let path = temp_file.path().with_extension(extension);
    std::fs::copy(temp_file.path(), &path).expect("Failed to copy file");
    path
}

#[test]
fn test_load_full_toml_config() {
    let path = write_config(
        r#"
[calendar]
calendar_id = "bookings@example.com"
token_file = "/etc/eventrelay/token.json"
max_results = 50
timezone = "America/New_York"

[webhook]
url = "https://hooks.example.com/add_client"
timeout_secs = 5
delivery_concurrency = 4

[window]
min_hours = 23.0
max_hours = 25.0

[schedule]
cron = "0 */5 * * * *"
job_timeout_secs = 120
run_on_start = true

[dedupe]
enabled = true
ttl_hours = 26

[logging]
level = "eventrelay=debug,info"
format = "json"
directory = "/var/log/eventrelay"
"#,
        "toml",
    );

    let config = config::load_from_file(Some(path.clone())).expect("toml config");

    assert_eq!(config.calendar.calendar_id, "bookings@example.com");
    assert_eq!(config.calendar.token_file, Some(PathBuf::from("/etc/eventrelay/token.json")));
    assert_eq!(config.calendar.max_results, 50);
    assert_eq!(config.webhook.delivery_concurrency, 4);
    assert_eq!(config.schedule.job_timeout_secs, 120);
    assert!(config.dedupe.enabled);
    assert_eq!(config.dedupe.ttl_hours, 26);
    assert_eq!(config.logging.format, LogFormat::Json);
    assert!(config.validate().is_ok());

    std::fs::remove_file(path).ok();
}

#[test]
fn test_load_minimal_json_config() {
    let path = write_config(r#"{ "webhook": { "url": "http://localhost:9000/hook" } }"#, "json");

    let config = config::load_from_file(Some(path.clone())).expect("json config");

    assert_eq!(config.webhook.timeout_secs, 10);
    assert_eq!(config.calendar.calendar_id, "primary");
    assert_eq!(config.window.min_hours, 23.0);
    assert!(config.validate().is_ok());

    std::fs::remove_file(path).ok();
}

#[test]
fn test_invalid_values_fail_validation() {
    let path = write_config(
        r#"
[webhook]
url = "not a url"
"#,
        "toml",
    );

    let config = config::load_from_file(Some(path.clone())).expect("parses");
    assert!(matches!(config.validate(), Err(EventRelayError::Config(_))));

    std::fs::remove_file(path).ok();
}

#[test]
fn test_wrong_type_is_config_error() {
    let path = write_config(
        r#"
[window]
min_hours = "twenty-three"
"#,
        "toml",
    );

    let result = config::load_from_file(Some(path.clone()));
    assert!(matches!(result, Err(EventRelayError::Config(msg)) if msg.contains("TOML")));

    std::fs::remove_file(path).ok();
}
