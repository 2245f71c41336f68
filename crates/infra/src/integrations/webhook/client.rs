//! Webhook delivery of extracted contacts.
//!
//! Each contact is sent as one JSON `POST`:
//!
//! ```json
//! {"name": "Jane Doe", "phone": "555-1234"}
//! ```
//!
//! There is no retry. Whatever the endpoint answers is reported back with
//! its real status; a request that never produced a response is reported
//! with the transport-failure sentinel.

use std::time::Duration;

use async_trait::async_trait;
use eventrelay_core::ContactDelivery;
use eventrelay_domain::{Contact, DeliveryResult, EventRelayError, Result, WebhookConfig};
use reqwest::Method;
use tracing::{error, info, instrument, warn};
use url::Url;

use crate::http::HttpClient;

const USER_AGENT: &str = concat!("eventrelay/", env!("CARGO_PKG_VERSION"));

/// [`ContactDelivery`] backed by an HTTP webhook.
pub struct WebhookDeliveryClient {
    http: HttpClient,
    endpoint: Url,
}

impl WebhookDeliveryClient {
    pub fn new(endpoint: Url, timeout: Duration) -> Result<Self> {
        let http = HttpClient::builder().timeout(timeout).user_agent(USER_AGENT).build()?;
        Ok(Self { http, endpoint })
    }

    /// Build from validated webhook settings.
    pub fn from_config(config: &WebhookConfig) -> Result<Self> {
        config.validate()?;
        let endpoint = Url::parse(&config.url)
            .map_err(|e| EventRelayError::Config(format!("Invalid webhook url: {}", e)))?;
        Self::new(endpoint, config.timeout())
    }

    pub fn endpoint(&self) -> &Url {
        &self.endpoint
    }

    async fn post(&self, contact: &Contact) -> Result<(u16, String)> {
        let request = self.http.request(Method::POST, self.endpoint.clone()).json(contact);
        let response = self.http.send(request).await?;
        let status = response.status().as_u16();
        let body = response.text().await.map_err(|e| {
            EventRelayError::Network(format!("failed to read webhook response body: {}", e))
        })?;
        Ok((status, body))
    }
}

#[async_trait]
impl ContactDelivery for WebhookDeliveryClient {
    #[instrument(skip_all, fields(endpoint = %self.endpoint))]
    async fn deliver(&self, contact: &Contact) -> DeliveryResult {
        match self.post(contact).await {
            Ok((status, body)) => {
                if (200..300).contains(&status) {
                    info!(
                        name = contact.name(),
                        phone = contact.phone(),
                        status,
                        "Webhook accepted contact"
                    );
                } else {
                    warn!(
                        name = contact.name(),
                        phone = contact.phone(),
                        status,
                        body = %body,
                        "Webhook answered with non-success status"
                    );
                }
                DeliveryResult::http(status, body)
            }
            Err(err) => {
                error!(
                    name = contact.name(),
                    phone = contact.phone(),
                    error = %err,
                    "Webhook delivery failed"
                );
                DeliveryResult::transport_failure(err.to_string())
            }
        }
    }
}
