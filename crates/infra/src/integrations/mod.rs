//! External service integrations

pub mod calendar;
pub mod webhook;

pub use calendar::GoogleCalendarSource;
pub use webhook::WebhookDeliveryClient;
