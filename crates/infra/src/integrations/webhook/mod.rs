//! Outbound webhook integration

pub mod client;

pub use client::WebhookDeliveryClient;
