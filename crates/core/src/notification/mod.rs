//! Event-to-notification pipeline
//!
//! Intake → lead-window filter → contact extraction → delivery, once per
//! event per run.

pub mod ports;
pub mod service;
pub mod sink;

pub use service::NotificationPipeline;
