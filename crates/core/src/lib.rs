//! # EventRelay Core
//!
//! Pure business logic layer - no infrastructure dependencies.
//!
//! This crate contains:
//! - Port/adapter interfaces (traits) for the calendar source, the
//!   delivery client, the disposition sink and the delivery ledger
//! - The notification pipeline that turns fetched events into deliveries
//!
//! ## Architecture Principles
//! - Only depends on `eventrelay-domain`
//! - No HTTP, scheduling or platform code
//! - All external dependencies via traits
//! - Pure, testable business logic

pub mod calendar_ports;
pub mod notification;

pub use calendar_ports::CalendarSource;
pub use notification::ports::{
    Clock, ContactDelivery, DeliveryLedger, DispositionSink, SystemClock,
};
pub use notification::sink::TracingDispositionSink;
pub use notification::NotificationPipeline;
