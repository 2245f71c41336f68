//! Shared test helpers for `eventrelay-core` integration tests.
//!
//! Lightweight in-memory implementations of the pipeline ports so tests can
//! focus on behaviour instead of boilerplate.

#![allow(dead_code)]

pub mod ports;

use eventrelay_domain::{CalendarEvent, EventStart};

/// Event with a timed start and the given description.
pub fn timed_event(id: &str, start: &str, description: Option<&str>) -> CalendarEvent {
    CalendarEvent {
        id: id.to_string(),
        summary: Some(format!("Appointment {id}")),
        description: description.map(str::to_string),
        start: EventStart::timed(start),
    }
}

/// Description carrying a complete contact block.
pub fn contact_notes(name: &str, phone: &str) -> String {
    format!("Booked online\nName: {name}\nPhone: {phone}\n")
}
