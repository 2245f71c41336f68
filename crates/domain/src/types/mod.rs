//! Domain types and models

pub mod contact;
pub mod delivery;
pub mod event;

pub use contact::{Contact, ExtractedFields};
pub use delivery::{
    DeliveryResult, DeliveryStatus, Disposition, DispositionKind, DispositionRecord, RunReport,
};
pub use event::{CalendarEvent, EventStart};
