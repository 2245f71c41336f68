//! # EventRelay Domain
//!
//! Business domain types and models for EventRelay.
//!
//! This crate contains:
//! - Calendar event, contact and delivery types
//! - Domain error types and Result definitions
//! - Configuration structures
//! - Pure business rules: the lead-window filter and the contact field
//!   extractor
//!
//! ## Architecture
//! - No dependencies on other EventRelay crates
//! - Only external dependencies allowed
//! - Pure domain models and data structures

pub mod config;
pub mod constants;
pub mod errors;
pub mod macros;
pub mod types;
pub mod utils;

// Re-export commonly used items
pub use config::*;
pub use errors::*;
pub use types::*;
pub use utils::contact_parser::extract_contact_fields;
pub use utils::lead_window::{is_eligible, is_eligible_at, parse_event_start, LeadWindow};
