//! # EventRelay App
//!
//! Command-line application layer for EventRelay.
//!
//! This crate contains:
//! - The `eventrelay` CLI definition
//! - Command handlers (manual run, background watch, diagnostics)
//! - Application context (dependency injection)
//!
//! ## Architecture
//! - Depends on `domain`, `core`, and `infra`
//! - Wires the ports of `core` to the adapters of `infra`
//! - Keeps output formatting out of `main` so it can be tested

pub mod cli;
pub mod commands;
pub mod context;
pub mod utils;

// Re-export for convenience
pub use cli::{Cli, Commands};
pub use context::AppContext;
