//! Scheduling infrastructure for the background calendar poll
//!
//! The scheduler follows these runtime rules:
//! - Explicit lifecycle management (start/stop)
//! - Join handles for spawned tasks
//! - Cancellation token support
//! - Timeout wrapping on all async operations
//! - Structured tracing

pub mod error;
pub mod poll_scheduler;
pub mod relay_job;

pub use error::{SchedulerError, SchedulerResult};
pub use poll_scheduler::{PollJob, PollScheduler, PollSchedulerConfig, TickOutcome};
pub use relay_job::RelayPollJob;
