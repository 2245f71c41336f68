//! Command handlers
//!
//! Handlers return rendered output; `main` decides where it goes.

pub mod diagnostics;
pub mod run;
pub mod watch;

pub use diagnostics::{check_window, extract, WindowCheck};
pub use run::{render_report, run};
pub use watch::watch_until;
