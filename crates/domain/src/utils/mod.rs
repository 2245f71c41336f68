//! Pure business rules shared by the pipeline and the CLI diagnostics.

pub mod contact_parser;
pub mod lead_window;
