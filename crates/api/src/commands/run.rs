//! Manual trigger

use std::fmt::Write as _;

use eventrelay_domain::{Disposition, Result, RunReport};

use crate::AppContext;

/// Fetch once, run the pipeline, and return the report.
pub async fn run(ctx: &AppContext) -> Result<RunReport> {
    ctx.run_once().await
}

/// One line per event, then a totals line.
pub fn render_report(report: &RunReport) -> String {
    let mut out = String::new();

    for record in &report.records {
        let detail = match &record.disposition {
            Disposition::Delivered { status } => format!(" (status {status})"),
            Disposition::DeliveryFailed { error } => format!(" ({error})"),
            _ => String::new(),
        };
        let _ = writeln!(
            out,
            "{:<22} {} {}{}",
            record.disposition.kind().to_string(),
            record.event_id,
            record.summary,
            detail
        );
    }

    let _ = write!(
        out,
        "{} events: {} delivered, {} failed, {} skipped",
        report.len(),
        report.delivered(),
        report.failed(),
        report.skipped()
    );
    out
}
