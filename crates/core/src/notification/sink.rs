//! Default disposition sink backed by `tracing`.

use eventrelay_domain::{Disposition, DispositionRecord};
use tracing::{error, info, warn};

use super::ports::DispositionSink;

/// Writes one structured log event per processed calendar event.
#[derive(Debug, Clone, Copy, Default)]
pub struct TracingDispositionSink;

impl DispositionSink for TracingDispositionSink {
    fn record(&self, record: &DispositionRecord) {
        let disposition = record.disposition.kind();
        let summary = record.summary.as_str();
        let event_id = record.event_id.as_str();

        match &record.disposition {
            Disposition::SkippedWindow => {
                info!(%disposition, summary, event_id, "Skipped: not within lead window");
            }
            Disposition::SkippedMissingField => {
                warn!(%disposition, summary, event_id, "Skipped: missing name or phone");
            }
            Disposition::SkippedDuplicate => {
                info!(%disposition, summary, event_id, "Skipped: already delivered");
            }
            Disposition::Delivered { status } => {
                info!(%disposition, summary, event_id, status, "Delivered contact");
            }
            Disposition::DeliveryFailed { error } => {
                let status = record.disposition.status_code();
                error!(%disposition, summary, event_id, status, error = %error, "Delivery failed");
            }
        }
    }
}
