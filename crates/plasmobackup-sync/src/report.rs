//! Copy outcome reporting
//!
//! Every copy task hands its outcome to a [`Reporter`]. Policy stays "log and
//! continue", but the outcomes are also available as a stream so totals can be
//! kept and tests can assert on what actually happened.

use plasmobackup_types::{CopyOutcome, CopyStats};
use tokio::sync::mpsc;
use tracing::debug;

/// Sink for copy outcomes
#[derive(Debug, Clone, Default)]
pub struct Reporter {
    sender: Option<mpsc::UnboundedSender<CopyOutcome>>,
}

impl Reporter {
    /// Create a reporter together with the receiving end of its outcome stream
    pub fn channel() -> (Self, mpsc::UnboundedReceiver<CopyOutcome>) {
        let (sender, receiver) = mpsc::unbounded_channel();
        (
            Self {
                sender: Some(sender),
            },
            receiver,
        )
    }

    /// Create a reporter that drops every outcome
    pub fn disabled() -> Self {
        Self::default()
    }

    /// Report one outcome
    ///
    /// A receiver that has gone away is not an error; the outcome was already logged.
    pub fn record(&self, outcome: CopyOutcome) {
        if let Some(sender) = &self.sender {
            let _ = sender.send(outcome);
        }
    }
}

/// Drain an outcome stream into running totals
///
/// Returns the final totals once every [`Reporter`] clone has been dropped.
pub async fn collect(mut receiver: mpsc::UnboundedReceiver<CopyOutcome>) -> CopyStats {
    let mut stats = CopyStats::new();
    while let Some(outcome) = receiver.recv().await {
        stats.record(&outcome);
        debug!(
            "Totals: {} files ({} bytes), {} directories, {} skipped, {} failed",
            stats.files_copied,
            stats.bytes_copied,
            stats.directories_created,
            stats.entries_skipped,
            stats.errors
        );
    }
    stats
}
