//! Liveness event logger

use plasmobackup_types::LivenessEvent;
use tokio::sync::mpsc;
use tracing::info;

/// Writes one info line per liveness transition
#[derive(Debug, Clone)]
pub struct EventLogger {
    label: String,
}

impl EventLogger {
    /// Create a logger that names the process `label` in its messages
    pub fn new<S: Into<String>>(label: S) -> Self {
        Self {
            label: label.into(),
        }
    }

    /// Human-readable line for a transition
    pub fn describe(&self, event: LivenessEvent) -> String {
        if event.is_running() {
            format!("{} is running.", self.label)
        } else {
            format!("{} has stopped.", self.label)
        }
    }

    /// Log transitions until the channel closes, returning how many were logged
    pub async fn run(self, mut events: mpsc::Receiver<LivenessEvent>) -> u64 {
        let mut logged = 0;
        while let Some(event) = events.recv().await {
            info!("{}", self.describe(event));
            logged += 1;
        }
        logged
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case(LivenessEvent::Running, "Plasmo is running.")]
    #[case(LivenessEvent::Stopped, "Plasmo has stopped.")]
    fn test_describe(#[case] event: LivenessEvent, #[case] expected: &str) {
        assert_eq!(EventLogger::new("Plasmo").describe(event), expected);
    }

    #[test]
    fn test_run_consumes_until_closed() {
        let (tx, rx) = mpsc::channel(1);
        let logged = tokio_test::block_on(async move {
            let logger = tokio::spawn(EventLogger::new("Plasmo").run(rx));
            tx.send(LivenessEvent::Running).await.unwrap();
            tx.send(LivenessEvent::Stopped).await.unwrap();
            drop(tx);
            logger.await.unwrap()
        });
        assert_eq!(logged, 2);
    }
}
