//! Change-driven mirroring

use crate::Reporter;
use plasmobackup_io::TreeCopier;
use plasmobackup_types::{ChangeSource, CopyOrigin, CopyOutcome, Result};
use std::path::PathBuf;
use tokio::task::JoinHandle;
use tracing::{error, info};

/// Copies every path reported by a [`ChangeSource`]
///
/// Unlike the initial pass there is no existence check: a notification always
/// results in a copy attempt, overwriting whatever is at the destination.
#[derive(Debug, Clone)]
pub struct ChangeWatcher {
    copier: TreeCopier,
    reporter: Reporter,
}

impl ChangeWatcher {
    /// Create a new change watcher
    pub fn new(copier: TreeCopier, reporter: Reporter) -> Self {
        Self { copier, reporter }
    }

    /// Subscribe to `source` and mirror changes until the event stream ends
    ///
    /// A failed subscription is returned as an error and must be treated as
    /// fatal. Each event is handled in its own task, so copies may overlap and
    /// complete out of order.
    pub async fn run<S: ChangeSource>(&self, mut source: S) -> Result<()> {
        let root = self.copier.source_root().to_path_buf();
        let mut events = source.subscribe(&root).await?;
        info!("Watching \"{}\" for changes", root.display());

        while let Some(path) = events.recv().await {
            self.dispatch(path);
        }

        source.unsubscribe();
        info!("Stopped watching \"{}\"", root.display());
        Ok(())
    }

    /// Copy one changed path in a new task
    pub fn dispatch(&self, path: PathBuf) -> JoinHandle<()> {
        let copier = self.copier.clone();
        let reporter = self.reporter.clone();
        tokio::spawn(async move {
            let destination = copier.destination_for(&path);
            let result = copier.copy(&path).await;
            match &result {
                Ok(_) => info!(
                    "Copied \"{}\" into \"{}\"",
                    path.display(),
                    copier.destination_root().display()
                ),
                Err(e) => error!(
                    "Could not copy \"{}\" into \"{}\": {}",
                    path.display(),
                    copier.destination_root().display(),
                    e
                ),
            }
            reporter.record(CopyOutcome::from_result(
                path,
                destination,
                CopyOrigin::Watch,
                result,
            ));
        })
    }
}
