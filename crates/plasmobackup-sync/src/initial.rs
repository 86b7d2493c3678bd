//! Initial sync pass over pre-existing files

use crate::Reporter;
use plasmobackup_io::{path_exists, TreeCopier};
use plasmobackup_types::{CopyOrigin, CopyOutcome, CopyStats, Error, Result};
use std::path::{Path, PathBuf};
use tokio::sync::mpsc;
use tracing::{debug, error, info};
use walkdir::WalkDir;

/// Walk entries buffered between the blocking walker and the copy loop
const WALK_BUFFER: usize = 256;

/// One full pass over the source tree, copying every entry whose destination
/// does not exist yet
#[derive(Debug, Clone)]
pub struct InitialSync {
    copier: TreeCopier,
    reporter: Reporter,
}

impl InitialSync {
    /// Create a new initial sync pass
    pub fn new(copier: TreeCopier, reporter: Reporter) -> Self {
        Self { copier, reporter }
    }

    /// Run the pass to completion
    ///
    /// Entries that cannot be read or copied are logged, counted as failures
    /// and the walk goes on. Only a failure of the walker task itself is
    /// returned, as [`Error::Traversal`], which callers must treat as fatal.
    pub async fn run(&self) -> Result<CopyStats> {
        let root = self.copier.source_root().to_path_buf();
        info!("Starting initial sync of {}", root.display());

        let (tx, mut rx) = mpsc::channel::<walkdir::Result<PathBuf>>(WALK_BUFFER);
        let walker = tokio::task::spawn_blocking(move || {
            for entry in WalkDir::new(&root) {
                if tx.blocking_send(entry.map(walkdir::DirEntry::into_path)).is_err() {
                    break;
                }
            }
        });

        let mut stats = CopyStats::new();
        while let Some(item) = rx.recv().await {
            let outcome = match item {
                Ok(source) => self.sync_entry(source).await,
                Err(e) => self.unreadable_entry(&e),
            };
            stats.record(&outcome);
            self.reporter.record(outcome);
        }

        walker
            .await
            .map_err(|e| Error::traversal(format!("walker task failed: {}", e)))?;

        info!(
            "Initial sync finished: {} files, {} directories, {} skipped, {} failed",
            stats.files_copied, stats.directories_created, stats.entries_skipped, stats.errors
        );
        Ok(stats)
    }

    fn unreadable_entry(&self, error: &walkdir::Error) -> CopyOutcome {
        let source = error
            .path()
            .map_or_else(|| self.copier.source_root().to_path_buf(), Path::to_path_buf);
        let destination = self.copier.destination_for(&source);
        error!(
            "Could not read \"{}\" while walking the source tree: {}",
            source.display(),
            error
        );
        CopyOutcome::from_result(
            source,
            destination,
            CopyOrigin::Initial,
            Err(Error::io(error.to_string())),
        )
    }

    async fn sync_entry(&self, source: PathBuf) -> CopyOutcome {
        let destination = self.copier.destination_for(&source);
        if path_exists(&destination).await {
            debug!(
                "Skipping file copy: Source file \"{}\" already exists at \"{}\"",
                source.display(),
                destination.display()
            );
            return CopyOutcome::skipped(source, destination, CopyOrigin::Initial);
        }

        let result = self.copier.copy(&source).await;
        match &result {
            Ok(_) => info!(
                "Initial copy of \"{}\" to \"{}\"",
                source.display(),
                destination.display()
            ),
            Err(e) => error!(
                "Could not copy file from \"{}\" to \"{}\": {}",
                source.display(),
                destination.display(),
                e
            ),
        }
        CopyOutcome::from_result(source, destination, CopyOrigin::Initial, result)
    }
}
