//! `notify`-backed change source

use async_trait::async_trait;
use notify::event::{AccessKind, AccessMode, ModifyKind};
use notify::{Event, EventKind, RecommendedWatcher, RecursiveMode, Watcher};
use plasmobackup_types::{ChangeSource, Error, Result};
use std::path::{Path, PathBuf};
use tokio::sync::mpsc;
use tracing::{debug, warn};

/// Default capacity of the event channel
pub const DEFAULT_CHANNEL_CAPACITY: usize = 64;

/// Recursive OS-native filesystem watcher
///
/// The watcher callback runs on a thread owned by `notify` and blocks when the
/// channel is full, so no write event is dropped.
pub struct NotifyChangeSource {
    capacity: usize,
    active: Option<(RecommendedWatcher, PathBuf)>,
}

impl NotifyChangeSource {
    /// Create a change source with the given channel capacity
    pub fn new(capacity: usize) -> Self {
        Self {
            capacity: capacity.max(1),
            active: None,
        }
    }
}

impl Default for NotifyChangeSource {
    fn default() -> Self {
        Self::new(DEFAULT_CHANNEL_CAPACITY)
    }
}

impl std::fmt::Debug for NotifyChangeSource {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("NotifyChangeSource")
            .field("capacity", &self.capacity)
            .field("watching", &self.active.as_ref().map(|(_, root)| root))
            .finish()
    }
}

/// Whether a notification describes written content
///
/// Creations, data modifications and close-after-write count. Access,
/// metadata, rename and removal events do not.
pub fn is_write_event(kind: &EventKind) -> bool {
    matches!(
        kind,
        EventKind::Create(_)
            | EventKind::Modify(ModifyKind::Data(_) | ModifyKind::Any)
            | EventKind::Access(AccessKind::Close(AccessMode::Write))
    )
}

#[async_trait]
impl ChangeSource for NotifyChangeSource {
    async fn subscribe(&mut self, root: &Path) -> Result<mpsc::Receiver<PathBuf>> {
        let (tx, rx) = mpsc::channel(self.capacity);

        let mut watcher = notify::recommended_watcher(move |res: notify::Result<Event>| match res {
            Ok(event) => {
                if !is_write_event(&event.kind) {
                    return;
                }
                for path in event.paths {
                    if tx.blocking_send(path).is_err() {
                        return;
                    }
                }
            }
            Err(e) => warn!("Filesystem watcher error: {}", e),
        })
        .map_err(|e| Error::watch(root, e.to_string()))?;

        watcher
            .watch(root, RecursiveMode::Recursive)
            .map_err(|e| Error::watch(root, e.to_string()))?;

        self.active = Some((watcher, root.to_path_buf()));
        Ok(rx)
    }

    fn unsubscribe(&mut self) {
        if let Some((mut watcher, root)) = self.active.take() {
            if let Err(e) = watcher.unwatch(&root) {
                debug!("Unwatching \"{}\" failed: {}", root.display(), e);
            }
        }
    }
}

impl Drop for NotifyChangeSource {
    fn drop(&mut self) {
        self.unsubscribe();
    }
}
