//! Capability traits at the OS boundaries
//!
//! The liveness monitor and the change watcher only talk to the operating
//! system through these traits, so tests can replace the process table and the
//! notification backend with scripted doubles.

use crate::{ProcessEntry, ProcessHandle, Result};
use async_trait::async_trait;
use std::path::{Path, PathBuf};
use tokio::sync::mpsc;

/// Access to the OS-wide process list
pub trait ProcessTable: Send {
    /// Enumerate all processes currently known to the OS
    fn list_processes(&mut self) -> Result<Vec<ProcessEntry>>;

    /// Check whether a previously listed process is still alive
    fn is_alive(&mut self, handle: &ProcessHandle) -> Result<bool>;

    /// Periodic maintenance hook, called after every poll tick
    ///
    /// Implementations that cache enumeration results can release them here.
    fn reclaim(&mut self) {}
}

/// Source of filesystem change notifications
#[async_trait]
pub trait ChangeSource: Send {
    /// Subscribe to recursive write events under `root`
    ///
    /// Each item received on the returned channel is the path of a changed entry.
    async fn subscribe(&mut self, root: &Path) -> Result<mpsc::Receiver<PathBuf>>;

    /// Release the subscription
    fn unsubscribe(&mut self);
}
