//! Doubles for the OS boundaries and filesystem fixtures

use async_trait::async_trait;
use plasmobackup_types::{
    ChangeSource, Error, ProcessEntry, ProcessHandle, ProcessTable, Result,
};
use std::collections::VecDeque;
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use tempfile::TempDir;
use tokio::sync::mpsc;

/// Process table that serves one scripted snapshot per query
///
/// Once the script is exhausted the last snapshot is repeated.
#[derive(Debug, Default)]
pub struct ScriptedProcessTable {
    script: VecDeque<Vec<ProcessEntry>>,
    current: Vec<ProcessEntry>,
    queries: Arc<AtomicUsize>,
}

impl ScriptedProcessTable {
    /// Create a table from a list of snapshots
    pub fn new(script: Vec<Vec<ProcessEntry>>) -> Self {
        Self {
            script: script.into(),
            current: Vec::new(),
            queries: Arc::new(AtomicUsize::new(0)),
        }
    }

    /// Shared counter of queries answered so far
    pub fn queries(&self) -> Arc<AtomicUsize> {
        Arc::clone(&self.queries)
    }

    fn advance(&mut self) -> &[ProcessEntry] {
        self.queries.fetch_add(1, Ordering::SeqCst);
        if let Some(next) = self.script.pop_front() {
            self.current = next;
        }
        &self.current
    }
}

impl ProcessTable for ScriptedProcessTable {
    fn list_processes(&mut self) -> Result<Vec<ProcessEntry>> {
        Ok(self.advance().to_vec())
    }

    fn is_alive(&mut self, handle: &ProcessHandle) -> Result<bool> {
        Ok(self.advance().iter().any(|entry| entry.handle == *handle))
    }
}

/// Snapshot holding only unrelated processes
pub fn idle_snapshot() -> Vec<ProcessEntry> {
    vec![
        ProcessEntry::new("explorer.exe", ProcessHandle::new(4, 10)),
        ProcessEntry::new("svchost.exe", ProcessHandle::new(8, 11)),
    ]
}

/// Snapshot with `name` running as `pid`
pub fn snapshot_with(name: &str, pid: u32) -> Vec<ProcessEntry> {
    let mut snapshot = idle_snapshot();
    snapshot.push(ProcessEntry::new(name, ProcessHandle::new(pid, 1000)));
    snapshot
}

/// Change source fed by the test through a sender
#[derive(Debug)]
pub struct ChannelChangeSource {
    receiver: Option<mpsc::Receiver<PathBuf>>,
    subscribed_root: Arc<Mutex<Option<PathBuf>>>,
}

impl ChannelChangeSource {
    /// Create a source and the sender that drives it
    pub fn new(capacity: usize) -> (Self, mpsc::Sender<PathBuf>) {
        let (tx, rx) = mpsc::channel(capacity);
        (
            Self {
                receiver: Some(rx),
                subscribed_root: Arc::new(Mutex::new(None)),
            },
            tx,
        )
    }

    /// Shared view of the root currently subscribed to, `None` once unsubscribed
    pub fn subscribed_root(&self) -> Arc<Mutex<Option<PathBuf>>> {
        Arc::clone(&self.subscribed_root)
    }

    fn set_root(&self, root: Option<PathBuf>) {
        if let Ok(mut current) = self.subscribed_root.lock() {
            *current = root;
        }
    }
}

#[async_trait]
impl ChangeSource for ChannelChangeSource {
    async fn subscribe(&mut self, root: &Path) -> Result<mpsc::Receiver<PathBuf>> {
        let receiver = self
            .receiver
            .take()
            .ok_or_else(|| Error::watch(root, "already subscribed"))?;
        self.set_root(Some(root.to_path_buf()));
        Ok(receiver)
    }

    fn unsubscribe(&mut self) {
        self.set_root(None);
    }
}

/// Temporary source and destination roots
pub struct Fixture {
    /// Keeps the directories alive
    pub temp_dir: TempDir,
    /// Source root
    pub source: PathBuf,
    /// Destination root
    pub destination: PathBuf,
}

impl Fixture {
    /// Create empty source and destination roots
    pub fn new() -> std::io::Result<Self> {
        let temp_dir = TempDir::new()?;
        let source = temp_dir.path().join("src");
        let destination = temp_dir.path().join("dst");
        fs::create_dir_all(&source)?;
        fs::create_dir_all(&destination)?;
        Ok(Self {
            temp_dir,
            source,
            destination,
        })
    }

    /// Write a file below the source root, creating parents
    pub fn write_source(&self, relative: &str, contents: &[u8]) -> std::io::Result<PathBuf> {
        Self::write(&self.source, relative, contents)
    }

    /// Write a file below the destination root, creating parents
    pub fn write_destination(&self, relative: &str, contents: &[u8]) -> std::io::Result<PathBuf> {
        Self::write(&self.destination, relative, contents)
    }

    fn write(root: &Path, relative: &str, contents: &[u8]) -> std::io::Result<PathBuf> {
        let path = root.join(relative);
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }
        fs::write(&path, contents)?;
        Ok(path)
    }
}
