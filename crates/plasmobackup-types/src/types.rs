//! Core data types for plasmobackup
//!
//! Nothing here is persisted. Entries are identified by their path alone and
//! liveness is only ever the result of the latest poll.

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::PathBuf;

use crate::Result;

/// Kind of a filesystem entry
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum EntryKind {
    /// Regular file
    File,
    /// Directory
    Directory,
}

/// What the tree copier did for a single entry
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct CopiedEntry {
    /// Kind of the source entry
    pub kind: EntryKind,
    /// Bytes written to the destination (zero for directories)
    pub bytes: u64,
}

impl CopiedEntry {
    /// A directory was created (or already present)
    pub fn directory() -> Self {
        Self {
            kind: EntryKind::Directory,
            bytes: 0,
        }
    }

    /// A file was copied
    pub fn file(bytes: u64) -> Self {
        Self {
            kind: EntryKind::File,
            bytes,
        }
    }
}

/// Which component triggered a copy
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum CopyOrigin {
    /// Startup pass over pre-existing files
    Initial,
    /// Filesystem change notification
    Watch,
}

impl fmt::Display for CopyOrigin {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Initial => f.write_str("initial"),
            Self::Watch => f.write_str("watch"),
        }
    }
}

/// Result of handling one entry, reported for every copy attempt or skip
#[derive(Debug)]
pub struct CopyOutcome {
    /// Source entry
    pub source: PathBuf,
    /// Mapped destination path
    pub destination: PathBuf,
    /// Component that handled the entry
    pub origin: CopyOrigin,
    /// What happened
    pub status: OutcomeStatus,
}

/// Status of a [`CopyOutcome`]
#[derive(Debug)]
pub enum OutcomeStatus {
    /// Destination already existed, the copier was not invoked
    Skipped,
    /// The copier succeeded
    Copied(CopiedEntry),
    /// The copier failed
    Failed(crate::Error),
}

impl CopyOutcome {
    /// Build an outcome from a copier result
    pub fn from_result(
        source: PathBuf,
        destination: PathBuf,
        origin: CopyOrigin,
        result: Result<CopiedEntry>,
    ) -> Self {
        let status = match result {
            Ok(entry) => OutcomeStatus::Copied(entry),
            Err(error) => OutcomeStatus::Failed(error),
        };
        Self {
            source,
            destination,
            origin,
            status,
        }
    }

    /// Build a skipped outcome
    pub fn skipped(source: PathBuf, destination: PathBuf, origin: CopyOrigin) -> Self {
        Self {
            source,
            destination,
            origin,
            status: OutcomeStatus::Skipped,
        }
    }

    /// Whether the copier failed
    pub fn is_failure(&self) -> bool {
        matches!(self.status, OutcomeStatus::Failed(_))
    }
}

/// Copy statistics
#[derive(Debug, Clone, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct CopyStats {
    /// Number of files copied
    pub files_copied: u64,
    /// Number of directories created
    pub directories_created: u64,
    /// Total bytes copied
    pub bytes_copied: u64,
    /// Number of entries skipped because the destination existed
    pub entries_skipped: u64,
    /// Number of failed copies
    pub errors: u64,
}

impl CopyStats {
    /// Create a new empty statistics instance
    pub fn new() -> Self {
        Self::default()
    }

    /// Account for one outcome
    pub fn record(&mut self, outcome: &CopyOutcome) {
        match &outcome.status {
            OutcomeStatus::Skipped => self.entries_skipped += 1,
            OutcomeStatus::Copied(entry) => match entry.kind {
                EntryKind::File => {
                    self.files_copied += 1;
                    self.bytes_copied += entry.bytes;
                }
                EntryKind::Directory => self.directories_created += 1,
            },
            OutcomeStatus::Failed(_) => self.errors += 1,
        }
    }
}

/// Liveness transition of the monitored process
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum LivenessEvent {
    /// The process appeared
    Running,
    /// The process went away (or could no longer be queried)
    Stopped,
}

impl LivenessEvent {
    /// The transition as a plain boolean
    pub fn is_running(self) -> bool {
        matches!(self, Self::Running)
    }
}

/// Handle to a process found in the process table
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct ProcessHandle {
    /// Operating system process id
    pub pid: u32,
    /// Start time in seconds since the epoch, zero when unknown
    pub started_at: u64,
}

impl ProcessHandle {
    /// Create a new handle
    pub fn new(pid: u32, started_at: u64) -> Self {
        Self { pid, started_at }
    }
}

/// One row of a process table snapshot
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct ProcessEntry {
    /// Executable name as reported by the OS
    pub name: String,
    /// Handle for later liveness queries
    pub handle: ProcessHandle,
}

impl ProcessEntry {
    /// Create a new entry
    pub fn new<S: Into<String>>(name: S, handle: ProcessHandle) -> Self {
        Self {
            name: name.into(),
            handle,
        }
    }
}
