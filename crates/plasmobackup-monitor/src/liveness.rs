//! Polling liveness monitor for a named process

use plasmobackup_types::{Error, LivenessEvent, ProcessHandle, ProcessTable, Result};
use std::time::Duration;
use tokio::sync::mpsc;
use tokio::time::MissedTickBehavior;
use tracing::{debug, warn};

/// Default polling interval
pub const DEFAULT_POLL_INTERVAL: Duration = Duration::from_millis(5000);

/// Current state of the monitored process
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LivenessState {
    /// Searching the process list on every tick
    NotRunning,
    /// Checking the matched process on every tick
    Running(ProcessHandle),
}

/// Two-state machine that detects start and stop transitions of a process
///
/// Only the name is tracked across a stop: a different process that later
/// shows up under the same name counts as a fresh start.
#[derive(Debug)]
pub struct LivenessMonitor<T> {
    table: T,
    process_name: String,
    poll_interval: Duration,
    state: LivenessState,
}

impl<T: ProcessTable> LivenessMonitor<T> {
    /// Create a monitor for the process with the exact name `process_name`
    pub fn new<S: Into<String>>(table: T, process_name: S, poll_interval: Duration) -> Self {
        Self {
            table,
            process_name: process_name.into(),
            poll_interval,
            state: LivenessState::NotRunning,
        }
    }

    /// Current state
    pub fn state(&self) -> LivenessState {
        self.state
    }

    /// Name of the monitored process
    pub fn process_name(&self) -> &str {
        &self.process_name
    }

    /// Perform one polling tick and return the transition, if any
    pub fn poll(&mut self) -> Option<LivenessEvent> {
        let event = match self.state {
            LivenessState::NotRunning => self.search(),
            LivenessState::Running(handle) => self.check(handle),
        };
        self.table.reclaim();
        event
    }

    fn search(&mut self) -> Option<LivenessEvent> {
        let processes = match self.table.list_processes() {
            Ok(processes) => processes,
            Err(e) => {
                warn!("Could not enumerate processes: {}", e);
                return None;
            }
        };

        let found = processes
            .into_iter()
            .find(|entry| entry.name == self.process_name)?;
        debug!(
            "Found {} with pid {}",
            self.process_name, found.handle.pid
        );
        self.state = LivenessState::Running(found.handle);
        Some(LivenessEvent::Running)
    }

    fn check(&mut self, handle: ProcessHandle) -> Option<LivenessEvent> {
        match self.table.is_alive(&handle) {
            Ok(true) => None,
            Ok(false) => {
                debug!("{} (pid {}) is gone", self.process_name, handle.pid);
                self.state = LivenessState::NotRunning;
                Some(LivenessEvent::Stopped)
            }
            Err(e) => {
                debug!(
                    "Liveness query for {} (pid {}) failed: {}",
                    self.process_name, handle.pid, e
                );
                self.state = LivenessState::NotRunning;
                Some(LivenessEvent::Stopped)
            }
        }
    }
}

impl<T: ProcessTable + 'static> LivenessMonitor<T> {
    /// Poll forever, sending each transition to `events`
    ///
    /// The first tick happens immediately. A full channel makes the monitor wait
    /// for the consumer. Returns only if the receiving side is dropped.
    pub async fn run(mut self, events: mpsc::Sender<LivenessEvent>) -> Result<()> {
        let mut ticker = tokio::time::interval(self.poll_interval);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);

        loop {
            ticker.tick().await;
            if let Some(event) = self.poll() {
                events.send(event).await.map_err(|_| Error::ChannelClosed {
                    channel: "liveness events",
                })?;
            }
        }
    }
}
