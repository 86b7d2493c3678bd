//! Process liveness monitoring for plasmobackup
//!
//! This crate watches for a companion process by name:
//!
//! - **Liveness monitor**: polls a [`ProcessTable`](plasmobackup_types::ProcessTable)
//!   on a fixed interval and emits an event only when the process starts or stops
//! - **Event logger**: turns those events into log lines
//! - **Sysinfo process table**: the production process table
//!
//! # Examples
//!
//! ```rust,no_run
//! use plasmobackup_monitor::{EventLogger, LivenessMonitor, SysinfoProcessTable};
//! use std::time::Duration;
//! use tokio::sync::mpsc;
//!
//! # async fn example() {
//! let (tx, rx) = mpsc::channel(1);
//! let monitor = LivenessMonitor::new(SysinfoProcessTable::new(), "pA5.exe", Duration::from_secs(5));
//! tokio::spawn(monitor.run(tx));
//! EventLogger::new("Plasmo").run(rx).await;
//! # }
//! ```

#![deny(missing_docs)]
#![warn(clippy::all, clippy::pedantic, clippy::nursery)]
#![allow(clippy::module_name_repetitions)]

pub mod liveness;
pub mod logger;
pub mod process;

pub use liveness::{LivenessMonitor, LivenessState, DEFAULT_POLL_INTERVAL};
pub use logger::EventLogger;
pub use process::SysinfoProcessTable;
