//! Configuration management for plasmobackup
//!
//! Settings are layered, lowest priority first:
//!
//! - **Defaults**: built into [`Config::default`]
//! - **File**: an optional YAML, TOML or JSON file
//! - **Environment**: variables prefixed with `PLASMOBACKUP`, nested keys joined by `__`
//! - **Overrides**: command-line flags applied with [`Config::apply_overrides`]
//!
//! Unset source and output paths are resolved by [`paths::resolve`].
//!
//! # Examples
//!
//! ```rust,no_run
//! use plasmobackup_config::{ConfigBuilder, paths};
//!
//! let config = ConfigBuilder::new()
//!     .add_source_file("plasmobackup.yaml")
//!     .add_env_prefix("PLASMOBACKUP")
//!     .build()
//!     .expect("Failed to load configuration");
//!
//! let resolved = paths::resolve(&config.paths).expect("no data directory");
//! println!("Mirroring {} into {}", resolved.source.display(), resolved.output.display());
//! ```

#![deny(missing_docs)]
#![warn(clippy::all, clippy::pedantic, clippy::nursery)]
#![allow(clippy::module_name_repetitions)]

use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use std::time::Duration;

pub mod builder;
pub mod error;
pub mod loader;
pub mod paths;

pub use builder::ConfigBuilder;
pub use error::{ConfigError, ConfigResult};
pub use loader::ConfigLoader;
pub use paths::ResolvedPaths;

/// Main configuration structure
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Source and output locations
    pub paths: PathsConfig,
    /// Companion process monitoring
    pub monitor: MonitorConfig,
    /// Filesystem notifications
    pub watcher: WatcherConfig,
    /// Log sink
    pub logging: LoggingConfig,
}

/// Source and output locations
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct PathsConfig {
    /// Source root; discovered when unset
    pub source: Option<PathBuf>,
    /// Destination root; derived when unset
    pub output: Option<PathBuf>,
    /// Name of the application's data directory searched for on each root
    pub data_dir_name: String,
    /// Subdirectory of the data directory that is mirrored
    pub data_subdir: String,
    /// Name of the default output directory
    pub output_dir_name: String,
    /// Roots searched for the data directory; empty means the platform default
    pub search_roots: Vec<PathBuf>,
}

impl Default for PathsConfig {
    fn default() -> Self {
        Self {
            source: None,
            output: None,
            data_dir_name: "PlasmoAdvancedData".to_string(),
            data_subdir: "Data".to_string(),
            output_dir_name: "PlasmoMeasurementFiles".to_string(),
            search_roots: Vec::new(),
        }
    }
}

/// Companion process monitoring
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct MonitorConfig {
    /// Exact executable name to look for
    pub process_name: String,
    /// Name used in log messages
    pub process_label: String,
    /// Polling interval in milliseconds
    pub poll_interval_ms: u64,
}

impl MonitorConfig {
    /// Polling interval as a duration
    pub fn poll_interval(&self) -> Duration {
        Duration::from_millis(self.poll_interval_ms)
    }
}

impl Default for MonitorConfig {
    fn default() -> Self {
        Self {
            process_name: "pA5.exe".to_string(),
            process_label: "Plasmo".to_string(),
            poll_interval_ms: 5000,
        }
    }
}

/// Filesystem notifications
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct WatcherConfig {
    /// Capacity of the notification channel
    pub channel_capacity: usize,
}

impl Default for WatcherConfig {
    fn default() -> Self {
        Self {
            channel_capacity: 64,
        }
    }
}

/// Log sink configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// Write debug records
    pub debug: bool,
    /// Log file name, created inside the output directory
    pub file_name: String,
    /// Size in bytes at which the log file is rotated
    pub max_file_size: u64,
    /// Number of rotated files to keep
    pub max_files: u32,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            debug: false,
            file_name: "plasmobackup.log".to_string(),
            max_file_size: 10000 * 1024,
            max_files: 10,
        }
    }
}

/// Values given on the command line
#[derive(Debug, Clone, Default)]
pub struct ConfigOverrides {
    /// Source root
    pub source: Option<PathBuf>,
    /// Destination root
    pub output: Option<PathBuf>,
    /// Force debug logging on
    pub debug: bool,
    /// Process name to monitor
    pub process_name: Option<String>,
}

impl Config {
    /// Apply command-line overrides on top of the loaded configuration
    pub fn apply_overrides(&mut self, overrides: ConfigOverrides) {
        if overrides.source.is_some() {
            self.paths.source = overrides.source;
        }
        if overrides.output.is_some() {
            self.paths.output = overrides.output;
        }
        if overrides.debug {
            self.logging.debug = true;
        }
        if let Some(name) = overrides.process_name {
            self.monitor.process_name = name;
        }
    }
}
