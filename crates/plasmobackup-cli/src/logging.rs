//! Log sink initialization

use crate::rotate::RotatingFile;
use anyhow::{Context, Result};
use plasmobackup_config::LoggingConfig;
use std::path::{Path, PathBuf};
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::{fmt, EnvFilter};

/// Route all records to a size-rotating file inside `directory`
///
/// The returned guard must be held until shutdown; dropping it flushes the
/// records still queued for the background writer.
pub fn init_logging(config: &LoggingConfig, directory: &Path) -> Result<(WorkerGuard, PathBuf)> {
    let path = directory.join(&config.file_name);
    let file = RotatingFile::open(&path, config.max_file_size, config.max_files)
        .with_context(|| format!("Could not open log file {}", path.display()))?;
    let path = file.path().to_path_buf();
    let (writer, guard) = tracing_appender::non_blocking(file);

    let filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(level(config.debug)))
        .context("Invalid log filter")?;

    fmt()
        .with_env_filter(filter)
        .with_writer(writer)
        .with_ansi(false)
        .with_target(false)
        .with_file(true)
        .with_line_number(true)
        .try_init()
        .map_err(|e| anyhow::anyhow!("Could not install log subscriber: {}", e))?;

    Ok((guard, path))
}

fn level(debug: bool) -> &'static str {
    if debug {
        "debug"
    } else {
        "info"
    }
}
