//! plasmobackup - keeps a live mirror of the Plasmo data directory
//!
//! On start every file and directory below the source is copied to the output
//! unless it is already there. Afterwards each write in the source tree is
//! copied again, and the Plasmo acquisition process is watched so its starts and
//! stops show up in the log.

mod logging;
mod rotate;

use anyhow::Result;
use clap::Parser;
use plasmobackup_config::{paths, Config, ConfigBuilder, ConfigLoader, ConfigOverrides, ResolvedPaths};
use plasmobackup_io::TreeCopier;
use plasmobackup_monitor::{EventLogger, LivenessMonitor, SysinfoProcessTable};
use plasmobackup_sync::{collect, ChangeWatcher, InitialSync, NotifyChangeSource, Reporter};
use plasmobackup_types::Error;
use std::path::PathBuf;
use tokio::sync::mpsc;
use tracing::{error, info};

/// plasmobackup - mirror the Plasmo data directory while it is being written
#[derive(Parser)]
#[command(
    name = "plasmobackup",
    version = env!("CARGO_PKG_VERSION"),
    about = "Mirror the Plasmo data directory to a backup location"
)]
struct Cli {
    /// Directory to back up (default: <drive>:\PlasmoAdvancedData\Data)
    #[arg(short, long)]
    source: Option<PathBuf>,

    /// Directory receiving the copies (default: <drive>:\PlasmoMeasurementFiles)
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Enable debug logging
    #[arg(short, long)]
    debug: bool,

    /// Configuration file path
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Name of the process to monitor
    #[arg(long)]
    process_name: Option<String>,
}

impl Cli {
    fn overrides(&self) -> ConfigOverrides {
        ConfigOverrides {
            source: self.source.clone(),
            output: self.output.clone(),
            debug: self.debug,
            process_name: self.process_name.clone(),
        }
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let mut config = ConfigLoader::load(cli.config.as_deref())?;
    config.apply_overrides(cli.overrides());
    ConfigBuilder::validate(&config)?;

    let resolved = paths::resolve(&config.paths)?;
    resolved.prepare()?;

    // Held until exit so queued records reach the file.
    let (_guard, log_path) = logging::init_logging(&config.logging, &resolved.output)?;

    info!("plasmobackup v{} starting", env!("CARGO_PKG_VERSION"));
    info!("Logging to {}", log_path.display());
    info!(
        "Backing up {} into {}",
        resolved.source.display(),
        resolved.output.display()
    );

    if let Err(e) = run(config, resolved).await {
        error!(kind = ?e.kind(), "{}", e);
        return Err(e.into());
    }
    Ok(())
}

/// Start every task and wait until one of them fails fatally
async fn run(config: Config, resolved: ResolvedPaths) -> plasmobackup_types::Result<()> {
    let copier = TreeCopier::new(&resolved.source, &resolved.output);
    let (reporter, outcomes) = Reporter::channel();
    let (fatal_tx, mut fatal_rx) = mpsc::channel::<Error>(1);

    tokio::spawn(collect(outcomes));

    let initial = InitialSync::new(copier.clone(), reporter.clone());
    let initial_fatal = fatal_tx.clone();
    tokio::spawn(async move {
        match initial.run().await {
            Ok(stats) => info!(
                "Initial copy finished: {} files, {} directories, {} skipped, {} errors",
                stats.files_copied, stats.directories_created, stats.entries_skipped, stats.errors
            ),
            Err(e) => {
                let _ = initial_fatal.send(e).await;
            }
        }
    });

    let (events_tx, events_rx) = mpsc::channel(1);
    let monitor = LivenessMonitor::new(
        SysinfoProcessTable::new(),
        config.monitor.process_name.clone(),
        config.monitor.poll_interval(),
    );
    tokio::spawn(async move {
        if let Err(e) = monitor.run(events_tx).await {
            let _ = fatal_tx.send(e).await;
        }
    });
    tokio::spawn(EventLogger::new(config.monitor.process_label).run(events_rx));

    let watcher = ChangeWatcher::new(copier, reporter);
    let source = NotifyChangeSource::new(config.watcher.channel_capacity);

    tokio::select! {
        result = watcher.run(source) => result,
        Some(error) = fatal_rx.recv() => Err(error),
    }
}
