//! Source and output path resolution
//!
//! When no source is configured, the data directory is searched for on every
//! search root (drive roots `A:\` to `Z:\` on Windows, `/` elsewhere) and its
//! data subdirectory becomes the source. When no output is configured, the
//! output directory is placed on the root where the data directory was found,
//! or on the system root if it was not.

use crate::{ConfigError, ConfigResult, PathsConfig};
use plasmobackup_io::path_exists_sync;
use plasmobackup_types::{Error, Result};
use std::path::{Path, PathBuf};
use tracing::{debug, info};

/// Fully resolved source and output roots
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedPaths {
    /// Root that is mirrored
    pub source: PathBuf,
    /// Root that receives the copies
    pub output: PathBuf,
}

impl ResolvedPaths {
    /// Check the source exists and create the output directory if needed
    ///
    /// Either failure is fatal at startup. An output path that exists but is
    /// not a directory is handed to `create_dir_all`, which reports the clash.
    pub fn prepare(&self) -> Result<()> {
        if !path_exists_sync(&self.source) {
            return Err(Error::SourceMissing {
                path: self.source.clone(),
            });
        }

        if !self.output.is_dir() {
            info!("Creating output directory {}", self.output.display());
            std::fs::create_dir_all(&self.output).map_err(|e| Error::DestinationUnavailable {
                path: self.output.clone(),
                message: e.to_string(),
            })?;
        }

        Ok(())
    }
}

/// Resolve the configured paths, discovering defaults for unset ones
pub fn resolve(config: &PathsConfig) -> ConfigResult<ResolvedPaths> {
    let roots = if config.search_roots.is_empty() {
        default_search_roots()
    } else {
        config.search_roots.clone()
    };
    resolve_with_roots(config, &roots)
}

/// Resolve the configured paths against an explicit list of search roots
pub fn resolve_with_roots(config: &PathsConfig, roots: &[PathBuf]) -> ConfigResult<ResolvedPaths> {
    let discovered = if config.source.is_none() || config.output.is_none() {
        discover_data_dir(&config.data_dir_name, roots)
    } else {
        None
    };

    let source = match &config.source {
        Some(source) => source.clone(),
        None => {
            let (_, data_dir) =
                discovered
                    .as_ref()
                    .ok_or_else(|| ConfigError::DataDirectoryNotFound {
                        name: config.data_dir_name.clone(),
                    })?;
            data_dir.join(&config.data_subdir)
        }
    };

    let output = match &config.output {
        Some(output) => output.clone(),
        None => match &discovered {
            Some((root, _)) => root.join(&config.output_dir_name),
            None => system_root().join(&config.output_dir_name),
        },
    };

    debug!(
        "Resolved source {} and output {}",
        source.display(),
        output.display()
    );
    Ok(ResolvedPaths { source, output })
}

/// First root that contains `name`, together with the found directory
pub fn discover_data_dir(name: &str, roots: &[PathBuf]) -> Option<(PathBuf, PathBuf)> {
    roots.iter().find_map(|root| {
        let candidate = root.join(name);
        std::fs::metadata(&candidate)
            .is_ok()
            .then(|| (root.clone(), candidate))
    })
}

/// Roots searched for the data directory on this platform
pub fn default_search_roots() -> Vec<PathBuf> {
    if cfg!(windows) {
        ('A'..='Z')
            .map(|drive| PathBuf::from(format!("{}:\\", drive)))
            .collect()
    } else {
        vec![PathBuf::from("/")]
    }
}

fn system_root() -> &'static Path {
    if cfg!(windows) {
        Path::new("C:\\")
    } else {
        Path::new("/")
    }
}
