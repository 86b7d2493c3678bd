//! Layered configuration builder

use crate::{Config, ConfigError, ConfigResult};
use config::{ConfigBuilder as ConfigBuilderInner, Environment, File, FileFormat};
use std::path::{Path, PathBuf};

/// Minimum accepted log rotation size
const MIN_LOG_FILE_SIZE: u64 = 1024;

/// Separator between nested keys in environment variable names
const ENV_SEPARATOR: &str = "__";

/// Builds a [`Config`] from defaults, files and environment variables
#[derive(Debug)]
pub struct ConfigBuilder {
    inner: ConfigBuilderInner<config::builder::DefaultState>,
    sources: Vec<ConfigSource>,
}

#[derive(Debug, Clone)]
enum ConfigSource {
    File { path: PathBuf, format: FileFormat },
    Environment { prefix: String },
}

impl ConfigBuilder {
    /// Create a new configuration builder
    pub fn new() -> Self {
        Self {
            inner: config::Config::builder(),
            sources: Vec::new(),
        }
    }

    /// Add a configuration file source; missing files are skipped
    pub fn add_source_file<P: AsRef<Path>>(mut self, path: P) -> Self {
        let path = path.as_ref().to_path_buf();
        let format = Self::detect_format(&path);
        self.sources.push(ConfigSource::File { path, format });
        self
    }

    /// Add environment variable source with prefix
    pub fn add_env_prefix<S: Into<String>>(mut self, prefix: S) -> Self {
        self.sources.push(ConfigSource::Environment {
            prefix: prefix.into(),
        });
        self
    }

    /// Build and validate the configuration
    pub fn build(mut self) -> ConfigResult<Config> {
        let defaults = serde_yaml::to_value(Config::default())
            .map_err(|e| ConfigError::other(format!("Failed to serialize defaults: {}", e)))?;
        self.inner = self
            .inner
            .add_source(config::Config::try_from(&defaults)?);

        for source in &self.sources {
            match source {
                ConfigSource::File { path, format } => {
                    if path.exists() {
                        self.inner = self
                            .inner
                            .add_source(File::from(path.clone()).format(*format));
                    }
                }
                ConfigSource::Environment { prefix } => {
                    self.inner = self.inner.add_source(
                        Environment::with_prefix(prefix)
                            .separator(ENV_SEPARATOR)
                            .try_parsing(true),
                    );
                }
            }
        }

        let config: Config = self.inner.build()?.try_deserialize()?;
        Self::validate(&config)?;
        Ok(config)
    }

    fn detect_format(path: &Path) -> FileFormat {
        match path.extension().and_then(|ext| ext.to_str()) {
            Some("toml") => FileFormat::Toml,
            Some("json") => FileFormat::Json,
            _ => FileFormat::Yaml,
        }
    }

    /// Validate the configuration
    pub fn validate(config: &Config) -> ConfigResult<()> {
        if config.monitor.poll_interval_ms == 0 {
            return Err(ConfigError::validation(
                "Poll interval must be greater than 0",
            ));
        }

        if config.monitor.process_name.trim().is_empty() {
            return Err(ConfigError::validation("Process name must not be empty"));
        }

        if config.watcher.channel_capacity == 0 {
            return Err(ConfigError::validation(
                "Watcher channel capacity must be greater than 0",
            ));
        }

        if config.logging.file_name.trim().is_empty() {
            return Err(ConfigError::validation("Log file name must not be empty"));
        }

        if config.logging.max_file_size < MIN_LOG_FILE_SIZE {
            return Err(ConfigError::validation(format!(
                "Log file size must be at least {} bytes",
                MIN_LOG_FILE_SIZE
            )));
        }

        if config.logging.max_files == 0 {
            return Err(ConfigError::validation(
                "At least one rotated log file must be kept",
            ));
        }

        Ok(())
    }
}

impl Default for ConfigBuilder {
    fn default() -> Self {
        Self::new()
    }
}
