//! Error types and handling for plasmobackup
//!
//! Every component reports failures through [`Error`]. The binary decides what
//! to do with an error by looking at its [`ErrorSeverity`]: fatal errors end the
//! process, recoverable ones are logged and the component keeps going.

use std::path::PathBuf;

/// Error severity level
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum ErrorSeverity {
    /// The failing operation is abandoned, the process keeps running
    Recoverable,
    /// The process must terminate
    Fatal,
}

/// Main error type for plasmobackup operations
#[derive(thiserror::Error, Debug)]
pub enum Error {
    /// I/O operation failed
    #[error("I/O error: {message}")]
    Io {
        /// Error message from the I/O operation
        message: String,
    },

    /// The source root does not exist
    #[error("The source path \"{path}\" does not exist")]
    SourceMissing {
        /// Configured source root
        path: PathBuf,
    },

    /// The destination root is missing and could not be created
    #[error("The output path \"{path}\" could not be created: {message}")]
    DestinationUnavailable {
        /// Configured destination root
        path: PathBuf,
        /// Reason reported by the filesystem
        message: String,
    },

    /// The recursive walk of the source tree failed
    #[error("Traversal of the source tree failed: {message}")]
    Traversal {
        /// Error message from the directory walker
        message: String,
    },

    /// Subscribing to filesystem notifications failed
    #[error("Could not watch directory \"{path}\": {message}")]
    Watch {
        /// Root that was being watched
        path: PathBuf,
        /// Error message from the notification backend
        message: String,
    },

    /// Querying the process table failed
    #[error("Process query failed: {message}")]
    ProcessQuery {
        /// Error message describing the query failure
        message: String,
    },

    /// Configuration error
    #[error("Configuration error: {message}")]
    Config {
        /// Error message describing the configuration issue
        message: String,
    },

    /// The other end of a channel went away
    #[error("Channel closed: {channel}")]
    ChannelClosed {
        /// Name of the channel
        channel: &'static str,
    },

    /// Generic error with custom message
    #[error("{message}")]
    Other {
        /// Custom error message
        message: String,
    },
}

/// Error kind for categorizing errors
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    /// I/O related errors
    Io,
    /// Startup path validation errors
    Paths,
    /// Source tree traversal errors
    Traversal,
    /// Filesystem notification errors
    Watch,
    /// Process table errors
    Process,
    /// Configuration errors
    Config,
    /// Channel errors
    Channel,
    /// Other errors
    Other,
}

impl Error {
    /// Get the error kind
    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::Io { .. } => ErrorKind::Io,
            Self::SourceMissing { .. } | Self::DestinationUnavailable { .. } => ErrorKind::Paths,
            Self::Traversal { .. } => ErrorKind::Traversal,
            Self::Watch { .. } => ErrorKind::Watch,
            Self::ProcessQuery { .. } => ErrorKind::Process,
            Self::Config { .. } => ErrorKind::Config,
            Self::ChannelClosed { .. } => ErrorKind::Channel,
            Self::Other { .. } => ErrorKind::Other,
        }
    }

    /// Get the error severity level
    pub fn severity(&self) -> ErrorSeverity {
        match self {
            Self::Io { .. } | Self::ProcessQuery { .. } | Self::Other { .. } => {
                ErrorSeverity::Recoverable
            }
            Self::SourceMissing { .. }
            | Self::DestinationUnavailable { .. }
            | Self::Traversal { .. }
            | Self::Watch { .. }
            | Self::Config { .. }
            | Self::ChannelClosed { .. } => ErrorSeverity::Fatal,
        }
    }

    /// Check if this error must terminate the process
    pub fn is_fatal(&self) -> bool {
        self.severity() == ErrorSeverity::Fatal
    }

    /// Create a new I/O error with a message prefix
    pub fn io<S: Into<String>>(message: S) -> Self {
        Self::Io {
            message: message.into(),
        }
    }

    /// Create a new traversal error
    pub fn traversal<S: Into<String>>(message: S) -> Self {
        Self::Traversal {
            message: message.into(),
        }
    }

    /// Create a new watch error
    pub fn watch<P: Into<PathBuf>, S: Into<String>>(path: P, message: S) -> Self {
        Self::Watch {
            path: path.into(),
            message: message.into(),
        }
    }

    /// Create a new process query error
    pub fn process_query<S: Into<String>>(message: S) -> Self {
        Self::ProcessQuery {
            message: message.into(),
        }
    }

    /// Create a new configuration error
    pub fn config<S: Into<String>>(message: S) -> Self {
        Self::Config {
            message: message.into(),
        }
    }

    /// Create a new generic error
    pub fn other<S: Into<String>>(message: S) -> Self {
        Self::Other {
            message: message.into(),
        }
    }
}

impl From<std::io::Error> for Error {
    fn from(error: std::io::Error) -> Self {
        Self::Io {
            message: error.to_string(),
        }
    }
}
