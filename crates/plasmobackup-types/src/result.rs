//! Result type alias for plasmobackup operations

use crate::Error;

/// Result type alias for plasmobackup operations
pub type Result<T> = std::result::Result<T, Error>;
