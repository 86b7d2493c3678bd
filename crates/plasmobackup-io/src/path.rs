//! Path existence checks
//!
//! Only a definite "not found" counts as absent. Any other stat failure, such
//! as a permission error, is reported as present so callers skip the entry
//! rather than copy over something they cannot see.

use std::io;
use std::path::Path;

/// Check whether `path` exists
pub async fn path_exists<P: AsRef<Path>>(path: P) -> bool {
    classify(tokio::fs::metadata(path.as_ref()).await.map(|_| ()))
}

/// Blocking variant of [`path_exists`]
pub fn path_exists_sync<P: AsRef<Path>>(path: P) -> bool {
    classify(std::fs::metadata(path.as_ref()).map(|_| ()))
}

fn classify(stat: io::Result<()>) -> bool {
    match stat {
        Ok(()) => true,
        Err(e) => e.kind() != io::ErrorKind::NotFound,
    }
}
