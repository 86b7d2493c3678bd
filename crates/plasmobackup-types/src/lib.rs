//! Core type system and error handling for plasmobackup
//!
//! This crate provides the foundational types shared by every plasmobackup crate:
//!
//! - **Error handling**: one error enum with a fatal/recoverable classification
//! - **Core types**: copy outcomes and statistics, liveness events, process handles
//! - **Traits**: the `ProcessTable` and `ChangeSource` capabilities used at the OS boundary
//!
//! # Features
//!
//! - `serde`: Enable serialization support for the data types
//!
//! # Examples
//!
//! ```rust
//! use plasmobackup_types::{CopiedEntry, CopyOrigin, CopyOutcome, CopyStats};
//! use std::path::PathBuf;
//!
//! let outcome = CopyOutcome::from_result(
//!     PathBuf::from("/src/a.txt"),
//!     PathBuf::from("/dst/a.txt"),
//!     CopyOrigin::Initial,
//!     Ok(CopiedEntry::file(2)),
//! );
//! let mut stats = CopyStats::new();
//! stats.record(&outcome);
//! assert_eq!(stats.files_copied, 1);
//! ```

#![deny(missing_docs)]
#![warn(clippy::all, clippy::pedantic, clippy::nursery)]
#![allow(clippy::module_name_repetitions)]

pub mod error;
pub mod result;
pub mod traits;
pub mod types;

// Re-export commonly used types
pub use error::{Error, ErrorKind, ErrorSeverity};
pub use result::Result;
pub use traits::*;
pub use types::*;

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;
    use std::path::PathBuf;

    fn outcome(status: OutcomeStatus) -> CopyOutcome {
        CopyOutcome {
            source: PathBuf::from("/src/a.txt"),
            destination: PathBuf::from("/dst/a.txt"),
            origin: CopyOrigin::Watch,
            status,
        }
    }

    #[test]
    fn test_copy_stats_creation() {
        let stats = CopyStats::new();
        assert_eq!(stats.files_copied, 0);
        assert_eq!(stats.bytes_copied, 0);
        assert_eq!(stats.errors, 0);
    }

    #[test]
    fn test_copy_stats_record() {
        let mut stats = CopyStats::new();
        stats.record(&outcome(OutcomeStatus::Copied(CopiedEntry::file(10))));
        stats.record(&outcome(OutcomeStatus::Copied(CopiedEntry::file(5))));
        stats.record(&outcome(OutcomeStatus::Copied(CopiedEntry::directory())));
        stats.record(&outcome(OutcomeStatus::Skipped));
        stats.record(&outcome(OutcomeStatus::Failed(Error::io("boom"))));

        assert_eq!(stats.files_copied, 2);
        assert_eq!(stats.bytes_copied, 15);
        assert_eq!(stats.directories_created, 1);
        assert_eq!(stats.entries_skipped, 1);
        assert_eq!(stats.errors, 1);
    }

    #[rstest]
    #[case(Ok(CopiedEntry::file(1)), false)]
    #[case(Err(Error::io("denied")), true)]
    fn test_outcome_from_result(#[case] result: Result<CopiedEntry>, #[case] failed: bool) {
        let outcome = CopyOutcome::from_result(
            PathBuf::from("/src/x"),
            PathBuf::from("/dst/x"),
            CopyOrigin::Initial,
            result,
        );
        assert_eq!(outcome.is_failure(), failed);
        assert_eq!(outcome.origin, CopyOrigin::Initial);
    }

    #[test]
    fn test_liveness_event_as_bool() {
        assert!(LivenessEvent::Running.is_running());
        assert!(!LivenessEvent::Stopped.is_running());
    }
}
