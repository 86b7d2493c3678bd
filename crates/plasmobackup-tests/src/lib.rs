//! plasmobackup scenario tests
//!
//! The tests live in `tests/`; this library only carries the doubles and
//! fixtures they share.

#![warn(missing_docs)]
#![warn(clippy::all)]

/// Shared doubles and fixtures
pub mod test_utils;
