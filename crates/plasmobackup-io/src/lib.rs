//! Filesystem primitives for plasmobackup
//!
//! This crate holds the pieces every mirroring path shares:
//!
//! - **Existence check**: a conservative `path_exists` that only reports absence on "not found"
//! - **Tree copier**: maps a source entry into the destination tree and copies it
//! - **Durable writer**: buffered writes that are synced to storage before completion
//!
//! # Examples
//!
//! ```rust,no_run
//! use plasmobackup_io::TreeCopier;
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let copier = TreeCopier::new("/data/src", "/backup");
//! let entry = copier.copy("/data/src/run1/a.csv").await?;
//! println!("Copied {} bytes", entry.bytes);
//! # Ok(())
//! # }
//! ```

#![deny(missing_docs)]
#![warn(clippy::all, clippy::pedantic, clippy::nursery)]
#![allow(clippy::module_name_repetitions)]

pub mod copy;
pub mod path;
pub mod writer;

pub use copy::TreeCopier;
pub use path::{path_exists, path_exists_sync};
pub use writer::DurableFileWriter;
