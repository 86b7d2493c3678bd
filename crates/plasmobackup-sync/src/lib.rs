//! Mirroring of the source tree into the destination tree
//!
//! Two paths feed the [`TreeCopier`](plasmobackup_io::TreeCopier):
//!
//! - **Initial sync**: one recursive pass at startup that copies every entry whose
//!   destination does not exist yet
//! - **Change watcher**: copies every path reported by a filesystem notification,
//!   each in its own task and without an existence check
//!
//! Both report what they did through a [`Reporter`].
//!
//! # Examples
//!
//! ```rust,no_run
//! use plasmobackup_io::TreeCopier;
//! use plasmobackup_sync::{ChangeWatcher, InitialSync, NotifyChangeSource, Reporter};
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let copier = TreeCopier::new("/data/src", "/backup");
//! let stats = InitialSync::new(copier.clone(), Reporter::disabled()).run().await?;
//! println!("Copied {} files", stats.files_copied);
//!
//! ChangeWatcher::new(copier, Reporter::disabled())
//!     .run(NotifyChangeSource::default())
//!     .await?;
//! # Ok(())
//! # }
//! ```

#![deny(missing_docs)]
#![warn(clippy::all, clippy::pedantic, clippy::nursery)]
#![allow(clippy::module_name_repetitions)]

pub mod initial;
pub mod notify_source;
pub mod report;
pub mod watcher;

pub use initial::InitialSync;
pub use notify_source::{is_write_event, NotifyChangeSource};
pub use report::{collect, Reporter};
pub use watcher::ChangeWatcher;
