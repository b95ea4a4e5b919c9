//! Local directory store for Apps Script Sync
//!
//! Owns the on-disk shape of a synchronized script project:
//!
//! ```text
//! <root>/
//!   SourceCode/
//!     JAVASCRIPT/   server script files (.js)
//!     HTML/         client markup files (.html)
//!     JSON/         the project manifest (.json)
//!   BACKUPS/
//!     Backup at 10.42.07/...
//! ```
//!
//! Also provides the atomic I/O primitives, the format-agnostic config store
//! and a watcher over the three source folders.

pub mod backup;
pub mod config;
pub mod constants;
pub mod error;
pub mod io;
pub mod layout;
pub mod watch;

pub use backup::{BackupInfo, BackupManager};
pub use config::ConfigStore;
pub use constants::{FileType, SourcePath};
pub use error::{Error, Result};
pub use layout::{SourceLayout, validate_file_stem};
pub use watch::{SourceEvent, SourceEventKind, SourceWatcher};
