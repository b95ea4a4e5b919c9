//! Session and sync orchestration for Apps Script Sync
//!
//! This crate ties the local store, the splitter and the remote client
//! together:
//!
//! - **Session**: authorization, the active project id, versions and
//!   deployments ([`ProjectSession`])
//! - **Orchestration**: download, upload, project and file creation, version
//!   and deployment tasks ([`ScriptManager`])
//! - **Outcomes**: every task reports an [`Outcome`] instead of an error
//! - **Tasks**: cancellable background operations ([`OperationHandle`])
//!
//! # Architecture
//!
//! ```text
//!                 gas-cli
//!                    |
//!                 gas-core
//!                    |
//!       +------------+------------+
//!       |            |            |
//!    gas-fs      gas-blocks    gas-api
//! ```

pub mod config;
pub mod error;
pub mod manager;
pub mod outcome;
pub mod session;
pub mod task;

pub use config::ManagerConfig;
pub use error::{Error, Result};
pub use manager::{
    AUTOSAVE_DESCRIPTION, HTML_STUB, SERVER_JS_STUB, ScriptManager, collect_content,
};
pub use outcome::Outcome;
pub use session::{FIRST_VERSION_DESCRIPTION, NO_DEV_URL, ProjectSession};
pub use task::{CANCELLED, OperationHandle};
