//! Command implementations for gas-cli

pub mod project;
pub mod release;
pub mod sync;

pub use project::{
    run_add_file, run_create_project, run_info, run_init, run_logout, run_restore_manifest,
    run_set_id,
};
pub use release::{run_create_version, run_deploy, run_deployments, run_release, run_versions};
pub use sync::{run_backups, run_download, run_upload, run_watch};

use std::path::Path;
use std::sync::Arc;

use colored::Colorize;
use gas_api::{CredentialStore, HttpConnector, TokenAuthorizer};
use gas_core::{ManagerConfig, Outcome, ScriptManager};
use gas_fs::SourceLayout;

use crate::error::{CliError, Result};

/// Build a manager for `root` from its `.gas/config.toml`.
pub fn build_manager(root: &Path) -> Result<ScriptManager> {
    let config = ManagerConfig::load(root)?;
    let layout = SourceLayout::new(root);
    let authorizer = TokenAuthorizer::new(CredentialStore::new(layout.credentials_dir()));
    let connector = HttpConnector::new(config.api_base_url.clone());
    Ok(ScriptManager::new(
        config,
        Arc::new(authorizer),
        Arc::new(connector),
    ))
}

/// Build and initialize a manager, restoring the remembered Script ID.
pub async fn open(root: &Path) -> Result<ScriptManager> {
    let manager = build_manager(root)?;
    let outcome = manager.initialize(root).await;
    if !outcome.is_success() {
        return Err(CliError::user(outcome.message));
    }
    tracing::debug!(project_id = %manager.project_id().await, "{}", outcome.message);
    Ok(manager)
}

/// Print a successful outcome and hand back its result.
pub fn finish<T>(outcome: Outcome<T>) -> Result<Option<T>> {
    if !outcome.is_success() {
        return Err(CliError::user(outcome.message));
    }
    println!("{}", outcome.message.green());
    Ok(outcome.result)
}
