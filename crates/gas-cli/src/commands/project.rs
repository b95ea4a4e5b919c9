//! Project setup commands: init, info, set-id, create-project, add-file,
//! restore-manifest and logout

use std::path::Path;

use colored::Colorize;
use gas_fs::FileType;

use super::{build_manager, finish, open};
use crate::error::{CliError, Result};

/// Run the init command
pub async fn run_init(root: &Path) -> Result<()> {
    let manager = build_manager(root)?;
    finish(manager.initialize(root).await)?;

    let project_id = manager.project_id().await;
    println!("{}:  {}", "Root".dimmed(), root.display());
    if project_id.is_empty() {
        println!(
            "{}:  {} (use {} or {})",
            "Script ID".dimmed(),
            "none".yellow(),
            "gas set-id".cyan(),
            "gas create-project".cyan()
        );
    } else {
        println!("{}:  {}", "Script ID".dimmed(), project_id.cyan());
    }
    Ok(())
}

/// Run the info command
pub async fn run_info(root: &Path) -> Result<()> {
    let manager = open(root).await?;
    let outcome = manager.script_info().await;
    if !outcome.is_success() {
        return Err(CliError::user(outcome.message));
    }

    let lines = outcome.result.unwrap_or_default();
    let mut lines = lines.iter();
    if let Some(first) = lines.next() {
        println!("{}", first.bold());
    }
    for line in lines {
        println!("  {}", line);
    }
    Ok(())
}

/// Run the set-id command
pub async fn run_set_id(root: &Path, id: &str) -> Result<()> {
    let manager = open(root).await?;
    finish(manager.set_project_id(id).await)?;
    Ok(())
}

/// Run the create-project command
pub async fn run_create_project(root: &Path, name: &str) -> Result<()> {
    let manager = open(root).await?;
    if let Some(id) = finish(manager.create_project(name).await)? {
        println!("{}:  {}", "Script ID".dimmed(), id.cyan());
    }
    Ok(())
}

/// Run the add-file command
pub async fn run_add_file(root: &Path, name: &str, file_type: FileType, sync: bool) -> Result<()> {
    let manager = open(root).await?;
    if let Some(path) = finish(manager.add_source_file(name, file_type, sync).await)? {
        println!("  {} {}", "+".green(), path.display());
    }
    Ok(())
}

/// Run the restore-manifest command
pub async fn run_restore_manifest(root: &Path) -> Result<()> {
    let manager = open(root).await?;
    if let Some(path) = finish(manager.restore_manifest().await)? {
        println!("  {} {}", "+".green(), path.display());
    }
    Ok(())
}

/// Run the logout command
///
/// Works without authorizing, so a broken credential can always be removed.
pub async fn run_logout(root: &Path) -> Result<()> {
    let manager = build_manager(root)?;
    manager.attach(root).await;
    finish(manager.clear_credentials().await)?;
    Ok(())
}
