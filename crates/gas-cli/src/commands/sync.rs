//! Download, upload and watch commands

use std::path::Path;
use std::time::{Duration, Instant};

use colored::Colorize;
use gas_core::CANCELLED;
use gas_fs::{BackupManager, SourceLayout};

use super::{finish, open};
use crate::error::{CliError, Result};

const POLL_INTERVAL: Duration = Duration::from_millis(100);

/// Run the download command
pub async fn run_download(root: &Path, version: Option<u32>) -> Result<()> {
    let manager = open(root).await?;
    let written = finish(manager.download(version).await)?.unwrap_or_default();
    for path in &written {
        let shown = path.strip_prefix(root).unwrap_or(path.as_path());
        println!("  {} {}", "+".green(), shown.display());
    }
    Ok(())
}

/// Run the backups command
///
/// Reads the local backup folder only; no authorization needed.
pub fn run_backups(root: &Path) -> Result<()> {
    let layout = SourceLayout::new(root);
    let backups = BackupManager::new(&layout).list_backups()?;

    if backups.is_empty() {
        println!("{}", "No backups yet".dimmed());
        return Ok(());
    }
    println!("{}:", "Backups".bold());
    for backup in &backups {
        println!(
            "  {} {}",
            backup.label.cyan(),
            format!("({} files)", backup.file_count).dimmed()
        );
    }
    Ok(())
}

/// Run the upload command
pub async fn run_upload(root: &Path, autosave: bool) -> Result<()> {
    let manager = open(root).await?;
    let outcome = if autosave {
        manager.create_version_then_upload().await
    } else {
        manager.upload().await
    };
    if let Some(content) = finish(outcome)? {
        println!("  {} files", content.files.len().to_string().cyan());
    }
    Ok(())
}

/// Run the watch command
///
/// Uploads once the source folders have been quiet for `debounce`. A failed
/// upload is reported and watching continues; Ctrl-C stops.
pub async fn run_watch(root: &Path, debounce: Duration) -> Result<()> {
    let manager = open(root).await?;
    let outcome = manager.watcher().await;
    if !outcome.is_success() {
        return Err(CliError::user(outcome.message));
    }
    println!(
        "{} (press {} to stop)",
        outcome.message.green(),
        "Ctrl-C".cyan()
    );
    let Some(watcher) = outcome.result else {
        return Ok(());
    };

    let shutdown = tokio::signal::ctrl_c();
    tokio::pin!(shutdown);
    let mut ticker = tokio::time::interval(POLL_INTERVAL);
    let mut changed_at: Option<Instant> = None;

    loop {
        tokio::select! {
            _ = &mut shutdown => break,
            _ = ticker.tick() => {}
        }

        let events = watcher.drain();
        for event in &events {
            tracing::debug!(path = %event.path.display(), kind = ?event.kind, "Source changed");
        }
        if !events.is_empty() {
            changed_at = Some(Instant::now());
        }
        match changed_at {
            Some(at) if at.elapsed() >= debounce => changed_at = None,
            _ => continue,
        }

        let handle = manager.spawn(|m| async move { m.upload().await });
        let token = handle.cancellation_token();
        tokio::select! {
            outcome = handle.wait() => {
                if outcome.success {
                    println!("{}", outcome.message.green());
                } else {
                    eprintln!("{}", outcome.message.red());
                }
            }
            _ = &mut shutdown => {
                token.cancel();
                eprintln!("{}", CANCELLED.yellow());
                break;
            }
        }
    }

    println!("{}", "Stopped watching".dimmed());
    Ok(())
}
