//! Apps Script Sync CLI
//!
//! The command-line interface for syncing a local source tree with a Google
//! Apps Script project.

mod cli;
mod commands;
mod error;

use std::path::Path;
use std::time::Duration;

use clap::Parser;
use colored::Colorize;
use tracing_subscriber::EnvFilter;

use cli::{Cli, Commands};
use error::Result;

fn main() {
    if let Err(e) = run() {
        eprintln!("{}: {}", "error".red().bold(), e);
        std::process::exit(1);
    }
}

fn run() -> Result<()> {
    let cli = Cli::parse();

    // --verbose wins over RUST_LOG
    let filter = if cli.verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"))
    };
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(true)
        .init();
    tracing::debug!("Verbose mode enabled");

    let Some(cmd) = cli.command else {
        // No command provided - show help hint
        println!("{} Apps Script Sync CLI", "gas".green().bold());
        println!();
        println!("Run {} for available commands.", "gas --help".cyan());
        return Ok(());
    };

    let runtime = tokio::runtime::Builder::new_multi_thread()
        .enable_all()
        .build()?;
    runtime.block_on(execute_command(&cli.root, cmd))
}

async fn execute_command(root: &Path, cmd: Commands) -> Result<()> {
    match cmd {
        Commands::Init => commands::run_init(root).await,
        Commands::Info => commands::run_info(root).await,
        Commands::SetId { id } => commands::run_set_id(root, &id).await,
        Commands::Download { version } => commands::run_download(root, version).await,
        Commands::Upload { autosave } => commands::run_upload(root, autosave).await,
        Commands::CreateProject { name } => commands::run_create_project(root, &name).await,
        Commands::AddFile { name, kind, sync } => {
            commands::run_add_file(root, &name, kind.into(), sync).await
        }
        Commands::RestoreManifest => commands::run_restore_manifest(root).await,
        Commands::Versions => commands::run_versions(root).await,
        Commands::Deployments => commands::run_deployments(root).await,
        Commands::CreateVersion { description } => {
            commands::run_create_version(root, &description).await
        }
        Commands::Deploy { version } => commands::run_deploy(root, version).await,
        Commands::Release { description } => commands::run_release(root, &description).await,
        Commands::Backups => commands::run_backups(root),
        Commands::Watch { debounce_ms } => {
            commands::run_watch(root, Duration::from_millis(debounce_ms)).await
        }
        Commands::Logout => commands::run_logout(root).await,
    }
}
