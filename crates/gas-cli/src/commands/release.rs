//! Version and deployment commands

use std::path::Path;

use colored::Colorize;
use gas_api::WEB_APP_ENTRY_POINT;

use super::{finish, open};
use crate::error::Result;

/// Run the versions command
pub async fn run_versions(root: &Path) -> Result<()> {
    let manager = open(root).await?;
    let mut versions = finish(manager.list_versions().await)?.unwrap_or_default();
    versions.sort_by_key(|v| v.version_number);

    for version in &versions {
        let created = version
            .create_time
            .map(|t| t.format("%Y-%m-%d %H:%M").to_string())
            .unwrap_or_default();
        println!(
            "  {:>4}  {}  {}",
            version.version_number.to_string().cyan(),
            created.dimmed(),
            version.description
        );
    }
    Ok(())
}

/// Run the deployments command
pub async fn run_deployments(root: &Path) -> Result<()> {
    let manager = open(root).await?;
    let deployments = finish(manager.list_deployments().await)?.unwrap_or_default();

    for deployment in &deployments {
        let version = if deployment.is_head() {
            "HEAD".yellow().to_string()
        } else {
            deployment
                .version_number()
                .map(|n| n.to_string())
                .unwrap_or_default()
                .cyan()
                .to_string()
        };
        println!(
            "  {}  {}  {}",
            version,
            deployment.deployment_id,
            deployment.description().unwrap_or_default().dimmed()
        );
        if let Some(url) = deployment.entry_point_url(WEB_APP_ENTRY_POINT) {
            println!("        {}", url.dimmed());
        }
    }
    Ok(())
}

/// Run the create-version command
pub async fn run_create_version(root: &Path, description: &str) -> Result<()> {
    let manager = open(root).await?;
    finish(manager.create_version(description).await)?;
    Ok(())
}

/// Run the deploy command
pub async fn run_deploy(root: &Path, version: u32) -> Result<()> {
    let manager = open(root).await?;
    finish(manager.update_deployment_version(version).await)?;
    Ok(())
}

/// Run the release command
pub async fn run_release(root: &Path, description: &str) -> Result<()> {
    let manager = open(root).await?;
    if let Some(version) = finish(manager.create_version_and_deploy(description).await)? {
        println!("{}:  {}", "Version".dimmed(), version.to_string().cyan());
    }
    Ok(())
}
