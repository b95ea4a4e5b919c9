//! The remote client seam.
//!
//! Everything the rest of the workspace asks of the remote service goes
//! through [`ScriptApi`]. The HTTP implementation lives in [`crate::http`];
//! tests plug in an in-memory fake.

use crate::auth::Credential;
use crate::types::{Content, Deployment, DeploymentConfig, Project, Version};
use crate::Result;
use async_trait::async_trait;
use std::sync::Arc;

/// Operations on remote script projects.
#[async_trait]
pub trait ScriptApi: Send + Sync {
    /// Create an empty project titled `title`.
    async fn create_project(&self, title: &str) -> Result<Project>;

    /// Fetch project metadata.
    async fn get_project(&self, script_id: &str) -> Result<Project>;

    /// Fetch the project's files, at `version` or at head when `None`.
    async fn get_content(&self, script_id: &str, version: Option<u32>) -> Result<Content>;

    /// Replace every file of the project with `content`.
    async fn update_content(&self, script_id: &str, content: &Content) -> Result<Content>;

    /// Every version of the project, following pagination to the end.
    async fn list_versions(&self, script_id: &str) -> Result<Vec<Version>>;

    async fn create_version(&self, script_id: &str, description: &str) -> Result<Version>;

    /// Every deployment of the project, following pagination to the end.
    async fn list_deployments(&self, script_id: &str) -> Result<Vec<Deployment>>;

    async fn create_deployment(
        &self,
        script_id: &str,
        config: &DeploymentConfig,
    ) -> Result<Deployment>;

    async fn update_deployment(
        &self,
        script_id: &str,
        deployment_id: &str,
        config: &DeploymentConfig,
    ) -> Result<Deployment>;
}

/// Builds a ready client from a credential.
pub trait Connector: Send + Sync {
    fn connect(&self, credential: &Credential) -> Result<Arc<dyn ScriptApi>>;
}
