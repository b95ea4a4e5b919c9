//! Remote project session
//!
//! A [`ProjectSession`] holds the authenticated client, the active project
//! id and what has been learned about that project: metadata, versions and
//! deployments. Cached lists are dropped whenever the project id changes.
//!
//! Two deployments matter:
//!
//! - the *head* deployment has no version number and always serves the
//!   latest saved code (its URL is the dev URL)
//! - the *web-app* deployment is the first one described as
//!   `web app meta-version`; this is the one moved between versions

use crate::config::ManagerConfig;
use crate::{Error, Result};
use gas_api::{
    Authorizer, Connector, Content, Credential, CredentialStore, Deployment, DeploymentConfig,
    Project, ScriptApi, Version, WEB_APP_DEPLOYMENT_DESCRIPTION, WEB_APP_ENTRY_POINT,
};
use gas_fs::io;
use std::path::PathBuf;
use std::sync::Arc;

/// Description of the version created when a project has none.
pub const FIRST_VERSION_DESCRIPTION: &str = "First Version";

/// Text reported when the head deployment has no URL.
pub const NO_DEV_URL: &str = "No development URL found";

/// Authenticated view of one remote project.
pub struct ProjectSession {
    config: ManagerConfig,
    api: Option<Arc<dyn ScriptApi>>,
    credential: Option<Credential>,
    script_id_file: Option<PathBuf>,
    project_id: String,
    project: Option<Project>,
    versions: Option<Vec<Version>>,
    deployments: Option<Vec<Deployment>>,
    head_deployment: Option<Deployment>,
    web_app_deployment: Option<Deployment>,
}

impl ProjectSession {
    pub fn new(config: ManagerConfig) -> Self {
        Self {
            config,
            api: None,
            credential: None,
            script_id_file: None,
            project_id: String::new(),
            project: None,
            versions: None,
            deployments: None,
            head_deployment: None,
            web_app_deployment: None,
        }
    }

    pub fn config(&self) -> &ManagerConfig {
        &self.config
    }

    pub fn is_authenticated(&self) -> bool {
        self.api.is_some() && self.credential.is_some()
    }

    /// A project id is set and a client is available.
    pub fn is_ready(&self) -> bool {
        !self.project_id.is_empty() && self.is_authenticated()
    }

    pub fn project_id(&self) -> &str {
        &self.project_id
    }

    pub fn project(&self) -> Option<&Project> {
        self.project.as_ref()
    }

    pub fn head_deployment(&self) -> Option<&Deployment> {
        self.head_deployment.as_ref()
    }

    pub fn web_app_deployment(&self) -> Option<&Deployment> {
        self.web_app_deployment.as_ref()
    }

    /// Versions known so far, without fetching.
    pub fn cached_versions(&self) -> Option<&[Version]> {
        self.versions.as_deref()
    }

    /// Where a validated project id is remembered.
    pub fn set_script_id_file(&mut self, path: PathBuf) {
        self.script_id_file = Some(path);
    }

    fn api(&self) -> Result<Arc<dyn ScriptApi>> {
        self.api.clone().ok_or(Error::NotReady)
    }

    fn ready_api(&self) -> Result<Arc<dyn ScriptApi>> {
        if self.project_id.is_empty() {
            return Err(Error::NotReady);
        }
        self.api()
    }

    /// Run the authorization flow and build a client from its credential.
    ///
    /// The flow races a timer of `auth_timeout_secs`; when the timer wins the
    /// flow is dropped. A granted credential is saved to `store`.
    pub async fn authenticate(
        &mut self,
        authorizer: &dyn Authorizer,
        connector: &dyn Connector,
        store: Option<&CredentialStore>,
    ) -> Result<()> {
        let scopes = self.config.scopes.clone();
        let timeout = self.config.auth_timeout();

        let credential =
            match tokio::time::timeout(timeout, authorizer.authorize(&scopes)).await {
                Err(_) => {
                    tracing::debug!(?timeout, "Authorization cancelled for taking too long");
                    return Err(Error::AuthTimeout);
                }
                Ok(result) => result?.ok_or(Error::AuthDenied)?,
            };

        if let Some(store) = store {
            store.save(&credential)?;
            tracing::debug!(dir = %store.dir().display(), "Credential file saved");
        }

        self.api = Some(connector.connect(&credential)?);
        self.credential = Some(credential);
        tracing::info!("User authorization succeeded");
        Ok(())
    }

    fn clear_project_state(&mut self) {
        self.project = None;
        self.versions = None;
        self.deployments = None;
        self.head_deployment = None;
        self.web_app_deployment = None;
    }

    /// Switch to project `id`.
    ///
    /// A new non-empty id is validated by fetching the project. A failed id
    /// leaves the session without a project and is not remembered, so trying
    /// it again fetches again. Setting the current id again does nothing.
    pub async fn set_project_id(&mut self, id: &str) -> Result<()> {
        let id = id.trim();
        if id == self.project_id {
            return Ok(());
        }

        self.clear_project_state();
        self.project_id.clear();
        if id.is_empty() {
            return Ok(());
        }

        let api = self.api()?;
        self.project_id = id.to_string();

        let validated = async {
            let project = api.get_project(id).await?;
            self.project = Some(project);
            if self.config.auto_create_web_app_deployment {
                self.resolve_web_app_deployment().await?;
            }
            Ok::<_, Error>(())
        }
        .await;

        if let Err(err) = validated {
            tracing::warn!(script_id = id, error = %err, "Script id validation failed");
            self.project_id.clear();
            self.clear_project_state();
            return Err(Error::ScriptIdValidation {
                script_id: id.to_string(),
            });
        }

        if let Some(path) = &self.script_id_file {
            io::write_text(path, id)?;
        }
        tracing::info!(script_id = id, "Active project set");
        Ok(())
    }

    /// The remembered project id, if any.
    pub fn persisted_project_id(&self) -> Result<Option<String>> {
        let Some(path) = &self.script_id_file else {
            return Ok(None);
        };
        if !path.is_file() {
            tracing::debug!("No saved script id file");
            return Ok(None);
        }
        let id = io::read_text(path)?.trim().to_string();
        Ok((!id.is_empty()).then_some(id))
    }

    /// Forget the remembered project id.
    pub fn forget_project_id(&self) -> Result<()> {
        if let Some(path) = &self.script_id_file {
            io::remove_file_if_exists(path)?;
        }
        Ok(())
    }

    /// Files of the project at `version`, or at head.
    ///
    /// A version must appear in the freshly fetched version list.
    pub async fn get_content(&mut self, version: Option<u32>) -> Result<Content> {
        let api = self.ready_api()?;
        if let Some(version) = version {
            let versions = self.list_versions().await?;
            if !versions.iter().any(|v| v.version_number == version) {
                return Err(Error::UnknownVersion { version });
            }
        }
        Ok(api.get_content(&self.project_id, version).await?)
    }

    /// Overwrite every remote file with `content`.
    pub async fn replace_content(&mut self, content: &Content) -> Result<()> {
        let api = self.ready_api()?;
        api.update_content(&self.project_id, content).await?;
        Ok(())
    }

    /// Fetch every version.
    ///
    /// A project without versions gets a `First Version`, so the list is
    /// never empty afterwards.
    pub async fn list_versions(&mut self) -> Result<Vec<Version>> {
        let api = self.ready_api()?;
        let versions = api.list_versions(&self.project_id).await?;
        if versions.is_empty() {
            tracing::debug!("Project has no versions, creating the first one");
            self.versions = Some(Vec::new());
            self.create_version(FIRST_VERSION_DESCRIPTION).await?;
        } else {
            self.versions = Some(versions);
        }
        Ok(self.versions.clone().unwrap_or_default())
    }

    /// Create a version described by `description` and remember it.
    pub async fn create_version(&mut self, description: &str) -> Result<Version> {
        if description.trim().is_empty() {
            return Err(Error::InvalidDescription);
        }
        let api = self.ready_api()?;
        let version = api.create_version(&self.project_id, description).await?;
        tracing::info!(
            version = version.version_number,
            description,
            "Created version"
        );
        self.versions
            .get_or_insert_with(Vec::new)
            .push(version.clone());
        Ok(version)
    }

    /// Highest version number, at least 1.
    pub async fn latest_version(&mut self) -> Result<u32> {
        let versions = self.list_versions().await?;
        Ok(versions
            .iter()
            .map(|v| v.version_number)
            .max()
            .unwrap_or(1)
            .max(1))
    }

    pub async fn list_deployments(&mut self) -> Result<Vec<Deployment>> {
        let api = self.ready_api()?;
        let deployments = api.list_deployments(&self.project_id).await?;
        self.deployments = Some(deployments.clone());
        Ok(deployments)
    }

    /// Find the head and web-app deployments.
    ///
    /// Without a web-app deployment, one targeting the latest version is
    /// created when enabled; a failure to create it is only logged.
    pub async fn resolve_web_app_deployment(&mut self) -> Result<()> {
        let deployments = self.list_deployments().await?;

        self.head_deployment = deployments.iter().find(|d| d.is_head()).cloned();
        self.web_app_deployment = deployments.iter().find(|d| d.is_web_app()).cloned();

        if self.head_deployment.is_none() {
            tracing::debug!("No head deployment found");
        }
        if self.web_app_deployment.is_some() {
            tracing::debug!("Found web app deployment");
            return Ok(());
        }
        if !self.config.auto_create_web_app_deployment {
            return Ok(());
        }

        tracing::debug!("No web app deployment found, creating one");
        if let Err(err) = self.create_web_app_deployment().await {
            tracing::warn!(error = %err, "Failed to create web-app deployment");
        }
        Ok(())
    }

    async fn create_web_app_deployment(&mut self) -> Result<()> {
        let version = self.latest_version().await?;
        let api = self.ready_api()?;
        let config = DeploymentConfig {
            version_number: Some(version),
            description: Some(WEB_APP_DEPLOYMENT_DESCRIPTION.to_string()),
            ..Default::default()
        };
        let deployment = api.create_deployment(&self.project_id, &config).await?;
        tracing::info!(id = %deployment.deployment_id, version, "Created web-app deployment");
        self.deployments
            .get_or_insert_with(Vec::new)
            .push(deployment.clone());
        self.web_app_deployment = Some(deployment);
        Ok(())
    }

    /// Point the web-app deployment at `version`. Version 0 does nothing.
    pub async fn update_deployment_version(&mut self, version: u32) -> Result<()> {
        if version == 0 {
            return Ok(());
        }
        let api = self.ready_api()?;
        let current = self
            .web_app_deployment
            .as_ref()
            .ok_or(Error::NoWebAppDeployment)?;

        let mut config = current.deployment_config.clone();
        config.version_number = Some(version);
        let updated = api
            .update_deployment(&self.project_id, &current.deployment_id, &config)
            .await?;

        if let Some(cached) = self
            .deployments
            .as_mut()
            .and_then(|all| all.iter_mut().find(|d| d.deployment_id == updated.deployment_id))
        {
            *cached = updated.clone();
        }
        tracing::info!(id = %updated.deployment_id, version, "Web-app deployment updated");
        self.web_app_deployment = Some(updated);
        Ok(())
    }

    /// Create a version and deploy it. A failed deploy leaves the version.
    pub async fn create_version_and_deploy(&mut self, description: &str) -> Result<u32> {
        let version = self.create_version(description).await?.version_number;
        self.update_deployment_version(version).await?;
        Ok(version)
    }

    /// Create a project titled `title` and make it the active one.
    pub async fn create_project(&mut self, title: &str) -> Result<String> {
        let title = title.trim();
        if title.is_empty() {
            return Err(Error::InvalidProjectName);
        }
        let api = self.api()?;
        let project = api.create_project(title).await?;
        tracing::info!(script_id = %project.script_id, title, "Project created");
        self.set_project_id(&project.script_id).await?;
        Ok(project.script_id)
    }

    /// Human-readable summary of the active project.
    pub async fn script_info(&mut self) -> Result<Vec<String>> {
        let Some(project) = self.project.clone() else {
            return Ok(vec!["No Script Info Exists Yet!".to_string()]);
        };
        if self.project_id.is_empty() {
            return Ok(vec!["No Script Info Exists Yet!".to_string()]);
        }

        let mut lines = vec![
            format!("Script ID: {}", self.project_id),
            format!(
                "Project Title {} By {}",
                project.title,
                project.creator_email().unwrap_or("unknown")
            ),
        ];

        if let Some(url) = self
            .web_app_deployment
            .as_ref()
            .and_then(|d| d.entry_point_url(WEB_APP_ENTRY_POINT))
        {
            lines.push(format!("Webapp URL: {}", url));
        }

        let dev_url = self
            .head_deployment
            .as_ref()
            .and_then(|d| d.entry_points.first())
            .and_then(|e| e.url())
            .filter(|url| !url.is_empty())
            .unwrap_or(NO_DEV_URL);
        lines.push(format!("Dev URL: {}", dev_url));

        let latest = self.latest_version().await?;
        let deployed = self
            .web_app_deployment
            .as_ref()
            .and_then(|d| d.version_number())
            .map(|n| n.to_string())
            .unwrap_or_else(|| "deployment config unavailable".to_string());
        lines.push(format!(
            "Your Latest Project Version is {}, Current Deployment Version {}",
            latest, deployed
        ));
        Ok(lines)
    }

    /// Drop the client, the credential and every piece of project state.
    pub fn reset(&mut self) {
        self.api = None;
        self.credential = None;
        self.project_id.clear();
        self.clear_project_state();
    }
}
