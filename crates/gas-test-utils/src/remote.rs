//! In-memory stand-in for the Apps Script API.

use async_trait::async_trait;
use chrono::Utc;
use gas_api::{
    Connector, Content, Credential, Creator, Deployment, DeploymentConfig, EntryPoint, Error,
    FileType, Project, RemoteFile, Result, ScriptApi, Version, WEB_APP_ENTRY_POINT, WebApp,
};
use std::collections::{HashMap, HashSet};
use std::sync::{Arc, Mutex, MutexGuard};

/// Manifest written into projects created through the fake.
pub const DEFAULT_MANIFEST: &str =
    "{\n  \"timeZone\": \"America/New_York\",\n  \"exceptionLogging\": \"STACKDRIVER\"\n}";

/// Operations of [`ScriptApi`], used for failure injection and call counts.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ApiOp {
    CreateProject,
    GetProject,
    GetContent,
    UpdateContent,
    ListVersions,
    CreateVersion,
    ListDeployments,
    CreateDeployment,
    UpdateDeployment,
}

/// One recorded call with its interesting arguments.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ApiCall {
    CreateProject { title: String },
    GetProject { script_id: String },
    GetContent { script_id: String, version: Option<u32> },
    UpdateContent { script_id: String, files: Vec<RemoteFile> },
    ListVersions { script_id: String },
    CreateVersion { script_id: String, description: String },
    ListDeployments { script_id: String },
    CreateDeployment { script_id: String, config: DeploymentConfig },
    UpdateDeployment { script_id: String, deployment_id: String, config: DeploymentConfig },
}

impl ApiCall {
    pub fn op(&self) -> ApiOp {
        match self {
            ApiCall::CreateProject { .. } => ApiOp::CreateProject,
            ApiCall::GetProject { .. } => ApiOp::GetProject,
            ApiCall::GetContent { .. } => ApiOp::GetContent,
            ApiCall::UpdateContent { .. } => ApiOp::UpdateContent,
            ApiCall::ListVersions { .. } => ApiOp::ListVersions,
            ApiCall::CreateVersion { .. } => ApiOp::CreateVersion,
            ApiCall::ListDeployments { .. } => ApiOp::ListDeployments,
            ApiCall::CreateDeployment { .. } => ApiOp::CreateDeployment,
            ApiCall::UpdateDeployment { .. } => ApiOp::UpdateDeployment,
        }
    }
}

#[derive(Default)]
struct State {
    projects: HashMap<String, Project>,
    heads: HashMap<String, Content>,
    snapshots: HashMap<(String, u32), Content>,
    versions: HashMap<String, Vec<Version>>,
    deployments: HashMap<String, Vec<Deployment>>,
    calls: Vec<ApiCall>,
    failing: HashSet<ApiOp>,
    next_id: usize,
}

/// In-memory remote service.
///
/// Share it as `Arc<FakeScriptApi>`: hand a [`FakeConnector`] to the code
/// under test and keep the `Arc` to seed state and inspect calls.
#[derive(Default)]
pub struct FakeScriptApi {
    state: Mutex<State>,
}

impl FakeScriptApi {
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    fn state(&self) -> MutexGuard<'_, State> {
        self.state.lock().unwrap()
    }

    /// Register a project with a manifest and a head deployment.
    pub fn add_project(&self, script_id: &str, title: &str, email: Option<&str>) {
        let mut state = self.state();
        state.projects.insert(
            script_id.to_string(),
            Project {
                script_id: script_id.to_string(),
                title: title.to_string(),
                creator: Some(Creator {
                    email: email.map(str::to_string),
                    name: None,
                }),
                create_time: Some(Utc::now()),
                update_time: None,
            },
        );
        let mut content = Content::new(script_id);
        content
            .files
            .push(RemoteFile::new("appsscript", FileType::Json, DEFAULT_MANIFEST));
        state.heads.insert(script_id.to_string(), content);
        state.versions.entry(script_id.to_string()).or_default();
        state.deployments.insert(
            script_id.to_string(),
            vec![Deployment {
                deployment_id: format!("{}-head", script_id),
                deployment_config: DeploymentConfig {
                    script_id: Some(script_id.to_string()),
                    version_number: None,
                    manifest_file_name: Some("appsscript".into()),
                    description: Some("Head deployment".into()),
                },
                entry_points: vec![web_app_entry(&format!(
                    "https://script.google.com/macros/s/{}/dev",
                    script_id
                ))],
                update_time: None,
            }],
        );
    }

    /// Replace the head content of a project.
    pub fn set_files(&self, script_id: &str, files: Vec<RemoteFile>) {
        let mut state = self.state();
        let content = state
            .heads
            .entry(script_id.to_string())
            .or_insert_with(|| Content::new(script_id));
        content.files = files;
    }

    /// Add versions with the given numbers, snapshotting the current head.
    pub fn add_versions(&self, script_id: &str, numbers: &[u32]) {
        let mut state = self.state();
        let head = state.heads.get(script_id).cloned().unwrap_or_default();
        for &number in numbers {
            state
                .snapshots
                .insert((script_id.to_string(), number), head.clone());
            state
                .versions
                .entry(script_id.to_string())
                .or_default()
                .push(Version {
                    script_id: Some(script_id.to_string()),
                    version_number: number,
                    description: format!("Version {}", number),
                    create_time: Some(Utc::now()),
                });
        }
    }

    /// Add a deployment; returns its id.
    pub fn add_deployment(
        &self,
        script_id: &str,
        description: Option<&str>,
        version: Option<u32>,
    ) -> String {
        let mut state = self.state();
        let deployment = new_deployment(&mut state, script_id, DeploymentConfig {
            script_id: Some(script_id.to_string()),
            version_number: version,
            manifest_file_name: Some("appsscript".into()),
            description: description.map(str::to_string),
        });
        let id = deployment.deployment_id.clone();
        state
            .deployments
            .entry(script_id.to_string())
            .or_default()
            .push(deployment);
        id
    }

    /// Remove every deployment of a project, head included.
    pub fn clear_deployments(&self, script_id: &str) {
        self.state().deployments.remove(script_id);
    }

    /// Make every following call of `op` fail with a 500.
    pub fn fail_on(&self, op: ApiOp) {
        self.state().failing.insert(op);
    }

    pub fn clear_failures(&self) {
        self.state().failing.clear();
    }

    pub fn calls(&self) -> Vec<ApiCall> {
        self.state().calls.clone()
    }

    pub fn count(&self, op: ApiOp) -> usize {
        self.state().calls.iter().filter(|c| c.op() == op).count()
    }

    pub fn clear_calls(&self) {
        self.state().calls.clear();
    }

    pub fn files(&self, script_id: &str) -> Vec<RemoteFile> {
        self.state()
            .heads
            .get(script_id)
            .map(|c| c.files.clone())
            .unwrap_or_default()
    }

    pub fn versions(&self, script_id: &str) -> Vec<Version> {
        self.state()
            .versions
            .get(script_id)
            .cloned()
            .unwrap_or_default()
    }

    pub fn deployments(&self, script_id: &str) -> Vec<Deployment> {
        self.state()
            .deployments
            .get(script_id)
            .cloned()
            .unwrap_or_default()
    }

    /// Record `call` and apply failure injection and the project existence check.
    fn begin(&self, call: ApiCall, script_id: Option<&str>) -> Result<MutexGuard<'_, State>> {
        let mut state = self.state();
        let op = call.op();
        state.calls.push(call);
        if state.failing.contains(&op) {
            return Err(Error::Api {
                status: 500,
                message: format!("injected failure for {:?}", op),
            });
        }
        if let Some(id) = script_id
            && !state.projects.contains_key(id)
        {
            return Err(Error::NotFound(format!("Requested entity was not found: {}", id)));
        }
        Ok(state)
    }
}

fn web_app_entry(url: &str) -> EntryPoint {
    EntryPoint {
        entry_point_type: WEB_APP_ENTRY_POINT.to_string(),
        web_app: Some(WebApp {
            url: Some(url.to_string()),
        }),
    }
}

fn new_deployment(state: &mut State, script_id: &str, config: DeploymentConfig) -> Deployment {
    state.next_id += 1;
    let deployment_id = format!("{}-dep-{}", script_id, state.next_id);
    let url = format!("https://script.google.com/macros/s/{}/exec", deployment_id);
    Deployment {
        deployment_id,
        deployment_config: config,
        entry_points: vec![web_app_entry(&url)],
        update_time: Some(Utc::now()),
    }
}

#[async_trait]
impl ScriptApi for FakeScriptApi {
    async fn create_project(&self, title: &str) -> Result<Project> {
        let script_id = {
            let mut state = self.begin(
                ApiCall::CreateProject {
                    title: title.to_string(),
                },
                None,
            )?;
            state.next_id += 1;
            format!("script-{}", state.next_id)
        };
        self.add_project(&script_id, title, Some("owner@example.com"));
        Ok(self.state().projects[&script_id].clone())
    }

    async fn get_project(&self, script_id: &str) -> Result<Project> {
        let state = self.begin(
            ApiCall::GetProject {
                script_id: script_id.to_string(),
            },
            Some(script_id),
        )?;
        Ok(state.projects[script_id].clone())
    }

    async fn get_content(&self, script_id: &str, version: Option<u32>) -> Result<Content> {
        let state = self.begin(
            ApiCall::GetContent {
                script_id: script_id.to_string(),
                version,
            },
            Some(script_id),
        )?;
        let content = match version {
            Some(n) => state.snapshots.get(&(script_id.to_string(), n)).cloned(),
            None => state.heads.get(script_id).cloned(),
        };
        content.ok_or_else(|| Error::NotFound(format!("No content for {} at {:?}", script_id, version)))
    }

    async fn update_content(&self, script_id: &str, content: &Content) -> Result<Content> {
        let mut state = self.begin(
            ApiCall::UpdateContent {
                script_id: script_id.to_string(),
                files: content.files.clone(),
            },
            Some(script_id),
        )?;
        let stored = Content {
            script_id: script_id.to_string(),
            files: content.files.clone(),
        };
        state.heads.insert(script_id.to_string(), stored.clone());
        Ok(stored)
    }

    async fn list_versions(&self, script_id: &str) -> Result<Vec<Version>> {
        let state = self.begin(
            ApiCall::ListVersions {
                script_id: script_id.to_string(),
            },
            Some(script_id),
        )?;
        Ok(state.versions.get(script_id).cloned().unwrap_or_default())
    }

    async fn create_version(&self, script_id: &str, description: &str) -> Result<Version> {
        let mut state = self.begin(
            ApiCall::CreateVersion {
                script_id: script_id.to_string(),
                description: description.to_string(),
            },
            Some(script_id),
        )?;
        let number = state
            .versions
            .get(script_id)
            .and_then(|v| v.iter().map(|v| v.version_number).max())
            .unwrap_or(0)
            + 1;
        let head = state.heads.get(script_id).cloned().unwrap_or_default();
        state.snapshots.insert((script_id.to_string(), number), head);
        let version = Version {
            script_id: Some(script_id.to_string()),
            version_number: number,
            description: description.to_string(),
            create_time: Some(Utc::now()),
        };
        state
            .versions
            .entry(script_id.to_string())
            .or_default()
            .push(version.clone());
        Ok(version)
    }

    async fn list_deployments(&self, script_id: &str) -> Result<Vec<Deployment>> {
        let state = self.begin(
            ApiCall::ListDeployments {
                script_id: script_id.to_string(),
            },
            Some(script_id),
        )?;
        Ok(state.deployments.get(script_id).cloned().unwrap_or_default())
    }

    async fn create_deployment(
        &self,
        script_id: &str,
        config: &DeploymentConfig,
    ) -> Result<Deployment> {
        let mut state = self.begin(
            ApiCall::CreateDeployment {
                script_id: script_id.to_string(),
                config: config.clone(),
            },
            Some(script_id),
        )?;
        let deployment = new_deployment(&mut state, script_id, config.clone());
        state
            .deployments
            .entry(script_id.to_string())
            .or_default()
            .push(deployment.clone());
        Ok(deployment)
    }

    async fn update_deployment(
        &self,
        script_id: &str,
        deployment_id: &str,
        config: &DeploymentConfig,
    ) -> Result<Deployment> {
        let mut state = self.begin(
            ApiCall::UpdateDeployment {
                script_id: script_id.to_string(),
                deployment_id: deployment_id.to_string(),
                config: config.clone(),
            },
            Some(script_id),
        )?;
        let deployment = state
            .deployments
            .get_mut(script_id)
            .and_then(|all| all.iter_mut().find(|d| d.deployment_id == deployment_id))
            .ok_or_else(|| Error::NotFound(format!("Deployment {}", deployment_id)))?;
        deployment.deployment_config = config.clone();
        deployment.update_time = Some(Utc::now());
        Ok(deployment.clone())
    }
}

/// Hands out the shared fake regardless of the credential.
#[derive(Clone)]
pub struct FakeConnector {
    api: Arc<FakeScriptApi>,
}

impl FakeConnector {
    pub fn new(api: Arc<FakeScriptApi>) -> Self {
        Self { api }
    }
}

impl Connector for FakeConnector {
    fn connect(&self, _credential: &Credential) -> Result<Arc<dyn ScriptApi>> {
        Ok(self.api.clone())
    }
}
