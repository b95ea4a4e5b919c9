//! Sync orchestration
//!
//! [`ScriptManager`] is the public task surface. It sequences the session,
//! the local store and the splitter, and reports every operation as an
//! [`Outcome`]. Nothing here panics or returns an error to the caller.
//!
//! The manager is cheap to clone; clones share one session behind an async
//! mutex, so concurrent operations run one after another.

use crate::config::ManagerConfig;
use crate::session::ProjectSession;
use crate::task::OperationHandle;
use crate::{Error, Outcome, Result};
use gas_api::{
    Authorizer, Connector, Content, CredentialStore, Deployment, MANIFEST_NAME, RemoteFile,
    Version,
};
use gas_blocks::{
    extract_to_sibling, inline_from_sibling, is_placeholder_script, placeholder_file_name,
    placeholder_references,
};
use gas_fs::{
    BackupManager, FileType, SourceLayout, SourceWatcher, io, validate_file_stem,
};
use std::collections::HashSet;
use std::future::Future;
use std::path::PathBuf;
use std::sync::Arc;
use tokio::sync::Mutex;

/// Description of the version created before an autosave upload.
pub const AUTOSAVE_DESCRIPTION: &str = "Autosaved Version";

/// Starting content of a new server script file.
pub const SERVER_JS_STUB: &str = "function myFunction() {\n\n}";

/// Starting content of a new markup file.
pub const HTML_STUB: &str = "<!DOCTYPE html>\n<html>\n  <head>\n    <base target=\"_top\">\n  </head>\n  <body>\n\n  </body>\n</html>";

const UPLOAD_COMPLETE: &str = "File Upload (Sync) Complete";
const SOURCE_FILE_CREATED: &str = "Source File Creation Complete";

struct ManagerState {
    session: ProjectSession,
    layout: Option<SourceLayout>,
    credentials: Option<CredentialStore>,
}

impl ManagerState {
    /// Session and layout, if a project is active and a client is available.
    fn ready(&mut self) -> Result<(&mut ProjectSession, &SourceLayout)> {
        match &self.layout {
            Some(layout) if self.session.is_ready() => Ok((&mut self.session, layout)),
            _ => Err(Error::NotReady),
        }
    }

    fn layout(&self) -> Result<&SourceLayout> {
        self.layout.as_ref().ok_or(Error::NotReady)
    }
}

/// Entry point for syncing one project directory with one remote project.
#[derive(Clone)]
pub struct ScriptManager {
    authorizer: Arc<dyn Authorizer>,
    connector: Arc<dyn Connector>,
    state: Arc<Mutex<ManagerState>>,
}

impl ScriptManager {
    pub fn new(
        config: ManagerConfig,
        authorizer: Arc<dyn Authorizer>,
        connector: Arc<dyn Connector>,
    ) -> Self {
        Self {
            authorizer,
            connector,
            state: Arc::new(Mutex::new(ManagerState {
                session: ProjectSession::new(config),
                layout: None,
                credentials: None,
            })),
        }
    }

    /// Run an operation of this manager in the background.
    ///
    /// ```ignore
    /// let handle = manager.spawn(|m| async move { m.download(None).await });
    /// let outcome = handle.wait().await;
    /// ```
    pub fn spawn<T, F, Fut>(&self, operation: F) -> OperationHandle<T>
    where
        T: Send + 'static,
        F: FnOnce(ScriptManager) -> Fut,
        Fut: Future<Output = Outcome<T>> + Send + 'static,
    {
        OperationHandle::spawn(operation(self.clone()))
    }

    /// Bind the manager to the project at `root` without authenticating.
    ///
    /// Only records paths; nothing is created on disk.
    pub async fn attach(&self, root: impl Into<PathBuf>) {
        let mut state = self.state.lock().await;
        Self::attach_locked(&mut state, SourceLayout::new(root));
    }

    fn attach_locked(state: &mut ManagerState, layout: SourceLayout) {
        state.credentials = Some(CredentialStore::new(layout.credentials_dir()));
        state.session.set_script_id_file(layout.script_id_file());
        state.layout = Some(layout);
    }

    pub async fn layout(&self) -> Option<SourceLayout> {
        self.state.lock().await.layout.clone()
    }

    pub async fn is_ready(&self) -> bool {
        let state = self.state.lock().await;
        state.layout.is_some() && state.session.is_ready()
    }

    pub async fn project_id(&self) -> String {
        self.state.lock().await.session.project_id().to_string()
    }

    /// Authenticate, create the source folders under `root` and restore the
    /// last project id.
    pub async fn initialize(&self, root: impl Into<PathBuf>) -> Outcome<()> {
        let root = root.into();
        let mut guard = self.state.lock().await;
        let state = &mut *guard;

        let result: Result<_> = async {
            Self::attach_locked(state, SourceLayout::new(&root));
            state
                .session
                .authenticate(
                    self.authorizer.as_ref(),
                    self.connector.as_ref(),
                    state.credentials.as_ref(),
                )
                .await?;
            Self::attach_locked(state, SourceLayout::ensure(&root)?);
            restore_project_id(&mut state.session).await;
            Ok(())
        }
        .await;

        Outcome::from_result(result, "Initialization Failed!", |_| {
            "User Authorization Succeeded!".to_string()
        })
    }

    /// Back up the local files, then write every remote file locally.
    ///
    /// Existing files with the same name are overwritten.
    pub async fn download(&self, version: Option<u32>) -> Outcome<Vec<PathBuf>> {
        let mut state = self.state.lock().await;
        let result: Result<_> = async {
            let (session, layout) = state.ready()?;
            let title = session.project().map(|p| p.title.clone());
            BackupManager::new(layout).backup_snapshot(title.as_deref())?;

            let content = session.get_content(version).await?;
            tracing::debug!(files = content.files.len(), "Content received");
            write_content(layout, &content, session.config().split_html_scripts)
        }
        .await;

        Outcome::from_result(result, "Error downloading your Source Code Files", |_| {
            "Source Code Download Complete!".to_string()
        })
    }

    /// Replace the remote files with the local ones.
    pub async fn upload(&self) -> Outcome<Content> {
        let mut state = self.state.lock().await;
        let result: Result<_> = async {
            let (session, layout) = state.ready()?;
            upload_sources(session, layout).await
        }
        .await;

        Outcome::from_result(
            result,
            "Unable to upload. Run with --verbose to view the cause.",
            |_| UPLOAD_COMPLETE.to_string(),
        )
    }

    /// Save an `Autosaved Version`, then upload.
    pub async fn create_version_then_upload(&self) -> Outcome<Content> {
        let mut state = self.state.lock().await;
        let result: Result<_> = async {
            let (session, layout) = state.ready()?;
            session.create_version(AUTOSAVE_DESCRIPTION).await?;
            upload_sources(session, layout).await
        }
        .await;

        Outcome::from_result(result, "Unable to version and upload.", |_| {
            UPLOAD_COMPLETE.to_string()
        })
    }

    /// Create a remote project and make it the active one.
    pub async fn create_project(&self, name: &str) -> Outcome<String> {
        let mut state = self.state.lock().await;
        let result: Result<_> = async {
            if !state.session.is_authenticated() {
                return Err(Error::NotReady);
            }
            state.session.create_project(name).await
        }
        .await;

        Outcome::from_result(result, "Unable to create a new project.", |_| {
            "Project Creation Complete".to_string()
        })
    }

    /// Create a source file with starter content unless it already exists.
    ///
    /// Manifest files are not created this way; see
    /// [`ScriptManager::restore_manifest`]. With `sync`, uploads afterwards.
    pub async fn add_source_file(
        &self,
        name: &str,
        file_type: FileType,
        sync: bool,
    ) -> Outcome<PathBuf> {
        let mut state = self.state.lock().await;
        let result: Result<_> = async {
            let stub = match file_type {
                FileType::ServerJs => SERVER_JS_STUB,
                FileType::Html => HTML_STUB,
                FileType::Json => {
                    tracing::debug!("Unable to create JSON file type with this function");
                    return Ok(None);
                }
            };
            if sync {
                state.ready()?;
            }
            validate_file_stem(name)?;

            let path = state.layout()?.path_for(name, file_type);
            if io::write_text_if_absent(&path, stub)? {
                tracing::debug!(path = %path.display(), "Created file, upload when ready");
            } else {
                tracing::debug!(path = %path.display(), "A file with that name already exists");
            }

            if sync {
                let (session, layout) = state.ready()?;
                upload_sources(session, layout).await?;
            }
            Ok(Some(path))
        }
        .await;

        match result {
            Ok(Some(path)) => Outcome::success(path, SOURCE_FILE_CREATED),
            Ok(None) => Outcome::done(SOURCE_FILE_CREATED),
            Err(err) => Outcome::from_error(err, "Unable to create source code file."),
        }
    }

    /// Write the remote `appsscript` manifest into `JSON/`, leaving every
    /// other local file alone.
    pub async fn restore_manifest(&self) -> Outcome<PathBuf> {
        let mut state = self.state.lock().await;
        let result: Result<_> = async {
            let (session, layout) = state.ready()?;
            let content = session.get_content(None).await?;
            let manifest = content.manifest().ok_or(Error::ManifestMissing)?;
            let path = layout.path_for(MANIFEST_NAME, FileType::Json);
            io::write_text(&path, &manifest.source)?;
            tracing::info!(path = %path.display(), "Manifest restored");
            Ok(path)
        }
        .await;

        Outcome::from_result(
            result,
            "Unable to retrieve the project's manifest source file.",
            |_| {
                "Manifest File (appsscript.json) Creation Complete.\nYou may now try uploading your source code again."
                    .to_string()
            },
        )
    }

    pub async fn list_deployments(&self) -> Outcome<Vec<Deployment>> {
        let mut state = self.state.lock().await;
        let result: Result<_> = async {
            let (session, _) = state.ready()?;
            session.list_deployments().await
        }
        .await;

        Outcome::from_result(result, "Failed to get deployments!", |d| {
            format!("Found {} deployments", d.len())
        })
    }

    pub async fn list_versions(&self) -> Outcome<Vec<Version>> {
        let mut state = self.state.lock().await;
        let result: Result<_> = async {
            let (session, _) = state.ready()?;
            session.list_versions().await
        }
        .await;

        Outcome::from_result(result, "Failed to get versions!", |v| {
            format!("Found {} versions", v.len())
        })
    }

    /// Create a version. The web-app deployment is not moved.
    pub async fn create_version(&self, description: &str) -> Outcome<u32> {
        let mut state = self.state.lock().await;
        let result: Result<_> = async {
            let (session, _) = state.ready()?;
            Ok(session.create_version(description).await?.version_number)
        }
        .await;

        Outcome::from_result(result, "Unable to create a new version.", |n| {
            format!("Created Version Number {}", n)
        })
    }

    /// Point the web-app deployment at an existing version.
    pub async fn update_deployment_version(&self, version: u32) -> Outcome<u32> {
        let mut state = self.state.lock().await;
        let result: Result<_> = async {
            let (session, _) = state.ready()?;
            session.update_deployment_version(version).await?;
            Ok(version)
        }
        .await;

        Outcome::from_result(
            result,
            "Unable to update deployment's version number.",
            |n| format!("Updated Web-App Deployment to Version Number {}", n),
        )
    }

    /// Create a version and point the web-app deployment at it.
    pub async fn create_version_and_deploy(&self, description: &str) -> Outcome<u32> {
        let mut state = self.state.lock().await;
        let result: Result<_> = async {
            let (session, _) = state.ready()?;
            session.create_version_and_deploy(description).await
        }
        .await;

        Outcome::from_result(
            result,
            "Unable to create a new version or deployment.",
            |_| "Created new version and deployment!".to_string(),
        )
    }

    /// Switch the active project. An empty id clears it.
    pub async fn set_project_id(&self, id: &str) -> Outcome<()> {
        let mut state = self.state.lock().await;
        let result: Result<_> = async {
            if !state.session.is_authenticated() {
                return Err(Error::NotReady);
            }
            state.session.set_project_id(id).await
        }
        .await;

        let id = id.trim().to_string();
        Outcome::from_result(result, "Unable to set the Script ID.", move |_| {
            if id.is_empty() {
                "Script ID cleared".to_string()
            } else {
                format!("Script ID set to {}", id)
            }
        })
    }

    /// Summary lines of the active project.
    pub async fn script_info(&self) -> Outcome<Vec<String>> {
        let mut state = self.state.lock().await;
        let result = state.session.script_info().await;
        Outcome::from_result(result, "Unable to retrieve script info.", |lines| {
            lines.join("\n")
        })
    }

    /// Forget the session, the remembered project id and the stored credential.
    pub async fn clear_credentials(&self) -> Outcome<()> {
        let mut state = self.state.lock().await;
        let result = clear_local_state(&mut state);

        match result {
            Ok(()) => Outcome::done(
                "Completed removing your credentials. Please log in again to regain access.",
            ),
            Err(err) => Outcome::from_error(err, "Error clearing your credentials."),
        }
    }

    /// Watch the source folders for changes.
    pub async fn watcher(&self) -> Outcome<SourceWatcher> {
        let state = self.state.lock().await;
        let result = state
            .layout()
            .and_then(|layout| SourceWatcher::new(layout).map_err(Error::from));
        Outcome::from_result(result, "Unable to watch the source folders.", |_| {
            "Watching source folders for changes".to_string()
        })
    }
}

fn clear_local_state(state: &mut ManagerState) -> Result<()> {
    state.session.reset();
    state.session.forget_project_id()?;
    tracing::debug!("Local information cleared");
    if let Some(store) = &state.credentials {
        store.clear()?;
        tracing::debug!("Credentials cleared");
    }
    Ok(())
}

/// Best effort: an id that no longer validates is forgotten.
async fn restore_project_id(session: &mut ProjectSession) {
    let id = match session.persisted_project_id() {
        Ok(Some(id)) => id,
        Ok(None) => return,
        Err(err) => {
            tracing::warn!(error = %err, "Unable to read the saved script id");
            if let Err(err) = session.forget_project_id() {
                tracing::warn!(error = %err, "Unable to remove the saved script id");
            }
            return;
        }
    };

    match session.set_project_id(&id).await {
        Ok(()) => tracing::debug!(script_id = %id, "Restored last script id"),
        Err(err) => {
            tracing::warn!(script_id = %id, error = %err, "Discarding saved script id");
            if let Err(err) = session.forget_project_id() {
                tracing::warn!(error = %err, "Unable to remove the saved script id");
            }
        }
    }
}

/// Write every file of `content` into its folder. Returns the written paths.
fn write_content(layout: &SourceLayout, content: &Content, split: bool) -> Result<Vec<PathBuf>> {
    let mut written = Vec::with_capacity(content.files.len());
    for file in &content.files {
        if file.name.split(['/', '\\']).any(|part| part == "..") {
            tracing::warn!(name = %file.name, "Skipping remote file with a traversal name");
            continue;
        }
        let path = layout.path_for(&file.name, file.file_type);
        tracing::debug!(name = %file.name, file_type = %file.file_type, "Writing");

        let text = if split && file.file_type == FileType::Html {
            extract_to_sibling(&path, &file.source)?
        } else {
            file.source.clone()
        };
        io::write_text(&path, &text)?;
        written.push(path);
    }
    Ok(written)
}

/// Build the upload snapshot from the three source folders.
///
/// Extracted `_JS.js` files are folded back into their markup and never sent
/// on their own. The type of a file follows its extension; files with any
/// other extension are skipped. Files in subfolders are sent as `dir/name`,
/// matching how [`ScriptManager::download`] writes such names.
pub fn collect_content(layout: &SourceLayout, script_id: &str) -> Result<Content> {
    let mut content = Content::new(script_id);
    let mut seen = HashSet::new();

    for folder_type in FileType::ALL {
        for path in layout.source_files(folder_type)? {
            let Some(file_name) = path.file_name().and_then(|n| n.to_str()) else {
                continue;
            };
            if is_placeholder_script(file_name) {
                continue;
            }
            let Some(file_type) = FileType::from_path(&path) else {
                tracing::debug!(path = %path.display(), "Skipping file with unknown extension");
                continue;
            };
            let Some(name) = layout.remote_name(folder_type, &path) else {
                continue;
            };
            if !seen.insert((name.clone(), file_type)) {
                tracing::warn!(name = %name, %file_type, "Duplicate source file, keeping the first");
                continue;
            }

            let mut source = io::read_text(&path)?;
            if file_type == FileType::Html {
                source = inline_from_sibling(&path, &source)?;
                // The own placeholder was already reported by the inliner
                let own = path
                    .file_stem()
                    .and_then(|s| s.to_str())
                    .map(placeholder_file_name);
                for reference in placeholder_references(&source) {
                    if own.as_deref() != Some(reference.as_str()) {
                        tracing::warn!(
                            name = %name,
                            script = %reference,
                            "Markup carries another file's placeholder, uploading it as is"
                        );
                    }
                }
            }
            tracing::debug!(name = %name, %file_type, "Uploading");
            content.files.push(RemoteFile::new(name, file_type, source));
        }
    }
    Ok(content)
}

async fn upload_sources(session: &mut ProjectSession, layout: &SourceLayout) -> Result<Content> {
    let content = collect_content(layout, session.project_id())?;
    session.replace_content(&content).await?;
    tracing::info!(files = content.files.len(), "Finished uploading your changes");
    Ok(content)
}
