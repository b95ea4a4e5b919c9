//! End-to-end workflows across the workspace crates
//!
//! Each scenario drives a `ScriptManager` against the in-memory remote
//! project and a temporary source tree, the way the `gas` binary does.

use gas_api::{CredentialStore, FileType, RemoteFile, TokenAuthorizer, WEB_APP_DEPLOYMENT_DESCRIPTION};
use gas_core::{AUTOSAVE_DESCRIPTION, ManagerConfig, ScriptManager};
use gas_test_utils::{ApiCall, ApiOp, FakeAuthorizer, FakeConnector, FakeScriptApi, TestProject};
use pretty_assertions::assert_eq;
use std::sync::Arc;

const ID: &str = "script-abc";

fn manager(api: &Arc<FakeScriptApi>, authorizer: FakeAuthorizer) -> ScriptManager {
    ScriptManager::new(
        ManagerConfig::default(),
        Arc::new(authorizer),
        Arc::new(FakeConnector::new(api.clone())),
    )
}

fn uploaded(api: &FakeScriptApi) -> Vec<Vec<RemoteFile>> {
    api.calls()
        .into_iter()
        .filter_map(|c| match c {
            ApiCall::UpdateContent { files, .. } => Some(files),
            _ => None,
        })
        .collect()
}

// =============================================================================
// New project
// =============================================================================

#[tokio::test]
async fn test_new_project_from_scratch_to_release() {
    let project = TestProject::new();
    let api = FakeScriptApi::new();
    let manager = manager(&api, FakeAuthorizer::granting("token"));

    assert!(manager.initialize(project.root()).await.success);

    let created = manager.create_project("Library Test Demo").await;
    assert!(created.success, "{}", created.message);
    let id = created.result.unwrap();
    assert_eq!(manager.project_id().await, id);
    project.assert_file_contains(".gas/script_id.txt", &id);

    assert!(manager.add_source_file("Util", FileType::ServerJs, false).await.success);
    assert!(manager.add_source_file("Index", FileType::Html, false).await.success);
    assert!(manager.restore_manifest().await.success);
    project.write_source(FileType::ServerJs, "Util", "function util() {}");

    let upload = manager.upload().await;
    assert!(upload.success, "{}", upload.message);
    let mut names: Vec<_> = api.files(&id).into_iter().map(|f| f.name).collect();
    names.sort();
    assert_eq!(names, vec!["Index", "Util", "appsscript"]);

    let release = manager.create_version_and_deploy("First release").await;
    assert!(release.success, "{}", release.message);
    let version = release.result.unwrap();

    let web_app = api
        .deployments(&id)
        .into_iter()
        .find(|d| d.description() == Some(WEB_APP_DEPLOYMENT_DESCRIPTION))
        .expect("web-app deployment");
    assert_eq!(web_app.version_number(), Some(version));

    let info = manager.script_info().await.result.unwrap();
    assert_eq!(info[0], format!("Script ID: {}", id));
    assert!(info.last().unwrap().ends_with(&format!(
        "Current Deployment Version {}",
        version
    )));
}

// =============================================================================
// Existing project
// =============================================================================

#[tokio::test]
async fn test_edit_cycle_on_existing_project() {
    let project = TestProject::new();
    let api = FakeScriptApi::new();
    api.add_project(ID, "Demo", Some("dev@example.com"));
    api.set_files(
        ID,
        vec![
            RemoteFile::new("Code", FileType::ServerJs, "function doGet() {}"),
            RemoteFile::new(
                "Page",
                FileType::Html,
                "<html><script>\nload();\n</script></html>",
            ),
            RemoteFile::new("appsscript", FileType::Json, "{\"timeZone\":\"UTC\"}"),
        ],
    );
    let manager = manager(&api, FakeAuthorizer::granting("token"));
    assert!(manager.initialize(project.root()).await.success);
    assert!(manager.set_project_id(ID).await.success);

    assert!(manager.download(None).await.success);
    project.assert_file_contains("SourceCode/HTML/Page_JS.js", "load();");

    // Edit the extracted script, then sync with an autosave first
    project.write_file("SourceCode/HTML/Page_JS.js", "\nloadAll();\n");
    api.clear_calls();
    let outcome = manager.create_version_then_upload().await;
    assert!(outcome.success, "{}", outcome.message);

    let ops: Vec<_> = api.calls().into_iter().map(|c| c.op()).collect();
    let version_at = ops.iter().position(|op| *op == ApiOp::CreateVersion).unwrap();
    let upload_at = ops.iter().position(|op| *op == ApiOp::UpdateContent).unwrap();
    assert!(version_at < upload_at);
    assert_eq!(
        api.versions(ID).last().map(|v| v.description.clone()),
        Some(AUTOSAVE_DESCRIPTION.to_string())
    );

    let page = api
        .files(ID)
        .into_iter()
        .find(|f| f.name == "Page")
        .unwrap();
    assert_eq!(page.source, "<html><script>\nloadAll();\n</script></html>");
    assert_eq!(uploaded(&api).len(), 1);
    assert_eq!(uploaded(&api)[0].len(), 3);
}

#[tokio::test]
async fn test_download_older_version() {
    let project = TestProject::new();
    let api = FakeScriptApi::new();
    api.add_project(ID, "Demo", None);
    api.set_files(ID, vec![RemoteFile::new("Code", FileType::ServerJs, "v1()")]);
    api.add_versions(ID, &[1]);
    api.set_files(ID, vec![RemoteFile::new("Code", FileType::ServerJs, "v2()")]);
    let manager = manager(&api, FakeAuthorizer::granting("token"));
    assert!(manager.initialize(project.root()).await.success);
    assert!(manager.set_project_id(ID).await.success);

    assert!(manager.download(Some(1)).await.success);
    assert_eq!(project.read_source(FileType::ServerJs, "Code"), "v1()");

    assert!(manager.download(None).await.success);
    assert_eq!(project.read_source(FileType::ServerJs, "Code"), "v2()");
    assert!(!project.backup_labels().is_empty());
}

// =============================================================================
// Restarts
// =============================================================================

#[tokio::test]
async fn test_restart_reuses_credential_and_script_id() {
    let project = TestProject::new();
    let api = FakeScriptApi::new();
    api.add_project(ID, "Demo", None);

    let first = manager(&api, FakeAuthorizer::granting("token"));
    assert!(first.initialize(project.root()).await.success);
    assert!(first.set_project_id(ID).await.success);
    drop(first);

    // The second run authorizes only from the stored credential
    let store = CredentialStore::new(project.layout().credentials_dir());
    let authorizer = TokenAuthorizer::new(store).with_env_var("GAS_TEST_UNSET_TOKEN");
    let second = ScriptManager::new(
        ManagerConfig::default(),
        Arc::new(authorizer),
        Arc::new(FakeConnector::new(api.clone())),
    );

    let outcome = second.initialize(project.root()).await;
    assert!(outcome.success, "{}", outcome.message);
    assert_eq!(second.project_id().await, ID);
    assert!(second.is_ready().await);
}

#[tokio::test]
async fn test_logout_then_initialize_requires_authorization() {
    let project = TestProject::new();
    let api = FakeScriptApi::new();
    api.add_project(ID, "Demo", None);

    let first = manager(&api, FakeAuthorizer::granting("token"));
    assert!(first.initialize(project.root()).await.success);
    assert!(first.set_project_id(ID).await.success);
    assert!(first.clear_credentials().await.success);
    assert!(!first.is_ready().await);
    project.assert_file_not_exists(".gas/credentials");
    project.assert_file_not_exists(".gas/script_id.txt");

    let store = CredentialStore::new(project.layout().credentials_dir());
    let authorizer = TokenAuthorizer::new(store).with_env_var("GAS_TEST_UNSET_TOKEN");
    let second = ScriptManager::new(
        ManagerConfig::default(),
        Arc::new(authorizer),
        Arc::new(FakeConnector::new(api.clone())),
    );

    let outcome = second.initialize(project.root()).await;
    assert!(!outcome.success);
    assert_eq!(outcome.message, "Credentials failed!");
}

#[tokio::test]
async fn test_config_file_disables_markup_split() {
    let project = TestProject::new();
    let config = ManagerConfig {
        split_html_scripts: false,
        ..Default::default()
    };
    config.save(project.root()).unwrap();

    let api = FakeScriptApi::new();
    api.add_project(ID, "Demo", None);
    api.set_files(
        ID,
        vec![RemoteFile::new("Page", FileType::Html, "<script>x()</script>")],
    );
    let manager = ScriptManager::new(
        ManagerConfig::load(project.root()).unwrap(),
        Arc::new(FakeAuthorizer::granting("token")),
        Arc::new(FakeConnector::new(api.clone())),
    );
    assert!(manager.initialize(project.root()).await.success);
    assert!(manager.set_project_id(ID).await.success);

    assert!(manager.download(None).await.success);

    assert_eq!(
        project.read_source(FileType::Html, "Page"),
        "<script>x()</script>"
    );
    project.assert_file_not_exists("SourceCode/HTML/Page_JS.js");
}
