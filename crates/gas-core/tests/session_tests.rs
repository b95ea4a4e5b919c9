use gas_api::CredentialStore;
use gas_core::{Error, FIRST_VERSION_DESCRIPTION, ManagerConfig, NO_DEV_URL, ProjectSession};
use gas_test_utils::{ApiCall, ApiOp, FakeAuthorizer, FakeConnector, FakeScriptApi};
use pretty_assertions::assert_eq;
use std::sync::Arc;

const ID: &str = "script-abc";

fn manual_config() -> ManagerConfig {
    ManagerConfig {
        auto_create_web_app_deployment: false,
        ..Default::default()
    }
}

async fn authenticated(api: &Arc<FakeScriptApi>, config: ManagerConfig) -> ProjectSession {
    let mut session = ProjectSession::new(config);
    session
        .authenticate(
            &FakeAuthorizer::granting("token"),
            &FakeConnector::new(api.clone()),
            None,
        )
        .await
        .unwrap();
    session
}

async fn with_project(api: &Arc<FakeScriptApi>, config: ManagerConfig) -> ProjectSession {
    api.add_project(ID, "Demo", Some("dev@example.com"));
    let mut session = authenticated(api, config).await;
    session.set_project_id(ID).await.unwrap();
    api.clear_calls();
    session
}

#[tokio::test(start_paused = true)]
async fn test_authenticate_times_out() {
    let api = FakeScriptApi::new();
    let mut session = ProjectSession::new(ManagerConfig::default());

    let err = session
        .authenticate(
            &FakeAuthorizer::hanging(),
            &FakeConnector::new(api.clone()),
            None,
        )
        .await
        .unwrap_err();

    assert!(matches!(err, Error::AuthTimeout));
    assert!(!session.is_authenticated());
}

#[tokio::test]
async fn test_authenticate_denied() {
    let api = FakeScriptApi::new();
    let mut session = ProjectSession::new(ManagerConfig::default());

    let err = session
        .authenticate(&FakeAuthorizer::denying(), &FakeConnector::new(api), None)
        .await
        .unwrap_err();

    assert!(matches!(err, Error::AuthDenied));
    assert_eq!(err.to_string(), "Credentials failed!");
}

#[tokio::test]
async fn test_authenticate_persists_credential() {
    let temp = tempfile::tempdir().unwrap();
    let store = CredentialStore::new(temp.path().join("credentials"));
    let api = FakeScriptApi::new();
    let mut session = ProjectSession::new(ManagerConfig::default());

    session
        .authenticate(
            &FakeAuthorizer::granting("secret"),
            &FakeConnector::new(api),
            Some(&store),
        )
        .await
        .unwrap();

    let stored = store.load().unwrap().unwrap();
    assert_eq!(stored.access_token, "secret");
    assert_eq!(stored.scopes.len(), 4);
    assert!(session.is_authenticated());
}

#[tokio::test]
async fn test_latest_version_of_empty_project_creates_first_version() {
    let api = FakeScriptApi::new();
    let mut session = with_project(&api, manual_config()).await;

    assert_eq!(session.latest_version().await.unwrap(), 1);

    assert_eq!(api.count(ApiOp::CreateVersion), 1);
    let versions = api.versions(ID);
    assert_eq!(versions.len(), 1);
    assert_eq!(versions[0].description, FIRST_VERSION_DESCRIPTION);
}

#[tokio::test]
async fn test_latest_version_is_maximum() {
    let api = FakeScriptApi::new();
    let mut session = with_project(&api, manual_config()).await;
    api.add_versions(ID, &[3, 7, 1]);

    assert_eq!(session.latest_version().await.unwrap(), 7);
    assert_eq!(api.count(ApiOp::CreateVersion), 0);
}

#[tokio::test]
async fn test_resolve_finds_head_and_web_app_without_creating() {
    let api = FakeScriptApi::new();
    api.add_project(ID, "Demo", None);
    let web_app = api.add_deployment(ID, Some("web app meta-version"), Some(2));
    api.add_deployment(ID, Some("web app meta-version"), Some(5));
    let mut session = authenticated(&api, ManagerConfig::default()).await;

    session.set_project_id(ID).await.unwrap();

    assert_eq!(
        session.head_deployment().map(|d| d.deployment_id.as_str()),
        Some("script-abc-head")
    );
    assert_eq!(
        session.web_app_deployment().map(|d| d.deployment_id.clone()),
        Some(web_app)
    );
    assert_eq!(api.count(ApiOp::CreateDeployment), 0);
}

#[tokio::test]
async fn test_resolve_creates_web_app_deployment_at_latest_version() {
    let api = FakeScriptApi::new();
    api.add_project(ID, "Demo", None);
    api.add_versions(ID, &[1, 4]);
    let mut session = authenticated(&api, ManagerConfig::default()).await;

    session.set_project_id(ID).await.unwrap();

    let created: Vec<_> = api
        .calls()
        .into_iter()
        .filter_map(|c| match c {
            ApiCall::CreateDeployment { config, .. } => Some(config),
            _ => None,
        })
        .collect();
    assert_eq!(created.len(), 1);
    assert_eq!(created[0].version_number, Some(4));
    assert_eq!(created[0].description.as_deref(), Some("web app meta-version"));
    assert!(session.web_app_deployment().is_some());
}

#[tokio::test]
async fn test_web_app_creation_failure_is_not_fatal() {
    let api = FakeScriptApi::new();
    api.add_project(ID, "Demo", None);
    api.fail_on(ApiOp::CreateDeployment);
    let mut session = authenticated(&api, ManagerConfig::default()).await;

    session.set_project_id(ID).await.unwrap();

    assert_eq!(session.project_id(), ID);
    assert!(session.web_app_deployment().is_none());
}

#[tokio::test]
async fn test_failed_project_id_clears_state_and_is_retried() {
    let api = FakeScriptApi::new();
    api.add_project(ID, "Demo", None);
    let mut session = authenticated(&api, manual_config()).await;
    session.set_project_id(ID).await.unwrap();
    session.list_versions().await.unwrap();

    let err = session.set_project_id("X").await.unwrap_err();
    assert!(matches!(err, Error::ScriptIdValidation { .. }));
    assert_eq!(session.project_id(), "");
    assert!(session.project().is_none());
    assert!(session.cached_versions().is_none());

    session.set_project_id("X").await.unwrap_err();
    let lookups = api
        .calls()
        .into_iter()
        .filter(|c| matches!(c, ApiCall::GetProject { script_id } if script_id == "X"))
        .count();
    assert_eq!(lookups, 2);
}

#[tokio::test]
async fn test_same_project_id_is_not_revalidated() {
    let api = FakeScriptApi::new();
    let mut session = with_project(&api, manual_config()).await;

    session.set_project_id(ID).await.unwrap();

    assert_eq!(api.count(ApiOp::GetProject), 0);
}

#[tokio::test]
async fn test_project_id_is_persisted_after_validation() {
    let temp = tempfile::tempdir().unwrap();
    let file = temp.path().join(".gas/script_id.txt");
    let api = FakeScriptApi::new();
    api.add_project(ID, "Demo", None);
    let mut session = authenticated(&api, manual_config()).await;
    session.set_script_id_file(file.clone());

    session.set_project_id("missing").await.unwrap_err();
    assert!(!file.exists());

    session.set_project_id(ID).await.unwrap();
    assert_eq!(std::fs::read_to_string(&file).unwrap(), ID);
    assert_eq!(session.persisted_project_id().unwrap().as_deref(), Some(ID));
}

#[tokio::test]
async fn test_get_content_rejects_unknown_version() {
    let api = FakeScriptApi::new();
    let mut session = with_project(&api, manual_config()).await;
    api.add_versions(ID, &[1, 2]);

    let err = session.get_content(Some(9)).await.unwrap_err();
    assert!(matches!(err, Error::UnknownVersion { version: 9 }));
    assert_eq!(api.count(ApiOp::GetContent), 0);

    let content = session.get_content(Some(2)).await.unwrap();
    assert_eq!(content.files.len(), 1);
}

#[tokio::test]
async fn test_create_version_requires_description() {
    let api = FakeScriptApi::new();
    let mut session = with_project(&api, manual_config()).await;

    let err = session.create_version("   ").await.unwrap_err();
    assert!(matches!(err, Error::InvalidDescription));
    assert_eq!(api.count(ApiOp::CreateVersion), 0);
}

#[tokio::test]
async fn test_update_deployment_version_zero_is_noop() {
    let api = FakeScriptApi::new();
    let mut session = with_project(&api, manual_config()).await;

    session.update_deployment_version(0).await.unwrap();
    assert!(api.calls().is_empty());
}

#[tokio::test]
async fn test_update_deployment_version_without_web_app() {
    let api = FakeScriptApi::new();
    let mut session = with_project(&api, manual_config()).await;

    let err = session.update_deployment_version(3).await.unwrap_err();
    assert!(matches!(err, Error::NoWebAppDeployment));
}

#[tokio::test]
async fn test_create_version_and_deploy() {
    let api = FakeScriptApi::new();
    api.add_project(ID, "Demo", None);
    api.add_versions(ID, &[1]);
    let web_app = api.add_deployment(ID, Some("web app meta-version"), Some(1));
    let mut session = authenticated(&api, ManagerConfig::default()).await;
    session.set_project_id(ID).await.unwrap();

    let version = session.create_version_and_deploy("Release").await.unwrap();

    assert_eq!(version, 2);
    let deployed = api
        .deployments(ID)
        .into_iter()
        .find(|d| d.deployment_id == web_app)
        .unwrap();
    assert_eq!(deployed.version_number(), Some(2));
    assert_eq!(
        session.web_app_deployment().and_then(|d| d.version_number()),
        Some(2)
    );
}

#[tokio::test]
async fn test_create_project_requires_name() {
    let api = FakeScriptApi::new();
    let mut session = authenticated(&api, manual_config()).await;

    let err = session.create_project("").await.unwrap_err();
    assert!(matches!(err, Error::InvalidProjectName));
    assert_eq!(api.count(ApiOp::CreateProject), 0);
}

#[tokio::test]
async fn test_create_project_activates_new_id() {
    let api = FakeScriptApi::new();
    let mut session = authenticated(&api, manual_config()).await;

    let id = session.create_project("Library Test Demo").await.unwrap();

    assert_eq!(session.project_id(), id);
    assert_eq!(session.project().map(|p| p.title.as_str()), Some("Library Test Demo"));
}

#[tokio::test]
async fn test_script_info_lines() {
    let api = FakeScriptApi::new();
    api.add_project(ID, "Demo", Some("dev@example.com"));
    api.add_versions(ID, &[1, 2, 3]);
    api.add_deployment(ID, Some("web app meta-version"), Some(2));
    let mut session = authenticated(&api, ManagerConfig::default()).await;
    session.set_project_id(ID).await.unwrap();

    let lines = session.script_info().await.unwrap();

    assert_eq!(lines[0], "Script ID: script-abc");
    assert_eq!(lines[1], "Project Title Demo By dev@example.com");
    assert!(lines[2].starts_with("Webapp URL: https://script.google.com/macros/s/"));
    assert_eq!(
        lines[3],
        "Dev URL: https://script.google.com/macros/s/script-abc/dev"
    );
    assert_eq!(
        lines[4],
        "Your Latest Project Version is 3, Current Deployment Version 2"
    );
}

#[tokio::test]
async fn test_script_info_without_project() {
    let api = FakeScriptApi::new();
    let mut session = authenticated(&api, manual_config()).await;

    assert_eq!(
        session.script_info().await.unwrap(),
        vec!["No Script Info Exists Yet!".to_string()]
    );
}

#[tokio::test]
async fn test_script_info_without_head_deployment() {
    let api = FakeScriptApi::new();
    api.add_project(ID, "Demo", None);
    api.clear_deployments(ID);
    let mut session = authenticated(&api, ManagerConfig::default()).await;
    session.set_project_id(ID).await.unwrap();

    let lines = session.script_info().await.unwrap();
    assert!(lines.contains(&format!("Dev URL: {}", NO_DEV_URL)));
}
