//! Wire model of the Apps Script API.
//!
//! Field names follow the service's camelCase JSON. Optional fields default
//! so partial responses still decode.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

pub use gas_fs::FileType;

/// Description used to tag the deployment this tool manages.
pub const WEB_APP_DEPLOYMENT_DESCRIPTION: &str = "web app meta-version";
/// Entry point type of web-app deployments.
pub const WEB_APP_ENTRY_POINT: &str = "WEB_APP";
/// Name of the manifest file, without extension.
pub const MANIFEST_NAME: &str = "appsscript";

/// The user who created a project.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Creator {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
}

/// Project metadata.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Project {
    pub script_id: String,
    #[serde(default)]
    pub title: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub creator: Option<Creator>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub create_time: Option<DateTime<Utc>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub update_time: Option<DateTime<Utc>>,
}

impl Project {
    pub fn creator_email(&self) -> Option<&str> {
        self.creator.as_ref()?.email.as_deref()
    }
}

/// One source file of a project.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RemoteFile {
    /// File name without extension
    pub name: String,
    #[serde(rename = "type")]
    pub file_type: FileType,
    #[serde(default)]
    pub source: String,
}

impl RemoteFile {
    pub fn new(name: impl Into<String>, file_type: FileType, source: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            file_type,
            source: source.into(),
        }
    }
}

/// The complete set of files of a project. Uploading it replaces everything.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Content {
    #[serde(default)]
    pub script_id: String,
    #[serde(default)]
    pub files: Vec<RemoteFile>,
}

impl Content {
    pub fn new(script_id: impl Into<String>) -> Self {
        Self {
            script_id: script_id.into(),
            files: Vec::new(),
        }
    }

    /// The `appsscript` manifest, if present.
    pub fn manifest(&self) -> Option<&RemoteFile> {
        self.files
            .iter()
            .find(|f| f.file_type == FileType::Json && f.name == MANIFEST_NAME)
    }
}

/// An immutable snapshot of a project's content.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Version {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub script_id: Option<String>,
    #[serde(default)]
    pub version_number: u32,
    #[serde(default)]
    pub description: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub create_time: Option<DateTime<Utc>>,
}

/// Configuration part of a deployment.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DeploymentConfig {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub script_id: Option<String>,
    /// `None` for the head deployment
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub version_number: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub manifest_file_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

/// Web-app part of an entry point.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WebApp {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,
}

/// How a deployment can be reached.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EntryPoint {
    #[serde(default)]
    pub entry_point_type: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub web_app: Option<WebApp>,
}

impl EntryPoint {
    pub fn url(&self) -> Option<&str> {
        self.web_app.as_ref()?.url.as_deref()
    }
}

/// A deployment of a project version.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Deployment {
    pub deployment_id: String,
    #[serde(default)]
    pub deployment_config: DeploymentConfig,
    #[serde(default)]
    pub entry_points: Vec<EntryPoint>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub update_time: Option<DateTime<Utc>>,
}

impl Deployment {
    pub fn version_number(&self) -> Option<u32> {
        self.deployment_config.version_number
    }

    pub fn description(&self) -> Option<&str> {
        self.deployment_config.description.as_deref()
    }

    /// The head deployment tracks the latest saved code and has no version.
    pub fn is_head(&self) -> bool {
        self.version_number().is_none()
    }

    /// Whether this is the web-app deployment managed by this tool.
    pub fn is_web_app(&self) -> bool {
        self.description() == Some(WEB_APP_DEPLOYMENT_DESCRIPTION)
    }

    /// URL of the first entry point of the given type.
    pub fn entry_point_url(&self, entry_point_type: &str) -> Option<&str> {
        self.entry_points
            .iter()
            .find(|e| e.entry_point_type == entry_point_type)
            .and_then(EntryPoint::url)
    }
}

/// One page of `versions.list`.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ListVersionsResponse {
    #[serde(default)]
    pub versions: Vec<Version>,
    #[serde(default)]
    pub next_page_token: Option<String>,
}

/// One page of `deployments.list`.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ListDeploymentsResponse {
    #[serde(default)]
    pub deployments: Vec<Deployment>,
    #[serde(default)]
    pub next_page_token: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn decode_content() {
        let json = r#"{
            "scriptId": "abc",
            "files": [
                {"name": "Code", "type": "SERVER_JS", "source": "function a() {}"},
                {"name": "appsscript", "type": "JSON", "source": "{}"}
            ]
        }"#;
        let content: Content = serde_json::from_str(json).unwrap();
        assert_eq!(content.files.len(), 2);
        assert_eq!(content.files[0].file_type, FileType::ServerJs);
        assert_eq!(content.manifest().map(|f| f.source.as_str()), Some("{}"));
    }

    #[test]
    fn encode_remote_file_uses_type_key() {
        let file = RemoteFile::new("Index", FileType::Html, "<p></p>");
        let value = serde_json::to_value(&file).unwrap();
        assert_eq!(value["type"], "HTML");
        assert_eq!(value["name"], "Index");
    }

    #[test]
    fn decode_head_deployment() {
        let json = r#"{
            "deploymentId": "AKfy-head",
            "deploymentConfig": {"scriptId": "abc", "manifestFileName": "appsscript"},
            "entryPoints": [{"entryPointType": "WEB_APP", "webApp": {"url": "https://x/dev"}}]
        }"#;
        let deployment: Deployment = serde_json::from_str(json).unwrap();
        assert!(deployment.is_head());
        assert!(!deployment.is_web_app());
        assert_eq!(deployment.entry_point_url(WEB_APP_ENTRY_POINT), Some("https://x/dev"));
    }

    #[test]
    fn decode_web_app_deployment() {
        let json = r#"{
            "deploymentId": "AKfy-web",
            "deploymentConfig": {"versionNumber": 4, "description": "web app meta-version"}
        }"#;
        let deployment: Deployment = serde_json::from_str(json).unwrap();
        assert_eq!(deployment.version_number(), Some(4));
        assert!(deployment.is_web_app());
        assert!(deployment.entry_points.is_empty());
    }
}
