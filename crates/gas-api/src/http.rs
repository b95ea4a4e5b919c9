//! `reqwest` client for the Apps Script REST API (v1).

use crate::auth::Credential;
use crate::client::{Connector, ScriptApi};
use crate::types::{
    Content, Deployment, DeploymentConfig, ListDeploymentsResponse, ListVersionsResponse, Project,
    Version,
};
use crate::{Error, Result};
use async_trait::async_trait;
use reqwest::{Client, RequestBuilder, StatusCode};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use std::time::Duration;

/// Production endpoint of the Apps Script API.
pub const DEFAULT_BASE_URL: &str = "https://script.googleapis.com";

/// Largest page the list endpoints accept.
pub const PAGE_SIZE: u32 = 50_000;

const REQUEST_TIMEOUT: Duration = Duration::from_secs(30);

/// Google error envelope: `{"error": {"code": 404, "message": "...", "status": "NOT_FOUND"}}`
#[derive(Deserialize)]
struct ErrorEnvelope {
    error: ErrorBody,
}

#[derive(Deserialize)]
struct ErrorBody {
    #[serde(default)]
    message: String,
}

#[derive(Serialize)]
struct CreateProjectRequest<'a> {
    title: &'a str,
}

#[derive(Serialize)]
struct CreateVersionRequest<'a> {
    description: &'a str,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct UpdateDeploymentRequest<'a> {
    deployment_config: &'a DeploymentConfig,
}

/// Authenticated HTTP client for one credential.
#[derive(Debug, Clone)]
pub struct HttpScriptApi {
    client: Client,
    base_url: String,
    token: String,
}

impl HttpScriptApi {
    pub fn new(base_url: &str, token: impl Into<String>) -> Result<Self> {
        let client = Client::builder().timeout(REQUEST_TIMEOUT).build()?;
        Ok(Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
            token: token.into(),
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn url(&self, path: &str) -> String {
        format!("{}/v1/{}", self.base_url, path)
    }

    fn project_path(script_id: &str, rest: &str) -> String {
        if rest.is_empty() {
            format!("projects/{}", script_id)
        } else {
            format!("projects/{}/{}", script_id, rest)
        }
    }

    async fn send<T: DeserializeOwned>(&self, req: RequestBuilder) -> Result<T> {
        let response = req.bearer_auth(&self.token).send().await?;
        Self::handle_response(response).await
    }

    async fn handle_response<T: DeserializeOwned>(response: reqwest::Response) -> Result<T> {
        let status = response.status();
        if !status.is_success() {
            let text = response.text().await?;
            let message = serde_json::from_str::<ErrorEnvelope>(&text)
                .map(|e| e.error.message)
                .unwrap_or(text);
            tracing::debug!(status = status.as_u16(), %message, "Remote call failed");
            return Err(match status {
                StatusCode::UNAUTHORIZED | StatusCode::FORBIDDEN => Error::Unauthorized(message),
                StatusCode::NOT_FOUND => Error::NotFound(message),
                _ => Error::Api {
                    status: status.as_u16(),
                    message,
                },
            });
        }
        let bytes = response.bytes().await?;
        serde_json::from_slice(&bytes).map_err(|e| Error::InvalidResponse(e.to_string()))
    }

    /// Collect every page of a list endpoint.
    async fn fetch_all<P, T>(
        &self,
        path: &str,
        split: impl Fn(P) -> (Vec<T>, Option<String>),
    ) -> Result<Vec<T>>
    where
        P: DeserializeOwned,
    {
        let mut items = Vec::new();
        let mut page_token: Option<String> = None;
        loop {
            let mut req = self
                .client
                .get(self.url(path))
                .query(&[("pageSize", PAGE_SIZE.to_string())]);
            if let Some(token) = &page_token {
                req = req.query(&[("pageToken", token)]);
            }
            let (page, next) = split(self.send::<P>(req).await?);
            items.extend(page);
            match next {
                Some(token) if !token.is_empty() => page_token = Some(token),
                _ => break,
            }
        }
        Ok(items)
    }
}

#[async_trait]
impl ScriptApi for HttpScriptApi {
    async fn create_project(&self, title: &str) -> Result<Project> {
        let req = self
            .client
            .post(self.url("projects"))
            .json(&CreateProjectRequest { title });
        self.send(req).await
    }

    async fn get_project(&self, script_id: &str) -> Result<Project> {
        let req = self.client.get(self.url(&Self::project_path(script_id, "")));
        self.send(req).await
    }

    async fn get_content(&self, script_id: &str, version: Option<u32>) -> Result<Content> {
        let mut req = self
            .client
            .get(self.url(&Self::project_path(script_id, "content")));
        if let Some(version) = version {
            req = req.query(&[("versionNumber", version)]);
        }
        self.send(req).await
    }

    async fn update_content(&self, script_id: &str, content: &Content) -> Result<Content> {
        let req = self
            .client
            .put(self.url(&Self::project_path(script_id, "content")))
            .json(content);
        self.send(req).await
    }

    async fn list_versions(&self, script_id: &str) -> Result<Vec<Version>> {
        self.fetch_all(
            &Self::project_path(script_id, "versions"),
            |page: ListVersionsResponse| (page.versions, page.next_page_token),
        )
        .await
    }

    async fn create_version(&self, script_id: &str, description: &str) -> Result<Version> {
        let req = self
            .client
            .post(self.url(&Self::project_path(script_id, "versions")))
            .json(&CreateVersionRequest { description });
        self.send(req).await
    }

    async fn list_deployments(&self, script_id: &str) -> Result<Vec<Deployment>> {
        self.fetch_all(
            &Self::project_path(script_id, "deployments"),
            |page: ListDeploymentsResponse| (page.deployments, page.next_page_token),
        )
        .await
    }

    async fn create_deployment(
        &self,
        script_id: &str,
        config: &DeploymentConfig,
    ) -> Result<Deployment> {
        let req = self
            .client
            .post(self.url(&Self::project_path(script_id, "deployments")))
            .json(config);
        self.send(req).await
    }

    async fn update_deployment(
        &self,
        script_id: &str,
        deployment_id: &str,
        config: &DeploymentConfig,
    ) -> Result<Deployment> {
        let path = Self::project_path(script_id, &format!("deployments/{}", deployment_id));
        let req = self
            .client
            .put(self.url(&path))
            .json(&UpdateDeploymentRequest {
                deployment_config: config,
            });
        self.send(req).await
    }
}

/// Connects [`HttpScriptApi`] clients to a fixed base URL.
#[derive(Debug, Clone)]
pub struct HttpConnector {
    base_url: String,
}

impl HttpConnector {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
        }
    }
}

impl Default for HttpConnector {
    fn default() -> Self {
        Self::new(DEFAULT_BASE_URL)
    }
}

impl Connector for HttpConnector {
    fn connect(&self, credential: &Credential) -> Result<Arc<dyn ScriptApi>> {
        if credential.access_token.is_empty() {
            return Err(Error::Unauthorized("empty access token".into()));
        }
        let api = HttpScriptApi::new(&self.base_url, credential.access_token.clone())?;
        Ok(Arc::new(api))
    }
}
