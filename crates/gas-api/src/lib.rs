//! Remote side of Apps Script Sync.
//!
//! - [`types`]: the wire model (projects, content, versions, deployments)
//! - [`client`]: the [`ScriptApi`] trait every remote call goes through
//! - [`http`]: a `reqwest` implementation against the Apps Script REST API
//! - [`auth`]: credentials, the credential store and the [`Authorizer`] seam
//!
//! The interactive OAuth consent flow is deliberately outside this crate;
//! front ends plug their own [`Authorizer`] in.

pub mod auth;
pub mod client;
pub mod error;
pub mod http;
pub mod types;

pub use auth::{
    ACCESS_TOKEN_ENV, Authorizer, Credential, CredentialStore, DEFAULT_SCOPES, TokenAuthorizer,
};
pub use client::{Connector, ScriptApi};
pub use error::{Error, Result};
pub use http::{DEFAULT_BASE_URL, HttpConnector, HttpScriptApi, PAGE_SIZE};
pub use types::{
    Content, Creator, Deployment, DeploymentConfig, EntryPoint, FileType, MANIFEST_NAME, Project,
    RemoteFile, Version, WEB_APP_DEPLOYMENT_DESCRIPTION, WEB_APP_ENTRY_POINT, WebApp,
};
