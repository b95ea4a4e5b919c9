//! Credentials and the authorization seam.
//!
//! An [`Authorizer`] produces a [`Credential`] for a set of scopes, or `None`
//! when the user declined. The session races it against a timeout and
//! persists the result in a [`CredentialStore`].

use crate::Result;
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use gas_fs::{ConfigStore, io};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Scopes needed to manage projects, versions and deployments.
pub const DEFAULT_SCOPES: &[&str] = &[
    "https://www.googleapis.com/auth/script.projects",
    "https://www.googleapis.com/auth/script.deployments",
    "https://www.googleapis.com/auth/drive",
    "https://www.googleapis.com/auth/userinfo.email",
];

/// Environment variable read by [`TokenAuthorizer`].
pub const ACCESS_TOKEN_ENV: &str = "GAS_ACCESS_TOKEN";

const TOKEN_FILE: &str = "token.json";

/// An OAuth access token and what it was granted for.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Credential {
    pub access_token: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub refresh_token: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub expires_at: Option<DateTime<Utc>>,
    #[serde(default)]
    pub scopes: Vec<String>,
}

impl Credential {
    pub fn new(access_token: impl Into<String>) -> Self {
        Self {
            access_token: access_token.into(),
            refresh_token: None,
            expires_at: None,
            scopes: Vec::new(),
        }
    }

    pub fn with_scopes(mut self, scopes: &[String]) -> Self {
        self.scopes = scopes.to_vec();
        self
    }

    pub fn with_expiry(mut self, expires_at: DateTime<Utc>) -> Self {
        self.expires_at = Some(expires_at);
        self
    }

    /// A credential without an expiry never expires.
    pub fn is_expired(&self, now: DateTime<Utc>) -> bool {
        self.expires_at.is_some_and(|at| at <= now)
    }

    /// Whether every scope in `scopes` was granted.
    pub fn covers(&self, scopes: &[String]) -> bool {
        scopes.iter().all(|s| self.scopes.contains(s))
    }
}

/// Persists the credential as `token.json` inside a directory.
#[derive(Debug, Clone)]
pub struct CredentialStore {
    dir: PathBuf,
    config: ConfigStore,
}

impl CredentialStore {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self {
            dir: dir.into(),
            config: ConfigStore::new(),
        }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    fn token_path(&self) -> PathBuf {
        self.dir.join(TOKEN_FILE)
    }

    pub fn load(&self) -> Result<Option<Credential>> {
        Ok(self.config.load_optional(&self.token_path())?)
    }

    pub fn save(&self, credential: &Credential) -> Result<()> {
        self.config.save(&self.token_path(), credential)?;
        tracing::debug!(dir = %self.dir.display(), "Credential stored");
        Ok(())
    }

    /// Remove the whole credential directory.
    pub fn clear(&self) -> Result<()> {
        io::remove_dir_if_exists(&self.dir)?;
        tracing::debug!(dir = %self.dir.display(), "Credential store cleared");
        Ok(())
    }
}

/// Obtains a credential for the given scopes.
///
/// `Ok(None)` means the flow finished without granting access.
#[async_trait]
pub trait Authorizer: Send + Sync {
    async fn authorize(&self, scopes: &[String]) -> Result<Option<Credential>>;
}

/// Non-interactive authorizer.
///
/// Reuses a stored, unexpired credential covering the scopes; otherwise
/// takes an access token from `GAS_ACCESS_TOKEN`.
#[derive(Debug, Clone)]
pub struct TokenAuthorizer {
    store: CredentialStore,
    env_var: String,
}

impl TokenAuthorizer {
    pub fn new(store: CredentialStore) -> Self {
        Self {
            store,
            env_var: ACCESS_TOKEN_ENV.to_string(),
        }
    }

    /// Read the token from `env_var` instead of `GAS_ACCESS_TOKEN`.
    pub fn with_env_var(mut self, env_var: impl Into<String>) -> Self {
        self.env_var = env_var.into();
        self
    }
}

#[async_trait]
impl Authorizer for TokenAuthorizer {
    async fn authorize(&self, scopes: &[String]) -> Result<Option<Credential>> {
        if let Some(stored) = self.store.load()?
            && !stored.is_expired(Utc::now())
            && stored.covers(scopes)
        {
            tracing::debug!("Using stored credential");
            return Ok(Some(stored));
        }

        match std::env::var(&self.env_var) {
            Ok(token) if !token.trim().is_empty() => {
                tracing::debug!(var = %self.env_var, "Using access token from environment");
                Ok(Some(Credential::new(token.trim()).with_scopes(scopes)))
            }
            _ => Ok(None),
        }
    }
}
