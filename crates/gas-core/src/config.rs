//! Per-project settings, read from `<root>/.gas/config.toml`.

use crate::Result;
use gas_api::{DEFAULT_BASE_URL, DEFAULT_SCOPES};
use gas_fs::{ConfigStore, SourceLayout};
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::time::Duration;

/// Settings of a [`crate::ScriptManager`].
///
/// Every field is optional in the file; missing fields take the defaults.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ManagerConfig {
    /// Seconds to wait for the authorization flow
    pub auth_timeout_secs: u64,
    /// Move the first `<script>` block of downloaded markup into a sibling file
    pub split_html_scripts: bool,
    /// Create the web-app deployment when a project has none
    pub auto_create_web_app_deployment: bool,
    pub api_base_url: String,
    pub scopes: Vec<String>,
}

impl Default for ManagerConfig {
    fn default() -> Self {
        Self {
            auth_timeout_secs: 30,
            split_html_scripts: true,
            auto_create_web_app_deployment: true,
            api_base_url: DEFAULT_BASE_URL.to_string(),
            scopes: DEFAULT_SCOPES.iter().map(|s| s.to_string()).collect(),
        }
    }
}

impl ManagerConfig {
    pub fn auth_timeout(&self) -> Duration {
        Duration::from_secs(self.auth_timeout_secs)
    }

    /// Load the settings of the project at `root`, or defaults when the file
    /// does not exist.
    pub fn load(root: &Path) -> Result<Self> {
        let path = SourceLayout::new(root).config_file();
        let config = ConfigStore::new().load_optional(&path)?;
        Ok(config.unwrap_or_default())
    }

    /// Write the settings to `<root>/.gas/config.toml`.
    pub fn save(&self, root: &Path) -> Result<()> {
        let path = SourceLayout::new(root).config_file();
        ConfigStore::new().save(&path, self)?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn defaults() {
        let config = ManagerConfig::default();
        assert_eq!(config.auth_timeout(), Duration::from_secs(30));
        assert!(config.split_html_scripts);
        assert!(config.auto_create_web_app_deployment);
        assert_eq!(config.scopes.len(), 4);
    }

    #[test]
    fn missing_file_gives_defaults() {
        let temp = tempfile::tempdir().unwrap();
        assert_eq!(ManagerConfig::load(temp.path()).unwrap(), ManagerConfig::default());
    }

    #[test]
    fn partial_file_keeps_other_defaults() {
        let temp = tempfile::tempdir().unwrap();
        let dir = temp.path().join(".gas");
        std::fs::create_dir_all(&dir).unwrap();
        std::fs::write(dir.join("config.toml"), "split_html_scripts = false\n").unwrap();

        let config = ManagerConfig::load(temp.path()).unwrap();
        assert!(!config.split_html_scripts);
        assert_eq!(config.auth_timeout_secs, 30);
    }

    #[test]
    fn save_then_load() {
        let temp = tempfile::tempdir().unwrap();
        let config = ManagerConfig {
            auth_timeout_secs: 5,
            ..Default::default()
        };
        config.save(temp.path()).unwrap();
        assert_eq!(ManagerConfig::load(temp.path()).unwrap(), config);
    }
}
