//! Constants and enums for the local source tree.

use serde::{Deserialize, Serialize};
use std::path::Path;

/// The three file kinds an Apps Script project is made of.
///
/// Serialized with the remote service's names (`SERVER_JS`, `HTML`, `JSON`).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum FileType {
    /// Server-side script files
    ServerJs,
    /// Client markup files, which may carry HTML, CSS and JavaScript
    Html,
    /// The `appsscript` manifest. Cannot be created locally.
    Json,
}

impl FileType {
    /// All file types in upload order.
    pub const ALL: [FileType; 3] = [FileType::ServerJs, FileType::Html, FileType::Json];

    /// Name used by the remote service.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::ServerJs => "SERVER_JS",
            Self::Html => "HTML",
            Self::Json => "JSON",
        }
    }

    /// Local folder name under `SourceCode/`.
    pub fn folder_name(&self) -> &'static str {
        match self {
            Self::ServerJs => "JAVASCRIPT",
            Self::Html => "HTML",
            Self::Json => "JSON",
        }
    }

    /// Local file extension, including the dot.
    pub fn extension(&self) -> &'static str {
        match self {
            Self::ServerJs => ".js",
            Self::Html => ".html",
            Self::Json => ".json",
        }
    }

    /// Map a local path to its file type by extension.
    ///
    /// Returns `None` for extensions the remote service does not accept.
    pub fn from_path(path: impl AsRef<Path>) -> Option<Self> {
        match path.as_ref().extension()?.to_str()? {
            "js" => Some(Self::ServerJs),
            "html" => Some(Self::Html),
            "json" => Some(Self::Json),
            _ => None,
        }
    }
}

impl std::fmt::Display for FileType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl std::str::FromStr for FileType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "server_js" | "js" | "javascript" | "script" => Ok(Self::ServerJs),
            "html" => Ok(Self::Html),
            "json" | "manifest" => Ok(Self::Json),
            other => Err(format!("unknown file type: {other}")),
        }
    }
}

/// Fixed names in a synchronized project root.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SourcePath {
    /// The `SourceCode` directory holding the three typed folders
    SourceCode,
    /// The `BACKUPS` directory, sibling of `SourceCode`
    Backups,
    /// The `.gas` state directory
    StateDir,
    /// Persisted script ID, inside the state directory
    ScriptIdFile,
    /// Credential store directory, inside the state directory
    CredentialsDir,
    /// Optional configuration file, inside the state directory
    ConfigFile,
}

impl SourcePath {
    /// Get the string representation of the path.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::SourceCode => "SourceCode",
            Self::Backups => "BACKUPS",
            Self::StateDir => ".gas",
            Self::ScriptIdFile => "script_id.txt",
            Self::CredentialsDir => "credentials",
            Self::ConfigFile => "config.toml",
        }
    }
}

impl AsRef<Path> for SourcePath {
    fn as_ref(&self) -> &Path {
        Path::new(self.as_str())
    }
}

impl AsRef<str> for SourcePath {
    fn as_ref(&self) -> &str {
        self.as_str()
    }
}

impl std::fmt::Display for SourcePath {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}
