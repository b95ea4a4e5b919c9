//! Source tree layout
//!
//! A [`SourceLayout`] is fixed once created: one folder per [`FileType`]
//! under `<root>/SourceCode`, and a backup root beside it.

use crate::{Error, FileType, Result, SourcePath};
use std::fs;
use std::path::{Path, PathBuf};

/// Resolved folders of a synchronized project.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SourceLayout {
    /// Project root passed to [`SourceLayout::ensure`]
    pub root: PathBuf,
    /// `<root>/SourceCode`
    pub source_dir: PathBuf,
    /// `<root>/BACKUPS`
    pub backup_dir: PathBuf,
    javascript_dir: PathBuf,
    html_dir: PathBuf,
    json_dir: PathBuf,
}

impl SourceLayout {
    /// Compute the layout for `root` without touching the filesystem.
    pub fn new(root: impl Into<PathBuf>) -> Self {
        let root = root.into();
        let source_dir = root.join(SourcePath::SourceCode);
        Self {
            backup_dir: root.join(SourcePath::Backups),
            javascript_dir: source_dir.join(FileType::ServerJs.folder_name()),
            html_dir: source_dir.join(FileType::Html.folder_name()),
            json_dir: source_dir.join(FileType::Json.folder_name()),
            source_dir,
            root,
        }
    }

    /// Create every folder of the layout under `root`.
    ///
    /// Existing folders are kept as they are.
    ///
    /// # Errors
    ///
    /// Returns [`Error::DirectoryCreation`] if any folder cannot be created.
    pub fn ensure(root: impl Into<PathBuf>) -> Result<Self> {
        let layout = Self::new(root);
        for dir in [
            &layout.source_dir,
            &layout.javascript_dir,
            &layout.html_dir,
            &layout.json_dir,
            &layout.backup_dir,
        ] {
            fs::create_dir_all(dir).map_err(|source| Error::DirectoryCreation {
                path: dir.clone(),
                source,
            })?;
        }
        tracing::debug!(root = %layout.root.display(), "Source layout ready");
        Ok(layout)
    }

    /// Folder holding files of the given type.
    pub fn folder_for(&self, file_type: FileType) -> &Path {
        match file_type {
            FileType::ServerJs => &self.javascript_dir,
            FileType::Html => &self.html_dir,
            FileType::Json => &self.json_dir,
        }
    }

    /// Local path of a remote file `name` of the given type.
    pub fn path_for(&self, name: &str, file_type: FileType) -> PathBuf {
        self.folder_for(file_type)
            .join(format!("{}{}", name, file_type.extension()))
    }

    /// Regular files anywhere below the folder for `file_type`, sorted by path.
    ///
    /// Remote names containing `/` live in nested folders, so the whole tree
    /// is walked. A missing folder yields an empty list.
    pub fn source_files(&self, file_type: FileType) -> Result<Vec<PathBuf>> {
        walk_files(self.folder_for(file_type))
    }

    /// Remote name of `path` inside the folder for `file_type`.
    ///
    /// The inverse of [`SourceLayout::path_for`]: the path relative to the
    /// folder, without extension, joined with `/`. `None` for paths outside
    /// the folder or with non UTF-8 components.
    pub fn remote_name(&self, file_type: FileType, path: &Path) -> Option<String> {
        let relative = path
            .strip_prefix(self.folder_for(file_type))
            .ok()?
            .with_extension("");
        let parts = relative
            .components()
            .map(|c| c.as_os_str().to_str())
            .collect::<Option<Vec<_>>>()?;
        if parts.is_empty() {
            return None;
        }
        Some(parts.join("/"))
    }

    /// Regular files directly inside `SourceCode/` itself.
    pub fn stray_files(&self) -> Result<Vec<PathBuf>> {
        list_files(&self.source_dir)
    }

    /// `<root>/.gas`
    pub fn state_dir(&self) -> PathBuf {
        self.root.join(SourcePath::StateDir)
    }

    /// File remembering the last project id.
    pub fn script_id_file(&self) -> PathBuf {
        self.state_dir().join(SourcePath::ScriptIdFile)
    }

    /// Directory of the stored OAuth credential.
    pub fn credentials_dir(&self) -> PathBuf {
        self.state_dir().join(SourcePath::CredentialsDir)
    }

    /// Optional per-project settings.
    pub fn config_file(&self) -> PathBuf {
        self.state_dir().join(SourcePath::ConfigFile)
    }
}

/// Regular files directly inside `dir`, sorted by name.
pub(crate) fn list_files(dir: &Path) -> Result<Vec<PathBuf>> {
    if !dir.is_dir() {
        return Ok(Vec::new());
    }

    let mut files = Vec::new();
    for entry in fs::read_dir(dir).map_err(|e| Error::io(dir, e))? {
        let entry = entry.map_err(|e| Error::io(dir, e))?;
        let path = entry.path();
        if path.is_file() {
            files.push(path);
        }
    }
    files.sort();
    Ok(files)
}

/// Regular files anywhere below `dir`, sorted by path.
///
/// Symlinked folders are not followed.
pub(crate) fn walk_files(dir: &Path) -> Result<Vec<PathBuf>> {
    let mut files = Vec::new();
    let mut pending = vec![dir.to_path_buf()];

    while let Some(current) = pending.pop() {
        if !current.is_dir() {
            continue;
        }
        for entry in fs::read_dir(&current).map_err(|e| Error::io(&current, e))? {
            let entry = entry.map_err(|e| Error::io(&current, e))?;
            let path = entry.path();
            let kind = entry.file_type().map_err(|e| Error::io(&path, e))?;
            if kind.is_dir() {
                pending.push(path);
            } else if path.is_file() {
                files.push(path);
            }
        }
    }
    files.sort();
    Ok(files)
}

/// Validate that `name` can be used as a bare file stem in a source folder.
///
/// Rejects empty names, path separators, traversal components and names
/// carrying an extension the folder would add itself.
pub fn validate_file_stem(name: &str) -> Result<()> {
    let reason = if name.trim().is_empty() {
        Some("name must not be empty")
    } else if name.contains('/') || name.contains('\\') {
        Some("name must not contain path separators")
    } else if name == "." || name == ".." {
        Some("name must not be a relative path component")
    } else if name.contains('\0') {
        Some("name must not contain NUL bytes")
    } else if FileType::from_path(name).is_some() {
        Some("name must not include a source extension")
    } else {
        None
    };

    match reason {
        Some(reason) => Err(Error::InvalidFileName {
            name: name.to_string(),
            reason: reason.to_string(),
        }),
        None => Ok(()),
    }
}
