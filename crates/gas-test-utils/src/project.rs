//! [`TestProject`]: a temporary project root for sync scenarios.

use gas_fs::{FileType, SourceLayout};
use std::fs;
use std::path::{Path, PathBuf};
use tempfile::TempDir;

/// A temporary directory used as a project root.
///
/// # Example
///
/// ```rust,no_run
/// use gas_fs::FileType;
/// use gas_test_utils::TestProject;
///
/// let project = TestProject::new();
/// project.write_source(FileType::ServerJs, "Code", "function a() {}");
/// project.assert_file_exists("SourceCode/JAVASCRIPT/Code.js");
/// ```
pub struct TestProject {
    temp_dir: TempDir,
}

impl Default for TestProject {
    fn default() -> Self {
        Self::new()
    }
}

impl TestProject {
    pub fn new() -> Self {
        Self {
            temp_dir: TempDir::new().unwrap(),
        }
    }

    pub fn root(&self) -> &Path {
        self.temp_dir.path()
    }

    /// The layout rooted here; folders are created on first use.
    pub fn layout(&self) -> SourceLayout {
        SourceLayout::ensure(self.root()).unwrap()
    }

    /// Path of source file `name` of `file_type`.
    pub fn source_path(&self, file_type: FileType, name: &str) -> PathBuf {
        self.layout().path_for(name, file_type)
    }

    /// Write a source file, creating folders as needed.
    pub fn write_source(&self, file_type: FileType, name: &str, content: &str) -> PathBuf {
        let path = self.source_path(file_type, name);
        fs::write(&path, content).unwrap();
        path
    }

    /// Write an arbitrary file relative to the root.
    pub fn write_file(&self, relative: &str, content: &str) -> PathBuf {
        let path = self.root().join(relative);
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).unwrap();
        }
        fs::write(&path, content).unwrap();
        path
    }

    pub fn read_source(&self, file_type: FileType, name: &str) -> String {
        let path = self.source_path(file_type, name);
        fs::read_to_string(&path)
            .unwrap_or_else(|_| panic!("Could not read file: {}", path.display()))
    }

    pub fn read_file(&self, relative: &str) -> String {
        let path = self.root().join(relative);
        fs::read_to_string(&path)
            .unwrap_or_else(|_| panic!("Could not read file: {}", path.display()))
    }

    /// Names of the backup folders, sorted.
    pub fn backup_labels(&self) -> Vec<String> {
        let dir = self.root().join("BACKUPS");
        let Ok(entries) = fs::read_dir(&dir) else {
            return Vec::new();
        };
        let mut labels: Vec<String> = entries
            .filter_map(|e| e.ok())
            .filter(|e| e.path().is_dir())
            .filter_map(|e| e.file_name().to_str().map(str::to_string))
            .collect();
        labels.sort();
        labels
    }

    /// # Panics
    /// Panics if `path` (relative to the root) does not exist.
    pub fn assert_file_exists(&self, path: &str) {
        let full_path = self.root().join(path);
        assert!(
            full_path.exists(),
            "Expected file to exist: {}",
            full_path.display()
        );
    }

    /// # Panics
    /// Panics if `path` (relative to the root) exists.
    pub fn assert_file_not_exists(&self, path: &str) {
        let full_path = self.root().join(path);
        assert!(
            !full_path.exists(),
            "Expected file NOT to exist: {}",
            full_path.display()
        );
    }

    /// # Panics
    /// Panics if the file cannot be read or does not contain `content`.
    pub fn assert_file_contains(&self, path: &str, content: &str) {
        let file_content = self.read_file(path);
        assert!(
            file_content.contains(content),
            "File {} does not contain expected content.\nExpected: {}\nActual: {}",
            path,
            content,
            file_content
        );
    }
}
