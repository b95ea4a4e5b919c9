//! Source tree backups
//!
//! Every download first copies the current local files into
//! `BACKUPS/<label>/`, where the label carries the project title (when known)
//! and the local wall-clock time:
//!
//! ```text
//! BACKUPS/Backup for My Project at 10.42.07/
//!   JAVASCRIPT/Code.js
//!   HTML/Index.html
//!   JSON/appsscript.json
//!   stray.txt            <- files found directly under SourceCode/
//! ```
//!
//! Backups are additive. The label has one-second resolution, so two backups
//! taken within the same second share a folder and later copies overwrite
//! earlier ones.

use crate::layout::{list_files, walk_files};
use crate::{Error, FileType, Result, SourceLayout};
use chrono::{Local, NaiveTime};
use std::fs;
use std::path::{Path, PathBuf};

/// A backup folder found on disk.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BackupInfo {
    /// Folder name, e.g. `Backup at 10.42.07`
    pub label: String,
    /// Full path to the backup folder
    pub path: PathBuf,
    /// Number of files in the backup, including typed subfolders
    pub file_count: usize,
}

/// Creates and lists source tree backups for one layout.
pub struct BackupManager<'a> {
    layout: &'a SourceLayout,
}

impl<'a> BackupManager<'a> {
    pub fn new(layout: &'a SourceLayout) -> Self {
        Self { layout }
    }

    /// Folder label for a backup taken at `time`.
    ///
    /// Colons in the time are replaced by dots so the label is a valid
    /// folder name everywhere.
    pub fn label_for(title: Option<&str>, time: NaiveTime) -> String {
        let stamp = time.format("%H:%M:%S").to_string().replace(':', ".");
        match title {
            Some(title) if !title.is_empty() => format!("Backup for {} at {}", title, stamp),
            _ => format!("Backup at {}", stamp),
        }
    }

    /// Copy every local source file into a new timestamped backup folder.
    ///
    /// Returns the path of the backup folder.
    pub fn backup_snapshot(&self, title: Option<&str>) -> Result<PathBuf> {
        let label = Self::label_for(title, Local::now().time());
        self.backup_into(&label)
    }

    /// Copy every local source file into `BACKUPS/<label>`.
    pub fn backup_into(&self, label: &str) -> Result<PathBuf> {
        let target = self.layout.backup_dir.join(sanitize_label(label));
        create_dir(&target)?;

        let mut copied = 0usize;
        for file_type in FileType::ALL {
            let dest_dir = target.join(file_type.folder_name());
            create_dir(&dest_dir)?;
            let folder = self.layout.folder_for(file_type);
            for file in self.layout.source_files(file_type)? {
                // Nested remote names keep their subfolders
                let nested = file
                    .strip_prefix(folder)
                    .ok()
                    .and_then(Path::parent)
                    .map(|p| dest_dir.join(p))
                    .unwrap_or_else(|| dest_dir.clone());
                create_dir(&nested)?;
                copy_into(&file, &nested)?;
                copied += 1;
            }
        }

        for file in self.layout.stray_files()? {
            copy_into(&file, &target)?;
            copied += 1;
        }

        tracing::info!(path = %target.display(), files = copied, "Project backup stored");
        Ok(target)
    }

    /// List existing backup folders, sorted by label.
    pub fn list_backups(&self) -> Result<Vec<BackupInfo>> {
        let dir = &self.layout.backup_dir;
        if !dir.is_dir() {
            return Ok(Vec::new());
        }

        let mut backups = Vec::new();
        for entry in fs::read_dir(dir).map_err(|e| Error::io(dir, e))? {
            let entry = entry.map_err(|e| Error::io(dir, e))?;
            let path = entry.path();
            if !path.is_dir() {
                continue;
            }
            let Some(label) = path.file_name().and_then(|n| n.to_str()) else {
                continue;
            };

            let mut file_count = list_files(&path)?.len();
            for file_type in FileType::ALL {
                file_count += walk_files(&path.join(file_type.folder_name()))?.len();
            }

            backups.push(BackupInfo {
                label: label.to_string(),
                path: path.clone(),
                file_count,
            });
        }
        backups.sort_by(|a, b| a.label.cmp(&b.label));
        Ok(backups)
    }
}

fn create_dir(path: &Path) -> Result<()> {
    fs::create_dir_all(path).map_err(|source| Error::DirectoryCreation {
        path: path.to_path_buf(),
        source,
    })
}

fn copy_into(file: &Path, dest_dir: &Path) -> Result<()> {
    let Some(name) = file.file_name() else {
        return Ok(());
    };
    let dest = dest_dir.join(name);
    fs::copy(file, &dest).map_err(|e| Error::io(&dest, e))?;
    Ok(())
}

/// Project titles are user-supplied; keep them from escaping the backup root.
fn sanitize_label(label: &str) -> String {
    label
        .chars()
        .map(|c| match c {
            '/' | '\\' | ':' | '*' | '?' | '"' | '<' | '>' | '|' => '_',
            c => c,
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn label_with_title() {
        let time = NaiveTime::from_hms_opt(9, 5, 7).unwrap();
        assert_eq!(
            BackupManager::label_for(Some("Demo"), time),
            "Backup for Demo at 09.05.07"
        );
    }

    #[test]
    fn label_without_title() {
        let time = NaiveTime::from_hms_opt(23, 59, 1).unwrap();
        assert_eq!(BackupManager::label_for(None, time), "Backup at 23.59.01");
        assert_eq!(BackupManager::label_for(Some(""), time), "Backup at 23.59.01");
    }

    #[test]
    fn sanitize_label_replaces_separators() {
        assert_eq!(sanitize_label("Backup for a/b at 1.2.3"), "Backup for a_b at 1.2.3");
    }
}
