//! Change notifications for the three source folders.
//!
//! Thin wrapper around `notify`, watching `JAVASCRIPT/`, `HTML/` and `JSON/`
//! non-recursively and reporting only files the remote service accepts.

use crate::{FileType, Result, SourceLayout};
use notify::event::{EventKind, ModifyKind, RemoveKind};
use notify::{Config, RecommendedWatcher, RecursiveMode, Watcher};
use std::path::{Path, PathBuf};
use std::sync::mpsc::{self, Receiver};

/// What happened to a watched source file.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SourceEventKind {
    Created,
    Modified,
    Removed,
}

/// A change to a source file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SourceEvent {
    pub path: PathBuf,
    pub file_type: FileType,
    pub kind: SourceEventKind,
}

/// Watches the typed source folders of a layout.
pub struct SourceWatcher {
    // Dropping the watcher stops notifications
    _watcher: RecommendedWatcher,
    rx: Receiver<SourceEvent>,
}

impl SourceWatcher {
    /// Start watching every typed folder of `layout`.
    pub fn new(layout: &SourceLayout) -> Result<Self> {
        let (tx, rx) = mpsc::channel();
        let mut watcher = RecommendedWatcher::new(
            move |res: notify::Result<notify::Event>| {
                if let Ok(event) = res {
                    for mapped in map_event(event) {
                        let _ = tx.send(mapped);
                    }
                }
            },
            Config::default(),
        )?;

        for file_type in FileType::ALL {
            watcher.watch(layout.folder_for(file_type), RecursiveMode::NonRecursive)?;
        }

        Ok(Self {
            _watcher: watcher,
            rx,
        })
    }

    /// Next event without blocking.
    pub fn try_next(&self) -> Option<SourceEvent> {
        self.rx.try_recv().ok()
    }

    /// Drain every event already queued.
    pub fn drain(&self) -> Vec<SourceEvent> {
        std::iter::from_fn(|| self.try_next()).collect()
    }
}

fn map_event(event: notify::Event) -> Vec<SourceEvent> {
    let kind = match event.kind {
        EventKind::Create(_) => SourceEventKind::Created,
        EventKind::Modify(ModifyKind::Name(_)) => SourceEventKind::Modified,
        EventKind::Modify(_) => SourceEventKind::Modified,
        EventKind::Remove(RemoveKind::File) | EventKind::Remove(RemoveKind::Any) => {
            SourceEventKind::Removed
        }
        _ => return Vec::new(),
    };

    event
        .paths
        .into_iter()
        .filter(|path| !is_temp_file(path))
        .filter_map(|path| {
            let file_type = FileType::from_path(&path)?;
            Some(SourceEvent {
                path,
                file_type,
                kind,
            })
        })
        .collect()
}

/// Temp files written by [`crate::io::write_atomic`] start with a dot.
fn is_temp_file(path: &Path) -> bool {
    path.file_name()
        .and_then(|n| n.to_str())
        .is_some_and(|n| n.starts_with('.') || n.ends_with(".tmp"))
}
