//! Dirty scope: the host's view of what may have changed since the last pass.

use std::path::{Path, PathBuf};

/// A single dirty path together with what the file system currently knows
/// about the object that was notified.
///
/// When a file is renamed or moved the host sends a notification for the
/// old path as well. That notification still points at the moved object,
/// whose name or parent no longer matches the notified path.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DirtyPath {
    path: PathBuf,
    is_dir: bool,
    current_name: Option<String>,
    current_parent: Option<PathBuf>,
}

impl DirtyPath {
    /// Describes `path` from the file system as it is now.
    #[must_use]
    pub fn new(path: impl Into<PathBuf>) -> Self {
        let path = path.into();
        let exists = path.exists();
        let current_name = if exists {
            path.file_name().map(|n| n.to_string_lossy().into_owned())
        } else {
            None
        };
        let current_parent = path
            .parent()
            .filter(|parent| parent.exists())
            .map(Path::to_path_buf);

        Self {
            is_dir: path.is_dir(),
            path,
            current_name,
            current_parent,
        }
    }

    /// A notification for `path` whose object has since moved to `now_at`.
    #[must_use]
    pub fn moved(path: impl Into<PathBuf>, now_at: &Path) -> Self {
        Self {
            path: path.into(),
            is_dir: now_at.is_dir(),
            current_name: now_at
                .file_name()
                .map(|n| n.to_string_lossy().into_owned()),
            current_parent: now_at.parent().map(Path::to_path_buf),
        }
    }

    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }

    #[must_use]
    pub fn is_dir(&self) -> bool {
        self.is_dir
    }

    /// Whether the notified object still exists on disk.
    #[must_use]
    pub fn exists(&self) -> bool {
        self.current_name.is_some()
    }

    /// False for the shadow notification a rename or move produces for the
    /// old location.
    ///
    /// Deleted files have no current name; they pass as long as the parent
    /// did not change and both names are empty.
    #[must_use]
    pub fn is_proper_notification(&self) -> bool {
        let old_name = self
            .path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_default();
        let new_name = self.current_name.clone().unwrap_or_default();

        let same_parent = self.current_parent.as_deref() == self.path.parent();
        same_parent && (new_name == old_name || (new_name.is_empty() && old_name.is_empty()))
    }
}

#[derive(Debug, Clone, Default)]
pub struct DirtyScope {
    dirty_files: Vec<DirtyPath>,
    recursively_dirty_dirs: Vec<PathBuf>,
    affected_roots: Vec<PathBuf>,
}

impl DirtyScope {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn with_dirty_file(mut self, path: DirtyPath) -> Self {
        self.dirty_files.push(path);
        self
    }

    #[must_use]
    pub fn with_recursive_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.recursively_dirty_dirs.push(dir.into());
        self
    }

    #[must_use]
    pub fn with_affected_root(mut self, root: impl Into<PathBuf>) -> Self {
        self.affected_roots.push(root.into());
        self
    }

    #[must_use]
    pub fn dirty_files(&self) -> &[DirtyPath] {
        &self.dirty_files
    }

    #[must_use]
    pub fn recursively_dirty_dirs(&self) -> &[PathBuf] {
        &self.recursively_dirty_dirs
    }

    /// Content roots touched by the scope.
    #[must_use]
    pub fn affected_roots(&self) -> &[PathBuf] {
        &self.affected_roots
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.dirty_files.is_empty() && self.recursively_dirty_dirs.is_empty()
    }
}
