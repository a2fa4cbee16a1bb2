use std::path::{Path, PathBuf};

/// The environment the engines run in: content roots, ignore policy, the
/// host's own change lists and its file system view.
pub trait ProjectHost: Send + Sync {
    /// True while the project is being closed or reloaded.
    fn is_disposed(&self) -> bool;

    fn content_roots(&self) -> Vec<PathBuf>;

    fn is_ignored(&self, path: &Path) -> bool;

    /// Whether some change list already holds a change for `path`.
    fn has_change(&self, path: &Path) -> bool;

    /// After paths of every change the host currently shows as added.
    fn added_files(&self) -> Vec<PathBuf>;

    /// Schedules `path` for the next classification pass.
    fn mark_dirty(&self, path: &Path);

    /// Re-reads `path` from disk.
    fn refresh(&self, path: &Path);

    fn show_reminder(&self, message: &str);
}
