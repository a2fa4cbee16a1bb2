//! Long-lived bookkeeping shared by classification and rollback.
//!
//! ClearCase only learns about renames and removals at check-in time, so
//! between a local rename and the commit the plugin has to remember which
//! name the VOB still knows an element by. The tables here outlive a single
//! reconciliation pass and are persisted by hosts that restart.

use std::collections::{BTreeMap, BTreeSet};
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct TrackingState {
    /// current name -> original name
    renamed_files: BTreeMap<PathBuf, PathBuf>,
    /// current name -> original name
    renamed_folders: BTreeMap<PathBuf, PathBuf>,
    removed_files: BTreeSet<PathBuf>,
    removed_folders: BTreeSet<PathBuf>,
    deleted_files: BTreeSet<PathBuf>,
    deleted_folders: BTreeSet<PathBuf>,
    checked_out_folders: BTreeSet<PathBuf>,
    new_files: BTreeSet<PathBuf>,
    modified_files: BTreeSet<PathBuf>,
    successful_checkouts: BTreeSet<PathBuf>,
    merge_conflicts: BTreeSet<PathBuf>,
    versioned_folders: BTreeSet<PathBuf>,
}

impl TrackingState {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        *self == Self::default()
    }

    pub fn record_file_rename(&mut self, current: PathBuf, original: PathBuf) {
        self.renamed_files.insert(current, original);
    }

    pub fn record_folder_rename(&mut self, current: PathBuf, original: PathBuf) {
        self.renamed_folders.insert(current, original);
    }

    pub fn forget_file_rename(&mut self, current: &Path) -> Option<PathBuf> {
        self.renamed_files.remove(current)
    }

    pub fn forget_folder_rename(&mut self, current: &Path) -> Option<PathBuf> {
        self.renamed_folders.remove(current)
    }

    #[must_use]
    pub fn is_renamed_file(&self, current: &Path) -> bool {
        self.renamed_files.contains_key(current)
    }

    #[must_use]
    pub fn is_renamed_folder(&self, current: &Path) -> bool {
        self.renamed_folders.contains_key(current)
    }

    /// Whether `path` is the original name of a renamed file.
    #[must_use]
    pub fn is_file_rename_origin(&self, path: &Path) -> bool {
        self.renamed_files.values().any(|original| original == path)
    }

    /// Whether `path` is the original name of a renamed folder.
    #[must_use]
    pub fn is_folder_rename_origin(&self, path: &Path) -> bool {
        self.renamed_folders.values().any(|original| original == path)
    }

    /// Renamed folders as `(current, original)` pairs.
    pub fn renamed_folders(&self) -> impl Iterator<Item = (&Path, &Path)> {
        self.renamed_folders
            .iter()
            .map(|(current, original)| (current.as_path(), original.as_path()))
    }

    /// The name the VOB knows `path` by.
    ///
    /// An explicit file rename wins; otherwise the first renamed folder
    /// containing `path` has its prefix swapped back. Paths untouched by any
    /// rename are their own reference name.
    #[must_use]
    pub fn discover_old_name(&self, path: &Path) -> PathBuf {
        if let Some(original) = self.renamed_files.get(path) {
            return original.clone();
        }

        for (current, original) in &self.renamed_folders {
            if let Ok(rest) = path.strip_prefix(current) {
                return join_rest(original, rest);
            }
        }

        path.to_path_buf()
    }

    /// Inverse of [`discover_old_name`](Self::discover_old_name).
    #[must_use]
    pub fn discover_new_name(&self, path: &Path) -> PathBuf {
        if let Some((current, _)) = self
            .renamed_files
            .iter()
            .find(|(_, original)| original.as_path() == path)
        {
            return current.clone();
        }

        for (current, original) in &self.renamed_folders {
            if let Ok(rest) = path.strip_prefix(original) {
                return join_rest(current, rest);
            }
        }

        path.to_path_buf()
    }

    /// True for paths inside a renamed folder, and for the renamed folder itself.
    #[must_use]
    pub fn is_under_renamed_folder(&self, path: &Path) -> bool {
        self.renamed_folders
            .keys()
            .any(|folder| path.starts_with(folder))
    }

    /// A refactoring that renames a file and then writes fresh content under
    /// the old name leaves a new file sitting on a rename origin.
    #[must_use]
    pub fn is_new_over_renamed(&self, path: &Path) -> bool {
        self.new_files.contains(path) && self.is_file_rename_origin(path)
    }

    pub fn add_new_file(&mut self, path: PathBuf) {
        self.new_files.insert(path);
    }

    pub fn forget_new_file(&mut self, path: &Path) -> bool {
        self.new_files.remove(path)
    }

    #[must_use]
    pub fn contains_new(&self, path: &Path) -> bool {
        self.new_files.contains(path)
    }

    #[must_use]
    pub fn new_files(&self) -> &BTreeSet<PathBuf> {
        &self.new_files
    }

    pub fn add_modified_file(&mut self, path: PathBuf) {
        self.modified_files.insert(path);
    }

    #[must_use]
    pub fn contains_modified(&self, path: &Path) -> bool {
        self.modified_files.contains(path)
    }

    /// Replaces the cached modified set after a successful online pass.
    pub fn replace_modified_files(&mut self, files: impl IntoIterator<Item = PathBuf>) {
        self.modified_files = files.into_iter().collect();
    }

    pub fn mark_successful_checkout(&mut self, path: PathBuf) {
        self.successful_checkouts.insert(path);
    }

    /// Consumes the "just checked out" marker; it only applies to one pass.
    pub fn take_successful_checkout(&mut self, path: &Path) -> bool {
        self.successful_checkouts.remove(path)
    }

    pub fn mark_merge_conflict(&mut self, path: PathBuf) {
        self.merge_conflicts.insert(path);
    }

    pub fn clear_merge_conflict(&mut self, path: &Path) -> bool {
        self.merge_conflicts.remove(path)
    }

    #[must_use]
    pub fn has_merge_conflict(&self, path: &Path) -> bool {
        self.merge_conflicts.contains(path)
    }

    pub fn record_removed_file(&mut self, path: PathBuf) {
        self.removed_files.insert(path);
    }

    pub fn record_removed_folder(&mut self, path: PathBuf) {
        self.removed_folders.insert(path);
    }

    pub fn record_deleted_file(&mut self, path: PathBuf) {
        self.deleted_files.insert(path);
    }

    pub fn record_deleted_folder(&mut self, path: PathBuf) {
        self.deleted_folders.insert(path);
    }

    #[must_use]
    pub fn removed_files(&self) -> &BTreeSet<PathBuf> {
        &self.removed_files
    }

    #[must_use]
    pub fn removed_folders(&self) -> &BTreeSet<PathBuf> {
        &self.removed_folders
    }

    #[must_use]
    pub fn deleted_files(&self) -> &BTreeSet<PathBuf> {
        &self.deleted_files
    }

    #[must_use]
    pub fn deleted_folders(&self) -> &BTreeSet<PathBuf> {
        &self.deleted_folders
    }

    /// Removed locally (not yet checked in) or deleted for the VOB.
    #[must_use]
    pub fn is_folder_removed(&self, path: &Path) -> bool {
        self.removed_folders.contains(path) || self.deleted_folders.contains(path)
    }

    pub fn remove_folder_from_deleted(&mut self, path: &Path) {
        self.removed_folders.remove(path);
        self.deleted_folders.remove(path);
    }

    #[must_use]
    pub fn checked_out_folders(&self) -> &BTreeSet<PathBuf> {
        &self.checked_out_folders
    }

    pub fn add_checked_out_folder(&mut self, path: PathBuf) {
        self.checked_out_folders.insert(path);
    }

    pub fn remove_checked_out_folder(&mut self, path: &Path) -> bool {
        self.checked_out_folders.remove(path)
    }

    pub fn set_versioned_folder(&mut self, path: &Path, versioned: bool) {
        if versioned {
            self.versioned_folders.insert(path.to_path_buf());
        } else {
            self.versioned_folders.remove(path);
        }
    }

    #[must_use]
    pub fn is_versioned_folder(&self, path: &Path) -> bool {
        self.versioned_folders.contains(path)
    }
}

fn join_rest(base: &Path, rest: &Path) -> PathBuf {
    if rest.as_os_str().is_empty() {
        base.to_path_buf()
    } else {
        base.join(rest)
    }
}
