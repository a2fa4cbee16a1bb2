//! Undoes pending changes in a view.
//!
//! Each change gets exactly one inverse action picked from its kind:
//! renamed folders are moved back, additions are deleted from disk,
//! deletions are reloaded from the VOB, and renames and modifications are
//! undone through the tool. Per-item failures are collected as
//! [`VcsError`]s and never stop the batch.

use std::collections::BTreeSet;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use ccase_core::{
    Change, ElementStatus, TrackingState, canonical_local_path, starts_with_ignore_case,
};
use tracing::{debug, warn};

use crate::error::{OperationError, VcsError};
use crate::traits::{ElementProvider, ProgressReporter, ProjectHost};

/// Lines `cleartool update` prints on success.
pub const BENIGN_UPDATE_PREFIXES: [&str; 7] = [
    "Processing dir",
    "Loading ",
    "End dir",
    "Done loading",
    "Log has been written",
    ".",
    "Making dir",
];

/// Undoing the checkout of an element that was never in the VOB.
const ELEMENT_NOT_FOUND: &str = "element name not found";

/// What one rollback call did.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RollbackSummary {
    /// Paths marked dirty and refreshed afterwards.
    pub processed: Vec<PathBuf>,
    /// Error-level entries appended to the caller's list.
    pub errors: usize,
    /// Warning-level entries appended to the caller's list.
    pub warnings: usize,
}

impl RollbackSummary {
    fn new(processed: BTreeSet<PathBuf>, appended: &[VcsError]) -> Self {
        let warnings = appended.iter().filter(|e| e.is_warning()).count();
        Self {
            processed: processed.into_iter().collect(),
            errors: appended.len() - warnings,
            warnings,
        }
    }
}

pub struct RollbackEnvironment<E, H> {
    elements: E,
    host: H,
}

impl<E, H> RollbackEnvironment<E, H>
where
    E: ElementProvider,
    H: ProjectHost,
{
    pub fn new(elements: E, host: H) -> Self {
        Self { elements, host }
    }

    /// Applies the inverse action to each change.
    ///
    /// Problems with single items are appended to `errors`. Every touched
    /// path is marked dirty and refreshed through the host at the end.
    pub fn rollback_changes(
        &mut self,
        changes: &[Change],
        state: &mut TrackingState,
        errors: &mut Vec<VcsError>,
        progress: &dyn ProgressReporter,
    ) -> RollbackSummary {
        let first_new_error = errors.len();
        let mut processed = BTreeSet::new();

        self.rollback_renamed_folders(changes, state, errors, &mut processed, progress);
        self.rollback_new(changes, state, errors, &mut processed, progress);
        self.rollback_deleted(changes, state, errors, &mut processed, progress);
        self.rollback_changed(changes, state, errors, &mut processed, progress);

        for path in &processed {
            self.host.mark_dirty(path);
            self.host.refresh(path);
        }

        let summary = RollbackSummary::new(processed, &errors[first_new_error..]);
        debug!(
            processed = summary.processed.len(),
            errors = summary.errors,
            warnings = summary.warnings,
            "rollback finished"
        );
        summary
    }

    /// Brings back files and folders that were deleted locally.
    pub fn rollback_missing_file_deletion(
        &mut self,
        paths: &[PathBuf],
        state: &mut TrackingState,
        errors: &mut Vec<VcsError>,
        progress: &dyn ProgressReporter,
    ) {
        for path in paths {
            progress.accept(path);
            self.restore_missing(path, state, errors);
        }
    }

    /// Reloads hijacked files from the view.
    pub fn rollback_modified_without_checkout(
        &mut self,
        files: &[PathBuf],
        errors: &mut Vec<VcsError>,
        progress: &dyn ProgressReporter,
    ) {
        for file in files {
            progress.accept(file);
            self.update_file(file, errors);
            self.host.refresh(file);
        }
    }

    /// Nothing to do: an unchanged file has no checkout worth undoing.
    pub fn rollback_if_unchanged(&self, _path: &Path) {}

    fn rollback_renamed_folders(
        &self,
        changes: &[Change],
        state: &mut TrackingState,
        errors: &mut Vec<VcsError>,
        processed: &mut BTreeSet<PathBuf>,
        progress: &dyn ProgressReporter,
    ) {
        for change in changes.iter().filter(|c| is_folder_rename(c)) {
            let (Some(before), Some(after)) = (change.before_path(), change.after_path()) else {
                continue;
            };
            progress.accept(after);
            debug!(from = %after.display(), to = %before.display(), "renaming folder back");

            if let Err(err) = fs::rename(after, before) {
                warn!(folder = %after.display(), error = %err, "failed to rename folder back");
                errors.push(
                    VcsError::error(format!(
                        "Failed to rename folder back to {}: {err}",
                        before.display()
                    ))
                    .for_path(after),
                );
                // Stays tracked until the folder is back in place.
                processed.insert(after.to_path_buf());
                continue;
            }
            state.forget_folder_rename(&canonical_local_path(after));

            if self.elements.status_safely(before).is_modified() {
                self.undo_known_element(before, errors);
            }
            processed.insert(before.to_path_buf());
        }
    }

    fn rollback_new(
        &self,
        changes: &[Change],
        state: &mut TrackingState,
        errors: &mut Vec<VcsError>,
        processed: &mut BTreeSet<PathBuf>,
        progress: &dyn ProgressReporter,
    ) {
        let mut files = BTreeSet::new();
        let mut folders = BTreeSet::new();

        for change in changes.iter().filter(|c| c.is_new()) {
            let Some(after) = change.after_path() else {
                continue;
            };
            if change.is_folder() {
                folders.insert(after.to_path_buf());
            } else {
                files.insert(after.to_path_buf());
            }
            processed.insert(after.to_path_buf());
        }

        // Leave no addition behind inside a folder that is going away.
        for added in self.host.added_files() {
            if folders
                .iter()
                .any(|folder| starts_with_ignore_case(&added, folder))
            {
                files.insert(added);
            }
        }

        for path in files.iter().chain(&folders) {
            progress.accept(path);
            debug!(path = %path.display(), "deleting new item");

            if let Err(err) = delete_from_disk(path) {
                warn!(path = %path.display(), error = %err, "failed to delete new item");
                errors.push(VcsError::error(format!("Failed to delete: {err}")).for_path(path));
            }
            state.forget_new_file(path);
            self.host.mark_dirty(path);
        }
    }

    fn rollback_deleted(
        &self,
        changes: &[Change],
        state: &mut TrackingState,
        errors: &mut Vec<VcsError>,
        processed: &mut BTreeSet<PathBuf>,
        progress: &dyn ProgressReporter,
    ) {
        for change in changes.iter().filter(|c| c.is_deleted()) {
            let Some(before) = change.before_path() else {
                continue;
            };
            progress.accept(before);
            self.restore_missing(before, state, errors);
            processed.insert(before.to_path_buf());
        }
    }

    fn rollback_changed(
        &self,
        changes: &[Change],
        state: &mut TrackingState,
        errors: &mut Vec<VcsError>,
        processed: &mut BTreeSet<PathBuf>,
        progress: &dyn ProgressReporter,
    ) {
        let modifications = changes
            .iter()
            .filter(|c| !c.is_new() && !c.is_deleted() && !is_folder_rename(c));

        for change in modifications {
            let Some(after) = change.after_path() else {
                continue;
            };
            progress.accept(after);

            match change.before_path().filter(|_| change.is_rename()) {
                Some(before) => {
                    debug!(from = %after.display(), to = %before.display(), "undoing file rename");
                    if !self.undo_known_element(before, errors) {
                        processed.insert(after.to_path_buf());
                        continue;
                    }
                    state.forget_file_rename(after);

                    if let Err(err) = delete_from_disk(after) {
                        warn!(path = %after.display(), error = %err, "failed to delete renamed file");
                        errors.push(
                            VcsError::error(format!("Failed to delete: {err}")).for_path(after),
                        );
                    }
                    processed.insert(before.to_path_buf());
                }
                None if self.elements.status_safely(after) == ElementStatus::Hijacked => {
                    debug!(path = %after.display(), "reloading hijacked file");
                    self.update_file(after, errors);
                }
                None => {
                    debug!(path = %after.display(), "undoing checkout");
                    if let Err(err) = self.elements.undo_checkout(after) {
                        errors.push(VcsError::error(err.to_string()).for_path(after));
                    }
                }
            }
            processed.insert(after.to_path_buf());
        }
    }

    fn restore_missing(&self, path: &Path, state: &mut TrackingState, errors: &mut Vec<VcsError>) {
        let key = canonical_local_path(path);

        if state.is_folder_removed(&key) {
            debug!(folder = %path.display(), "restoring removed folder");
            self.update_file(path, errors);

            if path.exists() {
                self.undo_checkouts_in(path, errors);
            }
            state.remove_folder_from_deleted(&key);
        } else if let Err(err) = self.elements.undo_checkout(path) {
            debug!(path = %path.display(), error = %err, "undo failed, updating instead");
            self.update_file(path, errors);
        }

        self.host.mark_dirty(path);
    }

    /// Checked-out files stay checked out when their folder is reloaded.
    fn undo_checkouts_in(&self, folder: &Path, errors: &mut Vec<VcsError>) {
        let files = match self.elements.list_checkouts_under(folder) {
            Ok(files) => files,
            Err(err) => {
                errors.push(VcsError::error(err.to_string()).for_path(folder));
                return;
            }
        };

        for file in files {
            if let Err(err) = self.elements.undo_checkout(&file) {
                errors.push(VcsError::error(err.to_string()).for_path(&file));
            }
        }
    }

    /// Returns `false` when the undo failed and was reported.
    fn undo_known_element(&self, path: &Path, errors: &mut Vec<VcsError>) -> bool {
        match self.elements.undo_checkout(path) {
            Ok(()) => true,
            Err(err) if is_unknown_element(&err) => {
                debug!(path = %path.display(), "element not in VOB, nothing to undo");
                true
            }
            Err(err) => {
                errors.push(VcsError::error(err.to_string()).for_path(path));
                false
            }
        }
    }

    fn update_file(&self, path: &Path, errors: &mut Vec<VcsError>) {
        match self.elements.update(path) {
            Ok(output) => errors.extend(
                classify_update_output(&output)
                    .into_iter()
                    .map(|warning| warning.for_path(path)),
            ),
            Err(err) => {
                warn!(path = %path.display(), error = %err, "update failed");
                errors.push(VcsError::error(err.to_string()).for_path(path));
            }
        }
    }
}

/// Turns `cleartool update` output into warnings, dropping the progress
/// lines it prints on success.
#[must_use]
pub fn classify_update_output(output: &str) -> Vec<VcsError> {
    output
        .lines()
        .map(str::trim_end)
        .filter(|line| !line.trim().is_empty())
        .filter(|line| {
            !BENIGN_UPDATE_PREFIXES
                .iter()
                .any(|prefix| line.starts_with(prefix))
        })
        .map(VcsError::warning)
        .collect()
}

fn is_folder_rename(change: &Change) -> bool {
    change.is_rename() && change.is_folder()
}

fn is_unknown_element(err: &OperationError) -> bool {
    err.to_string().to_lowercase().contains(ELEMENT_NOT_FOUND)
}

fn delete_from_disk(path: &Path) -> io::Result<()> {
    let result = if path.is_dir() {
        fs::remove_dir_all(path)
    } else {
        fs::remove_file(path)
    };

    match result {
        Err(err) if err.kind() == io::ErrorKind::NotFound => Ok(()),
        other => other,
    }
}
