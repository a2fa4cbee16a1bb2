//! Reconciles the dirty scope against the view and reports what changed.
//!
//! A pass collects writable candidates, asks the view for their status
//! (one query per batch of files, or one scan of the whole view when too
//! many files are writable), folds in the rename and removal bookkeeping
//! kept in [`TrackingState`] and finally hands change records to the
//! builder. Nothing reaches the builder unless the whole pass succeeds.

mod sets;

use std::collections::{BTreeMap, BTreeSet};
use std::path::{Path, PathBuf};

use ccase_cleartool::{StatusOptions, StatusReport, ToolError};
use ccase_core::{
    Change, DirtyScope, ElementStatus, FileStatus, Revision, TrackingState, is_writable,
    same_path_ignore_case,
};
use ccase_project::SharedConfig;
use tracing::{Level, debug, warn};

use crate::Result;
use crate::error::OperationError;
use crate::traits::{
    ActivityManager, ChangelistBuilder, ElementProvider, ProgressReporter, ProjectHost,
    StatusQuery, WritableCollector,
};

pub use sets::{Category, Classification};

const COLLECT_TEXT: &str = "Collecting writable files";
const SEARCH_NEW_TEXT: &str = "Searching New";

pub const OFFLINE_REMINDER: &str =
    "Project started with ClearCase configured to be in the Offline mode.";

const CONNECT_FAILURE: &str = "Failed to connect to ClearCase Server: ";
const OFFLINE_SWITCH_NOTE: &str = "\n\nSwitching to the offline mode";
const START_FAILURE: &str =
    "Failed to start Cleartool. Please check ClearCase installation or current View's settings";
const VIEW_START_FAILURE: &str = "Failed to start Cleartool. Please check module's View settings";

/// Settings fixed for the duration of one pass.
#[derive(Debug, Clone, Copy)]
#[allow(clippy::struct_excessive_bools)]
struct PassMode {
    offline: bool,
    batch: bool,
    ucm: bool,
    sync_activities: bool,
    status_limit: usize,
}

/// Builder call deferred until the pass is known to have succeeded.
enum Record {
    LocallyDeleted { path: PathBuf, is_dir: bool },
    Unversioned(PathBuf),
    Ignored(PathBuf),
    Change {
        change: Change,
        changelist: Option<String>,
    },
}

impl Record {
    fn emit<B: ChangelistBuilder + ?Sized>(self, builder: &mut B) {
        match self {
            Self::LocallyDeleted { path, is_dir } => builder.process_locally_deleted(&path, is_dir),
            Self::Unversioned(path) => builder.process_unversioned(&path),
            Self::Ignored(path) => builder.process_ignored(&path),
            Self::Change { change, changelist } => {
                builder.process_change(change, changelist.as_deref());
            }
        }
    }
}

pub struct ChangeProvider<Q, E, C, H, A> {
    status_query: Q,
    elements: E,
    collector: C,
    host: H,
    activities: A,
    config: SharedConfig,
    first_pass: bool,
    sets: Classification,
    writable: BTreeSet<PathBuf>,
    dirs: BTreeSet<PathBuf>,
}

impl<Q, E, C, H, A> ChangeProvider<Q, E, C, H, A>
where
    Q: StatusQuery,
    E: ElementProvider,
    C: WritableCollector,
    H: ProjectHost,
    A: ActivityManager,
{
    pub fn new(
        status_query: Q,
        elements: E,
        collector: C,
        host: H,
        activities: A,
        config: SharedConfig,
    ) -> Self {
        Self {
            status_query,
            elements,
            collector,
            host,
            activities,
            config,
            first_pass: true,
            sets: Classification::new(),
            writable: BTreeSet::new(),
            dirs: BTreeSet::new(),
        }
    }

    /// Sets produced by the most recent pass.
    #[must_use]
    pub fn classification(&self) -> &Classification {
        &self.sets
    }

    #[must_use]
    pub fn host(&self) -> &H {
        &self.host
    }

    /// Classifies everything in `scope` and reports it to `builder`.
    ///
    /// # Errors
    ///
    /// Returns [`OperationError::Reconciliation`] if ClearCase could not be
    /// reached or a cleartool command failed,
    /// [`OperationError::InvariantViolation`] for a UCM view without a
    /// current activity and [`OperationError::Unexpected`] for anything
    /// else. The builder receives nothing in those cases.
    pub fn get_changes<B: ChangelistBuilder + ?Sized>(
        &mut self,
        scope: &DirtyScope,
        state: &mut TrackingState,
        builder: &mut B,
        progress: &dyn ProgressReporter,
    ) -> Result<()> {
        self.dirs.clear();

        if self.host.is_disposed() {
            return Ok(());
        }

        log_scope(scope);

        let content_roots = self.host.content_roots();
        if content_roots.is_empty() {
            return Ok(());
        }

        let mode = self.config.read(|config| PassMode {
            offline: config.is_offline(),
            batch: is_batch_update(scope, &content_roots),
            ucm: config.use_ucm_model(),
            sync_activities: config.sync_activities_on_refresh(),
            status_limit: config.iterative_status_limit(),
        });

        if mode.batch && self.first_pass && mode.offline {
            self.host.show_reminder(OFFLINE_REMINDER);
        }
        self.first_pass = false;

        self.sets.clear();
        self.writable.clear();

        let outcome = self.classify(scope, &content_roots, state, mode, progress);

        debug!(
            new = self.sets.count(Category::New),
            modified = self.sets.count(Category::Changed),
            hijacked = self.sets.count(Category::Hijacked),
            ignored = self.sets.count(Category::Ignored),
            "classification finished"
        );

        match outcome {
            Ok(records) => {
                for record in records {
                    record.emit(builder);
                }
                Ok(())
            }
            Err(err) => Err(self.translate_failure(err)),
        }
    }

    fn classify(
        &mut self,
        scope: &DirtyScope,
        content_roots: &[PathBuf],
        state: &mut TrackingState,
        mode: PassMode,
        progress: &dyn ProgressReporter,
    ) -> Result<Vec<Record>> {
        self.collect_candidates(scope, state, progress)?;

        if mode.offline {
            self.restore_cached_statuses(state);
        } else {
            if mode.ucm && mode.batch && mode.sync_activities {
                self.activities.refresh_activities()?;
                self.activities.sync_activities_to_changelists()?;
            }
            self.compute_statuses(scope, content_roots, state, mode)?;
        }

        self.process_status_exceptions(state);

        if !mode.offline {
            self.classify_directories(state)?;
            self.reconcile_checked_out_folders(state)?;
        }

        if mode.ucm {
            self.tag_activities(state)?;
        }

        let records = self.build_records(state, mode.ucm)?;

        if !mode.offline && mode.batch {
            state.replace_modified_files(self.sets.snapshot(Category::Changed));
        }

        Ok(records)
    }

    fn collect_candidates(
        &mut self,
        scope: &DirtyScope,
        state: &TrackingState,
        progress: &dyn ProgressReporter,
    ) -> Result<()> {
        for dir in scope.recursively_dirty_dirs() {
            debug!(root = %dir.display(), "collecting writable files");
            progress.set_text(COLLECT_TEXT);

            let found = self.collector.collect(dir)?;
            for path in found.ignored {
                self.sets.assign(path, Category::Ignored);
            }
            self.writable.extend(found.writable);
            self.dirs.extend(found.dirs);

            debug!(writable = self.writable.len(), "writable files after root");
            progress.set_text(SEARCH_NEW_TEXT);
        }

        for dirty in scope.dirty_files() {
            if !(dirty.is_dir() && dirty.exists()) {
                continue;
            }
            let path = dirty.path();
            if self.host.is_ignored(path) {
                self.sets.assign(path, Category::Ignored);
                continue;
            }

            let reference = state.discover_old_name(path);
            if !self.elements.exists_in_vcs(&reference)? {
                self.sets.assign(path, Category::New);
            } else if reference != path && !state.is_under_renamed_folder(path) {
                self.sets.assign(path, Category::Changed);
            }
        }

        for dirty in scope.dirty_files() {
            if dirty.is_dir() {
                continue;
            }
            let path = dirty.path();
            if self.host.is_ignored(path) {
                self.sets.assign(path, Category::Ignored);
            } else if dirty.exists() && is_writable(path) && dirty.is_proper_notification() {
                self.writable.insert(path.to_path_buf());
            }
        }

        Ok(())
    }

    fn compute_statuses(
        &mut self,
        scope: &DirtyScope,
        content_roots: &[PathBuf],
        state: &mut TrackingState,
        mode: PassMode,
    ) -> Result<()> {
        debug!(
            ignored = self.sets.count(Category::Ignored),
            writable = self.writable.len(),
            "computing statuses"
        );

        if self.writable.len() < mode.status_limit {
            return self.analyze_writable_files(state);
        }

        let roots = if scope.affected_roots().is_empty() {
            content_roots.to_vec()
        } else {
            scope.affected_roots().to_vec()
        };
        debug!(roots = roots.len(), "scanning view for status");
        let report = self.status_query.query(&roots, StatusOptions::view_scan())?;
        self.merge_status_report(report, state);
        Ok(())
    }

    fn analyze_writable_files(&mut self, state: &mut TrackingState) -> Result<()> {
        let mut references = Vec::new();

        for path in &self.writable {
            if state.take_successful_checkout(path) {
                self.sets.assign(path.clone(), Category::Changed);
            } else if state.has_merge_conflict(path) {
                self.sets.assign(path.clone(), Category::MergeConflict);
            } else {
                references.push(state.discover_old_name(path));
            }
        }

        if references.is_empty() {
            return Ok(());
        }

        debug!(files = references.len(), "querying status of writable files");
        let report = self
            .status_query
            .query(&references, StatusOptions::default())?;
        self.merge_status_report(report, state);
        Ok(())
    }

    fn merge_status_report(&mut self, report: StatusReport, state: &TrackingState) {
        for path in report.unversioned {
            self.sets.assign(path, Category::New);
        }

        for path in report.checked_out {
            if state.is_file_rename_origin(&path) || state.is_folder_rename_origin(&path) {
                continue;
            }
            self.sets.assign(path, Category::Changed);
        }

        for path in report.hijacked {
            if state.discover_old_name(&path) == path {
                self.sets.assign(path, Category::Hijacked);
            } else {
                self.sets.assign(path, Category::Changed);
            }
        }

        for path in report.locally_deleted {
            let new_name = state.discover_new_name(&path);
            if state.is_renamed_file(&new_name) {
                self.sets.assign(new_name, Category::Changed);
            } else if path != new_name {
                if is_writable(&new_name) {
                    self.sets.assign(new_name, Category::Changed);
                }
            } else if !state.is_folder_rename_origin(&new_name) {
                self.sets.assign(path, Category::LocallyDeleted);
            }
        }
    }

    fn restore_cached_statuses(&mut self, state: &TrackingState) {
        for path in &self.writable {
            let category = if state.contains_modified(path) {
                Category::Changed
            } else if state.contains_new(path) {
                Category::New
            } else {
                Category::Hijacked
            };
            self.sets.assign(path.clone(), category);
        }
    }

    /// A refactoring may rename a file and then write new content under the
    /// old name. Status says "changed" but the content is new.
    fn process_status_exceptions(&mut self, state: &TrackingState) {
        for path in self.sets.snapshot(Category::Changed) {
            if state.is_new_over_renamed(&path) {
                self.sets.assign(path, Category::New);
            }
        }
    }

    fn classify_directories(&mut self, state: &mut TrackingState) -> Result<()> {
        for dir in &self.dirs {
            if state.is_renamed_folder(dir) {
                continue;
            }

            let status = self.elements.status(dir)?;
            if status == ElementStatus::NotAnElement {
                self.sets.assign(dir.clone(), Category::New);
                state.set_versioned_folder(dir, false);
            } else {
                state.set_versioned_folder(dir, true);
                if status.is_modified() {
                    self.sets.assign(dir.clone(), Category::Changed);
                    state.add_checked_out_folder(dir.clone());
                }
            }
        }
        Ok(())
    }

    fn reconcile_checked_out_folders(&mut self, state: &mut TrackingState) -> Result<()> {
        let folders: Vec<PathBuf> = state.checked_out_folders().iter().cloned().collect();

        for folder in folders {
            if state.is_renamed_folder(&folder) || state.is_folder_rename_origin(&folder) {
                continue;
            }

            let still_modified = if folder.exists() {
                self.elements.status(&folder)?.is_modified()
            } else {
                false
            };

            if still_modified {
                self.sets.assign(folder, Category::Changed);
            } else {
                if let Err(err) = self.elements.undo_checkout(&folder) {
                    warn!(folder = %folder.display(), error = %err, "failed to undo folder checkout");
                }
                state.remove_checked_out_folder(&folder);
            }
        }
        Ok(())
    }

    /// Moves changed files into the change list named after the activity
    /// they were checked out under.
    fn tag_activities(&self, state: &TrackingState) -> Result<()> {
        let files: Vec<PathBuf> = self
            .sets
            .paths(Category::Changed)
            .filter(|path| self.activities.checkout_activity(path).is_none())
            .map(Path::to_path_buf)
            .collect();
        if files.is_empty() {
            return Ok(());
        }

        let references: Vec<PathBuf> = files
            .iter()
            .map(|file| state.discover_old_name(file))
            .collect();
        let described = self.status_query.describe_activities(&references)?;

        let mut refreshed = false;
        for (file, reference) in files.iter().zip(&references) {
            let Some(activity) = described.get(reference) else {
                continue;
            };

            let mut name = self.activities.activity_display_name(activity);
            if name.is_none() {
                // Created outside this tool; reload once per pass.
                if !refreshed {
                    refreshed = true;
                    self.activities.refresh_activities()?;
                }
                name = self.activities.activity_display_name(activity);
            }

            if let Some(name) = name {
                self.activities.add_file_to_changelist(file, &name);
            }
        }
        Ok(())
    }

    fn find_activity(
        &self,
        reference: &Path,
        current: &Path,
        ucm: bool,
    ) -> Result<Option<String>> {
        if !ucm || !self.activities.is_ucm_view_for(reference) {
            return Ok(None);
        }

        if let Some(activity) = self.activities.checkout_activity(reference) {
            return Ok(Some(activity));
        }

        if self.host.has_change(current) {
            return Ok(None);
        }

        let activity = self.activities.view_activity(current)?.ok_or_else(|| {
            OperationError::InvariantViolation(format!(
                "UCM view holding '{}' has no current activity",
                current.display()
            ))
        })?;
        self.activities.add_file_to_changelist(reference, &activity);
        Ok(Some(activity))
    }

    fn modification(
        &self,
        path: &Path,
        status: FileStatus,
        state: &TrackingState,
        ucm: bool,
    ) -> Result<Record> {
        let reference = state.discover_old_name(path);
        let mut before = Revision::repository(&reference);
        let mut after = Revision::working_copy(path);
        if path.is_dir() {
            before = before.directory();
            after = after.directory();
        }

        Ok(Record::Change {
            change: Change::modified(before, after, status),
            changelist: self.find_activity(&reference, path, ucm)?,
        })
    }

    fn build_records(&self, state: &TrackingState, ucm: bool) -> Result<Vec<Record>> {
        let mut records = Vec::new();

        for path in self.sets.paths(Category::LocallyDeleted) {
            records.push(Record::LocallyDeleted {
                path: path.to_path_buf(),
                is_dir: false,
            });
        }

        for path in self.sets.paths(Category::New) {
            // Known to the VOB under another name; the rename reports it.
            if state.discover_old_name(path) != path {
                continue;
            }

            if state.contains_new(path) {
                let mut after = Revision::working_copy(path);
                if path.is_dir() {
                    after = after.directory();
                }
                records.push(Record::Change {
                    change: Change::added(after),
                    changelist: self.find_activity(path, path, ucm)?,
                });
            } else {
                records.push(Record::Unversioned(path.to_path_buf()));
            }
        }

        for path in self.sets.paths(Category::Changed) {
            if state.is_renamed_folder(path) {
                continue;
            }
            records.push(self.modification(path, FileStatus::Modified, state, ucm)?);
        }

        for path in self.sets.paths(Category::Hijacked) {
            records.push(self.modification(path, FileStatus::Hijacked, state, ucm)?);
        }

        for (current, original) in state.renamed_folders() {
            records.push(Record::Change {
                change: Change::modified(
                    Revision::repository(original).directory(),
                    Revision::working_copy(current).directory(),
                    FileStatus::Modified,
                ),
                changelist: self.find_activity(original, current, ucm)?,
            });
        }

        for path in state.removed_folders() {
            records.push(Record::LocallyDeleted {
                path: path.clone(),
                is_dir: true,
            });
        }
        for path in state.removed_files() {
            records.push(Record::LocallyDeleted {
                path: path.clone(),
                is_dir: false,
            });
        }

        for path in state.deleted_folders() {
            records.push(Record::Change {
                change: Change::deleted(Revision::working_copy(path).directory()),
                changelist: self.find_activity(path, path, ucm)?,
            });
        }
        for path in state.deleted_files() {
            records.push(Record::Change {
                change: Change::deleted(Revision::repository(path)),
                changelist: self.find_activity(path, path, ucm)?,
            });
        }

        for path in self.sets.paths(Category::Ignored) {
            records.push(Record::Ignored(path.to_path_buf()));
        }

        for path in self.sets.paths(Category::MergeConflict) {
            records.push(Record::Change {
                change: Change::modified(
                    Revision::repository(path),
                    Revision::working_copy(path),
                    FileStatus::MergedWithConflicts,
                ),
                changelist: self.find_activity(path, path, ucm)?,
            });
        }

        Ok(records)
    }

    fn translate_failure(&self, err: OperationError) -> OperationError {
        match err {
            OperationError::Tool(tool @ ToolError::Launch { .. }) => {
                warn!(error = %tool, "cleartool could not be started");
                OperationError::Unexpected {
                    message: format!("{START_FAILURE}: {tool}"),
                }
            }
            OperationError::Tool(tool) => {
                let text = tool.message();
                let mut message = format!("{CONNECT_FAILURE}{text}");
                let mut switched_offline = false;

                if tool.is_server_down() {
                    message.push_str(OFFLINE_SWITCH_NOTE);
                    self.config.set_offline(true);
                    switched_offline = true;
                } else if tool.is_view_unreachable() {
                    message = format!("{VIEW_START_FAILURE}{text}");
                }

                warn!(error = %tool, switched_offline, "status reconciliation failed");
                OperationError::Reconciliation {
                    message,
                    switched_offline,
                }
            }
            err @ (OperationError::InvariantViolation(_)
            | OperationError::Reconciliation { .. }) => {
                warn!(error = %err, "status reconciliation failed");
                err
            }
            other => {
                warn!(error = %other, "status reconciliation failed");
                OperationError::Unexpected {
                    message: format!("{START_FAILURE}: {other}"),
                }
            }
        }
    }
}

/// Batch passes cover whole content roots and nothing else.
fn is_batch_update(scope: &DirtyScope, content_roots: &[PathBuf]) -> bool {
    let dirs = scope.recursively_dirty_dirs();
    !dirs.is_empty()
        && dirs.iter().all(|dir| {
            content_roots
                .iter()
                .any(|root| same_path_ignore_case(dir, root))
        })
}

fn log_scope(scope: &DirtyScope) {
    if !tracing::enabled!(Level::DEBUG) {
        return;
    }

    let mut by_extension: BTreeMap<String, usize> = BTreeMap::new();
    for dirty in scope.dirty_files() {
        let extension = dirty
            .path()
            .extension()
            .map_or_else(|| String::from("<none>"), |e| e.to_string_lossy().into_owned());
        *by_extension.entry(extension).or_default() += 1;
    }

    debug!(
        dirty_files = scope.dirty_files().len(),
        recursive_dirs = scope.recursively_dirty_dirs().len(),
        extensions = ?by_extension,
        "classifying dirty scope"
    );
}
