use std::collections::{BTreeMap, BTreeSet};
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};

use ccase_cleartool::{StatusOptions, StatusReport, ToolError};
use ccase_core::ElementStatus;

use crate::Result;
use crate::traits::{
    ActivityManager, CollectedFiles, ElementProvider, ProgressReporter, ProjectHost, StatusQuery,
    WritableCollector,
};

fn tool_failure(command: &str, output: &str) -> ToolError {
    ToolError::CommandFailed {
        command: command.to_string(),
        output: output.to_string(),
    }
}

fn under_any(path: &Path, roots: &[PathBuf]) -> bool {
    roots.iter().any(|root| path.starts_with(root))
}

/// Answers status queries from a canned view report.
///
/// Non-recursive queries see exactly the requested paths, recursive ones
/// everything below them.
pub struct MockStatusQuery {
    view: StatusReport,
    activities: BTreeMap<PathBuf, String>,
    failure: Option<String>,
    queries: Mutex<Vec<(Vec<PathBuf>, StatusOptions)>>,
    described: Mutex<Vec<Vec<PathBuf>>>,
}

impl MockStatusQuery {
    #[must_use]
    pub fn new() -> Self {
        Self {
            view: StatusReport::new(),
            activities: BTreeMap::new(),
            failure: None,
            queries: Mutex::new(Vec::new()),
            described: Mutex::new(Vec::new()),
        }
    }

    #[must_use]
    pub fn with_unversioned(mut self, path: impl Into<PathBuf>) -> Self {
        self.view.unversioned.insert(path.into());
        self
    }

    #[must_use]
    pub fn with_checked_out(mut self, path: impl Into<PathBuf>) -> Self {
        self.view.checked_out.insert(path.into());
        self
    }

    #[must_use]
    pub fn with_hijacked(mut self, path: impl Into<PathBuf>) -> Self {
        self.view.hijacked.insert(path.into());
        self
    }

    #[must_use]
    pub fn with_locally_deleted(mut self, path: impl Into<PathBuf>) -> Self {
        self.view.locally_deleted.insert(path.into());
        self
    }

    #[must_use]
    pub fn with_activity(mut self, path: impl Into<PathBuf>, activity: &str) -> Self {
        self.activities.insert(path.into(), activity.to_string());
        self
    }

    /// Every call fails with `output` as the tool's message.
    #[must_use]
    pub fn failing_with(mut self, output: &str) -> Self {
        self.failure = Some(output.to_string());
        self
    }

    /// # Panics
    ///
    /// Panics if the internal mutex is poisoned.
    #[must_use]
    pub fn queries(&self) -> Vec<(Vec<PathBuf>, StatusOptions)> {
        self.queries.lock().expect("lock poisoned").clone()
    }

    /// # Panics
    ///
    /// Panics if the internal mutex is poisoned.
    #[must_use]
    pub fn described(&self) -> Vec<Vec<PathBuf>> {
        self.described.lock().expect("lock poisoned").clone()
    }

    fn select(set: &BTreeSet<PathBuf>, paths: &[PathBuf], recursive: bool) -> BTreeSet<PathBuf> {
        set.iter()
            .filter(|p| {
                if recursive {
                    under_any(p, paths)
                } else {
                    paths.contains(p)
                }
            })
            .cloned()
            .collect()
    }
}

impl Default for MockStatusQuery {
    fn default() -> Self {
        Self::new()
    }
}

impl StatusQuery for MockStatusQuery {
    fn query(&self, paths: &[PathBuf], options: StatusOptions) -> Result<StatusReport> {
        self.queries
            .lock()
            .expect("lock poisoned")
            .push((paths.to_vec(), options));

        if let Some(output) = &self.failure {
            return Err(tool_failure("ls", output).into());
        }

        let recursive = options.recursive;
        Ok(StatusReport {
            unversioned: Self::select(&self.view.unversioned, paths, recursive),
            checked_out: Self::select(&self.view.checked_out, paths, recursive),
            hijacked: Self::select(&self.view.hijacked, paths, recursive),
            locally_deleted: Self::select(&self.view.locally_deleted, paths, recursive),
            checked_in: Self::select(&self.view.checked_in, paths, recursive),
        })
    }

    fn describe_activities(&self, paths: &[PathBuf]) -> Result<BTreeMap<PathBuf, String>> {
        self.described
            .lock()
            .expect("lock poisoned")
            .push(paths.to_vec());

        if let Some(output) = &self.failure {
            return Err(tool_failure("describe", output).into());
        }

        Ok(self
            .activities
            .iter()
            .filter(|(path, _)| paths.contains(path))
            .map(|(path, activity)| (path.clone(), activity.clone()))
            .collect())
    }
}

impl StatusQuery for Arc<MockStatusQuery> {
    fn query(&self, paths: &[PathBuf], options: StatusOptions) -> Result<StatusReport> {
        (**self).query(paths, options)
    }

    fn describe_activities(&self, paths: &[PathBuf]) -> Result<BTreeMap<PathBuf, String>> {
        (**self).describe_activities(paths)
    }
}

/// Element statuses and actions with every call recorded.
pub struct MockElementProvider {
    statuses: Mutex<BTreeMap<PathBuf, ElementStatus>>,
    default_status: ElementStatus,
    status_failure: Option<String>,
    undo_failures: BTreeMap<PathBuf, String>,
    update_outputs: BTreeMap<PathBuf, String>,
    update_failures: BTreeSet<PathBuf>,
    checkouts: BTreeMap<PathBuf, Vec<PathBuf>>,
    status_calls: Mutex<Vec<PathBuf>>,
    undo_calls: Mutex<Vec<PathBuf>>,
    update_calls: Mutex<Vec<PathBuf>>,
    listed_dirs: Mutex<Vec<PathBuf>>,
}

impl MockElementProvider {
    #[must_use]
    pub fn new() -> Self {
        Self {
            statuses: Mutex::new(BTreeMap::new()),
            default_status: ElementStatus::NotAnElement,
            status_failure: None,
            undo_failures: BTreeMap::new(),
            update_outputs: BTreeMap::new(),
            update_failures: BTreeSet::new(),
            checkouts: BTreeMap::new(),
            status_calls: Mutex::new(Vec::new()),
            undo_calls: Mutex::new(Vec::new()),
            update_calls: Mutex::new(Vec::new()),
            listed_dirs: Mutex::new(Vec::new()),
        }
    }

    /// # Panics
    ///
    /// Panics if the internal mutex is poisoned.
    #[must_use]
    pub fn with_status(self, path: impl Into<PathBuf>, status: ElementStatus) -> Self {
        self.statuses
            .lock()
            .expect("lock poisoned")
            .insert(path.into(), status);
        self
    }

    /// Status of every path without an explicit one.
    #[must_use]
    pub fn with_default_status(mut self, status: ElementStatus) -> Self {
        self.default_status = status;
        self
    }

    #[must_use]
    pub fn failing_status(mut self, output: &str) -> Self {
        self.status_failure = Some(output.to_string());
        self
    }

    #[must_use]
    pub fn with_undo_failure(mut self, path: impl Into<PathBuf>, output: &str) -> Self {
        self.undo_failures.insert(path.into(), output.to_string());
        self
    }

    #[must_use]
    pub fn with_update_output(mut self, path: impl Into<PathBuf>, output: &str) -> Self {
        self.update_outputs.insert(path.into(), output.to_string());
        self
    }

    #[must_use]
    pub fn with_update_failure(mut self, path: impl Into<PathBuf>) -> Self {
        self.update_failures.insert(path.into());
        self
    }

    #[must_use]
    pub fn with_checkouts_under(mut self, dir: impl Into<PathBuf>, files: Vec<PathBuf>) -> Self {
        self.checkouts.insert(dir.into(), files);
        self
    }

    /// # Panics
    ///
    /// Panics if the internal mutex is poisoned.
    #[must_use]
    pub fn status_calls(&self) -> Vec<PathBuf> {
        self.status_calls.lock().expect("lock poisoned").clone()
    }

    /// # Panics
    ///
    /// Panics if the internal mutex is poisoned.
    #[must_use]
    pub fn undo_calls(&self) -> Vec<PathBuf> {
        self.undo_calls.lock().expect("lock poisoned").clone()
    }

    /// # Panics
    ///
    /// Panics if the internal mutex is poisoned.
    #[must_use]
    pub fn update_calls(&self) -> Vec<PathBuf> {
        self.update_calls.lock().expect("lock poisoned").clone()
    }

    /// # Panics
    ///
    /// Panics if the internal mutex is poisoned.
    #[must_use]
    pub fn listed_dirs(&self) -> Vec<PathBuf> {
        self.listed_dirs.lock().expect("lock poisoned").clone()
    }

    /// Total number of actions and queries issued.
    #[must_use]
    pub fn total_calls(&self) -> usize {
        self.status_calls().len()
            + self.undo_calls().len()
            + self.update_calls().len()
            + self.listed_dirs().len()
    }
}

impl Default for MockElementProvider {
    fn default() -> Self {
        Self::new()
    }
}

impl ElementProvider for MockElementProvider {
    fn status(&self, path: &Path) -> Result<ElementStatus> {
        self.status_calls
            .lock()
            .expect("lock poisoned")
            .push(path.to_path_buf());

        if let Some(output) = &self.status_failure {
            return Err(tool_failure("ls", output).into());
        }

        Ok(self
            .statuses
            .lock()
            .expect("lock poisoned")
            .get(path)
            .copied()
            .unwrap_or(self.default_status))
    }

    fn undo_checkout(&self, path: &Path) -> Result<()> {
        self.undo_calls
            .lock()
            .expect("lock poisoned")
            .push(path.to_path_buf());

        if let Some(output) = self.undo_failures.get(path) {
            return Err(tool_failure("unco", output).into());
        }

        let mut statuses = self.statuses.lock().expect("lock poisoned");
        if let Some(status) = statuses.get_mut(path) {
            if status.is_modified() {
                *status = ElementStatus::CheckedIn;
            }
        }
        Ok(())
    }

    fn update(&self, path: &Path) -> Result<String> {
        self.update_calls
            .lock()
            .expect("lock poisoned")
            .push(path.to_path_buf());

        if self.update_failures.contains(path) {
            return Err(ToolError::Launch {
                program: PathBuf::from("cleartool"),
                source: std::io::Error::new(std::io::ErrorKind::NotFound, "cleartool not found"),
            }
            .into());
        }

        Ok(self.update_outputs.get(path).cloned().unwrap_or_default())
    }

    fn list_checkouts_under(&self, dir: &Path) -> Result<Vec<PathBuf>> {
        self.listed_dirs
            .lock()
            .expect("lock poisoned")
            .push(dir.to_path_buf());
        Ok(self.checkouts.get(dir).cloned().unwrap_or_default())
    }
}

impl ElementProvider for Arc<MockElementProvider> {
    fn status(&self, path: &Path) -> Result<ElementStatus> {
        (**self).status(path)
    }

    fn undo_checkout(&self, path: &Path) -> Result<()> {
        (**self).undo_checkout(path)
    }

    fn update(&self, path: &Path) -> Result<String> {
        (**self).update(path)
    }

    fn list_checkouts_under(&self, dir: &Path) -> Result<Vec<PathBuf>> {
        (**self).list_checkouts_under(dir)
    }
}

pub struct MockCollector {
    results: BTreeMap<PathBuf, CollectedFiles>,
    unreadable: bool,
    collected: Mutex<Vec<PathBuf>>,
}

impl MockCollector {
    #[must_use]
    pub fn new() -> Self {
        Self {
            results: BTreeMap::new(),
            unreadable: false,
            collected: Mutex::new(Vec::new()),
        }
    }

    /// Every walk fails with a permission error.
    #[must_use]
    pub fn unreadable(mut self) -> Self {
        self.unreadable = true;
        self
    }

    #[must_use]
    pub fn with_result(mut self, dir: impl Into<PathBuf>, files: CollectedFiles) -> Self {
        self.results.insert(dir.into(), files);
        self
    }

    /// # Panics
    ///
    /// Panics if the internal mutex is poisoned.
    #[must_use]
    pub fn collected(&self) -> Vec<PathBuf> {
        self.collected.lock().expect("lock poisoned").clone()
    }
}

impl Default for MockCollector {
    fn default() -> Self {
        Self::new()
    }
}

impl WritableCollector for MockCollector {
    fn collect(&self, dir: &Path) -> Result<CollectedFiles> {
        self.collected
            .lock()
            .expect("lock poisoned")
            .push(dir.to_path_buf());

        if self.unreadable {
            return Err(std::io::Error::new(
                std::io::ErrorKind::PermissionDenied,
                "permission denied",
            )
            .into());
        }

        Ok(self.results.get(dir).cloned().unwrap_or_default())
    }
}

impl WritableCollector for Arc<MockCollector> {
    fn collect(&self, dir: &Path) -> Result<CollectedFiles> {
        (**self).collect(dir)
    }
}

pub struct MockProjectHost {
    disposed: bool,
    content_roots: Vec<PathBuf>,
    ignored: BTreeSet<PathBuf>,
    changes: BTreeSet<PathBuf>,
    added: Vec<PathBuf>,
    dirty: Mutex<Vec<PathBuf>>,
    refreshed: Mutex<Vec<PathBuf>>,
    reminders: Mutex<Vec<String>>,
}

impl MockProjectHost {
    #[must_use]
    pub fn new(content_root: impl Into<PathBuf>) -> Self {
        Self {
            disposed: false,
            content_roots: vec![content_root.into()],
            ignored: BTreeSet::new(),
            changes: BTreeSet::new(),
            added: Vec::new(),
            dirty: Mutex::new(Vec::new()),
            refreshed: Mutex::new(Vec::new()),
            reminders: Mutex::new(Vec::new()),
        }
    }

    #[must_use]
    pub fn without_content_roots(mut self) -> Self {
        self.content_roots.clear();
        self
    }

    #[must_use]
    pub fn disposed(mut self) -> Self {
        self.disposed = true;
        self
    }

    #[must_use]
    pub fn with_ignored(mut self, path: impl Into<PathBuf>) -> Self {
        self.ignored.insert(path.into());
        self
    }

    #[must_use]
    pub fn with_change(mut self, path: impl Into<PathBuf>) -> Self {
        self.changes.insert(path.into());
        self
    }

    #[must_use]
    pub fn with_added_file(mut self, path: impl Into<PathBuf>) -> Self {
        self.added.push(path.into());
        self
    }

    /// # Panics
    ///
    /// Panics if the internal mutex is poisoned.
    #[must_use]
    pub fn dirty(&self) -> Vec<PathBuf> {
        self.dirty.lock().expect("lock poisoned").clone()
    }

    /// # Panics
    ///
    /// Panics if the internal mutex is poisoned.
    #[must_use]
    pub fn refreshed(&self) -> Vec<PathBuf> {
        self.refreshed.lock().expect("lock poisoned").clone()
    }

    /// # Panics
    ///
    /// Panics if the internal mutex is poisoned.
    #[must_use]
    pub fn reminders(&self) -> Vec<String> {
        self.reminders.lock().expect("lock poisoned").clone()
    }
}

impl ProjectHost for MockProjectHost {
    fn is_disposed(&self) -> bool {
        self.disposed
    }

    fn content_roots(&self) -> Vec<PathBuf> {
        self.content_roots.clone()
    }

    fn is_ignored(&self, path: &Path) -> bool {
        self.ignored.contains(path)
    }

    fn has_change(&self, path: &Path) -> bool {
        self.changes.contains(path)
    }

    fn added_files(&self) -> Vec<PathBuf> {
        self.added.clone()
    }

    fn mark_dirty(&self, path: &Path) {
        self.dirty
            .lock()
            .expect("lock poisoned")
            .push(path.to_path_buf());
    }

    fn refresh(&self, path: &Path) {
        self.refreshed
            .lock()
            .expect("lock poisoned")
            .push(path.to_path_buf());
    }

    fn show_reminder(&self, message: &str) {
        self.reminders
            .lock()
            .expect("lock poisoned")
            .push(message.to_string());
    }
}

impl ProjectHost for Arc<MockProjectHost> {
    fn is_disposed(&self) -> bool {
        (**self).is_disposed()
    }

    fn content_roots(&self) -> Vec<PathBuf> {
        (**self).content_roots()
    }

    fn is_ignored(&self, path: &Path) -> bool {
        (**self).is_ignored(path)
    }

    fn has_change(&self, path: &Path) -> bool {
        (**self).has_change(path)
    }

    fn added_files(&self) -> Vec<PathBuf> {
        (**self).added_files()
    }

    fn mark_dirty(&self, path: &Path) {
        (**self).mark_dirty(path);
    }

    fn refresh(&self, path: &Path) {
        (**self).refresh(path);
    }

    fn show_reminder(&self, message: &str) {
        (**self).show_reminder(message);
    }
}

/// UCM bookkeeping with activities that only become known after a refresh
/// when registered through [`with_late_activity`](Self::with_late_activity).
pub struct MockActivityManager {
    ucm: bool,
    checkout_activities: Mutex<BTreeMap<PathBuf, String>>,
    names: Mutex<BTreeMap<String, String>>,
    late_names: BTreeMap<String, String>,
    view_activity: Option<String>,
    refreshes: Mutex<usize>,
    syncs: Mutex<usize>,
    assignments: Mutex<Vec<(PathBuf, String)>>,
}

impl MockActivityManager {
    #[must_use]
    pub fn new() -> Self {
        Self {
            ucm: false,
            checkout_activities: Mutex::new(BTreeMap::new()),
            names: Mutex::new(BTreeMap::new()),
            late_names: BTreeMap::new(),
            view_activity: None,
            refreshes: Mutex::new(0),
            syncs: Mutex::new(0),
            assignments: Mutex::new(Vec::new()),
        }
    }

    #[must_use]
    pub fn ucm(mut self) -> Self {
        self.ucm = true;
        self
    }

    /// # Panics
    ///
    /// Panics if the internal mutex is poisoned.
    #[must_use]
    pub fn with_checkout_activity(self, path: impl Into<PathBuf>, name: &str) -> Self {
        self.checkout_activities
            .lock()
            .expect("lock poisoned")
            .insert(path.into(), name.to_string());
        self
    }

    /// # Panics
    ///
    /// Panics if the internal mutex is poisoned.
    #[must_use]
    pub fn with_activity(self, id: &str, name: &str) -> Self {
        self.names
            .lock()
            .expect("lock poisoned")
            .insert(id.to_string(), name.to_string());
        self
    }

    #[must_use]
    pub fn with_late_activity(mut self, id: &str, name: &str) -> Self {
        self.late_names.insert(id.to_string(), name.to_string());
        self
    }

    #[must_use]
    pub fn with_view_activity(mut self, name: &str) -> Self {
        self.view_activity = Some(name.to_string());
        self
    }

    /// # Panics
    ///
    /// Panics if the internal mutex is poisoned.
    #[must_use]
    pub fn refreshes(&self) -> usize {
        *self.refreshes.lock().expect("lock poisoned")
    }

    /// # Panics
    ///
    /// Panics if the internal mutex is poisoned.
    #[must_use]
    pub fn syncs(&self) -> usize {
        *self.syncs.lock().expect("lock poisoned")
    }

    /// # Panics
    ///
    /// Panics if the internal mutex is poisoned.
    #[must_use]
    pub fn assignments(&self) -> Vec<(PathBuf, String)> {
        self.assignments.lock().expect("lock poisoned").clone()
    }
}

impl Default for MockActivityManager {
    fn default() -> Self {
        Self::new()
    }
}

impl ActivityManager for MockActivityManager {
    fn is_ucm_view_for(&self, _path: &Path) -> bool {
        self.ucm
    }

    fn checkout_activity(&self, path: &Path) -> Option<String> {
        self.checkout_activities
            .lock()
            .expect("lock poisoned")
            .get(path)
            .cloned()
    }

    fn activity_display_name(&self, activity_id: &str) -> Option<String> {
        self.names
            .lock()
            .expect("lock poisoned")
            .get(activity_id)
            .cloned()
    }

    fn view_activity(&self, _path: &Path) -> Result<Option<String>> {
        Ok(self.view_activity.clone())
    }

    fn refresh_activities(&self) -> Result<()> {
        *self.refreshes.lock().expect("lock poisoned") += 1;
        self.names
            .lock()
            .expect("lock poisoned")
            .extend(self.late_names.clone());
        Ok(())
    }

    fn sync_activities_to_changelists(&self) -> Result<()> {
        *self.syncs.lock().expect("lock poisoned") += 1;
        Ok(())
    }

    fn add_file_to_changelist(&self, path: &Path, changelist: &str) {
        self.checkout_activities
            .lock()
            .expect("lock poisoned")
            .insert(path.to_path_buf(), changelist.to_string());
        self.assignments
            .lock()
            .expect("lock poisoned")
            .push((path.to_path_buf(), changelist.to_string()));
    }
}

impl ActivityManager for Arc<MockActivityManager> {
    fn is_ucm_view_for(&self, path: &Path) -> bool {
        (**self).is_ucm_view_for(path)
    }

    fn checkout_activity(&self, path: &Path) -> Option<String> {
        (**self).checkout_activity(path)
    }

    fn activity_display_name(&self, activity_id: &str) -> Option<String> {
        (**self).activity_display_name(activity_id)
    }

    fn view_activity(&self, path: &Path) -> Result<Option<String>> {
        (**self).view_activity(path)
    }

    fn refresh_activities(&self) -> Result<()> {
        (**self).refresh_activities()
    }

    fn sync_activities_to_changelists(&self) -> Result<()> {
        (**self).sync_activities_to_changelists()
    }

    fn add_file_to_changelist(&self, path: &Path, changelist: &str) {
        (**self).add_file_to_changelist(path, changelist);
    }
}

#[derive(Default)]
pub struct MockProgress {
    texts: Mutex<Vec<String>>,
    accepted: Mutex<Vec<PathBuf>>,
}

impl MockProgress {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// # Panics
    ///
    /// Panics if the internal mutex is poisoned.
    #[must_use]
    pub fn texts(&self) -> Vec<String> {
        self.texts.lock().expect("lock poisoned").clone()
    }

    /// # Panics
    ///
    /// Panics if the internal mutex is poisoned.
    #[must_use]
    pub fn accepted(&self) -> Vec<PathBuf> {
        self.accepted.lock().expect("lock poisoned").clone()
    }
}

impl ProgressReporter for MockProgress {
    fn set_text(&self, text: &str) {
        self.texts
            .lock()
            .expect("lock poisoned")
            .push(text.to_string());
    }

    fn accept(&self, path: &Path) {
        self.accepted
            .lock()
            .expect("lock poisoned")
            .push(path.to_path_buf());
    }
}
