use std::collections::{BTreeMap, BTreeSet};
use std::path::{Path, PathBuf};
use std::sync::{Mutex, MutexGuard, PoisonError};

use ccase_cleartool::{Cleartool, StatusOptions, StatusReport};
use ccase_core::ElementStatus;
use tracing::debug;

use crate::Result;
use crate::traits::{ActivityManager, ElementProvider, StatusQuery};

fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(PoisonError::into_inner)
}

/// Batched `ls` and `describe` calls run from the view root.
pub struct CleartoolStatusQuery {
    tool: Cleartool,
    view_root: PathBuf,
}

impl CleartoolStatusQuery {
    #[must_use]
    pub fn new(tool: Cleartool, view_root: &Path) -> Self {
        Self {
            tool,
            view_root: view_root.to_path_buf(),
        }
    }
}

impl StatusQuery for CleartoolStatusQuery {
    fn query(&self, paths: &[PathBuf], options: StatusOptions) -> Result<StatusReport> {
        Ok(self
            .tool
            .list_status(paths, options, Some(&self.view_root))?)
    }

    fn describe_activities(&self, paths: &[PathBuf]) -> Result<BTreeMap<PathBuf, String>> {
        Ok(self
            .tool
            .describe_activities(paths, Some(&self.view_root))?)
    }
}

pub struct CleartoolElementProvider {
    tool: Cleartool,
}

impl CleartoolElementProvider {
    #[must_use]
    pub fn new(tool: Cleartool) -> Self {
        Self { tool }
    }
}

impl Default for CleartoolElementProvider {
    fn default() -> Self {
        Self::new(Cleartool::default())
    }
}

impl ElementProvider for CleartoolElementProvider {
    fn status(&self, path: &Path) -> Result<ElementStatus> {
        Ok(self.tool.element_status(path)?)
    }

    fn undo_checkout(&self, path: &Path) -> Result<()> {
        Ok(self.tool.undo_checkout(path)?)
    }

    fn update(&self, path: &Path) -> Result<String> {
        Ok(self.tool.update(path)?)
    }

    fn list_checkouts_under(&self, dir: &Path) -> Result<Vec<PathBuf>> {
        Ok(self.tool.list_checkouts_under(dir)?)
    }
}

/// Activities of a UCM view, cached between refreshes.
///
/// Change lists are named after activity headlines; the file to change
/// list assignments live for as long as the manager does.
pub struct CleartoolActivityManager {
    tool: Cleartool,
    view_root: PathBuf,
    ucm: bool,
    headlines: Mutex<BTreeMap<String, String>>,
    current: Mutex<Option<Option<String>>>,
    changelists: Mutex<BTreeSet<String>>,
    assignments: Mutex<BTreeMap<PathBuf, String>>,
}

impl CleartoolActivityManager {
    #[must_use]
    pub fn new(tool: Cleartool, view_root: &Path, ucm: bool) -> Self {
        Self {
            tool,
            view_root: view_root.to_path_buf(),
            ucm,
            headlines: Mutex::new(BTreeMap::new()),
            current: Mutex::new(None),
            changelists: Mutex::new(BTreeSet::new()),
            assignments: Mutex::new(BTreeMap::new()),
        }
    }

    /// Change list assigned to each file so far.
    #[must_use]
    pub fn assignments(&self) -> BTreeMap<PathBuf, String> {
        lock(&self.assignments).clone()
    }

    /// Change lists known after the last sync, one per activity headline.
    #[must_use]
    pub fn changelists(&self) -> BTreeSet<String> {
        lock(&self.changelists).clone()
    }
}

impl ActivityManager for CleartoolActivityManager {
    fn is_ucm_view_for(&self, path: &Path) -> bool {
        self.ucm && path.starts_with(&self.view_root)
    }

    fn checkout_activity(&self, path: &Path) -> Option<String> {
        lock(&self.assignments).get(path).cloned()
    }

    fn activity_display_name(&self, activity_id: &str) -> Option<String> {
        lock(&self.headlines).get(activity_id).cloned()
    }

    fn view_activity(&self, _path: &Path) -> Result<Option<String>> {
        let mut current = lock(&self.current);
        if let Some(headline) = current.as_ref() {
            return Ok(headline.clone());
        }

        let headline = self
            .tool
            .current_activity(&self.view_root)?
            .map(|activity| activity.headline);
        *current = Some(headline.clone());
        Ok(headline)
    }

    fn refresh_activities(&self) -> Result<()> {
        let activities = self.tool.list_activities(&self.view_root)?;
        debug!(count = activities.len(), "refreshed activities");

        *lock(&self.current) = None;
        let mut headlines = lock(&self.headlines);
        headlines.clear();
        headlines.extend(
            activities
                .into_iter()
                .map(|activity| (activity.id, activity.headline)),
        );
        Ok(())
    }

    fn sync_activities_to_changelists(&self) -> Result<()> {
        if lock(&self.headlines).is_empty() {
            self.refresh_activities()?;
        }

        let headlines = lock(&self.headlines);
        let mut changelists = lock(&self.changelists);
        changelists.extend(headlines.values().cloned());
        debug!(
            changelists = changelists.len(),
            "activities available as change lists"
        );
        Ok(())
    }

    fn add_file_to_changelist(&self, path: &Path, changelist: &str) {
        lock(&self.assignments).insert(path.to_path_buf(), changelist.to_string());
    }
}
