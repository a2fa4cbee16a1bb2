use std::path::Path;

use crate::Result;

/// UCM view and activity bookkeeping.
pub trait ActivityManager: Send + Sync {
    fn is_ucm_view_for(&self, path: &Path) -> bool;

    /// Activity recorded when `path` was checked out through this tool.
    fn checkout_activity(&self, path: &Path) -> Option<String>;

    /// Change list name for an activity id, if the activity is known.
    fn activity_display_name(&self, activity_id: &str) -> Option<String>;

    /// Current activity of the view holding `path`.
    ///
    /// # Errors
    ///
    /// Returns an error if the view cannot be asked.
    fn view_activity(&self, path: &Path) -> Result<Option<String>>;

    /// Re-reads the activities of every view.
    ///
    /// # Errors
    ///
    /// Returns an error if activities cannot be listed.
    fn refresh_activities(&self) -> Result<()>;

    /// Makes sure every known activity has a change list.
    ///
    /// # Errors
    ///
    /// Returns an error if change lists cannot be created.
    fn sync_activities_to_changelists(&self) -> Result<()>;

    fn add_file_to_changelist(&self, path: &Path, changelist: &str);
}
