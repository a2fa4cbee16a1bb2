use std::path::{Path, PathBuf};

use ccase_core::{Change, FileStatus};
use serde::Serialize;

use crate::traits::ChangelistBuilder;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ReportedChange {
    #[serde(flatten)]
    pub change: Change,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub changelist: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct LocallyDeleted {
    pub path: PathBuf,
    pub is_dir: bool,
}

/// Changelist builder that keeps everything it is given, in order.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ChangeReport {
    pub changes: Vec<ReportedChange>,
    pub unversioned: Vec<PathBuf>,
    pub ignored: Vec<PathBuf>,
    pub locally_deleted: Vec<LocallyDeleted>,
}

impl ChangeReport {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.changes.is_empty()
            && self.unversioned.is_empty()
            && self.ignored.is_empty()
            && self.locally_deleted.is_empty()
    }

    /// Changes carrying `status`.
    pub fn with_status(&self, status: FileStatus) -> impl Iterator<Item = &Change> {
        self.changes
            .iter()
            .map(|reported| &reported.change)
            .filter(move |change| change.status == status)
    }

    /// The change shown for `path`, if any.
    #[must_use]
    pub fn change_for(&self, path: &Path) -> Option<&ReportedChange> {
        self.changes
            .iter()
            .find(|reported| reported.change.path() == Some(path))
    }
}

impl ChangelistBuilder for ChangeReport {
    fn process_change(&mut self, change: Change, changelist: Option<&str>) {
        self.changes.push(ReportedChange {
            change,
            changelist: changelist.map(str::to_string),
        });
    }

    fn process_unversioned(&mut self, path: &Path) {
        self.unversioned.push(path.to_path_buf());
    }

    fn process_ignored(&mut self, path: &Path) {
        self.ignored.push(path.to_path_buf());
    }

    fn process_locally_deleted(&mut self, path: &Path, is_dir: bool) {
        self.locally_deleted.push(LocallyDeleted {
            path: path.to_path_buf(),
            is_dir,
        });
    }
}
