use std::collections::BTreeSet;
use std::path::{Path, PathBuf};

use ccase_core::ElementStatus;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct StatusOptions {
    pub recursive: bool,
    /// Only list view-private objects, checkouts and hijacks.
    pub view_only: bool,
}

impl StatusOptions {
    /// Recursive, view-only listing used when scanning whole content roots.
    #[must_use]
    pub fn view_scan() -> Self {
        Self {
            recursive: true,
            view_only: true,
        }
    }
}

/// Categorized result of a batched status query.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct StatusReport {
    pub unversioned: BTreeSet<PathBuf>,
    pub checked_out: BTreeSet<PathBuf>,
    pub hijacked: BTreeSet<PathBuf>,
    pub locally_deleted: BTreeSet<PathBuf>,
    pub checked_in: BTreeSet<PathBuf>,
}

impl StatusReport {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Status of a single path, if the query reported it at all.
    ///
    /// A locally deleted element is still an element the view has loaded,
    /// so it counts as checked in.
    #[must_use]
    pub fn status_of(&self, path: &Path) -> Option<ElementStatus> {
        if self.unversioned.contains(path) {
            Some(ElementStatus::NotAnElement)
        } else if self.checked_out.contains(path) {
            Some(ElementStatus::CheckedOut)
        } else if self.hijacked.contains(path) {
            Some(ElementStatus::Hijacked)
        } else if self.checked_in.contains(path) || self.locally_deleted.contains(path) {
            Some(ElementStatus::CheckedIn)
        } else {
            None
        }
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.unversioned.is_empty()
            && self.checked_out.is_empty()
            && self.hijacked.is_empty()
            && self.locally_deleted.is_empty()
            && self.checked_in.is_empty()
    }
}

/// An activity as listed by `lsactivity`: its selector and its headline.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ActivityInfo {
    pub id: String,
    pub headline: String,
}
