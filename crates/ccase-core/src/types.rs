use std::fmt;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

/// Status of a single element as reported by the view.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ElementStatus {
    /// View-private object, unknown to the VOB.
    NotAnElement,
    /// Modified in a snapshot view without a checkout.
    Hijacked,
    CheckedOut,
    CheckedIn,
}

impl ElementStatus {
    /// Checked out or hijacked, i.e. the view holds edits for the element.
    #[must_use]
    pub fn is_modified(self) -> bool {
        matches!(self, Self::Hijacked | Self::CheckedOut)
    }
}

/// Status tag attached to a change record handed to the changelist builder.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum FileStatus {
    Added,
    Modified,
    Hijacked,
    Deleted,
    MergedWithConflicts,
}

impl fmt::Display for FileStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Self::Added => "added",
            Self::Modified => "modified",
            Self::Hijacked => "hijacked",
            Self::Deleted => "deleted",
            Self::MergedWithConflicts => "merged with conflicts",
        };
        write!(f, "{s}")
    }
}

/// Where the content of a revision is read from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ContentSource {
    /// The version the view selects in the VOB.
    Repository,
    /// Whatever is currently on disk.
    WorkingCopy,
}

#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Revision {
    pub path: PathBuf,
    pub is_dir: bool,
    pub source: ContentSource,
}

impl Revision {
    #[must_use]
    pub fn repository(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            is_dir: false,
            source: ContentSource::Repository,
        }
    }

    #[must_use]
    pub fn working_copy(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            is_dir: false,
            source: ContentSource::WorkingCopy,
        }
    }

    #[must_use]
    pub fn directory(mut self) -> Self {
        self.is_dir = true;
        self
    }
}

/// One classified change: before revision, after revision and status.
///
/// Additions have no `before`, deletions have no `after`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Change {
    pub before: Option<Revision>,
    pub after: Option<Revision>,
    pub status: FileStatus,
}

impl Change {
    #[must_use]
    pub fn added(after: Revision) -> Self {
        Self {
            before: None,
            after: Some(after),
            status: FileStatus::Added,
        }
    }

    #[must_use]
    pub fn modified(before: Revision, after: Revision, status: FileStatus) -> Self {
        Self {
            before: Some(before),
            after: Some(after),
            status,
        }
    }

    #[must_use]
    pub fn deleted(before: Revision) -> Self {
        Self {
            before: Some(before),
            after: None,
            status: FileStatus::Deleted,
        }
    }

    #[must_use]
    pub fn is_new(&self) -> bool {
        self.before.is_none() && self.after.is_some()
    }

    #[must_use]
    pub fn is_deleted(&self) -> bool {
        self.before.is_some() && self.after.is_none()
    }

    #[must_use]
    pub fn is_rename(&self) -> bool {
        match (&self.before, &self.after) {
            (Some(before), Some(after)) => before.path != after.path,
            _ => false,
        }
    }

    #[must_use]
    pub fn is_folder(&self) -> bool {
        self.before.as_ref().is_some_and(|r| r.is_dir)
            || self.after.as_ref().is_some_and(|r| r.is_dir)
    }

    #[must_use]
    pub fn before_path(&self) -> Option<&Path> {
        self.before.as_ref().map(|r| r.path.as_path())
    }

    #[must_use]
    pub fn after_path(&self) -> Option<&Path> {
        self.after.as_ref().map(|r| r.path.as_path())
    }

    /// The path the host shows for this change: the after path when there is one.
    #[must_use]
    pub fn path(&self) -> Option<&Path> {
        self.after_path().or_else(|| self.before_path())
    }
}
