use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

/// Final category of a path after one classification pass.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Category {
    New,
    Changed,
    Hijacked,
    Ignored,
    MergeConflict,
    LocallyDeleted,
}

/// Result sets of one pass. Each path has at most one category; assigning
/// a new one replaces the old.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Classification {
    categories: BTreeMap<PathBuf, Category>,
}

impl Classification {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    pub fn assign(&mut self, path: impl Into<PathBuf>, category: Category) {
        self.categories.insert(path.into(), category);
    }

    #[must_use]
    pub fn category_of(&self, path: &Path) -> Option<Category> {
        self.categories.get(path).copied()
    }

    pub fn paths(&self, category: Category) -> impl Iterator<Item = &Path> {
        self.categories
            .iter()
            .filter(move |(_, c)| **c == category)
            .map(|(path, _)| path.as_path())
    }

    /// Owned copy of one category, for passes that reassign while walking it.
    #[must_use]
    pub fn snapshot(&self, category: Category) -> Vec<PathBuf> {
        self.paths(category).map(Path::to_path_buf).collect()
    }

    #[must_use]
    pub fn count(&self, category: Category) -> usize {
        self.paths(category).count()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.categories.is_empty()
    }

    pub fn clear(&mut self) {
        self.categories.clear();
    }
}
