use std::collections::BTreeSet;
use std::path::{Path, PathBuf};
use std::sync::{Mutex, PoisonError};

use ccase_project::SharedConfig;
use tracing::{debug, warn};

use crate::traits::ProjectHost;

/// Host for running the engines outside an IDE.
///
/// Content roots and ignore patterns come from the view configuration.
/// There are no change lists, so nothing is ever "already in a list".
/// Paths marked dirty are kept so the caller can re-check them.
pub struct ViewHost {
    config: SharedConfig,
    added: Vec<PathBuf>,
    dirty: Mutex<BTreeSet<PathBuf>>,
}

impl ViewHost {
    #[must_use]
    pub fn new(config: SharedConfig) -> Self {
        Self {
            config,
            added: Vec::new(),
            dirty: Mutex::new(BTreeSet::new()),
        }
    }

    /// Files the caller knows to be pending additions.
    #[must_use]
    pub fn with_added_files(mut self, files: impl IntoIterator<Item = PathBuf>) -> Self {
        self.added.extend(files);
        self
    }

    #[must_use]
    pub fn dirty_paths(&self) -> BTreeSet<PathBuf> {
        self.dirty
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }
}

impl ProjectHost for ViewHost {
    fn is_disposed(&self) -> bool {
        false
    }

    fn content_roots(&self) -> Vec<PathBuf> {
        self.config.read(|config| config.content_roots().to_vec())
    }

    fn is_ignored(&self, path: &Path) -> bool {
        self.config.read(|config| config.is_ignored(path))
    }

    fn has_change(&self, _path: &Path) -> bool {
        false
    }

    fn added_files(&self) -> Vec<PathBuf> {
        self.added.clone()
    }

    fn mark_dirty(&self, path: &Path) {
        debug!(path = %path.display(), "marked dirty");
        self.dirty
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .insert(path.to_path_buf());
    }

    fn refresh(&self, path: &Path) {
        debug!(path = %path.display(), "refresh requested");
    }

    fn show_reminder(&self, message: &str) {
        warn!("{message}");
    }
}
