use std::path::Path;

use ccase_core::is_writable;
use ccase_project::{DEFAULT_STATE_DIR, SharedConfig};
use ignore::WalkBuilder;
use tracing::debug;

use crate::Result;
use crate::error::OperationError;
use crate::traits::{CollectedFiles, WritableCollector};

/// Walks the working tree on disk.
///
/// Ignored directories are reported but not entered. Read-only files are
/// what a snapshot view loads for checked-in elements, so only writable
/// files become candidates.
pub struct FileSystemCollector {
    config: SharedConfig,
}

impl FileSystemCollector {
    #[must_use]
    pub fn new(config: SharedConfig) -> Self {
        Self { config }
    }
}

impl WritableCollector for FileSystemCollector {
    fn collect(&self, dir: &Path) -> Result<CollectedFiles> {
        let config = self.config.snapshot();
        let filter_config = config.clone();
        let root = dir.to_path_buf();

        let mut builder = WalkBuilder::new(dir);
        builder.standard_filters(false).follow_links(false);
        builder.filter_entry(move |entry| {
            if entry.file_name() == DEFAULT_STATE_DIR {
                return false;
            }
            entry
                .path()
                .parent()
                .filter(|parent| parent.starts_with(&root) && *parent != root.as_path())
                .is_none_or(|parent| !filter_config.is_ignored(parent))
        });

        let mut found = CollectedFiles::default();
        for entry in builder.build() {
            let entry = entry.map_err(|source| OperationError::Walk {
                path: dir.to_path_buf(),
                source,
            })?;
            let path = entry.path();

            if entry.depth() > 0 && config.is_ignored(path) {
                found.ignored.insert(path.to_path_buf());
                continue;
            }

            match entry.file_type() {
                Some(kind) if kind.is_dir() => {
                    found.dirs.insert(path.to_path_buf());
                }
                Some(kind) if kind.is_file() && is_writable(path) => {
                    found.writable.insert(path.to_path_buf());
                }
                _ => {}
            }
        }

        debug!(
            root = %dir.display(),
            writable = found.writable.len(),
            ignored = found.ignored.len(),
            dirs = found.dirs.len(),
            "collected working tree"
        );
        Ok(found)
    }
}
