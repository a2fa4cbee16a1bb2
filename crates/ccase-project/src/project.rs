use std::path::{Path, PathBuf};

use ccase_core::canonical_local_path;

use crate::config::{ViewConfig, load_view_config};
use crate::error::ProjectError;
use crate::{CONFIG_FILENAME, DEFAULT_STATE_DIR};

/// A view directory together with its configuration.
#[derive(Debug, Clone)]
pub struct ViewProject {
    pub root: PathBuf,
    pub config: ViewConfig,
}

impl ViewProject {
    /// Directory holding persisted tracking state.
    #[must_use]
    pub fn state_dir(&self) -> PathBuf {
        self.root.join(DEFAULT_STATE_DIR)
    }
}

/// Finds the view root by walking up from `start_dir` to the nearest
/// directory containing `ccase.toml`. Without one, `start_dir` itself is
/// the root and default settings apply.
///
/// # Errors
///
/// Returns an error if `start_dir` does not exist or the configuration
/// cannot be loaded.
pub fn discover_project(start_dir: &Path) -> Result<ViewProject, ProjectError> {
    let start_dir = canonical_local_path(&start_dir.canonicalize()?);
    let root = find_config_root(&start_dir).unwrap_or(start_dir);
    let config = load_view_config(&root)?;

    Ok(ViewProject { root, config })
}

fn find_config_root(start_dir: &Path) -> Option<PathBuf> {
    start_dir
        .ancestors()
        .find(|dir| dir.join(CONFIG_FILENAME).is_file())
        .map(Path::to_path_buf)
}
