use std::fs;
use std::path::{Path, PathBuf};

use ccase_core::canonical_local_path;
use globset::{Glob, GlobSet, GlobSetBuilder};
use serde::Deserialize;

use crate::CONFIG_FILENAME;
use crate::error::ProjectError;

const DEFAULT_CLEARTOOL: &str = "cleartool";
const DEFAULT_ITERATIVE_STATUS_LIMIT: usize = 200;

#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
struct ConfigFile {
    cleartool: Option<PathBuf>,
    offline: Option<bool>,
    use_ucm_model: Option<bool>,
    sync_activities_on_refresh: Option<bool>,
    iterative_status_limit: Option<usize>,
    #[serde(default)]
    content_roots: Vec<PathBuf>,
    #[serde(default)]
    ignored: Vec<String>,
}

/// Settings of one ClearCase view as read from `ccase.toml`.
#[derive(Debug, Clone)]
pub struct ViewConfig {
    root: PathBuf,
    cleartool: PathBuf,
    offline: bool,
    use_ucm_model: bool,
    sync_activities_on_refresh: bool,
    iterative_status_limit: usize,
    content_roots: Vec<PathBuf>,
    ignored: GlobSet,
}

impl ViewConfig {
    /// Default settings for a view rooted at `root`: the root itself is the
    /// only content root and nothing is ignored.
    #[must_use]
    pub fn new(root: impl Into<PathBuf>) -> Self {
        let root = canonical_local_path(&root.into());
        Self {
            content_roots: vec![root.clone()],
            root,
            cleartool: PathBuf::from(DEFAULT_CLEARTOOL),
            offline: false,
            use_ucm_model: false,
            sync_activities_on_refresh: true,
            iterative_status_limit: DEFAULT_ITERATIVE_STATUS_LIMIT,
            ignored: GlobSet::empty(),
        }
    }

    #[must_use]
    pub fn root(&self) -> &Path {
        &self.root
    }

    #[must_use]
    pub fn cleartool(&self) -> &Path {
        &self.cleartool
    }

    #[must_use]
    pub fn is_offline(&self) -> bool {
        self.offline
    }

    pub fn set_offline(&mut self, offline: bool) {
        self.offline = offline;
    }

    #[must_use]
    pub fn use_ucm_model(&self) -> bool {
        self.use_ucm_model
    }

    #[must_use]
    pub fn sync_activities_on_refresh(&self) -> bool {
        self.sync_activities_on_refresh
    }

    /// Below this many writable candidates statuses are queried per file;
    /// at or above it the whole view is scanned at once.
    #[must_use]
    pub fn iterative_status_limit(&self) -> usize {
        self.iterative_status_limit
    }

    /// Absolute content roots of the view.
    #[must_use]
    pub fn content_roots(&self) -> &[PathBuf] {
        &self.content_roots
    }

    /// Whether `path` matches an ignore pattern. Paths inside the view root
    /// are matched relative to it.
    #[must_use]
    pub fn is_ignored(&self, path: &Path) -> bool {
        let relative = path.strip_prefix(&self.root).unwrap_or(path);
        self.ignored.is_match(relative)
    }

    #[cfg(any(test, feature = "testing"))]
    #[must_use]
    pub fn with_offline(mut self, offline: bool) -> Self {
        self.offline = offline;
        self
    }

    #[cfg(any(test, feature = "testing"))]
    #[must_use]
    pub fn with_ucm_model(mut self, use_ucm_model: bool) -> Self {
        self.use_ucm_model = use_ucm_model;
        self
    }

    #[cfg(any(test, feature = "testing"))]
    #[must_use]
    pub fn with_sync_activities_on_refresh(mut self, sync: bool) -> Self {
        self.sync_activities_on_refresh = sync;
        self
    }

    #[cfg(any(test, feature = "testing"))]
    #[must_use]
    pub fn with_iterative_status_limit(mut self, limit: usize) -> Self {
        self.iterative_status_limit = limit;
        self
    }

    #[cfg(any(test, feature = "testing"))]
    #[must_use]
    pub fn with_content_roots(mut self, roots: Vec<PathBuf>) -> Self {
        self.content_roots = roots;
        self
    }

    /// # Errors
    ///
    /// Returns an error if a pattern is not a valid glob.
    #[cfg(any(test, feature = "testing"))]
    pub fn with_ignored(mut self, patterns: &[String]) -> Result<Self, ProjectError> {
        self.ignored = build_glob_set(patterns)?;
        Ok(self)
    }
}

fn build_glob_set(patterns: &[String]) -> Result<GlobSet, ProjectError> {
    let mut builder = GlobSetBuilder::new();
    for pattern in patterns {
        let glob = Glob::new(pattern).map_err(|source| ProjectError::GlobPattern {
            pattern: pattern.clone(),
            source,
        })?;
        builder.add(glob);
    }
    builder.build().map_err(|source| ProjectError::GlobPattern {
        pattern: patterns.join(", "),
        source,
    })
}

/// Parses `ccase.toml` content for a view rooted at `root`.
///
/// # Errors
///
/// Returns an error if the content is not valid configuration, if the
/// status limit is zero, or if an ignore pattern is invalid.
pub fn parse_view_config(content: &str, root: &Path) -> Result<ViewConfig, ProjectError> {
    let file: ConfigFile = toml::from_str(content).map_err(|source| ProjectError::ConfigParse {
        path: root.join(CONFIG_FILENAME),
        source,
    })?;
    build_view_config(file, root)
}

fn build_view_config(file: ConfigFile, root: &Path) -> Result<ViewConfig, ProjectError> {
    let defaults = ViewConfig::new(root);

    let iterative_status_limit = file
        .iterative_status_limit
        .unwrap_or(defaults.iterative_status_limit);
    if iterative_status_limit == 0 {
        return Err(ProjectError::InvalidStatusLimit);
    }

    let content_roots = if file.content_roots.is_empty() {
        defaults.content_roots.clone()
    } else {
        file.content_roots
            .iter()
            .map(|r| canonical_local_path(&defaults.root.join(r)))
            .collect()
    };

    Ok(ViewConfig {
        cleartool: file.cleartool.unwrap_or(defaults.cleartool),
        offline: file.offline.unwrap_or(defaults.offline),
        use_ucm_model: file.use_ucm_model.unwrap_or(defaults.use_ucm_model),
        sync_activities_on_refresh: file
            .sync_activities_on_refresh
            .unwrap_or(defaults.sync_activities_on_refresh),
        iterative_status_limit,
        content_roots,
        ignored: build_glob_set(&file.ignored)?,
        root: defaults.root,
    })
}

/// Loads `ccase.toml` from `root`, falling back to defaults when the file
/// does not exist.
///
/// # Errors
///
/// Returns an error if the file exists but cannot be read or parsed.
pub fn load_view_config(root: &Path) -> Result<ViewConfig, ProjectError> {
    let path = root.join(CONFIG_FILENAME);
    if !path.exists() {
        return Ok(ViewConfig::new(root));
    }

    let content = fs::read_to_string(&path).map_err(|source| ProjectError::ConfigRead {
        path: path.clone(),
        source,
    })?;
    let file: ConfigFile =
        toml::from_str(&content).map_err(|source| ProjectError::ConfigParse { path, source })?;
    build_view_config(file, root)
}
