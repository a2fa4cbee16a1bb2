use std::path::{Path, PathBuf};

use ccase_cleartool::Cleartool;
use ccase_core::{
    DirtyPath, DirtyScope, TrackingState, canonical_local_path, starts_with_ignore_case,
};
use ccase_operations::operations::{ChangeProvider, RollbackEnvironment};
use ccase_operations::providers::{
    ChangeReport, CleartoolActivityManager, CleartoolElementProvider, CleartoolStatusQuery,
    FileSystemCollector, ViewHost,
};
use ccase_operations::traits::ProgressReporter;
use ccase_project::{
    SharedConfig, ViewConfig, ViewProject, discover_project, load_tracking_state,
    save_tracking_state,
};
use tracing::{debug, info};

use crate::error::{CliError, Result};

/// Progress reported through the log.
pub(crate) struct LogProgress;

impl ProgressReporter for LogProgress {
    fn set_text(&self, text: &str) {
        debug!("{text}");
    }

    fn accept(&self, path: &Path) {
        info!(path = %path.display(), "processing");
    }
}

/// A discovered view with its configuration and persisted tracking state.
pub(crate) struct ViewSession {
    project: ViewProject,
    base: PathBuf,
    config: SharedConfig,
    state: TrackingState,
}

impl ViewSession {
    pub(crate) fn open(start_path: &Path) -> Result<Self> {
        let project = discover_project(start_path)?;
        let base = canonical_local_path(&start_path.canonicalize()?);
        let state = load_tracking_state(&project.state_dir())?;
        let config = SharedConfig::new(project.config.clone());
        debug!(root = %project.root.display(), "opened view");

        Ok(Self {
            project,
            base,
            config,
            state,
        })
    }

    pub(crate) fn root(&self) -> &Path {
        &self.project.root
    }

    pub(crate) fn is_offline(&self) -> bool {
        self.config.is_offline()
    }

    /// Absolute, normalized form of a path given on the command line.
    ///
    /// The path may no longer exist, so only its nearest existing ancestor
    /// is resolved on disk.
    pub(crate) fn resolve(&self, path: &Path) -> Result<PathBuf> {
        let joined = self.base.join(path);
        let resolved = match joined.canonicalize() {
            Ok(found) => found,
            Err(_) => match (joined.parent(), joined.file_name()) {
                (Some(parent), Some(name)) => parent
                    .canonicalize()
                    .map_or_else(|_| joined.clone(), |parent| parent.join(name)),
                _ => joined.clone(),
            },
        };
        let resolved = canonical_local_path(&resolved);

        if !starts_with_ignore_case(&resolved, self.root()) {
            return Err(CliError::OutsideView(resolved, self.root().to_path_buf()));
        }
        Ok(resolved)
    }

    /// Every content root, recursively.
    pub(crate) fn full_scope(&self) -> DirtyScope {
        self.config
            .read(|config| config.content_roots().to_vec())
            .into_iter()
            .fold(DirtyScope::new(), DirtyScope::with_recursive_dir)
    }

    /// Directories recursively, files on their own.
    pub(crate) fn scope_for(paths: &[PathBuf]) -> DirtyScope {
        paths.iter().fold(DirtyScope::new(), |scope, path| {
            if path.is_dir() {
                scope.with_recursive_dir(path.clone())
            } else {
                scope.with_dirty_file(DirtyPath::new(path.clone()))
            }
        })
    }

    fn tool(&self) -> Cleartool {
        Cleartool::new(self.config.read(|config| config.cleartool().to_path_buf()))
    }

    fn host(&self) -> ViewHost {
        ViewHost::new(self.config.clone()).with_added_files(self.state.new_files().iter().cloned())
    }

    pub(crate) fn classify(&mut self, scope: &DirtyScope) -> Result<ChangeReport> {
        let tool = self.tool();
        let ucm = self.config.read(ViewConfig::use_ucm_model);
        let root = self.project.root.clone();

        let mut provider = ChangeProvider::new(
            CleartoolStatusQuery::new(tool.clone(), &root),
            CleartoolElementProvider::new(tool.clone()),
            FileSystemCollector::new(self.config.clone()),
            self.host(),
            CleartoolActivityManager::new(tool, &root, ucm),
            self.config.clone(),
        );

        let mut report = ChangeReport::new();
        provider.get_changes(scope, &mut self.state, &mut report, &LogProgress)?;
        Ok(report)
    }

    /// Rollback engine together with the tracking state it updates.
    pub(crate) fn rollback(
        &mut self,
    ) -> (
        RollbackEnvironment<CleartoolElementProvider, ViewHost>,
        &mut TrackingState,
    ) {
        let environment =
            RollbackEnvironment::new(CleartoolElementProvider::new(self.tool()), self.host());
        (environment, &mut self.state)
    }

    pub(crate) fn save(&self) -> Result<()> {
        save_tracking_state(&self.project.state_dir(), &self.state)?;
        Ok(())
    }
}
