use std::collections::BTreeSet;
use std::path::{Path, PathBuf};

use crate::Result;

/// What a walk over one directory subtree found.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CollectedFiles {
    pub writable: BTreeSet<PathBuf>,
    pub ignored: BTreeSet<PathBuf>,
    pub dirs: BTreeSet<PathBuf>,
}

pub trait WritableCollector: Send + Sync {
    /// # Errors
    ///
    /// Returns an error if the subtree cannot be read.
    fn collect(&self, dir: &Path) -> Result<CollectedFiles>;
}
