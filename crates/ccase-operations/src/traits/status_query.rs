use std::collections::BTreeMap;
use std::path::PathBuf;

use ccase_cleartool::{StatusOptions, StatusReport};

use crate::Result;

/// Batched status lookups against the view.
pub trait StatusQuery: Send + Sync {
    /// # Errors
    ///
    /// Returns an error if the status command cannot be run.
    fn query(&self, paths: &[PathBuf], options: StatusOptions) -> Result<StatusReport>;

    /// Activity id for each of `paths` that has one.
    ///
    /// # Errors
    ///
    /// Returns an error if the describe command cannot be run.
    fn describe_activities(&self, paths: &[PathBuf]) -> Result<BTreeMap<PathBuf, String>>;
}
