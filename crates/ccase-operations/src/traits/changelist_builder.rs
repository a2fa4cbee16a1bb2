use std::path::Path;

use ccase_core::Change;

/// Receives the outcome of a classification pass.
pub trait ChangelistBuilder {
    fn process_change(&mut self, change: Change, changelist: Option<&str>);

    fn process_unversioned(&mut self, path: &Path);

    fn process_ignored(&mut self, path: &Path);

    fn process_locally_deleted(&mut self, path: &Path, is_dir: bool);
}
