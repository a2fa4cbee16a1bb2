use std::path::Path;

pub trait ProgressReporter {
    fn set_text(&self, text: &str);

    /// Called once for each item a rollback handles.
    fn accept(&self, path: &Path);
}

/// Reports nothing.
#[derive(Debug, Clone, Copy, Default)]
pub struct SilentProgress;

impl ProgressReporter for SilentProgress {
    fn set_text(&self, _text: &str) {}

    fn accept(&self, _path: &Path) {}
}
