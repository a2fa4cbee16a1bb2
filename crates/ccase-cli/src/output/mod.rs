mod json;
mod plain;
mod rollback;

use std::path::Path;

use ccase_operations::providers::ChangeReport;

use crate::error::Result;

pub(crate) use json::JsonStatusFormatter;
pub(crate) use plain::PlainTextStatusFormatter;
pub(crate) use rollback::format_rollback;

pub(crate) trait StatusFormatter {
    fn format_status(&self, report: &ChangeReport, root: &Path) -> Result<String>;
}

/// `path` relative to the view root when it lies inside it.
fn display_path(path: &Path, root: &Path) -> String {
    path.strip_prefix(root).unwrap_or(path).display().to_string()
}
