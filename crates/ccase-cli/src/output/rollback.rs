use std::fmt::Write as _;
use std::path::{Path, PathBuf};

use ccase_operations::VcsError;

use super::display_path;

/// Lists what a rollback touched followed by any problems it hit.
pub(crate) fn format_rollback(processed: &[PathBuf], errors: &[VcsError], root: &Path) -> String {
    let mut output = String::new();

    if !processed.is_empty() {
        let _ = writeln!(output, "Reverted {} item(s):", processed.len());
        for path in processed {
            let _ = writeln!(output, "  {}", display_path(path, root));
        }
    }

    if !errors.is_empty() {
        if !output.is_empty() {
            output.push('\n');
        }
        for error in errors {
            let location = error
                .path
                .as_deref()
                .map(|path| format!("{}: ", display_path(path, root)))
                .unwrap_or_default();
            let _ = writeln!(output, "{}: {location}{}", error.severity, error.message);
        }
    }

    output
}
