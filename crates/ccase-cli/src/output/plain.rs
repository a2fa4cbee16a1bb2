use std::fmt::Write as _;
use std::path::Path;

use ccase_core::Change;
use ccase_operations::providers::{ChangeReport, ReportedChange};

use super::{StatusFormatter, display_path};
use crate::error::Result;

pub(crate) struct PlainTextStatusFormatter {
    pub(crate) offline: bool,
}

impl PlainTextStatusFormatter {
    fn label(change: &Change) -> String {
        if change.is_rename() {
            "renamed".to_string()
        } else {
            change.status.to_string()
        }
    }

    fn format_change(output: &mut String, reported: &ReportedChange, root: &Path) {
        let change = &reported.change;
        let suffix = if change.is_folder() { "/" } else { "" };

        let target = match (change.before_path(), change.after_path()) {
            (Some(before), Some(after)) if change.is_rename() => format!(
                "{}{suffix} -> {}{suffix}",
                display_path(before, root),
                display_path(after, root)
            ),
            _ => change
                .path()
                .map(|path| format!("{}{suffix}", display_path(path, root)))
                .unwrap_or_default(),
        };

        let _ = write!(output, "  {:<22} {target}", Self::label(change));
        if let Some(changelist) = &reported.changelist {
            let _ = write!(output, "  [{changelist}]");
        }
        output.push('\n');
    }

    fn format_changes(output: &mut String, report: &ChangeReport, root: &Path) {
        if report.changes.is_empty() {
            return;
        }

        output.push_str("Changes:\n");
        for reported in &report.changes {
            Self::format_change(output, reported, root);
        }
    }

    fn format_locally_deleted(output: &mut String, report: &ChangeReport, root: &Path) {
        if report.locally_deleted.is_empty() {
            return;
        }

        output.push_str("\nLocally deleted:\n");
        for deleted in &report.locally_deleted {
            let suffix = if deleted.is_dir { "/" } else { "" };
            let _ = writeln!(output, "  {}{suffix}", display_path(&deleted.path, root));
        }
    }

    fn format_unversioned(output: &mut String, report: &ChangeReport, root: &Path) {
        if report.unversioned.is_empty() {
            return;
        }

        output.push_str("\nUnversioned files:\n");
        for path in &report.unversioned {
            let _ = writeln!(output, "  {}", display_path(path, root));
        }
    }

    fn format_summary(output: &mut String, report: &ChangeReport) {
        output.push('\n');
        let _ = writeln!(
            output,
            "Summary: {} change(s), {} unversioned, {} locally deleted, {} ignored",
            report.changes.len(),
            report.unversioned.len(),
            report.locally_deleted.len(),
            report.ignored.len()
        );
    }
}

impl StatusFormatter for PlainTextStatusFormatter {
    fn format_status(&self, report: &ChangeReport, root: &Path) -> Result<String> {
        let mut output = String::new();
        if self.offline {
            output.push_str("Working offline: statuses come from the last online pass.\n\n");
        }

        if report.changes.is_empty()
            && report.unversioned.is_empty()
            && report.locally_deleted.is_empty()
        {
            output.push_str("No local changes.\n");
            return Ok(output);
        }

        Self::format_changes(&mut output, report, root);
        Self::format_locally_deleted(&mut output, report, root);
        Self::format_unversioned(&mut output, report, root);
        Self::format_summary(&mut output, report);

        Ok(output)
    }
}
