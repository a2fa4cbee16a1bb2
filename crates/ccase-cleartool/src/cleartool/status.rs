use std::ffi::OsString;
use std::path::{Path, PathBuf};

use ccase_core::ElementStatus;

use crate::{Result, StatusOptions, StatusReport};

use super::{Cleartool, working_dir};

const EXTENDED_NAMING_SYMBOL: &str = "@@";
const CHECKEDOUT_BRANCH: &str = "CHECKEDOUT";
const HIJACKED_ANNOTATION: &str = "[hijacked]";
const MISSING_ANNOTATIONS: &[&str] = &["[loaded but missing]", "[checkedout but removed]"];

impl Cleartool {
    /// Lists the status of `paths` in one `cleartool ls` call.
    ///
    /// Directories are listed as themselves unless `options.recursive` is
    /// set, in which case their whole subtree is listed.
    ///
    /// # Errors
    ///
    /// Returns an error if cleartool cannot be launched or fails.
    pub fn list_status(
        &self,
        paths: &[PathBuf],
        options: StatusOptions,
        cwd: Option<&Path>,
    ) -> Result<StatusReport> {
        if paths.is_empty() {
            return Ok(StatusReport::new());
        }

        let mut args: Vec<OsString> = vec!["ls".into()];
        if options.recursive {
            args.push("-recurse".into());
        } else {
            args.push("-directory".into());
        }
        if options.view_only {
            args.push("-view_only".into());
        }
        args.extend(paths.iter().map(|p| p.as_os_str().to_os_string()));

        let output = self.run(&args, cwd)?;
        let base = cwd.map_or_else(PathBuf::new, Path::to_path_buf);
        Ok(parse_ls_output(&output, &base))
    }

    /// Status of a single element or directory.
    ///
    /// # Errors
    ///
    /// Returns an error if cleartool cannot be launched or fails.
    pub fn element_status(&self, path: &Path) -> Result<ElementStatus> {
        let cwd = working_dir(path);
        let report = self.list_status(&[path.to_path_buf()], StatusOptions::default(), cwd)?;
        Ok(report
            .status_of(path)
            .unwrap_or(ElementStatus::NotAnElement))
    }
}

/// Categorizes `cleartool ls` output lines.
///
/// Element lines carry the extended name (`name@@/main/3`) followed by
/// annotations; view-private objects are printed as a bare name. Relative
/// names are resolved against `base`.
#[must_use]
pub fn parse_ls_output(output: &str, base: &Path) -> StatusReport {
    let mut report = StatusReport::new();

    for line in output.lines() {
        let line = line.trim_end();
        if line.trim().is_empty() {
            continue;
        }

        match line.split_once(EXTENDED_NAMING_SYMBOL) {
            Some((name, version)) => {
                let path = base.join(name.trim());
                if MISSING_ANNOTATIONS.iter().any(|a| version.contains(a)) {
                    report.locally_deleted.insert(path);
                } else if version.contains(HIJACKED_ANNOTATION) {
                    report.hijacked.insert(path);
                } else if version_selector(version).contains(CHECKEDOUT_BRANCH) {
                    report.checked_out.insert(path);
                } else {
                    report.checked_in.insert(path);
                }
            }
            None => {
                report.unversioned.insert(base.join(line.trim()));
            }
        }
    }

    report
}

fn version_selector(version: &str) -> &str {
    version.split_whitespace().next().unwrap_or_default()
}
