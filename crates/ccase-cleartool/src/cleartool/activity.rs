use std::collections::BTreeMap;
use std::ffi::OsString;
use std::path::{Path, PathBuf};

use crate::{ActivityInfo, Result, ToolError};

use super::Cleartool;

const DESCRIBE_FORMAT: &str = "%En\\t%[activity]Xp\\n";
const ACTIVITY_FORMAT: &str = "%Xn\\t%[headline]p\\n";

impl Cleartool {
    /// Activity each checked-out element was checked out under.
    ///
    /// Elements without an activity (base ClearCase views, or not checked
    /// out) are absent from the result.
    ///
    /// # Errors
    ///
    /// Returns an error if cleartool cannot be launched or fails, or if a
    /// line of its output cannot be parsed.
    pub fn describe_activities(
        &self,
        paths: &[PathBuf],
        cwd: Option<&Path>,
    ) -> Result<BTreeMap<PathBuf, String>> {
        if paths.is_empty() {
            return Ok(BTreeMap::new());
        }

        let mut args: Vec<OsString> = vec!["describe".into(), "-fmt".into(), DESCRIBE_FORMAT.into()];
        args.extend(paths.iter().map(|p| p.as_os_str().to_os_string()));

        let output = self.run(&args, cwd)?;
        let base = cwd.map_or_else(PathBuf::new, Path::to_path_buf);
        parse_describe_output(&output, &base)
    }

    /// Activities of the stream the view in `cwd` is attached to.
    ///
    /// # Errors
    ///
    /// Returns an error if cleartool cannot be launched or fails, or if its
    /// output cannot be parsed.
    pub fn list_activities(&self, cwd: &Path) -> Result<Vec<ActivityInfo>> {
        let output = self.run(["lsactivity", "-cview", "-fmt", ACTIVITY_FORMAT], Some(cwd))?;
        parse_activity_list(&output)
    }

    /// The view's current activity, if one is set.
    ///
    /// # Errors
    ///
    /// Returns an error if cleartool cannot be launched or fails, or if its
    /// output cannot be parsed.
    pub fn current_activity(&self, cwd: &Path) -> Result<Option<ActivityInfo>> {
        let output = self.run(["lsactivity", "-cact", "-fmt", ACTIVITY_FORMAT], Some(cwd))?;
        Ok(parse_activity_list(&output)?.into_iter().next())
    }
}

/// Parses `describe` output of the form `<element>\t<activity selector>`.
///
/// # Errors
///
/// Returns [`ToolError::InvalidOutput`] for a non-blank line without a tab.
pub fn parse_describe_output(output: &str, base: &Path) -> Result<BTreeMap<PathBuf, String>> {
    let mut activities = BTreeMap::new();

    for line in output.lines().filter(|l| !l.trim().is_empty()) {
        let (element, activity) = line
            .split_once('\t')
            .ok_or_else(|| ToolError::InvalidOutput(line.to_string()))?;
        let activity = activity.trim();
        if activity.is_empty() {
            continue;
        }
        activities.insert(base.join(element.trim()), activity.to_string());
    }

    Ok(activities)
}

/// Parses `lsactivity` output of the form `<selector>\t<headline>`.
///
/// # Errors
///
/// Returns [`ToolError::InvalidOutput`] for a non-blank line without a tab.
pub fn parse_activity_list(output: &str) -> Result<Vec<ActivityInfo>> {
    output
        .lines()
        .filter(|l| !l.trim().is_empty())
        .map(|line| {
            let (id, headline) = line
                .split_once('\t')
                .ok_or_else(|| ToolError::InvalidOutput(line.to_string()))?;
            Ok(ActivityInfo {
                id: id.trim().to_string(),
                headline: headline.trim().to_string(),
            })
        })
        .collect()
}
