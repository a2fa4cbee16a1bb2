use std::ffi::OsStr;
use std::path::{Path, PathBuf};

use tracing::debug;

use crate::Result;

use super::{Cleartool, working_dir};

impl Cleartool {
    /// Cancels the checkout of `path`, discarding the checked-out copy.
    ///
    /// # Errors
    ///
    /// Returns an error if cleartool cannot be launched or refuses the
    /// uncheckout.
    pub fn undo_checkout(&self, path: &Path) -> Result<()> {
        debug!(path = %path.display(), "undoing checkout");
        self.run(
            [OsStr::new("unco"), OsStr::new("-rm"), path.as_os_str()],
            working_dir(path),
        )?;
        Ok(())
    }

    /// Overwrites `path` with the version the view selects.
    ///
    /// Returns the combined output of the update. Cleartool reports
    /// per-element problems in this text rather than in the exit status.
    ///
    /// # Errors
    ///
    /// Returns an error only if cleartool cannot be launched.
    pub fn update(&self, path: &Path) -> Result<String> {
        debug!(path = %path.display(), "updating from view");
        self.run_with_output(
            [
                OsStr::new("update"),
                OsStr::new("-overwrite"),
                OsStr::new("-force"),
                path.as_os_str(),
            ],
            working_dir(path),
        )
    }

    /// Paths of every element checked out under `dir`, recursively.
    ///
    /// # Errors
    ///
    /// Returns an error if cleartool cannot be launched or fails.
    pub fn list_checkouts_under(&self, dir: &Path) -> Result<Vec<PathBuf>> {
        let output = self.run(["lsco", "-short", "-recurse"], Some(dir))?;
        Ok(parse_checkout_list(&output, dir))
    }
}

fn parse_checkout_list(output: &str, dir: &Path) -> Vec<PathBuf> {
    output
        .lines()
        .map(str::trim)
        .filter(|line| !line.is_empty())
        .map(|line| dir.join(line))
        .collect()
}
