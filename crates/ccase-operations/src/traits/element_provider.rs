use std::path::{Path, PathBuf};

use ccase_core::ElementStatus;
use tracing::debug;

use crate::Result;

/// Per-element queries and actions.
pub trait ElementProvider: Send + Sync {
    /// # Errors
    ///
    /// Returns an error if the status cannot be determined.
    fn status(&self, path: &Path) -> Result<ElementStatus>;

    /// Like [`status`](Self::status), treating a failed lookup as
    /// [`ElementStatus::NotAnElement`].
    fn status_safely(&self, path: &Path) -> ElementStatus {
        self.status(path).unwrap_or_else(|err| {
            debug!(path = %path.display(), error = %err, "status lookup failed");
            ElementStatus::NotAnElement
        })
    }

    /// # Errors
    ///
    /// Returns an error if the status cannot be determined.
    fn exists_in_vcs(&self, path: &Path) -> Result<bool> {
        Ok(self.status(path)? != ElementStatus::NotAnElement)
    }

    /// # Errors
    ///
    /// Returns an error if the checkout cannot be cancelled.
    fn undo_checkout(&self, path: &Path) -> Result<()>;

    /// Reloads `path` from the view and returns what the tool printed.
    ///
    /// # Errors
    ///
    /// Returns an error only if the tool cannot be run at all.
    fn update(&self, path: &Path) -> Result<String>;

    /// # Errors
    ///
    /// Returns an error if checkouts cannot be listed.
    fn list_checkouts_under(&self, dir: &Path) -> Result<Vec<PathBuf>>;
}
