mod restore;
mod revert;
mod status;

use std::path::{Path, PathBuf};

use clap::Subcommand;

use crate::error::Result;

#[derive(Subcommand)]
pub(crate) enum Commands {
    /// Show local changes in the view
    Status {
        /// Print the report as JSON
        #[arg(long)]
        json: bool,

        /// Only look at these files and directories (default: all content roots)
        paths: Vec<PathBuf>,
    },
    /// Undo local changes: checkouts, hijacks, renames, additions and deletions
    Revert {
        /// Files or directories whose changes are reverted
        #[arg(required = true)]
        paths: Vec<PathBuf>,
    },
    /// Reload files from the view, bringing back deleted ones
    Restore {
        /// Files to reload
        #[arg(required = true)]
        paths: Vec<PathBuf>,
    },
}

impl Commands {
    pub(crate) fn execute(self, start_path: &Path) -> Result<()> {
        match self {
            Self::Status { json, paths } => status::run(start_path, &paths, json),
            Self::Revert { paths } => revert::run(start_path, &paths),
            Self::Restore { paths } => restore::run(start_path, &paths),
        }
    }
}
