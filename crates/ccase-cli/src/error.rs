use std::path::PathBuf;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum CliError {
    #[error("failed to determine current directory")]
    CurrentDir(#[source] std::io::Error),

    #[error("IO error")]
    Io(#[from] std::io::Error),

    #[error("view error")]
    Project(#[from] ccase_project::ProjectError),

    #[error(transparent)]
    Operation(#[from] ccase_operations::OperationError),

    #[error("failed to serialize report")]
    Json(#[from] serde_json::Error),

    #[error("'{0}' is outside the view at '{1}'")]
    OutsideView(PathBuf, PathBuf),

    #[error("rollback finished with {0} error(s)")]
    RollbackFailed(usize),
}

pub type Result<T> = std::result::Result<T, CliError>;
