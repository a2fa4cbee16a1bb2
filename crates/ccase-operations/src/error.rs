use std::fmt;
use std::path::{Path, PathBuf};

use thiserror::Error;

#[derive(Debug, Error)]
pub enum OperationError {
    #[error(transparent)]
    Tool(#[from] ccase_cleartool::ToolError),

    #[error(transparent)]
    Project(#[from] ccase_project::ProjectError),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("failed to walk '{path}'")]
    Walk {
        path: PathBuf,
        #[source]
        source: ignore::Error,
    },

    /// Talking to ClearCase failed. When the server was unreachable the
    /// shared configuration has been switched to offline mode.
    #[error("{message}")]
    Reconciliation {
        message: String,
        switched_offline: bool,
    },

    #[error("{message}")]
    Unexpected { message: String },

    #[error("internal invariant violated: {0}")]
    InvariantViolation(String),
}

pub type Result<T> = std::result::Result<T, OperationError>;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Severity {
    Warning,
    Error,
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Warning => write!(f, "warning"),
            Self::Error => write!(f, "error"),
        }
    }
}

/// A problem with one item of a rollback. Collected by the caller rather
/// than aborting the batch.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VcsError {
    pub severity: Severity,
    pub message: String,
    pub path: Option<PathBuf>,
}

impl VcsError {
    #[must_use]
    pub fn warning(message: impl Into<String>) -> Self {
        Self {
            severity: Severity::Warning,
            message: message.into(),
            path: None,
        }
    }

    #[must_use]
    pub fn error(message: impl Into<String>) -> Self {
        Self {
            severity: Severity::Error,
            message: message.into(),
            path: None,
        }
    }

    #[must_use]
    pub fn for_path(mut self, path: &Path) -> Self {
        self.path = Some(path.to_path_buf());
        self
    }

    #[must_use]
    pub fn is_warning(&self) -> bool {
        self.severity == Severity::Warning
    }
}

impl fmt::Display for VcsError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.path {
            Some(path) => write!(f, "{}: {}: {}", self.severity, path.display(), self.message),
            None => write!(f, "{}: {}", self.severity, self.message),
        }
    }
}

impl std::error::Error for VcsError {}
