use std::path::PathBuf;

use thiserror::Error;

/// Fragments of the messages cleartool prints when the albd server cannot be reached.
const SERVER_DOWN_SIGNATURES: &[&str] = &["albd_server"];

/// Messages cleartool prints when the snapshot view itself cannot be used.
const VIEW_UNREACHABLE_SIGNATURES: &[&str] = &[
    "Unable to open snapshot view",
    "Unable to establish connection to snapshot view",
];

#[derive(Debug, Error)]
pub enum ToolError {
    #[error("failed to launch '{program}'")]
    Launch {
        program: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("cleartool {command} failed: {output}")]
    CommandFailed { command: String, output: String },

    #[error("unexpected cleartool output: {0}")]
    InvalidOutput(String),
}

impl ToolError {
    /// The text cleartool reported, or the launch failure description.
    #[must_use]
    pub fn message(&self) -> String {
        match self {
            Self::Launch { source, .. } => source.to_string(),
            Self::CommandFailed { output, .. } => output.clone(),
            Self::InvalidOutput(line) => line.clone(),
        }
    }

    #[must_use]
    pub fn is_server_down(&self) -> bool {
        is_server_down_message(&self.message())
    }

    #[must_use]
    pub fn is_view_unreachable(&self) -> bool {
        let message = self.message();
        VIEW_UNREACHABLE_SIGNATURES
            .iter()
            .any(|sig| message.contains(sig))
    }
}

#[must_use]
pub fn is_server_down_message(message: &str) -> bool {
    SERVER_DOWN_SIGNATURES.iter().any(|sig| message.contains(sig))
}
