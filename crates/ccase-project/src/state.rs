use std::fs;
use std::io::ErrorKind;
use std::path::Path;

use ccase_core::TrackingState;
use tracing::debug;

use crate::error::ProjectError;

pub const STATE_FILENAME: &str = "state.toml";

/// Loads the tracking state kept in `state_dir`. A missing file is an
/// empty state.
///
/// # Errors
///
/// Returns an error if the file exists but cannot be read or parsed.
pub fn load_tracking_state(state_dir: &Path) -> Result<TrackingState, ProjectError> {
    let path = state_dir.join(STATE_FILENAME);
    let content = match fs::read_to_string(&path) {
        Ok(content) => content,
        Err(e) if e.kind() == ErrorKind::NotFound => return Ok(TrackingState::default()),
        Err(source) => return Err(ProjectError::StateRead { path, source }),
    };

    toml::from_str(&content).map_err(|source| ProjectError::StateParse { path, source })
}

/// Writes the tracking state into `state_dir`, creating the directory when
/// needed. An empty state removes the file instead.
///
/// # Errors
///
/// Returns an error if the state cannot be serialized or written.
pub fn save_tracking_state(state_dir: &Path, state: &TrackingState) -> Result<(), ProjectError> {
    let path = state_dir.join(STATE_FILENAME);

    if state.is_empty() {
        return match fs::remove_file(&path) {
            Ok(()) => {
                debug!(path = %path.display(), "removed empty tracking state");
                Ok(())
            }
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(()),
            Err(source) => Err(ProjectError::StateWrite { path, source }),
        };
    }

    let content = toml::to_string_pretty(state).map_err(|source| ProjectError::StateSerialize {
        path: path.clone(),
        source,
    })?;
    fs::create_dir_all(state_dir).map_err(|source| ProjectError::StateWrite {
        path: path.clone(),
        source,
    })?;
    fs::write(&path, content).map_err(|source| ProjectError::StateWrite {
        path: path.clone(),
        source,
    })?;

    debug!(path = %path.display(), "saved tracking state");
    Ok(())
}
