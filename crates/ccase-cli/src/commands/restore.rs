use std::path::{Path, PathBuf};

use crate::error::{CliError, Result};
use crate::output::format_rollback;
use crate::session::{LogProgress, ViewSession};

pub(crate) fn run(start_path: &Path, paths: &[PathBuf]) -> Result<()> {
    let mut session = ViewSession::open(start_path)?;
    let targets = paths
        .iter()
        .map(|path| session.resolve(path))
        .collect::<Result<Vec<_>>>()?;
    let (missing, present): (Vec<PathBuf>, Vec<PathBuf>) =
        targets.into_iter().partition(|path| !path.exists());

    let mut errors = Vec::new();
    let (mut environment, state) = session.rollback();
    if !missing.is_empty() {
        environment.rollback_missing_file_deletion(&missing, state, &mut errors, &LogProgress);
    }
    if !present.is_empty() {
        environment.rollback_modified_without_checkout(&present, &mut errors, &LogProgress);
    }
    session.save()?;

    let processed: Vec<PathBuf> = missing.into_iter().chain(present).collect();
    print!("{}", format_rollback(&processed, &errors, session.root()));

    let failed = errors.iter().filter(|error| !error.is_warning()).count();
    if failed > 0 {
        return Err(CliError::RollbackFailed(failed));
    }
    Ok(())
}
