use std::path::{Path, PathBuf};

use ccase_core::{Change, starts_with_ignore_case};

use crate::error::{CliError, Result};
use crate::output::format_rollback;
use crate::session::{LogProgress, ViewSession};

pub(crate) fn run(start_path: &Path, paths: &[PathBuf]) -> Result<()> {
    let mut session = ViewSession::open(start_path)?;
    let targets = paths
        .iter()
        .map(|path| session.resolve(path))
        .collect::<Result<Vec<_>>>()?;

    let scope = session.full_scope();
    let report = session.classify(&scope)?;

    let changes: Vec<Change> = report
        .changes
        .iter()
        .map(|reported| &reported.change)
        .filter(|change| touches(change, &targets))
        .cloned()
        .collect();
    let missing: Vec<PathBuf> = report
        .locally_deleted
        .iter()
        .map(|deleted| deleted.path.clone())
        .filter(|path| is_targeted(path, &targets))
        .collect();

    if changes.is_empty() && missing.is_empty() {
        session.save()?;
        println!("Nothing to revert.");
        return Ok(());
    }

    let mut errors = Vec::new();
    let (mut environment, state) = session.rollback();
    let mut processed = environment
        .rollback_changes(&changes, state, &mut errors, &LogProgress)
        .processed;
    if !missing.is_empty() {
        environment.rollback_missing_file_deletion(&missing, state, &mut errors, &LogProgress);
        processed.extend(missing);
    }
    session.save()?;

    print!("{}", format_rollback(&processed, &errors, session.root()));

    let failed = errors.iter().filter(|error| !error.is_warning()).count();
    if failed > 0 {
        return Err(CliError::RollbackFailed(failed));
    }
    Ok(())
}

fn is_targeted(path: &Path, targets: &[PathBuf]) -> bool {
    targets
        .iter()
        .any(|target| starts_with_ignore_case(path, target))
}

/// A rename is reverted when either of its names was asked for.
fn touches(change: &Change, targets: &[PathBuf]) -> bool {
    [change.before_path(), change.after_path()]
        .into_iter()
        .flatten()
        .any(|path| is_targeted(path, targets))
}
