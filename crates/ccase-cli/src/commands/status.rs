use std::path::{Path, PathBuf};

use crate::error::Result;
use crate::output::{JsonStatusFormatter, PlainTextStatusFormatter, StatusFormatter};
use crate::session::ViewSession;

pub(crate) fn run(start_path: &Path, paths: &[PathBuf], json: bool) -> Result<()> {
    let mut session = ViewSession::open(start_path)?;

    let scope = if paths.is_empty() {
        session.full_scope()
    } else {
        let resolved = paths
            .iter()
            .map(|path| session.resolve(path))
            .collect::<Result<Vec<_>>>()?;
        ViewSession::scope_for(&resolved)
    };

    let report = session.classify(&scope)?;
    session.save()?;

    let output = if json {
        JsonStatusFormatter.format_status(&report, session.root())?
    } else {
        PlainTextStatusFormatter {
            offline: session.is_offline(),
        }
        .format_status(&report, session.root())?
    };
    print!("{output}");

    Ok(())
}
