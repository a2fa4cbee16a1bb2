mod activity;
mod checkout;
mod status;

use std::ffi::{OsStr, OsString};
use std::path::{Path, PathBuf};
use std::process::{Command, Output};

use tracing::debug;

use crate::{Result, ToolError};

pub use activity::{parse_activity_list, parse_describe_output};
pub use status::parse_ls_output;

const DEFAULT_PROGRAM: &str = "cleartool";

/// Handle on the `cleartool` executable.
///
/// Every call is a synchronous round-trip to a child process; nothing is
/// cached here.
#[derive(Debug, Clone)]
pub struct Cleartool {
    program: PathBuf,
}

impl Default for Cleartool {
    fn default() -> Self {
        Self::new(DEFAULT_PROGRAM)
    }
}

impl Cleartool {
    #[must_use]
    pub fn new(program: impl Into<PathBuf>) -> Self {
        Self {
            program: program.into(),
        }
    }

    #[must_use]
    pub fn program(&self) -> &Path {
        &self.program
    }

    /// Runs a subcommand and returns its standard output.
    ///
    /// # Errors
    ///
    /// Returns [`ToolError::Launch`] if the process cannot be started and
    /// [`ToolError::CommandFailed`] if it exits unsuccessfully.
    pub fn run<I, S>(&self, args: I, cwd: Option<&Path>) -> Result<String>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<OsStr>,
    {
        let args = collect_args(args);
        let output = self.spawn(&args, cwd)?;

        if output.status.success() {
            Ok(String::from_utf8_lossy(&output.stdout).into_owned())
        } else {
            Err(ToolError::CommandFailed {
                command: describe_args(&args),
                output: combined_output(&output),
            })
        }
    }

    /// Runs a subcommand and returns everything it printed, whatever the
    /// exit status.
    ///
    /// # Errors
    ///
    /// Returns [`ToolError::Launch`] if the process cannot be started.
    pub fn run_with_output<I, S>(&self, args: I, cwd: Option<&Path>) -> Result<String>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<OsStr>,
    {
        let args = collect_args(args);
        let output = self.spawn(&args, cwd)?;
        Ok(combined_output(&output))
    }

    fn spawn(&self, args: &[OsString], cwd: Option<&Path>) -> Result<Output> {
        let mut command = Command::new(&self.program);
        command.args(args);
        if let Some(dir) = cwd {
            command.current_dir(dir);
        }

        debug!(
            program = %self.program.display(),
            args = %describe_args(args),
            "running cleartool"
        );

        command.output().map_err(|source| ToolError::Launch {
            program: self.program.clone(),
            source,
        })
    }
}

/// Directory to run a single-element command from.
fn working_dir(path: &Path) -> Option<&Path> {
    path.parent().filter(|dir| !dir.as_os_str().is_empty())
}

fn collect_args<I, S>(args: I) -> Vec<OsString>
where
    I: IntoIterator<Item = S>,
    S: AsRef<OsStr>,
{
    args.into_iter().map(|a| a.as_ref().to_os_string()).collect()
}

fn describe_args(args: &[OsString]) -> String {
    args.iter()
        .map(|a| a.to_string_lossy())
        .collect::<Vec<_>>()
        .join(" ")
}

fn combined_output(output: &Output) -> String {
    let mut text = String::from_utf8_lossy(&output.stdout).into_owned();
    let stderr = String::from_utf8_lossy(&output.stderr);
    if !stderr.is_empty() {
        if !text.is_empty() && !text.ends_with('\n') {
            text.push('\n');
        }
        text.push_str(&stderr);
    }
    text
}
