//! Timed execution of an external program with captured output

use std::ffi::OsStr;
use std::path::Path;
use std::process::Stdio;
use std::time::Duration;
use tokio::process::Command;

use crate::error::{Result, SigrokError};

/// Default time allowed for one invocation
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(10);

/// Captured outcome of a process that ran to completion
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Invocation {
    /// Arguments passed after the program path
    pub args: Vec<String>,
    /// Exit code, `None` when the process was ended by a signal
    pub exit_code: Option<i32>,
    pub stdout: String,
    pub stderr: String,
}

impl Invocation {
    /// True if the process exited with status 0
    pub fn success(&self) -> bool {
        self.exit_code == Some(0)
    }
}

/// Run `program` with `args`, waiting at most `timeout`.
///
/// The child is killed if the timeout elapses. A nonzero exit status is
/// returned as a normal `Invocation`; only launch failures and timeouts are
/// errors.
pub async fn run_with_timeout<I, S>(program: &Path, args: I, timeout: Duration) -> Result<Invocation>
where
    I: IntoIterator<Item = S>,
    S: AsRef<OsStr>,
{
    let args: Vec<String> = args
        .into_iter()
        .map(|a| a.as_ref().to_string_lossy().into_owned())
        .collect();

    log::debug!("exec {} {:?} (timeout {:?})", program.display(), args, timeout);

    let output = tokio::time::timeout(
        timeout,
        Command::new(program)
            .args(&args)
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .kill_on_drop(true)
            .output(),
    )
    .await
    .map_err(|_| SigrokError::Timeout(timeout))?
    .map_err(|source| SigrokError::Spawn {
        program: program.to_path_buf(),
        source,
    })?;

    Ok(Invocation {
        args,
        exit_code: output.status.code(),
        stdout: String::from_utf8_lossy(&output.stdout).into_owned(),
        stderr: String::from_utf8_lossy(&output.stderr).into_owned(),
    })
}
