//! sigrok-cli wrapper
//!
//! `SigrokCli` resolves the executable once at construction and then runs it
//! with caller-supplied arguments. The `run`/`import_file` pair prints a
//! diagnostic and returns `None` when the tool is unusable; `try_run` and
//! `try_import_file` return the failure kind instead.

use colored::*;
use std::ffi::OsStr;
use std::path::{Path, PathBuf};
use std::time::Duration;

use crate::error::{Result, SigrokError};
use crate::locator::{Resolution, Source, ToolLocator};
use crate::process::{self, DEFAULT_TIMEOUT, Invocation};

/// Input format assumed by `import_file` when none is given
pub const DEFAULT_INPUT_FORMAT: &str = "vcd";

/// Output format written by `import_file`
pub const OUTPUT_FORMAT: &str = "sigrok";

/// Build the argument vector for importing `input` as `input_format` into a
/// sigrok session file at `output`.
pub fn import_args(output: &Path, input: &Path, input_format: &str) -> Vec<String> {
    vec![
        "-I".to_string(),
        input_format.to_string(),
        "-i".to_string(),
        input_format.to_string(),
        input.display().to_string(),
        "-O".to_string(),
        OUTPUT_FORMAT.to_string(),
        "-o".to_string(),
        output.display().to_string(),
    ]
}

#[derive(Debug, Clone)]
pub struct SigrokCli {
    path: Option<PathBuf>,
}

impl SigrokCli {
    /// Resolve sigrok-cli using the default search procedure
    pub async fn new() -> Self {
        Self::with_locator(&ToolLocator::default()).await
    }

    /// Resolve sigrok-cli using a custom locator
    pub async fn with_locator(locator: &ToolLocator) -> Self {
        let resolution = locator.resolve().await;
        Self::from_resolution(&resolution)
    }

    /// Wrap an already known path (or the lack of one) without searching
    pub fn from_path(path: Option<PathBuf>) -> Self {
        Self { path }
    }

    fn from_resolution(resolution: &Resolution) -> Self {
        match &resolution.path {
            Some(path) => {
                let how = match resolution.source {
                    Some(Source::SearchPath) => "Found sigrok-cli via PATH:",
                    _ => "Found sigrok-cli at:",
                };
                eprintln!("{} {}", how.green(), path.display());
            }
            None => eprintln!("{}", "✗ sigrok-cli not found.".red()),
        }
        Self {
            path: resolution.path.clone(),
        }
    }

    /// Resolved executable path
    pub fn path(&self) -> Option<&Path> {
        self.path.as_deref()
    }

    pub fn is_available(&self) -> bool {
        self.path.is_some()
    }

    /// Run sigrok-cli with `args`.
    ///
    /// Returns `None` if the tool was not resolved, timed out, or could not be
    /// launched. A nonzero exit code is still returned as `Some`.
    pub async fn run<I, S>(&self, args: I, timeout: Option<Duration>) -> Option<Invocation>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<OsStr>,
    {
        report(self.try_run(args, timeout).await)
    }

    pub async fn try_run<I, S>(&self, args: I, timeout: Option<Duration>) -> Result<Invocation>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<OsStr>,
    {
        let path = self.path.as_deref().ok_or(SigrokError::NotFound)?;
        let args: Vec<String> = args
            .into_iter()
            .map(|a| a.as_ref().to_string_lossy().into_owned())
            .collect();

        eprintln!("{} args: {}", "Running sigrok-cli".cyan(), format!("{:?}", args).bold());
        log::info!("Running {} {:?}", path.display(), args);

        let invocation = process::run_with_timeout(path, &args, timeout.unwrap_or(DEFAULT_TIMEOUT)).await?;
        log::info!("sigrok-cli exited with {:?}", invocation.exit_code);
        Ok(invocation)
    }

    /// Import `input` (read as `input_format`, default `vcd`) into a sigrok
    /// session file at `output`.
    ///
    /// File existence and format names are left for sigrok-cli to check.
    pub async fn import_file(
        &self,
        output: &Path,
        input: &Path,
        input_format: Option<&str>,
        timeout: Option<Duration>,
    ) -> Option<Invocation> {
        report(self.try_import_file(output, input, input_format, timeout).await)
    }

    pub async fn try_import_file(
        &self,
        output: &Path,
        input: &Path,
        input_format: Option<&str>,
        timeout: Option<Duration>,
    ) -> Result<Invocation> {
        if !self.is_available() {
            return Err(SigrokError::NotFound);
        }
        let args = import_args(output, input, input_format.unwrap_or(DEFAULT_INPUT_FORMAT));
        self.try_run(&args, timeout).await
    }
}

/// Print the diagnostic for a failed invocation and drop the error
fn report(result: Result<Invocation>) -> Option<Invocation> {
    match result {
        Ok(invocation) => Some(invocation),
        Err(SigrokError::NotFound) => {
            eprintln!("{}", "✗ sigrok-cli not found.".red());
            None
        }
        Err(e) => {
            eprintln!("{} {}", "Error occurred while running sigrok-cli:".red(), e);
            log::error!("sigrok-cli invocation failed: {}", e);
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_import_args_default_format() {
        let args = import_args(Path::new("out.sr"), Path::new("in.vcd"), DEFAULT_INPUT_FORMAT);
        assert_eq!(
            args,
            vec!["-I", "vcd", "-i", "vcd", "in.vcd", "-O", "sigrok", "-o", "out.sr"]
        );
    }

    #[test]
    fn test_import_args_csv() {
        let args = import_args(Path::new("/tmp/out.sr"), Path::new("/tmp/in.csv"), "csv");
        assert_eq!(
            args,
            vec!["-I", "csv", "-i", "csv", "/tmp/in.csv", "-O", "sigrok", "-o", "/tmp/out.sr"]
        );
    }

    #[test]
    fn test_import_args_no_validation() {
        let args = import_args(Path::new(""), Path::new("missing.xyz"), "not-a-format");
        assert_eq!(args[1], "not-a-format");
        assert_eq!(args[3], "not-a-format");
        assert_eq!(args[4], "missing.xyz");
        assert_eq!(args[8], "");
    }

    #[test]
    fn test_from_path_none() {
        let cli = SigrokCli::from_path(None);
        assert!(!cli.is_available());
        assert!(cli.path().is_none());
    }

    #[test]
    fn test_from_path_some() {
        let cli = SigrokCli::from_path(Some(PathBuf::from("/usr/bin/sigrok-cli")));
        assert!(cli.is_available());
        assert_eq!(cli.path(), Some(Path::new("/usr/bin/sigrok-cli")));
    }

    #[tokio::test]
    async fn test_new_state_matches_path() {
        let cli = SigrokCli::new().await;
        assert_eq!(cli.is_available(), cli.path().is_some());
    }

    #[tokio::test]
    async fn test_try_run_not_found() {
        let cli = SigrokCli::from_path(None);
        let result = cli.try_run(["--version"], None).await;
        assert!(matches!(result, Err(SigrokError::NotFound)));
    }

    #[tokio::test]
    async fn test_run_not_found_returns_none() {
        let cli = SigrokCli::from_path(None);
        assert!(cli.run(["--list-devices"], None).await.is_none());
    }

    #[tokio::test]
    async fn test_import_not_found_returns_none() {
        let cli = SigrokCli::from_path(None);
        let result = cli
            .import_file(Path::new("out.sr"), Path::new("in.vcd"), None, None)
            .await;
        assert!(result.is_none());
    }

    #[tokio::test]
    async fn test_try_import_not_found() {
        let cli = SigrokCli::from_path(None);
        let result = cli
            .try_import_file(Path::new("out.sr"), Path::new("in.vcd"), Some("csv"), None)
            .await;
        assert!(matches!(result, Err(SigrokError::NotFound)));
    }

    #[tokio::test]
    async fn test_run_missing_binary_returns_none() {
        let cli = SigrokCli::from_path(Some(PathBuf::from("/nonexistent/dir/sigrok-cli")));
        assert!(cli.run(["--version"], None).await.is_none());
    }
}
