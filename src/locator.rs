//! Executable discovery for sigrok-cli
//!
//! Resolution order:
//! 1. the executable search path (`PATH`), accepted without verification
//! 2. a fixed list of well-known install locations, each verified by running
//!    it with `--version`
//!
//! The first hit wins. Every candidate examined is recorded in a
//! [`Resolution`] so the scan can be inspected after the fact.

use std::ffi::OsString;
use std::path::{Path, PathBuf};
use std::time::Duration;

use crate::error::SigrokError;
use crate::process::{self, DEFAULT_TIMEOUT};

/// Name of the executable looked up on the search path
pub const PROGRAM_NAME: &str = "sigrok-cli";

/// Argument used to check that a candidate actually runs
pub const VERIFY_ARG: &str = "--version";

/// Well-known install locations, checked in order after the search path
pub const COMMON_LOCATIONS: &[&str] = &[
    // Windows
    "C:\\Program Files\\sigrok\\sigrok-cli\\sigrok-cli.exe",
    "C:\\Program Files (x86)\\sigrok\\sigrok-cli\\sigrok-cli.exe",
    "C:\\sigrok\\sigrok-cli\\sigrok-cli.exe",
    // Linux / macOS
    "/usr/bin/sigrok-cli",
    "/usr/local/bin/sigrok-cli",
    "/opt/sigrok/bin/sigrok-cli",
    "/opt/homebrew/bin/sigrok-cli",
    // Portable / development trees
    "./sigrok-cli",
    "../sigrok-cli/sigrok-cli",
];

/// Where the resolved path came from
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Source {
    SearchPath,
    Candidate,
}

/// What happened to one candidate location during the scan
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CandidateOutcome {
    Missing,
    NotAFile,
    /// Ran but `--version` exited nonzero (or was killed by a signal)
    Failed { exit_code: Option<i32> },
    TimedOut,
    Error { message: String },
    Verified,
}

impl CandidateOutcome {
    fn describe(&self) -> String {
        match self {
            Self::Missing => "does not exist".to_string(),
            Self::NotAFile => "not a regular file".to_string(),
            Self::Failed { exit_code: Some(code) } => format!("--version exited with {}", code),
            Self::Failed { exit_code: None } => "--version terminated by signal".to_string(),
            Self::TimedOut => "--version timed out".to_string(),
            Self::Error { message } => format!("could not run: {}", message),
            Self::Verified => "verified".to_string(),
        }
    }
}

/// Result of one resolution pass
#[derive(Debug, Clone, Default)]
pub struct Resolution {
    /// Selected executable, if any
    pub path: Option<PathBuf>,
    pub source: Option<Source>,
    /// Candidates examined, in scan order
    pub attempts: Vec<(PathBuf, CandidateOutcome)>,
}

impl Resolution {
    pub fn is_found(&self) -> bool {
        self.path.is_some()
    }
}

/// Configurable resolver for the sigrok-cli executable
#[derive(Debug, Clone)]
pub struct ToolLocator {
    program: String,
    /// `None` means use the process `PATH`
    search_path: Option<OsString>,
    candidates: Vec<PathBuf>,
    verify_timeout: Duration,
}

impl Default for ToolLocator {
    fn default() -> Self {
        Self {
            program: PROGRAM_NAME.to_string(),
            search_path: None,
            candidates: COMMON_LOCATIONS.iter().map(PathBuf::from).collect(),
            verify_timeout: DEFAULT_TIMEOUT,
        }
    }
}

impl ToolLocator {
    pub fn new() -> Self {
        Self::default()
    }

    /// Override the program name looked up on the search path
    pub fn program(mut self, name: impl Into<String>) -> Self {
        self.program = name.into();
        self
    }

    /// Search these directories instead of the process `PATH`
    pub fn search_path(mut self, paths: impl Into<OsString>) -> Self {
        self.search_path = Some(paths.into());
        self
    }

    /// Replace the candidate list
    pub fn candidates<I, P>(mut self, candidates: I) -> Self
    where
        I: IntoIterator<Item = P>,
        P: Into<PathBuf>,
    {
        self.candidates = candidates.into_iter().map(Into::into).collect();
        self
    }

    /// Append candidates after the existing ones
    pub fn extra_candidates<I, P>(mut self, extra: I) -> Self
    where
        I: IntoIterator<Item = P>,
        P: Into<PathBuf>,
    {
        self.candidates.extend(extra.into_iter().map(Into::into));
        self
    }

    pub fn verify_timeout(mut self, timeout: Duration) -> Self {
        self.verify_timeout = timeout;
        self
    }

    pub fn get_candidates(&self) -> &[PathBuf] {
        &self.candidates
    }

    /// Run the full resolution pass
    pub async fn resolve(&self) -> Resolution {
        if let Some(path) = self.lookup_search_path() {
            log::info!("Found {} via PATH: {}", self.program, path.display());
            return Resolution {
                path: Some(path),
                source: Some(Source::SearchPath),
                attempts: Vec::new(),
            };
        }

        let mut resolution = Resolution::default();
        for candidate in &self.candidates {
            let outcome = self.check_candidate(candidate).await;
            let verified = outcome == CandidateOutcome::Verified;
            if verified {
                log::info!("Found {} at: {}", self.program, candidate.display());
            } else {
                log::debug!("Skipping {}: {}", candidate.display(), outcome.describe());
            }
            resolution.attempts.push((candidate.clone(), outcome));
            if verified {
                resolution.path = Some(candidate.clone());
                resolution.source = Some(Source::Candidate);
                break;
            }
        }

        if !resolution.is_found() {
            log::warn!(
                "{} not found on PATH or in {} candidate locations",
                self.program,
                self.candidates.len()
            );
        }
        resolution
    }

    fn lookup_search_path(&self) -> Option<PathBuf> {
        let found = match &self.search_path {
            Some(paths) => {
                let cwd = std::env::current_dir().unwrap_or_else(|_| PathBuf::from("."));
                which::which_in(&self.program, Some(paths), cwd)
            }
            None => which::which(&self.program),
        };
        match found {
            Ok(path) => Some(path),
            Err(e) => {
                log::debug!("{} not on search path: {}", self.program, e);
                None
            }
        }
    }

    async fn check_candidate(&self, candidate: &Path) -> CandidateOutcome {
        if !candidate.exists() {
            return CandidateOutcome::Missing;
        }
        if !candidate.is_file() {
            return CandidateOutcome::NotAFile;
        }
        match process::run_with_timeout(candidate, [VERIFY_ARG], self.verify_timeout).await {
            Ok(invocation) if invocation.success() => CandidateOutcome::Verified,
            Ok(invocation) => CandidateOutcome::Failed {
                exit_code: invocation.exit_code,
            },
            Err(SigrokError::Timeout(_)) => CandidateOutcome::TimedOut,
            Err(e) => CandidateOutcome::Error { message: e.to_string() },
        }
    }
}
