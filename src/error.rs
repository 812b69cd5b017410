//! Error types for sigrok-dev
//!
//! Centralized error handling using thiserror.

use std::path::PathBuf;
use std::time::Duration;
use thiserror::Error;

/// Ways an invocation of the external tool can fail before producing output
#[derive(Debug, Error)]
pub enum SigrokError {
    /// No search-path hit and no candidate location verified
    #[error("sigrok-cli not found")]
    NotFound,

    /// Process exceeded its allotted time and was killed
    #[error("timed out after {} seconds", .0.as_secs_f64())]
    Timeout(Duration),

    /// Process could not be launched or waited on
    #[error("failed to run {}: {source}", .program.display())]
    Spawn {
        program: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

/// Result type alias for sigrok-dev operations
pub type Result<T> = std::result::Result<T, SigrokError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_not_found_error() {
        let err = SigrokError::NotFound;
        assert_eq!(err.to_string(), "sigrok-cli not found");
    }

    #[test]
    fn test_timeout_error() {
        let err = SigrokError::Timeout(Duration::from_secs(10));
        assert_eq!(err.to_string(), "timed out after 10 seconds");
    }

    #[test]
    fn test_timeout_error_fractional() {
        let err = SigrokError::Timeout(Duration::from_millis(250));
        assert_eq!(err.to_string(), "timed out after 0.25 seconds");
    }

    #[test]
    fn test_spawn_error() {
        let err = SigrokError::Spawn {
            program: PathBuf::from("/usr/bin/sigrok-cli"),
            source: std::io::Error::new(std::io::ErrorKind::NotFound, "No such file or directory"),
        };
        assert_eq!(
            err.to_string(),
            "failed to run /usr/bin/sigrok-cli: No such file or directory"
        );
    }

    #[test]
    fn test_spawn_error_source() {
        use std::error::Error as _;
        let err = SigrokError::Spawn {
            program: PathBuf::from("sigrok-cli"),
            source: std::io::Error::new(std::io::ErrorKind::PermissionDenied, "denied"),
        };
        assert!(err.source().is_some());
    }
}
