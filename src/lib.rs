//! sigrok-dev - locate and drive sigrok-cli
//!
//! Finds the `sigrok-cli` executable on the host, runs it with bounded
//! timeouts, and wraps the capture import pattern (e.g. VCD to a sigrok
//! session file).

pub mod config;
pub mod error;
pub mod locator;
pub mod process;
pub mod sigrok;

pub use error::{Result, SigrokError};
pub use locator::{CandidateOutcome, Resolution, ToolLocator};
pub use process::Invocation;
pub use sigrok::SigrokCli;
