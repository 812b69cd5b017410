//! CLI command definitions using clap.
//!
//! Defines the main CLI structure and subcommands:
//! - locate: resolve and print the sigrok-cli path
//! - run: pass arguments straight through to sigrok-cli
//! - import: convert a capture file into a sigrok session file

use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// sigrok-dev - locate and drive sigrok-cli
#[derive(Parser, Debug)]
#[command(name = "sigrok-dev")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Optional config file path
    #[arg(short, long, global = true)]
    pub config: Option<PathBuf>,

    /// Verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Subcommand to execute
    #[command(subcommand)]
    pub command: Commands,
}

impl Cli {
    /// Check if verbose mode is enabled
    pub fn is_verbose(&self) -> bool {
        self.verbose
    }
}

/// Main subcommands
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Find sigrok-cli and print its path
    Locate,

    /// Run sigrok-cli with the given arguments
    Run {
        /// Timeout in seconds (default from config)
        #[arg(short, long)]
        timeout: Option<u64>,

        /// Arguments passed to sigrok-cli
        #[arg(trailing_var_arg = true, allow_hyphen_values = true)]
        args: Vec<String>,
    },

    /// Import a capture file into a sigrok session file
    Import {
        /// Input capture file
        input: PathBuf,

        /// Output session file
        output: PathBuf,

        /// Input format (default from config, normally vcd)
        #[arg(short, long)]
        format: Option<String>,

        /// Timeout in seconds (default from config)
        #[arg(short, long)]
        timeout: Option<u64>,
    },
}
