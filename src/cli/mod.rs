//! CLI module for sigrok-dev - command-line interface and subcommands.

pub mod commands;

pub use commands::Cli;
