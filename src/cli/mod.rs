//! CLI module for todo - command-line interface and subcommands.

pub mod commands;

pub use commands::{Action, Cli};
