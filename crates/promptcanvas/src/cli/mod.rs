//! Command-line interface module.
//!
//! Subcommand definitions and their handlers for the promptcanvas binary.

mod commands;
mod run;

pub use commands::{Cli, Commands, OutputFormat};
pub use run::{compile_command, probe_command, run_command};
