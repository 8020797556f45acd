//! Command definitions.

use clap::{Parser, Subcommand, ValueEnum};
use std::path::PathBuf;

/// Compose prompts from cards and compare model responses.
#[derive(Parser, Debug)]
#[command(name = "promptcanvas")]
#[command(version)]
pub struct Cli {
    /// TOML file with coordinator defaults
    #[arg(short, long, global = true)]
    pub config: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Commands,
}

/// Available subcommands.
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Build a stack from prompt cards and generate a response
    Run {
        /// Prompt card text, in order
        #[arg(short, long = "prompt", required = true)]
        prompts: Vec<String>,

        /// Prompt card text that is added muted
        #[arg(long = "muted")]
        muted: Vec<String>,

        /// Ollama host (defaults to the configured host)
        #[arg(long)]
        host: Option<String>,

        /// Model name (defaults to the configured model)
        #[arg(short, long)]
        model: Option<String>,

        /// Also run a comparison stack against each of these models
        #[arg(long = "compare")]
        compare: Vec<String>,

        /// Output format
        #[arg(long, value_enum, default_value = "human")]
        format: OutputFormat,
    },

    /// Print the prompt a stack of cards compiles to
    Compile {
        /// Prompt card text, in order
        #[arg(short, long = "prompt")]
        prompts: Vec<String>,

        /// Prompt card text that is added muted
        #[arg(long = "muted")]
        muted: Vec<String>,
    },

    /// Check whether an Ollama server answers
    Probe {
        /// Host to probe (defaults to the configured host)
        host: Option<String>,
    },
}

/// How results are printed.
#[derive(ValueEnum, Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum OutputFormat {
    /// Plain text, one block per stack
    #[default]
    Human,
    /// Stack snapshots as JSON
    Json,
}
