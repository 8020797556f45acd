//! promptcanvas command-line entry point.

mod cli;

use clap::Parser;
use cli::{Cli, Commands, compile_command, probe_command, run_command};
use promptcanvas::{CoordinatorConfig, init_tracing, load_dotenv};
use tracing::info;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    load_dotenv();
    init_tracing()?;

    let cli = Cli::parse();
    let config = match &cli.config {
        Some(path) => CoordinatorConfig::from_file(path)?.with_env_overrides(),
        None => CoordinatorConfig::from_env(),
    };
    info!(host = %config.default_host(), model = %config.default_model(), "Configuration loaded");

    match cli.command {
        Commands::Run {
            prompts,
            muted,
            host,
            model,
            compare,
            format,
        } => run_command(config, prompts, muted, host, model, compare, format).await?,
        Commands::Compile { prompts, muted } => compile_command(prompts, muted),
        Commands::Probe { host } => {
            if !probe_command(config, host).await? {
                std::process::exit(1);
            }
        }
    }
    Ok(())
}
