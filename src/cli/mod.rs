//! Command-line interface.

pub mod commands;
pub mod output;
pub mod types;

use anyhow::Result;

use crate::domain::models::Config;
use crate::infrastructure::config::ConfigLoader;

pub use types::{Cli, Commands};

/// Configuration from `--config` when given, otherwise the project layers.
pub fn load_config(cli: &Cli) -> Result<Config> {
    match &cli.config {
        Some(path) => ConfigLoader::load_from_file(path),
        None => ConfigLoader::load(),
    }
}

/// Print a command failure with its cause chain.
pub fn handle_error(err: &anyhow::Error, json_mode: bool) {
    if json_mode {
        let causes: Vec<String> = err.chain().skip(1).map(ToString::to_string).collect();
        let body = serde_json::json!({
            "error": err.to_string(),
            "causes": causes,
        });
        eprintln!("{}", serde_json::to_string_pretty(&body).unwrap_or_default());
    } else {
        eprintln!("Error: {err:#}");
    }
}

/// Dispatch a parsed command line against the loaded configuration.
pub async fn run(cli: Cli, config: Config) -> Result<()> {
    match cli.command {
        Commands::Decide(args) => commands::decide::execute(args, config, cli.json).await,
        Commands::Replay(args) => commands::replay::execute(args, config, cli.json).await,
        Commands::Plan(args) => commands::plan::execute(&args, &config, cli.json),
    }
}
