//! CLI type definitions
//!
//! This module contains the clap structures that define the CLI interface.

use clap::{Parser, Subcommand};
use std::path::PathBuf;

use super::commands::decide::DecideArgs;
use super::commands::plan::PlanArgs;
use super::commands::replay::ReplayArgs;

#[derive(Parser, Debug)]
#[command(name = "tsc-agent")]
#[command(about = "Traffic-signal control agents: rule cascade and LLM", long_about = None)]
#[command(version)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Output in JSON format
    #[arg(short, long, global = true)]
    pub json: bool,

    /// Configuration file (defaults to .tsc-agent/config.yaml)
    #[arg(short, long, global = true, env = "TSC_AGENT_CONFIG")]
    pub config: Option<PathBuf>,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Decide the next phase for one state snapshot
    Decide(DecideArgs),

    /// Run agents over a recorded state trace and write episode logs
    Replay(ReplayArgs),

    /// Show the run parameters for a dataset and traffic file
    Plan(PlanArgs),
}
