//! Single-snapshot decision command.

use anyhow::{Context, Result};
use clap::Args;
use serde::Serialize;
use std::path::PathBuf;

use super::AgentOverrides;
use crate::application::AgentBuilder;
use crate::cli::output::{output, CommandOutput};
use crate::domain::models::{
    AgentKind, Config, DecisionBasis, Intersection, Phase, PhaseCatalog, StateSnapshot,
};
use crate::domain::ports::FixedStateProvider;

#[derive(Args, Debug)]
pub struct DecideArgs {
    /// JSON file holding one state snapshot (eight lane groups)
    pub state: PathBuf,

    /// Intersection the snapshot belongs to
    #[arg(short, long, default_value = "intersection_1_1")]
    pub intersection: String,

    #[command(flatten)]
    pub overrides: AgentOverrides,
}

#[derive(Debug, Serialize)]
pub struct DecideOutput {
    pub intersection: String,
    pub agent: AgentKind,
    pub catalog: PhaseCatalog,
    pub phase: Phase,
    pub code: u32,
    pub basis: Option<DecisionBasis>,
}

impl CommandOutput for DecideOutput {
    fn to_human(&self) -> String {
        let mut lines = vec![
            format!("Intersection: {}", self.intersection),
            format!("Agent:        {} ({})", self.agent, self.catalog),
            format!("Phase:        {} (code {})", self.phase, self.code),
        ];
        if let Some(basis) = &self.basis {
            lines.push(format!("Basis:        {basis}"));
        }
        lines.join("\n")
    }
}

pub async fn execute(args: DecideArgs, config: Config, json_mode: bool) -> Result<()> {
    let config = args.overrides.apply(config)?;

    let raw = std::fs::read_to_string(&args.state)
        .with_context(|| format!("Failed to read state file {}", args.state.display()))?;
    let value: serde_json::Value = serde_json::from_str(&raw)
        .with_context(|| format!("State file {} is not JSON", args.state.display()))?;
    let state = StateSnapshot::from_json(value)?;

    let builder = AgentBuilder::from_config(&config)?;
    let mut agent = builder.in_memory(Intersection::new(args.intersection.clone()))?;
    let mut provider = FixedStateProvider::new(state);

    let code = agent.choose_action(&mut provider).await?;

    let result = DecideOutput {
        intersection: args.intersection,
        agent: builder.kind(),
        catalog: builder.catalog(),
        phase: agent.last_action(),
        code,
        basis: agent.last_basis(),
    };
    output(&result, json_mode);
    Ok(())
}
