//! Experiment plan command.

use anyhow::Result;
use clap::Args;

use super::AgentOverrides;
use crate::cli::output::{output, CommandOutput};
use crate::domain::models::{Config, Dataset, ExperimentPlan, PhaseCatalog};

#[derive(Args, Debug)]
pub struct PlanArgs {
    /// Road network (jinan, hangzhou, newyork_28x7)
    #[arg(short, long, default_value = "jinan")]
    pub dataset: String,

    /// Traffic file of the dataset; the first known file when omitted
    #[arg(short, long)]
    pub traffic_file: Option<String>,

    /// List the known traffic files of the dataset instead
    #[arg(long)]
    pub list_files: bool,

    #[command(flatten)]
    pub overrides: AgentOverrides,
}

#[derive(Debug, serde::Serialize)]
#[serde(untagged)]
pub enum PlanOutput {
    Plan(Box<ExperimentPlan>),
    Files {
        dataset: Dataset,
        traffic_files: Vec<String>,
    },
}

impl CommandOutput for PlanOutput {
    fn to_human(&self) -> String {
        match self {
            Self::Plan(plan) => {
                let intersections = plan.intersection_names();
                let preview = intersections
                    .first()
                    .zip(intersections.last())
                    .map(|(first, last)| format!("{first} .. {last}"))
                    .unwrap_or_default();
                [
                    format!("Run:            {}", plan.run_id),
                    format!("Dataset:        {} ({})", plan.dataset, plan.dataset.template()),
                    format!("Traffic file:   {}", plan.traffic_file),
                    format!("Road network:   {}", plan.road_net),
                    format!("Intersections:  {} [{preview}]", plan.num_intersections),
                    format!("Run seconds:    {}", plan.run_seconds),
                    format!(
                        "Phases:         {} [{}]",
                        plan.catalog,
                        plan.simulator_phases.join(", ")
                    ),
                    format!("Agent:          {} ({})", plan.agent, plan.model),
                    format!("Log directory:  {}", plan.log_dir.display()),
                ]
                .join("\n")
            }
            Self::Files {
                dataset,
                traffic_files,
            } => {
                let mut lines = vec![format!("Traffic files for {dataset}:")];
                lines.extend(traffic_files.iter().map(|f| format!("  {f}")));
                lines.join("\n")
            }
        }
    }
}

pub fn execute(args: &PlanArgs, config: &Config, json_mode: bool) -> Result<()> {
    let config = args.overrides.apply(config.clone())?;
    let dataset: Dataset = args.dataset.parse()?;

    if args.list_files {
        let result = PlanOutput::Files {
            dataset,
            traffic_files: dataset
                .traffic_files()
                .iter()
                .map(ToString::to_string)
                .collect(),
        };
        output(&result, json_mode);
        return Ok(());
    }

    let traffic_file = args
        .traffic_file
        .as_deref()
        .or_else(|| dataset.traffic_files().first().copied())
        .unwrap_or_default();

    let plan = ExperimentPlan::new(
        dataset,
        traffic_file,
        PhaseCatalog::from_phase_count(config.agent.phase_count)?,
        config.agent.kind,
        &config.llm.model,
        &config.episode_log.root_dir,
    )?;

    output(&PlanOutput::Plan(Box::new(plan)), json_mode);
    Ok(())
}
