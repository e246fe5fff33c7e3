//! Trace replay command.

use anyhow::{Context, Result};
use chrono::Local;
use clap::Args;
use serde::Serialize;
use std::path::PathBuf;

use super::AgentOverrides;
use crate::application::{run_replay, AgentBuilder, ReplayReport};
use crate::cli::output::{list_table, output, progress_bar, CommandOutput};
use crate::domain::models::{run_log_dir, Config, Dataset};
use crate::infrastructure::state::StateTrace;

#[derive(Args, Debug)]
pub struct ReplayArgs {
    /// JSON-lines trace: one `{step, intersection, state}` object per line
    pub trace: PathBuf,

    /// Dataset label used in episode log file names
    #[arg(short, long, default_value = "jinan")]
    pub dataset: String,

    /// Write episode logs here instead of a fresh timestamped run directory
    #[arg(short, long)]
    pub log_dir: Option<PathBuf>,

    #[command(flatten)]
    pub overrides: AgentOverrides,
}

#[derive(Debug, Serialize)]
pub struct ReplayOutput {
    #[serde(flatten)]
    pub report: ReplayReport,
    pub total_decisions: usize,
    pub failures: usize,
}

impl From<ReplayReport> for ReplayOutput {
    fn from(report: ReplayReport) -> Self {
        Self {
            total_decisions: report.total_decisions(),
            failures: report.failures(),
            report,
        }
    }
}

impl CommandOutput for ReplayOutput {
    fn to_human(&self) -> String {
        let mut table = list_table(&["intersection", "decisions", "actions", "reasons", "error"]);
        for row in &self.report.intersections {
            let actions = row
                .actions
                .iter()
                .map(|(phase, n)| format!("{phase}={n}"))
                .collect::<Vec<_>>()
                .join(" ");
            let reasons = row
                .reasons
                .iter()
                .map(|(reason, n)| format!("{reason}: {n}"))
                .collect::<Vec<_>>()
                .join(", ");
            table.add_row(vec![
                row.intersection.clone(),
                row.decisions.to_string(),
                actions,
                reasons,
                row.error.clone().unwrap_or_default(),
            ]);
        }

        format!(
            "{table}\n\n{} decisions over {} intersections ({} failed)\nEpisode logs: {}",
            self.total_decisions,
            self.report.intersections.len(),
            self.failures,
            self.report.log_dir.display()
        )
    }
}

pub async fn execute(args: ReplayArgs, config: Config, json_mode: bool) -> Result<()> {
    let config = args.overrides.apply(config)?;
    let dataset: Dataset = args.dataset.parse()?;

    let trace = StateTrace::load(&args.trace)
        .with_context(|| format!("Failed to load trace {}", args.trace.display()))?;
    anyhow::ensure!(!trace.is_empty(), "Trace {} holds no states", args.trace.display());

    let builder = AgentBuilder::from_config(&config)?;
    let log_dir = args.log_dir.unwrap_or_else(|| {
        run_log_dir(
            &config.episode_log.root_dir,
            builder.kind(),
            builder.model(),
            Local::now(),
        )
    });

    let total: usize = trace.intersections().map(|name| trace.steps(name)).sum();
    let progress = progress_bar(total as u64, json_mode);

    let report = run_replay(trace, &builder, dataset, &log_dir, Some(progress)).await?;
    output(&ReplayOutput::from(report), json_mode);
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::application::IntersectionReport;
    use crate::domain::models::Phase;

    #[test]
    fn test_replay_output_counts() {
        let mut row = IntersectionReport {
            intersection: "intersection_1_1".to_string(),
            decisions: 2,
            ..IntersectionReport::default()
        };
        row.actions.insert(Phase::Etwt, 2);
        row.reasons.insert("Zero flow".to_string(), 2);

        let result = ReplayOutput::from(ReplayReport {
            log_dir: PathBuf::from("logs/run"),
            intersections: vec![row],
        });

        assert_eq!(result.total_decisions, 2);
        assert_eq!(result.failures, 0);
        let text = result.to_human();
        assert!(text.contains("ETWT=2"));
        assert!(text.contains("Zero flow: 2"));

        let json = result.to_json();
        assert_eq!(json["total_decisions"], 2);
        assert_eq!(json["intersections"][0]["decisions"], 2);
    }
}
