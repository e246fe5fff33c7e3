//! Drive one agent per intersection over a recorded state trace.

use anyhow::{Context, Result};
use indicatif::ProgressBar;
use serde::Serialize;
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use tracing::{info, warn};

use super::agent_builder::AgentBuilder;
use crate::domain::models::{Dataset, Intersection, Phase};
use crate::domain::ports::SignalAgent;
use crate::infrastructure::state::{StateTrace, TraceStateProvider};

/// Decisions taken for one intersection.
#[derive(Debug, Clone, Default, Serialize)]
pub struct IntersectionReport {
    pub intersection: String,
    pub decisions: usize,
    /// Decisions per chosen phase
    pub actions: BTreeMap<Phase, usize>,
    /// Decisions per basis label (cascade reason or LLM outcome)
    pub reasons: BTreeMap<String, usize>,
    /// Set when the run for this intersection stopped early
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

#[derive(Debug, Clone, Serialize)]
pub struct ReplayReport {
    pub log_dir: PathBuf,
    pub intersections: Vec<IntersectionReport>,
}

impl ReplayReport {
    pub fn total_decisions(&self) -> usize {
        self.intersections.iter().map(|r| r.decisions).sum()
    }

    pub fn failures(&self) -> usize {
        self.intersections
            .iter()
            .filter(|r| r.error.is_some())
            .count()
    }
}

/// Replay `trace`, one task per intersection, writing episode logs to
/// `log_dir`. A failing intersection is reported, the others keep going.
pub async fn run_replay(
    trace: StateTrace,
    builder: &AgentBuilder,
    dataset: Dataset,
    log_dir: &Path,
    progress: Option<ProgressBar>,
) -> Result<ReplayReport> {
    std::fs::create_dir_all(log_dir)
        .with_context(|| format!("Failed to create log directory {}", log_dir.display()))?;

    let mut handles = Vec::new();
    for (name, provider) in trace.into_providers() {
        let agent = builder.with_episode_logs(Intersection::new(name), log_dir, dataset)?;
        let progress = progress.clone();
        handles.push(tokio::spawn(drive(agent, provider, progress)));
    }

    // Providers come out in intersection order, so the reports do too
    let mut reports = Vec::new();
    for handle in handles {
        let report = handle.await.context("Replay task panicked")?;
        if let Some(err) = &report.error {
            warn!(intersection = %report.intersection, error = %err, "replay stopped early");
        }
        reports.push(report);
    }

    if let Some(progress) = progress {
        progress.finish_and_clear();
    }

    let report = ReplayReport {
        log_dir: log_dir.to_path_buf(),
        intersections: reports,
    };
    info!(
        intersections = report.intersections.len(),
        decisions = report.total_decisions(),
        failures = report.failures(),
        "replay finished"
    );
    Ok(report)
}

async fn drive(
    mut agent: Box<dyn SignalAgent>,
    mut provider: TraceStateProvider,
    progress: Option<ProgressBar>,
) -> IntersectionReport {
    let mut report = IntersectionReport {
        intersection: agent.intersection().name.clone(),
        ..IntersectionReport::default()
    };

    while provider.remaining() > 0 {
        if let Err(err) = agent.choose_action(&mut provider).await {
            report.error = Some(err.to_string());
            break;
        }

        report.decisions += 1;
        *report.actions.entry(agent.last_action()).or_default() += 1;
        if let Some(basis) = agent.last_basis() {
            *report.reasons.entry(basis.label().to_string()).or_default() += 1;
        }
        if let Some(progress) = &progress {
            progress.inc(1);
        }
    }

    report
}
