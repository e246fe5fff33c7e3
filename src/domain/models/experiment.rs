//! Experiment plan: which road network, traffic file and agent a run uses.

use chrono::{DateTime, Local};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::{Path, PathBuf};
use std::str::FromStr;
use uuid::Uuid;

use super::config::AgentKind;
use super::phase::PhaseCatalog;
use crate::domain::errors::{DomainError, DomainResult};

/// Simulated seconds of a regular run.
pub const RUN_SECONDS: u64 = 3600;

/// Simulated seconds of a run on a 24h traffic file.
pub const DAY_RUN_SECONDS: u64 = 86_400;

/// Fixed-time green per phase, in seconds.
pub const FIXED_TIME_SECONDS: u32 = 30;

/// Known road networks with their recorded traffic files.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Dataset {
    Jinan,
    Hangzhou,
    #[serde(rename = "newyork_28x7")]
    NewYork28x7,
}

impl Dataset {
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Jinan => "jinan",
            Self::Hangzhou => "hangzhou",
            Self::NewYork28x7 => "newyork_28x7",
        }
    }

    /// Grid size as (rows, columns).
    pub const fn grid(self) -> (u32, u32) {
        match self {
            Self::Jinan => (3, 4),
            Self::Hangzhou => (4, 4),
            Self::NewYork28x7 => (28, 7),
        }
    }

    pub const fn template(self) -> &'static str {
        match self {
            Self::Jinan => "Jinan",
            Self::Hangzhou => "Hangzhou",
            Self::NewYork28x7 => "NewYork",
        }
    }

    pub const fn traffic_files(self) -> &'static [&'static str] {
        match self {
            Self::Jinan => &[
                "anon_3_4_jinan_real.json",
                "anon_3_4_jinan_real_2000.json",
                "anon_3_4_jinan_real_2500.json",
                "anon_3_4_jinan_synthetic_24000_60min.json",
                "anon_3_4_jinan_synthetic_24h_6000.json",
            ],
            Self::Hangzhou => &[
                "anon_4_4_hangzhou_real.json",
                "anon_4_4_hangzhou_real_5816.json",
                "anon_4_4_hangzhou_synthetic_24000_60min.json",
            ],
            Self::NewYork28x7 => &[
                "anon_28_7_newyork_real_double.json",
                "anon_28_7_newyork_real_triple.json",
            ],
        }
    }

    /// Road network identifier, e.g. `3_4`.
    pub fn road_net(self) -> String {
        let (rows, cols) = self.grid();
        format!("{rows}_{cols}")
    }
}

impl fmt::Display for Dataset {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Dataset {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "jinan" => Ok(Self::Jinan),
            "hangzhou" => Ok(Self::Hangzhou),
            "newyork_28x7" | "newyork" => Ok(Self::NewYork28x7),
            _ => Err(DomainError::UnknownDataset(s.to_string())),
        }
    }
}

/// Episode log directory of a run: `{root}/{agent}/{model}/{%m%d_%H%M%S}`.
pub fn run_log_dir(log_root: &Path, agent: AgentKind, model: &str, at: DateTime<Local>) -> PathBuf {
    log_root
        .join(agent.as_str())
        .join(model)
        .join(at.format("%m%d_%H%M%S").to_string())
}

/// Everything needed to launch one simulation run.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ExperimentPlan {
    pub run_id: Uuid,
    pub dataset: Dataset,
    pub traffic_file: String,
    pub road_net: String,
    pub rows: u32,
    pub cols: u32,
    pub num_intersections: u32,
    pub run_seconds: u64,
    pub catalog: PhaseCatalog,
    pub simulator_phases: Vec<String>,
    pub fixed_time: Vec<u32>,
    pub agent: AgentKind,
    pub model: String,
    pub log_dir: PathBuf,
    pub created_at: DateTime<Local>,
}

impl ExperimentPlan {
    pub fn new(
        dataset: Dataset,
        traffic_file: &str,
        catalog: PhaseCatalog,
        agent: AgentKind,
        model: &str,
        log_root: &Path,
    ) -> DomainResult<Self> {
        if !dataset.traffic_files().contains(&traffic_file) {
            return Err(DomainError::UnknownTrafficFile {
                dataset: dataset.to_string(),
                file: traffic_file.to_string(),
            });
        }

        let (rows, cols) = dataset.grid();
        let run_seconds = if traffic_file.contains("24h") {
            DAY_RUN_SECONDS
        } else {
            RUN_SECONDS
        };
        let created_at = Local::now();
        let log_dir = run_log_dir(log_root, agent, model, created_at);

        Ok(Self {
            run_id: Uuid::new_v4(),
            dataset,
            traffic_file: traffic_file.to_string(),
            road_net: dataset.road_net(),
            rows,
            cols,
            num_intersections: rows * cols,
            run_seconds,
            catalog,
            simulator_phases: catalog
                .simulator_phase_names()
                .into_iter()
                .map(str::to_string)
                .collect(),
            fixed_time: vec![FIXED_TIME_SECONDS; catalog.phase_count()],
            agent,
            model: model.to_string(),
            log_dir,
            created_at,
        })
    }

    /// Intersection names in the simulator's `intersection_{col}_{row}` scheme.
    pub fn intersection_names(&self) -> Vec<String> {
        (1..=self.rows)
            .flat_map(|row| (1..=self.cols).map(move |col| format!("intersection_{col}_{row}")))
            .collect()
    }

    /// Traffic file name without extension, used to label episode logs.
    pub fn traffic_label(&self) -> &str {
        self.traffic_file
            .split('.')
            .next()
            .unwrap_or(&self.traffic_file)
    }
}
