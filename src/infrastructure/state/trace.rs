//! Recorded simulator observations, replayed as a state provider.
//!
//! A trace is a JSON-lines file; each line holds one observation:
//!
//! ```json
//! {"step": 0, "intersection": "intersection_1_1", "state": {"NT": {...}, ...}}
//! ```

use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, VecDeque};
use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::Path;

use crate::domain::errors::{DomainError, DomainResult};
use crate::domain::models::{Intersection, StateSnapshot};
use crate::domain::ports::StateProvider;

/// One line of a trace file
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TraceRecord {
    pub step: u64,
    pub intersection: String,
    pub state: StateSnapshot,
}

/// Observations of every intersection, each in step order
#[derive(Debug, Clone, Default)]
pub struct StateTrace {
    by_intersection: BTreeMap<String, Vec<(u64, StateSnapshot)>>,
}

impl StateTrace {
    pub fn load(path: impl AsRef<Path>) -> DomainResult<Self> {
        let path = path.as_ref();
        let file = File::open(path)
            .map_err(|e| DomainError::Persistence(format!("{}: {e}", path.display())))?;
        Self::from_reader(BufReader::new(file))
    }

    /// Parse JSON lines; blank lines are skipped. Every state is validated.
    pub fn from_reader(reader: impl BufRead) -> DomainResult<Self> {
        let mut trace = Self::default();
        for (index, line) in reader.lines().enumerate() {
            let line = line?;
            if line.trim().is_empty() {
                continue;
            }
            let record: TraceRecord = serde_json::from_str(&line).map_err(|e| {
                DomainError::MalformedState(format!("trace line {}: {e}", index + 1))
            })?;
            record.state.validate().map_err(|e| {
                DomainError::MalformedState(format!("trace line {}: {e}", index + 1))
            })?;
            trace.push(record);
        }
        for observations in trace.by_intersection.values_mut() {
            observations.sort_by_key(|(step, _)| *step);
        }
        Ok(trace)
    }

    pub fn push(&mut self, record: TraceRecord) {
        self.by_intersection
            .entry(record.intersection)
            .or_default()
            .push((record.step, record.state));
    }

    /// Intersection names in lexical order
    pub fn intersections(&self) -> impl Iterator<Item = &str> {
        self.by_intersection.keys().map(String::as_str)
    }

    pub fn steps(&self, intersection: &str) -> usize {
        self.by_intersection.get(intersection).map_or(0, Vec::len)
    }

    pub fn is_empty(&self) -> bool {
        self.by_intersection.is_empty()
    }

    /// One provider per intersection
    pub fn into_providers(self) -> BTreeMap<String, TraceStateProvider> {
        self.by_intersection
            .into_iter()
            .map(|(name, observations)| {
                let provider = TraceStateProvider {
                    snapshots: observations.into_iter().map(|(_, state)| state).collect(),
                };
                (name, provider)
            })
            .collect()
    }
}

/// Provider yielding one intersection's recorded snapshots in step order
#[derive(Debug, Clone, Default)]
pub struct TraceStateProvider {
    snapshots: VecDeque<StateSnapshot>,
}

impl TraceStateProvider {
    pub fn remaining(&self) -> usize {
        self.snapshots.len()
    }
}

impl StateProvider for TraceStateProvider {
    fn snapshot(&mut self, intersection: &Intersection) -> DomainResult<StateSnapshot> {
        self.snapshots
            .pop_front()
            .ok_or_else(|| DomainError::StateUnavailable(intersection.name.clone()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::models::{LaneGroup, LaneGroupState};
    use std::io::Cursor;

    fn line(step: u64, intersection: &str, queue: u32) -> String {
        let mut state = StateSnapshot::empty();
        state.insert(LaneGroup::EastThrough, LaneGroupState::new(queue, [0; 4], 0.0));
        serde_json::to_string(&TraceRecord {
            step,
            intersection: intersection.to_string(),
            state,
        })
        .unwrap()
    }

    #[test]
    fn test_orders_by_step_per_intersection() {
        let input = [
            line(1, "intersection_1_1", 5),
            String::new(),
            line(0, "intersection_1_1", 2),
            line(0, "intersection_2_1", 9),
        ]
        .join("\n");

        let trace = StateTrace::from_reader(Cursor::new(input)).unwrap();
        assert_eq!(
            trace.intersections().collect::<Vec<_>>(),
            vec!["intersection_1_1", "intersection_2_1"]
        );
        assert_eq!(trace.steps("intersection_1_1"), 2);

        let mut providers = trace.into_providers();
        let provider = providers.get_mut("intersection_1_1").unwrap();
        let inter = Intersection::new("intersection_1_1");
        let first = provider.snapshot(&inter).unwrap();
        let second = provider.snapshot(&inter).unwrap();
        assert_eq!(first.lane(LaneGroup::EastThrough).unwrap().queue_len, 2);
        assert_eq!(second.lane(LaneGroup::EastThrough).unwrap().queue_len, 5);
        assert!(matches!(
            provider.snapshot(&inter),
            Err(DomainError::StateUnavailable(_))
        ));
    }

    #[test]
    fn test_bad_line_reports_line_number() {
        let input = format!("{}\n{{\"step\": 1}}", line(0, "intersection_1_1", 1));
        let err = StateTrace::from_reader(Cursor::new(input)).unwrap_err();
        match err {
            DomainError::MalformedState(msg) => assert!(msg.starts_with("trace line 2")),
            other => panic!("expected MalformedState, got {other:?}"),
        }
    }

    #[test]
    fn test_incomplete_state_rejected() {
        let input = r#"{"step": 0, "intersection": "i", "state": {"NT": {"queue_len": 1, "cells": [0,0,0,0], "avg_wait_time": 0.0}}}"#;
        assert!(matches!(
            StateTrace::from_reader(Cursor::new(input)),
            Err(DomainError::MalformedState(_))
        ));
    }
}
