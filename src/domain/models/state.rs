//! Traffic state snapshot consumed by the agents.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use super::phase::LaneGroup;
use crate::domain::errors::{DomainError, DomainResult};

/// Number of distance segments reported per lane group.
pub const SEGMENT_COUNT: usize = 4;

/// Observed traffic on one lane group.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct LaneGroupState {
    /// Vehicles already stopped at the stop line.
    pub queue_len: u32,

    /// Approaching vehicles per distance segment, nearest segment first.
    pub cells: [u32; SEGMENT_COUNT],

    /// Mean waiting time of the queued vehicles.
    pub avg_wait_time: f64,
}

impl LaneGroupState {
    pub const fn new(queue_len: u32, cells: [u32; SEGMENT_COUNT], avg_wait_time: f64) -> Self {
        Self {
            queue_len,
            cells,
            avg_wait_time,
        }
    }

    /// Vehicles in the segment nearest to the intersection.
    pub const fn near_segment(&self) -> u32 {
        self.cells[0]
    }

    /// Segments 3 and 4 merged into one "far" band.
    pub fn far_segments(&self) -> u64 {
        u64::from(self.cells[2]) + u64::from(self.cells[3])
    }

    /// Queued plus approaching vehicles.
    pub fn vehicle_count(&self) -> u64 {
        u64::from(self.queue_len) + self.cells.iter().map(|&c| u64::from(c)).sum::<u64>()
    }
}

/// Per-lane-group state for one intersection at one simulation step.
///
/// A valid snapshot covers all eight lane groups regardless of the active
/// phase catalog.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct StateSnapshot {
    lanes: BTreeMap<LaneGroup, LaneGroupState>,
}

impl StateSnapshot {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder-style insert.
    #[must_use]
    pub fn with_lane(mut self, group: LaneGroup, state: LaneGroupState) -> Self {
        self.lanes.insert(group, state);
        self
    }

    pub fn insert(&mut self, group: LaneGroup, state: LaneGroupState) {
        self.lanes.insert(group, state);
    }

    /// Snapshot with every lane group empty.
    pub fn empty() -> Self {
        LaneGroup::ALL
            .into_iter()
            .fold(Self::new(), |snapshot, group| {
                snapshot.with_lane(group, LaneGroupState::default())
            })
    }

    pub fn lane(&self, group: LaneGroup) -> DomainResult<&LaneGroupState> {
        self.lanes
            .get(&group)
            .ok_or_else(|| DomainError::MalformedState(format!("missing lane group {group}")))
    }

    pub fn lane_mut(&mut self, group: LaneGroup) -> Option<&mut LaneGroupState> {
        self.lanes.get_mut(&group)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&LaneGroup, &LaneGroupState)> {
        self.lanes.iter()
    }

    /// Check the structural invariants: all eight lane groups present and
    /// every waiting time a finite, non-negative number.
    pub fn validate(&self) -> DomainResult<()> {
        let missing: Vec<&str> = LaneGroup::ALL
            .iter()
            .filter(|group| !self.lanes.contains_key(group))
            .map(|group| group.as_str())
            .collect();
        if !missing.is_empty() {
            return Err(DomainError::MalformedState(format!(
                "missing lane groups: {}",
                missing.join(", ")
            )));
        }

        for (group, lane) in &self.lanes {
            if !lane.avg_wait_time.is_finite() || lane.avg_wait_time < 0.0 {
                return Err(DomainError::MalformedState(format!(
                    "lane group {group} has invalid avg_wait_time {}",
                    lane.avg_wait_time
                )));
            }
        }

        Ok(())
    }

    /// Queued plus approaching vehicles over all lane groups.
    pub fn total_vehicles(&self) -> u64 {
        self.lanes.values().map(LaneGroupState::vehicle_count).sum()
    }

    /// Parse a snapshot from JSON, mapping any structural problem
    /// (negative counts, unknown keys, wrong segment count) to
    /// [`DomainError::MalformedState`].
    pub fn from_json(value: serde_json::Value) -> DomainResult<Self> {
        let snapshot: Self = serde_json::from_value(value)
            .map_err(|e| DomainError::MalformedState(e.to_string()))?;
        snapshot.validate()?;
        Ok(snapshot)
    }
}
