//! Rule-based phase selection.
//!
//! The cascade tries four steps in strict priority order and stops at the
//! first one that reaches a decision:
//!
//! 1. **Zero flow** - no queued or approaching vehicle anywhere: default phase.
//! 2. **Max flow** - the phase with the most vehicles in the nearest
//!    segment wins unless its count exceeds [`DOMINANT_FLOW_RATIO`] times
//!    the count of some other phase. A lopsided leader is skipped.
//! 3. **Max queue** - the phase with the longest summed queue wins if no
//!    other phase ties it.
//! 4. **Max wait** - the phase with the longest summed waiting time wins;
//!    ties go to the earliest phase in catalog order.
//!
//! All per-phase tallies are computed fresh for each call and returned in
//! catalog order.

use tracing::debug;

use crate::domain::errors::{DomainError, DomainResult};
use crate::domain::models::{
    CascadeOutcome, DecisionReason, LaneGroupState, Phase, PhaseCatalog, StateSnapshot,
};

/// Phase used when the intersection is empty, and by the LLM agent when it
/// runs out of attempts.
pub const DEFAULT_PHASE: Phase = Phase::Etwt;

/// A max-flow phase whose count exceeds this multiple of any other phase's
/// count is disqualified. Equality does not disqualify.
pub const DOMINANT_FLOW_RATIO: f64 = 2.5;

/// Pick a phase for `state` from `catalog`.
///
/// Fails only with [`DomainError::MalformedState`](crate::domain::DomainError::MalformedState)
/// when the snapshot does not cover all lane groups or carries invalid
/// waiting times.
pub fn decide(state: &StateSnapshot, catalog: PhaseCatalog) -> DomainResult<CascadeOutcome> {
    state.validate()?;

    if state.total_vehicles() == 0 {
        return Ok(CascadeOutcome::new(DEFAULT_PHASE, DecisionReason::ZeroFlow));
    }

    let flow = phase_flow(state, catalog)?;
    if let Some(phase) = max_flow_phase(&flow) {
        return Ok(CascadeOutcome::new(phase, DecisionReason::MaxFlowPhase));
    }

    let queue = phase_queue(state, catalog)?;
    if let Some(phase) = unique_max_queue_phase(&queue) {
        return Ok(CascadeOutcome::new(phase, DecisionReason::MaxQueuePhase));
    }

    let waiting = phase_waiting_time(state, catalog)?;
    // Catalogs are never empty, so there is always a leader.
    let phase = first_max_waiting_phase(&waiting)
        .ok_or_else(|| DomainError::MalformedState(format!("no phases in {catalog:?}")))?;
    debug!(
        phase = %phase,
        queue = ?queue,
        waiting = ?waiting,
        "queue tie resolved by waiting time"
    );
    Ok(CascadeOutcome::new(phase, DecisionReason::MaxWaitingTimePhase))
}

/// Nearest-segment vehicles of both lane groups, per phase.
pub fn phase_flow(state: &StateSnapshot, catalog: PhaseCatalog) -> DomainResult<Vec<(Phase, u64)>> {
    tally(state, catalog, |lane| u64::from(lane.near_segment()))
}

/// Queued vehicles of both lane groups, per phase.
pub fn phase_queue(
    state: &StateSnapshot,
    catalog: PhaseCatalog,
) -> DomainResult<Vec<(Phase, u64)>> {
    tally(state, catalog, |lane| u64::from(lane.queue_len))
}

/// Average waiting time of both lane groups, per phase.
pub fn phase_waiting_time(
    state: &StateSnapshot,
    catalog: PhaseCatalog,
) -> DomainResult<Vec<(Phase, f64)>> {
    tally(state, catalog, |lane| lane.avg_wait_time)
}

fn tally<T, F>(state: &StateSnapshot, catalog: PhaseCatalog, metric: F) -> DomainResult<Vec<(Phase, T)>>
where
    T: std::ops::Add<Output = T>,
    F: Fn(&LaneGroupState) -> T,
{
    catalog
        .phases()
        .iter()
        .map(|&phase| {
            let (first, second) = phase.lane_groups();
            Ok((phase, metric(state.lane(first)?) + metric(state.lane(second)?)))
        })
        .collect()
}

/// First phase with the largest flow, unless that flow exceeds the ratio
/// times the flow of any other phase.
fn max_flow_phase(flow: &[(Phase, u64)]) -> Option<Phase> {
    let (leader, leader_flow) = first_max_by(flow, |a, b| a > b)?;
    let disqualified = flow
        .iter()
        .any(|&(phase, other)| phase != leader && exceeds_ratio(leader_flow, other));
    (!disqualified).then_some(leader)
}

/// Whether `leader` is strictly more than [`DOMINANT_FLOW_RATIO`] times `other`.
// u64 -> f64 is exact for any realistic vehicle count.
#[allow(clippy::cast_precision_loss)]
pub fn exceeds_ratio(leader: u64, other: u64) -> bool {
    leader as f64 > DOMINANT_FLOW_RATIO * other as f64
}

fn unique_max_queue_phase(queue: &[(Phase, u64)]) -> Option<Phase> {
    let (leader, max) = first_max_by(queue, |a, b| a > b)?;
    let tied = queue.iter().filter(|(_, q)| *q == max).count();
    (tied == 1).then_some(leader)
}

fn first_max_waiting_phase(waiting: &[(Phase, f64)]) -> Option<Phase> {
    first_max_by(waiting, |a, b| a > b).map(|(phase, _)| phase)
}

/// Earliest entry holding the maximum value; later entries replace the
/// leader only when strictly greater.
fn first_max_by<T: Copy>(
    values: &[(Phase, T)],
    greater: impl Fn(&T, &T) -> bool,
) -> Option<(Phase, T)> {
    values.iter().copied().fold(None, |best, (phase, value)| match best {
        Some((_, best_value)) if !greater(&value, &best_value) => best,
        _ => Some((phase, value)),
    })
}
