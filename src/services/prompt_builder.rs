//! Natural-language rendering of a state snapshot for the LLM agent.

use crate::domain::errors::DomainResult;
use crate::domain::models::{LaneGroup, Phase, PhaseCatalog, StateSnapshot};

const INTERSECTION_DESCRIPTION: &str = "\
A crossroad joins a north-south road and an east-west road, with the traffic \
light at their intersection. Each of the four arms (north, south, east, west) \
has a through lane and a left-turn lane. Every lane is split into three \
segments: segment 1 is next to the stop line, segment 2 is in the middle and \
segment 3 is the farthest. Early queued vehicles are already waiting at the \
stop line; approaching vehicles are still travelling in one of the segments.";

const TASK: &str = "\
Which signal will most improve the traffic condition during the next phase, \
by relieving the vehicles of its allowed lanes?";

const NOTE: &str = "\
Early queued vehicles dominate congestion: pay the most attention to lanes \
with long queues. Vehicles in distant segments will not reach the \
intersection soon and are not urgent.";

/// Builds the user message for one decision.
#[derive(Debug, Clone, Copy)]
pub struct PromptBuilder {
    catalog: PhaseCatalog,
}

impl PromptBuilder {
    pub const fn new(catalog: PhaseCatalog) -> Self {
        Self { catalog }
    }

    /// Full prompt: description, observation table, task and answer format.
    pub fn build(&self, state: &StateSnapshot) -> DomainResult<String> {
        let signals = self
            .catalog
            .phases()
            .iter()
            .map(|phase| phase.as_str())
            .collect::<Vec<_>>()
            .join(", ");

        Ok(format!(
            "## Intersection\n{INTERSECTION_DESCRIPTION}\n\n\
             The traffic light has {count} signal phases. Each signal releases the \
             vehicles of two specific lanes. For every signal the observation lists \
             its allowed lanes, the early queued vehicles and the approaching \
             vehicles per segment.\n\n\
             ## Traffic Observation\n{table}\n\
             ## Task\n{TASK}\n\n\
             ## Note\n{NOTE}\n\n\
             ## Format\n\
             Choose exactly one of: {signals}. Reason inside <think>...</think> \
             tags first, then put the final choice in \\boxed{{}}.\n",
            count = self.catalog.phase_count(),
            table = self.state_table(state)?,
        ))
    }

    /// One block per catalog phase; segments 3 and 4 are shown merged.
    pub fn state_table(&self, state: &StateSnapshot) -> DomainResult<String> {
        let mut table = String::new();
        for &phase in self.catalog.phases() {
            table.push_str(&phase_block(phase, state)?);
            table.push('\n');
        }
        Ok(table)
    }
}

fn phase_block(phase: Phase, state: &StateSnapshot) -> DomainResult<String> {
    let (first, second) = phase.lane_groups();
    let a = state.lane(first)?;
    let b = state.lane(second)?;

    let row = |label: &str, x: u64, y: u64| {
        format!(
            "- {label}: {x} ({}), {y} ({}), {} (Total)\n",
            arm(first),
            arm(second),
            x + y
        )
    };

    let mut block = format!(
        "Signal: {phase}\nAllowed lanes: {}\n",
        phase.description()
    );
    block.push_str(&row("Early queued", a.queue_len.into(), b.queue_len.into()));
    block.push_str(&row("Segment 1", a.cells[0].into(), b.cells[0].into()));
    block.push_str(&row("Segment 2", a.cells[1].into(), b.cells[1].into()));
    block.push_str(&row("Segment 3", a.far_segments(), b.far_segments()));
    Ok(block)
}

const fn arm(group: LaneGroup) -> &'static str {
    group.approach().name()
}
