use async_trait::async_trait;

use super::state_provider::StateProvider;
use crate::domain::errors::DomainResult;
use crate::domain::models::{DecisionBasis, Intersection, Phase, PhaseCatalog};

/// Decision agent controlling one intersection.
///
/// The rule-based and LLM-backed agents are interchangeable behind this
/// trait. One instance per intersection; an instance is never driven from
/// two tasks at once.
#[async_trait]
pub trait SignalAgent: Send {
    /// Observe the intersection, decide, record the decision and return the
    /// action code for the simulator's next step.
    async fn choose_action(&mut self, provider: &mut dyn StateProvider) -> DomainResult<u32>;

    /// Phase chosen by the most recent decision. Reporting only.
    fn last_action(&self) -> Phase;

    /// What the most recent decision rested on; `None` before the first.
    fn last_basis(&self) -> Option<DecisionBasis>;

    fn catalog(&self) -> PhaseCatalog;

    fn intersection(&self) -> &Intersection;
}
