use async_trait::async_trait;
use tracing::{info, instrument};

use crate::domain::errors::DomainResult;
use crate::domain::models::{
    DecisionBasis, DecisionReason, Intersection, Phase, PhaseCatalog, RuleDecisionRecord,
};
use crate::domain::ports::{RecordSink, SignalAgent, StateProvider};
use crate::services::decision_cascade::{self, DEFAULT_PHASE};

/// Deterministic agent driven by the decision cascade.
///
/// Every decision is appended to the record sink as
/// `{state, action_reason, action}` before the action code is returned.
pub struct RuleAgent {
    intersection: Intersection,
    catalog: PhaseCatalog,
    records: Box<dyn RecordSink<RuleDecisionRecord>>,
    last_action: Phase,
    last_reason: Option<DecisionReason>,
}

impl RuleAgent {
    pub fn new(
        intersection: Intersection,
        catalog: PhaseCatalog,
        records: Box<dyn RecordSink<RuleDecisionRecord>>,
    ) -> Self {
        Self {
            intersection,
            catalog,
            records,
            last_action: DEFAULT_PHASE,
            last_reason: None,
        }
    }

    /// Number of decisions taken so far.
    pub fn decisions(&self) -> usize {
        self.records.len()
    }
}

#[async_trait]
impl SignalAgent for RuleAgent {
    #[instrument(skip(self, provider), fields(intersection = %self.intersection.name))]
    async fn choose_action(&mut self, provider: &mut dyn StateProvider) -> DomainResult<u32> {
        let state = provider.snapshot(&self.intersection)?;
        let outcome = decision_cascade::decide(&state, self.catalog)?;
        let code = self.catalog.encode(outcome.phase)?;

        self.records.append(RuleDecisionRecord {
            state,
            action_reason: outcome.reason,
            action: outcome.phase,
        })?;
        self.last_action = outcome.phase;
        self.last_reason = Some(outcome.reason);

        info!(phase = %outcome.phase, code, reason = %outcome.reason, "rule decision");
        Ok(code)
    }

    fn last_action(&self) -> Phase {
        self.last_action
    }

    fn last_basis(&self) -> Option<DecisionBasis> {
        self.last_reason.map(|reason| DecisionBasis::Rule { reason })
    }

    fn catalog(&self) -> PhaseCatalog {
        self.catalog
    }

    fn intersection(&self) -> &Intersection {
        &self.intersection
    }
}
