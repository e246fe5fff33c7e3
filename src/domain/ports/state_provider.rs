use crate::domain::errors::DomainResult;
use crate::domain::models::{Intersection, StateSnapshot};

/// Port for whatever observes the traffic (a simulator binding, a recorded
/// trace).
///
/// Every call must return all eight lane groups; agents treat a missing
/// entry as a malformed state rather than substituting defaults.
pub trait StateProvider: Send {
    /// Current state of `intersection`.
    fn snapshot(&mut self, intersection: &Intersection) -> DomainResult<StateSnapshot>;
}

/// Provider that always reports the same snapshot.
#[derive(Debug, Clone)]
pub struct FixedStateProvider {
    snapshot: StateSnapshot,
}

impl FixedStateProvider {
    pub const fn new(snapshot: StateSnapshot) -> Self {
        Self { snapshot }
    }
}

impl StateProvider for FixedStateProvider {
    fn snapshot(&mut self, _intersection: &Intersection) -> DomainResult<StateSnapshot> {
        Ok(self.snapshot.clone())
    }
}
