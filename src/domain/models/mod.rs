pub mod config;
pub mod decision;
pub mod experiment;
pub mod intersection;
pub mod phase;
pub mod state;

pub use config::{
    AgentConfig, AgentKind, Config, EpisodeLogConfig, LlmConfig, LoggingConfig, RateLimitConfig,
    RetryConfig,
};
pub use decision::{
    CascadeOutcome, ChatMessage, ChatRole, DecisionBasis, DecisionReason, LlmDecisionRecord,
    LlmErrorRecord, RuleDecisionRecord,
};
pub use experiment::{run_log_dir, Dataset, ExperimentPlan};
pub use intersection::{Intersection, Road};
pub use phase::{Approach, LaneGroup, Movement, Phase, PhaseCatalog};
pub use state::{LaneGroupState, StateSnapshot};
