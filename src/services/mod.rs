pub mod answer_parser;
pub mod decision_cascade;
pub mod llm_agent;
pub mod prompt_builder;
pub mod rule_agent;

pub use answer_parser::{extract_phase, AnswerError};
pub use decision_cascade::{decide, DEFAULT_PHASE, DOMINANT_FLOW_RATIO};
pub use llm_agent::{AttemptState, LlmAgent, LlmAgentSettings, MAX_DECISION_ATTEMPTS};
pub use prompt_builder::PromptBuilder;
pub use rule_agent::RuleAgent;
