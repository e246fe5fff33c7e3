//! tsc-agent - traffic-signal control agents
//!
//! Decision agents for signalised intersections in a city-scale traffic
//! simulation. Each step an agent reads the state of its intersection and
//! picks the next signal phase, either through a deterministic rule cascade
//! or by asking a chat-completion model.
//!
//! # Architecture
//!
//! This crate follows Clean Architecture / Hexagonal Architecture principles:
//!
//! - **Domain Layer** (`domain`): Phases, states, decision records and ports
//! - **Service Layer** (`services`): Rule cascade, prompt building and the agents
//! - **Application Layer** (`application`): Agent assembly and trace replay
//! - **Infrastructure Layer** (`infrastructure`): HTTP client, episode logs, config, logging
//! - **CLI Layer** (`cli`): Command-line interface
//!
//! # Example
//!
//! ```ignore
//! use tsc_agent::domain::models::{PhaseCatalog, StateSnapshot};
//! use tsc_agent::services::decide;
//!
//! let outcome = decide(&StateSnapshot::empty(), PhaseCatalog::FourPhase)?;
//! assert_eq!(outcome.phase.as_str(), "ETWT");
//! ```

pub mod application;
pub mod cli;
pub mod domain;
pub mod infrastructure;
pub mod services;

// Re-export commonly used types for convenience
pub use application::{run_replay, AgentBuilder, ReplayReport};
pub use domain::errors::{DomainError, DomainResult};
pub use domain::models::{
    AgentKind, CascadeOutcome, Config, DecisionBasis, DecisionReason, LaneGroup, LaneGroupState,
    Phase, PhaseCatalog, StateSnapshot,
};
pub use domain::ports::{ChatCompletion, SignalAgent, StateProvider};
pub use infrastructure::config::{ConfigError, ConfigLoader};
pub use services::{decide, LlmAgent, RuleAgent};
