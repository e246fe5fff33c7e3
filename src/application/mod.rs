//! Application layer: wiring agents to state sources and episode logs.

pub mod agent_builder;
pub mod replay;

pub use agent_builder::AgentBuilder;
pub use replay::{run_replay, IntersectionReport, ReplayReport};
