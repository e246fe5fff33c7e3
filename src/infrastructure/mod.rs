//! Infrastructure layer module
//!
//! Adapters behind the domain ports and the ambient plumbing:
//! - Configuration management (figment)
//! - Logging infrastructure (tracing)
//! - Chat-completion HTTP client
//! - Episode log files
//! - Recorded state traces
//!
//! Infrastructure implementations satisfy the port traits defined in the domain layer.

pub mod config;
pub mod episode_log;
pub mod llm;
pub mod logging;
pub mod state;
