//! Port trait definitions (Hexagonal Architecture)
//!
//! This module defines the interfaces the agents depend on:
//! - StateProvider: traffic observation for one intersection
//! - ChatCompletion: chat-completion backend for the LLM agent
//! - RecordSink: append-only decision / error logs
//! - SignalAgent: the interchangeable decision agents themselves

pub mod chat_completion;
pub mod record_sink;
pub mod signal_agent;
pub mod state_provider;

pub use chat_completion::{ChatCompletion, ChatRequest, ChatResponse};
pub use record_sink::{MemorySink, RecordSink};
pub use signal_agent::SignalAgent;
pub use state_provider::{FixedStateProvider, StateProvider};
