//! Decision outcomes and the records written to the episode logs.

use serde::{Deserialize, Serialize};
use std::fmt;

use super::phase::Phase;
use super::state::StateSnapshot;

/// Which step of the rule cascade produced the decision.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum DecisionReason {
    #[serde(rename = "Zero flow")]
    ZeroFlow,
    #[serde(rename = "Max flow phase")]
    MaxFlowPhase,
    #[serde(rename = "Max queue phase")]
    MaxQueuePhase,
    #[serde(rename = "Max waiting time phase")]
    MaxWaitingTimePhase,
}

impl DecisionReason {
    pub const ALL: [Self; 4] = [
        Self::ZeroFlow,
        Self::MaxFlowPhase,
        Self::MaxQueuePhase,
        Self::MaxWaitingTimePhase,
    ];

    pub const fn as_str(self) -> &'static str {
        match self {
            Self::ZeroFlow => "Zero flow",
            Self::MaxFlowPhase => "Max flow phase",
            Self::MaxQueuePhase => "Max queue phase",
            Self::MaxWaitingTimePhase => "Max waiting time phase",
        }
    }
}

impl fmt::Display for DecisionReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Result of one cascade invocation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct CascadeOutcome {
    pub phase: Phase,
    pub reason: DecisionReason,
}

impl CascadeOutcome {
    pub const fn new(phase: Phase, reason: DecisionReason) -> Self {
        Self { phase, reason }
    }
}

/// What a decision rested on, as reported by the agent that took it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "agent", rename_all = "lowercase")]
pub enum DecisionBasis {
    Rule { reason: DecisionReason },
    Llm { attempts: u32, fallback: bool },
}

impl DecisionBasis {
    /// Short label used to group decisions in reports.
    pub const fn label(self) -> &'static str {
        match self {
            Self::Rule { reason } => reason.as_str(),
            Self::Llm { attempts: 0, .. } => "Zero flow",
            Self::Llm { fallback: true, .. } => "Fallback",
            Self::Llm { .. } => "Model answer",
        }
    }
}

impl fmt::Display for DecisionBasis {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Rule { reason } => write!(f, "{reason}"),
            Self::Llm { attempts, .. } => write!(f, "{} ({attempts} attempts)", self.label()),
        }
    }
}

/// Chat message role.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ChatRole {
    System,
    User,
    Assistant,
}

/// One entry of a chat transcript.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChatMessage {
    pub role: ChatRole,
    pub content: String,
}

impl ChatMessage {
    pub fn system(content: impl Into<String>) -> Self {
        Self {
            role: ChatRole::System,
            content: content.into(),
        }
    }

    pub fn user(content: impl Into<String>) -> Self {
        Self {
            role: ChatRole::User,
            content: content.into(),
        }
    }

    pub fn assistant(content: impl Into<String>) -> Self {
        Self {
            role: ChatRole::Assistant,
            content: content.into(),
        }
    }
}

/// Episode-log entry of the rule agent.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RuleDecisionRecord {
    pub state: StateSnapshot,
    pub action_reason: DecisionReason,
    pub action: Phase,
}

/// Episode-log entry of the LLM agent, with the full transcript.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LlmDecisionRecord {
    pub state: StateSnapshot,
    pub messages: Vec<ChatMessage>,
    /// Requests issued for this decision (0 on zero flow).
    pub attempts: u32,
    /// True when the bounded retry ran out and the default phase was used.
    pub fallback: bool,
    pub action: Phase,
}

/// Error-log entry of the LLM agent: one failed attempt.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LlmErrorRecord {
    pub error: String,
    pub prompt: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub response: Option<String>,
}
