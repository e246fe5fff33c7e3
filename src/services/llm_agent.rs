//! LLM-backed signal agent.
//!
//! Each decision describes the intersection in natural language, asks a
//! chat-completion backend for a phase and reads the answer out of the
//! reply. Failed attempts are logged and retried a bounded number of times
//! before the agent falls back to the default phase.

use std::sync::Arc;

use async_trait::async_trait;
use tracing::{debug, info, instrument, warn};

use crate::domain::errors::DomainResult;
use crate::domain::models::{
    ChatMessage, DecisionBasis, Intersection, LlmConfig, LlmDecisionRecord, LlmErrorRecord, Phase,
    PhaseCatalog, StateSnapshot,
};
use crate::domain::ports::{ChatCompletion, ChatRequest, RecordSink, SignalAgent, StateProvider};
use crate::services::answer_parser::extract_phase;
use crate::services::decision_cascade::DEFAULT_PHASE;
use crate::services::prompt_builder::PromptBuilder;

/// Requests issued for one decision before falling back.
pub const MAX_DECISION_ATTEMPTS: u32 = 4;

/// Request parameters of the LLM agent.
#[derive(Debug, Clone)]
pub struct LlmAgentSettings {
    pub model: String,
    pub max_tokens: u32,
    pub temperature: f32,
    pub system_prompt: String,
}

impl From<&LlmConfig> for LlmAgentSettings {
    fn from(config: &LlmConfig) -> Self {
        Self {
            model: config.model.clone(),
            max_tokens: config.max_tokens,
            temperature: config.temperature,
            system_prompt: config.system_prompt.clone(),
        }
    }
}

/// Progress of one decision.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AttemptState {
    /// Nothing sent yet.
    Pending,
    /// The reply named a catalog phase.
    Parsed(Phase),
    /// `n` attempts have failed so far.
    Failed(u32),
    /// Attempts exhausted; the default phase applies.
    Fallback,
}

impl AttemptState {
    /// State after an attempt failed.
    pub const fn after_failure(self) -> Self {
        let failed = match self {
            Self::Failed(n) => n + 1,
            _ => 1,
        };
        if failed >= MAX_DECISION_ATTEMPTS {
            Self::Fallback
        } else {
            Self::Failed(failed)
        }
    }

    pub const fn is_terminal(self) -> bool {
        matches!(self, Self::Parsed(_) | Self::Fallback)
    }
}

/// Agent that delegates the phase choice to a chat-completion model.
pub struct LlmAgent {
    intersection: Intersection,
    catalog: PhaseCatalog,
    client: Arc<dyn ChatCompletion>,
    settings: LlmAgentSettings,
    prompts: PromptBuilder,
    records: Box<dyn RecordSink<LlmDecisionRecord>>,
    errors: Box<dyn RecordSink<LlmErrorRecord>>,
    last_action: Phase,
    last_basis: Option<DecisionBasis>,
}

impl LlmAgent {
    pub fn new(
        intersection: Intersection,
        catalog: PhaseCatalog,
        client: Arc<dyn ChatCompletion>,
        settings: LlmAgentSettings,
        records: Box<dyn RecordSink<LlmDecisionRecord>>,
        errors: Box<dyn RecordSink<LlmErrorRecord>>,
    ) -> Self {
        Self {
            intersection,
            catalog,
            client,
            settings,
            prompts: PromptBuilder::new(catalog),
            records,
            errors,
            last_action: DEFAULT_PHASE,
            last_basis: None,
        }
    }

    pub fn decisions(&self) -> usize {
        self.records.len()
    }

    pub fn failed_attempts(&self) -> usize {
        self.errors.len()
    }

    fn finish(
        &mut self,
        state: StateSnapshot,
        messages: Vec<ChatMessage>,
        attempts: u32,
        outcome: AttemptState,
    ) -> DomainResult<u32> {
        let (phase, fallback) = match outcome {
            AttemptState::Parsed(phase) => (phase, false),
            _ => (DEFAULT_PHASE, outcome == AttemptState::Fallback),
        };
        let code = self.catalog.encode(phase)?;

        self.records.append(LlmDecisionRecord {
            state,
            messages,
            attempts,
            fallback,
            action: phase,
        })?;
        self.last_action = phase;
        self.last_basis = Some(DecisionBasis::Llm { attempts, fallback });

        info!(phase = %phase, code, attempts, fallback, "llm decision");
        Ok(code)
    }

    fn record_failure(
        &mut self,
        error: String,
        prompt: &str,
        response: Option<String>,
    ) -> DomainResult<()> {
        self.errors.append(LlmErrorRecord {
            error,
            prompt: prompt.to_string(),
            response,
        })
    }
}

#[async_trait]
impl SignalAgent for LlmAgent {
    #[instrument(skip(self, provider), fields(intersection = %self.intersection.name, model = %self.settings.model))]
    async fn choose_action(&mut self, provider: &mut dyn StateProvider) -> DomainResult<u32> {
        let state = provider.snapshot(&self.intersection)?;
        state.validate()?;

        if state.total_vehicles() == 0 {
            debug!("zero flow, no request sent");
            return self.finish(state, Vec::new(), 0, AttemptState::Pending);
        }

        let prompt = self.prompts.build(&state)?;
        let mut messages = vec![
            ChatMessage::system(self.settings.system_prompt.clone()),
            ChatMessage::user(prompt.clone()),
        ];

        let mut attempt_state = AttemptState::Pending;
        let mut attempts = 0;
        let mut reply: Option<String> = None;

        while !attempt_state.is_terminal() {
            attempts += 1;
            let request = ChatRequest {
                model: self.settings.model.clone(),
                messages: messages.clone(),
                max_tokens: self.settings.max_tokens,
                temperature: Some(self.settings.temperature),
            };

            match self.client.complete(request).await {
                Ok(response) => match extract_phase(&response.content, self.catalog) {
                    Ok(phase) => {
                        attempt_state = AttemptState::Parsed(phase);
                        reply = Some(response.content);
                    }
                    Err(err) => {
                        warn!(attempt = attempts, error = %err, "unusable answer");
                        self.record_failure(err.to_string(), &prompt, Some(response.content.clone()))?;
                        reply = Some(response.content);
                        attempt_state = attempt_state.after_failure();
                    }
                },
                Err(err) => {
                    warn!(attempt = attempts, error = %err, "chat completion failed");
                    self.record_failure(format!("{err:#}"), &prompt, None)?;
                    attempt_state = attempt_state.after_failure();
                }
            }
        }

        if let Some(content) = reply {
            messages.push(ChatMessage::assistant(content));
        }

        self.finish(state, messages, attempts, attempt_state)
    }

    fn last_action(&self) -> Phase {
        self.last_action
    }

    fn last_basis(&self) -> Option<DecisionBasis> {
        self.last_basis
    }

    fn catalog(&self) -> PhaseCatalog {
        self.catalog
    }

    fn intersection(&self) -> &Intersection {
        &self.intersection
    }
}
