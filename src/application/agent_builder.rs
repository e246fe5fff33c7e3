//! Assembly of signal agents from configuration.

use anyhow::{Context, Result};
use std::path::Path;
use std::sync::Arc;

use crate::domain::models::{
    AgentKind, Config, Dataset, Intersection, LlmDecisionRecord, LlmErrorRecord, PhaseCatalog,
    RuleDecisionRecord,
};
use crate::domain::ports::{ChatCompletion, MemorySink, RecordSink, SignalAgent};
use crate::infrastructure::episode_log::{EpisodeLogPaths, JsonListFile};
use crate::infrastructure::llm::{ChatClientConfig, ChatCompletionClient};
use crate::services::{LlmAgent, LlmAgentSettings, RuleAgent};

/// Builds one agent per intersection, all sharing kind, catalog and (for
/// the LLM agent) one HTTP client with its rate limiter.
pub struct AgentBuilder {
    kind: AgentKind,
    catalog: PhaseCatalog,
    settings: LlmAgentSettings,
    client: Option<Arc<dyn ChatCompletion>>,
}

impl AgentBuilder {
    pub fn new(kind: AgentKind, catalog: PhaseCatalog, settings: LlmAgentSettings) -> Self {
        Self {
            kind,
            catalog,
            settings,
            client: None,
        }
    }

    /// Builder for the configured agent; the LLM agent gets an HTTP client
    /// for `llm.base_url`.
    pub fn from_config(config: &Config) -> Result<Self> {
        let catalog = PhaseCatalog::from_phase_count(config.agent.phase_count)?;
        let builder = Self::new(
            config.agent.kind,
            catalog,
            LlmAgentSettings::from(&config.llm),
        );

        if config.agent.kind == AgentKind::Llm {
            let client = ChatCompletionClient::new(ChatClientConfig::from(config))
                .context("Failed to create chat-completion client")?;
            Ok(builder.with_client(Arc::new(client)))
        } else {
            Ok(builder)
        }
    }

    #[must_use]
    pub fn with_client(mut self, client: Arc<dyn ChatCompletion>) -> Self {
        self.client = Some(client);
        self
    }

    pub const fn kind(&self) -> AgentKind {
        self.kind
    }

    pub const fn catalog(&self) -> PhaseCatalog {
        self.catalog
    }

    pub fn model(&self) -> &str {
        &self.settings.model
    }

    /// Agent whose records are kept in memory only.
    pub fn in_memory(&self, intersection: Intersection) -> Result<Box<dyn SignalAgent>> {
        self.assemble(
            intersection,
            Box::new(MemorySink::<RuleDecisionRecord>::new()),
            Box::new(MemorySink::<LlmDecisionRecord>::new()),
            Box::new(MemorySink::<LlmErrorRecord>::new()),
        )
    }

    /// Agent writing its decision and error logs below `dir`.
    pub fn with_episode_logs(
        &self,
        intersection: Intersection,
        dir: &Path,
        dataset: Dataset,
    ) -> Result<Box<dyn SignalAgent>> {
        let paths = EpisodeLogPaths::new(
            dir,
            dataset,
            &intersection.name,
            self.kind,
            self.model(),
            self.catalog,
        );

        match self.kind {
            AgentKind::Rule => self.assemble(
                intersection,
                Box::new(JsonListFile::<RuleDecisionRecord>::create(&paths.decisions)?),
                Box::new(MemorySink::<LlmDecisionRecord>::new()),
                Box::new(MemorySink::<LlmErrorRecord>::new()),
            ),
            AgentKind::Llm => self.assemble(
                intersection,
                Box::new(MemorySink::<RuleDecisionRecord>::new()),
                Box::new(JsonListFile::<LlmDecisionRecord>::create(&paths.decisions)?),
                Box::new(JsonListFile::<LlmErrorRecord>::create(&paths.errors)?),
            ),
        }
    }

    fn assemble(
        &self,
        intersection: Intersection,
        rule_records: Box<dyn RecordSink<RuleDecisionRecord>>,
        llm_records: Box<dyn RecordSink<LlmDecisionRecord>>,
        llm_errors: Box<dyn RecordSink<LlmErrorRecord>>,
    ) -> Result<Box<dyn SignalAgent>> {
        match self.kind {
            AgentKind::Rule => Ok(Box::new(RuleAgent::new(
                intersection,
                self.catalog,
                rule_records,
            ))),
            AgentKind::Llm => {
                let client = self
                    .client
                    .clone()
                    .context("LLM agent requires a chat-completion client")?;
                Ok(Box::new(LlmAgent::new(
                    intersection,
                    self.catalog,
                    client,
                    self.settings.clone(),
                    llm_records,
                    llm_errors,
                )))
            }
        }
    }
}
