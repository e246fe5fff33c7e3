//! CLI command implementations.

pub mod decide;
pub mod plan;
pub mod replay;

use anyhow::{Context, Result};
use clap::Args;

use crate::domain::models::{AgentKind, Config};
use crate::infrastructure::config::ConfigLoader;

/// Agent selection flags shared by the commands that build agents.
#[derive(Args, Debug, Clone, Default)]
pub struct AgentOverrides {
    /// Agent kind (rule, llm); overrides agent.kind
    #[arg(short, long)]
    pub agent: Option<String>,

    /// Phase catalog size (4 or 8); overrides agent.phase_count
    #[arg(short, long)]
    pub phases: Option<usize>,

    /// Model identifier; overrides llm.model
    #[arg(short, long)]
    pub model: Option<String>,
}

impl AgentOverrides {
    /// Apply the flags on top of the loaded configuration and revalidate.
    pub fn apply(&self, mut config: Config) -> Result<Config> {
        if let Some(agent) = &self.agent {
            config.agent.kind = agent.parse::<AgentKind>()?;
        }
        if let Some(phases) = self.phases {
            config.agent.phase_count = phases;
        }
        if let Some(model) = &self.model {
            config.llm.model.clone_from(model);
        }

        ConfigLoader::validate(&config).context("Invalid command-line overrides")?;
        Ok(config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_overrides_apply() {
        let overrides = AgentOverrides {
            agent: Some("llm".to_string()),
            phases: Some(8),
            model: Some("qwen-7b".to_string()),
        };
        let config = overrides.apply(Config::default()).unwrap();
        assert_eq!(config.agent.kind, AgentKind::Llm);
        assert_eq!(config.agent.phase_count, 8);
        assert_eq!(config.llm.model, "qwen-7b");
    }

    #[test]
    fn test_overrides_validate_phase_count() {
        let overrides = AgentOverrides {
            phases: Some(6),
            ..AgentOverrides::default()
        };
        assert!(overrides.apply(Config::default()).is_err());
    }

    #[test]
    fn test_no_overrides_keep_config() {
        let config = AgentOverrides::default().apply(Config::default()).unwrap();
        assert_eq!(config.agent.kind, AgentKind::Rule);
        assert_eq!(config.agent.phase_count, 4);
    }
}
