use std::path::{Path, PathBuf};

use crate::domain::models::{AgentKind, Dataset, PhaseCatalog};

/// File locations of one agent's decision and error logs
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EpisodeLogPaths {
    pub decisions: PathBuf,
    pub errors: PathBuf,
}

impl EpisodeLogPaths {
    /// Paths under `dir` for `intersection`.
    ///
    /// Rule agent: `{dataset}-{intersection}-rulebased-{n}_state_action.json`
    /// and `..._error.json`. LLM agent:
    /// `{dataset}-{intersection}-{model}-{n}_state_action_prompt.json` and
    /// `..._error_prompts.json`.
    pub fn new(
        dir: &Path,
        dataset: Dataset,
        intersection: &str,
        agent: AgentKind,
        model: &str,
        catalog: PhaseCatalog,
    ) -> Self {
        let n = catalog.phase_count();
        let (stem, decisions, errors) = match agent {
            AgentKind::Rule => (
                format!("{dataset}-{intersection}-rulebased-{n}"),
                "state_action",
                "error",
            ),
            AgentKind::Llm => (
                format!("{dataset}-{intersection}-{}-{n}", sanitize(model)),
                "state_action_prompt",
                "error_prompts",
            ),
        };

        Self {
            decisions: dir.join(format!("{stem}_{decisions}.json")),
            errors: dir.join(format!("{stem}_{errors}.json")),
        }
    }
}

/// Model ids may contain path separators (`org/model`)
fn sanitize(model: &str) -> String {
    model.replace(['/', '\\'], "_")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rule_paths() {
        let paths = EpisodeLogPaths::new(
            Path::new("/logs"),
            Dataset::Jinan,
            "intersection_1_1",
            AgentKind::Rule,
            "ignored",
            PhaseCatalog::FourPhase,
        );
        assert_eq!(
            paths.decisions,
            PathBuf::from("/logs/jinan-intersection_1_1-rulebased-4_state_action.json")
        );
        assert_eq!(
            paths.errors,
            PathBuf::from("/logs/jinan-intersection_1_1-rulebased-4_error.json")
        );
    }

    #[test]
    fn test_llm_paths() {
        let paths = EpisodeLogPaths::new(
            Path::new("/logs"),
            Dataset::Hangzhou,
            "intersection_2_3",
            AgentKind::Llm,
            "Qwen/Qwen2.5-7B",
            PhaseCatalog::EightPhase,
        );
        assert_eq!(
            paths.decisions,
            PathBuf::from("/logs/hangzhou-intersection_2_3-Qwen_Qwen2.5-7B-8_state_action_prompt.json")
        );
        assert_eq!(
            paths.errors,
            PathBuf::from("/logs/hangzhou-intersection_2_3-Qwen_Qwen2.5-7B-8_error_prompts.json")
        );
    }
}
