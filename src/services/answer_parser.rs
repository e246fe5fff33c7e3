//! Extraction of the chosen phase from a free-text model reply.

use regex::Regex;
use std::sync::OnceLock;
use thiserror::Error;

use crate::domain::models::{Phase, PhaseCatalog};

/// Reasons a reply does not yield a usable phase.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum AnswerError {
    #[error("reply has no \\boxed{{...}} answer")]
    MissingAnswer,

    #[error("answer {0:?} names no phase of the active catalog")]
    NotInCatalog(String),
}

fn boxed_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| {
        #[allow(clippy::unwrap_used)]
        Regex::new(r"\\boxed\{([^}]*)\}").unwrap()
    })
}

/// Read the phase out of the last `\boxed{...}` marker of `reply`.
///
/// The marker content is trimmed and uppercased; the first catalog phase
/// (in catalog order) whose name occurs in it wins, so `\boxed{ntst}` and
/// `\boxed{Signal NTST}` both give `NTST`.
pub fn extract_phase(reply: &str, catalog: PhaseCatalog) -> Result<Phase, AnswerError> {
    let answer = boxed_pattern()
        .captures_iter(reply)
        .last()
        .and_then(|caps| caps.get(1))
        .map(|m| m.as_str().trim().to_uppercase())
        .ok_or(AnswerError::MissingAnswer)?;

    catalog
        .phases()
        .iter()
        .copied()
        .find(|phase| answer.contains(phase.as_str()))
        .ok_or(AnswerError::NotInCatalog(answer))
}
