//! Errors surfaced by the scoring engine.

use thiserror::Error;

/// The only ways a scoring run can fail. Collaborator problems never show up
/// here; they degrade to fallback values instead.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum AnalyzeError {
    #[error("Invalid duration: {0} (must be a finite number of seconds)")]
    InvalidDuration(f64),

    #[error("An API key is required for LLM scoring but none was provided")]
    MissingApiKey,
}
