pub mod engagement;
pub mod grammar;
pub mod vocabulary;

use serde::Serialize;

pub use engagement::{engagement_from_sentiment, EngagementEvidence};
pub use grammar::{grammar_evidence, GrammarEvidence};
pub use vocabulary::{vocabulary_measures, VocabularyStats};

/// Score used when a signal cannot be measured.
pub const FALLBACK_SCORE: f64 = 60.0;

/// Words per minute. Durations under one second count as one second;
/// a non-positive duration yields 0.
pub fn words_per_minute(word_count: usize, duration_seconds: f64) -> f64 {
    if duration_seconds <= 0.0 {
        return 0.0;
    }
    word_count as f64 / duration_seconds.max(1.0) * 60.0
}

/// Parse a recording length: plain seconds ("42", "37.5") or a humantime
/// span ("1m 30s").
pub fn parse_duration_secs(input: &str) -> anyhow::Result<f64> {
    let input = input.trim();
    if let Ok(secs) = input.parse::<f64>() {
        if !secs.is_finite() {
            anyhow::bail!("Duration must be a finite number of seconds, got '{}'", input);
        }
        return Ok(secs);
    }
    let span = humantime::parse_duration(input)
        .map_err(|e| anyhow::anyhow!("Invalid duration '{}': {}", input, e))?;
    Ok(span.as_secs_f64())
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct SemanticEvidence {
    pub similarity: f64,
    pub score: f64,
}

/// Fixed stand-in for comparing the transcript against an ideal
/// introduction. Always reports 0.60 similarity.
pub fn semantic_similarity_placeholder(_transcript: &str) -> SemanticEvidence {
    SemanticEvidence {
        similarity: 0.60,
        score: FALLBACK_SCORE,
    }
}
