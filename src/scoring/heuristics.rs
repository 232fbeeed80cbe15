use serde::Serialize;

use crate::detect::{FlowFindings, KeywordFindings, SalutationClosing};
use crate::metrics::{GrammarEvidence, FALLBACK_SCORE};

/// Descending line from 100 at `low` to 0 at `high`, clamped to [0, 100].
pub fn linear_descending(x: f64, low: f64, high: f64) -> f64 {
    (100.0 - (x - low) / (high - low) * 100.0).clamp(0.0, 100.0)
}

fn presence(found: bool) -> f64 {
    if found {
        100.0
    } else {
        0.0
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct KeywordScore {
    pub found_must: usize,
    pub found_bonus: usize,
    pub must_score: f64,
    pub bonus_score: f64,
    pub score: f64,
}

/// 80% from the four must-have categories, 20% from the three bonus ones.
pub fn keyword_presence_score(found: &KeywordFindings) -> KeywordScore {
    let must = found.must_have();
    let bonus = found.bonus();
    let found_must = must.iter().filter(|f| **f).count();
    let found_bonus = bonus.iter().filter(|f| **f).count();
    let must_score = found_must as f64 / must.len() as f64 * 100.0;
    let bonus_score = found_bonus as f64 / bonus.len() as f64 * 100.0;
    KeywordScore {
        found_must,
        found_bonus,
        must_score,
        bonus_score,
        score: 0.8 * must_score + 0.2 * bonus_score,
    }
}

/// Greeting carries 40%; intro, body and closing 20% each.
pub fn salutation_flow_score(salutation: &SalutationClosing, flow: &FlowFindings) -> f64 {
    0.4 * presence(salutation.salutation)
        + 0.2 * presence(flow.intro)
        + 0.2 * presence(flow.body)
        + 0.2 * presence(flow.closing)
}

pub fn filler_score(filler_percent: f64) -> f64 {
    if filler_percent <= 2.0 {
        100.0
    } else if filler_percent >= 10.0 {
        0.0
    } else {
        linear_descending(filler_percent, 2.0, 10.0)
    }
}

/// 110-150 is ideal; 90-110 and 150-170 are acceptable.
pub fn wpm_score(wpm: f64) -> f64 {
    if (110.0..=150.0).contains(&wpm) {
        100.0
    } else if (90.0..110.0).contains(&wpm) || (wpm > 150.0 && wpm <= 170.0) {
        70.0
    } else {
        40.0
    }
}

/// Errors per 100 words: up to 1 is perfect, 10 or more scores zero.
pub fn grammar_score_from_errors(error_count: usize, word_count: usize) -> f64 {
    if word_count == 0 {
        return FALLBACK_SCORE;
    }
    let errors_per_100 = error_count as f64 / word_count as f64 * 100.0;
    if errors_per_100 <= 1.0 {
        100.0
    } else if errors_per_100 >= 10.0 {
        0.0
    } else {
        linear_descending(errors_per_100, 1.0, 10.0)
    }
}

pub fn grammar_score(evidence: &GrammarEvidence, word_count: usize) -> f64 {
    match (evidence.enabled, evidence.errors) {
        (true, Some(errors)) => grammar_score_from_errors(errors, word_count),
        _ => FALLBACK_SCORE,
    }
}
