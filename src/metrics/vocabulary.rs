use std::collections::HashSet;

use serde::Serialize;

use crate::collab::LexicalDiversity;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct VocabularyStats {
    pub word_count: usize,
    pub unique: usize,
    /// Type-token ratio: unique / total
    pub ttr: f64,
    pub mtld: Option<f64>,
}

pub fn vocabulary_measures(
    words: &[&str],
    transcript: &str,
    lexical: Option<&dyn LexicalDiversity>,
) -> VocabularyStats {
    let word_count = words.len();
    let unique = words
        .iter()
        .map(|w| w.to_lowercase())
        .collect::<HashSet<_>>()
        .len();

    let mtld = lexical.and_then(|l| match l.diversity_index(transcript) {
        Ok(value) => Some(value),
        Err(e) => {
            tracing::debug!("Lexical diversity unavailable: {:#}", e);
            None
        }
    });

    VocabularyStats {
        word_count,
        unique,
        ttr: unique as f64 / word_count.max(1) as f64,
        mtld,
    }
}
