use std::collections::HashSet;

use anyhow::{bail, Result};

use super::LexicalDiversity;
use crate::text::get_words;

pub const DEFAULT_MTLD_THRESHOLD: f64 = 0.72;

/// Measure of Textual Lexical Diversity: mean length of word runs that keep
/// their type-token ratio above a threshold, averaged over a forward and a
/// backward pass.
pub struct Mtld {
    threshold: f64,
}

impl Default for Mtld {
    fn default() -> Self {
        Self::new(DEFAULT_MTLD_THRESHOLD)
    }
}

impl Mtld {
    pub fn new(threshold: f64) -> Self {
        Self { threshold }
    }

    fn factors<'a>(
        &self,
        words: impl Iterator<Item = &'a str>,
        total_unique: usize,
        len: usize,
    ) -> f64 {
        let mut terms = HashSet::new();
        let mut word_counter = 0usize;
        let mut factor_count = 0.0;
        let mut ttr = 1.0;

        for word in words {
            word_counter += 1;
            terms.insert(word);
            ttr = terms.len() as f64 / word_counter as f64;
            if ttr <= self.threshold {
                word_counter = 0;
                terms.clear();
                factor_count += 1.0;
            }
        }

        // Credit for the unfinished last segment
        if word_counter > 0 {
            factor_count += (1.0 - ttr) / (1.0 - self.threshold);
        }

        // TTR never fell to the threshold
        if factor_count == 0.0 {
            let whole_ttr = total_unique as f64 / len as f64;
            factor_count = if whole_ttr == 1.0 {
                1.0
            } else {
                (1.0 - whole_ttr) / (1.0 - self.threshold)
            };
        }

        len as f64 / factor_count
    }

    pub fn measure(&self, words: &[String]) -> Result<f64> {
        if words.is_empty() {
            bail!("MTLD is undefined for an empty text");
        }
        let unique = words.iter().collect::<HashSet<_>>().len();
        let forward = self.factors(words.iter().map(String::as_str), unique, words.len());
        let backward = self.factors(words.iter().rev().map(String::as_str), unique, words.len());
        Ok((forward + backward) / 2.0)
    }
}

impl LexicalDiversity for Mtld {
    fn diversity_index(&self, text: &str) -> Result<f64> {
        let words: Vec<String> = get_words(text).iter().map(|w| w.to_lowercase()).collect();
        self.measure(&words)
    }
}
