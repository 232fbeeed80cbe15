use anyhow::Result;
use vader_sentiment::SentimentIntensityAnalyzer;

use super::SentimentAnalyzer;
use crate::text::get_words;

/// Polarity from the VADER lexicon and rules (negation, boosters,
/// punctuation emphasis, "but" shifts).
#[derive(Debug, Default, Clone, Copy)]
pub struct VaderSentiment;

impl VaderSentiment {
    pub fn new() -> Self {
        Self
    }

    /// Compound score in [-1, 1] for `text`. Text with no words is 0.0.
    pub fn compound(&self, text: &str) -> f64 {
        if get_words(text).is_empty() {
            return 0.0;
        }
        let analyzer = SentimentIntensityAnalyzer::new();
        let scores = analyzer.polarity_scores(text);
        let compound = scores.get("compound").copied().unwrap_or(0.0);
        if !compound.is_finite() {
            return 0.0;
        }
        // + 0.0 folds a negative zero into 0.0
        compound.clamp(-1.0, 1.0) + 0.0
    }
}

impl SentimentAnalyzer for VaderSentiment {
    fn polarity(&self, text: &str) -> Result<f64> {
        Ok(self.compound(text))
    }
}
