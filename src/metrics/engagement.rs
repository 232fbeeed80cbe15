use serde::Serialize;

use super::FALLBACK_SCORE;
use crate::collab::SentimentAnalyzer;

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct EngagementEvidence {
    pub available: bool,
    pub compound: f64,
    pub engagement_score: f64,
}

impl EngagementEvidence {
    fn fallback() -> Self {
        Self {
            available: false,
            compound: 0.0,
            engagement_score: FALLBACK_SCORE,
        }
    }
}

/// Map compound polarity onto 0..100: -1 -> 20, 0 -> 60, +1 -> 100.
pub fn engagement_score(compound: f64) -> f64 {
    (60.0 + compound * 40.0).clamp(0.0, 100.0)
}

pub fn engagement_from_sentiment(
    analyzer: Option<&dyn SentimentAnalyzer>,
    transcript: &str,
) -> EngagementEvidence {
    let Some(analyzer) = analyzer else {
        return EngagementEvidence::fallback();
    };
    match analyzer.polarity(transcript) {
        Ok(compound) if compound.is_finite() => EngagementEvidence {
            available: true,
            compound,
            engagement_score: engagement_score(compound),
        },
        Ok(compound) => {
            tracing::warn!("Sentiment analyzer returned non-finite polarity {}", compound);
            EngagementEvidence::fallback()
        }
        Err(e) => {
            tracing::warn!("Sentiment analysis failed: {:#}", e);
            EngagementEvidence::fallback()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use anyhow::Result;

    struct Fixed(f64);

    impl SentimentAnalyzer for Fixed {
        fn polarity(&self, _text: &str) -> Result<f64> {
            Ok(self.0)
        }
    }

    #[test]
    fn test_mapping() {
        assert_eq!(engagement_score(-1.0), 20.0);
        assert_eq!(engagement_score(0.0), 60.0);
        assert_eq!(engagement_score(1.0), 100.0);
        assert_eq!(engagement_score(5.0), 100.0);
    }

    #[test]
    fn test_unavailable() {
        let evidence = engagement_from_sentiment(None, "text");
        assert!(!evidence.available);
        assert_eq!(evidence.engagement_score, 60.0);
    }

    #[test]
    fn test_available() {
        let evidence = engagement_from_sentiment(Some(&Fixed(0.5)), "text");
        assert!(evidence.available);
        assert_eq!(evidence.engagement_score, 80.0);
    }

    #[test]
    fn test_non_finite_polarity() {
        let evidence = engagement_from_sentiment(Some(&Fixed(f64::NAN)), "text");
        assert!(!evidence.available);
    }
}
