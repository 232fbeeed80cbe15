use serde::Serialize;

/// The seven weighted rubric criteria, in reporting order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
pub enum Criterion {
    #[serde(rename = "Keyword Presence")]
    KeywordPresence,
    #[serde(rename = "Salutation & Flow")]
    SalutationFlow,
    #[serde(rename = "Speech Rate (WPM)")]
    SpeechRate,
    #[serde(rename = "Filler Words")]
    FillerWords,
    #[serde(rename = "Content Semantics")]
    ContentSemantics,
    #[serde(rename = "Grammar & Syntax")]
    Grammar,
    #[serde(rename = "Engagement & Sentiment")]
    Engagement,
}

impl Criterion {
    pub const ALL: [Criterion; 7] = [
        Criterion::KeywordPresence,
        Criterion::SalutationFlow,
        Criterion::SpeechRate,
        Criterion::FillerWords,
        Criterion::ContentSemantics,
        Criterion::Grammar,
        Criterion::Engagement,
    ];

    /// Rubric weight. The final score divides by the sum of all weights (90).
    pub const fn weight(self) -> u32 {
        match self {
            Criterion::KeywordPresence => 30,
            Criterion::SalutationFlow => 5,
            Criterion::SpeechRate => 10,
            Criterion::FillerWords => 10,
            Criterion::ContentSemantics => 10,
            Criterion::Grammar => 15,
            Criterion::Engagement => 10,
        }
    }

    pub const fn label(self) -> &'static str {
        match self {
            Criterion::KeywordPresence => "Keyword Presence",
            Criterion::SalutationFlow => "Salutation & Flow",
            Criterion::SpeechRate => "Speech Rate (WPM)",
            Criterion::FillerWords => "Filler Words",
            Criterion::ContentSemantics => "Content Semantics",
            Criterion::Grammar => "Grammar & Syntax",
            Criterion::Engagement => "Engagement & Sentiment",
        }
    }

    /// Short identifier used in tabular output.
    pub const fn key(self) -> &'static str {
        match self {
            Criterion::KeywordPresence => "keyword_presence",
            Criterion::SalutationFlow => "salutation_flow",
            Criterion::SpeechRate => "wpm",
            Criterion::FillerWords => "filler",
            Criterion::ContentSemantics => "semantics",
            Criterion::Grammar => "grammar",
            Criterion::Engagement => "engagement",
        }
    }
}

pub fn total_weight() -> u32 {
    Criterion::ALL.iter().map(|c| c.weight()).sum()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_total_weight() {
        assert_eq!(total_weight(), 90);
    }

    #[test]
    fn test_reporting_order_matches_ord() {
        let mut sorted = Criterion::ALL;
        sorted.sort();
        assert_eq!(sorted, Criterion::ALL);
    }

    #[test]
    fn test_label_matches_serialized_name() {
        for criterion in Criterion::ALL {
            let json = serde_json::to_value(criterion).unwrap();
            assert_eq!(json, criterion.label());
        }
    }
}
