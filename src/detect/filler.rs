use serde::{Deserialize, Serialize};

/// Disfluency tokens counted against the speaker.
pub const FILLERS: [&str; 8] = [
    "umm", "uh", "like", "you know", "basically", "actually", "erm", "hmm",
];

/// How multi-word fillers are matched.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum FillerMatching {
    /// Compare each single token against the filler set. Multi-word entries
    /// such as "you know" never match in this mode.
    #[default]
    Token,
    /// Additionally match multi-word entries as consecutive tokens.
    Phrase,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct FillerCount {
    pub filler_count: usize,
    pub filler_percent: f64,
}

pub fn count_fillers(words: &[&str], matching: FillerMatching) -> FillerCount {
    let lower: Vec<String> = words.iter().map(|w| w.to_lowercase()).collect();

    let mut count = 0;
    for filler in FILLERS {
        let parts: Vec<&str> = filler.split(' ').collect();
        if parts.len() == 1 {
            count += lower.iter().filter(|w| w.as_str() == filler).count();
        } else if matching == FillerMatching::Phrase {
            count += lower
                .windows(parts.len())
                .filter(|window| window.iter().zip(&parts).all(|(w, p)| w.as_str() == *p))
                .count();
        }
    }

    FillerCount {
        filler_count: count,
        filler_percent: count as f64 / words.len().max(1) as f64 * 100.0,
    }
}
