use once_cell::sync::Lazy;
use regex::Regex;

/// Word token: an alphanumeric run, optionally joined to a second run by a
/// single hyphen or apostrophe ("well-known", "don't").
static WORD_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"\w+(?:[-']\w+)?").unwrap());

/// Collapse every run of whitespace to a single space and trim both ends.
pub fn normalize_text(text: &str) -> String {
    text.split_whitespace().collect::<Vec<_>>().join(" ")
}

/// Extract word tokens in order of appearance.
pub fn get_words(text: &str) -> Vec<&str> {
    WORD_RE.find_iter(text).map(|m| m.as_str()).collect()
}

/// A transcript normalized once, shared by every detector and metric of a run.
#[derive(Debug, Clone)]
pub struct Transcript {
    text: String,
}

impl Transcript {
    pub fn new(raw: &str) -> Self {
        Self {
            text: normalize_text(raw),
        }
    }

    pub fn text(&self) -> &str {
        &self.text
    }

    pub fn words(&self) -> Vec<&str> {
        get_words(&self.text)
    }

    pub fn is_empty(&self) -> bool {
        self.text.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_normalize_collapses_whitespace() {
        assert_eq!(normalize_text("  Hello \n\t my   name  "), "Hello my name");
    }

    #[test]
    fn test_normalize_empty() {
        assert_eq!(normalize_text(""), "");
        assert_eq!(normalize_text(" \n "), "");
    }

    #[test]
    fn test_words_keep_internal_hyphen_and_apostrophe() {
        let words = get_words("I'm a well-known, self-taught coder.");
        assert_eq!(words, vec!["I'm", "a", "well-known", "self-taught", "coder"]);
    }

    #[test]
    fn test_words_split_after_single_joiner() {
        // Only one joiner is absorbed per token
        let words = get_words("mother-in-law");
        assert_eq!(words, vec!["mother-in", "law"]);
    }

    #[test]
    fn test_empty_transcript_has_no_words() {
        let transcript = Transcript::new("   ");
        assert!(transcript.is_empty());
        assert!(transcript.words().is_empty());
    }

    #[test]
    fn test_numbers_are_words() {
        assert_eq!(get_words("class 9, age 13"), vec!["class", "9", "age", "13"]);
    }
}
