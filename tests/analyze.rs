use anyhow::{anyhow, Result};

use speakcheck::collab::{
    Collaborators, GeneratorFactory, GrammarChecker, GrammarMatch, TextGenerator,
};
use speakcheck::detect::{detect_age, detect_name, detect_salutation_and_closing, FillerMatching};
use speakcheck::scoring::{Criterion, ScoreSource};
use speakcheck::{AnalyzeError, Analyzer, AnalyzerOptions};

const SAMPLE: &str =
    "Hello, my name is Ravi. I study in class 9 at ABC School. I enjoy cricket. Thank you.";

const COMPLETE: &str = "Hello everyone, my name is Asha. I am 13 years old and I study in \
                        class 8 at Green Valley School. I live with my mother, father and \
                        sister. My hobbies are reading and painting. My goal is to become a \
                        doctor. A fun fact about me is that I can juggle. Thank you for listening.";

struct UnreachableFactory;

impl GeneratorFactory for UnreachableFactory {
    fn connect(&self, _api_key: &str) -> Result<Box<dyn TextGenerator>> {
        Err(anyhow!("connection refused"))
    }
}

struct FailingGenerator;

impl TextGenerator for FailingGenerator {
    fn generate(&self, _prompt: &str, _max_tokens: u32) -> Result<String> {
        Err(anyhow!("HTTP 503 Service Unavailable"))
    }
}

struct FailingGeneratorFactory;

impl GeneratorFactory for FailingGeneratorFactory {
    fn connect(&self, _api_key: &str) -> Result<Box<dyn TextGenerator>> {
        Ok(Box::new(FailingGenerator))
    }
}

struct CannedGenerator(String);

impl TextGenerator for CannedGenerator {
    fn generate(&self, prompt: &str, _max_tokens: u32) -> Result<String> {
        assert!(prompt.contains("Return JSON only."));
        Ok(self.0.clone())
    }
}

struct CannedFactory(&'static str);

impl GeneratorFactory for CannedFactory {
    fn connect(&self, api_key: &str) -> Result<Box<dyn TextGenerator>> {
        assert_eq!(api_key, "test-key");
        Ok(Box::new(CannedGenerator(self.0.to_string())))
    }
}

/// Reports a fixed number of issues regardless of input.
struct FixedErrors(usize);

impl GrammarChecker for FixedErrors {
    fn check(&self, _text: &str) -> Result<Vec<GrammarMatch>> {
        Ok((0..self.0)
            .map(|i| GrammarMatch {
                message: "Possible agreement error".to_string(),
                offset: i * 6,
                length: 5,
                rule_id: "AGREEMENT".to_string(),
                replacements: vec![],
            })
            .collect())
    }
}

struct BrokenChecker;

impl GrammarChecker for BrokenChecker {
    fn check(&self, _text: &str) -> Result<Vec<GrammarMatch>> {
        Err(anyhow!("grammar server timed out"))
    }
}

fn with_generator(factory: Box<dyn GeneratorFactory>) -> Analyzer {
    Analyzer::new(
        Collaborators {
            generator: Some(factory),
            ..Collaborators::none()
        },
        AnalyzerOptions::default(),
    )
}

fn with_grammar(checker: Box<dyn GrammarChecker>) -> Analyzer {
    Analyzer::new(
        Collaborators {
            grammar: Some(checker),
            ..Collaborators::none()
        },
        AnalyzerOptions::default(),
    )
}

#[test]
fn test_final_score_in_range() {
    let analyzer = Analyzer::new(Collaborators::builtin(), AnalyzerOptions::default());
    let transcripts = [
        "",
        SAMPLE,
        COMPLETE,
        "umm uh like umm basically actually erm hmm",
        "I hate this. It is terrible, awful and boring!!!",
    ];
    for transcript in transcripts {
        for duration in [-5.0, 0.0, 0.5, 40.0, 3600.0] {
            let result = analyzer.analyze(transcript, duration, None).unwrap();
            assert!(
                result.final_score.is_finite()
                    && (0.0..=100.0).contains(&result.final_score),
                "{} for {:?} over {}s",
                result.final_score,
                transcript,
                duration
            );
        }
    }
}

#[test]
fn test_keyword_presence_bounds() {
    let analyzer = Analyzer::deterministic();
    let full = analyzer.analyze(COMPLETE, 60.0, None).unwrap();
    assert_eq!(full.score(Criterion::KeywordPresence), 100.0);
    assert_eq!(full.signals.rules.found_must, 4);
    assert_eq!(full.signals.rules.found_bonus, 3);

    let none = analyzer.analyze("Weather today seems warm.", 60.0, None).unwrap();
    assert_eq!(none.score(Criterion::KeywordPresence), 0.0);
}

#[test]
fn test_unreachable_llm_matches_deterministic() {
    let deterministic = Analyzer::deterministic()
        .analyze(SAMPLE, 40.0, None)
        .unwrap();

    for analyzer in [
        with_generator(Box::new(UnreachableFactory)),
        with_generator(Box::new(FailingGeneratorFactory)),
    ] {
        let result = analyzer.analyze(SAMPLE, 40.0, Some("test-key")).unwrap();
        assert_eq!(result.final_score, deterministic.final_score);
        assert_eq!(result.breakdown, deterministic.breakdown);
        assert!(result.signals.llm.as_ref().unwrap().is_raw());
    }
}

#[test]
fn test_llm_overrides_grammar_and_engagement() {
    let analyzer = with_generator(Box::new(CannedFactory(
        "Sure! ```json\n{\"grammar_score\": 85, \"grammar_feedback\": \"Good.\", \
         \"engagement_score\": \"72\", \"engagement_feedback\": \"Warm tone.\"}\n```",
    )));
    let result = analyzer.analyze(SAMPLE, 40.0, Some("test-key")).unwrap();

    let grammar = &result.breakdown[&Criterion::Grammar];
    assert_eq!(grammar.score, 85.0);
    assert_eq!(grammar.source, ScoreSource::Llm);
    let engagement = &result.breakdown[&Criterion::Engagement];
    assert_eq!(engagement.score, 72.0);
    assert_eq!(engagement.source, ScoreSource::Llm);
    assert_eq!(
        result.breakdown[&Criterion::KeywordPresence].source,
        ScoreSource::Rules
    );

    // keyword 60*30 + flow 100*5 + wpm 40*10 + filler 100*10
    // + semantics 60*10 + grammar 85*15 + engagement 72*10
    let expected = (1800.0 + 500.0 + 400.0 + 1000.0 + 600.0 + 1275.0 + 720.0) / 90.0;
    assert!((result.final_score - expected).abs() < 1e-9);
}

#[test]
fn test_llm_scores_are_clamped() {
    let analyzer = with_generator(Box::new(CannedFactory(
        r#"{"grammar_score": 140, "engagement_score": -20}"#,
    )));
    let result = analyzer.analyze(SAMPLE, 40.0, Some("test-key")).unwrap();
    assert_eq!(result.score(Criterion::Grammar), 100.0);
    assert_eq!(result.score(Criterion::Engagement), 0.0);
}

#[test]
fn test_llm_partial_reply_keeps_rule_score() {
    let analyzer = with_generator(Box::new(CannedFactory(r#"{"grammar_score": 90}"#)));
    let result = analyzer.analyze(SAMPLE, 40.0, Some("test-key")).unwrap();
    assert_eq!(result.score(Criterion::Grammar), 90.0);
    let engagement = &result.breakdown[&Criterion::Engagement];
    assert_eq!(engagement.score, 60.0);
    assert_eq!(engagement.source, ScoreSource::Rules);
}

#[test]
fn test_no_key_skips_llm() {
    let analyzer = with_generator(Box::new(CannedFactory(r#"{"grammar_score": 90}"#)));
    let result = analyzer.analyze(SAMPLE, 40.0, None).unwrap();
    assert!(result.signals.llm.is_none());
    assert_eq!(result.score(Criterion::Grammar), 60.0);
}

#[test]
fn test_required_llm_without_key() {
    let analyzer = Analyzer::new(
        Collaborators::none(),
        AnalyzerOptions {
            require_llm: true,
            ..Default::default()
        },
    );
    assert_eq!(
        analyzer.analyze(SAMPLE, 40.0, None).unwrap_err(),
        AnalyzeError::MissingApiKey
    );
}

#[test]
fn test_grammar_error_rate() {
    let transcript = vec!["apple"; 100].join(" ");
    let result = with_grammar(Box::new(FixedErrors(5)))
        .analyze(&transcript, 60.0, None)
        .unwrap();
    let expected = 100.0 - (4.0 / 9.0) * 100.0;
    assert!((result.score(Criterion::Grammar) - expected).abs() < 1e-9);
    assert_eq!(result.signals.grammar_info.errors, Some(5));
    assert!(result.signals.grammar_info.enabled);

    let clean = with_grammar(Box::new(FixedErrors(1)))
        .analyze(&transcript, 60.0, None)
        .unwrap();
    assert_eq!(clean.score(Criterion::Grammar), 100.0);

    let sloppy = with_grammar(Box::new(FixedErrors(12)))
        .analyze(&transcript, 60.0, None)
        .unwrap();
    assert_eq!(sloppy.score(Criterion::Grammar), 0.0);
}

#[test]
fn test_broken_grammar_checker_falls_back() {
    let result = with_grammar(Box::new(BrokenChecker))
        .analyze(SAMPLE, 40.0, None)
        .unwrap();
    assert_eq!(result.score(Criterion::Grammar), 60.0);
    assert!(!result.signals.grammar_info.enabled);
    assert_eq!(result.signals.grammar_info.errors, None);
}

#[test]
fn test_detector_round_trips() {
    assert_eq!(detect_name("My name is Ravi."), Some("Ravi".to_string()));
    assert_eq!(detect_age("I am 13 years old"), Some(13));
    let found = detect_salutation_and_closing("Hello everyone, thank you for listening");
    assert!(found.salutation);
    assert!(found.closing);
}

#[test]
fn test_phrase_filler_matching() {
    let transcript = "I went to the market with my friends yesterday and you know we bought \
                      fresh apples bananas and oranges for the whole family because you know \
                      everyone loves fruit so much in our house";
    let token = Analyzer::deterministic()
        .analyze(transcript, 10.0, None)
        .unwrap();
    let phrase = Analyzer::new(
        Collaborators::none(),
        AnalyzerOptions {
            filler_matching: FillerMatching::Phrase,
            ..Default::default()
        },
    )
    .analyze(transcript, 10.0, None)
    .unwrap();

    assert_eq!(token.score(Criterion::FillerWords), 100.0);
    let expected = 100.0 - ((2.0 / 34.0 * 100.0 - 2.0) / 8.0) * 100.0;
    assert!((phrase.score(Criterion::FillerWords) - expected).abs() < 1e-9);
}

#[test]
fn test_end_to_end_sample() {
    let result = speakcheck::analyze(SAMPLE, 40.0, None).unwrap();

    let found = result.signals.rules.keywords_found;
    assert!(found.name);
    assert!(found.school_or_class);
    assert!(found.hobbies);
    assert!(!found.family);

    let expected_wpm = result.signals.word_count as f64 / 40.0 * 60.0;
    assert!((result.signals.wpm - expected_wpm).abs() < 1e-9);
    assert!(result.final_score.is_finite());
    assert!((0.0..=100.0).contains(&result.final_score));
    assert_eq!(result.breakdown.len(), Criterion::ALL.len());
}
