use std::collections::BTreeMap;

use serde::Serialize;

use super::heuristics::{
    filler_score, grammar_score, keyword_presence_score, salutation_flow_score, wpm_score,
};
use super::refine::{llm_score, request_refinement, ENGAGEMENT_SCORE_KEY, GRAMMAR_SCORE_KEY};
use super::rubric::{total_weight, Criterion};
use crate::collab::{Collaborators, LlmReply};
use crate::config::{Config, DEFAULT_MAX_TOKENS};
use crate::detect::{
    count_fillers, Detections, FillerCount, FillerMatching, FlowFindings, KeywordFindings,
    SalutationClosing, SchoolClassFindings,
};
use crate::error::AnalyzeError;
use crate::metrics::{
    engagement_from_sentiment, grammar_evidence, semantic_similarity_placeholder,
    vocabulary_measures, words_per_minute, EngagementEvidence, GrammarEvidence, SemanticEvidence,
    VocabularyStats,
};
use crate::text::Transcript;

/// Where a sub-score came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ScoreSource {
    Rules,
    Llm,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct KeywordEvidence {
    #[serde(flatten)]
    pub found: KeywordFindings,
    pub detected_name: Option<String>,
    pub detected_age: Option<u32>,
    pub school_class: SchoolClassFindings,
}

/// Supporting data for one criterion.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum Evidence {
    Keywords(KeywordEvidence),
    SalutationFlow {
        salutation: SalutationClosing,
        flow: FlowFindings,
    },
    SpeechRate {
        wpm: f64,
        word_count: usize,
        duration: f64,
    },
    Filler(FillerCount),
    Semantics(SemanticEvidence),
    Grammar(GrammarEvidence),
    Engagement(EngagementEvidence),
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CriterionScore {
    pub score: f64,
    pub weight: u32,
    pub source: ScoreSource,
    pub evidence: Evidence,
}

pub type Breakdown = BTreeMap<Criterion, CriterionScore>;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RuleSignals {
    pub keywords_found: KeywordFindings,
    pub found_must: usize,
    pub found_bonus: usize,
}

/// Raw diagnostics gathered during a run.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Signals {
    pub word_count: usize,
    pub wpm: f64,
    pub rules: RuleSignals,
    pub grammar_info: GrammarEvidence,
    pub vocab: VocabularyStats,
    /// Parsed LLM reply, `{"_raw": ...}` on failure, absent without an API key
    pub llm: Option<LlmReply>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ScoreResult {
    pub final_score: f64,
    pub breakdown: Breakdown,
    pub signals: Signals,
}

impl ScoreResult {
    pub fn score(&self, criterion: Criterion) -> f64 {
        self.breakdown.get(&criterion).map(|c| c.score).unwrap_or(0.0)
    }
}

/// Tunables that do not affect the rubric itself.
#[derive(Debug, Clone, PartialEq)]
pub struct AnalyzerOptions {
    pub filler_matching: FillerMatching,
    pub llm_max_tokens: u32,
    /// Fail with [`AnalyzeError::MissingApiKey`] when no key is given
    pub require_llm: bool,
}

impl Default for AnalyzerOptions {
    fn default() -> Self {
        Self {
            filler_matching: FillerMatching::Token,
            llm_max_tokens: DEFAULT_MAX_TOKENS,
            require_llm: false,
        }
    }
}

impl AnalyzerOptions {
    pub fn from_config(config: &Config) -> Self {
        Self {
            filler_matching: config.filler_matching(),
            llm_max_tokens: config
                .llm
                .as_ref()
                .and_then(|l| l.max_tokens)
                .unwrap_or(DEFAULT_MAX_TOKENS),
            require_llm: config.llm_required(),
        }
    }
}

/// The scoring pipeline. Holds only read-only collaborators and options, so
/// one analyzer can score any number of transcripts.
pub struct Analyzer {
    collaborators: Collaborators,
    options: AnalyzerOptions,
}

impl Analyzer {
    pub fn new(collaborators: Collaborators, options: AnalyzerOptions) -> Self {
        Self {
            collaborators,
            options,
        }
    }

    /// Analyzer without any collaborators: every external signal falls back.
    pub fn deterministic() -> Self {
        Self::new(Collaborators::none(), AnalyzerOptions::default())
    }

    pub fn options(&self) -> &AnalyzerOptions {
        &self.options
    }

    pub fn analyze(
        &self,
        transcript: &str,
        duration_seconds: f64,
        api_key: Option<&str>,
    ) -> Result<ScoreResult, AnalyzeError> {
        if !duration_seconds.is_finite() {
            return Err(AnalyzeError::InvalidDuration(duration_seconds));
        }
        let api_key = api_key.map(str::trim).filter(|k| !k.is_empty());
        if self.options.require_llm && api_key.is_none() {
            return Err(AnalyzeError::MissingApiKey);
        }

        let transcript = Transcript::new(transcript);
        let text = transcript.text();
        let words = transcript.words();
        let word_count = words.len();
        let wpm = words_per_minute(word_count, duration_seconds);
        tracing::debug!(
            "Scoring {} words over {}s ({:.1} wpm)",
            word_count,
            duration_seconds,
            wpm
        );

        let detections = Detections::run(text);
        let keyword = keyword_presence_score(&detections.keywords);
        let salutation_flow = salutation_flow_score(&detections.salutation, &detections.flow);

        let fillers = count_fillers(&words, self.options.filler_matching);
        let semantic = semantic_similarity_placeholder(text);

        let grammar_info = grammar_evidence(self.collaborators.grammar.as_deref(), text);
        let mut grammar = (grammar_score(&grammar_info, word_count), ScoreSource::Rules);

        let engagement_info =
            engagement_from_sentiment(self.collaborators.sentiment.as_deref(), text);
        let mut engagement = (engagement_info.engagement_score, ScoreSource::Rules);

        let vocab = vocabulary_measures(&words, text, self.collaborators.lexical.as_deref());

        let llm = api_key.map(|key| {
            let reply = request_refinement(
                self.collaborators.generator.as_deref(),
                key,
                text,
                self.options.llm_max_tokens,
            );
            if let Some(score) = llm_score(&reply, GRAMMAR_SCORE_KEY) {
                tracing::debug!("LLM grammar score {} replaces {}", score, grammar.0);
                grammar = (score, ScoreSource::Llm);
            }
            if let Some(score) = llm_score(&reply, ENGAGEMENT_SCORE_KEY) {
                tracing::debug!("LLM engagement score {} replaces {}", score, engagement.0);
                engagement = (score, ScoreSource::Llm);
            }
            reply
        });

        let mut breakdown = Breakdown::new();
        let mut add = |criterion: Criterion, score: f64, source: ScoreSource, evidence: Evidence| {
            breakdown.insert(
                criterion,
                CriterionScore {
                    score,
                    weight: criterion.weight(),
                    source,
                    evidence,
                },
            );
        };

        add(
            Criterion::KeywordPresence,
            keyword.score,
            ScoreSource::Rules,
            Evidence::Keywords(KeywordEvidence {
                found: detections.keywords,
                detected_name: detections.name.clone(),
                detected_age: detections.age,
                school_class: detections.school_class,
            }),
        );
        add(
            Criterion::SalutationFlow,
            salutation_flow,
            ScoreSource::Rules,
            Evidence::SalutationFlow {
                salutation: detections.salutation,
                flow: detections.flow,
            },
        );
        add(
            Criterion::SpeechRate,
            wpm_score(wpm),
            ScoreSource::Rules,
            Evidence::SpeechRate {
                wpm,
                word_count,
                duration: duration_seconds,
            },
        );
        add(
            Criterion::FillerWords,
            filler_score(fillers.filler_percent),
            ScoreSource::Rules,
            Evidence::Filler(fillers),
        );
        add(
            Criterion::ContentSemantics,
            semantic.score,
            ScoreSource::Rules,
            Evidence::Semantics(semantic),
        );
        add(
            Criterion::Grammar,
            grammar.0,
            grammar.1,
            Evidence::Grammar(grammar_info.clone()),
        );
        add(
            Criterion::Engagement,
            engagement.0,
            engagement.1,
            Evidence::Engagement(engagement_info),
        );

        let final_score = weighted_average(&breakdown);
        tracing::info!("Final score {:.1} for {} words", final_score, word_count);

        Ok(ScoreResult {
            final_score,
            breakdown,
            signals: Signals {
                word_count,
                wpm,
                rules: RuleSignals {
                    keywords_found: detections.keywords,
                    found_must: keyword.found_must,
                    found_bonus: keyword.found_bonus,
                },
                grammar_info,
                vocab,
                llm,
            },
        })
    }
}

/// Σ(score × weight) / Σ(weight) over the rubric.
fn weighted_average(breakdown: &Breakdown) -> f64 {
    let total = total_weight();
    if total == 0 {
        return 0.0;
    }
    let weighted_sum: f64 = breakdown
        .iter()
        .map(|(criterion, entry)| entry.score * criterion.weight() as f64)
        .sum();
    weighted_sum / total as f64
}

/// Score a transcript with the built-in collaborators and default options.
pub fn analyze(
    transcript: &str,
    duration_seconds: f64,
    api_key: Option<&str>,
) -> Result<ScoreResult, AnalyzeError> {
    Analyzer::new(Collaborators::builtin(), AnalyzerOptions::default()).analyze(
        transcript,
        duration_seconds,
        api_key,
    )
}
