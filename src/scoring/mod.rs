pub mod engine;
pub mod heuristics;
pub mod refine;
pub mod rubric;

pub use engine::{
    analyze, Analyzer, AnalyzerOptions, Breakdown, CriterionScore, Evidence, KeywordEvidence,
    RuleSignals, ScoreResult, ScoreSource, Signals,
};
pub use heuristics::{
    filler_score, grammar_score_from_errors, keyword_presence_score, linear_descending,
    salutation_flow_score, wpm_score, KeywordScore,
};
pub use refine::{
    build_prompt, llm_score, request_refinement, ENGAGEMENT_FEEDBACK_KEY, ENGAGEMENT_SCORE_KEY,
    GRAMMAR_FEEDBACK_KEY, GRAMMAR_SCORE_KEY,
};
pub use rubric::{total_weight, Criterion};
