//! Rubric scoring for spoken self-introduction transcripts.
//!
//! The pipeline normalizes the transcript, runs keyword and filler
//! detectors, measures speech rate, grammar, vocabulary and sentiment, then
//! combines seven weighted sub-scores into a 0-100 result. When an API key
//! is supplied, an LLM may override the grammar and engagement sub-scores.

pub mod collab;
pub mod config;
pub mod credentials;
pub mod detect;
pub mod error;
pub mod metrics;
pub mod output;
pub mod scoring;
pub mod session;
pub mod text;

pub use error::AnalyzeError;
pub use scoring::{analyze, Analyzer, AnalyzerOptions, ScoreResult};
